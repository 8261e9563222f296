use std::{
    io::{stdout, BufWriter, Write},
    process,
};

use clap::Parser;
use colored::Colorize;

use bifrust::{cli::Args, enumerate, EnumerateParams};

/// Initialize the tracing subscriber with environment filter.
///
/// Set `RUST_LOG=bifrust=debug` to see debug output.
#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

fn main() {
    #[cfg(feature = "tracing")]
    init_tracing();

    let args = Args::parse();

    for path in &args.inputs {
        if !path.exists() {
            eprintln!(
                "{}\n {}",
                "Problem with arguments:".blue().bold(),
                format!("File not found: {}", path.display()).blue().bold()
            );
            process::exit(1);
        }
    }

    if !args.quiet {
        eprintln!(
            "{}: {}",
            "k-length".bold(),
            args.k.to_string().blue().bold()
        );
        let data = args
            .inputs
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        eprintln!("{}: {}", "data".bold(), data.underline().bold().blue());
        eprintln!(
            "{}: {}",
            "filter-bits".bold(),
            args.filter_bits.to_string().blue().bold()
        );
        eprintln!(
            "{}: {}",
            "num-hashes".bold(),
            args.num_hashes.to_string().blue().bold()
        );
        eprintln!(
            "{}: {}",
            "rounds".bold(),
            args.rounds.to_string().blue().bold()
        );
        eprintln!("{}: {}", "seed".bold(), args.seed.to_string().blue().bold());
        eprintln!(
            "{}: {}",
            "output-format".bold(),
            format!("{:?}", args.format).to_lowercase().blue().bold()
        );
        eprintln!();
    }

    let params = match EnumerateParams::new(
        args.k,
        args.filter_bits,
        args.num_hashes,
        args.rounds,
        args.seed,
    ) {
        Ok(params) => params.with_quiet(args.quiet),
        Err(e) => {
            eprintln!(
                "{}\n {}",
                "Problem with arguments:".blue().bold(),
                e.to_string().blue()
            );
            process::exit(1);
        }
    };

    let index = match enumerate(&params, &args.inputs) {
        Ok(index) => index,
        Err(e) => {
            eprintln!(
                "{}\n {}",
                "Application error:".blue().bold(),
                e.to_string().blue()
            );
            process::exit(1);
        }
    };

    if !args.quiet {
        eprintln!(
            "{}: {}",
            "bifurcations".bold(),
            index.len().to_string().green().bold()
        );
    }

    let mut out = BufWriter::new(stdout());
    let written = index
        .write(&mut out, args.format)
        .and_then(|()| out.flush().map_err(Into::into));
    if let Err(e) = written {
        eprintln!(
            "{}\n {}",
            "Application error:".blue().bold(),
            e.to_string().blue()
        );
        process::exit(1);
    }
}
