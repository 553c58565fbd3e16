//! `urlbridge-probe` - wait for one open-URL Apple Event and report it

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use urlbridge_api::args::USAGE;
use urlbridge_api::{probe, ProbeArgs, ProbeContext};

fn main() -> ExitCode {
    // Must happen before config loading so URLBRIDGE_* overrides apply.
    let dotenv = dotenvy::dotenv();

    let args = match ProbeArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {err:#}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    if args.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let ctx = match ProbeContext::initialize(&args) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(err) => tracing::debug!(error = %err, "no .env loaded"),
    }

    let mut stdout = std::io::stdout().lock();
    match probe::run(&ctx, &args, &mut stdout) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "probe failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
