//! LangM CLI Binary
//!
//! Parses arguments, sets up logging and colour, runs one command and maps
//! the outcome to an exit code.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::CommandFactory;
use tracing_subscriber::EnvFilter;

use langm_lib::cli::{Cli, CliContext, CommandRunner, style};
use langm_lib::config::Settings;
use langm_lib::core::format_error_with_suggestion;

fn init_tracing(ctx: &CliContext) {
    let filter = EnvFilter::try_from_env("LANGM_LOG")
        .or_else(|_| EnvFilter::try_new(ctx.log_directive()))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn report(err: &anyhow::Error) -> ExitCode {
    let rendered = format_error_with_suggestion(err);
    let rendered = rendered.replacen("Error:", &style::error_label(), 1);
    eprintln!("{rendered}");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse_normalized(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => {
            // Help goes to stdout with success, parse errors to stderr.
            let code = if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = err.print();
            return code;
        }
    };

    if cli.version {
        println!("langm v{}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => return report(&anyhow::Error::from(err)),
    };
    let ctx = CliContext::new(&cli, settings);
    style::init(ctx.color_allowed());
    init_tracing(&ctx);

    let Some(command) = &cli.command else {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = command.execute(&ctx, &mut out);
    let _ = out.flush();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}
