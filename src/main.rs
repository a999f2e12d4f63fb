//! Binary entry point for the `lz4pipe` command-line tool.
//!
//! Parses arguments, installs the logger (level from `-v`/`-q`, overridable
//! through `RUST_LOG`), and hands off to [`lz4pipe::cli::run`].

use clap::Parser;

use lz4pipe::cli::{run, Args};

fn main() {
    let args = Args::parse();

    env_logger::builder()
        .filter_level(args.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    if let Err(err) = run(&args) {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}
