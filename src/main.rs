//! ATOZ - Command-line tool for generating API specifications from annotated sources.
//!
//! Scans a source tree for `---ATOZAPI---`, `---ATOZOBJ---` and `---ATOZDEF---`
//! comment blocks in any language and emits the assembled specification.
//!
//! # Usage
//!
//! ```bash
//! atoz [OPTIONS] [SOURCE_DIR]
//! ```
//!
//! # Examples
//!
//! Print JSON for the current directory:
//! ```bash
//! atoz
//! ```
//!
//! Write YAML to a file:
//! ```bash
//! atoz ./my-api -f yaml -o spec.yaml
//! ```
//!
//! Fail on duplicate references and enable verbose logging:
//! ```bash
//! atoz ./my-api --strict -v
//! ```

use anyhow::Result;
use atoz::cli;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // Parse once up front so the verbose flag can configure the logger
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("ATOZ specification generator starting...");

    let args = cli::parse_args_from_parsed(args)?;

    cli::run(args)?;

    info!("API specification generation completed successfully");

    Ok(())
}
