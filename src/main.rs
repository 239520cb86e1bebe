//! OpenAPI client patcher - Command-line tool for generating a patched typescript-axios client.
//!
//! Fetches the OpenAPI document of a running service, normalizes it for
//! `openapi-generator-cli`, runs the generator and patches its output before copying
//! the five client files into the target directory.
//!
//! # Usage
//!
//! ```bash
//! openapi-client-patcher [OPTIONS] <TARGET_DIR>
//! ```
//!
//! # Examples
//!
//! Generate from the default local endpoint:
//! ```bash
//! openapi-client-patcher src/api
//! ```
//!
//! Generate from a saved document and keep the normalized copy:
//! ```bash
//! openapi-client-patcher src/api -i openapi.json --schema-output normalized.yaml -f yaml
//! ```
//!
//! Fail if the generator's output no longer matches the patches:
//! ```bash
//! openapi-client-patcher src/api --strict -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_client_patcher::cli;

fn main() -> Result<()> {
    // Parse once to read the verbose flag, then validate after the logger is up
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("OpenAPI client patcher starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("Client generation completed successfully");

    Ok(())
}
