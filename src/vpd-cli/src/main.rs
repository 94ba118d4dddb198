mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "vpd=debug" } else { "vpd=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Parse {
            input,
            offset,
            inventory_path,
            all_records,
            supported_only,
            json,
        } => {
            let options = vpd::ParseOptions {
                all_records,
                supported_keywords_only: supported_only,
            };
            commands::parse::handle(input, offset, &inventory_path, options, json)?;
        }

        Commands::Header {
            input,
            offset,
            json,
        } => {
            commands::header::handle(input, offset, json)?;
        }

        Commands::Toc {
            input,
            offset,
            all_records,
            json,
        } => {
            commands::toc::handle(input, offset, all_records, json)?;
        }

        Commands::Read {
            record,
            keyword,
            input,
            offset,
        } => {
            commands::read::handle(&record, &keyword, input, offset)?;
        }

        Commands::Configure {
            eeprom,
            offset,
            show,
        } => {
            commands::configure::handle(eeprom, offset, show)?;
        }
    }

    Ok(())
}
