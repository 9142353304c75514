use anyhow::{Result, bail};
use clap::Parser;
use degiro_core::compute_returns;
use degiro_core::models::Summary;
use schemars::schema_for;
mod commands;
use commands::Commands;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Compute { input, start, end, schema } => {
            if *schema {
                let schema = schema_for!(Summary);
                println!("{}", serde_json::to_string_pretty(&schema)?);
                return Ok(());
            }

            let Some(input) = input.as_ref() else {
                bail!("--input is required unless --schema is set");
            };
            let summary = compute_returns(input, start.as_deref(), end.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
