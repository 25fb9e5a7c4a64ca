#![allow(unexpected_cfgs)]
#![cfg(not(tarpaulin_include))]

mod commands;
#[cfg(feature = "astcenc")]
mod error;
mod logging;
mod util;
use argh::FromArgs;
use core::error::Error;

#[derive(FromArgs, Debug)]
/// Plan, encode and inspect ASTC compressed textures
struct TopLevel {
    /// log debug output (overridden by RUST_LOG)
    #[argh(switch, short = 'v')]
    verbose: bool,

    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Inspect(commands::inspect::InspectCmd),
    Plan(commands::plan::PlanCmd),
    #[cfg(feature = "astcenc")]
    Encode(commands::encode::EncodeCmd),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli: TopLevel = argh::from_env();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Inspect(cmd) => {
            commands::inspect::handle_inspect_command(cmd)?;
        }
        Commands::Plan(cmd) => {
            commands::plan::handle_plan_command(cmd)?;
        }
        #[cfg(feature = "astcenc")]
        Commands::Encode(cmd) => {
            commands::encode::handle_encode_command(cmd)?;
        }
    }

    Ok(())
}
