mod cli;
mod commands;
mod error;
mod output;
mod setup;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use virtus_core::Device;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a device
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global).await,

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "virtus", &mut std::io::stdout());
            Ok(())
        }

        // Discovery only needs credentials and a home id
        Command::Discover => {
            let device_config = setup::load_device_config(&cli.global, false)?;
            let device = Device::new(device_config)?;
            commands::discover::handle(&device, &cli.global).await
        }

        // Pure gateway reads: no polling required
        Command::Info => {
            let device = build_device(&cli.global)?;
            commands::info::handle(&device, &cli.global).await
        }
        Command::Errors => {
            let device = build_device(&cli.global)?;
            commands::info::handle_errors(&device, &cli.global).await
        }

        // Everything else runs against a connected, polling device
        cmd => {
            let device = build_device(&cli.global)?;

            tracing::debug!(command = ?cmd, "connecting to device");
            device.connect().await?;

            let result = commands::dispatch(cmd, &device, &cli.global).await;
            device.shutdown();
            result
        }
    }
}

fn build_device(global: &cli::GlobalOpts) -> Result<Device, CliError> {
    let device_config = setup::load_device_config(global, true)?;
    Ok(Device::new(device_config)?)
}
