// src/main.rs - Operator CLI for the command-dispatch core
use clap::{Parser, Subcommand};

use gcode_dispatch::config::Config;
use gcode_dispatch::gcode::tool::TOOL_LABELS;
use gcode_dispatch::gcode::{Dispatcher, GCodeCommand};
use gcode_dispatch::printer::Printer;

#[derive(Parser)]
#[command(name = "gcode-dispatch", about = "G-code command dispatch core")]
struct Cli {
    /// Path to the printer configuration file
    #[arg(short, long, default_value = "printer.toml")]
    config: String,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// List registered G-code commands with their descriptions
    ListCommands,
    /// Print the description of a single command
    Describe { name: String },
    /// Dispatch one command by name against a fresh printer and report the
    /// resulting tool state
    Run { name: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config).map_err(|e| {
        tracing::error!("Failed to load config from '{}': {}", cli.config, e);
        e
    })?;
    tracing::info!(
        "Printer: {} ({} extruders)",
        if config.printer.printer_name.is_empty() {
            "Unknown"
        } else {
            config.printer.printer_name.as_str()
        },
        config.extruders.len()
    );

    let printer = Printer::new(&config);
    let mut dispatcher = Dispatcher::new(&config.dispatch);
    dispatcher.register_tools(&printer, TOOL_LABELS.len());

    match cli.command {
        CliCommand::ListCommands => {
            for (name, description) in dispatcher.descriptions() {
                println!("{:<8} {}", name, description);
            }
        }
        CliCommand::Describe { name } => match dispatcher.description_of(&name) {
            Some(description) => println!("{}", description),
            None => {
                tracing::error!("Unknown command: {}", name);
                return Err(format!("unknown command: {}", name).into());
            }
        },
        CliCommand::Run { name } => {
            dispatcher.dispatch(GCodeCommand::new(name)).await?;
            dispatcher.drain().await?;
            println!(
                "current_tool={} active_extruder={}",
                printer.current_tool().await,
                printer.active_extruder().await
            );
        }
    }

    Ok(())
}
