use std::fs;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use netsketch::export::{self, ExportFormat};
use netsketch::network::Network;
use netsketch::{estimate, server};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter network document (a single input layer) to a file
    Init {
        #[clap(short, long, default_value = "network.json")]
        output: String,
    },
    /// Print layer, parameter and FLOP figures for a saved network
    Summary {
        #[clap(short, long)]
        input: String,
    },
    /// Render a saved network as JSON, Graphviz or Mermaid
    Export {
        #[clap(short, long)]
        input: String,
        #[clap(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
        #[clap(short, long)]
        output: Option<String>,
    },
    Serve {
        #[clap(short, long, default_value = "3000")]
        port: u16,
        #[clap(short, long, default_value = "netsketch.db")]
        database: String,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    Init {
        #[clap(short, long, default_value = "netsketch.db")]
        database: String,
    },
    Migrate {
        #[clap(subcommand)]
        direction: server::MigrateDirection,
        #[clap(short, long, default_value = "netsketch.db")]
        database: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Init { output } => {
            info!("Writing starter network to {}", output);
            let network = Network::new("Untitled Network");
            let json = network.to_document().to_json_pretty()?;
            fs::write(&output, json)?;
        }
        Commands::Summary { input } => {
            let network = load_network(&input)?;
            print_summary(&network);
        }
        Commands::Export {
            input,
            format,
            output,
        } => {
            let network = load_network(&input)?;
            let rendered = export::render(&network, format)
                .map_err(|err| anyhow!("export failed: {}", err))?;
            match output {
                Some(path) => {
                    info!("Exporting {:?} to {}", format, path);
                    fs::write(&path, rendered)?;
                }
                None => println!("{}", rendered),
            }
        }
        Commands::Serve {
            port,
            database,
            cors_origin,
        } => {
            info!("Starting server on port {}", port);
            server::start_server(port, &database, cors_origin.as_deref()).await?;
        }
        Commands::Db { command } => match command {
            DbCommands::Init { database } => {
                info!("Initializing database: {}", database);
                server::migrate_database(&database, server::MigrateDirection::Up).await?;
            }
            DbCommands::Migrate {
                direction,
                database,
            } => {
                info!("Running database migration: {:?}", direction);
                server::migrate_database(&database, direction).await?;
            }
        },
    }

    Ok(())
}

fn load_network(path: &str) -> Result<Network> {
    let json = fs::read_to_string(path)?;
    let network = Network::import_json(&json)?;
    info!("Loaded {} ({})", path, network.stats());
    for problem in network.verify_integrity().err().unwrap_or_default() {
        tracing::warn!("{}: {}", path, problem);
    }
    Ok(network)
}

fn print_summary(network: &Network) {
    let summary = estimate::summarize(network);
    println!("Network: {}", network.name);
    println!("  Layers:     {}", summary.total_layers);
    println!("  Units:      {}", summary.unit_count);
    println!("  Parameters: {}", summary.total_parameters);
    for (kind, count) in &summary.kind_counts {
        println!("    {:<12} x{}", kind, count);
    }
    for layer in network.layers() {
        let figures = estimate::layer_figures(layer);
        println!(
            "  {:<28} params={:<10} flops={}",
            format!("{} ({})", layer.name, layer.id),
            figures.parameters,
            figures.flops
        );
    }
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("handlebars=off,{}", log_level)))
        .without_time()
        .init();
}
