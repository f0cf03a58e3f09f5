use clap::{Parser, Subcommand};
use sage_core::SageConfig;
use sage_gateway::GatewayServer;
use std::path::PathBuf;
use tracing::info;

mod repl;

#[derive(Parser, Debug)]
#[command(name = "sage", author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "sage.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the completion gateway HTTP server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Chat in the terminal (default)
    Chat {
        /// Never contact a gateway; answer with local rules only
        #[arg(long)]
        local: bool,

        /// Run the gateway in-process instead of calling it over HTTP
        #[arg(long, conflicts_with = "local")]
        embedded: bool,

        /// Session id used to save and restore the session mode
        #[arg(long, default_value = "cli", env = "SAGE_SESSION")]
        session: String,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let mut config = SageConfig::load_or_default(&args.config);

    match args.command.unwrap_or(Command::Chat {
        local: false,
        embedded: false,
        session: "cli".to_string(),
    }) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.gateway.host = host;
            }
            if let Some(port) = port {
                config.gateway.port = port;
            }
            info!(
                "Starting gateway with provider '{}' (model {})",
                config.llm.provider, config.llm.model
            );
            GatewayServer::from_config(&config)?.serve().await
        }
        Command::Chat {
            local,
            embedded,
            session,
        } => {
            let target = if local {
                repl::Target::Local
            } else if embedded {
                repl::Target::Embedded
            } else {
                repl::Target::Http
            };
            repl::run(&config, target, &session).await
        }
    }
}
