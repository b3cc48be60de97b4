use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use phishguard::{
    config::Config,
    routes::{analyze::normalize_url, create_router},
    types::ErrorBody,
    utils::init_logger,
    Analyzer, AppState,
};

#[derive(Parser)]
#[command(name = "phishguard", version, about = "Analyze URLs for phishing risk")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Analyze a single URL and print the verdict as JSON
    Check {
        /// URL to analyze; `https://` is assumed when no scheme is given
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    if config.llm.api_key.is_empty() {
        warn!("No GEMINI_API_KEY/GOOGLE_API_KEY set; live analyses will be rejected by the model service");
    }

    let analyzer = Analyzer::from_config(&config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, analyzer).await,
        Command::Check { url } => check(&analyzer, &url).await,
    }
}

async fn serve(config: Config, analyzer: Analyzer) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = AppState { analyzer, config };

    let app = create_router(state);

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

async fn check(analyzer: &Analyzer, raw_url: &str) -> anyhow::Result<()> {
    let outcome = match normalize_url(raw_url) {
        Ok(url) => analyzer.analyze(&url).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            error!(kind = %e.kind(), "Analysis failed");
            eprintln!("{}", serde_json::to_string_pretty(&ErrorBody::from(&e))?);
            std::process::exit(1);
        }
    }
}
