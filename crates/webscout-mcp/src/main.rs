use anyhow::Result;
use clap::{Parser, Subcommand};
use webscout::Dispatcher;
use webscout_core::Config;

#[derive(Parser, Debug)]
#[command(name = "webscout", version, about = "Web search and content extraction tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Invoke an operation by name with JSON parameters.
    Call {
        /// Operation name (see `webscout tools`).
        name: String,
        /// JSON object of parameters, e.g. '{"query":"rust"}'.
        #[arg(long, default_value = "")]
        params: String,
    },
    /// Print the operation catalog.
    Tools,
    /// Print the tool descriptor.
    Info,
    /// Run the health probe and print the report.
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Logs go to stderr; stdout carries only the JSON payloads.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let dispatcher = Dispatcher::new(config)?;

    let payload = match cli.command {
        Commands::Call { name, params } => dispatcher.invoke_raw(&name, &params).await,
        Commands::Tools => serde_json::to_value(webscout::dispatch::catalog())?,
        Commands::Info => dispatcher.tool_info(),
        Commands::Health => dispatcher.health().await,
    };

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
