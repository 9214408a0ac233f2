use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use anatomedia::connector::adapter::http;
use anatomedia::connector::api::{Container, ContainerConfig, Router};
use anatomedia::Commands;

#[derive(Parser)]
#[command(name = "anatomedia")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use the built-in anatomy lexicon instead of the GLiNER model
    #[arg(long, global = true, env = "ANATOMEDIA_LEXICON_EXTRACTOR")]
    lexicon_extractor: bool,

    /// HuggingFace id of the GLiNER ONNX export
    #[arg(long, global = true, env = "ANATOMEDIA_MODEL")]
    model: Option<String>,

    /// Local GLiNER ONNX model (requires --tokenizer-path)
    #[arg(long, global = true, requires = "tokenizer_path", env = "ANATOMEDIA_MODEL_PATH")]
    model_path: Option<PathBuf>,

    #[arg(long, global = true, requires = "model_path", env = "ANATOMEDIA_TOKENIZER_PATH")]
    tokenizer_path: Option<PathBuf>,

    /// JSON array of approved YouTube channel names
    #[arg(long, global = true, env = "ANATOMEDIA_CHANNELS")]
    channels: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ContainerConfig {
        lexicon_extractor: cli.lexicon_extractor,
        model: cli.model,
        model_path: cli.model_path,
        tokenizer_path: cli.tokenizer_path,
        channels: cli.channels,
    };
    let container = Container::new(&config)?;
    info!(
        "Extractor: {}, {} approved channels",
        container.extractor_name(),
        container.whitelist().len()
    );

    match cli.command {
        Commands::Serve { port, public } => {
            let ip = if public {
                IpAddr::V4(Ipv4Addr::UNSPECIFIED)
            } else {
                IpAddr::V4(Ipv4Addr::LOCALHOST)
            };
            http::serve(container.http_state(), SocketAddr::new(ip, port)).await?;
        }
        command => {
            let router = Router::new(&container);
            let output = router.route(command).await?;
            println!("{}", output);
        }
    }

    Ok(())
}
