use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rabbit_hole::api::{self, AppState};
use rabbit_hole::config::Config;
use rabbit_hole::overlay::{DetailOverlay, OverrideTarget};
use rabbit_hole::wiki::{SummaryFetcher, WikiClient};

#[derive(Parser)]
#[command(name = "rh")]
#[command(about = "Build a rabbit hole of annotated Wikipedia articles")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Port for HTTP API (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Prefix-search Wikipedia article titles
    Search { query: String },
    /// Print an article's summary
    Summary { title: String },
    /// Print an article's full plain text
    Article { title: String },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "rabbit_hole=debug,tower_http=debug".into()),
    );

    // Logs go to stderr so command output on stdout stays clean.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn serve(config: &Config, port: u16) -> anyhow::Result<()> {
    let client = WikiClient::from_config(config);
    tracing::info!("Using Wikipedia at {}", client.base_url());

    let app = api::create_router(AppState::new(client, config.debounce()));

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Rabbit hole listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config::load();

    match cli.command {
        Some(Commands::Serve { port }) => {
            serve(&config, port.unwrap_or(config.port)).await?;
        }
        Some(Commands::Search { query }) => {
            let client = WikiClient::from_config(&config);
            for result in client.try_search(&query).await? {
                if result.description.is_empty() {
                    println!("{}", result.title);
                } else {
                    println!("{} - {}", result.title, result.description);
                }
            }
        }
        Some(Commands::Summary { title }) => {
            let fetcher = SummaryFetcher::new(WikiClient::from_config(&config));
            let summary = fetcher.fetch_summary(&title).await;
            if let Some(error) = fetcher.error() {
                anyhow::bail!(error);
            }
            println!("{}\n\n{}", summary.title, summary.summary);
            if let Some(thumbnail) = summary.thumbnail {
                println!("\n{} ({}x{})", thumbnail.url, thumbnail.width, thumbnail.height);
            }
        }
        Some(Commands::Article { title }) => {
            let client = WikiClient::from_config(&config);
            let mut overlay = DetailOverlay::open(title, OverrideTarget::Pending);
            overlay.load(&client).await;
            println!("{}", overlay.content().unwrap_or_default());
        }
        None => {
            serve(&config, config.port).await?;
        }
    }

    Ok(())
}
