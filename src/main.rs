use clap::Parser;
use fitx_analyzer::{AnalyzerConfig, FetchMode, HashingModel, LocatorImageSource, OutfitAnalyzer};
use fitx_api::{AppState, RestApi};
use fitx_core::{GarmentPool, GarmentRecord, Occasion};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Outfit compatibility analyzer
#[derive(Parser, Debug)]
#[command(name = "fitx")]
#[command(about = "Recommend outfits from a garment inventory", long_about = None)]
struct Args {
    /// HTTP API port
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Log level, overridden by RUST_LOG when set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// JSON file with analyzer settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for anchor sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Image acquisition mode: sync or concurrent
    #[arg(long)]
    fetch_mode: Option<FetchMode>,

    /// Analyze a JSON array of garment records and print the recommendations instead of serving
    #[arg(short, long)]
    inventory: Option<PathBuf>,

    /// Occasion to filter the inventory by
    #[arg(long, requires = "inventory")]
    occasion: Option<Occasion>,
}

impl Args {
    fn analyzer_config(&self) -> anyhow::Result<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::from_json_file(path)?,
            None => AnalyzerConfig::default(),
        };
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(mode) = self.fetch_mode {
            config.fetch.mode = mode;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = args.analyzer_config()?;
    let model = Arc::new(HashingModel::default());
    let images = Arc::new(LocatorImageSource::new(&config.fetch));

    if let Some(path) = &args.inventory {
        let raw = std::fs::read_to_string(path)?;
        let records: Vec<GarmentRecord> = serde_json::from_str(&raw)?;
        info!("Loaded {} garments from {:?}", records.len(), path);

        let mode = config.fetch.mode;
        let occasion = args.occasion;
        let analyzer = Arc::new(OutfitAnalyzer::new(
            GarmentPool::new(records),
            model,
            images,
            config,
        )?);

        let recommendations = match mode {
            FetchMode::Sync => {
                tokio::task::spawn_blocking(move || analyzer.find_best_matches(occasion)).await?
            }
            FetchMode::Concurrent => {
                let prefetched = analyzer.prefetch_images(occasion).await;
                tokio::task::spawn_blocking(move || {
                    analyzer.find_best_matches_from(occasion, &prefetched)
                })
                .await?
            }
        };

        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    info!("Starting fitx v{}", env!("CARGO_PKG_VERSION"));
    info!("HTTP API port: {}", args.port);
    info!("Fetch mode: {:?}", config.fetch.mode);

    let state = AppState::new(model, images, config);
    let port = args.port;
    let http_handle = std::thread::spawn(move || {
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state, port).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    info!("HTTP API: http://localhost:{}/", port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
