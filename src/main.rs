use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::info;
use mortality_dash::{AppState, DashboardConfig, DashboardData, ServerConfig, router};

#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

#[derive(Parser, Debug)]
#[command(name = "mortality-dash")]
#[command(about = "Interactive dashboard of mortality in Colombia, 2019")]
struct Args {
    /// Directory holding the processed CSV tables and the boundary GeoJSON
    #[arg(long, default_value = "ArchivosProcesados")]
    data_dir: PathBuf,

    /// Interface to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port for the web server
    #[arg(short, long, default_value_t = 8050)]
    port: u16,

    /// Field delimiter of the CSV tables
    #[arg(long, default_value_t = ';')]
    delimiter: char,

    /// Don't draw a progress bar while loading
    #[arg(long)]
    no_progress: bool,
}

impl Args {
    fn dashboard_config(&self) -> anyhow::Result<DashboardConfig> {
        let delimiter = u8::try_from(self.delimiter)
            .with_context(|| format!("delimiter {:?} is not a single byte", self.delimiter))?;
        let config = DashboardConfig {
            delimiter,
            show_progress: !self.no_progress,
            ..DashboardConfig::default()
        }
        .with_data_dir(&self.data_dir);
        config.validate()?;
        Ok(config)
    }

    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.dashboard_config()?;
    let server = args.server_config();

    info!("Loading dashboard data from: {}", config.data_dir.display());
    let start = Instant::now();
    let data = tokio::task::spawn_blocking(move || DashboardData::load(&config))
        .await
        .context("loading task panicked")?
        .context("failed to load the dashboard data")?;
    info!("Data loaded in {:?}", start.elapsed());

    let state = AppState::new(Arc::new(data))?;
    let app = router(state);

    let addr = server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Dashboard running at http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
