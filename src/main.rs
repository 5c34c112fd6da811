use std::path::PathBuf;

use trilite::{app::TriliteApp, config::ViewerConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        log::info!("no model given, showing reference geometry only");
    }

    let config = ViewerConfig::default().with_asset_paths(paths);
    TriliteApp::new(config)?.run()
}
