use std::sync::Arc;

use seltrans_config::Config;
use seltrans_watcher::SharedPage;
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    /// The page the watcher draws on and the host script drives
    pub page: SharedPage,
}

impl AppState {
    pub fn new(config: Config, page: SharedPage) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            page,
        }
    }
}
