pub mod api;
pub mod config;
pub mod session;
pub mod startup;
pub mod store;
pub mod uploads;

use config::Config;
use session::SessionStore;
use store::JsonStore;

pub struct AppState {
    pub config: Config,
    pub store: JsonStore,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = JsonStore::new(config.storage.data_dir.clone());
        Self {
            config,
            store,
            sessions: SessionStore::new(),
        }
    }
}
