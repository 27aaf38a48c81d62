use std::sync::Arc;

use crate::{config::Config, database::Db};

pub struct AppState {
    pub config: Config,
    pub db: Db,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        let config = Config::load();
        let db = Db::open(&config.database_path).expect("Database misconfigured!");

        Arc::new(Self { config, db })
    }
}
