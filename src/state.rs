use std::sync::Arc;

use crate::config::Config;
use crate::db::DbPool;
use crate::notify::Notifier;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub notifier: Notifier,
}
