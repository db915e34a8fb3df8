use std::sync::Arc;

use fitstudio_core::timezone::TimezoneProjector;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is `Copy`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fitstudio_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Projects stored class schedules out of the studio zone.
    pub projector: TimezoneProjector,
}

impl AppState {
    pub fn new(pool: fitstudio_db::DbPool, config: ServerConfig) -> Self {
        let projector = TimezoneProjector::new(config.studio_timezone);
        Self {
            pool,
            config: Arc::new(config),
            projector,
        }
    }
}
