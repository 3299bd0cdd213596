use std::sync::Arc;

use axum::extract::FromRef;
use codeduel_core::{PgDatabase, Platform};

/// The platform as served over HTTP
pub type ServerPlatform = Platform<PgDatabase>;

#[derive(Clone, FromRef)]
pub struct ServerContext {
    pub platform: Arc<ServerPlatform>,
}
