pub mod config;
pub mod format;
pub mod metrics_server;
pub mod observability;
pub mod pullers;
pub mod resolver;
pub mod routes;
pub mod snapshot;

pub use routes::{router, AppState};
pub use snapshot::ReadingSnapshot;
