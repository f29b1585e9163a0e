//! Database access for the megawatt display.
//!
//! Every lookup runs on a [`TelemetryConn`] obtained from a
//! [`TelemetryStore`]. Connections are released when dropped, so a caller
//! that bails out early through `?` still hands its connection back.

pub mod megawatt_queries;
#[cfg(any(test, feature = "testkit"))]
pub mod memory;

use async_trait::async_trait;

use crate::domain::{
    AbtFlowRow, DcScheduleRow, SgScheduleRow, SourcePreferenceRow, YokogawaReadingRow,
};

pub use megawatt_queries::PgTelemetryStore;
#[cfg(any(test, feature = "testkit"))]
pub use memory::MemoryTelemetryStore;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Unavailable(String),
}

/// The read-only lookups issued against the telemetry schema; names the
/// query to fail in the in-memory store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    PreferredSource,
    YokogawaExists,
    AbtFlow,
    LatestYokogawaReading,
    DcSchedule,
    SgSchedule,
}

#[async_trait]
pub trait TelemetryStore: Send + Sync {
    type Conn: TelemetryConn;

    async fn connect(&self) -> Result<Self::Conn, StoreError>;
}

#[async_trait]
pub trait TelemetryConn: Send {
    /// First row of the preferred-source table, if any.
    async fn preferred_source(&mut self) -> Result<Option<SourcePreferenceRow>, StoreError>;

    /// Whether the YOKOGAWA extended-reading table holds at least one row.
    async fn has_yokogawa_reading(&mut self) -> Result<bool, StoreError>;

    async fn abt_flow(&mut self) -> Result<Option<AbtFlowRow>, StoreError>;

    /// Row with the greatest non-null insertion time.
    async fn latest_yokogawa_reading(&mut self) -> Result<Option<YokogawaReadingRow>, StoreError>;

    /// DC schedule for the block returned by `get_block_no`.
    async fn current_dc_schedule(&mut self) -> Result<Option<DcScheduleRow>, StoreError>;

    /// SG schedule for the block returned by `get_block_no`.
    async fn current_sg_schedule(&mut self) -> Result<Option<SgScheduleRow>, StoreError>;
}
