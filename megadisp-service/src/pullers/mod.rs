//! Snapshot pullers, one per upstream feed.
//!
//! A puller opens its own connection, runs its lookups in order and either
//! returns a complete snapshot or a [`PullError`]. Nothing partial escapes:
//! callers turn an error into the default snapshot with
//! [`ReadingSnapshot::from_pull`](crate::snapshot::ReadingSnapshot::from_pull).

pub mod abt;
pub mod yokogawa;

use megadisp_client::{
    db::{StoreError, TelemetryStore},
    domain::SourceTag,
};
use time::OffsetDateTime;

use crate::snapshot::ReadingSnapshot;

pub use abt::pull_abt;
pub use yokogawa::pull_yokogawa;

#[derive(thiserror::Error, Debug)]
pub enum PullError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to format reading timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Pull from whichever feed `source` names.
///
/// `now` stamps ABT snapshots; YOKOGAWA carries its own insertion time.
pub async fn pull<S: TelemetryStore>(
    store: &S,
    source: SourceTag,
    now: OffsetDateTime,
) -> Result<ReadingSnapshot, PullError> {
    match source {
        SourceTag::Abt => pull_abt(store, now).await,
        SourceTag::Yokogawa => pull_yokogawa(store).await,
    }
}
