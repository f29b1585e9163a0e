//! In-memory telemetry store.
//!
//! Mirrors the SQL lookups row for row and can be told to fail, either as an
//! unreachable database or on a single query. Used by the service tests and
//! for running the endpoint without a database.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;

use super::{Query, StoreError, TelemetryConn, TelemetryStore};
use crate::domain::{
    AbtFlowRow, DcScheduleRow, SgScheduleRow, SourcePreferenceRow, YokogawaReadingRow,
};

#[derive(Debug, Clone, Default)]
pub struct MemoryTables {
    pub preferred_sources: Vec<SourcePreferenceRow>,
    pub abt_flow: Vec<AbtFlowRow>,
    pub yokogawa_readings: Vec<YokogawaReadingRow>,
    pub dc_schedule: Vec<DcScheduleRow>,
    pub sg_schedule: Vec<SgScheduleRow>,
    /// Value `get_block_no` returns.
    pub current_block_no: i64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryTelemetryStore {
    tables: Arc<MemoryTables>,
    unreachable: Option<String>,
    failing: Option<(Query, String)>,
    open: Arc<AtomicUsize>,
}

impl MemoryTelemetryStore {
    pub fn new(tables: MemoryTables) -> Self {
        Self {
            tables: Arc::new(tables),
            ..Self::default()
        }
    }

    /// Every `connect` fails with `message`.
    pub fn unreachable(mut self, message: impl Into<String>) -> Self {
        self.unreachable = Some(message.into());
        self
    }

    /// `query` fails with `message`; everything else answers normally.
    pub fn failing_on(mut self, query: Query, message: impl Into<String>) -> Self {
        self.failing = Some((query, message.into()));
        self
    }

    /// Connections handed out and not yet dropped.
    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

pub struct MemoryTelemetryConn {
    tables: Arc<MemoryTables>,
    failing: Option<(Query, String)>,
    open: Arc<AtomicUsize>,
}

impl MemoryTelemetryConn {
    fn check(&self, query: Query) -> Result<(), StoreError> {
        match &self.failing {
            Some((q, message)) if *q == query => Err(StoreError::Unavailable(message.clone())),
            _ => Ok(()),
        }
    }
}

impl Drop for MemoryTelemetryConn {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl TelemetryStore for MemoryTelemetryStore {
    type Conn = MemoryTelemetryConn;

    async fn connect(&self) -> Result<Self::Conn, StoreError> {
        if let Some(message) = &self.unreachable {
            return Err(StoreError::Unavailable(message.clone()));
        }

        self.open.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryTelemetryConn {
            tables: Arc::clone(&self.tables),
            failing: self.failing.clone(),
            open: Arc::clone(&self.open),
        })
    }
}

#[async_trait]
impl TelemetryConn for MemoryTelemetryConn {
    async fn preferred_source(&mut self) -> Result<Option<SourcePreferenceRow>, StoreError> {
        self.check(Query::PreferredSource)?;
        Ok(self.tables.preferred_sources.first().cloned())
    }

    async fn has_yokogawa_reading(&mut self) -> Result<bool, StoreError> {
        self.check(Query::YokogawaExists)?;
        Ok(!self.tables.yokogawa_readings.is_empty())
    }

    async fn abt_flow(&mut self) -> Result<Option<AbtFlowRow>, StoreError> {
        self.check(Query::AbtFlow)?;
        // Highest block first, null blocks last; first row on ties.
        let mut best: Option<&AbtFlowRow> = None;
        for row in &self.tables.abt_flow {
            best = match best {
                Some(b) if b.block_no >= row.block_no => Some(b),
                _ => Some(row),
            };
        }
        Ok(best.cloned())
    }

    async fn latest_yokogawa_reading(&mut self) -> Result<Option<YokogawaReadingRow>, StoreError> {
        self.check(Query::LatestYokogawaReading)?;
        let mut best: Option<&YokogawaReadingRow> = None;
        for row in self.tables.yokogawa_readings.iter().filter(|r| r.insertion_time.is_some()) {
            best = match best {
                Some(b) if b.insertion_time >= row.insertion_time => Some(b),
                _ => Some(row),
            };
        }
        Ok(best.cloned())
    }

    async fn current_dc_schedule(&mut self) -> Result<Option<DcScheduleRow>, StoreError> {
        self.check(Query::DcSchedule)?;
        let block = self.tables.current_block_no;
        Ok(self
            .tables
            .dc_schedule
            .iter()
            .find(|r| r.block_no == Some(block))
            .cloned())
    }

    async fn current_sg_schedule(&mut self) -> Result<Option<SgScheduleRow>, StoreError> {
        self.check(Query::SgSchedule)?;
        let block = self.tables.current_block_no;
        Ok(self
            .tables
            .sg_schedule
            .iter()
            .find(|r| r.block_no == Some(block))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn abt(block_no: Option<i64>, unit_7: f64) -> AbtFlowRow {
        AbtFlowRow {
            block_no,
            unit_7: Some(unit_7),
            ..AbtFlowRow::default()
        }
    }

    #[tokio::test]
    async fn abt_flow_prefers_highest_block_and_puts_nulls_last() {
        let store = MemoryTelemetryStore::new(MemoryTables {
            abt_flow: vec![abt(None, 1.0), abt(Some(4), 2.0), abt(Some(9), 3.0), abt(Some(9), 4.0)],
            ..MemoryTables::default()
        });

        let mut conn = store.connect().await.unwrap();
        let row = conn.abt_flow().await.unwrap().unwrap();
        assert_eq!(row.block_no, Some(9));
        assert_eq!(row.unit_7, Some(3.0));
    }

    #[tokio::test]
    async fn latest_reading_ignores_rows_without_insertion_time() {
        let store = MemoryTelemetryStore::new(MemoryTables {
            yokogawa_readings: vec![
                YokogawaReadingRow {
                    unit7: Some(1.0),
                    insertion_time: Some(datetime!(2024-03-01 10:00:00)),
                    ..YokogawaReadingRow::default()
                },
                YokogawaReadingRow {
                    unit7: Some(2.0),
                    insertion_time: None,
                    ..YokogawaReadingRow::default()
                },
                YokogawaReadingRow {
                    unit7: Some(3.0),
                    insertion_time: Some(datetime!(2024-03-01 10:15:00)),
                    ..YokogawaReadingRow::default()
                },
            ],
            ..MemoryTables::default()
        });

        let mut conn = store.connect().await.unwrap();
        let row = conn.latest_yokogawa_reading().await.unwrap().unwrap();
        assert_eq!(row.unit7, Some(3.0));
        assert!(conn.has_yokogawa_reading().await.unwrap());
    }

    #[tokio::test]
    async fn schedules_are_matched_on_current_block() {
        let store = MemoryTelemetryStore::new(MemoryTables {
            current_block_no: 42,
            dc_schedule: vec![
                DcScheduleRow { block_no: Some(41), dcon: Some("100".into()) },
                DcScheduleRow { block_no: Some(42), dcon: Some("120.5".into()) },
            ],
            sg_schedule: vec![SgScheduleRow { block_no: Some(41), sgon: Some("90".into()) }],
            ..MemoryTables::default()
        });

        let mut conn = store.connect().await.unwrap();
        let dc = conn.current_dc_schedule().await.unwrap().unwrap();
        assert_eq!(dc.dcon.as_deref(), Some("120.5"));
        assert!(conn.current_sg_schedule().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failure_injection_and_connection_accounting() {
        let store = MemoryTelemetryStore::default().failing_on(Query::AbtFlow, "ORA-00942");

        {
            let mut conn = store.connect().await.unwrap();
            assert_eq!(store.open_connections(), 1);
            let err = conn.abt_flow().await.unwrap_err();
            assert_eq!(err.to_string(), "ORA-00942");
            assert!(conn.preferred_source().await.unwrap().is_none());
        }
        assert_eq!(store.open_connections(), 0);

        let down = MemoryTelemetryStore::default().unreachable("connection refused");
        assert!(matches!(down.connect().await, Err(StoreError::Unavailable(_))));
        assert_eq!(down.open_connections(), 0);
    }
}
