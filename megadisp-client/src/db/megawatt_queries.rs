use async_trait::async_trait;
use sqlx::{pool::PoolConnection, PgConnection, PgPool, Postgres};

use super::{StoreError, TelemetryConn, TelemetryStore};
use crate::domain::{
    AbtFlowRow, DcScheduleRow, SgScheduleRow, SourcePreferenceRow, YokogawaReadingRow,
};

pub async fn preferred_source(
    conn: &mut PgConnection,
) -> Result<Option<SourcePreferenceRow>, sqlx::Error> {
    sqlx::query_as::<_, SourcePreferenceRow>(
        r#"
        SELECT source::text AS source
        FROM megadisp_source
        LIMIT 1
        "#,
    )
    .fetch_optional(conn)
    .await
}

pub async fn has_yokogawa_reading(conn: &mut PgConnection) -> Result<bool, sqlx::Error> {
    let hit = sqlx::query_scalar::<_, i32>("SELECT 1 FROM megawattdisplay_extended LIMIT 1")
        .fetch_optional(conn)
        .await?;

    Ok(hit.is_some())
}

/// Fetch the ABT flow row.
///
/// The table normally holds a single row for the running block. Should it
/// hold more, the highest block wins so repeated reads agree.
pub async fn abt_flow(conn: &mut PgConnection) -> Result<Option<AbtFlowRow>, sqlx::Error> {
    sqlx::query_as::<_, AbtFlowRow>(
        r#"
        SELECT
            unit_7::float8       AS unit_7,
            unit_8::float8       AS unit_8,
            block_no::int8       AS block_no,
            frequency::float8    AS frequency,
            act_sent_out::float8 AS act_sent_out,
            gt_7::float8         AS gt_7,
            gt_8::float8         AS gt_8,
            st_7::float8         AS st_7,
            st_8::float8         AS st_8,
            sg_sch::float8       AS sg_sch,
            dc_sch::float8       AS dc_sch
        FROM abt_flow
        ORDER BY block_no DESC NULLS LAST
        LIMIT 1
        "#,
    )
    .fetch_optional(conn)
    .await
}

pub async fn latest_yokogawa_reading(
    conn: &mut PgConnection,
) -> Result<Option<YokogawaReadingRow>, sqlx::Error> {
    sqlx::query_as::<_, YokogawaReadingRow>(
        r#"
        SELECT
            unit7::float8     AS unit7,
            unit8::float8     AS unit8,
            wbsetcl::float8   AS wbsetcl,
            frequency::float8 AS frequency,
            insertion_time::timestamp AS insertion_time
        FROM megawattdisplay_extended
        WHERE insertion_time IS NOT NULL
        ORDER BY insertion_time DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(conn)
    .await
}

pub async fn current_dc_schedule(
    conn: &mut PgConnection,
) -> Result<Option<DcScheduleRow>, sqlx::Error> {
    sqlx::query_as::<_, DcScheduleRow>(
        r#"
        SELECT block_no::int8 AS block_no, dcon::text AS dcon
        FROM block_data_dc
        WHERE block_no = get_block_no()
        LIMIT 1
        "#,
    )
    .fetch_optional(conn)
    .await
}

pub async fn current_sg_schedule(
    conn: &mut PgConnection,
) -> Result<Option<SgScheduleRow>, sqlx::Error> {
    sqlx::query_as::<_, SgScheduleRow>(
        r#"
        SELECT block_no::int8 AS block_no, sgon::text AS sgon
        FROM block_data_sg
        WHERE block_no = get_block_no()
        LIMIT 1
        "#,
    )
    .fetch_optional(conn)
    .await
}

/// Telemetry store backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgTelemetryStore {
    pool: PgPool,
}

impl PgTelemetryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// A pooled connection; returned to the pool on drop.
pub struct PgTelemetryConn {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl TelemetryStore for PgTelemetryStore {
    type Conn = PgTelemetryConn;

    async fn connect(&self) -> Result<Self::Conn, StoreError> {
        let conn = self.pool.acquire().await?;
        tracing::debug!(
            idle = self.pool.num_idle(),
            size = self.pool.size(),
            "acquired telemetry connection"
        );
        Ok(PgTelemetryConn { conn })
    }
}

#[async_trait]
impl TelemetryConn for PgTelemetryConn {
    async fn preferred_source(&mut self) -> Result<Option<SourcePreferenceRow>, StoreError> {
        Ok(preferred_source(&mut self.conn).await?)
    }

    async fn has_yokogawa_reading(&mut self) -> Result<bool, StoreError> {
        Ok(has_yokogawa_reading(&mut self.conn).await?)
    }

    async fn abt_flow(&mut self) -> Result<Option<AbtFlowRow>, StoreError> {
        Ok(abt_flow(&mut self.conn).await?)
    }

    async fn latest_yokogawa_reading(&mut self) -> Result<Option<YokogawaReadingRow>, StoreError> {
        Ok(latest_yokogawa_reading(&mut self.conn).await?)
    }

    async fn current_dc_schedule(&mut self) -> Result<Option<DcScheduleRow>, StoreError> {
        Ok(current_dc_schedule(&mut self.conn).await?)
    }

    async fn current_sg_schedule(&mut self) -> Result<Option<SgScheduleRow>, StoreError> {
        Ok(current_sg_schedule(&mut self.conn).await?)
    }
}
