use megadisp_client::{
    db::{TelemetryConn, TelemetryStore},
    domain::{AbtFlow, SourceTag},
};
use time::OffsetDateTime;

use super::PullError;
use crate::{
    format::{fixed2, percent_of, wall_clock},
    snapshot::{AbtMetrics, ReadingSnapshot},
};

/// Nameplate capacities in MW.
pub const UNIT_7_CAPACITY_MW: f64 = 300.0;
pub const UNIT_8_CAPACITY_MW: f64 = 250.0;
pub const STATION_CAPACITY_MW: f64 = 550.0;

/// Read the ABT flow row and derive a full snapshot stamped with `now`.
///
/// An empty table is not an error: the default snapshot comes back clean.
pub async fn pull_abt<S: TelemetryStore>(
    store: &S,
    now: OffsetDateTime,
) -> Result<ReadingSnapshot, PullError> {
    let row = {
        let mut conn = store.connect().await?;
        conn.abt_flow().await?
    };

    match row {
        Some(row) => Ok(derive_snapshot(AbtFlow::from(row), now)?),
        None => {
            tracing::debug!("abt_flow is empty");
            Ok(ReadingSnapshot::default_for(SourceTag::Abt))
        }
    }
}

/// Pure derivation of the ABT snapshot.
///
/// Rules:
/// - APC of a unit is `output - GT + ST`, zero while the unit is not generating.
/// - Station APC is `unit 7 + unit 8 - sent out`, zero while the station is idle.
/// - APC percentages are taken against the unit (or station) output and read
///   `-` while that output is not positive.
/// - PLF is output against nameplate capacity.
pub fn derive_snapshot(
    flow: AbtFlow,
    now: OffsetDateTime,
) -> Result<ReadingSnapshot, time::error::Format> {
    let seven = flow.unit_7;
    let eight = flow.unit_8;
    let station = seven + eight;

    let apc_7 = if seven > 0.0 { seven - flow.gt_7 + flow.st_7 } else { 0.0 };
    let apc_8 = if eight > 0.0 { eight - flow.gt_8 + flow.st_8 } else { 0.0 };
    let apc_total = if station > 0.0 { station - flow.act_sent_out } else { 0.0 };

    let (reading_date, reading_time) = wall_clock(now)?;

    Ok(ReadingSnapshot {
        seven: fixed2(seven),
        eight: fixed2(eight),
        block_no: flow.block_no,
        frequency: fixed2(flow.frequency),
        act_sent_out: fixed2(flow.act_sent_out),
        sg_sch: fixed2(flow.sg_sch),
        dc_sch: fixed2(flow.dc_sch),
        total: fixed2(station),
        abt: Some(AbtMetrics {
            gt_7: flow.gt_7,
            gt_8: flow.gt_8,
            st_7: flow.st_7,
            st_8: flow.st_8,
            apc_7: fixed2(apc_7),
            apc_8: fixed2(apc_8),
            apc_total: fixed2(apc_total),
            apc_7_p: percent_of(apc_7, seven),
            apc_8_p: percent_of(apc_8, eight),
            apc_total_p: percent_of(apc_total, station),
            plf_7: fixed2(seven * 100.0 / UNIT_7_CAPACITY_MW),
            plf_8: fixed2(eight * 100.0 / UNIT_8_CAPACITY_MW),
            plf_stn: fixed2(station * 100.0 / STATION_CAPACITY_MW),
        }),
        reading_date,
        reading_time,
        ..ReadingSnapshot::default_for(SourceTag::Abt)
    })
}
