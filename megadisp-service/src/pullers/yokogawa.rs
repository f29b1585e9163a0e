use megadisp_client::{
    db::{TelemetryConn, TelemetryStore},
    domain::{DcScheduleRow, SgScheduleRow, SourceTag, YokogawaReadingRow},
};

use super::PullError;
use crate::{
    format::{fixed2, reading_date, reading_time},
    snapshot::ReadingSnapshot,
};

/// Assemble a snapshot from the latest logger reading and the schedules of
/// the current block.
///
/// The three lookups run one after another on a single connection. A missing
/// row leaves its fields at their defaults; a failing lookup fails the pull.
pub async fn pull_yokogawa<S: TelemetryStore>(store: &S) -> Result<ReadingSnapshot, PullError> {
    let (reading, dc, sg) = {
        let mut conn = store.connect().await?;
        let reading = conn.latest_yokogawa_reading().await?;
        let dc = conn.current_dc_schedule().await?;
        let sg = conn.current_sg_schedule().await?;
        (reading, dc, sg)
    };

    tracing::debug!(
        has_reading = reading.is_some(),
        has_dc = dc.is_some(),
        has_sg = sg.is_some(),
        "yokogawa lookups complete"
    );

    Ok(assemble_snapshot(reading, dc, sg)?)
}

pub fn assemble_snapshot(
    reading: Option<YokogawaReadingRow>,
    dc: Option<DcScheduleRow>,
    sg: Option<SgScheduleRow>,
) -> Result<ReadingSnapshot, time::error::Format> {
    let reading = reading.unwrap_or_default();
    let unit7 = reading.unit7.unwrap_or(0.0);
    let unit8 = reading.unit8.unwrap_or(0.0);

    let (date, time) = match reading.insertion_time {
        Some(at) => (reading_date(at)?, reading_time(at)?),
        None => (String::new(), String::new()),
    };

    let defaults = ReadingSnapshot::default_for(SourceTag::Yokogawa);
    let (block_no, dc_sch) = match dc {
        Some(row) => (row.block_no.unwrap_or(0), schedule_or(row.dcon, &defaults.dc_sch)),
        None => (0, defaults.dc_sch.clone()),
    };
    let sg_sch = match sg {
        Some(row) => schedule_or(row.sgon, &defaults.sg_sch),
        None => defaults.sg_sch.clone(),
    };

    Ok(ReadingSnapshot {
        seven: fixed2(unit7),
        eight: fixed2(unit8),
        total: fixed2(unit7 + unit8),
        frequency: fixed2(reading.frequency.unwrap_or(0.0)),
        act_sent_out: fixed2(reading.wbsetcl.unwrap_or(0.0)),
        block_no,
        dc_sch,
        sg_sch,
        reading_date: date,
        reading_time: time,
        ..defaults
    })
}

// Schedules are shown exactly as stored; null, empty and zero show the default.
fn schedule_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty() && v.trim().parse::<f64>().map_or(true, |n| n != 0.0))
        .unwrap_or_else(|| default.to_string())
}
