//! The reading snapshot returned to the dashboard.

use megadisp_client::domain::SourceTag;
use serde::{Serialize, Serializer};

use crate::format::NO_PERCENT;

const ZERO: &str = "0.00";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ErrorFlag {
    #[default]
    #[serde(rename = "F")]
    Clear,
    #[serde(rename = "T")]
    Raised,
}

/// Fields only the ABT feed carries: raw turbine registers plus the derived
/// auxiliary consumption and load factors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbtMetrics {
    #[serde(serialize_with = "register")]
    pub gt_7: f64,
    #[serde(serialize_with = "register")]
    pub gt_8: f64,
    #[serde(serialize_with = "register")]
    pub st_7: f64,
    #[serde(serialize_with = "register")]
    pub st_8: f64,
    pub apc_7: String,
    pub apc_8: String,
    pub apc_total: String,
    pub apc_7_p: String,
    pub apc_8_p: String,
    pub apc_total_p: String,
    pub plf_7: String,
    pub plf_8: String,
    pub plf_stn: String,
}

impl Default for AbtMetrics {
    fn default() -> Self {
        Self {
            gt_7: 0.0,
            gt_8: 0.0,
            st_7: 0.0,
            st_8: 0.0,
            apc_7: ZERO.to_string(),
            apc_8: ZERO.to_string(),
            apc_total: ZERO.to_string(),
            apc_7_p: NO_PERCENT.to_string(),
            apc_8_p: NO_PERCENT.to_string(),
            apc_total_p: NO_PERCENT.to_string(),
            plf_7: ZERO.to_string(),
            plf_8: ZERO.to_string(),
            plf_stn: ZERO.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingSnapshot {
    #[serde(rename = "errorFlag")]
    pub error_flag: ErrorFlag,
    pub source: SourceTag,
    pub seven: String,
    pub eight: String,
    pub block_no: i64,
    pub frequency: String,
    pub act_sent_out: String,
    pub sg_sch: String,
    pub dc_sch: String,
    pub total: String,
    /// Present for ABT snapshots only.
    #[serde(flatten)]
    pub abt: Option<AbtMetrics>,
    pub reading_date: String,
    pub reading_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReadingSnapshot {
    /// A fresh all-defaults snapshot for `source`.
    pub fn default_for(source: SourceTag) -> Self {
        Self {
            error_flag: ErrorFlag::Clear,
            source,
            seven: ZERO.to_string(),
            eight: ZERO.to_string(),
            block_no: 0,
            frequency: ZERO.to_string(),
            act_sent_out: ZERO.to_string(),
            sg_sch: ZERO.to_string(),
            dc_sch: ZERO.to_string(),
            total: ZERO.to_string(),
            abt: match source {
                SourceTag::Abt => Some(AbtMetrics::default()),
                SourceTag::Yokogawa => None,
            },
            reading_date: String::new(),
            reading_time: String::new(),
            error: None,
        }
    }

    /// Default snapshot flagged as failed.
    pub fn failed(source: SourceTag, message: impl Into<String>) -> Self {
        Self {
            error_flag: ErrorFlag::Raised,
            error: Some(message.into()),
            ..Self::default_for(source)
        }
    }

    /// Turn a pull outcome into what the dashboard receives.
    pub fn from_pull<E: std::fmt::Display>(source: SourceTag, outcome: Result<Self, E>) -> Self {
        match outcome {
            Ok(snapshot) => Self { source, ..snapshot },
            Err(e) => {
                tracing::error!(source = %source, error = %e, "reading pull failed");
                metrics::counter!("megawatt_pull_failed_total", "source" => source.as_str())
                    .increment(1);
                Self::failed(source, e.to_string())
            }
        }
    }
}

/// Body of the last-resort 500 response.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchFailure {
    #[serde(rename = "errorFlag")]
    pub error_flag: ErrorFlag,
    pub error: String,
}

impl DispatchFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error_flag: ErrorFlag::Raised,
            error: message.into(),
        }
    }
}

// Whole register values go out as JSON integers, anything else as a float.
fn register<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn abt_default_carries_sentinels() {
        let snap = ReadingSnapshot::default_for(SourceTag::Abt);
        let v = serde_json::to_value(&snap).unwrap();

        assert_eq!(v["errorFlag"], "F");
        assert_eq!(v["source"], "ABT");
        assert_eq!(v["seven"], "0.00");
        assert_eq!(v["block_no"], 0);
        assert_eq!(v["gt_7"], 0);
        assert_eq!(v["apc_7_p"], "-");
        assert_eq!(v["apc_total_p"], "-");
        assert_eq!(v["plf_stn"], "0.00");
        assert_eq!(v["reading_date"], "");
        assert!(v.get("error").is_none());
    }

    #[test]
    fn yokogawa_snapshot_omits_abt_fields() {
        let v = serde_json::to_value(ReadingSnapshot::default_for(SourceTag::Yokogawa)).unwrap();
        let obj = v.as_object().unwrap();

        assert_eq!(v["source"], "YOKOGAWA");
        for key in ["gt_7", "st_8", "apc_7", "apc_total_p", "plf_7", "plf_stn"] {
            assert!(!obj.contains_key(key), "{key} should be absent");
        }
        assert_eq!(obj.len(), 12);
    }

    #[test]
    fn failed_snapshot_keeps_defaults_and_message() {
        let v = serde_json::to_value(ReadingSnapshot::failed(SourceTag::Abt, "ORA-12541: no listener"))
            .unwrap();

        assert_eq!(v["errorFlag"], "T");
        assert_eq!(v["error"], "ORA-12541: no listener");
        assert_eq!(v["total"], "0.00");
        assert_eq!(v["apc_8_p"], "-");
    }

    #[test]
    fn from_pull_translates_errors_and_stamps_source() {
        let ok: Result<ReadingSnapshot, String> = Ok(ReadingSnapshot::default_for(SourceTag::Abt));
        assert_eq!(ReadingSnapshot::from_pull(SourceTag::Abt, ok).error_flag, ErrorFlag::Clear);

        let err: Result<ReadingSnapshot, String> = Err("boom".to_string());
        let snap = ReadingSnapshot::from_pull(SourceTag::Yokogawa, err);
        assert_eq!(snap, ReadingSnapshot::failed(SourceTag::Yokogawa, "boom"));
    }

    #[test]
    fn registers_serialize_like_plain_numbers() {
        let metrics = AbtMetrics {
            gt_7: 10.0,
            gt_8: 8.5,
            ..AbtMetrics::default()
        };
        let v = serde_json::to_value(metrics).unwrap();
        assert_eq!(v["gt_7"], json!(10));
        assert_eq!(v["gt_8"], json!(8.5));
        assert!(matches!(v["gt_7"], Value::Number(ref n) if n.is_i64()));
    }

    #[test]
    fn dispatch_failure_shape() {
        let v = serde_json::to_value(DispatchFailure::new("task panicked")).unwrap();
        assert_eq!(v, json!({ "errorFlag": "T", "error": "task panicked" }));
    }
}
