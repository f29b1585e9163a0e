/// One row of `abt_flow`, as decoded from the database.
#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct AbtFlowRow {
    pub unit_7: Option<f64>,
    pub unit_8: Option<f64>,
    pub block_no: Option<i64>,
    pub frequency: Option<f64>,
    pub act_sent_out: Option<f64>,
    pub gt_7: Option<f64>,
    pub gt_8: Option<f64>,
    pub st_7: Option<f64>,
    pub st_8: Option<f64>,
    pub sg_sch: Option<f64>,
    pub dc_sch: Option<f64>,
}

/// An ABT flow reading with every null register read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AbtFlow {
    pub unit_7: f64,
    pub unit_8: f64,
    pub block_no: i64,
    pub frequency: f64,
    pub act_sent_out: f64,
    pub gt_7: f64,
    pub gt_8: f64,
    pub st_7: f64,
    pub st_8: f64,
    pub sg_sch: f64,
    pub dc_sch: f64,
}

impl From<AbtFlowRow> for AbtFlow {
    fn from(r: AbtFlowRow) -> Self {
        AbtFlow {
            unit_7: r.unit_7.unwrap_or(0.0),
            unit_8: r.unit_8.unwrap_or(0.0),
            block_no: r.block_no.unwrap_or(0),
            frequency: r.frequency.unwrap_or(0.0),
            act_sent_out: r.act_sent_out.unwrap_or(0.0),
            gt_7: r.gt_7.unwrap_or(0.0),
            gt_8: r.gt_8.unwrap_or(0.0),
            st_7: r.st_7.unwrap_or(0.0),
            st_8: r.st_8.unwrap_or(0.0),
            sg_sch: r.sg_sch.unwrap_or(0.0),
            dc_sch: r.dc_sch.unwrap_or(0.0),
        }
    }
}
