use time::PrimitiveDateTime;

/// Latest row of `megawattdisplay_extended`, the YOKOGAWA logger feed.
#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct YokogawaReadingRow {
    pub unit7: Option<f64>,
    pub unit8: Option<f64>,
    pub wbsetcl: Option<f64>,
    pub frequency: Option<f64>,
    pub insertion_time: Option<PrimitiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct DcScheduleRow {
    pub block_no: Option<i64>,
    pub dcon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct SgScheduleRow {
    pub block_no: Option<i64>,
    pub sgon: Option<String>,
}
