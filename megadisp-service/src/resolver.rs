//! Picks the feed a request reads from.
//!
//! The operator's entry in `megadisp_source` wins. Without one, the YOKOGAWA
//! logger is used as soon as it has written anything. Lookup failures never
//! fail the request: they are logged and ABT is used.

use megadisp_client::{
    db::{StoreError, TelemetryConn, TelemetryStore},
    domain::SourceTag,
};

pub async fn resolve_source<S: TelemetryStore>(store: &S) -> SourceTag {
    match lookup(store).await {
        Ok(source) => {
            tracing::debug!(source = %source, "source resolved");
            metrics::counter!("megawatt_source_resolved_total", "source" => source.as_str())
                .increment(1);
            source
        }
        Err(e) => {
            tracing::error!(error = %e, "source lookup failed, falling back to ABT");
            metrics::counter!("megawatt_source_fallback_total").increment(1);
            SourceTag::Abt
        }
    }
}

async fn lookup<S: TelemetryStore>(store: &S) -> Result<SourceTag, StoreError> {
    let mut conn = store.connect().await?;

    if let Some(row) = conn.preferred_source().await? {
        return Ok(SourceTag::from_preference(row.source.as_deref()));
    }

    if conn.has_yokogawa_reading().await? {
        Ok(SourceTag::Yokogawa)
    } else {
        Ok(SourceTag::Abt)
    }
}
