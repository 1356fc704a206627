use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::telemetry::TelemetryEvent;

pub const TELEMETRY_EVENT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEventJsonContractV1 {
    pub schema_version: u32,
    pub event: TelemetryEvent,
}

impl TelemetryEvent {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = TelemetryEventJsonContractV1 {
            schema_version: TELEMETRY_EVENT_JSON_SCHEMA_V1,
            event: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize telemetry contract v1: {e}"))
        })
    }

    /// Accepts either a bare event or a versioned envelope.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(event) = serde_json::from_str::<TelemetryEvent>(input) {
            return Ok(event);
        }
        let payload: TelemetryEventJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse telemetry json payload: {e}"))
        })?;
        if payload.schema_version != TELEMETRY_EVENT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported telemetry schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.event)
    }
}
