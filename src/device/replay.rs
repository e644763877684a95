//! Replays recorded battery-info responses
//!
//! The recording is JSON lines, one device response per line:
//!
//! ```text
//! {"data":[160,15,80]}
//! {"data":[158,15,80]}
//! ```
//!
//! Lines that do not parse are logged and skipped. Payloads are decoded on
//! read, so a short payload fails that read rather than the load.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;
use crate::telemetry::{BatteryReading, TelemetryError, TelemetrySource};

/// One recorded device response
#[derive(Debug, Deserialize)]
struct RecordedResponse {
    data: Vec<u8>,
}

/// Telemetry source backed by a recording
#[derive(Debug)]
pub struct ReplaySource {
    payloads: Mutex<VecDeque<Vec<u8>>>,
    connected: bool,
}

impl ReplaySource {
    /// Load a recording from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let source = Self::from_json_lines(&contents);
        log::info!(
            "Loaded {} recorded responses from {}",
            source.remaining(),
            path.display()
        );
        Ok(source)
    }

    /// Parse a recording held in memory
    pub fn from_json_lines(contents: &str) -> Self {
        let mut payloads = VecDeque::new();

        for (line_number, line) in contents.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || !trimmed.starts_with('{') {
                continue;
            }
            match serde_json::from_str::<RecordedResponse>(trimmed) {
                Ok(response) => payloads.push_back(response.data),
                Err(e) => log::warn!(
                    "Skipping unparseable response on line {}: {}",
                    line_number + 1,
                    e
                ),
            }
        }

        Self {
            connected: !payloads.is_empty(),
            payloads: Mutex::new(payloads),
        }
    }

    /// Responses not yet replayed
    pub fn remaining(&self) -> usize {
        self.payloads.lock().map(|p| p.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TelemetrySource for ReplaySource {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn read_battery(&self) -> std::result::Result<BatteryReading, TelemetryError> {
        let payload = self
            .payloads
            .lock()
            .map_err(|_| TelemetryError::Transport("replay buffer poisoned".to_string()))?
            .pop_front()
            .ok_or(TelemetryError::Exhausted)?;

        log::debug!("Replaying payload {:02X?}", payload);
        BatteryReading::from_payload(&payload)
    }
}
