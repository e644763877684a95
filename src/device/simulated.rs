//! Deterministic stand-in for a real device

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::telemetry::{BatteryReading, TelemetryError, TelemetrySource};

/// Default starting voltage of a simulated cell
const DEFAULT_START_VOLTAGE_MV: u16 = 4000;

/// Default reported charge level
const DEFAULT_PERCENTAGE: u8 = 80;

/// Simulated battery whose voltage moves by a fixed step per read
#[derive(Debug)]
pub struct SimulatedDevice {
    start_voltage_mv: u16,
    voltage_step_mv: i32,
    percentage: u8,
    fail_on_read: Option<usize>,
    connected: AtomicBool,
    reads: AtomicUsize,
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new(DEFAULT_START_VOLTAGE_MV, DEFAULT_PERCENTAGE)
    }
}

impl SimulatedDevice {
    /// Create a connected device with a flat voltage
    pub fn new(start_voltage_mv: u16, percentage: u8) -> Self {
        Self {
            start_voltage_mv,
            voltage_step_mv: 0,
            percentage: percentage.min(100),
            fail_on_read: None,
            connected: AtomicBool::new(true),
            reads: AtomicUsize::new(0),
        }
    }

    /// Change voltage by `step_mv` on every read; negative drains
    pub fn with_voltage_step(mut self, step_mv: i32) -> Self {
        self.voltage_step_mv = step_mv;
        self
    }

    /// Make the `read`th read (1-based) and every later one fail
    pub fn with_failure_on_read(mut self, read: usize) -> Self {
        self.fail_on_read = Some(read);
        self
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Number of reads attempted so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn voltage_at(&self, index: usize) -> u16 {
        let voltage =
            i64::from(self.start_voltage_mv) + i64::from(self.voltage_step_mv) * index as i64;
        voltage.clamp(0, i64::from(u16::MAX)) as u16
    }
}

#[async_trait]
impl TelemetrySource for SimulatedDevice {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn read_battery(&self) -> Result<BatteryReading, TelemetryError> {
        let read = self.reads.fetch_add(1, Ordering::SeqCst) + 1;

        if !self.is_connected() {
            return Err(TelemetryError::Disconnected);
        }
        if self.fail_on_read.map_or(false, |fail_on| read >= fail_on) {
            log::debug!("Simulated read {} failing", read);
            return Err(TelemetryError::Timeout);
        }

        Ok(BatteryReading::new(self.voltage_at(read - 1), self.percentage))
    }
}
