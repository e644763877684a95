//! Concrete telemetry sources

mod replay;
mod simulated;

pub use replay::ReplaySource;
pub use simulated::SimulatedDevice;
