//! Integration tests for the sample collector against a mocked device

use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use pretty_assertions::assert_eq;

use battery_analyzer::error::AnalysisError;
use battery_analyzer::telemetry::{
    BatteryReading, SampleCollector, TelemetryError, TelemetrySource, MIN_SAMPLES,
};

mock! {
    pub Device {}

    #[async_trait]
    impl TelemetrySource for Device {
        fn is_connected(&self) -> bool;
        async fn read_battery(&self) -> Result<BatteryReading, TelemetryError>;
    }
}

fn fast_collector(sample_count: usize) -> SampleCollector {
    SampleCollector::new(sample_count, Duration::from_millis(1))
}

#[tokio::test]
async fn test_failure_on_sixth_read_keeps_first_five() {
    let mut device = MockDevice::new();
    device.expect_is_connected().times(1).return_const(true);

    let mut call = 0u16;
    device.expect_read_battery().times(6).returning(move || {
        call += 1;
        if call == 6 {
            Err(TelemetryError::Transport("link dropped".to_string()))
        } else {
            Ok(BatteryReading::new(4000 - call, 80))
        }
    });

    let collection = fast_collector(15).collect(&device).await.unwrap();

    let ordinals: Vec<usize> = collection.samples().iter().map(|s| s.ordinal).collect();
    assert_eq!(ordinals, vec![0, 1, 2, 3, 4]);
    assert_eq!(
        collection.stop_reason(),
        Some(&TelemetryError::Transport("link dropped".to_string()))
    );

    // Five samples is exactly enough to analyze
    assert_eq!(collection.require(MIN_SAMPLES).unwrap().len(), 5);
}

#[tokio::test]
async fn test_disconnected_device_is_never_read() {
    let mut device = MockDevice::new();
    device.expect_is_connected().times(1).return_const(false);
    device.expect_read_battery().never();

    let result = fast_collector(15).collect(&device).await;

    assert!(matches!(result, Err(AnalysisError::NotConnected)));
}

#[tokio::test]
async fn test_early_failure_fails_the_gate() {
    let mut device = MockDevice::new();
    device.expect_is_connected().return_const(true);

    let mut call = 0u16;
    device.expect_read_battery().times(3).returning(move || {
        call += 1;
        if call < 3 {
            Ok(BatteryReading::new(3900, 40))
        } else {
            Err(TelemetryError::Timeout)
        }
    });

    let collection = fast_collector(15).collect(&device).await.unwrap();
    assert_eq!(collection.len(), 2);

    match collection.require(MIN_SAMPLES) {
        Err(AnalysisError::InsufficientData {
            collected,
            required,
        }) => {
            assert_eq!(collected, 2);
            assert_eq!(required, MIN_SAMPLES);
        }
        other => panic!("Expected InsufficientData, got {:?}", other),
    }
}

#[tokio::test]
async fn test_interval_is_waited_between_reads() {
    let mut device = MockDevice::new();
    device.expect_is_connected().return_const(true);
    device
        .expect_read_battery()
        .times(4)
        .returning(|| Ok(BatteryReading::new(3950, 60)));

    let collector = SampleCollector::new(4, Duration::from_millis(20));
    let start = std::time::Instant::now();
    let collection = collector.collect(&device).await.unwrap();

    assert_eq!(collection.len(), 4);
    // Three pauses between four reads, none after the last
    assert!(start.elapsed() >= Duration::from_millis(60));
}

#[tokio::test]
async fn test_no_pause_after_terminating_failure() {
    let mut device = MockDevice::new();
    device.expect_is_connected().return_const(true);
    device
        .expect_read_battery()
        .times(1)
        .returning(|| Err(TelemetryError::Disconnected));

    let collector = SampleCollector::new(15, Duration::from_secs(30));
    let start = std::time::Instant::now();
    let collection = collector.collect(&device).await.unwrap();

    assert!(collection.is_empty());
    assert!(start.elapsed() < Duration::from_secs(5));
}
