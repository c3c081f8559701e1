//! End-to-end tests for the battery estimation engine

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;

use cellgauge::{
    BatteryEngine, BatteryStatus, BatteryUpdate, EngineConfig, EngineHost, RawReading,
    ReadingSource,
};

/// Host stub that records every outbound update
struct RecordingHost {
    hint: Option<String>,
    configured: Option<String>,
    updates: Mutex<Vec<BatteryUpdate>>,
}

impl RecordingHost {
    fn new(hint: Option<&str>, configured: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            hint: hint.map(String::from),
            configured: configured.map(String::from),
            updates: Mutex::new(Vec::new()),
        })
    }

    fn updates(&self) -> Vec<BatteryUpdate> {
        self.updates.lock().unwrap().clone()
    }
}

impl EngineHost for RecordingHost {
    fn device_category_hint(&self, _device_id: &str) -> Option<String> {
        self.hint.clone()
    }

    fn configured_battery_type(&self, _device_id: &str) -> Option<String> {
        self.configured.clone()
    }

    fn fetch_reading(&self, _device_id: &str) -> Option<RawReading> {
        None
    }

    fn on_battery_update(&self, _device_id: &str, update: &BatteryUpdate) {
        self.updates.lock().unwrap().push(update.clone());
    }
}

fn expected_status(percentage: u8) -> BatteryStatus {
    match percentage {
        0 => BatteryStatus::Dead,
        1..=10 => BatteryStatus::Critical,
        11..=20 => BatteryStatus::Low,
        21..=80 => BatteryStatus::Medium,
        _ => BatteryStatus::Good,
    }
}

#[test]
fn coin_cell_voltage_scenario() {
    let host = RecordingHost::new(Some("contact sensor"), None);
    let mut engine = BatteryEngine::new(Arc::clone(&host), EngineConfig::default()).unwrap();

    // Fresh-ish coin cell at room temperature
    let update = engine
        .handle_reading("door-1", RawReading::new(2.90, ReadingSource::Voltage))
        .unwrap();
    assert_eq!(update.percentage, 85);
    assert_eq!(update.status, BatteryStatus::Good);

    // The cell is now nearly flat; the filter walks down at most 5 points
    // per update and the status tag flips exactly at the 20%/10% thresholds
    let mut last = update;
    for _ in 0..40 {
        let update = engine
            .handle_reading("door-1", RawReading::new(2.40, ReadingSource::Voltage))
            .unwrap();
        assert!(
            update.percentage <= last.percentage,
            "percentage rose while discharging"
        );
        assert!(last.percentage - update.percentage <= 5);
        assert_eq!(update.status, expected_status(update.percentage));
        last = update;
        if last.percentage == 8 {
            break;
        }
    }
    assert_eq!(last.percentage, 8);
    assert_eq!(last.status, BatteryStatus::Critical);

    // Every intermediate band was visited on the way down
    let seen: Vec<BatteryStatus> = {
        let mut statuses = Vec::new();
        for update in host.updates() {
            if statuses.last() != Some(&update.status) {
                statuses.push(update.status);
            }
        }
        statuses
    };
    assert_eq!(
        seen,
        vec![
            BatteryStatus::Good,
            BatteryStatus::Medium,
            BatteryStatus::Low,
            BatteryStatus::Critical,
        ]
    );
}

#[test]
fn battery_swap_passes_through_unfiltered() {
    let host = RecordingHost::new(None, None);
    let mut engine = BatteryEngine::new(Arc::clone(&host), EngineConfig::default()).unwrap();

    // Walk the device down to 10%
    engine.handle_reading("dev-1", RawReading::new(10.0, ReadingSource::VendorPercent));
    let update = engine
        .handle_reading("dev-1", RawReading::new(90.0, ReadingSource::VendorPercent))
        .unwrap();

    assert_eq!(update.percentage, 90);
    assert_eq!(update.status, BatteryStatus::Good);
}

#[test]
fn cold_device_does_not_report_falsely_low() {
    let host = RecordingHost::new(None, None);
    let mut engine = BatteryEngine::new(host, EngineConfig::default()).unwrap();

    let warm = engine
        .handle_reading("warm", RawReading::new(2.70, ReadingSource::Voltage))
        .unwrap();
    let cold = engine
        .handle_reading(
            "cold",
            RawReading::new(2.70, ReadingSource::Voltage).at_temperature(-10.0),
        )
        .unwrap();

    assert!(cold.percentage >= warm.percentage);
}

#[test]
fn custom_thresholds_move_the_status_flip() {
    let host = RecordingHost::new(None, None);
    let config = EngineConfig::default().with_thresholds(30, 15);
    let mut engine = BatteryEngine::new(host, config).unwrap();

    let update = engine
        .handle_reading("dev-1", RawReading::new(25.0, ReadingSource::VendorPercent))
        .unwrap();
    assert_eq!(update.status, BatteryStatus::Low);

    let mut engine2 = BatteryEngine::new(
        RecordingHost::new(None, None),
        EngineConfig::default(),
    )
    .unwrap();
    let update = engine2
        .handle_reading("dev-1", RawReading::new(25.0, ReadingSource::VendorPercent))
        .unwrap();
    assert_eq!(update.status, BatteryStatus::Medium);
}

#[test]
fn drain_metrics_withheld_without_a_decrease() {
    let host = RecordingHost::new(None, None);
    let mut engine = BatteryEngine::new(Arc::clone(&host), EngineConfig::default()).unwrap();

    let first = engine
        .handle_reading("dev-1", RawReading::new(60.0, ReadingSource::VendorPercent))
        .unwrap();
    assert_eq!(first.drain_rate_pct_per_day, None);
    assert_eq!(first.estimated_days_remaining, None);

    // A flat battery level yields no rate; the fields stay withheld
    let second = engine
        .handle_reading("dev-1", RawReading::new(60.0, ReadingSource::VendorPercent))
        .unwrap();
    assert_eq!(second.drain_rate_pct_per_day, None);
    assert_eq!(second.estimated_days_remaining, None);

    let snapshot = engine.snapshot("dev-1").unwrap();
    assert_eq!(snapshot.health.sample_count(), 2);
}

#[test]
fn malformed_readings_never_reach_the_host() {
    let host = RecordingHost::new(None, None);
    let mut engine = BatteryEngine::new(Arc::clone(&host), EngineConfig::default()).unwrap();

    assert_eq!(
        engine.handle_reading("dev-1", RawReading::new(f64::NAN, ReadingSource::VendorPercent)),
        None
    );
    assert_eq!(
        engine.handle_reading("dev-1", RawReading::new(-2.0, ReadingSource::Voltage)),
        None
    );
    assert_eq!(
        engine.handle_reading("dev-1", RawReading::new(7.0, ReadingSource::ChargeBand)),
        None
    );
    assert!(host.updates().is_empty());
}

#[test]
fn charge_band_device_reports_coarse_levels() {
    let host = RecordingHost::new(None, None);
    let mut engine = BatteryEngine::new(host, EngineConfig::default()).unwrap();

    let update = engine
        .handle_reading("sos-1", RawReading::new(2.0, ReadingSource::ChargeBand))
        .unwrap();
    assert_eq!(update.percentage, 100);
    assert_eq!(update.status, BatteryStatus::Good);
}

mod mocked_host {
    use super::*;
    use pretty_assertions::assert_eq;

    mockall::mock! {
        Host {}

        impl EngineHost for Host {
            fn device_category_hint(&self, device_id: &str) -> Option<String>;
            fn configured_battery_type(&self, device_id: &str) -> Option<String>;
            fn fetch_reading(&self, device_id: &str) -> Option<RawReading>;
            fn on_battery_update(&self, device_id: &str, update: &BatteryUpdate);
        }
    }

    #[test]
    fn host_receives_exactly_one_update_per_accepted_reading() {
        let mut mock = MockHost::new();
        mock.expect_configured_battery_type()
            .withf(|device_id| device_id == "sensor-7")
            .returning(|_| None);
        mock.expect_device_category_hint()
            .withf(|device_id| device_id == "sensor-7")
            .returning(|_| Some("climate monitor".to_string()));
        mock.expect_on_battery_update()
            .withf(|device_id, update| {
                device_id == "sensor-7"
                    && update.percentage == 75
                    && update.status == BatteryStatus::Medium
            })
            .times(1)
            .return_const(());

        let mut engine = BatteryEngine::new(Arc::new(mock), EngineConfig::default()).unwrap();
        let update = engine
            .handle_reading(
                "sensor-7",
                RawReading::new(150.0, ReadingSource::ProtocolPercent0to200),
            )
            .unwrap();
        assert_eq!(update.percentage, 75);
        assert_eq!(engine.snapshot("sensor-7").unwrap().battery_type, "2xAAA");
    }
}
