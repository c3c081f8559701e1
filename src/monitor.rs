//! Per-device polling tasks
//!
//! Each monitored device gets one independent periodic task that asks the
//! host for a fresh reading and feeds it through the engine. Tasks share
//! nothing but the engine handle; stopping a monitor simply aborts its
//! task, with no cleanup ordering to respect.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::engine::{BatteryEngine, EngineHost};

/// Handle to one device's polling task
pub struct DeviceMonitor {
    device_id: String,
    handle: JoinHandle<()>,
}

impl DeviceMonitor {
    /// Spawn a polling task at the device's inferred cadence
    pub fn spawn<H: EngineHost + 'static>(
        engine: Arc<Mutex<BatteryEngine<H>>>,
        device_id: impl Into<String>,
    ) -> Self {
        let device_id = device_id.into();
        let id = device_id.clone();
        let handle = tokio::spawn(async move {
            let period = { engine.lock().await.poll_interval(&id) };
            run_poll_loop(engine, id, period).await;
        });
        Self { device_id, handle }
    }

    /// Spawn a polling task with an explicit interval
    pub fn spawn_with_interval<H: EngineHost + 'static>(
        engine: Arc<Mutex<BatteryEngine<H>>>,
        device_id: impl Into<String>,
        period: Duration,
    ) -> Self {
        let device_id = device_id.into();
        let id = device_id.clone();
        let handle =
            tokio::spawn(async move { run_poll_loop(engine, id, period).await });
        Self { device_id, handle }
    }

    /// The device this monitor polls
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Stop polling
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for DeviceMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run_poll_loop<H: EngineHost + 'static>(
    engine: Arc<Mutex<BatteryEngine<H>>>,
    device_id: String,
    period: Duration,
) {
    // First tick fires immediately, giving an initial poll on start
    let mut timer = interval(period);
    loop {
        timer.tick().await;

        // Call into the host without holding the engine lock
        let host = { engine.lock().await.host() };
        match host.fetch_reading(&device_id) {
            Some(reading) => {
                engine.lock().await.handle_reading(&device_id, reading);
            }
            None => debug!("no reading available for {} this poll", device_id),
        }
    }
}
