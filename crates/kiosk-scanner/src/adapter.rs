//! Turns SDK events into backend submissions.

use std::sync::Arc;

use kiosk_api::Backend;
use kiosk_api::requests::{AddArrhythmiaRequest, AddScanResultRequest};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::error::ScannerError;
use crate::lifecycle::SdkLifecycle;
use crate::sdk::{InitOptions, MeasurementConfig, ScanSdk, SdkEvent, SdkLoader};

#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub api_key: String,
    /// Kiosk front-end origin; the finished scan redirects here.
    pub host_url: String,
    /// How far back to collect beat intervals after a measurement.
    pub heartbeat_window_secs: u32,
    pub measurement: MeasurementConfig,
    pub init: InitOptions,
}

impl ScanSettings {
    pub fn new(api_key: impl Into<String>, host_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            host_url: host_url.into(),
            heartbeat_window_secs: 120,
            measurement: MeasurementConfig::default(),
            init: InitOptions::default(),
        }
    }

    /// Where the kiosk goes once the scan has been saved.
    pub fn redirect_url(&self) -> String {
        format!("{}/?ischecked=true", self.host_url.trim_end_matches('/'))
    }
}

/// Owns one SDK session for the face-scan screen.
///
/// Dropping the adapter releases the SDK if this adapter acquired it.
pub struct VitalsAdapter {
    loader: Arc<dyn SdkLoader>,
    backend: Arc<dyn Backend>,
    settings: ScanSettings,
    lifecycle: &'static SdkLifecycle,
    sdk: Option<Arc<dyn ScanSdk>>,
}

impl VitalsAdapter {
    pub fn new(loader: Arc<dyn SdkLoader>, backend: Arc<dyn Backend>, settings: ScanSettings) -> Self {
        Self {
            loader,
            backend,
            settings,
            lifecycle: SdkLifecycle::global(),
            sdk: None,
        }
    }

    pub fn with_lifecycle(mut self, lifecycle: &'static SdkLifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn is_running(&self) -> bool {
        self.sdk.is_some()
    }

    /// Load and initialize the SDK.
    ///
    /// Returns the event stream, or `None` when another screen already owns
    /// the SDK.
    pub async fn start(
        &mut self,
        client_id: Option<&str>,
    ) -> Result<Option<UnboundedReceiver<SdkEvent>>, ScannerError> {
        if !self.lifecycle.acquire() {
            tracing::debug!("scanner SDK already owned, skipping initialization");
            return Ok(None);
        }

        let sdk = match self.loader.load().await {
            Ok(sdk) => sdk,
            Err(e) => {
                self.lifecycle.mark_failed();
                tracing::error!(error = %e, "failed to load scanner SDK");
                return Err(e);
            }
        };

        let (tx, rx) = mpsc::unbounded_channel();
        if let Err(e) = sdk.initialize(&self.settings.api_key, client_id, &self.settings.init, tx) {
            self.lifecycle.mark_failed();
            tracing::error!(error = %e, "scanner SDK initialization failed");
            return Err(e);
        }

        self.lifecycle.mark_ready();
        self.sdk = Some(sdk);
        tracing::info!("scanner SDK ready");
        Ok(Some(rx))
    }

    fn sdk(&self) -> Result<&Arc<dyn ScanSdk>, ScannerError> {
        self.sdk.as_ref().ok_or(ScannerError::NotRunning)
    }

    /// React to one SDK event. Returns the redirect target once a finished
    /// measurement has been saved.
    pub async fn handle_event(
        &self,
        event: SdkEvent,
        client_id: &str,
    ) -> Result<Option<String>, ScannerError> {
        match event {
            SdkEvent::StartButtonClicked => {
                self.sdk()?.set_measurement_config(&self.settings.measurement)?;
                tracing::debug!(
                    duration_secs = self.settings.measurement.duration_secs,
                    "measurement config applied"
                );
                Ok(None)
            }
            SdkEvent::MeasurementFinished => {
                self.save_measurement(client_id).await?;
                Ok(Some(self.settings.redirect_url()))
            }
            SdkEvent::CameraError(message) => {
                tracing::warn!(%message, "scanner camera error");
                Err(ScannerError::Camera(message))
            }
        }
    }

    /// Pump events until a measurement has been saved.
    pub async fn run(
        &self,
        events: &mut UnboundedReceiver<SdkEvent>,
        client_id: &str,
    ) -> Result<String, ScannerError> {
        while let Some(event) = events.recv().await {
            if let Some(redirect) = self.handle_event(event, client_id).await? {
                return Ok(redirect);
            }
        }
        Err(ScannerError::ChannelClosed)
    }

    /// Snapshot the SDK's readings into a scan-result request.
    pub fn collect(&self, client_id: &str) -> Result<AddScanResultRequest, ScannerError> {
        let sdk = self.sdk()?;
        let summary = sdk.measurement_results().unwrap_or_default();
        let intervals = sdk
            .realtime_heartbeats(self.settings.heartbeat_window_secs)
            .into_iter()
            .map(|beat| beat.duration_ms)
            .collect();

        Ok(AddScanResultRequest {
            client_id: client_id.to_string(),
            heart_rate_10s: sdk.heart_rate_10s(),
            heart_rate_4s: sdk.heart_rate_4s(),
            realtime_heart_rate: sdk.realtime_heart_rate(),
            hrv_sdnn: sdk.realtime_hrv_sdnn(),
            cardiac_stress: sdk.realtime_cardiac_stress(),
            systolic_blood_pressure: summary.systolic_blood_pressure_mmhg,
            diastolic_blood_pressure: summary.diastolic_blood_pressure_mmhg,
            health_risks: sdk.health_risks(),
            breathing_rate: summary.breathing_rate_bpm,
            hrv_sdnn_ms: summary.hrv_sdnn_ms,
            systolic_blood_pressure_mmhg: summary.systolic_blood_pressure_mmhg,
            diastolic_blood_pressure_mmhg: summary.diastolic_blood_pressure_mmhg,
            heart_rate_intervals: intervals,
        })
    }

    async fn save_measurement(&self, client_id: &str) -> Result<(), ScannerError> {
        if client_id.is_empty() {
            return Err(ScannerError::MissingClientId);
        }
        let scan = self.collect(client_id)?;
        let beats = scan.heart_rate_intervals.len();

        if let Err(e) = self.backend.add_scan_result(&scan).await {
            tracing::error!(client_id, error = %e, "failed to save scan result");
            return Err(e.into());
        }

        let arrhythmia = AddArrhythmiaRequest {
            client_id: client_id.to_string(),
            inputs: vec![scan.heart_rate_intervals],
        };
        if let Err(e) = self.backend.add_arrhythmia_request(&arrhythmia).await {
            tracing::error!(client_id, error = %e, "failed to request arrhythmia analysis");
            return Err(e.into());
        }

        tracing::info!(client_id, beats, "scan saved");
        Ok(())
    }

    /// Tear the SDK down if this adapter owns it.
    pub fn stop(&mut self) {
        if let Some(sdk) = self.sdk.take()
            && self.lifecycle.release()
        {
            sdk.deinitialize();
            tracing::debug!("scanner SDK released");
        }
    }
}

impl Drop for VitalsAdapter {
    fn drop(&mut self) {
        self.stop();
    }
}
