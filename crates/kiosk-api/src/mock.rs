//! In-memory backend for tests and offline demos.
//!
//! Behaves like a tiny backend: client edits update one stored record,
//! every call is recorded, and any endpoint can be scripted to fail at the
//! transport level or to answer `IsSuccess: false`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use kiosk_core::models::{ClientModel, ConditionWithQuestionnaire, ScanResult};
use serde::Serialize;

use crate::backend::{Backend, BoxFuture};
use crate::endpoint::Endpoint;
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::requests::{
    AddArrhythmiaRequest, AddOrUpdateClientRequest, AddScanResultRequest,
    BulkQuestionnaireRequest, EditClientRequest, EditHealthConcernRequest, SendReportRequest,
};

/// One recorded request.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub endpoint: Endpoint,
    pub body: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Connection-level error.
    Transport,
    /// HTTP 200 with `IsSuccess: false`.
    Rejected,
}

#[derive(Debug, Default)]
struct State {
    client_id: String,
    client: Option<ClientModel>,
    scan_result: Option<ScanResult>,
    conditions: Vec<ConditionWithQuestionnaire>,
    failures: HashMap<Endpoint, Failure>,
    calls: Vec<Call>,
}

#[derive(Debug, Default)]
pub struct MockBackend {
    state: Mutex<State>,
}

impl MockBackend {
    /// A backend that issues client id `"42"`.
    pub fn new() -> Self {
        Self::with_client_id("42")
    }

    pub fn with_client_id(id: &str) -> Self {
        let backend = Self::default();
        backend.state().client_id = id.to_string();
        backend
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_client(&self, client: ClientModel) {
        self.state().client = Some(client);
    }

    pub fn set_scan_result(&self, result: ScanResult) {
        self.state().scan_result = Some(result);
    }

    pub fn set_conditions(&self, conditions: Vec<ConditionWithQuestionnaire>) {
        self.state().conditions = conditions;
    }

    pub fn fail(&self, endpoint: Endpoint, failure: Failure) {
        self.state().failures.insert(endpoint, failure);
    }

    pub fn recover(&self, endpoint: Endpoint) {
        self.state().failures.remove(&endpoint);
    }

    pub fn client(&self) -> Option<ClientModel> {
        self.state().client.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn calls_to(&self, endpoint: Endpoint) -> Vec<Call> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .cloned()
            .collect()
    }

    pub fn count(&self, endpoint: Endpoint) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .count()
    }

    /// Record the call and apply any scripted failure. On success, `respond`
    /// builds the result from the current state.
    fn handle<B, T>(
        &self,
        endpoint: Endpoint,
        body: &B,
        respond: impl FnOnce(&mut State) -> Option<T>,
    ) -> Result<Option<T>, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut state = self.state();
        state.calls.push(Call {
            endpoint,
            body: serde_json::to_value(body)?,
        });
        let failure = state.failures.get(&endpoint).copied();
        let envelope = match failure {
            Some(Failure::Transport) => {
                return Err(ApiError::Transport {
                    endpoint,
                    message: "connection refused".to_string(),
                });
            }
            Some(Failure::Rejected) => Envelope::rejected(),
            None => Envelope {
                is_success: true,
                result: respond(&mut *state),
            },
        };
        envelope.into_optional(endpoint)
    }
}

impl Backend for MockBackend {
    fn add_or_update_client<'a>(
        &'a self,
        req: &'a AddOrUpdateClientRequest,
    ) -> BoxFuture<'a, Result<ClientModel, ApiError>> {
        let endpoint = Endpoint::AddOrUpdateClient;
        let result = self
            .handle(endpoint, req, |state| {
                let client = ClientModel {
                    id: state.client_id.clone(),
                    full_name: req.full_name.clone(),
                    user_name: req.username.clone(),
                    email: req.email.clone(),
                    phone: req.phone.clone(),
                    nationality_id: req
                        .nationality_id
                        .map(|n| n.to_string())
                        .unwrap_or_default(),
                    ..Default::default()
                };
                state.client = Some(client.clone());
                Some(client)
            })
            .and_then(|r| r.ok_or(ApiError::MissingResult { endpoint }));
        Box::pin(async move { result })
    }

    fn edit_client<'a>(&'a self, req: &'a EditClientRequest) -> BoxFuture<'a, Result<(), ApiError>> {
        let result = self.handle(Endpoint::EditClient, req, |state| {
            let client = state.client.get_or_insert_with(ClientModel::default);
            client.merge(ClientModel {
                id: req.id.clone(),
                full_name: req.full_name.clone(),
                user_name: req.username.clone(),
                email: req.email.clone(),
                phone: req.phone.clone(),
                age: req.age.parse().unwrap_or_default(),
                gender: req.gender.map(|g| g.as_str().to_string()).unwrap_or_default(),
                ..Default::default()
            });
            Some(())
        });
        Box::pin(async move { result.map(|_| ()) })
    }

    fn edit_health_concern<'a>(
        &'a self,
        req: &'a EditHealthConcernRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>> {
        let result = self.handle(Endpoint::EditClientHealthConcern, req, |state| {
            let client = state.client.get_or_insert_with(ClientModel::default);
            client.health_concern = req.health_concern.clone();
            Some(())
        });
        Box::pin(async move { result.map(|_| ()) })
    }

    fn get_client<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<ClientModel, ApiError>> {
        let endpoint = Endpoint::GetClient;
        let result = self
            .handle(endpoint, &serde_json::json!({ "id": id }), |state| {
                state.client.clone().filter(|c| c.id == id)
            })
            .and_then(|r| r.ok_or(ApiError::MissingResult { endpoint }));
        Box::pin(async move { result })
    }

    fn latest_scan_result<'a>(
        &'a self,
        client_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<ScanResult>, ApiError>> {
        let result = self.handle(
            Endpoint::LatestScanResult,
            &serde_json::json!({ "clientId": client_id }),
            |state| state.scan_result.clone(),
        );
        Box::pin(async move { result })
    }

    fn add_scan_result<'a>(
        &'a self,
        req: &'a AddScanResultRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>> {
        let result = self.handle(Endpoint::AddScanResult, req, |state| {
            state.scan_result = Some(ScanResult {
                heart_rate_10s: req.heart_rate_10s,
                heart_rate_4s: req.heart_rate_4s,
                real_time_heart_rate: req.realtime_heart_rate,
                hrv_sdnn_ms: req.hrv_sdnn_ms,
                breathing_rate: req.breathing_rate,
                cardiac_stress: req.cardiac_stress,
                systolic_blood_pressure_mmhg: req.systolic_blood_pressure_mmhg,
                diastolic_blood_pressure_mmhg: req.diastolic_blood_pressure_mmhg,
            });
            Some(())
        });
        Box::pin(async move { result.map(|_| ()) })
    }

    fn arrhythmia_requests<'a>(
        &'a self,
        client_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<ConditionWithQuestionnaire>, ApiError>> {
        let result = self.handle(
            Endpoint::ArrhythmiaRequests,
            &serde_json::json!({ "clientId": client_id }),
            |state| Some(state.conditions.clone()),
        );
        Box::pin(async move { result.map(Option::unwrap_or_default) })
    }

    fn add_arrhythmia_request<'a>(
        &'a self,
        req: &'a AddArrhythmiaRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>> {
        let result = self.handle(Endpoint::AddArrhythmiaRequest, req, |_| Some(()));
        Box::pin(async move { result.map(|_| ()) })
    }

    fn save_questionnaires<'a>(
        &'a self,
        req: &'a BulkQuestionnaireRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>> {
        let result = self.handle(Endpoint::EditArrhythmiaQuestionnaire, req, |_| Some(()));
        Box::pin(async move { result.map(|_| ()) })
    }

    fn send_medical_report<'a>(
        &'a self,
        req: &'a SendReportRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>> {
        let result = self.handle(Endpoint::SendMedicalReport, req, |_| Some(()));
        Box::pin(async move { result.map(|_| ()) })
    }
}
