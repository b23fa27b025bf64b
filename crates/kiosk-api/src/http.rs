//! Blocking `ureq` client driven from async code via `spawn_blocking`.

use std::time::Duration;

use kiosk_core::models::{ClientModel, ConditionWithQuestionnaire, ScanResult};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::{Backend, BoxFuture};
use crate::endpoint::Endpoint;
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::requests::{
    AddArrhythmiaRequest, AddOrUpdateClientRequest, AddScanResultRequest,
    BulkQuestionnaireRequest, EditClientRequest, EditHealthConcernRequest, SendReportRequest,
};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { agent, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    /// `GET` with a single query parameter.
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        param: &'static str,
        value: &str,
    ) -> Result<Envelope<T>, ApiError> {
        let agent = self.agent.clone();
        let url = self.url(endpoint);
        let value = value.to_string();
        tracing::debug!(%endpoint, "GET");

        let body = tokio::task::spawn_blocking(move || {
            let mut response = agent
                .get(&url)
                .query(param, &value)
                .call()
                .map_err(|e| ApiError::from_ureq(endpoint, e))?;
            response
                .body_mut()
                .read_json::<serde_json::Value>()
                .map_err(|e| ApiError::from_ureq(endpoint, e))
        })
        .await
        .map_err(|e| ApiError::Task(e.to_string()))??;

        Envelope::from_value(endpoint, body)
    }

    async fn submit<B, T>(&self, endpoint: Endpoint, req: &B) -> Result<Envelope<T>, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_value(req)?;
        let agent = self.agent.clone();
        let url = self.url(endpoint);
        tracing::debug!(%endpoint, "POST");

        let body = tokio::task::spawn_blocking(move || {
            let mut response = agent
                .post(&url)
                .send_json(&payload)
                .map_err(|e| ApiError::from_ureq(endpoint, e))?;
            response
                .body_mut()
                .read_json::<serde_json::Value>()
                .map_err(|e| ApiError::from_ureq(endpoint, e))
        })
        .await
        .map_err(|e| ApiError::Task(e.to_string()))??;

        Envelope::from_value(endpoint, body)
    }

    /// POST where only `IsSuccess` matters.
    async fn submit_unit<B: Serialize + Sync>(
        &self,
        endpoint: Endpoint,
        req: &B,
    ) -> Result<(), ApiError> {
        self.submit::<B, serde_json::Value>(endpoint, req)
            .await?
            .into_optional(endpoint)
            .map(|_| ())
    }
}

impl Backend for HttpBackend {
    fn add_or_update_client<'a>(
        &'a self,
        req: &'a AddOrUpdateClientRequest,
    ) -> BoxFuture<'a, Result<ClientModel, ApiError>> {
        Box::pin(async move {
            let endpoint = Endpoint::AddOrUpdateClient;
            self.submit(endpoint, req).await?.into_result(endpoint)
        })
    }

    fn edit_client<'a>(&'a self, req: &'a EditClientRequest) -> BoxFuture<'a, Result<(), ApiError>> {
        Box::pin(self.submit_unit(Endpoint::EditClient, req))
    }

    fn edit_health_concern<'a>(
        &'a self,
        req: &'a EditHealthConcernRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>> {
        Box::pin(self.submit_unit(Endpoint::EditClientHealthConcern, req))
    }

    fn get_client<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<ClientModel, ApiError>> {
        Box::pin(async move {
            let endpoint = Endpoint::GetClient;
            self.fetch(endpoint, "id", id).await?.into_result(endpoint)
        })
    }

    fn latest_scan_result<'a>(
        &'a self,
        client_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<ScanResult>, ApiError>> {
        Box::pin(async move {
            let endpoint = Endpoint::LatestScanResult;
            self.fetch(endpoint, "clientId", client_id)
                .await?
                .into_optional(endpoint)
        })
    }

    fn add_scan_result<'a>(
        &'a self,
        req: &'a AddScanResultRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>> {
        Box::pin(self.submit_unit(Endpoint::AddScanResult, req))
    }

    fn arrhythmia_requests<'a>(
        &'a self,
        client_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<ConditionWithQuestionnaire>, ApiError>> {
        Box::pin(async move {
            let endpoint = Endpoint::ArrhythmiaRequests;
            let conditions = self
                .fetch(endpoint, "clientId", client_id)
                .await?
                .into_optional(endpoint)?;
            Ok(conditions.unwrap_or_default())
        })
    }

    fn add_arrhythmia_request<'a>(
        &'a self,
        req: &'a AddArrhythmiaRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>> {
        Box::pin(self.submit_unit(Endpoint::AddArrhythmiaRequest, req))
    }

    fn save_questionnaires<'a>(
        &'a self,
        req: &'a BulkQuestionnaireRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>> {
        Box::pin(self.submit_unit(Endpoint::EditArrhythmiaQuestionnaire, req))
    }

    fn send_medical_report<'a>(
        &'a self,
        req: &'a SendReportRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>> {
        Box::pin(self.submit_unit(Endpoint::SendMedicalReport, req))
    }
}
