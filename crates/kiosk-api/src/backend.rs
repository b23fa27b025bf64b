use std::future::Future;
use std::pin::Pin;

use kiosk_core::models::{ClientModel, ConditionWithQuestionnaire, ScanResult};

use crate::error::ApiError;
use crate::requests::{
    AddArrhythmiaRequest, AddOrUpdateClientRequest, AddScanResultRequest,
    BulkQuestionnaireRequest, EditClientRequest, EditHealthConcernRequest, SendReportRequest,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The kiosk backend. One method per endpoint; every method has already
/// unwrapped the response envelope.
pub trait Backend: Send + Sync {
    /// `POST /client/AddOrUpdateClient`. Returns the stored record with its
    /// server-issued `Id`.
    fn add_or_update_client<'a>(
        &'a self,
        req: &'a AddOrUpdateClientRequest,
    ) -> BoxFuture<'a, Result<ClientModel, ApiError>>;

    /// `POST /client/EditClient`.
    fn edit_client<'a>(&'a self, req: &'a EditClientRequest) -> BoxFuture<'a, Result<(), ApiError>>;

    /// `POST /client/EditClientHealthConcern`.
    fn edit_health_concern<'a>(
        &'a self,
        req: &'a EditHealthConcernRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>>;

    /// `GET /client/GetClient?id=`.
    fn get_client<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<ClientModel, ApiError>>;

    /// `GET /ScanResult/GetClientLatestScanResult?clientId=`. `None` when the
    /// client has not been scanned yet.
    fn latest_scan_result<'a>(
        &'a self,
        client_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<ScanResult>, ApiError>>;

    /// `POST /ScanResult/AddScanResult`.
    fn add_scan_result<'a>(
        &'a self,
        req: &'a AddScanResultRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>>;

    /// `GET /Arrhythmia/GetArrhythmiaRequests?clientId=`.
    fn arrhythmia_requests<'a>(
        &'a self,
        client_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<ConditionWithQuestionnaire>, ApiError>>;

    /// `POST /Arrhythmia/AddArrhythmiaRequest`.
    fn add_arrhythmia_request<'a>(
        &'a self,
        req: &'a AddArrhythmiaRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>>;

    /// `POST /Arrhythmia/EditArrhythmiaQuestionnaire`.
    fn save_questionnaires<'a>(
        &'a self,
        req: &'a BulkQuestionnaireRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>>;

    /// `POST /email/SendMedicalReport`.
    fn send_medical_report<'a>(
        &'a self,
        req: &'a SendReportRequest,
    ) -> BoxFuture<'a, Result<(), ApiError>>;
}
