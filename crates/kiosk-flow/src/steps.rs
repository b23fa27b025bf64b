//! What each data-entry screen does when the visitor presses next.
//!
//! Every action validates locally first, then talks to the backend, then
//! checks the screen is still mounted before touching the wizard. Backend
//! failures on these screens block the transition and come back as
//! [`FlowError::Api`] for the caller to show.

use jiff::Zoned;
use kiosk_api::Backend;
use kiosk_api::requests::{
    AddOrUpdateClientRequest, EditClientRequest, EditHealthConcernRequest, SendReportRequest,
};
use kiosk_core::complaint::ComplaintSelection;
use kiosk_core::models::{
    ClientModel, ConfirmedRecord, Gender, PersonalInfo, PersonalInfoPatch, ScanResult,
    UserDataPatch,
};
use kiosk_core::validation;

use crate::error::FlowError;
use crate::relevance::Relevance;
use crate::summary::HealthSummary;
use crate::wizard::{StepWizard, Transition};

pub const REPORT_SUBJECT: &str = "Your Health Check Summary";

/// The session's client id: session data first, then the stored id.
pub fn client_id(wizard: &StepWizard) -> Option<String> {
    let id = &wizard.data().id;
    if id.is_empty() {
        wizard.repo().client_id()
    } else {
        Some(id.clone())
    }
}

/// Personal info screen: create the client record and remember its id.
pub async fn submit_personal_info(
    wizard: &mut StepWizard,
    backend: &dyn Backend,
    relevance: &Relevance,
    info: PersonalInfo,
) -> Result<Option<Transition>, FlowError> {
    validation::validate_personal_info(&info)?;
    wizard.merge(UserDataPatch::personal_info(info));

    let req = AddOrUpdateClientRequest::from_user_data(wizard.data());
    let client = backend.add_or_update_client(&req).await.inspect_err(|e| {
        tracing::error!(error = %e, "failed to save personal info");
    })?;
    relevance.check()?;

    if client.id.is_empty() {
        return Err(FlowError::MissingClientId);
    }
    if let Err(e) = wizard.repo().set_client_id(&client.id) {
        tracing::warn!(error = %e, "failed to store client id");
    }
    wizard.merge(UserDataPatch {
        id: Some(client.id.clone()),
        ..Default::default()
    });
    tracing::info!(client_id = %client.id, "client saved");

    let confirmed = ConfirmedRecord::new(client)?;
    Ok(wizard.advance_with(confirmed))
}

/// Age/gender screen. An empty age is sent as `"0"`.
pub async fn submit_age_gender(
    wizard: &mut StepWizard,
    backend: &dyn Backend,
    relevance: &Relevance,
    age: u32,
    gender: Option<Gender>,
) -> Result<Option<Transition>, FlowError> {
    validation::validate_age_gender(age, gender)?;
    let id = client_id(wizard).ok_or(FlowError::MissingClientId)?;

    let patch = UserDataPatch {
        age: Some(age),
        gender,
        ..Default::default()
    };
    let mut pending = wizard.data().clone();
    pending.merge(patch.clone());

    let req = EditClientRequest::from_user_data(&id, &pending);
    backend.edit_client(&req).await.inspect_err(|e| {
        tracing::error!(client_id = %id, error = %e, "failed to save age and gender");
    })?;
    relevance.check()?;

    wizard.merge(patch);
    Ok(wizard.advance())
}

/// Scan results screen: pull the stored client and the latest scan back
/// into session data. Returns the scan, if the client has one.
pub async fn load_scan_results(
    wizard: &mut StepWizard,
    backend: &dyn Backend,
    relevance: &Relevance,
) -> Result<Option<ScanResult>, FlowError> {
    let id = client_id(wizard).ok_or(FlowError::MissingClientId)?;

    let client = backend.get_client(&id).await?;
    let scan = backend.latest_scan_result(&id).await?;
    relevance.check()?;

    wizard.merge(UserDataPatch {
        id: Some(id),
        age: Some(client.age),
        gender: Gender::parse(&client.gender),
        complaint: Some(client.health_concern.clone()),
        personal_info: Some(PersonalInfoPatch {
            full_name: Some(client.full_name.clone()),
            email: Some(client.email.clone()),
            phone: Some(client.phone.clone()),
            nationality_id: client.nationality_id.parse().ok(),
            // Both were required to create the record.
            consent: Some(true),
            agree: Some(true),
        }),
        vitals: scan.as_ref().map(|s| s.to_vitals().into()),
    });
    wizard.cache_record(client);
    Ok(scan)
}

/// Complaint screen. The snapshot is updated before the backend call so
/// the summary shows the complaint even if the call fails.
pub async fn submit_complaint(
    wizard: &mut StepWizard,
    backend: &dyn Backend,
    relevance: &Relevance,
    selection: &ComplaintSelection,
) -> Result<Option<Transition>, FlowError> {
    selection.validate()?;
    let id = client_id(wizard).ok_or(FlowError::MissingClientId)?;
    let concern = selection.to_health_concern();

    wizard.merge(UserDataPatch::complaint(concern.clone()));
    wizard.cache_record(ClientModel {
        id: id.clone(),
        health_concern: concern.clone(),
        ..Default::default()
    });

    let req = EditHealthConcernRequest {
        id,
        health_concern: concern,
    };
    backend.edit_health_concern(&req).await.inspect_err(|e| {
        tracing::error!(error = %e, "failed to save health concern");
    })?;
    relevance.check()?;

    Ok(wizard.advance())
}

/// Everything the summary screen shows. A failed scan fetch leaves the
/// vitals empty rather than failing the screen.
pub async fn health_summary(
    wizard: &mut StepWizard,
    backend: &dyn Backend,
    relevance: &Relevance,
) -> Result<HealthSummary, FlowError> {
    let scan = match client_id(wizard) {
        Some(id) => match backend.latest_scan_result(&id).await {
            Ok(scan) => scan,
            Err(e) => {
                tracing::warn!(client_id = %id, error = %e, "failed to fetch latest scan");
                None
            }
        },
        None => None,
    };
    relevance.check()?;

    wizard.hydrate_snapshot();
    Ok(HealthSummary::build(wizard.summary_record(), scan))
}

/// E-mail the report. The snapshot is cleared only once the backend
/// accepts it.
pub async fn send_summary_email(
    wizard: &mut StepWizard,
    backend: &dyn Backend,
    summary: &HealthSummary,
    at: &Zoned,
) -> Result<(), FlowError> {
    let receiver = summary.client.email.trim();
    if receiver.is_empty() {
        return Err(FlowError::MissingEmail);
    }

    let req = SendReportRequest {
        receiver: receiver.to_string(),
        subject: REPORT_SUBJECT.to_string(),
        report_data: summary.report(at),
    };
    backend.send_medical_report(&req).await.inspect_err(|e| {
        tracing::error!(error = %e, "failed to send report");
    })?;

    tracing::info!("report sent");
    wizard.clear_snapshot();
    Ok(())
}
