//! Step wizard: which screen is showing, and the session data every screen
//! reads and writes.
//!
//! The wizard is the single owner of [`UserData`]. Screens change it only
//! through [`StepWizard::merge`]; the confirmed client record (the
//! "snapshot") only through [`StepWizard::advance_with`] and
//! [`StepWizard::cache_record`].

use std::fmt;
use std::sync::Arc;

use kiosk_core::models::{ClientModel, ConfirmedRecord, UserData, UserDataPatch};
use kiosk_storage::SessionRepository;

/// The kiosk screens in order. Discriminants are the 1-based step numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Step {
    PersonalInfo = 1,
    AgeGender = 2,
    FaceScan = 3,
    ScanResults = 4,
    Complaint = 5,
    Assessment = 6,
    Summary = 7,
}

impl Step {
    pub const FIRST: Step = Step::PersonalInfo;
    pub const LAST: Step = Step::Summary;
    pub const COUNT: u8 = 7;

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Some(match n {
            1 => Self::PersonalInfo,
            2 => Self::AgeGender,
            3 => Self::FaceScan,
            4 => Self::ScanResults,
            5 => Self::Complaint,
            6 => Self::Assessment,
            7 => Self::Summary,
            _ => return None,
        })
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn prev(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PersonalInfo => "personal_info",
            Self::AgeGender => "age_gender",
            Self::FaceScan => "face_scan",
            Self::ScanResults => "scan_results",
            Self::Complaint => "complaint",
            Self::Assessment => "assessment",
            Self::Summary => "summary",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// An effective step change. No-ops never produce one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Step,
    pub to: Step,
    pub direction: Direction,
}

/// Told about every effective step change.
pub trait TransitionObserver: Send + Sync {
    fn on_transition(&self, transition: &Transition);
}

pub struct StepWizard {
    current: Step,
    data: UserData,
    snapshot: Option<ClientModel>,
    repo: Arc<SessionRepository>,
    observers: Vec<Arc<dyn TransitionObserver>>,
}

impl StepWizard {
    /// A fresh wizard on the first step with empty session data.
    pub fn new(repo: Arc<SessionRepository>) -> Self {
        Self {
            current: Step::FIRST,
            data: UserData::default(),
            snapshot: None,
            repo,
            observers: Vec::new(),
        }
    }

    pub fn observe(&mut self, observer: Arc<dyn TransitionObserver>) {
        self.observers.push(observer);
    }

    pub fn current(&self) -> Step {
        self.current
    }

    pub fn total_steps(&self) -> u8 {
        Step::COUNT
    }

    pub fn data(&self) -> &UserData {
        &self.data
    }

    pub fn repo(&self) -> &Arc<SessionRepository> {
        &self.repo
    }

    /// The cached confirmed client record, if any.
    pub fn snapshot(&self) -> Option<&ClientModel> {
        self.snapshot.as_ref()
    }

    /// The single write path for session data.
    pub fn merge(&mut self, patch: UserDataPatch) {
        self.data.merge(patch);
    }

    /// Next step. No-op on the last one.
    pub fn advance(&mut self) -> Option<Transition> {
        let next = self.current.next()?;
        Some(self.go(next, Direction::Forward))
    }

    /// Cache a record the backend just confirmed, then advance.
    pub fn advance_with(&mut self, confirmed: ConfirmedRecord) -> Option<Transition> {
        self.cache_record(confirmed.into_record());
        self.advance()
    }

    /// Previous step. No-op on the first one. Never calls the backend.
    pub fn retreat(&mut self) -> Option<Transition> {
        let prev = self.current.prev()?;
        Some(self.go(prev, Direction::Backward))
    }

    /// Jump straight to `step`. Jumping to the current step does nothing and
    /// notifies nobody. The step being left is not validated.
    pub fn jump_to(&mut self, step: Step) -> Option<Direction> {
        let direction = match step.cmp(&self.current) {
            std::cmp::Ordering::Equal => return None,
            std::cmp::Ordering::Greater => Direction::Forward,
            std::cmp::Ordering::Less => Direction::Backward,
        };
        Some(self.go(step, direction).direction)
    }

    fn go(&mut self, to: Step, direction: Direction) -> Transition {
        let transition = Transition {
            from: self.current,
            to,
            direction,
        };
        self.current = to;
        tracing::info!(from = %transition.from, to = %transition.to, "step changed");
        if to == Step::LAST {
            self.hydrate_snapshot();
        }
        for observer in &self.observers {
            observer.on_transition(&transition);
        }
        transition
    }

    /// Merge `record` into the cached snapshot and persist it for this
    /// session. A failed write is logged; the in-memory copy still updates.
    pub fn cache_record(&mut self, record: ClientModel) {
        match self.snapshot.as_mut() {
            Some(existing) => existing.merge(record),
            None => self.snapshot = Some(record),
        }
        if let Some(snapshot) = &self.snapshot
            && let Err(e) = self.repo.save_snapshot(snapshot)
        {
            tracing::warn!(error = %e, "failed to persist client snapshot");
        }
    }

    /// Pick up a snapshot persisted earlier in this session (for example
    /// before a restart). Also restores the client id into session data.
    pub fn hydrate_snapshot(&mut self) {
        if let Some(stored) = self.repo.snapshot() {
            self.snapshot = Some(stored);
        }
        if self.data.id.is_empty()
            && let Some(id) = self.repo.client_id()
        {
            self.data.id = id;
        }
    }

    /// The record the summary renders: the snapshot when present, otherwise
    /// one built from session data.
    pub fn summary_record(&self) -> ClientModel {
        match &self.snapshot {
            Some(snapshot) => snapshot.clone(),
            None => ClientModel::from_user_data(&self.data),
        }
    }

    /// Forget the snapshot once the report has been delivered.
    pub fn clear_snapshot(&mut self) {
        self.snapshot = None;
        if let Err(e) = self.repo.clear_snapshot() {
            tracing::warn!(error = %e, "failed to clear client snapshot");
        }
    }
}

/// Logs every transition at info level under the `kiosk::analytics` target.
#[derive(Debug, Default)]
pub struct LogObserver;

impl TransitionObserver for LogObserver {
    fn on_transition(&self, transition: &Transition) {
        tracing::info!(
            target: "kiosk::analytics",
            from = transition.from.number(),
            to = transition.to.number(),
            direction = ?transition.direction,
            "wizard transition"
        );
    }
}
