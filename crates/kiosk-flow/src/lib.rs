//! kiosk-flow
//!
//! The kiosk's screen flow: the step wizard that owns session data, the
//! per-condition assessment controller, the actions each screen performs
//! against the backend, and the data behind the final health summary.

pub mod assessment;
pub mod error;
pub mod relevance;
pub mod steps;
pub mod summary;
pub mod wizard;

pub use assessment::{AssessmentEvent, AssessmentState, ConditionAssessment, Progress};
pub use error::FlowError;
pub use relevance::Relevance;
pub use summary::{HealthSummary, VitalReading, VitalStatus};
pub use wizard::{Direction, Step, StepWizard, Transition, TransitionObserver};
