//! Condition assessment controller.
//!
//! Fetches the client's conditions, runs one questionnaire per suspected or
//! high-risk condition in server order, keeps a local copy of each result as
//! it completes, and submits everything in one bulk save at the end. The
//! bulk save is best-effort: the flow moves on whatever its outcome.

use std::sync::Arc;

use jiff::Timestamp;
use kiosk_api::Backend;
use kiosk_api::requests::BulkQuestionnaireRequest;
use kiosk_core::models::{ConditionWithQuestionnaire, QuestionnaireAnswer, RiskLevel};
use kiosk_questionnaire::{Navigation, QuestionBank, QuestionnaireEngine, Step};
use kiosk_storage::{QuestionnaireRecord, SessionRepository};
use uuid::Uuid;

use crate::error::FlowError;
use crate::relevance::Relevance;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentState {
    Loading,
    /// Nothing to ask; both next and back are available.
    NoQuestionnairesNeeded,
    /// Running the questionnaire for the condition at this position.
    AwaitingAnswer(usize),
    Saving,
    Done,
}

/// What the screen should show after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentEvent {
    Question { condition: usize, question: usize },
    /// All done; the wizard should advance.
    Finished,
    /// Back from the very first question; the wizard should retreat.
    LeaveAssessment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based position of the current condition.
    pub position: usize,
    pub total: usize,
    pub percent: u8,
}

pub struct ConditionAssessment {
    client_id: String,
    session_id: Uuid,
    backend: Arc<dyn Backend>,
    repo: Arc<SessionRepository>,
    bank: Arc<QuestionBank>,
    relevance: Relevance,
    conditions: Vec<ConditionWithQuestionnaire>,
    state: AssessmentState,
    engine: Option<QuestionnaireEngine>,
}

impl ConditionAssessment {
    pub fn new(
        client_id: impl Into<String>,
        backend: Arc<dyn Backend>,
        repo: Arc<SessionRepository>,
        bank: Arc<QuestionBank>,
        relevance: Relevance,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            session_id: Uuid::new_v4(),
            backend,
            repo,
            bank,
            relevance,
            conditions: Vec::new(),
            state: AssessmentState::Loading,
            engine: None,
        }
    }

    pub fn state(&self) -> AssessmentState {
        self.state
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Conditions that get a questionnaire, in the order they are asked.
    pub fn conditions(&self) -> &[ConditionWithQuestionnaire] {
        &self.conditions
    }

    pub fn current_condition(&self) -> Option<&ConditionWithQuestionnaire> {
        match self.state {
            AssessmentState::AwaitingAnswer(i) => self.conditions.get(i),
            _ => None,
        }
    }

    /// The running questionnaire.
    pub fn engine(&self) -> Option<&QuestionnaireEngine> {
        self.engine.as_ref()
    }

    pub fn progress(&self) -> Option<Progress> {
        let AssessmentState::AwaitingAnswer(i) = self.state else {
            return None;
        };
        let total = self.conditions.len();
        let percent = ((i + 1) as f64 / total as f64 * 100.0).round() as u8;
        Some(Progress {
            position: i + 1,
            total,
            percent,
        })
    }

    /// Fetch the client's conditions and start the first questionnaire.
    ///
    /// A failed fetch is logged and treated as "nothing to ask".
    pub async fn load(&mut self) -> Result<AssessmentState, FlowError> {
        self.state = AssessmentState::Loading;
        self.engine = None;

        let fetched = match self.backend.arrhythmia_requests(&self.client_id).await {
            Ok(conditions) => conditions,
            Err(e) => {
                tracing::warn!(client_id = %self.client_id, error = %e, "failed to fetch conditions");
                Vec::new()
            }
        };
        self.relevance.check()?;

        let total = fetched.len();
        self.conditions = fetched
            .into_iter()
            .filter(|c| c.requires_questionnaire())
            .filter(|c| {
                let known = self.bank.contains(&c.arrhythmia_name);
                if !known {
                    tracing::warn!(condition = %c.arrhythmia_name, "no questionnaire for condition, skipping");
                }
                known
            })
            .collect();
        tracing::info!(
            client_id = %self.client_id,
            total,
            pending = self.conditions.len(),
            "conditions loaded"
        );

        if self.conditions.is_empty() {
            self.state = AssessmentState::NoQuestionnairesNeeded;
        } else {
            self.start_condition(0)?;
        }
        Ok(self.state)
    }

    fn start_condition(&mut self, index: usize) -> Result<AssessmentEvent, FlowError> {
        let name = &self.conditions[index].arrhythmia_name;
        self.engine = Some(QuestionnaireEngine::new(&self.bank, name)?);
        self.state = AssessmentState::AwaitingAnswer(index);
        tracing::debug!(condition = %name, position = index + 1, "questionnaire started");
        Ok(AssessmentEvent::Question {
            condition: index,
            question: 0,
        })
    }

    fn running(&mut self) -> Result<(usize, &mut QuestionnaireEngine), FlowError> {
        match (self.state, self.engine.as_mut()) {
            (AssessmentState::AwaitingAnswer(i), Some(engine)) => Ok((i, engine)),
            (state, _) => Err(FlowError::InvalidState(state_label(state))),
        }
    }

    /// Answer the current question with a canonical value.
    pub async fn answer(&mut self, value: &str) -> Result<AssessmentEvent, FlowError> {
        let (index, engine) = self.running()?;
        let step = engine.answer(value)?;
        self.after_step(index, step).await
    }

    /// Answer the current question by option position.
    pub async fn answer_option(&mut self, option: usize) -> Result<AssessmentEvent, FlowError> {
        let (index, engine) = self.running()?;
        let step = engine.answer_option(option)?;
        self.after_step(index, step).await
    }

    /// Move forward over an already answered question.
    pub async fn next_question(&mut self) -> Result<AssessmentEvent, FlowError> {
        let (index, engine) = self.running()?;
        let step = engine.next()?;
        self.after_step(index, step).await
    }

    async fn after_step(&mut self, index: usize, step: Step) -> Result<AssessmentEvent, FlowError> {
        match step {
            Step::Question(question) => Ok(AssessmentEvent::Question {
                condition: index,
                question,
            }),
            Step::Completed(outcome) => {
                let name = self.conditions[index].arrhythmia_name.clone();
                self.complete_questionnaire(
                    &name,
                    outcome.to_answers(),
                    outcome.score,
                    outcome.risk_level,
                )
                .await
            }
        }
    }

    /// Record a finished questionnaire on the condition called `name`, keep
    /// a local copy, then either start the next condition or bulk-save and
    /// finish.
    ///
    /// Only the condition whose questionnaire is running can be completed.
    pub async fn complete_questionnaire(
        &mut self,
        name: &str,
        answers: Vec<QuestionnaireAnswer>,
        score: i32,
        risk: RiskLevel,
    ) -> Result<AssessmentEvent, FlowError> {
        if !self.conditions.iter().any(|c| c.arrhythmia_name == name) {
            return Err(FlowError::UnknownCondition(name.to_string()));
        }
        let position = match self.state {
            AssessmentState::AwaitingAnswer(i) if self.conditions[i].arrhythmia_name == name => i,
            AssessmentState::AwaitingAnswer(_) => {
                return Err(FlowError::InvalidState("another questionnaire is running"));
            }
            state => return Err(FlowError::InvalidState(state_label(state))),
        };

        self.conditions[position].apply_result(answers, score, risk);
        self.save_locally(position);

        if position + 1 < self.conditions.len() {
            self.start_condition(position + 1)
        } else {
            self.finish().await
        }
    }

    fn save_locally(&self, position: usize) {
        let condition = &self.conditions[position];
        let record = QuestionnaireRecord {
            client_id: self.client_id.clone(),
            session_id: self.session_id,
            arrhythmia_name: condition.arrhythmia_name.clone(),
            questionnaire_risk_level: condition.questionnaire_risk_level.unwrap_or_default(),
            questionnaire_score: condition.questionnaire_score.unwrap_or_default(),
            answers: condition.answers.clone(),
            saved_at: Timestamp::now(),
        };
        if let Err(e) = self.repo.save_questionnaire(&record) {
            tracing::warn!(
                condition = %condition.arrhythmia_name,
                error = %e,
                "failed to keep questionnaire locally"
            );
        }
    }

    async fn finish(&mut self) -> Result<AssessmentEvent, FlowError> {
        self.state = AssessmentState::Saving;
        self.engine = None;

        let request = BulkQuestionnaireRequest::from_conditions(&self.conditions, Timestamp::now());
        if !request.is_empty() {
            match self.backend.save_questionnaires(&request).await {
                Ok(()) => tracing::info!(
                    client_id = %self.client_id,
                    saved = request.conditions.len(),
                    "questionnaires saved"
                ),
                Err(e) => tracing::warn!(
                    client_id = %self.client_id,
                    error = %e,
                    "bulk questionnaire save failed, results kept locally"
                ),
            }
        }

        self.state = AssessmentState::Done;
        self.relevance.check()?;
        Ok(AssessmentEvent::Finished)
    }

    /// Back one question, or to the previous condition from a first question.
    pub fn back(&mut self) -> Result<AssessmentEvent, FlowError> {
        match self.state {
            AssessmentState::Loading | AssessmentState::NoQuestionnairesNeeded => {
                Ok(AssessmentEvent::LeaveAssessment)
            }
            AssessmentState::AwaitingAnswer(_) => {
                let (index, engine) = self.running()?;
                match engine.back() {
                    Navigation::Question(question) => Ok(AssessmentEvent::Question {
                        condition: index,
                        question,
                    }),
                    Navigation::LeaveCondition => self.previous_condition(),
                }
            }
            state @ (AssessmentState::Saving | AssessmentState::Done) => {
                Err(FlowError::InvalidState(state_label(state)))
            }
        }
    }

    /// Restart the previous condition's questionnaire. From the first
    /// condition this asks the wizard to retreat. A result already recorded
    /// for that condition stays until it is completed again.
    pub fn previous_condition(&mut self) -> Result<AssessmentEvent, FlowError> {
        match self.state {
            AssessmentState::AwaitingAnswer(0)
            | AssessmentState::NoQuestionnairesNeeded
            | AssessmentState::Loading => Ok(AssessmentEvent::LeaveAssessment),
            AssessmentState::AwaitingAnswer(i) => self.start_condition(i - 1),
            state => Err(FlowError::InvalidState(state_label(state))),
        }
    }

    /// Continue past an assessment with nothing to ask. No bulk save.
    pub fn proceed(&mut self) -> Result<AssessmentEvent, FlowError> {
        match self.state {
            AssessmentState::NoQuestionnairesNeeded => {
                self.state = AssessmentState::Done;
                Ok(AssessmentEvent::Finished)
            }
            state => Err(FlowError::InvalidState(state_label(state))),
        }
    }
}

fn state_label(state: AssessmentState) -> &'static str {
    match state {
        AssessmentState::Loading => "loading",
        AssessmentState::NoQuestionnairesNeeded => "no questionnaires are needed",
        AssessmentState::AwaitingAnswer(_) => "a questionnaire is running",
        AssessmentState::Saving => "saving",
        AssessmentState::Done => "done",
    }
}
