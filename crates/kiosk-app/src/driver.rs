//! Terminal kiosk driver.
//!
//! Renders each wizard step as a prompt sequence on a line-oriented
//! terminal and hands the answers to the step actions in `kiosk-flow`.
//! Typing `back` at any prompt returns to the previous step, and `goto N`
//! revisits any step reached so far. A session ends
//! when the summary is dismissed or times out; the next one starts fresh.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use jiff::Zoned;
use kiosk_api::Backend;
use kiosk_core::complaint::{COMMON_COMPLAINTS, ComplaintSelection};
use kiosk_core::language::Language;
use kiosk_core::models::{Gender, PersonalInfo};
use kiosk_flow::steps;
use kiosk_flow::summary::SUMMARY_TIMEOUT_SECS;
use kiosk_flow::wizard::LogObserver;
use kiosk_flow::{
    AssessmentEvent, AssessmentState, ConditionAssessment, FlowError, HealthSummary, Relevance,
    Step, StepWizard, VitalStatus,
};
use kiosk_questionnaire::QuestionBank;
use kiosk_scanner::{ScanSettings, SdkLoader, VitalsAdapter};
use kiosk_storage::SessionRepository;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

const BACK: &str = "back";
const GOTO: &str = "goto";

/// One line of visitor input.
enum Answer {
    Text(String),
    Back,
    GoTo(Step),
    Closed,
}

/// What a screen asks the session loop to do next.
enum Screen {
    /// Show the current step again.
    Stay,
    /// The wizard has already moved.
    Moved,
    Back,
    Jump(Step),
    Finished,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Completed,
    InputClosed,
}

macro_rules! text {
    ($answer:expr) => {
        match $answer {
            Answer::Text(text) => text,
            Answer::Back => return Ok(Screen::Back),
            Answer::GoTo(step) => return Ok(Screen::Jump(step)),
            Answer::Closed => return Ok(Screen::Closed),
        }
    };
}

pub struct Kiosk<R, W> {
    input: Lines<R>,
    out: W,
    backend: Arc<dyn Backend>,
    repo: Arc<SessionRepository>,
    bank: Arc<QuestionBank>,
    scanner: Option<Arc<dyn SdkLoader>>,
    scan_settings: ScanSettings,
    language: Language,
    summary_timeout: Duration,
}

impl<R, W> Kiosk<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(
        input: R,
        out: W,
        backend: Arc<dyn Backend>,
        repo: Arc<SessionRepository>,
        bank: Arc<QuestionBank>,
        scan_settings: ScanSettings,
    ) -> Self {
        Self {
            input: input.lines(),
            out,
            backend,
            repo,
            bank,
            scanner: None,
            scan_settings,
            language: Language::En,
            summary_timeout: Duration::from_secs(SUMMARY_TIMEOUT_SECS),
        }
    }

    pub fn with_scanner(mut self, loader: Arc<dyn SdkLoader>) -> Self {
        self.scanner = Some(loader);
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_summary_timeout(mut self, timeout: Duration) -> Self {
        self.summary_timeout = timeout;
        self
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Serve sessions until input runs out.
    pub async fn run(&mut self) -> eyre::Result<()> {
        while self.run_session().await? == SessionEnd::Completed {
            tracing::info!("session finished, resetting kiosk");
        }
        Ok(())
    }

    /// One visitor, from personal info to the summary.
    pub async fn run_session(&mut self) -> eyre::Result<SessionEnd> {
        self.repo.begin_session();
        let mut wizard = StepWizard::new(self.repo.clone());
        wizard.observe(Arc::new(LogObserver));
        tracing::info!("session started");

        let mut reached = wizard.current();
        loop {
            let step = wizard.current();
            reached = reached.max(step);
            writeln!(
                self.out,
                "\n[{}/{}] {}",
                step.number(),
                wizard.total_steps(),
                step_title(step)
            )?;

            let screen = match step {
                Step::PersonalInfo => self.personal_info(&mut wizard).await?,
                Step::AgeGender => self.age_gender(&mut wizard).await?,
                Step::FaceScan => self.face_scan(&mut wizard).await?,
                Step::ScanResults => self.scan_results(&mut wizard).await?,
                Step::Complaint => self.complaint(&mut wizard).await?,
                Step::Assessment => self.assessment(&mut wizard).await?,
                Step::Summary => self.summary(&mut wizard).await?,
            };

            match screen {
                Screen::Stay | Screen::Moved => {}
                Screen::Back => {
                    wizard.retreat();
                }
                Screen::Jump(target) if target <= reached => {
                    wizard.jump_to(target);
                }
                Screen::Jump(target) => {
                    writeln!(self.out, "  ! Step {} has not been reached yet", target.number())?;
                }
                Screen::Finished => return Ok(SessionEnd::Completed),
                Screen::Closed => return Ok(SessionEnd::InputClosed),
            }
        }
    }

    async fn ask(&mut self, prompt: &str) -> eyre::Result<Answer> {
        write!(self.out, "{prompt}: ")?;
        self.out.flush()?;
        Ok(to_answer(self.input.next_line().await?))
    }

    fn show_error(&mut self, error: &FlowError) -> eyre::Result<()> {
        match error {
            FlowError::Validation(errors) => {
                for (field, issue) in errors.iter() {
                    writeln!(self.out, "  ! {field:?} {issue}")?;
                }
            }
            other => writeln!(self.out, "  ! {other}")?,
        }
        Ok(())
    }

    /// Map a step action's result onto the session loop.
    fn settle<T>(&mut self, result: Result<Option<T>, FlowError>) -> eyre::Result<Screen> {
        match result {
            Ok(Some(_)) => Ok(Screen::Moved),
            Ok(None) => Ok(Screen::Stay),
            Err(e) => {
                self.show_error(&e)?;
                Ok(Screen::Stay)
            }
        }
    }

    async fn personal_info(&mut self, wizard: &mut StepWizard) -> eyre::Result<Screen> {
        let full_name = text!(self.ask("Full name").await?);
        let email = text!(self.ask("E-mail").await?);
        let phone = text!(self.ask("Phone (optional)").await?);
        let nationality = text!(self.ask("Nationality id").await?);
        let consent = text!(self.ask("I consent to the health check (y/n)").await?);
        let agree = text!(self.ask("I agree to the terms (y/n)").await?);

        let info = PersonalInfo {
            full_name: full_name.trim().to_string(),
            email: email.trim().to_string(),
            phone: phone.trim().to_string(),
            nationality_id: nationality.trim().parse().ok(),
            consent: is_yes(&consent),
            agree: is_yes(&agree),
        };
        let result =
            steps::submit_personal_info(wizard, self.backend.as_ref(), &Relevance::new(), info)
                .await;
        self.settle(result)
    }

    async fn age_gender(&mut self, wizard: &mut StepWizard) -> eyre::Result<Screen> {
        let age = text!(self.ask("Age (optional)").await?);
        let gender = text!(self.ask("Gender (male/female)").await?);

        let age = match age.trim() {
            "" => 0,
            value => match value.parse() {
                Ok(age) => age,
                Err(_) => {
                    writeln!(self.out, "  ! Age must be a whole number")?;
                    return Ok(Screen::Stay);
                }
            },
        };
        let result = steps::submit_age_gender(
            wizard,
            self.backend.as_ref(),
            &Relevance::new(),
            age,
            Gender::parse(&gender),
        )
        .await;
        self.settle(result)
    }

    async fn face_scan(&mut self, wizard: &mut StepWizard) -> eyre::Result<Screen> {
        let Some(loader) = self.scanner.clone() else {
            writeln!(self.out, "Face scanner is not available on this kiosk.")?;
            text!(self.ask("Press enter to continue").await?);
            wizard.advance();
            return Ok(Screen::Moved);
        };
        text!(self.ask("Press enter to start the face scan").await?);

        let Some(client_id) = steps::client_id(wizard) else {
            self.show_error(&FlowError::MissingClientId)?;
            return Ok(Screen::Stay);
        };
        let mut adapter =
            VitalsAdapter::new(loader, self.backend.clone(), self.scan_settings.clone());
        let mut events = match adapter.start(Some(&client_id)).await {
            Ok(Some(events)) => events,
            Ok(None) => {
                writeln!(self.out, "  ! The scanner is busy, try again")?;
                return Ok(Screen::Stay);
            }
            Err(e) => {
                writeln!(self.out, "  ! {e}")?;
                return Ok(Screen::Stay);
            }
        };

        writeln!(self.out, "Look at the camera and press start on the scanner.")?;
        match adapter.run(&mut events, &client_id).await {
            Ok(redirect) => {
                tracing::debug!(%redirect, "scan complete");
                adapter.stop();
                writeln!(self.out, "Scan saved.")?;
                wizard.advance();
                Ok(Screen::Moved)
            }
            Err(e) => {
                adapter.stop();
                writeln!(self.out, "  ! {e}")?;
                Ok(Screen::Stay)
            }
        }
    }

    async fn scan_results(&mut self, wizard: &mut StepWizard) -> eyre::Result<Screen> {
        let scan = match steps::load_scan_results(wizard, self.backend.as_ref(), &Relevance::new())
            .await
        {
            Ok(scan) => scan,
            Err(e) => {
                self.show_error(&e)?;
                None
            }
        };
        match scan {
            Some(scan) => {
                let summary = HealthSummary::build(wizard.summary_record(), Some(scan));
                self.print_vitals(&summary)?;
            }
            None => writeln!(self.out, "No scan results yet.")?,
        }

        text!(self.ask("Press enter to continue").await?);
        wizard.advance();
        Ok(Screen::Moved)
    }

    async fn complaint(&mut self, wizard: &mut StepWizard) -> eyre::Result<Screen> {
        for (i, (_, value)) in COMMON_COMPLAINTS.iter().enumerate() {
            writeln!(self.out, "  {}. {value}", i + 1)?;
        }
        let picked = text!(self.ask("Complaints (numbers, comma separated)").await?);

        let mut selection = ComplaintSelection::default();
        for part in picked.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| COMMON_COMPLAINTS.get(i))
            {
                Some((key, _)) if !selection.selected.iter().any(|k| k == key) => {
                    selection.toggle(key)
                }
                Some(_) => {}
                None => {
                    writeln!(self.out, "  ! Unknown complaint: {part}")?;
                    return Ok(Screen::Stay);
                }
            }
        }
        if selection.has_other() {
            selection.other_text = text!(self.ask("Describe your complaint").await?);
        }

        let result =
            steps::submit_complaint(wizard, self.backend.as_ref(), &Relevance::new(), &selection)
                .await;
        self.settle(result)
    }

    async fn assessment(&mut self, wizard: &mut StepWizard) -> eyre::Result<Screen> {
        let Some(client_id) = steps::client_id(wizard) else {
            self.show_error(&FlowError::MissingClientId)?;
            return Ok(Screen::Back);
        };
        let mut assessment = ConditionAssessment::new(
            client_id,
            self.backend.clone(),
            self.repo.clone(),
            self.bank.clone(),
            Relevance::new(),
        );

        if assessment.load().await? == AssessmentState::NoQuestionnairesNeeded {
            writeln!(self.out, "No follow-up questions needed.")?;
            text!(self.ask("Press enter to continue").await?);
            assessment.proceed()?;
            wizard.advance();
            return Ok(Screen::Moved);
        }

        loop {
            let Some(engine) = assessment.engine() else {
                return Ok(Screen::Stay);
            };
            let question = engine.current_question();
            let labels: Vec<String> = question
                .option_labels(self.language)
                .into_iter()
                .map(str::to_string)
                .collect();
            let header = match assessment.progress() {
                Some(p) => format!(
                    "{} ({}/{}, {}%) question {}/{}",
                    engine.title(self.language),
                    p.position,
                    p.total,
                    p.percent,
                    engine.current_index() + 1,
                    engine.question_count()
                ),
                None => engine.title(self.language).to_string(),
            };
            let text = question.text(self.language).to_string();

            writeln!(self.out, "{header}\n{text}")?;
            for (i, label) in labels.iter().enumerate() {
                writeln!(self.out, "  {}. {label}", i + 1)?;
            }

            let event = match self.ask("Answer").await? {
                Answer::Closed => return Ok(Screen::Closed),
                Answer::GoTo(step) => return Ok(Screen::Jump(step)),
                Answer::Back => assessment.back(),
                Answer::Text(answer) => match answer.trim().parse::<usize>() {
                    Ok(n) if n >= 1 => assessment.answer_option(n - 1).await,
                    _ => assessment.answer(answer.trim()).await,
                },
            };

            match event {
                Ok(AssessmentEvent::Question { .. }) => {}
                Ok(AssessmentEvent::Finished) => {
                    wizard.advance();
                    return Ok(Screen::Moved);
                }
                Ok(AssessmentEvent::LeaveAssessment) => return Ok(Screen::Back),
                Err(e) => self.show_error(&e)?,
            }
        }
    }

    async fn summary(&mut self, wizard: &mut StepWizard) -> eyre::Result<Screen> {
        let summary =
            match steps::health_summary(wizard, self.backend.as_ref(), &Relevance::new()).await {
                Ok(summary) => summary,
                Err(e) => {
                    self.show_error(&e)?;
                    return Ok(Screen::Back);
                }
            };

        writeln!(self.out, "Name: {}", summary.display_name())?;
        self.print_vitals(&summary)?;
        if summary.symptoms.is_empty() {
            writeln!(self.out, "Symptoms: none reported")?;
        } else {
            writeln!(self.out, "Symptoms: {}", summary.symptoms.join(", "))?;
        }

        write!(self.out, "E-mail this report? (y/n): ")?;
        self.out.flush()?;
        let answer = match tokio::time::timeout(self.summary_timeout, self.input.next_line()).await
        {
            Ok(line) => to_answer(line?),
            Err(_) => {
                writeln!(self.out)?;
                tracing::info!("summary timed out");
                return Ok(Screen::Finished);
            }
        };

        let send = text!(answer);
        if is_yes(&send) {
            match steps::send_summary_email(wizard, self.backend.as_ref(), &summary, &Zoned::now())
                .await
            {
                Ok(()) => writeln!(self.out, "Report sent to {}.", summary.client.email)?,
                Err(e) => self.show_error(&e)?,
            }
        }
        writeln!(self.out, "Thank you.")?;
        Ok(Screen::Finished)
    }

    fn print_vitals(&mut self, summary: &HealthSummary) -> eyre::Result<()> {
        for reading in &summary.vitals {
            let status = match reading.status {
                VitalStatus::Normal => "normal",
                VitalStatus::Abnormal => "out of range",
                VitalStatus::Unknown => "not measured",
            };
            writeln!(
                self.out,
                "  {:?}: {} {} (normal {}) {status}",
                reading.vital,
                reading.value,
                reading.vital.unit(),
                reading.vital.normal_range()
            )?;
        }
        Ok(())
    }
}

fn to_answer(line: Option<String>) -> Answer {
    match line {
        None => Answer::Closed,
        Some(line) if line.trim().eq_ignore_ascii_case(BACK) => Answer::Back,
        Some(line) => match goto_target(&line) {
            Some(step) => Answer::GoTo(step),
            None => Answer::Text(line),
        },
    }
}

/// `goto N` with `N` a step number.
fn goto_target(line: &str) -> Option<Step> {
    let (command, number) = line.trim().split_once(char::is_whitespace)?;
    if !command.eq_ignore_ascii_case(GOTO) {
        return None;
    }
    Step::from_number(number.trim().parse().ok()?)
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

fn step_title(step: Step) -> &'static str {
    match step {
        Step::PersonalInfo => "Personal information",
        Step::AgeGender => "Age and gender",
        Step::FaceScan => "Face scan",
        Step::ScanResults => "Scan results",
        Step::Complaint => "What brings you in today?",
        Step::Assessment => "Follow-up questions",
        Step::Summary => "Your health summary",
    }
}
