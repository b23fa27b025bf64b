use std::collections::BTreeMap;

use kiosk_core::language::Language;
use kiosk_core::models::RiskLevel;
use kiosk_questionnaire::scoring;
use kiosk_questionnaire::{
    BankIssue, Navigation, QuestionBank, QuestionnaireEngine, QuestionnaireError, Step,
};

/// Two yes/no questions worth 3 points each, threshold 4.
const TWO_QUESTIONS: &str = r#"{
    "AFib": {
        "title": "Atrial Fibrillation",
        "questions": [
            { "text": "Q1", "type": "yes_no", "scoring": { "Yes": 3, "No": 0 } },
            { "text": "Q2", "type": "yes_no", "scoring": { "Yes": 3, "No": 0 } }
        ],
        "min_score_threshold": 4
    }
}"#;

const MULTIPLE_CHOICE: &str = r#"{
    "PVC": {
        "title": "PVC",
        "title_ar": "انقباضات",
        "questions": [
            {
                "text": "Coffee per day?",
                "text_ar": "القهوة يوميا؟",
                "type": "multiple_choice",
                "options": ["None", "1-2", "3 or more"],
                "options_ar": ["لا شيء", "1-2", "3 أو أكثر"],
                "scoring": { "None": 0, "1-2": 1, "3 or more": 3 }
            }
        ],
        "min_score_threshold": 3
    }
}"#;

fn engine(json: &str, condition: &str) -> QuestionnaireEngine {
    let bank = QuestionBank::from_json(json).unwrap();
    QuestionnaireEngine::new(&bank, condition).unwrap()
}

fn completed(step: Step) -> kiosk_questionnaire::QuestionnaireOutcome {
    match step {
        Step::Completed(outcome) => outcome,
        other => panic!("expected completion, got {other:?}"),
    }
}

#[test]
fn yes_yes_scores_six_and_is_high_risk() {
    let mut engine = engine(TWO_QUESTIONS, "AFib");
    assert_eq!(engine.answer("Yes").unwrap(), Step::Question(1));
    let outcome = completed(engine.answer("Yes").unwrap());

    assert_eq!(outcome.score, 6);
    assert_eq!(outcome.risk_level, RiskLevel::HighRisk);
}

#[test]
fn yes_no_scores_three_and_stays_suspected() {
    let mut engine = engine(TWO_QUESTIONS, "AFib");
    engine.answer("Yes").unwrap();
    let outcome = completed(engine.answer("No").unwrap());

    assert_eq!(outcome.score, 3);
    assert_eq!(outcome.risk_level, RiskLevel::Suspected);
}

#[test]
fn score_equal_to_threshold_is_high_risk() {
    assert_eq!(scoring::classify(4, 4), RiskLevel::HighRisk);
    assert_eq!(scoring::classify(3, 4), RiskLevel::Suspected);
}

#[test]
fn unanswered_and_unscored_answers_count_zero() {
    let bank = QuestionBank::from_json(TWO_QUESTIONS).unwrap();
    let questionnaire = bank.get("AFib").unwrap();

    let mut answers = BTreeMap::new();
    answers.insert(1, "Yes".to_string());
    assert_eq!(scoring::total_score(questionnaire, &answers), 3);

    answers.insert(0, "Maybe".to_string());
    assert_eq!(scoring::total_score(questionnaire, &answers), 3);
}

#[test]
fn outcome_answers_carry_question_index() {
    let mut engine = engine(TWO_QUESTIONS, "AFib");
    engine.answer("No").unwrap();
    let outcome = completed(engine.answer("Yes").unwrap());
    let wire = outcome.to_answers();

    assert_eq!(wire.len(), 2);
    assert_eq!(wire[0].index, 0);
    assert_eq!(wire[0].answer, "No");
    assert_eq!(wire[1].index, 1);
    assert_eq!(wire[1].arrhythmia_result_id, 0);
}

#[test]
fn back_on_first_question_leaves_condition() {
    let mut engine = engine(TWO_QUESTIONS, "AFib");
    assert_eq!(engine.back(), Navigation::LeaveCondition);

    engine.answer("Yes").unwrap();
    assert_eq!(engine.back(), Navigation::Question(0));
}

#[test]
fn go_to_only_reaches_answered_questions() {
    let mut engine = engine(TWO_QUESTIONS, "AFib");
    assert!(matches!(
        engine.go_to(1),
        Err(QuestionnaireError::NotAnswered { index: 1 })
    ));

    engine.answer("Yes").unwrap();
    engine.go_to(0).unwrap();
    assert_eq!(engine.current_index(), 0);
    assert!(engine.go_to(5).is_err());
}

#[test]
fn next_moves_forward_over_answered_questions_only() {
    let mut engine = engine(TWO_QUESTIONS, "AFib");
    assert!(engine.next().is_err());

    engine.answer("Yes").unwrap();
    engine.back();
    assert_eq!(engine.next().unwrap(), Step::Question(1));
    assert!(matches!(
        engine.next(),
        Err(QuestionnaireError::NotAnswered { index: 1 })
    ));

    completed(engine.answer("Yes").unwrap());
    assert!(engine.is_completed());
    assert!(matches!(
        engine.answer("No"),
        Err(QuestionnaireError::AlreadyCompleted)
    ));
}

#[test]
fn revisiting_a_question_replaces_its_answer() {
    let mut engine = engine(TWO_QUESTIONS, "AFib");
    engine.answer("Yes").unwrap();
    engine.back();
    assert_eq!(engine.answer("No").unwrap(), Step::Question(1));
    assert_eq!(engine.next().unwrap_err().to_string(), "question 1 has not been answered");

    let outcome = completed(engine.answer("No").unwrap());
    assert_eq!(outcome.score, 0);
}

#[test]
fn empty_answer_is_rejected() {
    let mut engine = engine(TWO_QUESTIONS, "AFib");
    assert!(matches!(engine.answer(""), Err(QuestionnaireError::EmptyAnswer)));
    assert_eq!(engine.current_index(), 0);
}

#[test]
fn option_answers_store_canonical_value_not_label() {
    let mut engine = engine(MULTIPLE_CHOICE, "PVC");
    let labels = engine.current_question().option_labels(Language::Ar);
    assert_eq!(labels[2], "3 أو أكثر");

    let outcome = completed(engine.answer_option(2).unwrap());
    assert_eq!(outcome.answers[&0], "3 or more");
    assert_eq!(outcome.score, 3);
    assert_eq!(outcome.risk_level, RiskLevel::HighRisk);
}

#[test]
fn unknown_answer_is_rejected_and_not_recorded() {
    let mut engine = engine(TWO_QUESTIONS, "AFib");
    assert!(matches!(
        engine.answer("Maybe"),
        Err(QuestionnaireError::InvalidAnswer { index: 0, ref value }) if value == "Maybe"
    ));
    assert!(!engine.is_answered(0));
    assert_eq!(engine.current_index(), 0);
}

#[test]
fn answers_are_stored_in_canonical_case() {
    let mut engine = engine(TWO_QUESTIONS, "AFib");
    engine.answer("yes").unwrap();
    let outcome = completed(engine.answer(" YES ").unwrap());

    assert_eq!(outcome.answers[&0], "Yes");
    assert_eq!(outcome.answers[&1], "Yes");
    assert_eq!(outcome.score, 6);
    assert_eq!(outcome.risk_level, RiskLevel::HighRisk);
}

#[test]
fn localized_label_resolves_to_its_option() {
    let mut engine = engine(MULTIPLE_CHOICE, "PVC");
    let outcome = completed(engine.answer("3 أو أكثر").unwrap());

    assert_eq!(outcome.answers[&0], "3 or more");
    assert_eq!(outcome.score, 3);
    assert_eq!(outcome.risk_level, RiskLevel::HighRisk);
}

#[test]
fn option_index_out_of_range_is_an_error() {
    let mut engine = engine(MULTIPLE_CHOICE, "PVC");
    assert!(matches!(
        engine.answer_option(3),
        Err(QuestionnaireError::OptionOutOfRange { index: 3, len: 3 })
    ));
}

#[test]
fn localized_text_falls_back_to_english() {
    let afib = engine(TWO_QUESTIONS, "AFib");
    assert_eq!(afib.title(Language::Ar), "Atrial Fibrillation");
    assert_eq!(afib.current_question().text(Language::Ar), "Q1");

    let pvc = engine(MULTIPLE_CHOICE, "PVC");
    assert_eq!(pvc.title(Language::Ar), "انقباضات");
    assert_eq!(pvc.current_question().option_labels(Language::En)[0], "None");
}

#[test]
fn unknown_condition_is_an_error() {
    let bank = QuestionBank::from_json(TWO_QUESTIONS).unwrap();
    assert!(matches!(
        QuestionnaireEngine::new(&bank, "PVC"),
        Err(QuestionnaireError::UnknownCondition(_))
    ));
}

#[test]
fn lint_reports_unscored_answers_and_label_mismatch() {
    let json = r#"{
        "X": {
            "title": "X",
            "questions": [
                { "text": "a", "type": "yes_no", "scoring": { "Yes": 1 } },
                {
                    "text": "b",
                    "type": "multiple_choice",
                    "options": ["A", "B"],
                    "options_ar": ["أ"],
                    "scoring": { "A": 1, "B": 2 }
                }
            ],
            "min_score_threshold": 1
        },
        "Y": { "title": "Y", "questions": [], "min_score_threshold": 1 }
    }"#;
    let issues = QuestionBank::from_json(json).unwrap().lint();

    assert!(issues.contains(&BankIssue::UnscoredAnswer {
        condition: "X".to_string(),
        question: 0,
        answer: "No".to_string(),
    }));
    assert!(issues.contains(&BankIssue::LabelCountMismatch {
        condition: "X".to_string(),
        question: 1,
        options: 2,
        labels: 1,
    }));
    assert!(issues.contains(&BankIssue::NoQuestions {
        condition: "Y".to_string(),
    }));
}

#[test]
fn malformed_bank_is_a_parse_error() {
    assert!(matches!(
        QuestionBank::from_json("{ not json"),
        Err(QuestionnaireError::Parse(_))
    ));
}

#[test]
fn bundled_bank_is_clean() {
    let bank = QuestionBank::bundled().unwrap();
    assert!(bank.contains("AFib"));
    assert!(bank.contains("PVC"));
    assert!(bank.lint().is_empty());
}
