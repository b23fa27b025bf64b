use std::collections::BTreeMap;

use kiosk_core::models::RiskLevel;

use crate::bank::ConditionQuestionnaire;

/// Sum the points of every question in order. An unanswered question, or an
/// answer the bank has no score for, contributes zero.
pub fn total_score(questionnaire: &ConditionQuestionnaire, answers: &BTreeMap<usize, String>) -> i32 {
    questionnaire
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| answers.get(&i).map_or(0, |a| q.points(a)))
        .sum()
}

/// A completed questionnaire escalates to high risk at or above the
/// threshold and otherwise confirms the suspicion.
pub fn classify(score: i32, min_score_threshold: i32) -> RiskLevel {
    if score >= min_score_threshold {
        RiskLevel::HighRisk
    } else {
        RiskLevel::Suspected
    }
}
