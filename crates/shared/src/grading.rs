//! Scoring a submitted question set.

use std::collections::HashMap;

use crate::error::GradingError;
use crate::models::{Question, TestResult};

/// Outcome for one question, joined on `SequenceNumber`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedQuestion {
    pub sequence_number: u32,
    pub given: String,
    pub expected: String,
    pub explanation: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizScore {
    pub graded: Vec<GradedQuestion>,
    pub correct: usize,
    pub total: usize,
    /// `round(100 * correct / total)`, 0 for an empty set.
    pub percent: u32,
}

/// Check that `answers` lines up with `questions` before submitting.
pub fn check_alignment(questions: &[Question], answers: &[String]) -> Result<(), GradingError> {
    if questions.len() != answers.len() {
        return Err(GradingError::Misaligned {
            questions: questions.len(),
            answers: answers.len(),
        });
    }
    Ok(())
}

/// Percentage rounded half away from zero.
pub fn score_percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * correct as f64 / total as f64).round() as u32
}

/// Grade `answers` (positionally aligned with `questions`) against `results`.
pub fn grade(
    questions: &[Question],
    answers: &[String],
    results: &[TestResult],
) -> Result<QuizScore, GradingError> {
    check_alignment(questions, answers)?;

    let by_sequence: HashMap<u32, &TestResult> =
        results.iter().map(|r| (r.sequence_number, r)).collect();

    let mut graded = Vec::with_capacity(questions.len());
    for (question, given) in questions.iter().zip(answers) {
        let result = by_sequence
            .get(&question.sequence_number)
            .ok_or(GradingError::MissingResult(question.sequence_number))?;
        let correct = given.trim().eq_ignore_ascii_case(result.answer.trim());
        graded.push(GradedQuestion {
            sequence_number: question.sequence_number,
            given: given.clone(),
            expected: result.answer.clone(),
            explanation: result.explanation.clone(),
            correct,
        });
    }

    let correct = graded.iter().filter(|g| g.correct).count();
    let total = graded.len();
    Ok(QuizScore {
        graded,
        correct,
        total,
        percent: score_percent(correct, total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(seq: u32) -> Question {
        Question {
            sequence_number: seq,
            question: format!("Question {seq}"),
            option_a: "a".to_string(),
            option_b: "b".to_string(),
            option_c: "c".to_string(),
            option_d: "d".to_string(),
        }
    }

    fn result(seq: u32, answer: &str) -> TestResult {
        TestResult {
            sequence_number: seq,
            answer: answer.to_string(),
            explanation: format!("because {seq}"),
        }
    }

    #[test]
    fn results_are_joined_by_sequence_number_not_position() {
        let questions = vec![question(1), question(2), question(3)];
        let answers = vec!["A".to_string(), "c".to_string(), "D".to_string()];
        // Server returns results out of order.
        let results = vec![result(3, "B"), result(1, "A"), result(2, "C")];

        let score = grade(&questions, &answers, &results).unwrap();
        assert_eq!(score.total, 3);
        assert_eq!(score.correct, 2);
        assert_eq!(score.percent, 67);
        assert_eq!(score.graded[2].expected, "B");
        assert!(!score.graded[2].correct);
    }

    #[test]
    fn misaligned_answers_are_rejected() {
        let questions = vec![question(1), question(2)];
        let answers = vec!["A".to_string()];
        assert_eq!(
            grade(&questions, &answers, &[]),
            Err(GradingError::Misaligned {
                questions: 2,
                answers: 1
            })
        );
    }

    #[test]
    fn missing_result_is_an_error() {
        let questions = vec![question(1), question(2)];
        let answers = vec!["A".to_string(), "B".to_string()];
        let results = vec![result(1, "A")];
        assert_eq!(
            grade(&questions, &answers, &results),
            Err(GradingError::MissingResult(2))
        );
    }

    #[test]
    fn percent_rounds_and_handles_empty_sets() {
        assert_eq!(score_percent(0, 0), 0);
        assert_eq!(score_percent(1, 8), 13);
        assert_eq!(score_percent(1, 3), 33);
        assert_eq!(score_percent(7, 7), 100);
    }
}
