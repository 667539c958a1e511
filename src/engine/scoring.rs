use crate::db::models::{AttemptStatus, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub correct: usize,
    pub total: usize,
    pub score_percent: u8,
    pub status: AttemptStatus,
}

pub fn count_correct(questions: &[Question], answers: &[usize]) -> usize {
    questions
        .iter()
        .zip(answers)
        .filter(|(question, selected)| question.is_correct(**selected))
        .count()
}

/// Percentage of correct answers rounded half up, in integer arithmetic.
pub fn score_percent(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total);
    ((200 * correct + total) / (2 * total)) as u8
}

/// The pass mark is inclusive.
pub fn attempt_status(score_percent: u8, passing_score_percent: u8) -> AttemptStatus {
    if score_percent >= passing_score_percent {
        AttemptStatus::Passed
    } else {
        AttemptStatus::Failed
    }
}

pub fn grade(questions: &[Question], answers: &[usize], passing_score_percent: u8) -> Grade {
    let correct = count_correct(questions, answers);
    let total = questions.len();
    let score_percent = score_percent(correct, total);
    Grade {
        correct,
        total,
        score_percent,
        status: attempt_status(score_percent, passing_score_percent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_questions() -> Vec<Question> {
        (0..4)
            .map(|i| {
                Question::new(
                    format!("Question {}", i),
                    vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    i,
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn scores_fraction_of_matching_answers() {
        let questions = four_questions();
        let grade = grade(&questions, &[0, 1, 0, 3], 70);
        assert_eq!(grade.correct, 3);
        assert_eq!(grade.score_percent, 75);

        let grade = super::grade(&questions, &[0, 1, 3, 0], 70);
        assert_eq!(grade.correct, 2);
        assert_eq!(grade.score_percent, 50);
        assert_eq!(grade.status, AttemptStatus::Failed);
    }

    #[test]
    fn perfect_and_zero_scores() {
        let questions = four_questions();
        assert_eq!(grade(&questions, &[0, 1, 2, 3], 100).score_percent, 100);
        assert_eq!(grade(&questions, &[0, 1, 2, 3], 100).status, AttemptStatus::Passed);
        assert_eq!(grade(&questions, &[1, 0, 3, 2], 1).score_percent, 0);
        assert_eq!(grade(&questions, &[1, 0, 3, 2], 1).status, AttemptStatus::Failed);
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(score_percent(1, 3), 33);
        assert_eq!(score_percent(2, 3), 67);
        assert_eq!(score_percent(1, 8), 13);
        assert_eq!(score_percent(1, 200), 1);
        assert_eq!(score_percent(1, 40), 3);
    }

    #[test]
    fn rounding_matches_reference_for_small_quizzes() {
        for total in 1..=40usize {
            for correct in 0..=total {
                let exact = 100.0 * correct as f64 / total as f64;
                let expected = (exact + 0.5).floor() as u8;
                assert_eq!(
                    score_percent(correct, total),
                    expected,
                    "{} of {} correct",
                    correct,
                    total
                );
            }
        }
    }

    #[test]
    fn pass_mark_is_inclusive() {
        assert_eq!(attempt_status(70, 70), AttemptStatus::Passed);
        assert_eq!(attempt_status(69, 70), AttemptStatus::Failed);
        assert_eq!(attempt_status(100, 100), AttemptStatus::Passed);
    }
}
