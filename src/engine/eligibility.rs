use serde::Serialize;
use uuid::Uuid;

/// Whether an employee may take a quiz, and if not, what to finish first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state")]
pub enum Eligibility {
    Unlocked,
    Locked {
        #[serde(rename = "requiredTrainingItemId")]
        required_item: Uuid,
    },
}

impl Eligibility {
    pub fn evaluate(completed_item_ids: &[Uuid], related_training_item_id: Option<Uuid>) -> Self {
        match related_training_item_id {
            Some(required_item) if !completed_item_ids.contains(&required_item) => {
                Eligibility::Locked { required_item }
            }
            _ => Eligibility::Unlocked,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self, Eligibility::Unlocked)
    }
}

/// A quiz with no related training is always open. Otherwise it opens once
/// the related item is in the completed set; whether that item still exists
/// is not checked.
pub fn is_quiz_unlocked(completed_item_ids: &[Uuid], related_training_item_id: Option<Uuid>) -> bool {
    Eligibility::evaluate(completed_item_ids, related_training_item_id).is_unlocked()
}
