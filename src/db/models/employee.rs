use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    pub id: Uuid,
    pub first_name: String,
    pub surname: String,
    pub department: String,
    /// Training items finished by this employee. Written only through
    /// append-if-absent updates, so each id appears once.
    #[serde(default)]
    pub completed_item_ids: Vec<Uuid>,
}

impl EmployeeProfile {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.surname);
        let name = name.trim();
        if name.is_empty() {
            "Valued Employee".to_string()
        } else {
            name.to_string()
        }
    }

    pub fn has_completed(&self, item_id: Uuid) -> bool {
        self.completed_item_ids.contains(&item_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployeeProfile {
    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Surname must not be empty"))]
    pub surname: String,
    #[validate(length(min = 1))]
    pub department: String,
    #[serde(default)]
    pub completed_item_ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_when_blank() {
        let mut profile = EmployeeProfile {
            id: Uuid::new_v4(),
            first_name: "Jane".to_string(),
            surname: "Doe".to_string(),
            department: "Electrical".to_string(),
            completed_item_ids: vec![],
        };
        assert_eq!(profile.display_name(), "Jane Doe");

        profile.first_name.clear();
        profile.surname = " ".to_string();
        assert_eq!(profile.display_name(), "Valued Employee");
    }
}
