use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::models::TrainingItem;
use crate::db::repositories::{
    CertificateRepository, EmployeeRepository, QuizRepository, TrainingRepository,
};
use crate::db::DocumentStore;
use crate::error::{AppError, AppResult};
use crate::session::EmployeeSession;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingListing {
    #[serde(flatten)]
    pub item: TrainingItem,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub completed: bool,
    /// Set when this call recorded the completion.
    pub newly_completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub employees: usize,
    pub training_items: usize,
    pub quizzes: usize,
    pub certificates_issued: usize,
}

/// Training content reads and the view/completion bookkeeping that unlocks
/// quizzes.
pub struct ContentCatalog {
    store: Arc<dyn DocumentStore>,
    completion_threshold_percent: u8,
}

impl ContentCatalog {
    pub fn new(store: Arc<dyn DocumentStore>, completion_threshold_percent: u8) -> Self {
        Self {
            store,
            completion_threshold_percent,
        }
    }

    pub async fn list_training_for(&self, session: &EmployeeSession) -> AppResult<Vec<TrainingListing>> {
        let profile = EmployeeRepository::get(self.store.as_ref(), session.employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee profile not found.".to_string()))?;
        let items = TrainingRepository::list(self.store.as_ref()).await?;

        Ok(items
            .into_iter()
            .filter(|item| item.is_visible_to(&profile.department))
            .map(|item| TrainingListing {
                completed: profile.has_completed(item.id),
                item,
            })
            .collect())
    }

    pub async fn record_view(&self, item_id: Uuid) -> AppResult<()> {
        TrainingRepository::record_view(self.store.as_ref(), item_id)
            .await
            .map_err(|e| match e {
                crate::db::DatabaseError::NotFound => {
                    AppError::NotFound("Training item not found.".to_string())
                }
                other => other.into(),
            })?;
        debug!(%item_id, "Training view recorded");
        Ok(())
    }

    /// Progress below the threshold is accepted and ignored.
    pub async fn report_progress(
        &self,
        session: &EmployeeSession,
        item_id: Uuid,
        percent: u8,
    ) -> AppResult<ProgressUpdate> {
        if percent >= self.completion_threshold_percent {
            return self.mark_complete(session, item_id).await;
        }

        let profile = EmployeeRepository::get(self.store.as_ref(), session.employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee profile not found.".to_string()))?;
        self.ensure_item_exists(item_id).await?;
        Ok(ProgressUpdate {
            completed: profile.has_completed(item_id),
            newly_completed: false,
        })
    }

    /// Add the item to the employee's completed set. The completion counter
    /// is skipped when the profile already lists the item. Two concurrent
    /// first completions can both count; the completed set stays a set.
    pub async fn mark_complete(
        &self,
        session: &EmployeeSession,
        item_id: Uuid,
    ) -> AppResult<ProgressUpdate> {
        let profile = EmployeeRepository::get(self.store.as_ref(), session.employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee profile not found.".to_string()))?;
        self.ensure_item_exists(item_id).await?;

        if profile.has_completed(item_id) {
            return Ok(ProgressUpdate {
                completed: true,
                newly_completed: false,
            });
        }

        EmployeeRepository::add_completed_item(self.store.as_ref(), profile.id, item_id).await?;
        TrainingRepository::increment_completions(self.store.as_ref(), item_id).await?;
        info!(employee_id = %profile.id, %item_id, "Training completed");

        Ok(ProgressUpdate {
            completed: true,
            newly_completed: true,
        })
    }

    pub async fn overview(&self) -> AppResult<Overview> {
        let store = self.store.as_ref();
        Ok(Overview {
            employees: EmployeeRepository::count(store).await?,
            training_items: TrainingRepository::count(store).await?,
            quizzes: QuizRepository::count(store).await?,
            certificates_issued: CertificateRepository::count(store).await?,
        })
    }

    async fn ensure_item_exists(&self, item_id: Uuid) -> AppResult<TrainingItem> {
        TrainingRepository::get(self.store.as_ref(), item_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Training item not found.".to_string()))
    }
}
