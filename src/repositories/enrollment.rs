use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::enrollment::{EnrollmentRecord, EnrollmentStatus},
};

/// In-memory enrollment records of every learner.
#[derive(Clone, Default)]
pub struct EnrollmentBook {
    records: Arc<RwLock<Vec<EnrollmentRecord>>>,
}

impl EnrollmentBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enrollments of `user_id`, oldest first.
    pub async fn for_user(&self, user_id: Uuid) -> Vec<EnrollmentRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Enrolls `user_id` in `simulation_id`.
    ///
    /// Returns the record and whether it was newly created; enrolling twice
    /// hands back the existing record.
    pub async fn enroll(&self, user_id: Uuid, simulation_id: Uuid) -> (EnrollmentRecord, bool) {
        let mut records = self.records.write().await;

        if let Some(existing) = records
            .iter()
            .find(|record| record.user_id == user_id && record.simulation_id == simulation_id)
        {
            return (existing.clone(), false);
        }

        let record = EnrollmentRecord::new(user_id, simulation_id);
        records.push(record.clone());
        (record, true)
    }

    /// Updates progress on an enrollment owned by `user_id`.
    pub async fn update_progress(
        &self,
        user_id: Uuid,
        enrollment_id: Uuid,
        progress: i64,
    ) -> Result<EnrollmentRecord> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.id == enrollment_id && record.user_id == user_id)
            .ok_or(AppError::NotFound)?;

        record.set_progress(progress)?;
        Ok(record.clone())
    }

    /// Removes one enrollment, e.g. when its simulation vanished mid-enroll.
    pub async fn withdraw(&self, enrollment_id: Uuid) {
        self.records
            .write()
            .await
            .retain(|record| record.id != enrollment_id);
    }

    /// Removes every enrollment in `simulation_id`. Returns how many went.
    pub async fn remove_simulation(&self, simulation_id: Uuid) -> usize {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| record.simulation_id != simulation_id);
        before - records.len()
    }

    /// Counts of (active, completed) enrollments across all learners.
    pub async fn totals(&self) -> (usize, usize) {
        let records = self.records.read().await;
        let completed = records
            .iter()
            .filter(|record| record.status() == EnrollmentStatus::Completed)
            .count();
        (records.len() - completed, completed)
    }
}
