use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Where a learner stands in a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnrollmentStatus {
    Enrolled,
    InProgress,
    Completed,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Enrolled => "enrolled",
            EnrollmentStatus::InProgress => "in-progress",
            EnrollmentStatus::Completed => "completed",
        }
    }

    /// Status implied by a progress percentage.
    fn for_progress(progress: u8) -> Self {
        match progress {
            0 => EnrollmentStatus::Enrolled,
            100 => EnrollmentStatus::Completed,
            _ => EnrollmentStatus::InProgress,
        }
    }
}

/// A learner's relationship to a simulation.
///
/// Status and progress only change together through [`EnrollmentRecord::set_progress`],
/// so `completed` always means 100 and `enrolled` always means 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollmentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub simulation_id: Uuid,
    status: EnrollmentStatus,
    progress: u8,
    pub enrolled_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl EnrollmentRecord {
    pub fn new(user_id: Uuid, simulation_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            simulation_id,
            status: EnrollmentStatus::Enrolled,
            progress: 0,
            enrolled_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn status(&self) -> EnrollmentStatus {
        self.status
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Records new progress and derives the matching status.
    ///
    /// Anything outside `0..=100` is rejected without touching the record.
    pub fn set_progress(&mut self, progress: i64) -> Result<()> {
        let progress = u8::try_from(progress)
            .ok()
            .filter(|progress| *progress <= 100)
            .ok_or_else(|| {
                AppError::Validation("Progress must be between 0 and 100".to_string())
            })?;

        self.progress = progress;
        self.status = EnrollmentStatus::for_progress(progress);
        self.completed_at = match self.status {
            EnrollmentStatus::Completed => self.completed_at.or_else(|| Some(Utc::now())),
            _ => None,
        };

        Ok(())
    }
}
