use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::simulation::{Category, Level, Selection, SimulationFields, SimulationRecord},
};

/// The active search/category/level constraints of a catalog view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub search_text: String,
    pub category: Selection<Category>,
    pub level: Selection<Level>,
}

impl FilterCriteria {
    /// Whether `record` satisfies every constraint.
    pub fn matches(&self, record: &SimulationRecord) -> bool {
        self.matches_search(record)
            && self.category.matches(&record.category)
            && self.level.matches(&record.level)
    }

    fn matches_search(&self, record: &SimulationRecord) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        let needle = self.search_text.to_lowercase();
        record.title.to_lowercase().contains(&needle)
            || record.description.to_lowercase().contains(&needle)
    }
}

/// Computes the visible subset of `records`, preserving their order.
///
/// An empty result is a valid outcome; the view renders a "no results" state.
pub fn filter<'a>(
    records: &'a [SimulationRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a SimulationRecord> {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .collect()
}

/// The admin-owned simulation collection.
#[derive(Debug, Clone, Default)]
pub struct SimulationCollection {
    records: Vec<SimulationRecord>,
}

impl SimulationCollection {
    pub fn new(records: Vec<SimulationRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SimulationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&SimulationRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Appends a new record with a fresh id, zero enrollments and `created_at = now`.
    pub fn create(&mut self, fields: SimulationFields) -> &SimulationRecord {
        let mut id = Uuid::new_v4();
        while self.get(id).is_some() {
            id = Uuid::new_v4();
        }

        self.records.push(SimulationRecord {
            id,
            title: fields.title,
            category: fields.category,
            level: fields.level,
            duration: fields.duration,
            description: fields.description,
            enrolled_count: 0,
            created_at: Utc::now(),
        });

        &self.records[self.records.len() - 1]
    }

    /// Replaces the editable fields of record `id` in place.
    pub fn update(&mut self, id: Uuid, fields: SimulationFields) -> Result<&SimulationRecord> {
        let record = self
            .records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(AppError::NotFound)?;
        record.apply(fields);
        Ok(&*record)
    }

    /// Removes record `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        self.records.len() != before
    }

    /// Bumps the enrollment counter of record `id`.
    pub fn record_enrollment(&mut self, id: Uuid) -> Result<()> {
        let record = self
            .records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(AppError::NotFound)?;
        record.enrolled_count += 1;
        Ok(())
    }
}

fn seed_record(
    title: &str,
    category: Category,
    level: Level,
    duration: &str,
    description: &str,
    enrolled_count: u64,
) -> SimulationRecord {
    SimulationRecord {
        id: Uuid::new_v4(),
        title: title.to_string(),
        category,
        level,
        duration: duration.to_string(),
        description: description.to_string(),
        enrolled_count,
        created_at: Utc::now(),
    }
}

/// The catalog the platform starts with.
pub fn seed_catalog() -> Vec<SimulationRecord> {
    vec![
        seed_record(
            "Neural Network Fundamentals",
            Category::Ai,
            Level::Beginner,
            "2 hours",
            "Build your first neural network from scratch and understand deep learning basics",
            1234,
        ),
        seed_record(
            "SQL Injection Defense",
            Category::Cybersecurity,
            Level::Intermediate,
            "3 hours",
            "Learn to identify and prevent SQL injection attacks in web applications",
            892,
        ),
        seed_record(
            "Kubernetes Deployment",
            Category::Cloud,
            Level::Advanced,
            "4 hours",
            "Master container orchestration with Kubernetes in production environments",
            567,
        ),
        seed_record(
            "Blockchain Smart Contracts",
            Category::Web3,
            Level::Intermediate,
            "3.5 hours",
            "Create and deploy smart contracts on Ethereum blockchain",
            445,
        ),
        seed_record(
            "Data Pipeline Architecture",
            Category::DataScience,
            Level::Advanced,
            "5 hours",
            "Design and implement scalable data processing pipelines",
            723,
        ),
        seed_record(
            "API Security Best Practices",
            Category::Cybersecurity,
            Level::Beginner,
            "2.5 hours",
            "Secure your APIs with authentication, rate limiting, and encryption",
            1567,
        ),
    ]
}

/// Leading number of a free-text duration such as "3.5 hours".
pub fn duration_hours(duration: &str) -> Option<f64> {
    duration.split_whitespace().next()?.parse().ok()
}
