use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// The technology track a simulation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Cybersecurity,
    Ai,
    Cloud,
    Web3,
    DataScience,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Ai,
        Category::Cybersecurity,
        Category::Cloud,
        Category::Web3,
        Category::DataScience,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cybersecurity => "cybersecurity",
            Category::Ai => "ai",
            Category::Cloud => "cloud",
            Category::Web3 => "web3",
            Category::DataScience => "data-science",
        }
    }

    /// Human readable label used by selects and tables.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Cybersecurity => "Cybersecurity",
            Category::Ai => "AI & Machine Learning",
            Category::Cloud => "Cloud Computing",
            Category::Web3 => "Web3 & Blockchain",
            Category::DataScience => "Data Science",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown category: {}", s)))
    }
}

/// Difficulty of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown level: {}", s)))
    }
}

/// A filter selection: either every value or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(selected) => selected == value,
        }
    }
}

impl<T: FromStr<Err = AppError>> FromStr for Selection<T> {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(Selection::All),
            other => other.parse().map(Selection::Only),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Only(value) => value.fmt(f),
        }
    }
}

/// A catalog entry describing one learning simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    /// The unique identifier for the simulation.
    pub id: Uuid,
    pub title: String,
    pub category: Category,
    pub level: Level,
    /// Free-text duration, e.g. "2 hours".
    pub duration: String,
    pub description: String,
    /// The number of learners enrolled.
    pub enrolled_count: u64,
    /// The timestamp when the simulation was created.
    pub created_at: DateTime<Utc>,
}

impl SimulationRecord {
    /// Replaces every editable field, leaving id, counters and timestamps alone.
    pub fn apply(&mut self, fields: SimulationFields) {
        self.title = fields.title;
        self.category = fields.category;
        self.level = fields.level;
        self.duration = fields.duration;
        self.description = fields.description;
    }
}

/// The editable fields of a simulation, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationFields {
    pub title: String,
    pub category: Category,
    pub level: Level,
    pub duration: String,
    pub description: String,
}
