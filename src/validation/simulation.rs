use garde::Validate;
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    models::simulation::SimulationFields,
    services::catalog::FilterCriteria,
};

/// The admin form for adding or editing a simulation.
#[derive(Deserialize, Debug, Validate)]
pub struct SimulationForm {
    #[garde(length(min = 1, max = 200))]
    pub title: String,
    #[garde(skip)]
    pub category: String,
    #[garde(skip)]
    pub level: String,
    #[garde(length(min = 1, max = 64))]
    pub duration: String,
    #[garde(length(min = 1, max = 2000))]
    pub description: String,
}

impl SimulationForm {
    /// Validates the form and converts free-form selects into closed types.
    pub fn into_fields(self) -> Result<SimulationFields> {
        self.validate()
            .map_err(|report| AppError::Validation(report.to_string()))?;

        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Title cannot be empty".to_string()));
        }

        Ok(SimulationFields {
            category: self.category.parse()?,
            level: self.level.parse()?,
            title: self.title.trim().to_string(),
            duration: self.duration.trim().to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

/// Query string of the catalog view.
#[derive(Deserialize, Debug, Default)]
pub struct CatalogQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

impl TryFrom<CatalogQuery> for FilterCriteria {
    type Error = AppError;

    fn try_from(query: CatalogQuery) -> Result<Self> {
        Ok(FilterCriteria {
            search_text: query.search.unwrap_or_default(),
            category: query.category.as_deref().unwrap_or("all").parse()?,
            level: query.level.as_deref().unwrap_or("all").parse()?,
        })
    }
}
