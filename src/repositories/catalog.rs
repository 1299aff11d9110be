use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::Result,
    models::simulation::{SimulationFields, SimulationRecord},
    services::catalog::{self as catalog_service, FilterCriteria, SimulationCollection},
};

/// Shared simulation collection backing both the catalog and the admin console.
#[derive(Clone)]
pub struct CatalogStore {
    collection: Arc<RwLock<SimulationCollection>>,
}

impl CatalogStore {
    pub fn new(records: Vec<SimulationRecord>) -> Self {
        Self {
            collection: Arc::new(RwLock::new(SimulationCollection::new(records))),
        }
    }

    /// A store holding the platform's starting catalog.
    pub fn seeded() -> Self {
        Self::new(catalog_service::seed_catalog())
    }

    pub async fn all(&self) -> Vec<SimulationRecord> {
        self.collection.read().await.records().to_vec()
    }

    /// The records visible under `criteria`, in catalog order.
    pub async fn filtered(&self, criteria: &FilterCriteria) -> Vec<SimulationRecord> {
        let collection = self.collection.read().await;
        catalog_service::filter(collection.records(), criteria)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn find(&self, id: Uuid) -> Option<SimulationRecord> {
        self.collection.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.collection.read().await.len()
    }

    pub async fn create(&self, fields: SimulationFields) -> SimulationRecord {
        let mut collection = self.collection.write().await;
        collection.create(fields).clone()
    }

    pub async fn update(&self, id: Uuid, fields: SimulationFields) -> Result<SimulationRecord> {
        let mut collection = self.collection.write().await;
        collection.update(id, fields).cloned()
    }

    pub async fn delete(&self, id: Uuid) -> bool {
        self.collection.write().await.delete(id)
    }

    pub async fn record_enrollment(&self, id: Uuid) -> Result<()> {
        self.collection.write().await.record_enrollment(id)
    }
}
