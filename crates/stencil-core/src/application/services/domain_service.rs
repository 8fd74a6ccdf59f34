//! Domain Service - saved configurations.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, ports::DomainStore},
    domain::{DomainConfiguration, DomainValidator},
    error::StencilResult,
};

/// A stored configuration, summarised for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSummary {
    pub name: String,
    pub title: String,
    pub domain: Option<String>,
    pub entities: usize,
    pub relationships: usize,
}

impl From<&DomainConfiguration> for DomainSummary {
    fn from(config: &DomainConfiguration) -> Self {
        Self {
            name: config.name.clone(),
            title: config.display_title(),
            domain: config.domain.clone(),
            entities: config.entities.len(),
            relationships: config.relationships.len(),
        }
    }
}

pub struct DomainService {
    store: Box<dyn DomainStore>,
}

impl DomainService {
    pub fn new(store: Box<dyn DomainStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> StencilResult<Vec<DomainSummary>> {
        Ok(self
            .store
            .list()?
            .iter()
            .map(DomainSummary::from)
            .collect())
    }

    pub fn get(&self, name: &str) -> StencilResult<DomainConfiguration> {
        self.store.get(name)
    }

    /// Store a configuration. Configurations with blocking errors are refused.
    #[instrument(skip_all, fields(domain = %config.name))]
    pub fn save(&self, config: DomainConfiguration) -> StencilResult<()> {
        let blocking: Vec<String> = DomainValidator::validate(&config)
            .into_iter()
            .filter(|i| i.is_blocking())
            .map(|i| i.message)
            .collect();
        if !blocking.is_empty() {
            return Err(ApplicationError::ValidationFailed(blocking.join("; ")).into());
        }

        debug!("Saving domain configuration");
        self.store.insert(config)
    }

    pub fn remove(&self, name: &str) -> StencilResult<()> {
        self.store.remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockDomainStore;
    use crate::domain::{Entity, Field, FieldKind, Relationship, RelationshipKind};
    use crate::error::StencilError;

    fn blog() -> DomainConfiguration {
        DomainConfiguration::new("Blog")
            .with_domain("publishing")
            .with_entity(Entity::new("Post").with_field(Field::of("title", FieldKind::ShortText)))
    }

    #[test]
    fn list_summarises_stored_configurations() {
        let mut store = MockDomainStore::new();
        store.expect_list().returning(|| Ok(vec![blog()]));

        let summaries = DomainService::new(Box::new(store)).list().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "Blog");
        assert_eq!(summaries[0].entities, 1);
        assert_eq!(summaries[0].domain.as_deref(), Some("publishing"));
    }

    #[test]
    fn save_refuses_blocked_configuration() {
        let mut store = MockDomainStore::new();
        store.expect_insert().never();

        let config = blog().with_relationship(Relationship::new(
            "post-author",
            RelationshipKind::OneToMany,
            "Author",
            "Post",
        ));
        let err = DomainService::new(Box::new(store)).save(config).unwrap_err();
        assert!(matches!(
            err,
            StencilError::Application(ApplicationError::ValidationFailed(ref m)) if m.contains("Author")
        ));
    }

    #[test]
    fn save_stores_valid_configuration() {
        let mut store = MockDomainStore::new();
        store
            .expect_insert()
            .withf(|c| c.name == "Blog")
            .times(1)
            .returning(|_| Ok(()));

        DomainService::new(Box::new(store)).save(blog()).unwrap();
    }
}
