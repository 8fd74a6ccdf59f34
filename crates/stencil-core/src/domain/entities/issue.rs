use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{IssueCategory, IssueLevel};

/// A single finding about a configuration or a generation run.
///
/// Issues are pure output: created fresh per run and never mutated after
/// being added to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub level: IssueLevel,
    pub category: IssueCategory,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Entity the issue concerns, when it concerns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// Field the issue concerns, when it concerns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ValidationIssue {
    pub fn new(level: IssueLevel, category: IssueCategory, message: impl Into<String>) -> Self {
        Self {
            level,
            category,
            message: message.into(),
            suggestion: None,
            entity: None,
            field: None,
        }
    }

    pub fn error(category: IssueCategory, message: impl Into<String>) -> Self {
        Self::new(IssueLevel::Error, category, message)
    }

    pub fn warning(category: IssueCategory, message: impl Into<String>) -> Self {
        Self::new(IssueLevel::Warning, category, message)
    }

    pub fn info(category: IssueCategory, message: impl Into<String>) -> Self {
        Self::new(IssueLevel::Info, category, message)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn for_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn for_field(mut self, entity: impl Into<String>, field: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self.field = Some(field.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == IssueLevel::Error
    }

    /// Whether this issue halts the run before rendering.
    ///
    /// Only configuration-level errors (domain or relationship) block;
    /// entity and field errors are localised to the affected entity.
    pub fn is_blocking(&self) -> bool {
        self.is_error()
            && matches!(
                self.category,
                IssueCategory::Domain | IssueCategory::Relationship
            )
    }

    /// Whether this issue quarantines `entity` (an entity or field error
    /// naming it).
    pub fn quarantines(&self, entity: &str) -> bool {
        self.is_error()
            && matches!(self.category, IssueCategory::Entity | IssueCategory::Field)
            && self.entity.as_deref() == Some(entity)
    }
}
