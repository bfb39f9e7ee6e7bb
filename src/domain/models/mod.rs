pub mod common;
pub mod integrations;
pub mod projects;
pub mod scorers;
pub mod workflows;

pub use common::{HttpValidationError, LocItem, ValidationErrorDetail};
pub use integrations::*;
pub use projects::{Dataset, Edit, ListDatasetResponse, Project};
pub use scorers::{
    CustomizedScorer, MetadataFilter, NodeNameFilter, ScorerConfig, ScorerFilter, StandardScorer,
};
pub use workflows::*;
