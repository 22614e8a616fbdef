//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;
mod loaders;

pub mod campaign_service;
pub mod image_service;
pub mod tier_service;
pub mod milestone_service;
pub mod contribution_service;
pub mod event_service;
pub mod catalog;
pub mod profile;

#[cfg(test)]
pub mod test_support;
