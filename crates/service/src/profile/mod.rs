//! Profile module: three-layer architecture (domain, repository, service).
//!
//! Persistence sits behind `ProfileRepository` so the business rules can be
//! exercised against the in-memory mock.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::ProfileService;
