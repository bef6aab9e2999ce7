//! Service layer providing business-oriented CRUD operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Returns JSON-ready projections instead of raw entities.

pub mod errors;
pub mod pagination;
pub mod password;
pub mod projections;
pub mod media;

pub mod category_service;
pub mod location_service;
pub mod user_service;
pub mod advertisement_service;

#[cfg(test)]
pub mod test_support;
