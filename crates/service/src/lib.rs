//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access and from HTTP.
//! - Reuses validation and entity definitions in `models` crate.
//! - Repositories are traits, with SeaORM and in-memory implementations.

pub mod errors;
pub mod auth;
pub mod profile;
#[cfg(test)]
pub mod test_support;
