//! Business profile module: one profile per business user, public reads, search + sort.

pub mod domain;
pub mod repository;
pub mod search;
pub mod service;
pub mod repo;

pub use service::ProfileService;
