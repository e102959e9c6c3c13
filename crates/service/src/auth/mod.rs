//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login and bearer-token issue/verify live here; HTTP wiring
//! stays in the server crate.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;
pub mod token;

pub use service::AuthService;
pub use token::{Claims, TokenKeys};
