/// CRUD operations tests against a live database
pub mod crud_tests;
