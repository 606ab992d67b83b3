//! Test data


pub use fixtures::{CatalogConfig, TestDataFactory};
