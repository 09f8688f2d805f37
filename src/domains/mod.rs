//! Domains module: the MCP-facing surface, organised by concern.
//!
//! `tools` and `resources` hold the dispatch frameworks and their
//! per-service-area definitions; `catalog` decides which areas are exposed.

pub mod catalog;
pub mod resources;
pub mod tools;

pub use catalog::{Catalog, CatalogError, Service, select_services};
