//! Data-driven catalog loading for the skill tree engine.
//!
//! Reads category and perk definitions from RON, JSON, or TOML files,
//! validates them, and resolves them into an immutable
//! [`Catalog`](skilltree_core::Catalog). The stock six-category tree is
//! embedded and available through [`load_builtin_catalog`].

pub mod catalog;
pub mod loader;
pub mod schema;

pub use catalog::{CatalogConfig, build_catalog, load_builtin_catalog, load_catalog, resolve_category};
pub use loader::{CatalogFile, DataLoadError, Format};
