//! Integration test suite for helmkit
//!
//! End-to-end tests that run the `helmkit` binary against temporary
//! directories.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! Tests are organized by functionality area:
//! - **cli**: Global flags, argument validation and error rendering
//! - **conf**: `.conf` discovery, resolution, database grouping and JSON output
//! - **product**: Product catalog, extraction, instantiation and validation

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli;
mod conf;
mod product;
