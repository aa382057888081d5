//! Core business logic module
//!
//! Dependency resolution and build execution. External programs are reached
//! only through the [`crate::infra`] traits.
//!
//! # Submodules
//!
//! - [`project`] - Project file parsing and reference extraction
//! - [`index`] - Candidate project discovery under the search roots
//! - [`framework`] - Target framework compatibility rule
//! - [`resolver`] - Assembly name to project resolution with caching
//! - [`order`] - Worklist linearization into a build order
//! - [`graph`] - Reference graph over real project files
//! - [`checkpoint`] - Resume file persistence
//! - [`builder`] - Sequential build execution

pub mod builder;
pub mod checkpoint;
pub mod framework;
pub mod graph;
pub mod index;
pub mod order;
pub mod project;
pub mod resolver;
