//! Redude application library
//!
//! Book search and rating service: the users and books modules, plus the
//! wiring that puts them behind the shared HTTP server.

pub mod app;
pub mod modules;

#[cfg(test)]
mod test_support;

pub use app::{build_registry, run, AppServices};
