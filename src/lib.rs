// Crate root library declaration and module exports.
pub mod autocomplete;
pub mod cache;
pub mod config;
pub mod context;
pub mod model;
pub mod session;
pub mod suppression;
