//! Canonical data model types.

pub mod connection;
pub mod events;
pub mod meeting;
pub mod summary;
