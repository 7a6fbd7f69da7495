//! `shopkeep-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the application error, typed identifiers and entity bookkeeping.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, Timestamps};
pub use error::{AppError, AppResult};
pub use id::EntityId;
