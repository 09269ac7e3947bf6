//! `esst-core`: shared building blocks for the ESST portal crates.
//!
//! Identifiers, the entity trait and the domain error model. No IO.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{
    ConversationId, FormationId, MediaId, MessageId, NewsId, PageId, ProjectId, UserId,
};
