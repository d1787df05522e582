//! `orgbook-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod collections;
pub mod error;
pub mod id;
pub mod localized;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::TenantId;
pub use localized::{Locale, LocalizedText};
pub use value_object::ValueObject;
