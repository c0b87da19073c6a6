//! `tallyerp-core` — shared building blocks for voucher entry.
//!
//! Identifiers, entity/value-object markers and the domain error type. No IO.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{RowId, VoucherId};
pub use value_object::ValueObject;
