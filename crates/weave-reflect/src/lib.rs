//! Type-model layer of the Weave data-binding code generator.
//!
//! [`ModelType`] wraps one opaque type reference from the host database and
//! answers the structural questions code generation needs: array, list-like,
//! map-like, and primitive classification; element and value type extraction;
//! superclass navigation; and name + arity method lookup. Every operation is
//! a pure function of the wrapped reference and the shared
//! [`weave_types::TypeQuery`] handle — nothing here mutates the database.

#![forbid(unsafe_code)]

mod meta;
mod method;
mod model_type;

pub use meta::{DescriptorFormat, PlatformVersions};
pub use method::{ArityRule, ModelMethod};
pub use model_type::ModelType;
