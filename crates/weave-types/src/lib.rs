//! Type-database model for the Weave data-binding code generator.
//!
//! This crate defines the opaque [`Type`] reference shape shared across the
//! generator, the [`TypeQuery`] capability through which every relational
//! question about types is answered, and [`TypeStore`], an in-memory database
//! that serves as the reference `TypeQuery` implementation and as the test
//! double for the model layer in `weave-reflect`.

#![forbid(unsafe_code)]

mod model;
mod query;
mod store;

pub use model::{
    substitute, ClassDef, ClassId, ClassKind, ClassType, Member, MethodDef, PrimitiveType, Type,
    TypeParamDef, TypeVarId, WellKnown,
};
pub use query::{NotABoxType, TypeQuery};
pub use store::TypeStore;
