use thiserror::Error;

use crate::{Member, PrimitiveType, Type, WellKnown};

/// Returned by [`TypeQuery::unboxed_primitive`] when the queried type has no
/// primitive counterpart. Carries the printable form of the offending type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0} is not a boxed primitive type")]
pub struct NotABoxType(pub String);

/// Relational primitives supplied by the host type database.
///
/// Everything the model layer knows about types flows through this handle;
/// implementations must answer purely, with no observable side effects, so
/// repeated queries over one generation pass agree with each other.
pub trait TypeQuery {
    /// The canonical form of `ty` with type arguments stripped.
    fn erasure(&self, ty: &Type) -> Type;

    /// Identity under the host's same-type relation.
    fn is_same_type(&self, a: &Type, b: &Type) -> bool;

    /// Whether a value of type `from` is assignable to `to`,
    /// substitution-aware.
    fn is_assignable(&self, from: &Type, to: &Type) -> bool;

    /// Immediate supertypes of `ty`: the class supertype first, then declared
    /// interfaces in declaration order, each substituted for the
    /// instantiation. The ordering is part of the contract — breadth-first
    /// searches over this graph must be deterministic.
    fn direct_supertypes(&self, ty: &Type) -> Vec<Type>;

    /// The direct class supertype of a declared type, if it has one.
    /// Interfaces, primitives, arrays, and the root object type have none.
    fn class_supertype(&self, ty: &Type) -> Option<Type>;

    /// The transitive member set of `ty`, inherited members included, each
    /// substituted for its declaring instantiation. Overriding declarations
    /// are not deduplicated.
    fn all_members(&self, ty: &Type) -> Vec<Member>;

    /// The primitive counterpart of a boxed wrapper type.
    fn unboxed_primitive(&self, ty: &Type) -> Result<Type, NotABoxType>;

    /// The canonical boxed wrapper for a primitive kind.
    fn boxed_for(&self, kind: PrimitiveType) -> Type;

    /// Printable host-syntax spelling of `ty`, e.g.
    /// `java.util.List<java.lang.String>` or `int[]`.
    fn render(&self, ty: &Type) -> String;

    /// The canonical well-known types configured for this database.
    fn well_known(&self) -> &WellKnown;
}
