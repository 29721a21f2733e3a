use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Interned identifier for a class or interface definition in a type database.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Interned identifier for a type parameter declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeVarId(pub(crate) u32);

impl TypeVarId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The eight primitive kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
}

impl PrimitiveType {
    /// Source-syntax keyword for this kind.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Char => "char",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }
}

/// A class or interface instantiation. `args` is empty for raw references.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassType {
    pub def: ClassId,
    pub args: Vec<Type>,
}

/// One type reference.
///
/// References are plain data: all relational questions (identity,
/// assignability, supertypes, members) go through [`crate::TypeQuery`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Primitive(PrimitiveType),
    Array(Box<Type>),
    /// A declared (class or interface) type.
    Class(ClassType),
    TypeVar(TypeVarId),
    Null,
    Void,
}

impl Type {
    pub fn class(def: ClassId, args: Vec<Type>) -> Self {
        Type::Class(ClassType { def, args })
    }

    pub fn array(elem: Type) -> Self {
        Type::Array(Box::new(elem))
    }

    pub fn int() -> Self {
        Type::Primitive(PrimitiveType::Int)
    }

    pub fn boolean() -> Self {
        Type::Primitive(PrimitiveType::Boolean)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
}

/// A class or interface definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Binary name, e.g. `java.util.List`.
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeVarId>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
    pub methods: Vec<MethodDef>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub is_static: bool,
    /// The final parameter accepts a packed trailing sequence.
    pub is_varargs: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParamDef {
    pub name: String,
    pub upper_bounds: Vec<Type>,
}

/// A method paired with the instantiation that declares it, type arguments
/// already substituted for that instantiation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub declaring: Type,
    pub method: MethodDef,
}

/// Canonical registry entries configured once at database construction and
/// read-only afterwards.
#[derive(Clone, Debug)]
pub struct WellKnown {
    pub string: ClassId,
    pub object: ClassId,
    /// The canonical key/value mapping interface.
    pub map: ClassId,
    /// Ordered marker set for "list-like" classification. Which types count as
    /// sequential and index-accessible is a platform decision, not a fixed
    /// contract.
    pub list_like: Vec<ClassId>,
}

/// Replace type variables in `ty` according to `subst`. Variables without a
/// mapping pass through unchanged, which keeps raw instantiations raw.
pub fn substitute(ty: &Type, subst: &HashMap<TypeVarId, Type>) -> Type {
    match ty {
        Type::TypeVar(id) => subst.get(id).cloned().unwrap_or_else(|| ty.clone()),
        Type::Array(elem) => Type::Array(Box::new(substitute(elem, subst))),
        Type::Class(ClassType { def, args }) => Type::Class(ClassType {
            def: *def,
            args: args.iter().map(|arg| substitute(arg, subst)).collect(),
        }),
        other => other.clone(),
    }
}
