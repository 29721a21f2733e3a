use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::error;
use weave_types::{ClassType, NotABoxType, PrimitiveType, Type, TypeQuery};

use crate::meta::{DescriptorFormat, PlatformVersions};
use crate::method::{ArityRule, ModelMethod};

/// One type reference viewed through the host database.
///
/// Cheap to construct and clone; equality follows the database's same-type
/// relation, so independently constructed values wrapping the same reference
/// compare equal. Operations never mutate — navigation produces new values.
#[derive(Clone)]
pub struct ModelType<'q> {
    query: &'q dyn TypeQuery,
    ty: Type,
}

impl<'q> ModelType<'q> {
    pub fn new(query: &'q dyn TypeQuery, ty: Type) -> Self {
        Self { query, ty }
    }

    /// The wrapped reference.
    pub fn as_type(&self) -> &Type {
        &self.ty
    }

    // Classification. All O(1) against the wrapped kind, infallible.

    pub fn is_array(&self) -> bool {
        matches!(self.ty, Type::Array(_))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.ty, Type::Primitive(_))
    }

    /// Arrays, declared types, and the null type accept `null`; nothing else
    /// does.
    pub fn is_nullable(&self) -> bool {
        matches!(self.ty, Type::Array(_) | Type::Class(_) | Type::Null)
    }

    pub fn is_void(&self) -> bool {
        matches!(self.ty, Type::Void)
    }

    fn is_kind(&self, kind: PrimitiveType) -> bool {
        self.ty == Type::Primitive(kind)
    }

    pub fn is_boolean(&self) -> bool {
        self.is_kind(PrimitiveType::Boolean)
    }

    pub fn is_byte(&self) -> bool {
        self.is_kind(PrimitiveType::Byte)
    }

    pub fn is_short(&self) -> bool {
        self.is_kind(PrimitiveType::Short)
    }

    pub fn is_int(&self) -> bool {
        self.is_kind(PrimitiveType::Int)
    }

    pub fn is_long(&self) -> bool {
        self.is_kind(PrimitiveType::Long)
    }

    pub fn is_char(&self) -> bool {
        self.is_kind(PrimitiveType::Char)
    }

    pub fn is_float(&self) -> bool {
        self.is_kind(PrimitiveType::Float)
    }

    pub fn is_double(&self) -> bool {
        self.is_kind(PrimitiveType::Double)
    }

    pub fn is_string(&self) -> bool {
        let string = Type::class(self.query.well_known().string, vec![]);
        self.query.is_same_type(&self.ty, &string)
    }

    pub fn is_object(&self) -> bool {
        let object = Type::class(self.query.well_known().object, vec![]);
        self.query.is_same_type(&self.ty, &object)
    }

    // Collection classification and element extraction.

    /// Configuration-driven: true iff some registry list-like marker is
    /// assignable from this type, checked in registry order.
    pub fn is_list(&self) -> bool {
        self.query
            .well_known()
            .list_like
            .iter()
            .any(|marker| self.query.is_assignable(&self.ty, &Type::class(*marker, vec![])))
    }

    /// True iff this type's erasure is assignable to the canonical mapping
    /// type.
    pub fn is_map(&self) -> bool {
        let map = Type::class(self.query.well_known().map, vec![]);
        self.query.is_assignable(&self.query.erasure(&self.ty), &map)
    }

    /// The element or value type this container yields.
    ///
    /// Arrays answer directly. List-like types answer through their `get`
    /// accessor taking an `int` or `long` index; a list-like type without one
    /// is degenerate but legal and yields `None` quietly. Anything else is
    /// assumed map-like and answers with the value type of its mapping
    /// interface instantiation, or `None` with a diagnostic when that
    /// instantiation cannot be located.
    pub fn component_type(&self) -> Option<ModelType<'q>> {
        if let Type::Array(elem) = &self.ty {
            return Some(ModelType::new(self.query, (**elem).clone()));
        }

        if self.is_list() {
            for method in self.methods("get", 1) {
                let params = method.parameter_types();
                let Some(index) = params.first() else {
                    continue;
                };
                if index.is_int() || index.is_long() {
                    return Some(method.return_type());
                }
            }
            return None;
        }

        let map = Type::class(self.query.well_known().map, vec![]);
        match self.find_interface(&map)? {
            Type::Class(ClassType { args, .. }) if args.len() >= 2 => {
                Some(ModelType::new(self.query, args[1].clone()))
            }
            found => {
                error!(
                    ty = %self.query.render(&self.ty),
                    found = %self.query.render(&found),
                    "map-like type resolved to an instantiation without a value type argument"
                );
                None
            }
        }
    }

    /// Locate the instantiation of `target` (compared by erasure) in this
    /// type's supertype closure.
    ///
    /// Breadth-first from the type itself; the first match in visit order
    /// wins, which makes diamond hierarchies deterministic. The visited set
    /// guards against cyclic supertype graphs from hosts that allow them.
    fn find_interface(&self, target: &Type) -> Option<Type> {
        let query = self.query;
        let target = query.erasure(target);

        let mut queue: VecDeque<Type> = VecDeque::new();
        let mut seen: HashSet<Type> = HashSet::new();
        queue.push_back(self.ty.clone());

        let mut found = None;
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if query.is_same_type(&target, &query.erasure(&current)) {
                found = Some(current);
                break;
            }
            for sup in query.direct_supertypes(&current) {
                queue.push_back(sup);
            }
        }

        let Some(found) = found else {
            error!(
                iface = %query.render(&target),
                ty = %query.render(&self.ty),
                "could not locate the implemented interface in the supertype closure"
            );
            return None;
        };
        if !matches!(found, Type::Class(_)) {
            error!(
                iface = %query.render(&target),
                ty = %query.render(&self.ty),
                found = %query.render(&found),
                "matched supertype is not a declared type"
            );
            return None;
        }
        Some(found)
    }

    // Boxing conversions.

    /// The primitive counterpart of a boxed wrapper. Types the database does
    /// not recognize as wrappers come back unchanged.
    pub fn unbox(&self) -> ModelType<'q> {
        if !self.is_nullable() {
            return self.clone();
        }
        match self.query.unboxed_primitive(&self.ty) {
            Ok(primitive) => ModelType::new(self.query, primitive),
            Err(NotABoxType(_)) => self.clone(),
        }
    }

    /// The canonical boxed counterpart. Non-primitives come back unchanged.
    pub fn boxed(&self) -> ModelType<'q> {
        match self.ty {
            Type::Primitive(kind) => ModelType::new(self.query, self.query.boxed_for(kind)),
            _ => self.clone(),
        }
    }

    // Navigation and method lookup.

    /// The direct class supertype, when this is a declared type that has one.
    /// Absent for primitives, arrays, interfaces, and the root object type.
    pub fn superclass(&self) -> Option<ModelType<'q>> {
        let sup = self.query.class_supertype(&self.ty)?;
        matches!(sup, Type::Class(_)).then(|| ModelType::new(self.query, sup))
    }

    /// Every transitive member named `name` admitting `arity` arguments under
    /// the [`ArityRule`] policy, inherited members included.
    ///
    /// Overriding declarations are not deduplicated; callers apply their own
    /// precedence when several declarations share a signature shape. Empty for
    /// non-declared kinds.
    pub fn methods(&self, name: &str, arity: usize) -> Vec<ModelMethod<'q>> {
        if !matches!(self.ty, Type::Class(_)) {
            return Vec::new();
        }
        self.query
            .all_members(&self.ty)
            .into_iter()
            .filter(|member| {
                member.method.name == name && ArityRule::of(&member.method).admits(arity)
            })
            .map(|member| ModelMethod::new(self.query, member))
            .collect()
    }

    /// Whether a value of `other`'s type can be assigned to this type.
    pub fn is_assignable_from(&self, other: &ModelType<'_>) -> bool {
        self.query.is_assignable(&other.ty, &self.ty)
    }

    // Formatting and metadata pass-throughs.

    /// Host-syntax spelling, used when emitting generated code.
    pub fn to_code(&self) -> String {
        self.query.render(&self.ty)
    }

    /// Printable form of the erasure.
    pub fn canonical_name(&self) -> String {
        self.query.render(&self.query.erasure(&self.ty))
    }

    /// Minimum platform version shipping this type, per the supplied source.
    pub fn min_platform_version(&self, versions: &dyn PlatformVersions) -> Option<u32> {
        versions.min_version(self)
    }

    /// Binary interop descriptor, per the supplied format.
    pub fn binary_descriptor(&self, format: &dyn DescriptorFormat) -> String {
        format.descriptor(self)
    }
}

impl PartialEq for ModelType<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.query.is_same_type(&self.ty, &other.ty)
    }
}

impl Eq for ModelType<'_> {}

/// Hashes the printable form of the erasure rather than of the full
/// instantiation, so two spellings of one same-type reference cannot land in
/// different buckets. Equal values share an erasure, which keeps this
/// consistent with the equality above.
impl Hash for ModelType<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_name().hash(state);
    }
}

impl fmt::Debug for ModelType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelType({})", self.to_code())
    }
}

impl fmt::Display for ModelType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_code())
    }
}
