use std::collections::{HashMap, HashSet, VecDeque};

use crate::{
    substitute, ClassDef, ClassId, ClassKind, ClassType, Member, MethodDef, NotABoxType,
    PrimitiveType, Type, TypeParamDef, TypeQuery, TypeVarId, WellKnown,
};

/// In-memory type database implementing [`TypeQuery`].
///
/// Production hosts adapt their own reflection engine behind [`TypeQuery`];
/// the store exists so the model layer and its tests always have a live
/// database to compose with. Classes and type parameters are interned by
/// insertion order, which keeps every walk over the store deterministic.
#[derive(Clone, Debug)]
pub struct TypeStore {
    classes: Vec<ClassDef>,
    by_name: HashMap<String, ClassId>,
    type_params: Vec<TypeParamDef>,
    boxes: Vec<(PrimitiveType, ClassId)>,
    well_known: WellKnown,
}

impl TypeStore {
    /// Seed the canonical platform model: the `java.lang` core types, the
    /// eight boxed wrappers, and the `java.util` collection interfaces, with
    /// `java.util.List` registered as the sole list-like marker.
    pub fn with_minimal_platform() -> Self {
        let mut store = TypeStore {
            classes: Vec::new(),
            by_name: HashMap::new(),
            type_params: Vec::new(),
            boxes: Vec::new(),
            well_known: WellKnown {
                string: ClassId(0),
                object: ClassId(0),
                map: ClassId(0),
                list_like: Vec::new(),
            },
        };

        let object = store.add_class(ClassDef {
            name: "java.lang.Object".to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: None,
            interfaces: vec![],
            methods: vec![],
        });
        let object_ty = Type::class(object, vec![]);

        let string = store.add_class(ClassDef {
            name: "java.lang.String".to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: Some(object_ty.clone()),
            interfaces: vec![],
            methods: vec![
                MethodDef {
                    name: "length".to_string(),
                    params: vec![],
                    return_type: Type::int(),
                    is_static: false,
                    is_varargs: false,
                },
                MethodDef {
                    name: "charAt".to_string(),
                    params: vec![Type::int()],
                    return_type: Type::Primitive(PrimitiveType::Char),
                    is_static: false,
                    is_varargs: false,
                },
            ],
        });
        let string_ty = Type::class(string, vec![]);

        // Object's members, now that String exists.
        if let Some(def) = store.class_mut(object) {
            def.methods = vec![
                MethodDef {
                    name: "equals".to_string(),
                    params: vec![object_ty.clone()],
                    return_type: Type::boolean(),
                    is_static: false,
                    is_varargs: false,
                },
                MethodDef {
                    name: "hashCode".to_string(),
                    params: vec![],
                    return_type: Type::int(),
                    is_static: false,
                    is_varargs: false,
                },
                MethodDef {
                    name: "toString".to_string(),
                    params: vec![],
                    return_type: string_ty,
                    is_static: false,
                    is_varargs: false,
                },
            ];
        }

        for (kind, name) in [
            (PrimitiveType::Boolean, "java.lang.Boolean"),
            (PrimitiveType::Byte, "java.lang.Byte"),
            (PrimitiveType::Short, "java.lang.Short"),
            (PrimitiveType::Int, "java.lang.Integer"),
            (PrimitiveType::Long, "java.lang.Long"),
            (PrimitiveType::Char, "java.lang.Character"),
            (PrimitiveType::Float, "java.lang.Float"),
            (PrimitiveType::Double, "java.lang.Double"),
        ] {
            let id = store.add_class(ClassDef {
                name: name.to_string(),
                kind: ClassKind::Class,
                type_params: vec![],
                super_class: Some(object_ty.clone()),
                interfaces: vec![],
                methods: vec![],
            });
            store.boxes.push((kind, id));
        }

        let collection_e = store.add_type_param("E", vec![object_ty.clone()]);
        let collection = store.add_class(ClassDef {
            name: "java.util.Collection".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![collection_e],
            super_class: None,
            interfaces: vec![],
            methods: vec![
                MethodDef {
                    name: "size".to_string(),
                    params: vec![],
                    return_type: Type::int(),
                    is_static: false,
                    is_varargs: false,
                },
                MethodDef {
                    name: "isEmpty".to_string(),
                    params: vec![],
                    return_type: Type::boolean(),
                    is_static: false,
                    is_varargs: false,
                },
            ],
        });

        let list_e = store.add_type_param("E", vec![object_ty.clone()]);
        let list = store.add_class(ClassDef {
            name: "java.util.List".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![list_e],
            super_class: None,
            interfaces: vec![Type::class(collection, vec![Type::TypeVar(list_e)])],
            methods: vec![MethodDef {
                name: "get".to_string(),
                params: vec![Type::int()],
                return_type: Type::TypeVar(list_e),
                is_static: false,
                is_varargs: false,
            }],
        });

        let array_list_e = store.add_type_param("E", vec![object_ty.clone()]);
        store.add_class(ClassDef {
            name: "java.util.ArrayList".to_string(),
            kind: ClassKind::Class,
            type_params: vec![array_list_e],
            super_class: Some(object_ty.clone()),
            interfaces: vec![Type::class(list, vec![Type::TypeVar(array_list_e)])],
            methods: vec![],
        });

        let map_k = store.add_type_param("K", vec![object_ty.clone()]);
        let map_v = store.add_type_param("V", vec![object_ty.clone()]);
        let map = store.add_class(ClassDef {
            name: "java.util.Map".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![map_k, map_v],
            super_class: None,
            interfaces: vec![],
            methods: vec![
                MethodDef {
                    name: "get".to_string(),
                    params: vec![object_ty.clone()],
                    return_type: Type::TypeVar(map_v),
                    is_static: false,
                    is_varargs: false,
                },
                MethodDef {
                    name: "size".to_string(),
                    params: vec![],
                    return_type: Type::int(),
                    is_static: false,
                    is_varargs: false,
                },
            ],
        });

        let hash_map_k = store.add_type_param("K", vec![object_ty.clone()]);
        let hash_map_v = store.add_type_param("V", vec![object_ty.clone()]);
        store.add_class(ClassDef {
            name: "java.util.HashMap".to_string(),
            kind: ClassKind::Class,
            type_params: vec![hash_map_k, hash_map_v],
            super_class: Some(object_ty),
            interfaces: vec![Type::class(
                map,
                vec![Type::TypeVar(hash_map_k), Type::TypeVar(hash_map_v)],
            )],
            methods: vec![],
        });

        store.well_known = WellKnown {
            string,
            object,
            map,
            list_like: vec![list],
        };
        store
    }

    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.by_name.insert(def.name.clone(), id);
        self.classes.push(def);
        id
    }

    pub fn add_type_param(&mut self, name: impl Into<String>, upper_bounds: Vec<Type>) -> TypeVarId {
        let id = TypeVarId(self.type_params.len() as u32);
        self.type_params.push(TypeParamDef {
            name: name.into(),
            upper_bounds,
        });
        id
    }

    /// Extend the ordered list-like marker set. Configuration-time only: call
    /// before handing the store to analysis, never during a generation pass.
    pub fn register_list_marker(&mut self, id: ClassId) {
        self.well_known.list_like.push(id);
    }

    pub fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.index())
    }

    pub fn class_mut(&mut self, id: ClassId) -> Option<&mut ClassDef> {
        self.classes.get_mut(id.index())
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    pub fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.index())
    }

    fn object_raw(&self) -> Type {
        Type::class(self.well_known.object, vec![])
    }

    /// Match a class reference against a target erasure by walking the
    /// supertype closure. Generic instantiations are invariant in their
    /// arguments; a raw side matches unchecked.
    fn class_assignable(&self, from: &Type, target: &ClassType) -> bool {
        let mut queue: VecDeque<Type> = VecDeque::new();
        let mut seen: HashSet<Type> = HashSet::new();
        queue.push_back(from.clone());

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Type::Class(ClassType { def, args }) = &current {
                if *def == target.def {
                    // A well-formed hierarchy instantiates one erasure only
                    // once, so the first hit decides.
                    return target.args.is_empty() || args.is_empty() || *args == target.args;
                }
            }
            for sup in self.direct_supertypes(&current) {
                queue.push_back(sup);
            }
        }
        false
    }
}

/// Substitution map for one instantiation. Missing arguments (raw references)
/// map each formal to itself so rawness is preserved while walking.
fn instantiation_subst(def: &ClassDef, args: &[Type]) -> HashMap<TypeVarId, Type> {
    def.type_params
        .iter()
        .copied()
        .enumerate()
        .map(|(idx, formal)| {
            let actual = args.get(idx).cloned().unwrap_or(Type::TypeVar(formal));
            (formal, actual)
        })
        .collect()
}

fn widens_to(from: PrimitiveType, to: PrimitiveType) -> bool {
    use PrimitiveType::*;
    if from == to {
        return true;
    }
    matches!(
        (from, to),
        (Byte, Short | Int | Long | Float | Double)
            | (Short, Int | Long | Float | Double)
            | (Char, Int | Long | Float | Double)
            | (Int, Long | Float | Double)
            | (Long, Float | Double)
            | (Float, Double)
    )
}

impl TypeQuery for TypeStore {
    fn erasure(&self, ty: &Type) -> Type {
        match ty {
            Type::Class(ClassType { def, .. }) => Type::class(*def, vec![]),
            Type::Array(elem) => Type::Array(Box::new(self.erasure(elem))),
            Type::TypeVar(id) => self
                .type_param(*id)
                .and_then(|tp| tp.upper_bounds.first())
                .map(|bound| self.erasure(bound))
                .unwrap_or_else(|| self.object_raw()),
            other => other.clone(),
        }
    }

    fn is_same_type(&self, a: &Type, b: &Type) -> bool {
        // References are interned, so structural equality is the same-type
        // relation.
        a == b
    }

    fn is_assignable(&self, from: &Type, to: &Type) -> bool {
        if from == to {
            return true;
        }
        match (from, to) {
            (Type::Null, Type::Class(_) | Type::Array(_)) => true,
            (Type::Primitive(a), Type::Primitive(b)) => widens_to(*a, *b),
            (Type::Array(a), Type::Array(b)) => {
                // Reference arrays are covariant; primitive arrays only match
                // exactly (handled by the equality check above).
                !matches!(**a, Type::Primitive(_))
                    && !matches!(**b, Type::Primitive(_))
                    && self.is_assignable(a, b)
            }
            (Type::Array(_), Type::Class(target)) => {
                target.def == self.well_known.object && target.args.is_empty()
            }
            (Type::TypeVar(id), _) => self.type_param(*id).is_some_and(|tp| {
                tp.upper_bounds
                    .iter()
                    .any(|bound| self.is_assignable(bound, to))
            }),
            (Type::Class(_), Type::Class(target)) => self.class_assignable(from, target),
            _ => false,
        }
    }

    fn direct_supertypes(&self, ty: &Type) -> Vec<Type> {
        match ty {
            Type::Class(ClassType { def, args }) => {
                let Some(class_def) = self.class(*def) else {
                    return Vec::new();
                };
                let subst = instantiation_subst(class_def, args);
                let mut out = Vec::new();
                match (class_def.kind, &class_def.super_class) {
                    (ClassKind::Class, Some(sc)) => out.push(substitute(sc, &subst)),
                    (ClassKind::Class, None) if *def != self.well_known.object => {
                        out.push(self.object_raw())
                    }
                    // Every interface has the root object type as an implicit
                    // supertype.
                    (ClassKind::Interface, _) => out.push(self.object_raw()),
                    _ => {}
                }
                for iface in &class_def.interfaces {
                    out.push(substitute(iface, &subst));
                }
                out
            }
            Type::Array(_) => vec![self.object_raw()],
            Type::TypeVar(id) => self
                .type_param(*id)
                .map(|tp| tp.upper_bounds.clone())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    fn class_supertype(&self, ty: &Type) -> Option<Type> {
        let Type::Class(ClassType { def, args }) = ty else {
            return None;
        };
        let class_def = self.class(*def)?;
        if class_def.kind != ClassKind::Class || *def == self.well_known.object {
            return None;
        }
        let subst = instantiation_subst(class_def, args);
        match &class_def.super_class {
            Some(sc) => Some(substitute(sc, &subst)),
            None => Some(self.object_raw()),
        }
    }

    fn all_members(&self, ty: &Type) -> Vec<Member> {
        let mut out = Vec::new();
        if !matches!(ty, Type::Class(_)) {
            return out;
        }

        let mut queue: VecDeque<Type> = VecDeque::new();
        let mut seen: HashSet<Type> = HashSet::new();
        queue.push_back(ty.clone());

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            let Type::Class(ClassType { def, args }) = &current else {
                continue;
            };
            let Some(class_def) = self.class(*def) else {
                continue;
            };
            let subst = instantiation_subst(class_def, args);
            for method in &class_def.methods {
                out.push(Member {
                    declaring: current.clone(),
                    method: MethodDef {
                        name: method.name.clone(),
                        params: method
                            .params
                            .iter()
                            .map(|p| substitute(p, &subst))
                            .collect(),
                        return_type: substitute(&method.return_type, &subst),
                        is_static: method.is_static,
                        is_varargs: method.is_varargs,
                    },
                });
            }
            for sup in self.direct_supertypes(&current) {
                queue.push_back(sup);
            }
        }
        out
    }

    fn unboxed_primitive(&self, ty: &Type) -> Result<Type, NotABoxType> {
        if let Type::Class(ClassType { def, args }) = ty {
            if args.is_empty() {
                if let Some((kind, _)) = self.boxes.iter().find(|(_, id)| id == def) {
                    return Ok(Type::Primitive(*kind));
                }
            }
        }
        Err(NotABoxType(self.render(ty)))
    }

    fn boxed_for(&self, kind: PrimitiveType) -> Type {
        self.boxes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, id)| Type::class(*id, vec![]))
            // The platform seed defines all eight wrappers; a store built
            // without one simply leaves that kind unboxed.
            .unwrap_or(Type::Primitive(kind))
    }

    fn render(&self, ty: &Type) -> String {
        match ty {
            Type::Primitive(kind) => kind.name().to_string(),
            Type::Array(elem) => format!("{}[]", self.render(elem)),
            Type::Class(ClassType { def, args }) => {
                let name = self
                    .class(*def)
                    .map(|d| d.name.as_str())
                    .unwrap_or("<unknown>");
                if args.is_empty() {
                    name.to_string()
                } else {
                    let args: Vec<String> = args.iter().map(|arg| self.render(arg)).collect();
                    format!("{}<{}>", name, args.join(", "))
                }
            }
            Type::TypeVar(id) => self
                .type_param(*id)
                .map(|tp| tp.name.clone())
                .unwrap_or_else(|| "?".to_string()),
            Type::Null => "null".to_string(),
            Type::Void => "void".to_string(),
        }
    }

    fn well_known(&self) -> &WellKnown {
        &self.well_known
    }
}
