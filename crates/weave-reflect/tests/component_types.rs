#![forbid(unsafe_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use tracing_subscriber::fmt::MakeWriter;
use weave_reflect::ModelType;
use weave_types::{ClassDef, ClassKind, MethodDef, PrimitiveType, Type, TypeQuery, TypeStore};

#[test]
fn array_component_is_the_element_type() {
    let store = TypeStore::with_minimal_platform();

    let ints = ModelType::new(&store, Type::array(Type::int()));
    let component = ints.component_type().expect("arrays always have a component");
    assert_eq!(component.as_type(), &Type::int());

    let string = Type::class(store.well_known().string, vec![]);
    let strings = ModelType::new(&store, Type::array(string.clone()));
    assert_eq!(strings.component_type().unwrap().as_type(), &string);
}

#[test]
fn list_component_comes_from_the_indexed_accessor() {
    let store = TypeStore::with_minimal_platform();
    let array_list = store.class_id("java.util.ArrayList").unwrap();
    let string = Type::class(store.well_known().string, vec![]);

    let list = ModelType::new(&store, Type::class(array_list, vec![string.clone()]));
    assert!(list.is_list());

    let component = list.component_type().expect("List get(int) should resolve");
    assert_eq!(component.as_type(), &string);
    assert!(component.is_string());
}

#[test]
fn map_component_is_the_value_type_argument() {
    let store = TypeStore::with_minimal_platform();
    let hash_map = store.class_id("java.util.HashMap").unwrap();
    let string = Type::class(store.well_known().string, vec![]);
    let integer = Type::class(store.class_id("java.lang.Integer").unwrap(), vec![]);

    let map = ModelType::new(
        &store,
        Type::class(hash_map, vec![string, integer.clone()]),
    );
    assert!(map.is_map());
    assert!(!map.is_list());

    // String-to-int mapping yields the boxed integer.
    let component = map.component_type().expect("Map value type should resolve");
    assert_eq!(component.as_type(), &integer);
    assert_eq!(component.unbox().as_type(), &Type::int());
}

#[test]
fn diamond_hierarchies_resolve_in_breadth_first_declaration_order() {
    let mut store = TypeStore::with_minimal_platform();
    let map = store.well_known().map;
    let object = Type::class(store.well_known().object, vec![]);
    let string = Type::class(store.well_known().string, vec![]);
    let integer = Type::class(store.class_id("java.lang.Integer").unwrap(), vec![]);
    let boolean = Type::class(store.class_id("java.lang.Boolean").unwrap(), vec![]);

    let to_int = store.add_class(ClassDef {
        name: "com.example.StringToInt".to_string(),
        kind: ClassKind::Interface,
        type_params: vec![],
        super_class: None,
        interfaces: vec![Type::class(map, vec![string.clone(), integer.clone()])],
        methods: vec![],
    });
    let to_bool = store.add_class(ClassDef {
        name: "com.example.StringToBool".to_string(),
        kind: ClassKind::Interface,
        type_params: vec![],
        super_class: None,
        interfaces: vec![Type::class(map, vec![string, boolean.clone()])],
        methods: vec![],
    });

    let int_first = store.add_class(ClassDef {
        name: "com.example.IntFirst".to_string(),
        kind: ClassKind::Class,
        type_params: vec![],
        super_class: Some(object.clone()),
        interfaces: vec![Type::class(to_int, vec![]), Type::class(to_bool, vec![])],
        methods: vec![],
    });
    let bool_first = store.add_class(ClassDef {
        name: "com.example.BoolFirst".to_string(),
        kind: ClassKind::Class,
        type_params: vec![],
        super_class: Some(object),
        interfaces: vec![Type::class(to_bool, vec![]), Type::class(to_int, vec![])],
        methods: vec![],
    });

    let int_first = ModelType::new(&store, Type::class(int_first, vec![]));
    let bool_first = ModelType::new(&store, Type::class(bool_first, vec![]));

    // The first mapping instantiation in breadth-first order wins, and the
    // answer is stable across repeated queries.
    for _ in 0..3 {
        assert_eq!(int_first.component_type().unwrap().as_type(), &integer);
        assert_eq!(bool_first.component_type().unwrap().as_type(), &boolean);
    }
}

#[test]
fn list_like_type_without_an_indexed_accessor_has_no_component() {
    let mut store = TypeStore::with_minimal_platform();
    let object = Type::class(store.well_known().object, vec![]);

    let sequence = store.add_class(ClassDef {
        name: "com.example.Sequence".to_string(),
        kind: ClassKind::Interface,
        type_params: vec![],
        super_class: None,
        interfaces: vec![],
        methods: vec![],
    });
    store.register_list_marker(sequence);

    let holder = store.add_class(ClassDef {
        name: "com.example.SequenceHolder".to_string(),
        kind: ClassKind::Class,
        type_params: vec![],
        super_class: Some(object),
        interfaces: vec![Type::class(sequence, vec![])],
        methods: vec![],
    });

    let holder = ModelType::new(&store, Type::class(holder, vec![]));
    assert!(holder.is_list());
    assert!(holder.component_type().is_none());
}

#[test]
fn list_like_classification_follows_the_configured_marker_set() {
    let mut store = TypeStore::with_minimal_platform();
    let object = Type::class(store.well_known().object, vec![]);
    let string = Type::class(store.well_known().string, vec![]);

    // A platform-specific indexed container that is not a java.util.List.
    let pageable_e = store.add_type_param("E", vec![object.clone()]);
    let pageable = store.add_class(ClassDef {
        name: "com.example.Pageable".to_string(),
        kind: ClassKind::Interface,
        type_params: vec![pageable_e],
        super_class: None,
        interfaces: vec![],
        methods: vec![MethodDef {
            name: "get".to_string(),
            params: vec![Type::Primitive(PrimitiveType::Long)],
            return_type: Type::TypeVar(pageable_e),
            is_static: false,
            is_varargs: false,
        }],
    });
    let page = store.add_class(ClassDef {
        name: "com.example.Page".to_string(),
        kind: ClassKind::Class,
        type_params: vec![],
        super_class: Some(object),
        interfaces: vec![Type::class(pageable, vec![string.clone()])],
        methods: vec![],
    });

    {
        let unconfigured = ModelType::new(&store, Type::class(page, vec![]));
        assert!(!unconfigured.is_list());
    }

    store.register_list_marker(pageable);

    let page = ModelType::new(&store, Type::class(page, vec![]));
    assert!(page.is_list());

    // The long-indexed accessor qualifies just like an int-indexed one.
    let component = page.component_type().expect("Pageable get(long) should resolve");
    assert_eq!(component.as_type(), &string);
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = Capture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn object_component_resolution_fails_with_one_diagnostic() {
    let store = TypeStore::with_minimal_platform();
    let capture = Capture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .finish();

    let object = ModelType::new(&store, Type::class(store.well_known().object, vec![]));
    assert!(!object.is_array());
    assert!(!object.is_list());

    let component = tracing::subscriber::with_default(subscriber, || object.component_type());

    assert!(component.is_none());
    let logs = capture.contents();
    assert_eq!(
        logs.matches("could not locate the implemented interface").count(),
        1,
        "expected exactly one diagnostic, got:\n{logs}"
    );
}
