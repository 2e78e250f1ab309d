//! Package cache, resolver and foreign package tests

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::gotypes::{GoObject, GoObjectKind, GoSignature, GoType, GoTypeDecl};
use super::resolver::{display_name, package_name};
use super::*;
use crate::frontend::types::{underlying, Type};

fn basic(name: &str) -> GoType {
    GoType::Basic { name: name.to_string() }
}

fn named(
    pkg: &str,
    name: &str,
) -> GoType {
    GoType::Named {
        pkg: pkg.to_string(),
        name: name.to_string(),
    }
}

fn package(
    path: &str,
    types: Vec<GoTypeDecl>,
    objects: Vec<GoObject>,
) -> GoPackage {
    GoPackage {
        path: path.to_string(),
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        types,
        objects,
    }
}

fn func_object(
    name: &str,
    sig: GoSignature,
) -> GoObject {
    GoObject {
        name: name.to_string(),
        kind: GoObjectKind::Func,
        ty: GoType::Func(sig),
        value: None,
    }
}

#[test]
fn test_map_importer_from_json() {
    let json = r#"[
        {"path": "math", "name": "math", "objects": [
            {"name": "Pi", "kind": "const", "type": {"kind": "basic", "name": "untyped float"}, "value": 3.14159},
            {"name": "Sqrt", "kind": "func", "type": {"kind": "func",
                "params": [{"kind": "basic", "name": "float64"}],
                "results": [{"kind": "basic", "name": "float64"}]}}
        ]},
        {"path": "io", "name": "io"}
    ]"#;
    let importer = MapImporter::from_json(json).unwrap();
    assert_eq!(importer.len(), 2);
    let math = importer.import("math").unwrap();
    assert_eq!(math.objects.len(), 2);
    assert_eq!(math.objects[1].kind, GoObjectKind::Func);
    assert!(matches!(importer.import("os"), Err(ImportError::NotFound { .. })));
    assert!(MapImporter::from_json("{").is_err());
}

#[test]
fn test_map_importer_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pkgs.json");
    std::fs::write(&path, r#"[{"path": "errors", "name": "errors"}]"#).unwrap();
    let importer = MapImporter::from_file(&path).unwrap();
    assert_eq!(importer.len(), 1);

    std::fs::write(&path, "not json").unwrap();
    assert!(matches!(MapImporter::from_file(&path), Err(ImportError::Foreign { .. })));
    assert!(matches!(
        MapImporter::from_file(&dir.path().join("none.json")),
        Err(ImportError::Io(..))
    ));
}

#[test]
fn test_translate_objects() {
    let importer = MapImporter::new();
    importer.insert(package(
        "strings",
        Vec::new(),
        vec![
            func_object(
                "Join",
                GoSignature {
                    params: vec![GoType::Slice { elem: Box::new(basic("string")) }, basic("string")],
                    results: vec![basic("string")],
                    variadic: false,
                },
            ),
            GoObject {
                name: "MaxLen".to_string(),
                kind: GoObjectKind::Const,
                ty: basic("untyped int"),
                value: Some(gotypes::GoConst::Int(1 << 20)),
            },
        ],
    ));
    let cache = PackageCache::new();
    let pkg = cache.foreign("strings", &importer).unwrap();
    assert!(pkg.is_foreign());
    assert_eq!(pkg.name, "strings");
    assert_eq!(pkg.member("Join").unwrap().ty.to_string(), "func([]string, string) string");
    let max = pkg.member("MaxLen").unwrap();
    assert_eq!(max.value.as_ref().and_then(|v| v.as_i64()), Some(1 << 20));
    assert_eq!(max.ty.to_string(), "untyped integer");
}

#[test]
fn test_translate_mutually_recursive_types() {
    let importer = MapImporter::new();
    importer.insert(package(
        "tree",
        vec![
            GoTypeDecl {
                name: "Node".to_string(),
                underlying: GoType::Struct {
                    fields: vec![gotypes::GoField {
                        name: "Kids".to_string(),
                        ty: GoType::Slice { elem: Box::new(named("", "Edge")) },
                        embedded: false,
                    }],
                },
                methods: Vec::new(),
            },
            GoTypeDecl {
                name: "Edge".to_string(),
                underlying: GoType::Struct {
                    fields: vec![gotypes::GoField {
                        name: "To".to_string(),
                        ty: GoType::Pointer { elem: Box::new(named("tree", "Node")) },
                        embedded: false,
                    }],
                },
                methods: Vec::new(),
            },
        ],
        Vec::new(),
    ));
    let cache = PackageCache::new();
    let pkg = cache.foreign("tree", &importer).unwrap();
    let Type::Named(node) = &pkg.member("Node").unwrap().ty else {
        panic!("Node is not named");
    };
    let Type::Named(edge) = &pkg.member("Edge").unwrap().ty else {
        panic!("Edge is not named");
    };
    assert_eq!(node.qualified_name(), "tree.Node");
    let Type::Struct(s) = underlying(&Type::Named(edge.clone())) else {
        panic!("Edge is not a struct");
    };
    let Type::Pointer(to) = &s.fields[0].ty else {
        panic!("Edge.To is not a pointer");
    };
    assert!(matches!(to.as_ref(), Type::Named(n) if n.id() == node.id()));
}

#[test]
fn test_foreign_named_types_are_shared() {
    let importer = MapImporter::new();
    importer.insert(package(
        "io",
        vec![GoTypeDecl {
            name: "Reader".to_string(),
            underlying: GoType::Interface {
                methods: [(
                    "Read".to_string(),
                    GoSignature {
                        params: vec![GoType::Slice { elem: Box::new(basic("byte")) }],
                        results: vec![basic("int"), basic("error")],
                        variadic: false,
                    },
                )]
                .into_iter()
                .collect(),
            },
            methods: Vec::new(),
        }],
        Vec::new(),
    ));
    importer.insert(package(
        "bufio",
        Vec::new(),
        vec![func_object(
            "NewReader",
            GoSignature {
                params: vec![named("io", "Reader")],
                results: Vec::new(),
                variadic: false,
            },
        )],
    ));
    let cache = PackageCache::new();
    // bufio first: io.Reader is allocated before io is imported
    let bufio = cache.foreign("bufio", &importer).unwrap();
    let io = cache.foreign("io", &importer).unwrap();
    let Type::Func(f) = &bufio.member("NewReader").unwrap().ty else {
        panic!("NewReader is not a function");
    };
    let (Type::Named(param), Type::Named(reader)) = (&f.params[0], &io.member("Reader").unwrap().ty) else {
        panic!("expected named types");
    };
    assert_eq!(param.id(), reader.id());
    assert!(underlying(&f.params[0]).is_interface());
}

#[test]
fn test_translate_rejects_bad_descriptions() {
    let importer = MapImporter::new();
    importer.insert(package("bad", Vec::new(), vec![func_object("F", GoSignature {
        params: vec![basic("num")],
        results: Vec::new(),
        variadic: false,
    })]));
    importer.insert(package("variadic", Vec::new(), vec![func_object("G", GoSignature {
        params: vec![basic("int")],
        results: Vec::new(),
        variadic: true,
    })]));
    importer.insert(package("unknown", Vec::new(), vec![func_object("H", GoSignature {
        params: vec![basic("int128")],
        results: Vec::new(),
        variadic: false,
    })]));
    let cache = PackageCache::new();
    for path in ["bad", "variadic", "unknown"] {
        let err = cache.foreign(path, &importer).unwrap_err();
        assert!(matches!(err, ImportError::Foreign { .. }), "{}: {}", path, err);
    }
    assert!(cache.is_empty());
}

#[test]
fn test_failed_translation_leaves_no_types() {
    let reader = GoTypeDecl {
        name: "Reader".to_string(),
        underlying: GoType::Struct { fields: Vec::new() },
        methods: Vec::new(),
    };
    let writer = GoTypeDecl {
        name: "Writer".to_string(),
        underlying: GoType::Struct { fields: Vec::new() },
        methods: Vec::new(),
    };
    let importer = MapImporter::new();
    importer.insert(package(
        "bufio",
        Vec::new(),
        vec![func_object(
            "NewReader",
            GoSignature {
                params: vec![named("io", "Reader")],
                results: Vec::new(),
                variadic: false,
            },
        )],
    ));
    importer.insert(package(
        "io",
        vec![reader, writer],
        vec![func_object(
            "Copy",
            GoSignature {
                params: vec![basic("num")],
                results: Vec::new(),
                variadic: false,
            },
        )],
    ));
    let cache = PackageCache::new();
    cache.foreign("bufio", &importer).unwrap();
    assert_eq!(cache.named_len(), 1);

    assert!(cache.foreign("io", &importer).is_err());
    // io.Writer was first seen by the failed import; io.Reader was not
    assert_eq!(cache.named_len(), 1);
    let reader = cache.foreign_named("io", "Reader");
    assert!(reader.underlying().is_invalid());
    assert!(reader.methods.read().is_empty());
}

#[test]
fn test_foreign_cache_hits() {
    let importer = MapImporter::new();
    importer.insert(package("fmt", Vec::new(), Vec::new()));
    let cache = PackageCache::new();
    let first = cache.foreign("fmt", &importer).unwrap();
    let second = cache.foreign("fmt", &importer).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    let stats = cache.stats();
    assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
    assert!((stats.hit_rate() - 50.0).abs() < f64::EPSILON);

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.stats(), CacheStats::default());
}

#[test]
fn test_native_cache() {
    let cache = PackageCache::new();
    assert!(cache.get_native("/lib.ng").is_none());
    cache.insert_native(Package::new("/lib.ng", "lib"));
    assert!(cache.get_native("/lib.ng").is_some());
    assert!(cache.get("/lib.ng").is_some());
    let stats = cache.stats();
    assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
}

#[test]
fn test_resolver_search_order() {
    let dir = tempfile::tempdir().unwrap();
    let lib = dir.path().join("lib");
    std::fs::create_dir(&lib).unwrap();
    std::fs::write(lib.join("util.ng"), "").unwrap();
    std::fs::write(dir.path().join("main.ng"), "").unwrap();
    std::fs::write(dir.path().join("util.ng"), "").unwrap();

    // The importing file's directory wins over search paths.
    let resolver = NativeResolver::new(dir.path().join("main.ng"), vec![lib.clone()]);
    let found = resolver.resolve("util.ng").unwrap();
    assert_eq!(found, std::fs::canonicalize(dir.path().join("util.ng")).unwrap());

    let resolver = NativeResolver::new(PathBuf::new(), vec![lib.clone()]);
    let found = resolver.resolve("util.ng").unwrap();
    assert_eq!(found, std::fs::canonicalize(lib.join("util.ng")).unwrap());

    let absolute = lib.join("util.ng");
    let found = resolver.resolve(&absolute.display().to_string()).unwrap();
    assert_eq!(found, std::fs::canonicalize(&absolute).unwrap());
}

#[test]
fn test_resolver_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let resolver = NativeResolver::new(dir.path().join("main.ng"), vec![PathBuf::from("/nonexistent")]);
    let Err(ImportError::NotFound { path, searched }) = resolver.resolve("missing.ng") else {
        panic!("expected NotFound");
    };
    assert_eq!(path, "missing.ng");
    assert_eq!(searched.len(), 3);
    assert!(searched[2].starts_with("/nonexistent"));
}

#[test]
fn test_package_names() {
    assert_eq!(package_name(Path::new("lib/math.ng")), "math");
    assert_eq!(display_name(Path::new("/src/lib/math.ng")), "math.ng");
}

#[test]
fn test_import_error_messages() {
    let err = ImportError::Cycle("a.ng -> b.ng -> a.ng".to_string());
    assert_eq!(err.to_string(), "package import cycle: a.ng -> b.ng -> a.ng");
    let err = ImportError::NotFound {
        path: "x.ng".to_string(),
        searched: vec!["./x.ng".to_string()],
    };
    assert_eq!(err.to_string(), "cannot find package x.ng (searched ./x.ng)");
}
