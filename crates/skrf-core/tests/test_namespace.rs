//! Integration tests for namespace assembly

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rstest::rstest;
use skrf_core::namespace::{
    Binding, CorruptDataPolicy, ExportList, LoadError, ModuleDecl, ModuleStatus, NamespaceBuilder,
    Submodule,
};

fn module_a() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("a", "demo::a").constant("ALPHA", 1.0).constant("SHARED", 1.0))
}

fn module_b() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("b", "demo::b").constant("BETA", 2.0).constant("SHARED", 2.0))
}

fn module_c() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("c", "demo::c").instance("greeting", String::from("hello")))
}

fn module_e() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("e", "demo::e").constant("EPSILON", 5.0).constant("SHARED", 5.0))
}

fn broken() -> Result<ExportList, LoadError> {
    Err(LoadError::init(
        "broken",
        std::io::Error::new(std::io::ErrorKind::Other, "boom"),
    ))
}

fn corrupt() -> Result<ExportList, LoadError> {
    Err(LoadError::corrupt("corrupt", "bad checksum"))
}

const A: ModuleDecl = ModuleDecl::new("a", module_a);
const B: ModuleDecl = ModuleDecl::new("b", module_b);
const C: ModuleDecl = ModuleDecl::new("c", module_c);
const D: ModuleDecl = ModuleDecl::unavailable("d", "libfoo");
const E: ModuleDecl = ModuleDecl::new("e", module_e);

fn required() -> NamespaceBuilder {
    NamespaceBuilder::new()
        .require(A, Binding::Glob)
        .require(B, Binding::Glob)
        .require(C, Binding::Glob)
}

/// Submodule that counts how often it is loaded
struct Counting {
    loads: Arc<AtomicUsize>,
}

impl Submodule for Counting {
    fn id(&self) -> &str {
        "counting"
    }

    fn load(&self) -> Result<ExportList, LoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(ExportList::new("counting", "demo::counting").constant("COUNT", 0.0))
    }
}

#[test]
fn test_required_present_optional_partially_absent() {
    let ns = required()
        .optional(D, Binding::Glob)
        .optional(E, Binding::Glob)
        .build()
        .unwrap();

    for name in ["a", "b", "c", "e", "ALPHA", "BETA", "greeting", "EPSILON"] {
        assert!(ns.contains(name), "{} missing", name);
    }
    assert!(!ns.contains("d"));
    assert!(ns.module_exports("d").is_none());

    assert!(matches!(
        ns.status("d"),
        Some(ModuleStatus::Unavailable { reason }) if reason.contains("libfoo")
    ));
    assert!(ns.is_loaded("e"));
    assert_eq!(
        ns.modules().iter().map(|(id, _)| id.as_str()).collect::<Vec<_>>(),
        vec!["a", "b", "c", "d", "e"]
    );
}

#[rstest]
fn test_optional_permutations(#[values(true, false)] d_present: bool, #[values(true, false)] e_present: bool) {
    let d = if d_present {
        ModuleDecl::new("d", || Ok(ExportList::new("d", "demo::d").constant("DELTA", 4.0)))
    } else {
        D
    };
    let e = if e_present { E } else { E.without("libbar") };

    let ns = required()
        .optional(d, Binding::Glob)
        .optional(e, Binding::Glob)
        .alias("AA", "ALPHA")
        .build()
        .unwrap();

    for name in ["a", "b", "c", "ALPHA", "BETA", "greeting", "AA"] {
        assert!(ns.contains(name), "{} missing", name);
    }
    assert_eq!(ns.contains("DELTA"), d_present);
    assert_eq!(ns.contains("EPSILON"), e_present);
    assert_eq!(ns.is_loaded("d"), d_present);
    assert_eq!(ns.is_loaded("e"), e_present);

    let expected_shared = if e_present { 5.0 } else { 2.0 };
    assert_eq!(ns.constant("SHARED"), Some(expected_shared));
}

#[rstest]
#[case::init(broken)]
#[case::corrupt(corrupt)]
fn test_required_failure_is_fatal(#[case] loader: fn() -> Result<ExportList, LoadError>) {
    let result = required()
        .require(ModuleDecl::new("bad", loader), Binding::Glob)
        .optional(E, Binding::Glob)
        .build();
    assert!(result.is_err());
}

#[test]
fn test_required_missing_dependency_is_fatal() {
    let err = required().require(D, Binding::Glob).build().unwrap_err();
    assert!(err.is_missing_dependency());
    assert_eq!(err.module(), Some("d"));
}

#[test]
fn test_optional_init_failure_is_not_suppressed() {
    let err = required()
        .optional(ModuleDecl::new("broken", broken), Binding::Glob)
        .build()
        .unwrap_err();
    assert!(matches!(err, LoadError::Init { ref module, .. } if module == "broken"));
}

#[rstest]
#[case::ignore(CorruptDataPolicy::Ignore)]
#[case::warn(CorruptDataPolicy::Warn)]
fn test_corrupt_optional_degrades(#[case] policy: CorruptDataPolicy) {
    let ns = required()
        .optional(ModuleDecl::new("corrupt", corrupt), Binding::Qualified)
        .corrupt_data_policy(policy)
        .build()
        .unwrap();

    assert!(!ns.contains("corrupt"));
    assert!(matches!(
        ns.status("corrupt"),
        Some(ModuleStatus::Degraded { reason }) if reason.contains("bad checksum")
    ));
}

#[test]
fn test_corrupt_optional_fatal_policy() {
    let err = required()
        .optional(ModuleDecl::new("corrupt", corrupt), Binding::Qualified)
        .corrupt_data_policy(CorruptDataPolicy::Fatal)
        .build()
        .unwrap_err();
    assert!(matches!(err, LoadError::CorruptData { .. }));
}

#[test]
fn test_last_writer_wins_across_globs_and_aliases() {
    let ns = required()
        .optional(E, Binding::Glob)
        .alias("S", "SHARED")
        .alias("ALPHA", "BETA")
        .build()
        .unwrap();

    assert_eq!(ns.constant("SHARED"), Some(5.0));
    assert_eq!(ns.get("S").unwrap().origin(), "e");
    assert_eq!(ns.constant("ALPHA"), Some(2.0));
    assert_eq!(ns.qualified("a", "ALPHA").and_then(|s| s.as_constant()), Some(1.0));

    let rebinds: Vec<_> = ns
        .shadowed()
        .iter()
        .map(|s| (s.name.as_str(), s.previous.as_str(), s.current.as_str()))
        .collect();
    assert_eq!(
        rebinds,
        vec![("SHARED", "a", "b"), ("SHARED", "b", "e"), ("ALPHA", "a", "b")]
    );
}

#[test]
fn test_module_name_shadowed_by_export() {
    let ns = NamespaceBuilder::new()
        .require(A, Binding::Glob)
        .require(
            ModuleDecl::new("z", || Ok(ExportList::new("z", "demo::z").constant("a", 0.0))),
            Binding::Glob,
        )
        .build()
        .unwrap();

    // module ids are bound before any export
    assert_eq!(ns.constant("a"), Some(0.0));
    assert_eq!(ns.shadowed().len(), 1);
}

#[test]
fn test_build_is_idempotent() {
    let loads = Arc::new(AtomicUsize::new(0));
    let builder = required()
        .optional(Counting { loads: Arc::clone(&loads) }, Binding::Glob)
        .optional(D, Binding::Glob)
        .alias("G", "greeting");

    let first = builder.build().unwrap();
    let second = builder.build().unwrap();

    assert_eq!(loads.load(Ordering::SeqCst), 2);
    assert_eq!(first.aliases(), second.aliases());
    assert_eq!(first, second);
    assert_eq!(second.instance::<String>("G").map(String::as_str), Some("hello"));
}

#[test]
fn test_boxed_submodules() {
    let modules: Vec<Box<dyn Submodule>> = vec![Box::new(A), Box::new(B)];
    let ids: Vec<_> = modules.iter().map(|m| m.id().to_string()).collect();

    let builder = modules
        .into_iter()
        .fold(NamespaceBuilder::new(), |b, m| b.require(m, Binding::Glob));
    assert_eq!(builder.module_ids().collect::<Vec<_>>(), ids);
    assert_eq!(builder.build().unwrap().len(), 2 + 3);
}
