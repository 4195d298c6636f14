//! Resolver scenario tests
//!
//! Each test builds a catalog, resolves a set of root queries and checks
//! the resolved ids including their discovery order.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use super::*;
use crate::catalog::MemoryCatalog;
use crate::error::CatalogError;
use crate::module::{module, ModuleInfo, ModuleInfoBuilder};
use crate::solver::Literal;

fn catalog(builders: Vec<ModuleInfoBuilder>) -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new();
    for builder in builders {
        catalog.add_module(builder).unwrap();
    }
    catalog
}

fn queries(names: &[&str]) -> Vec<ModuleIdQuery> {
    names.iter().map(|q| ModuleIdQuery::parse(q).unwrap()).collect()
}

fn ids(names: &[&str]) -> Vec<ModuleId> {
    names.iter().map(|n| ModuleId::parse(n).unwrap()).collect()
}

/// Resolve and check the result, order included
fn resolve(builders: Vec<ModuleInfoBuilder>, roots: &[&str], expected: &[&str]) {
    let _ = env_logger::builder().is_test(true).try_init();

    let catalog = catalog(builders);
    let result = Resolver::new(&catalog)
        .resolve(&queries(roots))
        .unwrap_or_else(|e| panic!("resolution of {:?} failed: {}", roots, e));
    let resolved: Vec<ModuleId> = result.resolved_module_ids().iter().cloned().collect();
    assert_eq!(resolved, ids(expected));
}

/// Resolve and expect failure
fn fail(builders: Vec<ModuleInfoBuilder>, roots: &[&str]) -> ResolverError {
    let _ = env_logger::builder().is_test(true).try_init();

    let catalog = catalog(builders);
    let outcome = Resolver::new(&catalog).resolve(&queries(roots));
    match outcome {
        Ok(result) => panic!("resolver should fail but passed with the solution {}", result),
        Err(e) => e,
    }
}

// ============================================================================
// Requires Tests
// ============================================================================

#[test]
fn test_simple() {
    resolve(
        vec![module("x@1").requires("y@1"), module("y@1")],
        &["x@1"],
        &["x@1", "y@1"],
    );
}

#[test]
fn test_intersecting_ranges() {
    resolve(
        vec![
            module("a@1").requires("b@<4").requires("c@1").requires("d@<4"),
            module("c@1").requires("b@>=2").requires("d@>=2"),
            module("b@1"),
            module("b@2"),
            module("b@3"),
            module("b@4"),
            module("d@1"),
            module("d@2"),
            module("d@3"),
            module("d@4"),
        ],
        &["a@1"],
        &["a@1", "b@3", "c@1", "d@3"],
    );
}

#[test]
fn test_diamond() {
    resolve(
        vec![
            module("x@1").requires("y@2").requires("w@4"),
            module("y@2").requires("z@>=3"),
            module("z@9"),
            module("z@4"),
            module("z@3"),
            module("w@4").requires("z@<=4"),
        ],
        &["x@1"],
        &["x@1", "y@2", "z@4", "w@4"],
    );
}

#[test]
fn test_diamond_fail() {
    let err = fail(
        vec![
            module("x@1").requires("y@2").requires("w@4"),
            module("y@2").requires("z@<=3"),
            module("z@9"),
            module("z@4"),
            module("z@3"),
            module("w@4").requires("z@>=4"),
        ],
        &["x@1"],
    );
    assert!(matches!(err, ResolverError::Unsatisfiable(Some(_))));
}

#[test]
fn test_multiple() {
    resolve(
        vec![
            module("x@1").requires("a@1").requires("b@1"),
            module("y@1").requires("c@1"),
            module("z@1").requires("b@1"),
            module("a@1").requires("b@1"),
            module("b@1").requires("c@1"),
            module("c@1"),
        ],
        &["x@1", "y@1", "z@1"],
        &["x@1", "a@1", "b@1", "c@1", "y@1", "z@1"],
    );
}

#[test]
fn test_cycle() {
    resolve(
        vec![module("x@1").requires("y@1"), module("y@1").requires("x@1")],
        &["x@1"],
        &["x@1", "y@1"],
    );
}

#[test]
fn test_highest_version_for_unconstrained_root() {
    resolve(
        vec![module("x@1"), module("x@1.5"), module("x@2.0-beta1"), module("x@1.10")],
        &["x"],
        &["x@2.0-beta1"],
    );
}

#[test]
fn test_missing_dependence_fails() {
    let err = fail(vec![module("x@1").requires("missing@1")], &["x@1"]);
    let explanation = err.explanation().unwrap();
    assert!(explanation.contains("Module x@1 cannot be installed"));
    assert!(explanation.contains("Module x@1 has a dependency missing@1, which matches no modules"));
}

#[test]
fn test_missing_root_fails() {
    let err = fail(vec![module("x@1")], &["x@2"]);
    let explanation = err.explanation().unwrap();
    assert!(explanation.contains("Root dependency x@2 matches no modules"));
}

// ============================================================================
// View and Alias Tests
// ============================================================================

#[test]
fn test_simple_view() {
    resolve(
        vec![module("x@1").requires("yv@1"), module("y@1").view("yv")],
        &["x@1"],
        &["x@1", "y@1"],
    );
}

#[test]
fn test_simple_view_with_second_root() {
    resolve(
        vec![
            module("x@1").requires("yv@1"),
            module("y@1").view("yv"),
            module("z@1").requires("y@1"),
        ],
        &["x@1", "z@1"],
        &["x@1", "y@1", "z@1"],
    );
}

#[test]
fn test_simple_view_roots_reversed() {
    resolve(
        vec![
            module("x@1").requires("yv@1"),
            module("y@1").view("yv"),
            module("z@1").requires("y@1"),
        ],
        &["z@1", "x@1"],
        &["z@1", "y@1", "x@1"],
    );
}

#[test]
fn test_multiple_views() {
    resolve(
        vec![
            module("x@1").requires("yv1@1"),
            module("z@1").requires("yv2@1"),
            module("y@1").view("yv1").view("yv2"),
        ],
        &["x@1", "z@1"],
        &["x@1", "y@1", "z@1"],
    );
}

#[test]
fn test_multiple_views_to_same_module() {
    resolve(
        vec![
            module("x@1").requires("yv1@1").requires("yv2@1"),
            module("y@1").view("yv1").view("yv2"),
        ],
        &["x@1"],
        &["x@1", "y@1"],
    );
}

#[test]
fn test_view_with_range() {
    resolve(
        vec![
            module("x@1").requires("yv"),
            module("y@1").view("yv"),
            module("y@2").view("yv"),
        ],
        &["x@1"],
        &["x@1", "y@2"],
    );
}

#[test]
fn test_alias_for_self() {
    resolve(
        vec![module("x@1").requires("xa@1").view("xv").alias("xa@1")],
        &["x@1"],
        &["x@1"],
    );
}

#[test]
fn test_alias_for_self_as_root() {
    resolve(
        vec![module("x@1").requires("xa@1").alias("xa@1")],
        &["xa@1"],
        &["x@1"],
    );
}

#[test]
fn test_alias_for_root() {
    resolve(vec![module("x@1").alias("xa@1")], &["xa@1"], &["x@1"]);
}

#[test]
fn test_simple_alias_single_root() {
    resolve(
        vec![module("x@1").requires("ya@1"), module("y@1").alias("ya@1")],
        &["x@1"],
        &["x@1", "y@1"],
    );
}

#[test]
fn test_simple_alias() {
    resolve(
        vec![
            module("x@1").requires("ya@1"),
            module("y@1").alias("ya@1"),
            module("z@1").requires("y@1"),
        ],
        &["x@1", "z@1"],
        &["x@1", "y@1", "z@1"],
    );
}

#[test]
fn test_simple_alias_roots_reversed() {
    resolve(
        vec![
            module("x@1").requires("ya@1"),
            module("y@1").alias("ya@1"),
            module("z@1").requires("y@1"),
        ],
        &["z@1", "x@1"],
        &["z@1", "y@1", "x@1"],
    );
}

#[test]
fn test_alias_of_view() {
    resolve(
        vec![module("x@1").requires("yva@1"), module("y@1").view("yv").alias("yva@1")],
        &["x@1"],
        &["x@1", "y@1"],
    );
}

#[test]
fn test_alias_of_view_for_root() {
    resolve(vec![module("x@1").view("xv").alias("xva@1")], &["xva@1"], &["x@1"]);
}

#[test]
fn test_alias_with_versions() {
    resolve(
        vec![
            module("x@1").requires("a"),
            module("b@1").alias("a@1"),
            module("b@2").alias("a@2"),
            module("b@3").alias("a@3"),
        ],
        &["x@1"],
        &["x@1", "b@3"],
    );
}

#[test]
fn test_alias_with_versions_reversed() {
    resolve(
        vec![
            module("x@1").requires("a"),
            module("b@1").alias("a@3"),
            module("b@2").alias("a@2"),
            module("b@3").alias("a@1"),
        ],
        &["x@1"],
        &["x@1", "b@3"],
    );
}

#[test]
fn test_alias_with_versions_constrained() {
    resolve(
        vec![
            module("x@1").requires("a"),
            module("y@1").requires("a@3"),
            module("b@1").alias("a@3"),
            module("b@2").alias("a@2"),
            module("b@3").alias("a@1"),
        ],
        &["x@1", "y@1"],
        &["x@1", "b@1", "y@1"],
    );
}

#[test]
fn test_alias_with_versions_and_different_modules() {
    resolve(
        vec![
            module("x@1").requires("a@1"),
            module("y@1").requires("a@3"),
            module("b@1").alias("a@1"),
            module("c@1").alias("a@2"),
            module("d@1").alias("a@3"),
        ],
        &["x@1", "y@1"],
        &["x@1", "b@1", "y@1", "d@1"],
    );
}

#[test]
fn test_alias_with_versions_and_different_modules_nested() {
    resolve(
        vec![
            module("r@1").requires("x@1").requires("y@1"),
            module("x@1").requires("a@1"),
            module("y@1").requires("a@3"),
            module("b@1").alias("a@1"),
            module("c@1").alias("a@2"),
            module("d@1").alias("a@3"),
        ],
        &["r@1"],
        &["r@1", "x@1", "b@1", "y@1", "d@1"],
    );
}

#[test]
fn test_optional_alias_with_different_modules() {
    resolve(
        vec![
            module("x@1").requires_optional("a@<3"),
            module("y@1").requires("a@3"),
            module("b@1").alias("a@3"),
            module("d@1").alias("a@1").requires("e@1"),
        ],
        &["x@1", "y@1"],
        &["x@1", "y@1", "b@1"],
    );
}

#[test]
fn test_optional_aliases_of_different_modules() {
    // a@1 belongs to b, which cannot be installed; a@3 belongs to c
    resolve(
        vec![
            module("x@1").requires_optional("a@1"),
            module("y@1").requires_optional("a@3"),
            module("b@1").alias("a@1").requires("d@1"),
            module("c@1").alias("a@3"),
        ],
        &["x@1", "y@1"],
        &["x@1", "y@1", "c@1"],
    );
}

#[test]
fn test_optional_alias_with_versions_fails() {
    fail(
        vec![
            module("x@1").requires_optional("a@<3"),
            module("y@1").requires("a@3"),
            module("b@1").alias("a@3"),
            module("b@2").alias("a@2"),
            module("b@3").alias("a@1").requires("d@1"),
        ],
        &["x@1", "y@1"],
    );
}

// ============================================================================
// Permit Tests
// ============================================================================

#[test]
fn test_no_permit_on_module() {
    let err = fail(vec![module("a@1").requires("b@1"), module("b@1").permits("c")], &["a@1"]);
    assert!(err
        .explanation()
        .unwrap()
        .contains("Module a@1 is not permitted to depend on b@1"));
}

#[test]
fn test_permit_on_module() {
    resolve(
        vec![module("a@1").requires("b@1"), module("b@1").permits("a")],
        &["a@1"],
        &["a@1", "b@1"],
    );
}

#[test]
fn test_no_permit_on_view() {
    fail(
        vec![module("a@1").requires("bv@1"), module("b@1").view("bv").permits("c")],
        &["a@1"],
    );
}

#[test]
fn test_permit_on_view() {
    resolve(
        vec![module("a@1").requires("bv@1"), module("b@1").view("bv").permits("a")],
        &["a@1"],
        &["a@1", "b@1"],
    );
}

#[test]
fn test_permit_range() {
    resolve(
        vec![
            module("a@1").requires("b"),
            module("b@1").permits("c"),
            module("b@2").permits("a"),
        ],
        &["a@1"],
        &["a@1", "b@2"],
    );
}

#[test]
fn test_permit_range_prefers_permitted_older() {
    resolve(
        vec![
            module("a@1").requires("b"),
            module("b@1").permits("a"),
            module("b@2").permits("c"),
        ],
        &["a@1"],
        &["a@1", "b@1"],
    );
}

#[test]
fn test_permit_with_optional() {
    resolve(
        vec![module("z@1").requires_optional("x"), module("x@1").permits("y")],
        &["z@1"],
        &["z@1"],
    );
}

#[test]
fn test_permit_with_optional_conflict() {
    fail(
        vec![
            module("z@1").requires("y").requires_optional("x"),
            module("y@1").requires("x"),
            module("x@1").permits("y"),
        ],
        &["z@1"],
    );
}

// ============================================================================
// Optional Tests
// ============================================================================

#[test]
fn test_optional_left_out() {
    resolve(
        vec![
            module("a@1").requires_optional("b@>=1").requires("c@1"),
            module("c@1").requires_optional("b@>=2").requires("d@2"),
            module("b@1").requires("d@1"),
            module("b@2").requires("d@1"),
            module("b@3").requires("d@1"),
            module("b@4").requires("d@1"),
            module("d@1"),
            module("d@2"),
        ],
        &["a@1"],
        &["a@1", "c@1", "d@2"],
    );
}

#[test]
fn test_optional_picks_compatible_version() {
    resolve(
        vec![
            module("a@1").requires_optional("b@>=1").requires("c@1"),
            module("c@1").requires_optional("b@>=2").requires("d@2"),
            module("b@1"),
            module("b@2"),
            module("b@3").requires("d@1"),
            module("b@4").requires("d@1"),
            module("d@1"),
            module("d@2"),
        ],
        &["a@1"],
        &["a@1", "b@2", "c@1", "d@2"],
    );
}

#[test]
fn test_optional_picks_highest_version() {
    resolve(
        vec![
            module("a@1").requires_optional("b@>=1").requires("c@1"),
            module("c@1").requires_optional("b@>=2").requires("d@2"),
            module("b@1"),
            module("b@2"),
            module("b@3"),
            module("b@4"),
            module("d@1"),
            module("d@2"),
        ],
        &["a@1"],
        &["a@1", "b@4", "c@1", "d@2"],
    );
}

#[test]
fn test_optional_fail() {
    fail(
        vec![
            module("a@1").requires_optional("b@<2").requires("c@1"),
            module("c@1").requires("b@>=2").requires("d@2"),
            module("b@1").requires("d@1"),
            module("b@2"),
            module("d@1"),
            module("d@2"),
        ],
        &["a@1"],
    );
}

#[test]
fn test_optional_without_candidates() {
    resolve(
        vec![module("a@1").requires_optional("missing").requires("c@1"), module("c@1")],
        &["a@1"],
        &["a@1", "c@1"],
    );
}

// ============================================================================
// Service Tests
// ============================================================================

#[test]
fn test_no_service_provider() {
    resolve(vec![module("x@1").requires_service("si")], &["x@1"], &["x@1"]);
}

#[test]
fn test_one_service_provider() {
    resolve(
        vec![
            module("x@1").requires_service("si"),
            module("b@1").provides_service("si", "SiImpl"),
        ],
        &["x@1"],
        &["x@1", "b@1"],
    );
}

#[test]
fn test_two_roots_one_service_provider() {
    resolve(
        vec![
            module("x@1").requires_service("si"),
            module("y@1").requires_service("si"),
            module("b@1").provides_service("si", "SiImpl"),
        ],
        &["x@1", "y@1"],
        &["x@1", "y@1", "b@1"],
    );
}

#[test]
fn test_multiple_service_providers() {
    resolve(
        vec![
            module("x@1").requires_service("si"),
            module("b@1").provides_service("si", "SiImpl"),
            module("c@1").provides_service("si", "SiImpl"),
            module("d@1").provides_service("si", "SiImpl"),
        ],
        &["x@1"],
        &["x@1", "b@1", "c@1", "d@1"],
    );
}

#[test]
fn test_service_provider_versions() {
    resolve(
        vec![
            module("x@1").requires_service("si"),
            module("b@1").provides_service("si", "SiImpl"),
            module("b@2").provides_service("si", "SiImpl"),
            module("b@3").provides_service("si", "SiImpl"),
        ],
        &["x@1"],
        &["x@1", "b@3"],
    );
}

#[test]
fn test_service_provider_dependencies() {
    resolve(
        vec![
            module("x@1").requires("c@1").requires_service("si"),
            module("b@1")
                .requires("x@1")
                .requires("c@1")
                .requires("d@1")
                .provides_service("si", "SiImpl"),
            module("c@1"),
            module("d@1"),
        ],
        &["x@1"],
        &["x@1", "c@1", "b@1", "d@1"],
    );
}

#[test]
fn test_layered_services() {
    resolve(
        vec![
            module("x@1").requires_service("s"),
            module("y@1")
                .requires("a")
                .requires_service("t")
                .provides_service("s", "SyImpl"),
            module("a@1").requires_service("u"),
            module("w@1").provides_service("u", "UwImpl"),
            module("z@1").provides_service("t", "TzImpl"),
        ],
        &["x@1"],
        &["x@1", "y@1", "a@1", "z@1", "w@1"],
    );
}

#[test]
fn test_service_requiring_service() {
    resolve(
        vec![
            module("x@1").requires_service("a"),
            module("a@1").requires_service("b").provides_service("a", "AImpl"),
            module("b@1").requires_service("c").provides_service("b", "BImpl"),
            module("c@1").requires_service("d").provides_service("c", "CImpl"),
            module("d@1").provides_service("d", "DImpl"),
        ],
        &["x@1"],
        &["x@1", "a@1", "b@1", "c@1", "d@1"],
    );
}

#[test]
fn test_service_requiring_previously_required_service() {
    resolve(
        vec![
            module("x@1").requires_service("a").requires_service("c"),
            module("a@1").requires_service("b").provides_service("a", "AImpl"),
            module("b@1").requires_service("a").provides_service("b", "BImpl"),
            module("c@1").requires_service("b").provides_service("c", "CImpl"),
        ],
        &["x@1"],
        &["x@1", "a@1", "c@1", "b@1"],
    );
}

#[test]
fn test_service_provider_ignores_permits() {
    resolve(
        vec![
            module("x@1").requires_service("s"),
            module("z@1").permits("y").provides_service("s", "SImpl"),
        ],
        &["x@1"],
        &["x@1", "z@1"],
    );
}

#[test]
fn test_service_provided_in_view() {
    resolve(
        vec![
            module("x@1").requires_service("s"),
            module("y@1")
                .view("y1")
                .provides_service("s", "Sy1Impl")
                .view("y2")
                .provides_service("s", "Sy2Impl"),
        ],
        &["x@1"],
        &["x@1", "y@1"],
    );
}

#[test]
fn test_service_provider_with_missing_dependence_is_left_out() {
    resolve(
        vec![
            module("x@1").requires_service("s"),
            module("y@1").requires("z").provides_service("s", "SImpl"),
        ],
        &["x@1"],
        &["x@1"],
    );
}

#[test]
fn test_service_provider_with_conflicting_dependence_is_left_out() {
    resolve(
        vec![
            module("x@1").requires("y@1").requires_service("s"),
            module("z@1").requires("y@2").provides_service("s", "SImpl"),
            module("y@1"),
            module("y@2"),
        ],
        &["x@1"],
        &["x@1", "y@1"],
    );
}

// ============================================================================
// Configuration and Determinism Tests
// ============================================================================

#[test]
fn test_resolution_is_deterministic() {
    let catalog = catalog(vec![
        module("a@1").requires("b").requires_optional("c").requires_service("s"),
        module("b@1"),
        module("b@2").requires("c"),
        module("c@1"),
        module("c@2"),
        module("p@1").requires("b@1").provides_service("s", "PImpl"),
        module("q@1").provides_service("s", "QImpl"),
    ]);
    let resolver = Resolver::new(&catalog);
    let roots = queries(&["a@1"]);

    let first = resolver.resolve(&roots).unwrap();
    for _ in 0..5 {
        assert_eq!(resolver.resolve(&roots).unwrap(), first);
    }
    assert_eq!(first.to_string(), "[a@1, b@2, c@2, q@1]");
}

#[test]
fn test_long_chain_resolves_newest() {
    let mut builders = Vec::new();
    for i in 0..16 {
        for v in 1..=8 {
            let mut builder = module(&format!("m{}@{}", i, v));
            if i < 15 {
                builder = builder.requires(&format!("m{}@>=1", i + 1));
            }
            builders.push(builder.requires(&format!("s@<={}", v)));
        }
    }
    for v in 1..=8 {
        builders.push(module(&format!("s@{}", v)));
    }

    let mut expected: Vec<String> = (0..16).map(|i| format!("m{}@8", i)).collect();
    expected.push("s@8".to_string());
    let expected: Vec<&str> = expected.iter().map(String::as_str).collect();
    resolve(builders, &["m0"], &expected);
}

#[test]
fn test_base_module_matches_any_version() {
    let catalog = catalog(vec![module("x@1").requires("base@1"), module("base@7")]);
    let result = Resolver::new(&catalog).resolve(&queries(&["x@1"])).unwrap();
    assert_eq!(result.resolved_module_ids().len(), 2);
    assert!(result.contains(&ModuleId::parse("base@7").unwrap()));
}

#[test]
fn test_configured_base_module() {
    let catalog = catalog(vec![module("x@1").requires("jdk.base@1"), module("jdk.base@8")]);
    let resolver = Resolver::new(&catalog);
    let roots = queries(&["x@1"]);

    assert!(resolver.resolve(&roots).is_err());

    let config = ResolverConfig::default().with_base_module("jdk.base");
    let result = resolver.resolve_with(&roots, &config).unwrap();
    assert_eq!(result.to_string(), "[x@1, jdk.base@8]");
}

#[test]
fn test_trace_does_not_change_result() {
    let catalog = catalog(vec![module("x@1").requires("y"), module("y@1"), module("y@2")]);
    let resolver = Resolver::new(&catalog);
    let roots = queries(&["x@1"]);

    let config = ResolverConfig::default().with_trace(true);
    assert_eq!(
        resolver.resolve_with(&roots, &config).unwrap(),
        resolver.resolve(&roots).unwrap()
    );
}

#[test]
fn test_explain_disabled() {
    let catalog = catalog(vec![module("x@1").requires("missing")]);
    let config = ResolverConfig::default().with_explain(false);
    let err = Resolver::new(&catalog)
        .resolve_with(&queries(&["x@1"]), &config)
        .unwrap_err();

    assert!(matches!(err, ResolverError::Unsatisfiable(None)));
    assert_eq!(err.to_string(), "Could not resolve modules: no solution");
}

#[test]
fn test_diamond_fail_explanation() {
    let err = fail(
        vec![
            module("x@1").requires("y@2").requires("w@4"),
            module("y@2").requires("z@<=3"),
            module("z@3"),
            module("z@4"),
            module("w@4").requires("z@>=4"),
        ],
        &["x@1"],
    );
    let explanation = err.explanation().unwrap();
    assert!(explanation.starts_with('['));
    assert!(explanation.contains("Only one version of module z"));
    assert!(explanation.contains("Module y@2 depends on [z@3]"));
    assert!(explanation.contains("Module in query x@1 to be installed"));
}

// ============================================================================
// Oracle and Catalog Seam Tests
// ============================================================================

/// Delegates to the default oracle and records each phase's constraints
struct RecordingOracle {
    inner: BranchAndBound,
    names: Vec<String>,
    phases: Rc<RefCell<Vec<Vec<String>>>>,
    fail: bool,
}

impl SolverOracle for RecordingOracle {
    fn add_clause(&mut self, name: &str, literals: &[Literal]) {
        self.names.push(name.to_string());
        self.inner.add_clause(name, literals);
    }

    fn add_at_least(&mut self, name: &str, k: usize, literals: &[Literal]) {
        self.names.push(name.to_string());
        self.inner.add_at_least(name, k, literals);
    }

    fn set_objective(&mut self, weights: &[(Literal, u64)]) {
        self.inner.set_objective(weights);
    }

    fn solve(&mut self) -> Outcome {
        self.phases.borrow_mut().push(std::mem::take(&mut self.names));
        if self.fail {
            return Outcome::Unsat(None);
        }
        self.inner.solve()
    }
}

fn recording_resolver<'a>(
    catalog: &'a MemoryCatalog,
    phases: &Rc<RefCell<Vec<Vec<String>>>>,
    fail_from_phase: usize,
) -> Resolver<'a> {
    let phases = Rc::clone(phases);
    Resolver::new(catalog).with_oracle(move |config: &ResolverConfig| -> Box<dyn SolverOracle> {
        let fail = phases.borrow().len() >= fail_from_phase;
        Box::new(RecordingOracle {
            inner: BranchAndBound::from_config(config),
            names: Vec::new(),
            phases: Rc::clone(&phases),
            fail,
        })
    })
}

#[test]
fn test_custom_oracle_sees_every_phase() {
    let catalog = catalog(vec![
        module("x@1").requires_service("s"),
        module("p@1").provides_service("s", "PImpl"),
    ]);
    let phases = Rc::new(RefCell::new(Vec::new()));
    let result = recording_resolver(&catalog, &phases, usize::MAX)
        .resolve(&queries(&["x@1"]))
        .unwrap();

    assert_eq!(result.to_string(), "[x@1, p@1]");
    let phases = phases.borrow();
    assert_eq!(phases.len(), 2);
    assert_eq!(phases[0], vec!["Module in query x@1 to be installed"]);
    assert!(phases[1].contains(&"Module x@1 is resolved".to_string()));
    assert!(phases[1].contains(&"Module in query p to be installed".to_string()));
    assert!(phases[1].contains(&"Only one version of module p".to_string()));
}

#[test]
fn test_optional_phase_failure() {
    let catalog = catalog(vec![
        module("x@1").requires_service("s"),
        module("p@1").provides_service("s", "PImpl"),
    ]);
    let phases = Rc::new(RefCell::new(Vec::new()));
    let err = recording_resolver(&catalog, &phases, 1)
        .resolve(&queries(&["x@1"]))
        .unwrap_err();

    assert!(matches!(
        err,
        ResolverError::OptionalPhaseUnsatisfiable {
            phase: 1,
            explanation: None
        }
    ));
}

#[test]
fn test_custom_oracle_failure_in_first_phase() {
    let catalog = catalog(vec![module("x@1")]);
    let phases = Rc::new(RefCell::new(Vec::new()));
    let err = recording_resolver(&catalog, &phases, 0)
        .resolve(&queries(&["x@1"]))
        .unwrap_err();

    assert!(matches!(err, ResolverError::Unsatisfiable(None)));
}

/// Fails every lookup
struct BrokenCatalog;

impl Catalog for BrokenCatalog {
    fn ids_for_name(&self, _name: &str) -> std::result::Result<Vec<ModuleId>, CatalogError> {
        Err(CatalogError::Io {
            path: "catalog.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"),
        })
    }

    fn info_for(&self, id: &ModuleId) -> std::result::Result<Arc<ModuleInfo>, CatalogError> {
        Err(CatalogError::NotFound(id.clone()))
    }

    fn all_declared_ids(&self) -> std::result::Result<Vec<ModuleId>, CatalogError> {
        Ok(Vec::new())
    }
}

#[test]
fn test_traversal_error_is_propagated() {
    let err = Resolver::new(&BrokenCatalog)
        .resolve(&queries(&["x@1"]))
        .unwrap_err();
    assert!(matches!(err, ResolverError::Traversal(_)));
}

#[test]
fn test_empty_roots() {
    let catalog = catalog(vec![module("x@1")]);
    let result = Resolver::new(&catalog).resolve(&[]).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.to_string(), "[]");
}
