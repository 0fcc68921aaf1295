//! Architecture contract tests.

mod support;

use support::architecture::{
    find_lines_containing, find_non_export_lines_in_mod_files, path_exists, read_relative,
};

#[test]
fn cli_has_no_direct_infrastructure_imports() {
    let hits = find_lines_containing(
        "src/adapter/inbound/cli",
        &["use crate::infrastructure", "crate::infrastructure::"],
    );

    assert!(
        hits.is_empty(),
        "found direct infrastructure imports in inbound CLI adapters: {hits:#?}"
    );
}

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "reqwest::",
            "diesel::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn ports_depend_only_on_domain() {
    let hits = find_lines_containing(
        "src/port",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "diesel::",
            "reqwest::",
        ],
    );

    assert!(hits.is_empty(), "ports reach outside the domain: {hits:#?}");
}

#[test]
fn mod_rs_is_export_only() {
    let violations = find_non_export_lines_in_mod_files("src");
    assert!(
        violations.is_empty(),
        "found non-export content in mod.rs files: {violations:#?}"
    );
}

#[test]
fn cli_operator_bridge_uses_operator_name() {
    let source = read_relative("src/adapter/inbound/cli/operator.rs");
    assert!(
        source.contains("pub fn operator() -> &'static dyn OperatorPort"),
        "operator bridge should expose `operator()` capability accessor"
    );
}

#[test]
fn operator_ports_are_transport_agnostic() {
    let hits = find_lines_containing("src/port/inbound/operator", &["std::path::Path", "PathBuf"]);
    assert!(
        hits.is_empty(),
        "operator inbound ports should not expose filesystem path types: {hits:#?}"
    );
}

#[test]
fn application_layer_has_no_direct_adapter_imports() {
    let hits = find_lines_containing("src/application", &["crate::adapter::"]);
    assert!(
        hits.is_empty(),
        "application layer should not import adapters directly: {hits:#?}"
    );
}

#[test]
fn application_layer_does_not_touch_storage_or_http_directly() {
    let hits = find_lines_containing("src/application", &["diesel::", "reqwest::"]);
    assert!(
        hits.is_empty(),
        "application layer should reach storage and HTTP through ports: {hits:#?}"
    );
}

#[test]
fn weights_have_a_single_owner() {
    let hits = find_lines_containing("src/application/orchestration", &["save_weight("]);
    assert!(
        hits.is_empty(),
        "orchestration must update weights through the weight book: {hits:#?}"
    );
    assert!(path_exists("src/application/weight/book.rs"));
}

#[test]
fn orchestration_is_split_by_concern() {
    for file in [
        "src/application/orchestration/orchestrator.rs",
        "src/application/orchestration/pipeline.rs",
        "src/application/orchestration/correlation.rs",
        "src/application/orchestration/config.rs",
    ] {
        assert!(
            path_exists(file),
            "expected application orchestration module `{file}`"
        );
    }
}

#[test]
fn runtime_lifecycle_lives_in_infrastructure() {
    let source = read_relative("src/infrastructure/runtime.rs");
    assert!(source.contains("pub async fn run_with_shutdown("));
    assert!(
        !path_exists("src/application/orchestration/runtime.rs"),
        "application layer should not own process lifecycle"
    );
}

#[test]
fn testkit_is_gated() {
    let lib = read_relative("src/lib.rs");
    assert!(lib.contains("#[cfg(any(test, feature = \"testkit\"))]\npub mod testkit;"));
}
