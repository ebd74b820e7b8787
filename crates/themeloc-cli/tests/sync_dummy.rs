mod helpers;

use assert_cmd::prelude::*;
use helpers::{bin_cmd, last_json_line, write_locales};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct Stat {
    lang: String,
    translated: usize,
    skipped: usize,
    removed: usize,
    failed: usize,
}

#[derive(Deserialize)]
struct Summary {
    kind: String,
    languages: Vec<Stat>,
}

#[test]
fn sync_updates_targets_and_advances_the_snapshot() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_locales(
        tmp.path(),
        &[
            (
                "en.default.json",
                r#"{"cart": {"title": "Cart"}, "greeting": "Hello {{ name }}", "added": "Fresh"}"#,
            ),
            (
                "en.default.old.json",
                r#"{"cart": {"title": "Cart"}, "dead": "Old"}"#,
            ),
            (
                "de.json",
                r#"{"cart": {"title": "Warenkorb"}, "dead": "Alt", "added": "Manuell"}"#,
            ),
        ],
    );

    let assert = bin_cmd(tmp.path())
        .args([
            "sync",
            "--provider",
            "dummy",
            "--locales-dir",
            "locales",
            "--format",
            "json",
        ])
        .assert()
        .success();

    let summaries: Vec<Summary> =
        serde_json::from_str(&last_json_line(&assert.get_output().stdout)).unwrap();
    // Only the storefront kind exists in this fixture.
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].kind, "storefront");
    let stat = &summaries[0].languages[0];
    assert_eq!(stat.lang, "de");
    assert_eq!(stat.translated, 1, "only the greeting needed the provider");
    assert_eq!(stat.skipped, 1, "the manual value for 'added' is kept");
    assert_eq!(stat.removed, 1);
    assert_eq!(stat.failed, 0);

    let de: Value =
        serde_json::from_str(&std::fs::read_to_string(tmp.path().join("locales/de.json")).unwrap())
            .unwrap();
    assert_eq!(de["added"], "Manuell");
    assert_eq!(de["cart"]["title"], "Warenkorb");
    // Interpolation markers survive the provider round trip verbatim.
    assert_eq!(de["greeting"], "[de] Hello {{ name }}");
    assert!(de.get("dead").is_none());

    // The snapshot now mirrors the authoritative document.
    let snapshot: Value = serde_json::from_str(
        &std::fs::read_to_string(tmp.path().join("locales/en.default.old.json")).unwrap(),
    )
    .unwrap();
    let current: Value = serde_json::from_str(
        &std::fs::read_to_string(tmp.path().join("locales/en.default.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(snapshot, current);

    // Written documents are key-sorted at every level.
    let raw = std::fs::read_to_string(tmp.path().join("locales/de.json")).unwrap();
    let added = raw.find("\"added\"").unwrap();
    let cart = raw.find("\"cart\"").unwrap();
    let greeting = raw.find("\"greeting\"").unwrap();
    assert!(added < cart && cart < greeting);
}

#[test]
fn dry_run_reports_a_plan_and_leaves_files_alone() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_locales(
        tmp.path(),
        &[
            ("en.default.json", r#"{"a": "One", "b": "Two"}"#),
            ("en.default.old.json", r#"{"a": "One", "old": "Gone"}"#),
            ("fr.json", r#"{"a": "Un", "old": "Vieux"}"#),
        ],
    );
    let before = std::fs::read_to_string(tmp.path().join("locales/fr.json")).unwrap();

    let assert = bin_cmd(tmp.path())
        .args([
            "sync",
            "--dry-run",
            "--locales-dir",
            "locales",
            "--format",
            "json",
        ])
        .assert()
        .success();

    let plans: Value = serde_json::from_str(&last_json_line(&assert.get_output().stdout)).unwrap();
    assert_eq!(plans[0]["languages"][0]["lang"], "fr");
    assert_eq!(plans[0]["languages"][0]["translate"], serde_json::json!(["b"]));
    assert_eq!(plans[0]["languages"][0]["remove"], serde_json::json!(["old"]));

    assert_eq!(
        std::fs::read_to_string(tmp.path().join("locales/fr.json")).unwrap(),
        before
    );
}

#[test]
fn malformed_target_document_fails_the_run() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_locales(
        tmp.path(),
        &[
            ("en.default.json", r#"{"a": "One"}"#),
            ("en.default.old.json", r#"{"a": "One"}"#),
            ("de.json", "{ not json"),
        ],
    );

    bin_cmd(tmp.path())
        .args(["sync", "--provider", "dummy", "--locales-dir", "locales"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("failed to synchronize"));
}
