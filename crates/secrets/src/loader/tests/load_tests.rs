//! Directory scanning tests for `SecretsSource::load_with`.
//!
//! Responsibilities:
//! - Test key derivation, prefix filtering and case-insensitive lookup.
//! - Test tolerance of missing directories, vanished and unreadable files.
//! - Test that repeated loads are deterministic.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use secrecy::ExposeSecret;

use super::run_secrets_source;
use crate::constants::LINE_ENDING;
use crate::fs::{MemoryFileSystem, MockSecretsFileSystem};
use crate::map::SecretsMap;

fn value_of(secrets: &SecretsMap, key: &str) -> Option<String> {
    secrets.try_get(key).map(|v| v.expose_secret().to_string())
}

fn standard_fs() -> MemoryFileSystem {
    let fs = MemoryFileSystem::new();
    fs.add_file("/run/secrets/secret_one", "secret one content");
    fs.add_file("/run/secrets/two", "two content");
    fs.add_file("/run/secrets/foo__bar__baz", "foo bar baz content");
    fs.add_file("/run/secrets/bar__foo", "bar foo content");
    fs
}

#[test]
fn test_load_replaces_colon_placeholder_with_colon() {
    let secrets = run_secrets_source(&[]).load_with(&standard_fs());

    assert_eq!(value_of(&secrets, "secret_one").as_deref(), Some("secret one content"));
    assert_eq!(value_of(&secrets, "two").as_deref(), Some("two content"));
    assert_eq!(value_of(&secrets, "foo:bar:baz").as_deref(), Some("foo bar baz content"));
    assert!(!secrets.contains_key("foo__bar__baz"), "__ was replaced with :");
    assert_eq!(value_of(&secrets, "bar:foo").as_deref(), Some("bar foo content"));
    assert!(!secrets.contains_key("bar__foo"), "__ was replaced with :");
    assert_eq!(secrets.len(), 4);
}

#[test]
fn test_load_only_files_with_allowed_prefix() {
    let fs = standard_fs();
    fs.add_file("/run/secrets/baz__foo__bar", "baz foo bar content");
    fs.add_file("/run/secrets/Bar__Baz__Secret_One", "Bar Baz Secret One content");

    let secrets = run_secrets_source(&["foo__", "Bar__Baz"]).load_with(&fs);

    assert!(!secrets.contains_key("secret_one"), "does not start with prefix");
    assert!(!secrets.contains_key("two"), "does not start with prefix");
    assert!(!secrets.contains_key("bar:foo"), "does not start with prefix");
    assert!(!secrets.contains_key("baz:foo:bar"), "does not start with prefix");
    assert_eq!(value_of(&secrets, "foo:bar:baz").as_deref(), Some("foo bar baz content"));
    assert_eq!(
        value_of(&secrets, "Bar:Baz:Secret_One").as_deref(),
        Some("Bar Baz Secret One content")
    );
    assert!(!secrets.contains_key("Bar__Baz__Secret_One"));
    assert_eq!(secrets.len(), 2);
}

#[test]
fn test_configuration_keys_are_case_insensitive() {
    let fs = MemoryFileSystem::new();
    fs.add_file("/run/secrets/Foo__Secret_One", "secret one content");
    fs.add_file("/run/secrets/foo__secret_two", "secret two content");

    let secrets = run_secrets_source(&["foo__"]).load_with(&fs);

    assert_eq!(
        value_of(&secrets, "foo:secret_one").as_deref(),
        Some("secret one content"),
        "prefix matches as casing is ignored"
    );
    assert_eq!(value_of(&secrets, "Foo:Secret_One").as_deref(), Some("secret one content"));
    assert!(!secrets.contains_key("Foo__Secret_One"));
    assert_eq!(value_of(&secrets, "FOO:SECRET_TWO").as_deref(), Some("secret two content"));
    assert!(!secrets.contains_key("foo__secret_two"));
}

#[test]
fn test_non_ascii_keys_are_found_in_any_case() {
    let fs = MemoryFileSystem::new();
    fs.add_file("/run/secrets/ΟΔΟΣ__X", "v");

    let secrets = run_secrets_source(&[]).load_with(&fs);
    assert_eq!(value_of(&secrets, "ΟΔΟΣ:X").as_deref(), Some("v"));
    assert_eq!(value_of(&secrets, "οδος:x").as_deref(), Some("v"));

    let filtered = run_secrets_source(&["οδος__"]).load_with(&fs);
    assert_eq!(filtered.len(), 1);
}

#[test]
fn test_missing_secrets_directory_yields_no_entries() {
    let fs = MemoryFileSystem::new();
    fs.add_file("/run/secrets/secret_one", "secret one content");

    let source = crate::loader::source::SecretsSource::new(
        Some("/run/secrets_two".into()),
        Some("__".to_string()),
        None,
    )
    .unwrap();

    assert!(source.load_with(&fs).is_empty());
}

#[test]
fn test_empty_secrets_directory_yields_no_entries() {
    let fs = MemoryFileSystem::new();
    fs.add_dir("/run/secrets");

    let secrets = run_secrets_source(&[]).load_with(&fs);
    assert!(secrets.is_empty());
    assert!(!secrets.contains_key("secret_one"));
}

#[test]
fn test_single_trailing_line_ending_is_stripped() {
    let fs = MemoryFileSystem::new();
    fs.add_file("/run/secrets/one", format!("value{LINE_ENDING}"));
    fs.add_file("/run/secrets/two", format!("value{LINE_ENDING}{LINE_ENDING}"));
    fs.add_file("/run/secrets/three", format!("multi{LINE_ENDING}line"));

    let secrets = run_secrets_source(&[]).load_with(&fs);

    assert_eq!(value_of(&secrets, "one").as_deref(), Some("value"));
    assert_eq!(
        value_of(&secrets, "two"),
        Some(format!("value{LINE_ENDING}")),
        "only one terminator is stripped"
    );
    assert_eq!(value_of(&secrets, "three"), Some(format!("multi{LINE_ENDING}line")));
}

#[test]
fn test_empty_file_loads_empty_value() {
    let fs = MemoryFileSystem::new();
    fs.add_file("/run/secrets/empty", "");

    let secrets = run_secrets_source(&[]).load_with(&fs);
    assert_eq!(value_of(&secrets, "empty").as_deref(), Some(""));
}

#[test]
fn test_keys_differing_only_by_case_keep_last_enumerated_file() {
    let fs = MemoryFileSystem::new();
    // MemoryFileSystem enumerates in path order: "A__b" sorts before "a__B".
    fs.add_file("/run/secrets/A__b", "first");
    fs.add_file("/run/secrets/a__B", "second");

    let secrets = run_secrets_source(&[]).load_with(&fs);

    assert_eq!(secrets.len(), 1);
    let entry = secrets.entry("a:b").unwrap();
    assert_eq!(entry.key(), "a:B");
    assert_eq!(entry.value().expose_secret(), "second");
}

#[test]
fn test_load_twice_is_idempotent() {
    let fs = standard_fs();
    let source = run_secrets_source(&[]);

    let first = source.load_with(&fs);
    let second = source.load_with(&fs);

    assert_eq!(first, second);
}

#[test]
fn test_file_vanishing_before_existence_check_is_omitted() {
    let mut fs = MockSecretsFileSystem::new();
    fs.expect_dir_exists()
        .withf(|path| path == Path::new("/run/secrets"))
        .return_const(true);
    fs.expect_list_files().returning(|_| {
        Ok(vec![
            PathBuf::from("/run/secrets/kept"),
            PathBuf::from("/run/secrets/gone"),
        ])
    });
    fs.expect_file_exists()
        .withf(|path| path == Path::new("/run/secrets/kept"))
        .return_const(true);
    fs.expect_file_exists()
        .withf(|path| path == Path::new("/run/secrets/gone"))
        .return_const(false);
    fs.expect_read()
        .withf(|path| path == Path::new("/run/secrets/kept"))
        .times(1)
        .returning(|_| Ok(b"kept content".to_vec()));

    let secrets = run_secrets_source(&[]).load_with(&fs);

    assert_eq!(value_of(&secrets, "kept").as_deref(), Some("kept content"));
    assert!(!secrets.contains_key("gone"));
}

#[test]
fn test_file_vanishing_between_check_and_read_is_omitted() {
    let mut fs = MockSecretsFileSystem::new();
    fs.expect_dir_exists().return_const(true);
    fs.expect_list_files()
        .returning(|_| Ok(vec![PathBuf::from("/run/secrets/racy")]));
    fs.expect_file_exists().return_const(true);
    fs.expect_read()
        .returning(|_| Err(io::Error::new(io::ErrorKind::NotFound, "removed")));

    let secrets = run_secrets_source(&[]).load_with(&fs);
    assert!(secrets.is_empty());
}

#[test]
fn test_missing_directory_performs_no_listing() {
    let mut fs = MockSecretsFileSystem::new();
    fs.expect_dir_exists().return_const(false);
    fs.expect_list_files().never();
    fs.expect_read().never();

    assert!(run_secrets_source(&[]).load_with(&fs).is_empty());
}

#[test]
fn test_prefix_rejected_files_are_never_read() {
    let mut fs = MockSecretsFileSystem::new();
    fs.expect_dir_exists().return_const(true);
    fs.expect_list_files()
        .returning(|_| Ok(vec![PathBuf::from("/run/secrets/other__key")]));
    fs.expect_file_exists().return_const(true);
    fs.expect_read().never();

    assert!(run_secrets_source(&["app__"]).load_with(&fs).is_empty());
}

#[test]
fn test_unreadable_file_is_skipped_with_warning() {
    let mut fs = MockSecretsFileSystem::new();
    fs.expect_dir_exists().return_const(true);
    fs.expect_list_files().returning(|_| {
        Ok(vec![
            PathBuf::from("/run/secrets/locked"),
            PathBuf::from("/run/secrets/open"),
        ])
    });
    fs.expect_file_exists().return_const(true);
    fs.expect_read().returning(|path| {
        if path.ends_with("locked") {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        } else {
            Ok(b"open content".to_vec())
        }
    });

    let messages = capture_messages(|| {
        let secrets = run_secrets_source(&[]).load_with(&fs);
        assert!(!secrets.contains_key("locked"));
        assert_eq!(value_of(&secrets, "open").as_deref(), Some("open content"));
    });

    assert!(
        messages
            .iter()
            .any(|m| m.contains("Could not read secret file")),
        "expected a warning for the unreadable file; got: {messages:?}"
    );
    assert!(
        messages.iter().all(|m| !m.contains("open content")),
        "secret values must never be logged"
    );
}

#[test]
fn test_listing_failure_yields_no_entries() {
    let mut fs = MockSecretsFileSystem::new();
    fs.expect_dir_exists().return_const(true);
    fs.expect_list_files()
        .returning(|_| Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")));

    assert!(run_secrets_source(&[]).load_with(&fs).is_empty());
}

/// Records every event's message and fields as one string per event.
#[derive(Clone, Default)]
struct CapturingLayer {
    events: Arc<Mutex<Vec<String>>>,
}

struct FieldsVisitor(String);

impl tracing::field::Visit for FieldsVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push_str(&format!("{}={:?} ", field.name(), value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push_str(&format!("{}={} ", field.name(), value));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CapturingLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldsVisitor(String::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(visitor.0);
    }
}

fn capture_messages<F: FnOnce()>(f: F) -> Vec<String> {
    use tracing_subscriber::layer::SubscriberExt;

    let _guard = crate::test_util::global_test_lock().lock().unwrap();
    let layer = CapturingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, f);

    let events = layer.events.lock().unwrap();
    events.clone()
}
