#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::unwrap_used, reason = "integration test: panics are the assertion mechanism")]

mod common;

use common::{record, uri_of, FakeTracker, PROJECT};
use tracker_core::{ItemState, WorkItem};
use tracker_types::models::{FieldValue, RawRecord};
use tracker_types::schema::field;
use tracker_types::{RecordError, RemoteError, TrackerError};

#[test]
fn test_fresh_item_is_loaded_and_clean() {
    let tracker = FakeTracker::new();
    let item = tracker.load(record("DEMO-1", "Login"));

    assert_eq!(item.state(), ItemState::Loaded);
    assert!(item.diff().is_empty());
    assert_eq!(item.id(), "DEMO-1");
    assert_eq!(item.project_id(), PROJECT);
    assert_eq!(item.title(), Some("Login"));
}

#[test]
fn test_save_without_changes_makes_no_calls() {
    let tracker = FakeTracker::new();
    let mut item = tracker.load(record("DEMO-1", "Login"));

    item.save().unwrap();

    assert!(tracker.calls().is_empty());
}

#[test]
fn test_save_sends_only_changed_fields_then_reloads() {
    let tracker = FakeTracker::new();
    let mut item = tracker.load(record("DEMO-1", "Login"));

    item.set_title("Login v2").unwrap();
    item.set_field(field::PRIORITY, FieldValue::enum_option("high")).unwrap();
    item.set_field(field::STATUS, FieldValue::enum_option("open")).unwrap();
    assert_eq!(item.state(), ItemState::Dirty);

    item.save().unwrap();

    let updates = tracker.updates();
    assert_eq!(updates.len(), 1);
    let (uri, delta) = &updates[0];
    assert_eq!(uri, &uri_of("DEMO-1"));
    assert_eq!(delta.field_names().collect::<Vec<_>>(), vec![field::PRIORITY, field::TITLE]);
    assert_eq!(tracker.ops(), vec!["updateWorkItem", "getWorkItemByUri"]);

    assert!(item.diff().is_empty());
    assert_eq!(item.state(), ItemState::Loaded);
    assert_eq!(item.title(), Some("Login v2"));
}

#[test]
fn test_writing_original_value_back_sends_nothing() {
    let tracker = FakeTracker::new();
    let mut item = tracker.load(record("DEMO-1", "Login"));

    item.set_title("temporary").unwrap();
    item.set_title("Login").unwrap();
    item.save().unwrap();

    assert_eq!(tracker.count("updateWorkItem"), 0);
}

#[test]
fn test_clearing_a_field_is_sent_as_none() {
    let tracker = FakeTracker::new();
    let mut item = tracker.load(record("DEMO-1", "Login"));

    item.set_field(field::STATUS, None).unwrap();
    item.save().unwrap();

    let (_, delta) = &tracker.updates()[0];
    assert_eq!(delta.get(field::STATUS), Some(None));
    assert_eq!(item.status_id(), None);
}

#[test]
fn test_rejected_update_keeps_edits() {
    let tracker = FakeTracker::new();
    let mut item = tracker.load(record("DEMO-1", "Login"));
    tracker.fail_updates_with(Some(RemoteError::rpc("Tracker", "updateWorkItem", "locked").into()));

    item.set_title("Login v2").unwrap();
    let err = item.save().unwrap_err();

    assert_eq!(
        err,
        TrackerError::Remote(RemoteError::UpdateRejected {
            uri: uri_of("DEMO-1"),
            message: "locked".to_string()
        })
    );
    assert_eq!(item.state(), ItemState::Dirty);
    assert_eq!(item.title(), Some("Login v2"));

    tracker.fail_updates_with(None);
    item.save().unwrap();
    assert!(!item.is_dirty());
}

#[test]
fn test_transport_failure_is_propagated_unchanged() {
    let tracker = FakeTracker::new();
    let mut item = tracker.load(record("DEMO-1", "Login"));
    tracker.fail_updates_with(Some(RemoteError::Transport { message: "reset".to_string() }.into()));

    item.set_title("Login v2").unwrap();
    let err = item.save().unwrap_err();

    assert!(err.is_transient());
    assert!(item.is_dirty());
}

#[test]
fn test_failed_reload_after_accepted_update_is_not_resent() {
    let tracker = FakeTracker::new();
    let mut item = tracker.load(record("DEMO-1", "Login"));
    tracker.fail_fetches_with(Some(RemoteError::Transport { message: "reset".to_string() }.into()));

    item.set_title("Login v2").unwrap();
    let err = item.save().unwrap_err();

    assert!(err.is_transient());
    assert!(!item.is_dirty());
    assert_eq!(item.title(), Some("Login v2"));
    assert_eq!(tracker.count("updateWorkItem"), 1);

    tracker.fail_fetches_with(None);
    item.save().unwrap();
    assert_eq!(tracker.count("updateWorkItem"), 1);
}

#[test]
fn test_revert_changes_drops_edits() {
    let tracker = FakeTracker::new();
    let mut item = tracker.load(record("DEMO-1", "Login"));

    item.set_title("scratch").unwrap();
    item.revert_changes().unwrap();

    assert_eq!(item.title(), Some("Login"));
    assert_eq!(tracker.count("updateWorkItem"), 0);
}

#[test]
fn test_unknown_field_and_wrong_kind_rejected() {
    let tracker = FakeTracker::new();
    let mut item = tracker.load(record("DEMO-1", "Login"));

    assert!(matches!(
        item.field("titel"),
        Err(TrackerError::Record(RecordError::UnknownField { .. }))
    ));
    assert!(matches!(
        item.set_field(field::TITLE, FieldValue::Integer(3)),
        Err(TrackerError::Record(RecordError::FieldKindMismatch { .. }))
    ));
    assert!(!item.is_dirty());
}

#[test]
fn test_unresolvable_record_fails_to_load() {
    let tracker = FakeTracker::new();
    tracker.insert(record("DEMO-1", "Login").with(field::UNRESOLVABLE, true));

    let err = WorkItem::from_uri(tracker.session(), &uri_of("DEMO-1")).unwrap_err();
    assert!(matches!(err, TrackerError::Record(RecordError::Unresolvable { .. })));
}

#[test]
fn test_load_by_id() {
    let tracker = FakeTracker::new();
    tracker.insert(record("DEMO-7", "Export"));

    let item = WorkItem::from_id(tracker.session(), PROJECT, "DEMO-7").unwrap();
    assert_eq!(item.uri(), uri_of("DEMO-7"));

    let missing = WorkItem::from_id(tracker.session(), PROJECT, "DEMO-8").unwrap_err();
    assert!(matches!(missing, TrackerError::Record(RecordError::NotFound { .. })));
}

#[test]
fn test_create_checks_fields_and_loads_new_item() {
    let tracker = FakeTracker::new();
    tracker.require_fields(&[field::TITLE, field::SEVERITY]);

    let unknown = RawRecord::new().with("titel", "x");
    let err = WorkItem::create(tracker.session(), PROJECT, "defect", unknown).unwrap_err();
    assert_eq!(err, TrackerError::from(RecordError::UnknownNewField { field: "titel".to_string() }));

    let partial = RawRecord::new().with(field::TITLE, "Crash on save");
    let err = WorkItem::create(tracker.session(), PROJECT, "defect", partial).unwrap_err();
    assert_eq!(
        err,
        TrackerError::from(RecordError::MissingRequiredFields { fields: vec![field::SEVERITY.to_string()] })
    );
    assert_eq!(tracker.count("createWorkItem"), 0);

    let complete = RawRecord::new()
        .with(field::TITLE, "Crash on save")
        .with(field::SEVERITY, FieldValue::enum_option("critical"));
    let item = WorkItem::create(tracker.session(), PROJECT, "defect", complete).unwrap();

    assert_eq!(item.type_id(), Some("defect"));
    assert_eq!(item.title(), Some("Crash on save"));
    assert_eq!(item.project_id(), PROJECT);
}

#[test]
fn test_delete_makes_item_stale() {
    let tracker = FakeTracker::new();
    let mut item = tracker.load(record("DEMO-1", "Login"));

    item.delete().unwrap();
    assert!(item.is_deleted());

    let err = item.reload().unwrap_err();
    assert_eq!(err, TrackerError::from(RecordError::Stale { uri: uri_of("DEMO-1") }));

    item.set_title("after delete").unwrap();
    assert!(matches!(item.save(), Err(TrackerError::Record(RecordError::Stale { .. }))));
    assert_eq!(tracker.count("updateWorkItem"), 0);
}

#[test]
fn test_reload_of_record_deleted_elsewhere_is_stale() {
    let tracker = FakeTracker::new();
    let mut item = tracker.load(record("DEMO-1", "Login"));
    let mut other = WorkItem::from_uri(tracker.session(), item.uri()).unwrap();

    other.delete().unwrap();

    assert!(matches!(item.reload(), Err(TrackerError::Record(RecordError::Stale { .. }))));
}

#[test]
fn test_identity_and_display() {
    let tracker = FakeTracker::new();
    let a = tracker.load(record("DEMO-1", "Login"));
    let mut b = WorkItem::from_uri(tracker.session(), a.uri()).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.to_string(), "DEMO-1: Login");
    assert_eq!(a.url(), "https://tracker.example.com/#/project/DEMO/workitem?id=DEMO-1");

    b.set_title("changed").unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_last_revision_number_is_cached() {
    let tracker = FakeTracker::new();
    let mut item = tracker.load(record("DEMO-1", "Login"));
    tracker.set_revisions(&["12", "40", "57"]);

    assert_eq!(item.last_revision_number().unwrap(), 57);
    tracker.set_revisions(&["12", "40", "57", "60"]);
    assert_eq!(item.last_revision_number().unwrap(), 57);
    assert_eq!(tracker.count("getRevisions"), 1);
}

#[test]
fn test_move_to_document_reloads_location() {
    let tracker = FakeTracker::new();
    let mut item = tracker.load(record("DEMO-1", "Login"));

    item.move_to_document("Specs/Requirements", None, None).unwrap();

    assert_eq!(item.document_name().as_deref(), Some("Specs/Requirements"));
    assert_eq!(tracker.calls()[0].args[2..], ["-".to_string(), "last".to_string()]);
}
