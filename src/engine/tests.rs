//! Tests for engine module

use super::*;
use crate::confirm::DenyAll;
use crate::error::Error;
use crate::failure::NameResolutionFailure;
use crate::invoker::ScriptedInvoker;
use crate::loader::load_service;
use crate::pagination::CursorPaginator;
use crate::request::ServiceRequest;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

const ENDPOINT: &str = "https://things.example.com";

fn list_things() -> Operation {
    Operation::new(
        "things",
        "ListThings",
        |ctx: &InvocationContext, cursor: Option<&str>| {
            let mut request = ServiceRequest::new("things", ctx.operation());
            if let Some(cursor) = cursor {
                request = request.with_param("cursor", cursor);
            }
            Ok::<_, Error>(request)
        },
    )
    .with_paginator(CursorPaginator::new("cursor"))
}

fn two_pages() -> ScriptedInvoker {
    ScriptedInvoker::new(ENDPOINT)
        .respond(json!({"items": ["a", "b"], "cursor": "T1"}))
        .respond(json!({"items": ["c"], "cursor": ""}))
}

fn engine(invoker: ScriptedInvoker) -> (Engine<Arc<ScriptedInvoker>>, Arc<ScriptedInvoker>) {
    let invoker = Arc::new(invoker);
    (Engine::new(Arc::clone(&invoker)), invoker)
}

// ============================================================================
// Paging Scenarios
// ============================================================================

#[tokio::test]
async fn test_auto_iteration_emits_every_page_in_order() {
    let (mut engine, invoker) = engine(two_pages());
    let ctx = InvocationContext::builder("ListThings")
        .select("items")
        .build()
        .unwrap();

    let mut out = Vec::new();
    let summary = engine.run(&list_things(), &ctx, &mut out).await.unwrap();

    assert_eq!(out, vec![json!(["a", "b"]), json!(["c"])]);
    assert_eq!(invoker.calls(), 2);
    assert_eq!(summary.calls, 2);
    assert_eq!(summary.pages, 2);
    assert_eq!(summary.emitted, 2);
    assert_eq!(summary.last_cursor, None);
    assert!(!summary.skipped);
}

#[tokio::test]
async fn test_opt_out_stops_after_one_call() {
    let (mut engine, invoker) = engine(two_pages());
    let ctx = InvocationContext::builder("ListThings")
        .select("items")
        .no_auto_iteration(true)
        .build()
        .unwrap();

    let out = engine.run_collect(&list_things(), &ctx).await.unwrap();

    assert_eq!(out, vec![json!(["a", "b"])]);
    assert_eq!(invoker.calls(), 1);
}

#[tokio::test]
async fn test_starting_cursor_is_manual_control() {
    let invoker = ScriptedInvoker::new(ENDPOINT).respond(json!({"items": ["c"], "cursor": "T2"}));
    let (mut engine, invoker) = engine(invoker);
    let ctx = InvocationContext::builder("ListThings")
        .starting_cursor(Some("T1".to_string()))
        .build()
        .unwrap();

    let mut out = Vec::new();
    let summary = engine.run(&list_things(), &ctx, &mut out).await.unwrap();

    assert_eq!(summary.calls, 1);
    assert_eq!(summary.last_cursor.as_deref(), Some("T2"));
    assert_eq!(invoker.requests()[0].param("cursor"), Some(&json!("T1")));
}

#[tokio::test]
async fn test_identity_emits_whole_responses() {
    let (mut engine, _) = engine(two_pages());
    let ctx = InvocationContext::builder("ListThings").build().unwrap();

    let out = engine.run_collect(&list_things(), &ctx).await.unwrap();
    assert_eq!(out[0], json!({"items": ["a", "b"], "cursor": "T1"}));
    assert_eq!(out.len(), 2);
}

#[tokio::test]
async fn test_field_select_missing_emits_nothing() {
    let (mut engine, invoker) = engine(two_pages());
    let ctx = InvocationContext::builder("ListThings")
        .select("Missing")
        .build()
        .unwrap();

    let out = engine.run_collect(&list_things(), &ctx).await.unwrap();
    assert!(out.is_empty());
    assert_eq!(invoker.calls(), 2);
}

// ============================================================================
// Echo Rules
// ============================================================================

#[tokio::test]
async fn test_echo_emits_parameter_once_after_call() {
    let invoker = ScriptedInvoker::new(ENDPOINT).respond(json!({"anything": "ignored"}));
    let (mut engine, invoker) = engine(invoker);
    let ctx = InvocationContext::builder("ListThings")
        .param("Name", "foo")
        .select("^Name")
        .build()
        .unwrap();

    let op = Operation::new("things", "ListThings", |ctx: &InvocationContext, _: Option<&str>| {
        Ok::<_, Error>(ServiceRequest::new("things", ctx.operation()))
    });
    let mut out = Vec::new();
    let summary = engine.run(&op, &ctx, &mut out).await.unwrap();

    assert_eq!(out, vec![json!("foo")]);
    assert_eq!(invoker.calls(), 1);
    assert_eq!(summary.emitted, 1);
}

#[tokio::test]
async fn test_echo_still_pages_through_everything() {
    let (mut engine, invoker) = engine(two_pages());
    let ctx = InvocationContext::builder("ListThings")
        .param("Name", "foo")
        .select("^Name")
        .build()
        .unwrap();

    let out = engine.run_collect(&list_things(), &ctx).await.unwrap();
    assert_eq!(out, vec![json!("foo")]);
    assert_eq!(invoker.calls(), 2);
}

#[tokio::test]
async fn test_echo_of_unbound_parameter_emits_nothing() {
    let (mut engine, invoker) = engine(two_pages());
    let ctx = InvocationContext::builder("ListThings")
        .select("^Name")
        .build()
        .unwrap();

    let out = engine.run_collect(&list_things(), &ctx).await.unwrap();
    assert!(out.is_empty());
    assert_eq!(invoker.calls(), 2);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_conflicting_selection_makes_no_calls() {
    let (_engine, invoker) = engine(two_pages());

    let err = InvocationContext::builder("ListThings")
        .select("items")
        .pass_thru(true)
        .pass_thru_param("Name")
        .build()
        .unwrap_err();

    assert!(matches!(err, Error::ConflictingSelection { .. }));
    assert!(err.to_string().contains("^Name"));
    assert_eq!(invoker.calls(), 0);
}

#[tokio::test]
async fn test_failure_on_page_k_keeps_earlier_batches() {
    let invoker = ScriptedInvoker::new(ENDPOINT)
        .respond(json!({"items": ["a"], "cursor": "T1"}))
        .respond(json!({"items": ["b"], "cursor": "T2"}))
        .fail(Error::http_status(503, "unavailable"));
    let (mut engine, invoker) = engine(invoker);
    let ctx = InvocationContext::builder("ListThings")
        .select("items")
        .build()
        .unwrap();

    let mut out = Vec::new();
    let err = engine.run(&list_things(), &ctx, &mut out).await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
    assert_eq!(out, vec![json!(["a"]), json!(["b"])]);
    assert_eq!(invoker.calls(), 3);
}

#[tokio::test]
async fn test_name_resolution_failure_is_enriched() {
    let invoker = ScriptedInvoker::new("https://things.bogus-region.example").fail(
        Error::transport("connect failed", NameResolutionFailure::new("things.bogus-region.example")),
    );
    let (mut engine, _) = engine(invoker);
    let ctx = InvocationContext::builder("ListThings").build().unwrap();

    let err = engine.run_collect(&list_things(), &ctx).await.unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, Error::NameResolution { .. }));
    assert!(message.contains("https://things.bogus-region.example"));
    assert!(message.contains("ListThings"));
}

#[tokio::test]
async fn test_other_failures_are_unchanged() {
    let invoker = ScriptedInvoker::new(ENDPOINT).fail(Error::transport(
        "connect failed",
        std::io::Error::other("connection refused"),
    ));
    let (mut engine, _) = engine(invoker);
    let ctx = InvocationContext::builder("ListThings").build().unwrap();

    let err = engine.run_collect(&list_things(), &ctx).await.unwrap_err();
    assert_eq!(err.to_string(), "Transport error: connect failed");
}

// ============================================================================
// Confirmation
// ============================================================================

fn detach_volume() -> (Operation, crate::loader::ServiceDefinition) {
    let service = load_service("ec2").unwrap();
    let op = Operation::from_definition(&service, service.operation("DetachVolume").unwrap());
    (op, service)
}

#[tokio::test]
async fn test_declined_confirmation_makes_no_calls() {
    let invoker = ScriptedInvoker::new(ENDPOINT).respond(json!({"Attachment": {}}));
    let invoker = Arc::new(invoker);
    let mut engine = Engine::new(Arc::clone(&invoker)).with_confirmer(DenyAll);

    let (op, service) = detach_volume();
    let ctx = service
        .operation("DetachVolume")
        .unwrap()
        .context_builder()
        .param("VolumeId", "vol-1")
        .build()
        .unwrap();

    let mut out = Vec::new();
    let summary = engine.run(&op, &ctx, &mut out).await.unwrap();

    assert!(summary.skipped);
    assert_eq!(summary.calls, 0);
    assert!(out.is_empty());
    assert_eq!(invoker.calls(), 0);
    assert!(engine.history().is_empty());
}

#[tokio::test]
async fn test_force_bypasses_declining_confirmer() {
    let invoker = ScriptedInvoker::new(ENDPOINT)
        .respond(json!({"Attachment": {"VolumeId": "vol-1", "State": "detaching"}}));
    let mut engine = Engine::new(invoker).with_confirmer(DenyAll);

    let (op, service) = detach_volume();
    let ctx = service
        .operation("DetachVolume")
        .unwrap()
        .context_builder()
        .param("VolumeId", "vol-1")
        .force(true)
        .build()
        .unwrap();

    let out = engine.run_collect(&op, &ctx).await.unwrap();
    assert_eq!(out, vec![json!({"VolumeId": "vol-1", "State": "detaching"})]);
    assert_eq!(engine.invoker().calls(), 1);
}

#[test]
fn test_operation_labels() {
    let (op, service) = detach_volume();
    assert_eq!(op.action(), "Dismount-EC2Volume (DetachVolume)");

    let ctx = service
        .operation("DetachVolume")
        .unwrap()
        .context_builder()
        .param("VolumeId", "vol-1")
        .param("InstanceId", "i-123")
        .build()
        .unwrap();
    assert_eq!(op.confirmation_target(&ctx), "InstanceId='i-123'");
    assert!(!op.paginator.is_paginated());
}

// ============================================================================
// History
// ============================================================================

#[tokio::test]
async fn test_history_records_last_response() {
    let (mut engine, _) = engine(two_pages());
    let ctx = InvocationContext::builder("ListThings").build().unwrap();
    engine.run_collect(&list_things(), &ctx).await.unwrap();

    let entry = engine.history().last().unwrap();
    assert_eq!(entry.operation, "ListThings");
    assert_eq!(entry.error, None);
    assert_eq!(
        engine.history().last_response(),
        Some(&json!({"items": ["c"], "cursor": ""}))
    );
}

#[tokio::test]
async fn test_history_records_failures() {
    let invoker = ScriptedInvoker::new(ENDPOINT).fail(Error::http_status(400, "bad"));
    let (mut engine, _) = engine(invoker);
    let ctx = InvocationContext::builder("ListThings").build().unwrap();
    assert!(engine.run_collect(&list_things(), &ctx).await.is_err());

    let entry = engine.history().last().unwrap();
    assert!(entry.last_response.is_none());
    assert!(entry.error.as_deref().unwrap().contains("400"));
}

#[test]
fn test_history_is_bounded() {
    let mut history = InvocationHistory::new(2);
    for i in 0..3 {
        history.record(HistoryEntry {
            operation: format!("Op{i}"),
            last_response: None,
            error: None,
        });
    }
    let names: Vec<_> = history.entries().map(|e| e.operation.as_str()).collect();
    assert_eq!(names, vec!["Op1", "Op2"]);

    let mut disabled = InvocationHistory::new(0);
    disabled.record(HistoryEntry {
        operation: "Op".to_string(),
        last_response: None,
        error: None,
    });
    assert!(disabled.is_empty());
}

#[test]
fn test_engine_config() {
    let engine = Engine::new(ScriptedInvoker::new(ENDPOINT))
        .with_config(EngineConfig::new().with_history_capacity(1));
    assert_eq!(engine.config().history_capacity, 1);
}
