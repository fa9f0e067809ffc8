//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML definition → context → HTTP requests → projected output

use paged_invoke::confirm::DenyAll;
use paged_invoke::error::Error;
use paged_invoke::invoker::ScriptedInvoker;
use paged_invoke::sink::{ChannelSink, JsonLinesSink};
use paged_invoke::{load_service, Engine, HttpInvoker, InvocationContext, Operation};
use serde_json::{json, Value};
use std::io::Write;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DESCRIBE_TARGET: &str = "GraniteServiceVersion20100801.DescribeAnomalyDetectors";

fn detector(name: &str) -> Value {
    json!({"Namespace": "AWS/EC2", "MetricName": name, "StateValue": "TRAINED"})
}

/// Two-page DescribeAnomalyDetectors conversation
async fn mount_detector_pages(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("X-Amz-Target", DESCRIBE_TARGET))
        .and(body_json(json!({"MetricName": "CPUUtilization", "MaxResults": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "AnomalyDetectors": [detector("CPUUtilization"), detector("CPUUtilization")],
            "NextToken": "T2"
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("X-Amz-Target", DESCRIBE_TARGET))
        .and(body_json(json!({
            "MetricName": "CPUUtilization",
            "MaxResults": 2,
            "NextToken": "T2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "AnomalyDetectors": [detector("CPUUtilization")]
        })))
        .mount(server)
        .await;
}

fn detector_params() -> serde_json::Map<String, Value> {
    json!({"MetricName": "CPUUtilization", "MaxResult": "2"})
        .as_object()
        .cloned()
        .unwrap()
}

// ============================================================================
// Paged Operations
// ============================================================================

#[tokio::test]
async fn test_cloudwatch_follows_next_token() {
    let server = MockServer::start().await;
    mount_detector_pages(&server).await;

    let service = load_service("cloudwatch").unwrap();
    let def = service.operation("Get-CWAnomalyDetector").unwrap();
    let context = def
        .context_builder()
        .params(def.bind(detector_params()).unwrap())
        .build()
        .unwrap();

    let invoker = HttpInvoker::for_service(&service, Some(&server.uri())).unwrap();
    let mut engine = Engine::new(invoker);
    let mut sink = JsonLinesSink::new(Vec::new());

    let summary = engine
        .run(&Operation::from_definition(&service, def), &context, &mut sink)
        .await
        .unwrap();

    assert_eq!(summary.calls, 2);
    assert_eq!(summary.emitted, 2);
    assert_eq!(sink.written(), 3);

    let output = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<Value> = output
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["MetricName"], "CPUUtilization");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_cloudwatch_no_auto_iteration_single_call() {
    let server = MockServer::start().await;
    mount_detector_pages(&server).await;

    let service = load_service("cloudwatch").unwrap();
    let def = service.operation("DescribeAnomalyDetectors").unwrap();
    let context = def
        .context_builder()
        .params(def.bind(detector_params()).unwrap())
        .no_auto_iteration(true)
        .build()
        .unwrap();

    let mut engine = Engine::new(HttpInvoker::for_service(&service, Some(&server.uri())).unwrap());
    let mut out = Vec::new();
    let summary = engine
        .run(&Operation::from_definition(&service, def), &context, &mut out)
        .await
        .unwrap();

    assert_eq!(summary.calls, 1);
    assert_eq!(summary.last_cursor.as_deref(), Some("T2"));
    assert_eq!(out.len(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_cloudwatch_bound_next_token_resumes_single_page() {
    let server = MockServer::start().await;
    mount_detector_pages(&server).await;

    let service = load_service("cloudwatch").unwrap();
    let def = service.operation("Get-CWAnomalyDetector").unwrap();
    let mut params = detector_params();
    params.insert("NextToken".to_string(), json!("T2"));
    let context = def
        .context_builder()
        .params(def.bind(params).unwrap())
        .build()
        .unwrap();
    assert!(context.manual_control());

    let mut engine = Engine::new(HttpInvoker::for_service(&service, Some(&server.uri())).unwrap());
    let mut out = Vec::new();
    let summary = engine
        .run(&Operation::from_definition(&service, def), &context, &mut out)
        .await
        .unwrap();

    assert_eq!(summary.calls, 1);
    assert_eq!(out, vec![json!([detector("CPUUtilization")])]);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_drs_bound_next_token_reaches_wire_field() {
    let invoker = ScriptedInvoker::new("https://drs.example")
        .respond(json!({"items": [{"id": "a"}], "nextToken": "T2"}))
        .respond(json!({"items": [{"id": "b"}]}));

    let service = load_service("drs").unwrap();
    let def = &service.operations[0];
    let params = json!({
        "ReplicationConfigurationTemplateIDs": "rct-1",
        "NextToken": "T1"
    });
    let context = def
        .context_builder()
        .params(def.bind(params.as_object().cloned().unwrap()).unwrap())
        .build()
        .unwrap();

    let mut engine = Engine::new(invoker);
    let out = engine
        .run_collect(&Operation::from_definition(&service, def), &context)
        .await
        .unwrap();

    assert_eq!(out, vec![json!([{"id": "a"}])]);
    let requests = engine.invoker().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].param("nextToken"), Some(&json!("T1")));
}

#[tokio::test]
async fn test_cloudwatch_pass_thru_echoes_metric_name() {
    let server = MockServer::start().await;
    mount_detector_pages(&server).await;

    let service = load_service("cloudwatch").unwrap();
    let def = service.operation("Get-CWAnomalyDetector").unwrap();
    let context = def
        .context_builder()
        .params(def.bind(detector_params()).unwrap())
        .pass_thru(true)
        .build()
        .unwrap();

    let mut engine = Engine::new(HttpInvoker::for_service(&service, Some(&server.uri())).unwrap());
    let out = engine
        .run_collect(&Operation::from_definition(&service, def), &context)
        .await
        .unwrap();

    assert_eq!(out, vec![json!("CPUUtilization")]);
    // Every page is still fetched
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_results_stream_over_channel() {
    let server = MockServer::start().await;
    mount_detector_pages(&server).await;

    let service = load_service("cloudwatch").unwrap();
    let def = service.operation("Get-CWAnomalyDetector").unwrap();
    let context = def
        .context_builder()
        .params(def.bind(detector_params()).unwrap())
        .select("*")
        .build()
        .unwrap();

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut sink = ChannelSink::new(tx);
    let mut engine = Engine::new(HttpInvoker::for_service(&service, Some(&server.uri())).unwrap());
    engine
        .run(&Operation::from_definition(&service, def), &context, &mut sink)
        .await
        .unwrap();
    drop(sink);

    let first = rx.recv().await.unwrap();
    assert_eq!(first["NextToken"], "T2");
    let second = rx.recv().await.unwrap();
    assert!(second.get("NextToken").is_none());
    assert!(rx.recv().await.is_none());
}

// ============================================================================
// Mutating Operations
// ============================================================================

#[tokio::test]
async fn test_detach_volume_renames_and_coerces_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("X-Amz-Target", "AmazonEC2.DetachVolume"))
        .and(body_json(json!({
            "VolumeId": "vol-1",
            "InstanceId": "i-123",
            "Force": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Attachment": {"VolumeId": "vol-1", "InstanceId": "i-123", "State": "detaching"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = load_service("ec2").unwrap();
    let def = service.operation("Dismount-EC2Volume").unwrap();
    let raw = json!({"VolumeId": "vol-1", "InstanceId": "i-123", "ForceDismount": "true"});
    let context = def
        .context_builder()
        .params(def.bind(raw.as_object().cloned().unwrap()).unwrap())
        .build()
        .unwrap();

    let mut engine = Engine::new(HttpInvoker::for_service(&service, Some(&server.uri())).unwrap());
    let out = engine
        .run_collect(&Operation::from_definition(&service, def), &context)
        .await
        .unwrap();

    assert_eq!(out[0]["State"], "detaching");
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let service = load_service("secretsmanager").unwrap();
    let def = service.operation("Remove-SECSecret").unwrap();
    let context = def
        .context_builder()
        .param("SecretId", "prod/db")
        .build()
        .unwrap();

    let mut engine = Engine::new(HttpInvoker::for_service(&service, Some(&server.uri())).unwrap())
        .with_confirmer(DenyAll);
    let summary = engine
        .run(&Operation::from_definition(&service, def), &context, &mut Vec::new())
        .await
        .unwrap();

    assert!(summary.skipped);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_required_parameter_fails_before_any_call() {
    let service = load_service("secretsmanager").unwrap();
    let def = service.operation("DeleteSecret").unwrap();
    let raw = json!({"RecoveryWindowInDay": "7"});

    let err = def.bind(raw.as_object().cloned().unwrap()).unwrap_err();
    assert!(matches!(err, Error::MissingParameter { ref name } if name == "SecretId"));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_unresolvable_endpoint_names_endpoint_and_operation() {
    let service = load_service("cloudwatch").unwrap();
    let def = service.operation("DescribeAnomalyDetectors").unwrap();
    let context = def.context_builder().build().unwrap();

    let endpoint = "http://monitoring.nonexistent.invalid";
    let mut engine = Engine::new(HttpInvoker::for_service(&service, Some(endpoint)).unwrap());
    let err = engine
        .run_collect(&Operation::from_definition(&service, def), &context)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NameResolution { .. }), "got {err:?}");
    let message = err.to_string();
    assert!(message.contains(endpoint));
    assert!(message.contains("DescribeAnomalyDetectors"));
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn test_service_error_is_not_reclassified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"__type":"InvalidParameterValue","message":"dns"}"#),
        )
        .mount(&server)
        .await;

    let service = load_service("cloudformation").unwrap();
    let def = service.operation("GetTemplateSummary").unwrap();
    let context = def
        .context_builder()
        .param("StackName", "app")
        .build()
        .unwrap();

    let mut engine = Engine::new(HttpInvoker::for_service(&service, Some(&server.uri())).unwrap());
    let err = engine
        .run_collect(&Operation::from_definition(&service, def), &context)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 400, .. }));
    assert!(engine.history().last().unwrap().error.is_some());
}

// ============================================================================
// Custom Definitions
// ============================================================================

#[tokio::test]
async fn test_custom_definition_file_with_query_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/things"))
        .and(query_param("limit", "1"))
        .and(query_param("after", "m2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 2}],
            "meta": {"next": ""}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/things"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1}],
            "meta": {"next": "m2"}
        })))
        .mount(&server)
        .await;

    let yaml = format!(
        r#"
name: things
base_url: {}
operations:
  - name: ListThings
    method: GET
    path: /v1/things
    default_select: data
    pagination:
      input_token: after
      output_token: meta.next
    output_fields: [data, meta]
    parameters:
      - name: Limit
        request_field: limit
        type: integer
"#,
        server.uri()
    );
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    let service = load_service(file.path()).unwrap();
    let def = service.operation("ListThings").unwrap();
    let context = def
        .context_builder()
        .params(def.bind(json!({"Limit": "1"}).as_object().cloned().unwrap()).unwrap())
        .build()
        .unwrap();

    let mut engine = Engine::new(HttpInvoker::for_service(&service, None).unwrap());
    let out = engine
        .run_collect(&Operation::from_definition(&service, def), &context)
        .await
        .unwrap();

    assert_eq!(out, vec![json!([{"id": 1}]), json!([{"id": 2}])]);
}

#[test]
fn test_engine_runs_on_a_plain_runtime() {
    let invoker = ScriptedInvoker::new("https://scripted.example")
        .respond(json!({"Items": [1, 2], "NextToken": "T2"}))
        .respond(json!({"Items": [3]}));
    let operation = Operation::new(
        "scripted",
        "ListItems",
        |ctx: &InvocationContext, cursor: Option<&str>| {
            let mut request = paged_invoke::request::ServiceRequest::new("scripted", ctx.operation());
            if let Some(cursor) = cursor {
                request = request.with_param("NextToken", cursor);
            }
            Ok::<_, Error>(request)
        },
    )
    .with_paginator(paged_invoke::pagination::CursorPaginator::new("NextToken"));
    let context = InvocationContext::builder("ListItems")
        .select("Items")
        .build()
        .unwrap();

    let mut engine = Engine::new(invoker);
    let out = tokio_test::block_on(engine.run_collect(&operation, &context)).unwrap();

    assert_eq!(out, vec![json!([1, 2]), json!([3])]);
    assert_eq!(engine.invoker().calls(), 2);
}
