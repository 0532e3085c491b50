//! Tests for the Nomad API client, backed by a wiremock stub cluster.

use super::*;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn stub_cluster() -> MockServer {
    MockServer::start().await
}

#[test]
fn invalid_address_is_rejected_at_construction() {
    let result = NomadClient::new("not a url", None);
    assert!(matches!(result, Err(Error::InvalidAddress { .. })));
}

#[tokio::test]
async fn list_namespaces_deserializes_the_cluster_answer() {
    let server = stub_cluster().await;
    Mock::given(method("GET"))
        .and(path("/v1/namespaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "Name": "default", "Description": "Default shared namespace" },
            { "Name": "payments" },
        ])))
        .mount(&server)
        .await;

    let client = NomadClient::new(&server.uri(), None).unwrap();
    let namespaces = client.list_namespaces().await.unwrap();
    assert_eq!(namespaces.len(), 2);
    assert_eq!(namespaces[0].name, "default");
    assert_eq!(namespaces[1].name, "payments");
    assert_eq!(namespaces[1].description, "");
}

#[tokio::test]
async fn acl_token_is_sent_with_every_request() {
    let server = stub_cluster().await;
    Mock::given(method("GET"))
        .and(path("/v1/namespaces"))
        .and(header("X-Nomad-Token", "secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = NomadClient::new(&server.uri(), Some("secret-token".to_string())).unwrap();
    client.list_namespaces().await.unwrap();
}

#[tokio::test]
async fn ensure_namespace_accepts_an_existing_namespace() {
    let server = stub_cluster().await;
    Mock::given(method("GET"))
        .and(path("/v1/namespaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "Name": "payments" },
        ])))
        .mount(&server)
        .await;

    let client = NomadClient::new(&server.uri(), None).unwrap();
    client.ensure_namespace("payments", false).await.unwrap();
}

#[tokio::test]
async fn ensure_namespace_fails_when_missing_and_creation_is_not_permitted() {
    let server = stub_cluster().await;
    Mock::given(method("GET"))
        .and(path("/v1/namespaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = NomadClient::new(&server.uri(), None).unwrap();
    let result = client.ensure_namespace("payments", false).await;
    assert!(matches!(
        result,
        Err(Error::NamespaceMissing { namespace }) if namespace == "payments"
    ));
}

#[tokio::test]
async fn ensure_namespace_creates_the_namespace_when_permitted() {
    let server = stub_cluster().await;
    Mock::given(method("GET"))
        .and(path("/v1/namespaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/namespace"))
        .and(body_json(serde_json::json!({ "Name": "payments" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = NomadClient::new(&server.uri(), None).unwrap();
    client.ensure_namespace("payments", true).await.unwrap();
}

#[tokio::test]
async fn parse_job_sends_the_rendered_text_for_canonicalization() {
    let server = stub_cluster().await;
    Mock::given(method("POST"))
        .and(path("/v1/jobs/parse"))
        .and(body_json(serde_json::json!({
            "JobHCL": "job \"example\" {\n}\n",
            "Canonicalize": true,
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "ID": "example", "Type": "service" })),
        )
        .mount(&server)
        .await;

    let client = NomadClient::new(&server.uri(), None).unwrap();
    let job = client.parse_job("job \"example\" {\n}\n").await.unwrap();
    assert_eq!(job["ID"], "example");
}

#[tokio::test]
async fn remote_validation_errors_are_surfaced_verbatim() {
    let server = stub_cluster().await;
    Mock::given(method("POST"))
        .and(path("/v1/jobs/parse"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string("error parsing job: group \"web\" missing task"),
        )
        .mount(&server)
        .await;

    let client = NomadClient::new(&server.uri(), None).unwrap();
    let result = client.parse_job("job \"broken\" {}").await;
    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "error parsing job: group \"web\" missing task");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn register_job_returns_the_evaluation_identifier() {
    let server = stub_cluster().await;
    Mock::given(method("POST"))
        .and(path("/v1/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "EvalID": "deadbeef-0123",
            "JobModifyIndex": 42,
        })))
        .mount(&server)
        .await;

    let client = NomadClient::new(&server.uri(), None).unwrap();
    let response = client
        .register_job(&serde_json::json!({ "ID": "example" }))
        .await
        .unwrap();
    assert_eq!(response.eval_id, "deadbeef-0123");
    assert_eq!(response.job_modify_index, 42);
}
