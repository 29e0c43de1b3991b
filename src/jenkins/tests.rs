use mockito::Matcher;
use serde_json::json;
use url::Url;

use crate::auth::{Credentials, Token};
use crate::config::Settings;
use crate::error::JenlogsError;
use crate::jenkins::types::{FlowNode, FLOW_GRAPH_ACTION_CLASS, WORKFLOW_RUN_CLASS};
use crate::jenkins::JenkinsProvider;

use super::tree::fixtures::sample_nodes;

fn node_json(node: &FlowNode) -> serde_json::Value {
    json!({
        "_class": node.class,
        "id": node.id,
        "displayName": node.display_name,
        "iconColor": node.icon_color,
        "parents": node.parents,
        "url": node.url,
    })
}

fn build_description_json() -> serde_json::Value {
    json!({
        "_class": WORKFLOW_RUN_CLASS,
        "number": 7,
        "result": "FAILURE",
        "actions": [
            { "_class": "hudson.model.CauseAction" },
            {},
            {
                "_class": FLOW_GRAPH_ACTION_CLASS,
                "nodes": sample_nodes().iter().map(node_json).collect::<Vec<_>>(),
            },
        ],
    })
}

fn provider_for(server: &mockito::Server, credentials: Option<Credentials>) -> JenkinsProvider {
    let settings = Settings {
        base_url: Url::parse(&server.url()).unwrap(),
        credentials,
    };
    JenkinsProvider::new(settings).unwrap()
}

#[tokio::test]
async fn test_resolve_happy_path() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/job/app/7/api/json")
        .match_query(Matcher::UrlEncoded("depth".into(), "2".into()))
        .with_status(200)
        .with_body(build_description_json().to_string())
        .create_async()
        .await;

    let provider = provider_for(&server, None);
    let resolution = provider.resolve("app", 7, None).await.unwrap();

    mock.assert_async().await;
    let names: Vec<&str> = resolution
        .targets
        .iter()
        .map(|t| t.display_name.as_str())
        .collect();
    assert_eq!(names, ["compile", "unit", "integration"]);
    assert!(resolution.targets[0]
        .url
        .as_str()
        .ends_with("/job/app/7/execution/node/4/log"));
    assert_eq!(resolution.description["number"], 7);
}

#[tokio::test]
async fn test_resolve_with_color_filter() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/job/app/7/api/json")
        .match_query(Matcher::UrlEncoded("depth".into(), "2".into()))
        .with_status(200)
        .with_body(build_description_json().to_string())
        .create_async()
        .await;

    let provider = provider_for(&server, None);
    let resolution = provider.resolve("app", 7, Some("red")).await.unwrap();

    assert_eq!(resolution.targets.len(), 1);
    assert_eq!(resolution.targets[0].display_name, "integration");
}

#[tokio::test]
async fn test_resolve_nested_job_path() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/job/team/job/app/3/api/json")
        .match_query(Matcher::UrlEncoded("depth".into(), "2".into()))
        .with_status(200)
        .with_body(build_description_json().to_string())
        .create_async()
        .await;

    let provider = provider_for(&server, None);
    provider.resolve("team/app", 3, None).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_resolve_missing_build_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/job/app/999/api/json")
        .match_query(Matcher::UrlEncoded("depth".into(), "2".into()))
        .with_status(404)
        .create_async()
        .await;

    let provider = provider_for(&server, None);
    let result = provider.resolve("app", 999, None).await;

    match result {
        Err(JenlogsError::NotFound { job, build }) => {
            assert_eq!(job, "app");
            assert_eq!(build, 999);
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_resolve_unauthenticated_is_auth_required() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/job/app/7/api/json")
        .match_query(Matcher::UrlEncoded("depth".into(), "2".into()))
        .with_status(401)
        .create_async()
        .await;

    let provider = provider_for(&server, None);
    let result = provider.resolve("app", 7, None).await;
    assert!(matches!(result, Err(JenlogsError::AuthRequired)));
}

#[tokio::test]
async fn test_resolve_rejected_credentials_is_auth_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/job/app/7/api/json")
        .match_query(Matcher::UrlEncoded("depth".into(), "2".into()))
        .with_status(403)
        .create_async()
        .await;

    let provider = provider_for(&server, None);
    let result = provider.resolve("app", 7, None).await;
    assert!(matches!(result, Err(JenlogsError::AuthRejected)));
}

#[tokio::test]
async fn test_resolve_non_pipeline_build_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/job/app/7/api/json")
        .match_query(Matcher::UrlEncoded("depth".into(), "2".into()))
        .with_status(200)
        .with_body(json!({ "_class": "hudson.model.FreeStyleBuild", "actions": [] }).to_string())
        .create_async()
        .await;

    let provider = provider_for(&server, None);
    let result = provider.resolve("app", 7, None).await;
    assert!(matches!(result, Err(JenlogsError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_resolve_non_json_body_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/job/app/7/api/json")
        .match_query(Matcher::UrlEncoded("depth".into(), "2".into()))
        .with_status(200)
        .with_body("<html>login page</html>")
        .create_async()
        .await;

    let provider = provider_for(&server, None);
    let result = provider.resolve("app", 7, None).await;
    assert!(matches!(result, Err(JenlogsError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_resolve_sends_basic_auth() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/job/app/7/api/json")
        .match_query(Matcher::UrlEncoded("depth".into(), "2".into()))
        .match_header(
            "authorization",
            "Basic amVua2lucy1ib3Q6MTFhYWJiY2NkZGVlZmY=",
        )
        .with_status(200)
        .with_body(build_description_json().to_string())
        .create_async()
        .await;

    let credentials = Credentials::new("jenkins-bot".to_string(), Token::from("11aabbccddeeff"));
    let provider = provider_for(&server, Some(credentials));
    provider.resolve("app", 7, None).await.unwrap();

    mock.assert_async().await;
}
