mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_and_root_are_public() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(server.url("/")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["name"], "Todo Tracker API");
    Ok(())
}

#[tokio::test]
async fn register_then_login_and_whoami() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = reqwest::Client::new();

    server.register("alice").await?;
    let token = server.login("alice").await?;

    let res = client
        .get(server.url("/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let me: Value = res.json().await?;
    assert_eq!(me["username"], "alice");
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_conflicts() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    server.register("alice").await?;

    let res = reqwest::Client::new()
        .post(server.url("/api/auth/register"))
        .json(&json!({ "username": "alice", "password": "different1" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "CONFLICT");
    Ok(())
}

#[tokio::test]
async fn bad_login_is_generic_401() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    server.register("alice").await?;
    let client = reqwest::Client::new();

    let wrong_password: Value = client
        .post(server.url("/api/auth/login"))
        .json(&json!({ "username": "alice", "password": "wrong-password" }))
        .send()
        .await?
        .json()
        .await?;
    let unknown_user = client
        .post(server.url("/api/auth/login"))
        .json(&json!({ "username": "nobody", "password": "password123" }))
        .send()
        .await?;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_user: Value = unknown_user.json().await?;

    assert_eq!(wrong_password, unknown_user);
    Ok(())
}

#[tokio::test]
async fn weak_registration_is_rejected() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/auth/register"))
        .json(&json!({ "username": "alice", "password": "123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["field_errors"]["password"].is_string());

    let res = client
        .post(server.url("/api/auth/register"))
        .json(&json!({ "username": "a!", "password": "password123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
