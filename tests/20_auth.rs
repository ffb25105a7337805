mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn admin_login_me_and_refresh() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/api/v1/auth/login"))
        .json(&json!({ "email": "  ADMIN@novaprofile.io", "password": common::ADMIN_PASSWORD }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    let access = body["data"]["access"].as_str().unwrap().to_string();
    let refresh = body["data"]["refresh"].as_str().unwrap().to_string();

    let me = client
        .get(server.url("/api/v1/auth/me"))
        .header("Authorization", format!("Bearer {}", access))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(me["data"], json!({ "email": common::ADMIN_EMAIL, "role": "admin", "is_active": true }));

    let res = client
        .post(server.url("/api/v1/auth/refresh"))
        .query(&[("refresh_token", refresh.as_str())])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let rotated = res.json::<Value>().await?;
    assert!(rotated["data"]["access"].is_string());
    assert!(rotated["data"]["refresh"].is_string());
    Ok(())
}

#[tokio::test]
async fn refresh_rejects_access_tokens() -> Result<()> {
    let server = common::ensure_server().await?;
    let access = common::tokens_for(common::ADMIN_EMAIL).access;

    let res = reqwest::Client::new()
        .post(server.url("/api/v1/auth/refresh"))
        .query(&[("refresh_token", access.as_str())])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_uniform() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for payload in [
        json!({ "email": common::ADMIN_EMAIL, "password": "wrong" }),
        json!({ "email": "nobody@novaprofile.io", "password": "whatever" }),
        // fixture users carry no password hash
        json!({ "email": "hr@novaprofile.io", "password": "" }),
    ] {
        let res = client.post(server.url("/api/v1/auth/login")).json(&payload).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.json::<Value>().await?["message"], "Invalid credentials");
    }
    Ok(())
}

#[tokio::test]
async fn protected_routes_need_active_user() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let missing = client.get(server.url("/api/v1/employees")).send().await?;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let garbage = client
        .get(server.url("/api/v1/employees"))
        .header("Authorization", "Bearer not-a-token")
        .send()
        .await?;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);

    let unknown = client
        .get(server.url("/api/v1/employees"))
        .header("Authorization", common::bearer("ghost@novaprofile.io"))
        .send()
        .await?;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);

    let inactive = client
        .get(server.url("/api/v1/employees"))
        .header("Authorization", common::bearer("former@novaprofile.io"))
        .send()
        .await?;
    assert_eq!(inactive.status(), StatusCode::FORBIDDEN);

    let viewer = client
        .get(server.url("/api/v1/auth/me"))
        .header("Authorization", common::bearer("viewer@novaprofile.io"))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(viewer["data"]["role"], "employee");
    Ok(())
}
