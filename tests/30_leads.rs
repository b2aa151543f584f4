mod common;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

/// Registers a fresh sales rep and returns its bearer token.
async fn sign_in(client: &Client, server: &common::TestServer, suffix: u128) -> Result<String> {
    let email = format!("rep-{}@salesforge.test", suffix);
    let password = "pipeline-2025";
    let res = client
        .post(server.url("/api/v1/auth/register"))
        .json(&json!({
            "firstName": "Integration",
            "lastName": "Rep",
            "email": email,
            "password": password,
            "confirmPassword": password
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(server.url("/api/v1/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    Ok(body["token"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn lead_lifecycle_against_postgres() -> Result<()> {
    let server = common::start_server().await?;
    if !server.has_database {
        eprintln!("DATABASE_URL not set; skipping lead lifecycle test");
        return Ok(());
    }
    let client = Client::new();
    let suffix = common::unique_suffix();
    let token = sign_in(&client, &server, suffix).await?;
    let company = format!("Lifecycle Co {}", suffix);

    let password = "pipeline-2025";
    let res = client
        .post(server.url("/api/v1/auth/register"))
        .json(&json!({
            "firstName": "Again",
            "lastName": "Rep",
            "email": format!("REP-{}@salesforge.test", suffix),
            "password": password,
            "confirmPassword": password
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .post(server.url("/api/v1/leads"))
        .bearer_auth(&token)
        .json(&json!({
            "companyName": company,
            "contactName": "Pat Lifecycle",
            "email": format!("pat-{}@lifecycle.test", suffix),
            "source": "REFERRAL"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    assert_eq!(created["status"], "NEW");
    assert_eq!(created["source"], "REFERRAL");
    let id = created["id"].as_i64().unwrap_or_default();
    assert!(id > 0);

    let res = client
        .get(server.url("/api/v1/leads/search"))
        .query(&[("q", company.as_str())])
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let found: Value = res.json().await?;
    assert_eq!(found["totalResults"], 1);
    assert_eq!(found["content"][0]["id"], id);

    let res = client
        .patch(server.url(&format!("/api/v1/leads/{}", id)))
        .bearer_auth(&token)
        .json(&json!({ "status": "QUALIFIED", "phone": "+1-555-0100" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let patched: Value = res.json().await?;
    assert_eq!(patched["status"], "QUALIFIED");
    assert_eq!(patched["phone"], "+1-555-0100");

    let res = client
        .patch(server.url(&format!("/api/v1/leads/{}", id)))
        .bearer_auth(&token)
        .json(&json!({ "status": "WON" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(server.url("/api/v1/leads"))
        .query(&[("search", company.as_str()), ("status", "QUALIFIED"), ("sort", "createdAt,desc")])
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = res.json().await?;
    assert_eq!(page["totalElements"], 1);
    assert_eq!(page["first"], true);

    // Sales reps may not delete
    let res = client
        .delete(server.url(&format!("/api/v1/leads/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .get(server.url("/api/v1/leads/count"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let counts: Value = res.json().await?;
    assert!(counts["QUALIFIED"].as_i64().unwrap_or_default() >= 1);
    assert!(counts.get("CONVERTED").is_some());
    Ok(())
}
