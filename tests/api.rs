//! HTTP tests against the full router: session gate plus the JSON API.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response, StatusCode},
    Router,
};
use chrono::{TimeDelta, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use vaultium::{
    auth::DemoCredentials,
    config::AppConfig,
    ids::SequentialIds,
    router,
    state::AppState,
    store::{demo_seed, WalletStore},
};

fn test_state() -> Arc<AppState> {
    let cfg = AppConfig {
        static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/static").into(),
        ..AppConfig::default()
    };
    let store = WalletStore::new(demo_seed(), Box::new(SequentialIds::default()));
    let verifier = DemoCredentials::new(cfg.demo_user.clone(), &cfg.demo_password);
    AppState::new(cfg, store, Box::new(verifier))
}

async fn login(app: &Router, username: &str, password: &str) -> Response<Body> {
    let req = Request::post("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={username}&password={password}")))
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

/// Logs in with the demo account and returns the `Cookie` header value.
async fn session(app: &Router) -> String {
    let resp = login(app, "demo", "password123").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let set = resp.headers()[header::SET_COOKIE].to_str().unwrap();
    set.split(';').next().unwrap().to_string()
}

async fn get(app: &Router, path: &str, cookie: Option<&str>) -> Response<Body> {
    let mut req = Request::get(path);
    if let Some(c) = cookie {
        req = req.header(header::COOKIE, c);
    }
    app.clone().oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
}

async fn post_json(app: &Router, path: &str, cookie: &str, body: Value) -> Value {
    let req = Request::post(path)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    json_body(resp).await
}

async fn json_body(resp: Response<Body>) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn text_body(resp: Response<Body>) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn api_state(app: &Router, cookie: &str) -> Value {
    let resp = get(app, "/api/state", Some(cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    json_body(resp).await
}

fn location(resp: &Response<Body>) -> &str {
    resp.headers()[header::LOCATION].to_str().unwrap()
}

#[tokio::test]
async fn demo_credentials_open_a_session() {
    let app = router(test_state());
    let resp = login(&app, "demo", "password123").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    let cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("vaultium_session="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn wrong_credentials_render_an_error() {
    let app = router(test_state());
    for (u, p) in [("demo", "nope"), ("admin", "password123"), ("", "")] {
        let resp = login(&app, u, p).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(header::SET_COOKIE).is_none());
        assert!(text_body(resp).await.contains("Invalid username or password."));
    }
}

#[tokio::test]
async fn protected_routes_redirect_to_login() {
    let app = router(test_state());
    for path in [
        "/", "/dashboard", "/transactions", "/send", "/smart", "/portfolio", "/history",
        "/settings", "/logout", "/api/state",
    ] {
        let resp = get(&app, path, None).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&resp), "/login", "{path}");
    }

    let req = Request::post("/api/send")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"to":"0xabc","asset":"BTC","amount":"2"}"#))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(location(&resp), "/login");
}

#[tokio::test]
async fn bogus_or_expired_cookie_is_rejected() {
    let st = test_state();
    let app = router(st.clone());

    let resp = get(&app, "/api/state", Some("vaultium_session=not-a-token")).await;
    assert_eq!(location(&resp), "/login");

    let stale = st.sessions.create("demo", Utc::now() - TimeDelta::hours(13)).await;
    let resp = get(&app, "/api/state", Some(&format!("vaultium_session={stale}"))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
}

#[tokio::test]
async fn pages_render_for_a_session() {
    let app = router(test_state());
    let cookie = session(&app).await;

    let resp = get(&app, "/portfolio", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = text_body(resp).await;
    assert!(html.contains(r#"data-page="portfolio""#));
    assert!(html.contains("\"USD_per_BTC\""));

    let html = text_body(get(&app, "/", Some(&cookie)).await).await;
    assert!(html.contains(r#"data-page="dashboard""#));

    let resp = get(&app, "/login", Some(&cookie)).await;
    assert_eq!(location(&resp), "/");
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let app = router(test_state());
    let cookie = session(&app).await;

    let resp = get(&app, "/logout", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?logged_out=1");
    assert!(resp.headers()[header::SET_COOKIE].to_str().unwrap().contains("Max-Age=0"));

    let resp = get(&app, "/api/state", Some(&cookie)).await;
    assert_eq!(location(&resp), "/login");

    let html = text_body(get(&app, "/login?logged_out=1", None).await).await;
    assert!(html.contains("Logged out successfully."));
}

#[tokio::test]
async fn state_snapshot_has_every_collection() {
    let app = router(test_state());
    let cookie = session(&app).await;
    let st = api_state(&app, &cookie).await;

    assert_eq!(st["balances"]["BTC"], json!(8_000_000.0));
    assert_eq!(st["rates"]["ETH"]["change24h"], json!(-1.2));
    assert_eq!(st["holdings"].as_array().unwrap().len(), 3);
    assert!(st["watchlists"].as_array().unwrap().is_empty());
    assert!(st["txs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn send_records_a_pending_tx_at_the_head() {
    let app = router(test_state());
    let cookie = session(&app).await;

    post_json(&app, "/api/send", &cookie, json!({"to": "0x111", "asset": "ETH", "amount": 1})).await;
    let out = post_json(&app, "/api/send", &cookie, json!({"to": "0xabc", "asset": "BTC", "amount": "2"})).await;

    assert_eq!(out["status"], "success");
    let tx = &out["tx"];
    assert!((tx["fee"].as_f64().unwrap() - 0.002).abs() < 1e-12);
    assert_eq!(tx["status"], "pending");
    assert_eq!(tx["type"], "send");
    assert_eq!(tx["coin"], "BTC");
    assert_eq!(tx["amount"], json!(2.0));
    assert_eq!(tx["to"], "0xabc");
    assert_eq!(tx["from"], json!(vaultium::utils::wallet_address("demo")));
    assert_eq!(tx["explorer"], "#");
    assert_eq!(tx["id"], "0x0000000002");

    let txs = api_state(&app, &cookie).await["txs"].clone();
    assert_eq!(txs.as_array().unwrap().len(), 2);
    assert_eq!(txs[0], *tx);
}

#[tokio::test]
async fn send_rejects_unparseable_amount_and_bad_body() {
    let app = router(test_state());
    let cookie = session(&app).await;

    let out = post_json(&app, "/api/send", &cookie, json!({"to": "0xabc", "asset": "BTC", "amount": "lots"})).await;
    assert_eq!(out["status"], "error");

    let req = Request::post("/api/send")
        .header(header::COOKIE, &cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let out = json_body(resp).await;
    assert_eq!(out["status"], "error");
    assert!(out["message"].as_str().unwrap().starts_with("Malformed request body"));

    assert!(api_state(&app, &cookie).await["txs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn add_contract_validates_and_defaults_label() {
    let app = router(test_state());
    let cookie = session(&app).await;

    let out = post_json(&app, "/api/add_contract", &cookie, json!({"address": ""})).await;
    assert_eq!(out, json!({"status": "error", "message": "Invalid address"}));
    assert!(api_state(&app, &cookie).await["watchlists"].as_array().unwrap().is_empty());

    let out = post_json(&app, "/api/add_contract", &cookie, json!({"address": "0xdeadbeefcafe"})).await;
    assert_eq!(out, json!({"status": "success"}));

    let list = api_state(&app, &cookie).await["watchlists"].clone();
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["label"], "0xdeadbe");
    assert_eq!(list[0]["chain"], "EVM");
    assert!(list[0]["added"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn remove_contract_is_exact_and_idempotent() {
    let app = router(test_state());
    let cookie = session(&app).await;

    for (addr, label) in [("0xaaa", "one"), ("0xbbb", "two"), ("0xaaa", "three")] {
        post_json(&app, "/api/add_contract", &cookie, json!({"address": addr, "label": label})).await;
    }

    for _ in 0..2 {
        let out = post_json(&app, "/api/remove_contract/0xaaa", &cookie, json!(null)).await;
        assert_eq!(out["status"], "success");
        let list = api_state(&app, &cookie).await["watchlists"].clone();
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["address"], "0xbbb");
        assert_eq!(list[0]["label"], "two");
    }
}

#[tokio::test]
async fn add_asset_uppercases_and_rejects_non_positive() {
    let app = router(test_state());
    let cookie = session(&app).await;

    let out = post_json(&app, "/api/add_asset", &cookie, json!({"symbol": "eth", "amount": "5"})).await;
    assert_eq!(out, json!({"status": "success"}));

    for amount in [json!("0"), json!(-2), json!("abc")] {
        let out = post_json(&app, "/api/add_asset", &cookie, json!({"symbol": "eth", "amount": amount})).await;
        assert_eq!(out["status"], "error");
        assert_eq!(out["message"], "Invalid asset or amount");
    }
    let out = post_json(&app, "/api/add_asset", &cookie, json!({"symbol": "", "amount": 1})).await;
    assert_eq!(out["status"], "error");

    let holdings = api_state(&app, &cookie).await["holdings"].clone();
    let holdings = holdings.as_array().unwrap();
    assert_eq!(holdings.len(), 4);
    assert_eq!(holdings[3], json!({"symbol": "ETH", "amount": 5.0}));
}

#[tokio::test]
async fn health_is_public() {
    let app = router(test_state());
    let resp = get(&app, "/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(text_body(resp).await, "ok");
}

#[tokio::test]
async fn static_assets_are_public() {
    let app = router(test_state());
    let resp = get(&app, "/static/app.js", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::LOCATION).is_none());
    assert!(text_body(resp).await.contains("/api/state"));

    let resp = get(&app, "/static/missing.css", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_page_tolerates_odd_query_values() {
    let app = router(test_state());
    for path in ["/login?logged_out=yes", "/login?logged_out=300", "/login?logged_out="] {
        let resp = get(&app, path, None).await;
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
        assert!(text_body(resp).await.contains("<form"), "{path}");
    }
    let html = text_body(get(&app, "/login", None).await).await;
    assert!(!html.contains("Logged out successfully."));
}
