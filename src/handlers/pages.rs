use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use chrono::Utc;

use crate::{
    auth::{clear_cookie, session_cookie, session_user, CurrentUser, SESSION_COOKIE},
    models::{LoginForm, LoginQ},
    state::AppState,
    utils::{cookie_value, html_escape, script_safe_json},
};

const APP_HTML: &str = include_str!("../../templates/app.html");
const LOGIN_HTML: &str = include_str!("../../templates/login.html");

/// Dashboard pages; each is served at `/<name>` and `/` renders the first.
pub const PAGES: &[&str] = &[
    "dashboard",
    "transactions",
    "send",
    "smart",
    "portfolio",
    "history",
    "settings",
];

pub async fn health() -> &'static str {
    "ok"
}

pub async fn index(st: State<Arc<AppState>>, user: Extension<CurrentUser>) -> Response {
    app_page(st, user, PAGES[0]).await
}

pub async fn app_page(
    State(st): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    page: &'static str,
) -> Response {
    let snapshot = st.store.snapshot().await;
    let state_json = match script_safe_json(&snapshot) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("failed to encode state: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "failed to render page").into_response();
        }
    };

    let html = APP_HTML
        .replace("{{PAGE}}", page)
        .replace("{{USER}}", &html_escape(&user.0))
        .replace("{{STATE_JSON}}", &state_json);
    Html(html).into_response()
}

fn login_page(error: Option<&str>, notice: Option<&str>) -> Html<String> {
    let flash = |class: &str, msg: Option<&str>| {
        msg.map(|m| format!(r#"<div class="flash {class}">{}</div>"#, html_escape(m)))
            .unwrap_or_default()
    };
    let html = LOGIN_HTML
        .replace("{{ERROR}}", &flash("error", error))
        .replace("{{NOTICE}}", &flash("success", notice));
    Html(html)
}

pub async fn login_form(
    State(st): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(q): Query<LoginQ>,
) -> Response {
    if session_user(&st, &headers).await.is_some() {
        return Redirect::to("/").into_response();
    }
    let notice = q.logged_out.map(|_| "Logged out successfully.");
    login_page(None, notice).into_response()
}

pub async fn login_submit(
    State(st): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    if session_user(&st, &headers).await.is_some() {
        return Redirect::to("/").into_response();
    }

    if !st.verifier.verify(&form.username, &form.password) {
        tracing::warn!(username = %form.username, "login failed");
        return login_page(Some("Invalid username or password."), None).into_response();
    }

    let token = st.sessions.create(&form.username, Utc::now()).await;
    tracing::info!(username = %form.username, "logged in");
    let cookie = session_cookie(&token, st.sessions.ttl(), st.config.cookie_secure);
    ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}

pub async fn logout(
    State(st): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
) -> Response {
    if let Some(token) = cookie_value(&headers, SESSION_COOKIE) {
        st.sessions.destroy(&token).await;
    }
    tracing::info!(username = %user.0, "logged out");
    (
        [(header::SET_COOKIE, clear_cookie())],
        Redirect::to("/login?logged_out=1"),
    )
        .into_response()
}
