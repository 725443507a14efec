use axum::http::{header, HeaderMap};
use sha2::{Digest, Sha256};

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Mock wallet address for a user: `0x` + first 10 hex chars of SHA-256(username).
pub fn wallet_address(username: &str) -> String {
    let digest = Sha256::digest(username.as_bytes());
    let hex = hex::encode(digest);
    format!("0x{}", &hex[..10])
}

/// Accepts a JSON number or a numeric string. Non-finite values are rejected.
pub fn parse_amount(v: &serde_json::Value) -> Option<f64> {
    let n = match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON that can sit inside a `<script>` element without closing it early.
pub fn script_safe_json<T: serde::Serialize>(v: &T) -> serde_json::Result<String> {
    Ok(serde_json::to_string(v)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
}
