use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Static mock price data for one symbol.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Rate {
    pub symbol: String,
    pub rate: f64,
    #[serde(rename = "change24h")]
    pub change_24h: f64,
}

/// Headline balance shown on the dashboard
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Balances {
    #[serde(rename = "BTC")]
    pub btc: f64,
    #[serde(rename = "USD_per_BTC")]
    pub usd_per_btc: f64,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Holding {
    pub symbol: String,
    pub amount: f64,
}

/// A tracked external address. Not owned by the user.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct WatchlistEntry {
    pub address: String,
    pub label: String,
    pub chain: String,
    pub added: i64,                // UNIX millis
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Send,
}

/// Simulated transfers never leave `pending`.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub time: i64,                 // UNIX millis
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub coin: String,
    pub amount: f64,
    pub status: TxStatus,
    pub fee: f64,
    pub to: String,
    pub from: String,
    pub explorer: String,
}

/// Everything `/api/state` returns, and what the pages embed.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct WalletSnapshot {
    pub balances: Balances,
    pub rates: BTreeMap<String, Rate>,
    pub watchlists: Vec<WatchlistEntry>,
    pub holdings: Vec<Holding>,
    pub txs: Vec<Transaction>,
}

// ---- request bodies ----
// Amounts stay raw JSON so both `2` and `"2"` are accepted.

#[derive(Deserialize)]
pub struct SendReq {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub asset: String,
    #[serde(default)]
    pub amount: serde_json::Value,
}

#[derive(Deserialize)]
pub struct AddContractReq {
    #[serde(default)]
    pub address: String,
    pub label: Option<String>,
}

#[derive(Deserialize)]
pub struct AddAssetReq {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub amount: serde_json::Value,
}

// ---- responses ----

#[derive(Serialize)]
pub struct StatusResp {
    pub status: &'static str,
}

impl StatusResp {
    pub fn success() -> Self {
        Self { status: "success" }
    }
}

#[derive(Serialize)]
pub struct SendResp {
    pub status: &'static str,
    pub tx: Transaction,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginQ {
    pub logged_out: Option<String>,
}
