// store.rs
use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::{
    ids::{IdGenerator, RandomIds},
    models::{Balances, Holding, Rate, Transaction, TxKind, TxStatus, WalletSnapshot, WatchlistEntry},
};

/// Flat network fee charged on every simulated transfer.
pub const FEE_RATE: f64 = 0.001;
pub const WATCH_CHAIN: &str = "EVM";
const DEFAULT_LABEL_CHARS: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    EmptyAddress,
    InvalidHolding,
    InvalidTransfer,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAddress => write!(f, "Invalid address"),
            Self::InvalidHolding => write!(f, "Invalid asset or amount"),
            Self::InvalidTransfer => write!(f, "Invalid transaction"),
        }
    }
}

impl std::error::Error for StoreError {}

/// In-memory wallet state. Lives as long as the process; nothing is reconciled
/// between balances, holdings and the transaction log.
pub struct WalletStore {
    inner: RwLock<WalletSnapshot>,
    ids: Box<dyn IdGenerator>,
}

impl WalletStore {
    pub fn new(seed: WalletSnapshot, ids: Box<dyn IdGenerator>) -> Self {
        Self { inner: RwLock::new(seed), ids }
    }

    /// Demo seed with random transaction ids.
    pub fn seeded() -> Self {
        Self::new(demo_seed(), Box::new(RandomIds))
    }

    pub async fn snapshot(&self) -> WalletSnapshot {
        self.inner.read().await.clone()
    }

    /// Builds a pending transfer and puts it at the head of the log.
    pub async fn record_transfer(
        &self,
        to: &str,
        asset: &str,
        amount: f64,
        from: String,
        now_ms: i64,
    ) -> Result<Transaction, StoreError> {
        if to.trim().is_empty() || asset.trim().is_empty() || !amount.is_finite() {
            return Err(StoreError::InvalidTransfer);
        }

        let tx = Transaction {
            id: self.ids.next_id(),
            time: now_ms,
            kind: TxKind::Send,
            coin: asset.to_string(),
            amount,
            status: TxStatus::Pending,
            fee: amount * FEE_RATE,
            to: to.to_string(),
            from,
            explorer: "#".to_string(),
        };

        self.inner.write().await.txs.insert(0, tx.clone());
        Ok(tx)
    }

    pub async fn add_watch(
        &self,
        address: &str,
        label: Option<&str>,
        now_ms: i64,
    ) -> Result<WatchlistEntry, StoreError> {
        if address.trim().is_empty() {
            return Err(StoreError::EmptyAddress);
        }
        let label = match label.map(str::trim) {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => address.chars().take(DEFAULT_LABEL_CHARS).collect(),
        };

        let entry = WatchlistEntry {
            // kept as given; removal matches on this exact string
            address: address.to_string(),
            label,
            chain: WATCH_CHAIN.to_string(),
            added: now_ms,
        };
        self.inner.write().await.watchlists.push(entry.clone());
        Ok(entry)
    }

    /// Drops every entry whose address matches exactly. Returns how many went.
    pub async fn remove_watch(&self, address: &str) -> usize {
        let mut st = self.inner.write().await;
        let before = st.watchlists.len();
        st.watchlists.retain(|w| w.address != address);
        before - st.watchlists.len()
    }

    /// Appends without merging into an existing holding of the same symbol.
    pub async fn add_holding(&self, symbol: &str, amount: f64) -> Result<Holding, StoreError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() || !amount.is_finite() || amount <= 0.0 {
            return Err(StoreError::InvalidHolding);
        }
        let holding = Holding { symbol, amount };
        self.inner.write().await.holdings.push(holding.clone());
        Ok(holding)
    }
}

fn rate(symbol: &str, rate: f64, change_24h: f64) -> (String, Rate) {
    (
        symbol.to_string(),
        Rate { symbol: symbol.to_string(), rate, change_24h },
    )
}

pub fn demo_seed() -> WalletSnapshot {
    let rates: BTreeMap<String, Rate> = [
        rate("BTC", 56_000.0, 2.4),
        rate("ETH", 3_200.0, -1.2),
        rate("BNB", 350.0, 0.3),
        rate("LTC", 72.0, -0.9),
        rate("BCH", 220.0, 0.1),
    ]
    .into_iter()
    .collect();

    WalletSnapshot {
        balances: Balances { btc: 8_000_000.0, usd_per_btc: 56_000.0 },
        rates,
        watchlists: Vec::new(),
        holdings: vec![
            Holding { symbol: "BTC".into(), amount: 8_000_000.0 },
            Holding { symbol: "ETH".into(), amount: 1_200.0 },
            Holding { symbol: "BNB".into(), amount: 5_400.0 },
        ],
        txs: Vec::new(),
    }
}
