use std::sync::atomic::{AtomicU64, Ordering};

/// Source of transaction identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// `0x` + 32 hex chars from a random UUID v4.
#[derive(Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> String {
        format!("0x{}", uuid::Uuid::new_v4().simple())
    }
}

/// Deterministic ids (`0x0000000001`, `0x0000000002`, ...).
#[derive(Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("0x{n:010}")
    }
}
