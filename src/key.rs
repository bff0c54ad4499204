//! Identity-key sources.

use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Produces fresh identity keys for rendered elements.
pub trait KeySource {
    fn next_key(&self) -> String;
}

/// Random 8-character hex keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomKeys;

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0x5eed_0000);

impl KeySource for RandomKeys {
    fn next_key(&self) -> String {
        let mut bytes = [0u8; 4];
        match getrandom::fill(&mut bytes) {
            Ok(()) => bytes.iter().map(|b| format!("{:02x}", b)).collect(),
            // No entropy source: keys only need to be distinct within a render.
            Err(_) => format!("{:08x}", FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed) as u32),
        }
    }
}

/// `"0"`, `"1"`, … Deterministic, for tests and snapshot rendering.
#[derive(Default)]
pub struct SequentialKeys {
    next: Cell<u64>,
}

impl SequentialKeys {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeySource for SequentialKeys {
    fn next_key(&self) -> String {
        let key = self.next.get();
        self.next.set(key + 1);
        key.to_string()
    }
}

impl fmt::Debug for SequentialKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SequentialKeys({})", self.next.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_keys_are_hex() {
        let key = RandomKeys.next_key();
        assert_eq!(key.len(), 8);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_sequential_keys_count_up() {
        let keys = SequentialKeys::new();
        assert_eq!(keys.next_key(), "0");
        assert_eq!(keys.next_key(), "1");
    }
}
