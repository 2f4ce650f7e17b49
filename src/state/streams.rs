use std::collections::HashMap;

use crate::error::ApiError;
use crate::ports::StreamHandle;
use crate::types::Barrier;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProposalKey {
    pub contract_type: String,
    pub barrier: Barrier,
}

/// Proposal subscriptions of the current batch, keyed by
/// (contract type, barrier). One live handle per key; pairs the server
/// refused keep their error instead.
#[derive(Debug, Default)]
pub struct PriceStreams {
    pub live: HashMap<ProposalKey, Box<dyn StreamHandle>>,
    pub failed: HashMap<ProposalKey, ApiError>,
}

impl PriceStreams {
    pub fn is_empty(&self) -> bool {
        self.live.is_empty() && self.failed.is_empty()
    }

    /// Insert a live handle. A handle already under the key is returned so
    /// the caller can close it.
    pub fn insert_live(
        &mut self,
        key: ProposalKey,
        handle: Box<dyn StreamHandle>,
    ) -> Option<Box<dyn StreamHandle>> {
        self.failed.remove(&key);
        self.live.insert(key, handle)
    }

    pub fn insert_failed(&mut self, key: ProposalKey, error: ApiError) {
        self.failed.insert(key, error);
    }

    /// Empty both maps, handing back every live handle.
    pub fn drain(&mut self) -> Vec<Box<dyn StreamHandle>> {
        self.failed.clear();
        self.live.drain().map(|(_, h)| h).collect()
    }
}

#[derive(Debug)]
pub struct TicksStream {
    pub symbol: String,
    pub handle: Box<dyn StreamHandle>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Counted(Arc<AtomicUsize>);

    impl StreamHandle for Counted {
        fn close(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn key(t: &str, b: &str) -> ProposalKey {
        ProposalKey {
            contract_type: t.into(),
            barrier: Barrier::Single(b.into()),
        }
    }

    #[test]
    fn one_live_handle_per_key() {
        let closed = Arc::new(AtomicUsize::new(0));
        let mut s = PriceStreams::default();

        assert!(s.insert_live(key("CALLE", "101"), Box::new(Counted(closed.clone()))).is_none());
        let prev = s.insert_live(key("CALLE", "101"), Box::new(Counted(closed.clone())));
        prev.expect("previous handle returned").close();

        assert_eq!(s.live.len(), 1);
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drain_clears_failed_entries() {
        let closed = Arc::new(AtomicUsize::new(0));
        let mut s = PriceStreams::default();
        s.insert_live(key("CALLE", "101"), Box::new(Counted(closed.clone())));
        s.insert_failed(key("PUTE", "101"), ApiError::new("InvalidBarrier", "x"));

        let handles = s.drain();
        assert_eq!(handles.len(), 1);
        assert!(s.is_empty());
    }
}
