use std::collections::BTreeMap;

use bytes::Bytes;
use optimizer_logging::optimizer_error;

/// Identity of one revocable display handle minted by [`ResourceLedger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandleId(u64);

/// Registry of revocable display handles.
///
/// A handle binds one byte payload (input file or result blob) to an opaque
/// identity that the presentation layer can dereference until it is revoked.
/// The ledger is the single owner of revocation timing: every handle minted
/// must be released exactly once, and a handle is never dereferenceable after
/// release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceLedger {
    live: BTreeMap<HandleId, Bytes>,
    next_id: u64,
    minted: u64,
    faults: u64,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a live handle for a byte payload. Never fails.
    pub fn acquire(&mut self, payload: Bytes) -> HandleId {
        self.next_id += 1;
        let handle = HandleId(self.next_id);
        self.minted += 1;
        self.live.insert(handle, payload);
        handle
    }

    /// Revokes a handle.
    ///
    /// Releasing a handle that is not live is a programming error, not a
    /// user-facing one: it is counted as a ledger fault and logged, while the
    /// call itself stays idempotent for the caller.
    pub fn release(&mut self, handle: HandleId) {
        if self.live.remove(&handle).is_none() {
            self.faults += 1;
            optimizer_error!("ledger fault: release of non-live handle {:?}", handle);
        }
    }

    /// Revokes every live handle. Used on full workflow teardown.
    pub fn release_all(&mut self) {
        self.live.clear();
    }

    /// Dereferences a handle. `None` once the handle has been revoked.
    pub fn resolve(&self, handle: HandleId) -> Option<&Bytes> {
        self.live.get(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn minted_count(&self) -> u64 {
        self.minted
    }

    /// Number of double-release conditions observed so far.
    pub fn fault_count(&self) -> u64 {
        self.faults
    }
}
