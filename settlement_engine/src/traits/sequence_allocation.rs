use crate::traits::SettlementError;

/// Issues unique, monotonically increasing values from named counters stored alongside the business data.
///
/// The counter is process-wide shared mutable state. Access is serialized exclusively by the store's transactional
/// read-modify-write primitive, never by an application-level lock, since callers may run in separate processes.
#[allow(async_fn_in_trait)]
pub trait SequenceAllocation: Clone {
    /// Allocates the next value in the named sequence.
    ///
    /// For any counter key, no two calls ever observe the same value, and returned values are strictly increasing
    /// per key. Gaps are permitted (an allocation whose settlement later fails is simply never used) but never
    /// forbidden. The counter row is created lazily on first allocation.
    ///
    /// Fails with [`SettlementError::AllocationConflict`] if the store's retry budget is exhausted; the caller must
    /// not assume a partial allocation occurred.
    async fn allocate_sequence(&self, name: &str) -> Result<i64, SettlementError>;
}
