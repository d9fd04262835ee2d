//! Dialect capability hook.

/// Capability query on the target backend, implemented by the execution
/// layer.
///
/// Only the row-limit placement is consulted here; everything else the
/// generators emit is backend-neutral.
pub trait Dialect {
    /// Whether the backend takes the row limit as a prefix keyword
    /// (`TOP n` after `SELECT`) instead of a suffix clause (`LIMIT n`).
    fn supports_prefix_limit(&self) -> bool;
}
