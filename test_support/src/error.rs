//! Error formatting helpers for stable test assertions.

use std::error::Error;

/// Join an error and its sources, outermost first, with `": "`.
///
/// Configuration errors wrap I/O and JSON failures, and scenario errors wrap
/// ledger errors; assertions usually care about the whole chain.
///
/// # Examples
///
/// ```ignore
/// let err = std::io::Error::other("disk full");
/// assert_eq!(display_error_chain(&err), "disk full");
/// ```
pub fn display_error_chain(e: &(dyn Error + 'static)) -> String {
    let mut current: Option<&(dyn Error + 'static)> = Some(e);
    std::iter::from_fn(|| {
        let err = current?;
        current = err.source();
        Some(err.to_string())
    })
    .collect::<Vec<_>>()
    .join(": ")
}
