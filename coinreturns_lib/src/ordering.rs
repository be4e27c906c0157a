//! Presentation order of windowed returns.

use std::cmp::Ordering;

use crate::returns::WindowedReturn;

/// Sorts entries by return, largest first. Ties keep their input order.
pub fn order_by_return(mut entries: Vec<WindowedReturn>) -> Vec<WindowedReturn> {
    entries.sort_by(|a, b| {
        b.return_percent
            .partial_cmp(&a.return_percent)
            .unwrap_or(Ordering::Equal)
    });
    entries
}
