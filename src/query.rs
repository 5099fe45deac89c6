//! Fan-out query loop.
//!
//! A batch query expands the caller's inputs into one work item per
//! coordinate, then runs the per-item operation once per item, in input
//! order. Item failures are isolated: a coordinate whose query fails (after
//! the transport layer's own retries) is recorded as an error-tagged empty
//! table and the loop moves on. Batch astronomical queries over many sky
//! positions should not be invalidated by one bad coordinate or one
//! unresponsive service.

use std::future::Future;

use tracing::{debug, info, warn};

use crate::error::InputError;
use crate::table::ResultTable;

/// Search radius input: one value for all items, or one value per item.
#[derive(Debug, Clone, PartialEq)]
pub enum Radius {
    /// One radius (degrees) applied to every coordinate.
    Scalar(f64),
    /// Per-coordinate radii; must match the coordinate list length.
    PerItem(Vec<f64>),
}

impl Radius {
    /// Expands the input to one radius per item.
    ///
    /// Fails fast on length mismatch, before any network activity.
    pub fn expand(self, items: usize) -> Result<Vec<f64>, InputError> {
        match self {
            Radius::Scalar(radius) => Ok(vec![radius; items]),
            Radius::PerItem(radii) if radii.len() == items => Ok(radii),
            Radius::PerItem(radii) => Err(InputError::RadiusLengthMismatch {
                coords: items,
                radii: radii.len(),
            }),
        }
    }
}

impl From<f64> for Radius {
    fn from(radius: f64) -> Self {
        Radius::Scalar(radius)
    }
}

impl From<Vec<f64>> for Radius {
    fn from(radii: Vec<f64>) -> Self {
        Radius::PerItem(radii)
    }
}

/// Runs `op` once per item and collects one result per item, in input order.
///
/// A failed item becomes [`ResultTable::error_placeholder`]; the loop never
/// aborts mid-batch. An empty item list yields an empty result list with no
/// calls made. With `verbose` set, a progress line is logged per item.
pub async fn query_loop<T, F, Fut>(items: Vec<T>, verbose: bool, mut op: F) -> Vec<ResultTable>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<ResultTable, crate::error::Error>>,
{
    let total = items.len();
    let mut results = Vec::with_capacity(total);

    for (index, item) in items.into_iter().enumerate() {
        if verbose {
            info!(item = index + 1, total, "running query");
        } else {
            debug!(item = index + 1, total, "running query");
        }

        match op(item).await {
            Ok(table) => results.push(table),
            Err(e) => {
                warn!(
                    item = index + 1,
                    total,
                    error = %e,
                    "query failed; recording error placeholder"
                );
                results.push(ResultTable::error_placeholder(e.to_string()));
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::error::Error;
    use crate::table::ColumnMeta;

    fn table_with_marker(marker: &str) -> ResultTable {
        ResultTable::new(
            vec![ColumnMeta::new("marker")],
            vec![vec![marker.to_string()]],
            BTreeMap::new(),
        )
    }

    #[test]
    fn test_scalar_radius_expands_to_constant() {
        let radii = Radius::from(0.01).expand(3).unwrap();
        assert_eq!(radii, vec![0.01, 0.01, 0.01]);
    }

    #[test]
    fn test_matching_radius_list_passes_through() {
        let radii = Radius::from(vec![0.01, 0.02]).expand(2).unwrap();
        assert_eq!(radii, vec![0.01, 0.02]);
    }

    #[test]
    fn test_mismatched_radius_list_fails_fast() {
        let result = Radius::from(vec![0.01]).expand(2);
        assert_eq!(
            result,
            Err(InputError::RadiusLengthMismatch {
                coords: 2,
                radii: 1
            })
        );
    }

    #[tokio::test]
    async fn test_loop_preserves_input_order() {
        let results = query_loop(vec!["a", "b", "c"], false, |item| async move {
            Ok(table_with_marker(item))
        })
        .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].cell(0, "marker"), Some("a"));
        assert_eq!(results[1].cell(0, "marker"), Some("b"));
        assert_eq!(results[2].cell(0, "marker"), Some("c"));
    }

    #[tokio::test]
    async fn test_loop_isolates_item_failures() {
        let results = query_loop(vec![1, 2, 3], false, |item| async move {
            if item == 2 {
                Err(Error::Input(InputError::EmptyUploadName))
            } else {
                Ok(table_with_marker("ok"))
            }
        })
        .await;

        assert_eq!(results.len(), 3);
        assert!(!results[0].is_error());
        assert!(results[1].is_error());
        assert!(!results[2].is_error());
    }

    #[tokio::test]
    async fn test_empty_items_yield_empty_results() {
        use std::sync::atomic::{AtomicU32, Ordering};

        let calls = AtomicU32::new(0);
        let results = query_loop(Vec::<u32>::new(), false, |_item| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(ResultTable::default()) }
        })
        .await;

        assert!(results.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
