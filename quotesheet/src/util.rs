use futures::{StreamExt, TryStreamExt};
use quotesheet_core::QuotesheetError;

/// Run `f` over `items` with at most `limit` futures in flight, keeping input order.
///
/// Stops at the first error. A `limit` of zero is treated as one.
pub async fn try_map_ordered<I, T, F, Fut>(
    items: I,
    limit: usize,
    f: F,
) -> Result<Vec<T>, QuotesheetError>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: core::future::Future<Output = Result<T, QuotesheetError>>,
{
    futures::stream::iter(items)
        .map(f)
        .buffered(limit.max(1))
        .try_collect()
        .await
}
