//! Exclusive claim of the oldest claimable item of a queue.
//!
//! A claim is one conditional update followed by one read-back, both done by the store. The
//! update only touches a row whose token is still unset, so when several consumers race for
//! the same row exactly one of them writes its token there. Everybody else either lands on a
//! younger row or updates nothing, and then finds nothing carrying their token on read-back.
//! Losing is not an error, and a lost attempt is never retried here.

use claimq_traits::{QueueItem, QueueName, StoreAdaptor, Token};
use tracing::{trace, warn};

use crate::token::TokenGenerator;

/// An item owned by the caller of [claim_next]
#[derive(Clone, Debug)]
pub struct ClaimedItem {
    pub item: QueueItem,
    pub token: Token,
}

/// Try once to claim the oldest unprocessed, unclaimed item of `queue_name`.
///
/// Returns `None` when the queue has nothing claimable or a concurrent consumer won the race.
pub async fn claim_next<TStore: StoreAdaptor>(
    store: &TStore,
    tokens: &TokenGenerator,
    queue_name: &QueueName,
) -> Result<Option<ClaimedItem>, TStore::Error> {
    let token = tokens.next_token();
    let Some(item) = store.claim(queue_name, &token).await? else {
        trace!(queue = %queue_name, token = %token, "nothing claimed");
        return Ok(None);
    };
    if item.processed || item.token.as_ref() != Some(&token) {
        // the adaptor returned a row this attempt does not own
        warn!(queue = %queue_name, id = item.item_id, "read-back mismatch");
        return Ok(None);
    }
    trace!(queue = %queue_name, id = item.item_id, token = %token, "item claimed");
    Ok(Some(ClaimedItem { item, token }))
}
