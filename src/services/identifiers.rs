//! Human-facing identifier allocation.
//!
//! Generated identifiers are backed by unique indexes: callers attempt a
//! single insert per candidate and [`insert_with_retry`] regenerates on a
//! unique violation, so there is no check-then-insert window.

use crate::errors::{is_unique_violation, ServiceError};
use metrics::counter;
use rand::Rng;
use sea_orm::DbErr;
use std::future::Future;
use tracing::warn;

pub const WAREHOUSE_ID_PREFIX: &str = "WH";
/// First warehouse number handed out when no parseable identifier exists yet
pub const WAREHOUSE_ID_FLOOR: u64 = 101;

pub const DELIVERY_ID_PREFIX: &str = "DS";
pub const MAINTENANCE_ID_PREFIX: &str = "MT";

const SHORT_ID_LEN: usize = 6;
// No 0/O or 1/I, the identifiers get read over the phone.
const SHORT_ID_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Random `PREFIX-XXXXXX` identifier.
pub fn generate_short_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SHORT_ID_LEN)
        .map(|_| SHORT_ID_ALPHABET[rng.gen_range(0..SHORT_ID_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", prefix, suffix)
}

/// Next sequential warehouse identifier.
///
/// Strips the `WH` prefix from each existing identifier, ignores anything whose
/// remainder is not a plain integer, and returns one above the maximum, or
/// `WH101` when nothing parses.
pub fn next_warehouse_id<'a, I>(existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let next = existing
        .into_iter()
        .filter_map(|id| id.strip_prefix(WAREHOUSE_ID_PREFIX))
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|digits| digits.parse::<u64>().ok())
        .max()
        .and_then(|max| max.checked_add(1))
        .unwrap_or(WAREHOUSE_ID_FLOOR);

    format!("{}{}", WAREHOUSE_ID_PREFIX, next)
}

/// Runs `attempt_insert` until it succeeds, retrying only on unique-constraint
/// violations. Gives up with `Conflict` after `max_attempts` collisions.
pub async fn insert_with_retry<T, F, Fut>(
    entity: &'static str,
    max_attempts: u32,
    mut attempt_insert: F,
) -> Result<T, ServiceError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let max_attempts = max_attempts.max(1);
    for attempt in 1..=max_attempts {
        match attempt_insert(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if is_unique_violation(&err) => {
                counter!("logistics_id_allocation.collisions", 1, "entity" => entity);
                warn!(entity, attempt, error = %err, "generated identifier collided");
            }
            Err(err) => return Err(ServiceError::db_error(err)),
        }
    }

    Err(ServiceError::Conflict(format!(
        "could not allocate a unique {} identifier after {} attempts",
        entity, max_attempts
    )))
}
