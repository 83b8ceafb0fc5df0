use crate::errors::ServiceError;
use rust_decimal::Decimal;
use validator::ValidationError;

// Identifier allocation shared by the slices
pub mod identifiers;

// Fleet
pub mod maintenance;
pub mod vehicles;

// Dispatch
pub mod deliveries;

// Storage
pub mod inventory;
pub mod warehouses;

/// One page of a listing together with the unpaginated row count.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }
}

/// Normalises 1-based `page`/`per_page` values before they reach a paginator.
///
/// The row offset `(page - 1) * per_page` must fit a signed 64-bit `OFFSET`;
/// pages beyond that are rejected instead of overflowing inside the paginator.
pub(crate) fn page_bounds(page: u64, per_page: u64) -> Result<(u64, u64), ServiceError> {
    let (page, per_page) = (page.max(1), per_page.max(1));
    match (page - 1).checked_mul(per_page) {
        Some(offset) if offset <= i64::MAX as u64 => Ok((page, per_page)),
        _ => Err(ServiceError::BadRequest(format!(
            "page {page} is out of range for per_page {per_page}"
        ))),
    }
}

pub(crate) fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("range");
        err.message = Some("must not be negative".into());
        Err(err)
    }
}
