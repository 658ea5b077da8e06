//! Page/limit query parameter handling.
//!
//! Request parameters arrive as untyped strings and may be absent or
//! non-numeric; both are treated as "not supplied". `page` is 1-based on
//! the wire and converted to a store offset here.

use serde::{Deserialize, Deserializer};
use utoipa::IntoParams;

/// Default page size when `limit` is absent or invalid
pub const DEFAULT_LIMIT: u64 = 10;

/// Raw `?page=&limit=` query parameters.
///
/// Non-numeric values deserialize to `None` rather than rejecting the
/// request, matching loose numeric coercion on the caller side.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
pub struct PageParams {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub limit: Option<u64>,
}

/// Resolved offset/limit pair for a store query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}

/// Convert 1-based `page`/`limit` parameters into a store offset/limit.
///
/// `limit` defaults to [`DEFAULT_LIMIT`] unless a positive value was
/// supplied. `offset` is `(page - 1) * limit` for page >= 1; page 0,
/// absent, and non-numeric all land on offset 0. The offset math
/// saturates, so an absurd `page` yields `u64::MAX` rather than a wrap.
pub fn prepare_pagination(params: &PageParams) -> Pagination {
    let limit = params.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT);
    let offset = params
        .page
        .filter(|p| *p > 0)
        .map(|p| p.saturating_sub(1).saturating_mul(limit))
        .unwrap_or(0);

    Pagination { offset, limit }
}

/// Total page count for `total_records` records at `limit` per page.
///
/// `limit` must be positive; [`prepare_pagination`] guarantees that for
/// every limit it hands out.
pub fn total_pages(total_records: u64, limit: u64) -> u64 {
    total_records.div_ceil(limit)
}
