//! Fetch planning from the first page

use super::types::{FetchPlan, PageResult};
use crate::error::{Error, Result};

/// Derive the fetch plan from page 1
///
/// The page size is the number of records page 1 actually carried, not the
/// requested page size, since the endpoint may cap it.
///
/// - declared total of 0: no pages at all
/// - empty first page with a positive total: one page, nothing more requested
/// - otherwise `ceil(total / page_size)` pages
///
/// A first page with records but no declared total is malformed. A first page
/// with neither is an empty result.
pub fn plan_pages(first: &PageResult) -> Result<FetchPlan> {
    let page_size = first.records.len();

    let total_count = match first.declared_total {
        Some(total) => total,
        None if page_size == 0 => 0,
        None => {
            return Err(Error::malformed(
                first.page,
                "response is missing the declared total",
            ))
        }
    };

    let total_pages = if total_count == 0 {
        0
    } else if page_size == 0 {
        1
    } else {
        let pages = total_count.div_ceil(page_size as u64);
        u32::try_from(pages).map_err(|_| {
            Error::malformed(first.page, format!("declared total {total_count} is too large"))
        })?
    };

    Ok(FetchPlan {
        page_size,
        total_count,
        total_pages,
    })
}
