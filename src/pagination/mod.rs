//! Pagination module
//!
//! Page-number pagination where the total page count is known up front.
//!
//! # Overview
//!
//! The first page is fetched on its own. Its record count is taken as the page
//! size and its declared total as the result size, which yields a [`FetchPlan`]
//! listing every remaining page. Requests for those pages are built from one
//! shared set of base parameters by [`PageRequestBuilder`], each request with
//! its own copy carrying the page number.

mod planner;
mod types;

pub use planner::plan_pages;
pub use types::{FetchPlan, PageRequest, PageRequestBuilder, PageResult};
