//! Pagination module
//!
//! Turns the page-oriented listing API into one logical sequence of items.
//!
//! # Overview
//!
//! A [`PageRequest`] describes one listing call. [`PagingState`] drives a
//! full iteration: it hands out the next request, buffers the items of each
//! fetched page and applies the termination policy in [`PagingSession`]:
//!
//! - a reported `pageCount` is authoritative; stop once the cursor passes it
//! - without `pageCount`, stop at the first page shorter than `pageSize`
//! - `max_pages` caps the number of fetches regardless of either rule

mod session;
mod types;

pub use session::{NextPage, PagingSession, PagingState, StopReason};
pub use types::{
    IterateOptions, Page, PageRequest, PagingMetadata, DEFAULT_FIELDS, DEFAULT_ITERATE_PAGE_SIZE,
    DEFAULT_PAGE_SIZE,
};
