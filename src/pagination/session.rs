//! Paging session
//!
//! The termination policy, kept free of I/O so the async stream and the
//! blocking iterator drive exactly the same state machine.

use super::types::{IterateOptions, Page, PageRequest, PagingMetadata};
use crate::types::JsonValue;
use std::collections::VecDeque;
use tracing::debug;

/// Why an iteration stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Cursor moved past the server-reported page count
    PageCountReached,
    /// No page count and the page came back short
    ShortPage,
    /// `max_pages` pages have been fetched
    MaxPages,
}

/// Outcome of recording one fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch this page next
    Continue(u32),
    /// No further fetches
    Done(StopReason),
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// Cursor and counters for one iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingSession {
    cursor: u32,
    fetched_pages: u32,
    max_pages: Option<u32>,
    page_size: u32,
    stopped: Option<StopReason>,
}

impl PagingSession {
    /// Start a session at `options.start_page`
    pub fn new(page_size: u32, options: IterateOptions) -> Self {
        let stopped = (options.max_pages == Some(0)).then_some(StopReason::MaxPages);
        Self {
            cursor: options.start_page,
            fetched_pages: 0,
            max_pages: options.max_pages,
            page_size,
            stopped,
        }
    }

    /// Page to fetch next, or `None` once the session has stopped
    pub fn next_page(&self) -> Option<u32> {
        match self.stopped {
            Some(_) => None,
            None => Some(self.cursor),
        }
    }

    /// Pages fetched so far
    pub fn fetched_pages(&self) -> u32 {
        self.fetched_pages
    }

    /// Reason the session stopped, if it has
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stopped
    }

    /// Record a fetched page and decide whether to advance
    ///
    /// A reported page count is authoritative, even when the page is short.
    /// Without one, only a page holding exactly `page_size` items advances.
    pub fn record_page(&mut self, metadata: &PagingMetadata, item_count: usize) -> NextPage {
        if let Some(reason) = self.stopped {
            return NextPage::Done(reason);
        }

        self.fetched_pages += 1;

        let stop = match metadata.page_count {
            Some(page_count) => {
                self.cursor = self.cursor.saturating_add(1);
                (u64::from(self.cursor) > page_count).then_some(StopReason::PageCountReached)
            }
            None => {
                let full = item_count > 0 && item_count == self.page_size as usize;
                if full {
                    self.cursor = self.cursor.saturating_add(1);
                    None
                } else {
                    Some(StopReason::ShortPage)
                }
            }
        };

        let stop = stop.or_else(|| {
            self.max_pages
                .filter(|max| self.fetched_pages >= *max)
                .map(|_| StopReason::MaxPages)
        });

        match stop {
            Some(reason) => {
                debug!(
                    "Paging stopped after {} page(s): {:?}",
                    self.fetched_pages, reason
                );
                self.stopped = Some(reason);
                NextPage::Done(reason)
            }
            None => NextPage::Continue(self.cursor),
        }
    }
}

/// Everything one iteration owns: template, session and the buffered page
///
/// Items are handed out one at a time; the next page is requested only once
/// the buffer is empty.
#[derive(Debug, Clone)]
pub struct PagingState {
    template: PageRequest,
    session: PagingSession,
    buffer: VecDeque<JsonValue>,
}

impl PagingState {
    /// Begin an iteration over `template`
    ///
    /// Any page number on the template is ignored and total-page metadata is
    /// always requested.
    pub fn new(template: PageRequest, options: IterateOptions) -> Self {
        let session = PagingSession::new(template.page_size, options);
        let template = PageRequest {
            page: None,
            total_pages: true,
            ..template
        };
        Self {
            template,
            session,
            buffer: VecDeque::new(),
        }
    }

    /// Next buffered item, if any
    pub fn pop_item(&mut self) -> Option<JsonValue> {
        self.buffer.pop_front()
    }

    /// Request for the next page, or `None` when iteration is over
    pub fn next_request(&self) -> Option<PageRequest> {
        let page = self.session.next_page()?;
        debug!("Fetching {} page {}", self.template.resource, page);
        Some(self.template.clone().page(page))
    }

    /// Buffer a fetched page's items and advance the session
    pub fn absorb(&mut self, mut page: Page) {
        let items = page.take_items(self.template.resolved_collection_key());
        self.session.record_page(&page.metadata(), items.len());
        self.buffer.extend(items);
    }

    /// The session driving this iteration
    pub fn session(&self) -> &PagingSession {
        &self.session
    }
}
