// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # dhis2-kit
//!
//! A typed client toolkit for the DHIS2 REST API.
//!
//! ## Features
//!
//! - **Async and blocking clients** with the same surface
//! - **Paging iteration**: walk a page-based collection as one lazy sequence
//! - **Metadata CRUD** by UID, data value set import/export, analytics
//! - **Typed models** that keep unknown server fields
//! - **Classified errors**: authentication, not found, validation, server
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dhis2_kit::{Dhis2Client, IterateOptions, PageRequest, Result};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Dhis2Client::connect("http://localhost:8080/api", "admin", "district")?;
//!
//!     let template = PageRequest::new("organisationUnits")
//!         .fields(["id", "displayName", "level"])
//!         .page_size(100);
//!     let units = client.iterate(template, IterateOptions::new().max_pages(5));
//!     futures::pin_mut!(units);
//!     while let Some(unit) = units.next().await {
//!         println!("{}", unit?["displayName"]);
//!     }
//!
//!     client.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │           Dhis2Client (async)  /  BlockingDhis2Client        │
//! │  get/post/put/patch/delete   list   iterate   analytics      │
//! └──────────────────────────────────────────────────────────────┘
//!                │                     │
//! ┌──────────────┴──────────┬──────────┴──────────┬──────────────┐
//! │          HTTP           │     Pagination      │    Models    │
//! ├─────────────────────────┼─────────────────────┼──────────────┤
//! │ Basic auth, timeout     │ PagingSession       │ DataElement  │
//! │ Status classification   │ pager / flat meta   │ DataSet      │
//! │ JSON body decoding      │ pageCount, short pg │ OrgUnit tree │
//! └─────────────────────────┴─────────────────────┴──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Connection settings and profiles
pub mod config;

/// HTTP transport and response classification
pub mod http;

/// Paging requests, metadata and the iteration session
pub mod pagination;

/// Async and blocking DHIS2 clients
pub mod client;

/// Typed DHIS2 records
pub mod models;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use client::{BlockingDhis2Client, Dhis2Client, Items};
pub use config::{ClientConfig, ConnectionProfile};
pub use pagination::{IterateOptions, Page, PageRequest, PagingMetadata};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
