//! DHIS2 clients
//!
//! [`Dhis2Client`] (async) and [`BlockingDhis2Client`] expose the same
//! operations field for field:
//!
//! - generic `get`/`post`/`put`/`patch`/`delete`
//! - `list` for one page and `iterate` for a lazy walk over every page
//! - metadata CRUD by UID
//! - data value set import/export and analytics

mod blocking;
mod dhis2;

pub use blocking::{BlockingDhis2Client, Items};
pub use dhis2::Dhis2Client;

use crate::types::{QueryParams, QueryValue};

/// Endpoint of a single object, `{resource}/{uid}`
pub(crate) fn object_endpoint(resource: &str, uid: &str) -> String {
    format!("{}/{}", resource.trim_end_matches('/'), uid)
}

/// `fields` joined with commas, then the extra parameters on top
pub(crate) fn metadata_params<S: AsRef<str>>(fields: &[S], extra: &QueryParams) -> QueryParams {
    let joined = fields
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",");

    let mut params = QueryParams::new();
    params.insert("fields".to_string(), QueryValue::Str(joined));
    params.extend(extra.clone());
    params
}
