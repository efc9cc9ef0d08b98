//! Pagination module
//!
//! Cursor pagination over a user's collection endpoint: each page's last
//! item id is sent back as `before` until the API runs out of items.

mod extract;
mod paginator;
mod types;

pub use extract::{build_collection_url, extract_cursor, extract_items, KNOWN_LIST_KEYS};
pub use paginator::CursorPaginator;
pub use types::{
    ClientProfile, NextPage, PaginationState, PaginatorConfig, StopReason, SweepRequest,
};

#[cfg(test)]
mod tests;
