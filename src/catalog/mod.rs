//! Access to the museum object catalog.
//!
//! [`Catalog`] is the seam the slideshow controller depends on;
//! [`HarvardClient`] is the HTTP implementation.

use std::future::Future;

use crate::error::FetchError;

pub mod client;
pub mod types;

pub use client::HarvardClient;
pub use types::{Artwork, Feed, Page, PageInfo};

/// Paged source of displayable artworks.
///
/// Returned pages are already filtered: every record has a secure primary
/// image and a usable title.
pub trait Catalog: Send + Sync + 'static {
    /// One page of the randomly ordered default feed.
    fn fetch_page(
        &self,
        page: u32,
        size: u32,
    ) -> impl Future<Output = Result<Page, FetchError>> + Send;

    /// One page of free-text search results.
    fn search_page(
        &self,
        query: &str,
        page: u32,
    ) -> impl Future<Output = Result<Page, FetchError>> + Send;
}
