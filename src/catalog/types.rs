//! Response types for the museum object endpoint.

use serde::{Deserialize, Deserializer, Serialize};

/// Title the catalog uses for records that have no real one.
pub const PLACEHOLDER_TITLE: &str = "Untitled";

/// Shown when no contributor carries a creator role.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Longest edge requested from IIIF image services.
pub const IIIF_BOUNDING_BOX: u32 = 2000;

const CREATOR_ROLES: &[&str] = &["Artist", "Painter"];

/// Which query produced a page; the two feeds filter slightly differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// Randomly ordered default listing.
    Random,
    /// Free-text search results.
    Search,
}

/// One artwork as returned by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub primaryimageurl: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ArtworkImage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub people: Vec<Person>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub dated: Option<String>,
    #[serde(default)]
    pub culture: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub creditline: Option<String>,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtworkImage {
    #[serde(default)]
    pub baseimageurl: Option<String>,
    #[serde(default)]
    pub iiifbaseuri: Option<String>,
    #[serde(default)]
    pub publiccaption: Option<String>,
}

/// A contributor credited on an artwork.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default, deserialize_with = "null_as_default")]
    pub displayname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
}

/// Pagination metadata, passed through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub totalrecords: u64,
    #[serde(default)]
    pub totalrecordsperquery: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub pages: u64,
}

/// One page of the object listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub info: PageInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub records: Vec<Artwork>,
}

impl Artwork {
    /// Best image reference for full-screen display.
    ///
    /// Prefers the IIIF service of the first image, then its base image, then
    /// the record's primary URL. Empty when none is present.
    #[must_use]
    pub fn image_url(&self) -> String {
        if let Some(image) = self.images.first() {
            if let Some(iiif) = non_empty(&image.iiifbaseuri) {
                return format!(
                    "{iiif}/full/!{IIIF_BOUNDING_BOX},{IIIF_BOUNDING_BOX}/0/default.jpg"
                );
            }
            if let Some(base) = non_empty(&image.baseimageurl) {
                return base.to_string();
            }
        }
        self.primaryimageurl.clone()
    }

    /// Display name of the first contributor credited as artist or painter.
    #[must_use]
    pub fn creator(&self) -> &str {
        self.people
            .iter()
            .find(|p| CREATOR_ROLES.contains(&p.role.as_str()))
            .map(|p| p.displayname.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_ARTIST)
    }

    fn is_displayable(&self, feed: Feed) -> bool {
        if !self.primaryimageurl.contains("https://") {
            return false;
        }
        if self.title.is_empty() {
            return false;
        }
        !(feed == Feed::Random && self.title == PLACEHOLDER_TITLE)
    }
}

impl Page {
    /// Drop records that cannot be shown, keeping `info` as received.
    #[must_use]
    pub fn filtered(self, feed: Feed) -> Self {
        Self {
            info: self.info,
            records: filter_records(self.records, feed),
        }
    }
}

/// Keep only records with a secure primary image and a real title.
pub fn filter_records(records: Vec<Artwork>, feed: Feed) -> Vec<Artwork> {
    records
        .into_iter()
        .filter(|a| a.is_displayable(feed))
        .collect()
}

/// Treat `Some("")` like `None`; the catalog uses both for missing text.
#[must_use]
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
