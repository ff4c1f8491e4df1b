//! Hacklist is a small directory of hackathon events and developer profiles
//! backed by static data.
//!
//! The interesting part is the listing logic: records are filtered by a set of
//! [`Criteria`], optionally [`sort`]ed, and sliced into pages with
//! [`paginate`]. All of these are pure functions over borrowed records. For the
//! command line interface, see the `hacklist-cli` crate.

mod collection;
mod config;
mod datetime;
mod directory;
mod error;
mod filter;
mod fs;
mod listing;
mod paginate;
mod record;
mod sort;
mod source;
mod value;

pub use collection::Collection;
pub use config::{CollectionConfig, Config};
pub use datetime::Date;
pub use directory::{CollectionKind, Directory};
pub use error::Error;
pub use filter::{filter, Criteria, Selector};
pub use fs::maybe_canonicalize;
pub use listing::Query;
pub use paginate::{page_links, paginate, total_pages, Page, PageLink, PageWindow};
pub use record::Record;
pub use sort::{sort, SortKey, SortOrder};
pub use source::{Source, SourceIter};
pub use value::{Fixed, Map, SupportedFormat, Value, ValueType};
