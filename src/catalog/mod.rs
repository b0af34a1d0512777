//! Static university and scholarship catalog.

pub mod domain;
pub mod source;
pub mod store;

pub use domain::{
    ApplicationTracking, CatalogStatistics, Scholarship, ScholarshipAmount, TuitionRange,
    University,
};
pub use source::{CatalogSource, DataFile, DirectorySource, SourceError, StaticSource};
pub use store::{CatalogError, CatalogStore, DEFAULT_FEATURED_LIMIT};
