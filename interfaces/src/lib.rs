pub mod defs;
pub mod state;

pub use defs::{FeedSource, NewsItem, SectorCatalog, SectorDefinition};
pub use state::{FilterAction, FilterState};
