pub mod fetch;
pub mod filter;
pub mod newsroom;
pub mod sources;

pub use fetch::FeedFetcher;
pub use filter::KeywordFilter;
pub use newsroom::{Newsroom, RunReport};
pub use sources::{default_sources, FeedSource};

pub mod prelude {
    pub use super::{default_sources, FeedFetcher, FeedSource, KeywordFilter, Newsroom};
    pub use jt_core::{Article, Error, Result};
}
