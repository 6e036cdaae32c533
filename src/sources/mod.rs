pub mod traits;
pub mod rss_atom;
pub mod youtube;

pub use traits::{FeedFetcher, FetchedFeed};
pub use youtube::YouTubeFetcher;
