pub mod traits;
pub mod sqlite;

pub use traits::ChannelStore;
pub use sqlite::{SqliteChannelStore, SqliteStorage};
