mod connection;
mod channel_store;

pub use connection::SqliteStorage;
pub use channel_store::SqliteChannelStore;
