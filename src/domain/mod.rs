pub mod channel;
pub mod entry;

pub use channel::{Channel, MediaType};
pub use entry::{compute_delta, Delta, Entry};
