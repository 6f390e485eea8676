//! Cache infrastructure - Cache implementations

mod in_memory;

pub(crate) use in_memory::deadline_after;
pub use in_memory::{InMemoryQueryCache, QueryCacheConfig};
