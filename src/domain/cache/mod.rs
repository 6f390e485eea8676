//! Cache domain - canonical keys and shared results

mod key;
mod shared;

pub use key::{availability_key, normalize, QueryKey};
pub use shared::{share, SharedResult};
