//! Strategy executors, one per route.
//!
//! Each execution is independent; the only state shared between requests is
//! the content of the active namespace.

pub mod cache_first;
pub mod navigation;
pub mod stale_while_revalidate;

pub use cache_first::cache_first;
pub use navigation::{FALLBACK_KEYS, ROOT_KEY, navigation};
pub use stale_while_revalidate::stale_while_revalidate;
