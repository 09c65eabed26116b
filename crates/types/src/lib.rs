pub mod ids;

pub use ids::{CacheKey, LayoutId, NodeId};
