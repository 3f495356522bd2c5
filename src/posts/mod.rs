//! Post queries built on a [`ContentSource`](crate::cms::ContentSource)

mod detail;
mod list;

pub use detail::PostDetailResolver;
pub use list::{PostListAggregator, PostsPagination};
