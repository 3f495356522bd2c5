//! Content module - view models and the mapping from CMS documents

pub mod mapper;
mod post;
pub mod rich_text;

pub use mapper::{detail_from_document, nav_link_from_document, summary_from_document};
pub use post::{Banner, ContentSection, NavLink, PostDetail, PostSummary, WORDS_PER_MINUTE};
pub use rich_text::{FragmentKind, RichTextFragment, Span, SpanKind};
