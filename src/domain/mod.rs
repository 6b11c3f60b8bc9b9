// Domain model: the modification language and the engines that use it

pub mod modifier;
pub mod page_context;
pub mod search_engine;

pub use page_context::PageContext;
pub use search_engine::{SearchEngine, SEARCH_TERMS};
