pub mod expand;
pub mod search;
