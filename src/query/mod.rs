pub(crate) mod autocomplete;
pub mod builder;
pub mod cursor;

pub use builder::SearchRequest;
pub use cursor::SearchCursor;
