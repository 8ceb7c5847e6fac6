pub mod host;
pub mod url;

pub use url::{expand_handler, shorten_get_handler, shorten_post_handler};
