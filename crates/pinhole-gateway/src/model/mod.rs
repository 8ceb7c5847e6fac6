pub mod url;

pub use url::ShortenForm;
