use serde::Deserialize;

/// Form submitted to `/shorten/`, either as a query string or a urlencoded body.
#[derive(Debug, Default, Deserialize)]
pub struct ShortenForm {
    #[serde(default)]
    pub url: String,
}
