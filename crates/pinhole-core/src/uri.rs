use std::fmt::Display;

/// Separator that prefixes every identifier.
pub const SEPARATOR: char = '/';

/// A short identifier as seen by callers, e.g. `/aZ3kP9qx`.
///
/// The leading separator is always present so the value can be appended
/// directly to a host to build the short link, and compared directly
/// against the path of an inbound request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uri(String);

impl Uri {
    /// Creates a `Uri` from a bare identifier code (without the separator).
    pub fn from_code(code: impl AsRef<str>) -> Self {
        let code = code.as_ref();
        let mut inner = String::with_capacity(code.len() + 1);
        inner.push(SEPARATOR);
        inner.push_str(code);
        Self(inner)
    }

    /// Builds a `Uri` from a request path.
    ///
    /// Only the last path segment is kept, so `/foo/abc` and `abc` both
    /// resolve to `/abc`. Trailing separators are ignored. The root path
    /// yields `/`, which never matches a generated identifier.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim_end_matches(SEPARATOR);
        let code = trimmed
            .rsplit(SEPARATOR)
            .next()
            .unwrap_or_default();
        Self::from_code(code)
    }

    /// Returns the identifier code without the leading separator.
    pub fn code(&self) -> &str {
        &self.0[SEPARATOR.len_utf8()..]
    }

    /// Returns the full identifier, separator included.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the identifier as raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches(SEPARATOR), self.0)
    }
}

impl Display for Uri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Uri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
