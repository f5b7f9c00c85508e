//! URL modeling and file name derivation.
//!
//! A URL is percent-decoded, parsed, and the last segment of its path becomes
//! the local file name. The suffix after the last `.` is the extension.

mod path;

pub use path::{extension_of, file_name_from_path};

use crate::fetch::FetchError;
use percent_encoding::percent_decode_str;

/// Local name and extension derived from a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTarget {
    pub file_name: String,
    pub extension: String,
}

impl UrlTarget {
    /// Derives the target from `url`.
    ///
    /// The URL is percent-decoded once, and the name is the last segment of
    /// the decoded path, so `%2F` acts as a separator and `%20` becomes a
    /// space. Parsing only validates the URL and resolves dot segments. Fails
    /// with `EmptyFileName` when the path has no final segment, before
    /// anything touches the filesystem.
    ///
    /// # Examples
    ///
    /// - `https://host/a/b/report.PDF` → `report.PDF`, `PDF`
    /// - `https://host/a/b/README` → `README`, `""`
    /// - `https://host/r%C3%A9sum%C3%A9.pdf` → `résumé.pdf`, `pdf`
    pub fn from_url(url: &str) -> Result<Self, FetchError> {
        let decoded = percent_decode_str(url).decode_utf8_lossy();
        let parsed = url::Url::parse(&decoded).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let empty = || FetchError::EmptyFileName {
            url: url.to_string(),
        };

        // The parser re-encodes its path, so it only decides whether a
        // final segment exists. The name itself comes from the decoded text.
        if file_name_from_path(parsed.path()).is_empty() {
            return Err(empty());
        }
        let file_name = file_name_from_path(strip_query_and_fragment(&decoded));
        if file_name.is_empty() || file_name == "." || file_name == ".." {
            return Err(empty());
        }

        Ok(UrlTarget {
            file_name: file_name.to_string(),
            extension: extension_of(file_name).to_string(),
        })
    }
}

/// Everything before the first `?` or `#`.
fn strip_query_and_fragment(url: &str) -> &str {
    match url.find(['?', '#']) {
        Some(i) => &url[..i],
        None => url,
    }
}
