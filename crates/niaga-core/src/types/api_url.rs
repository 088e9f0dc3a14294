//! API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated base URL for the backing API.
///
/// Network URLs (`http://`, `https://`) select the HTTP backend. File URLs
/// (`file:///path/to/store`) select the local filesystem backend, which
/// enables offline development and testing without a server.
///
/// # Example
///
/// ```
/// use niaga_core::ApiUrl;
///
/// let api = ApiUrl::new("http://127.0.0.1:8000/api").unwrap();
/// assert_eq!(api.endpoint("/auth/login"),
///            "http://127.0.0.1:8000/api/auth/login");
///
/// let local = ApiUrl::new("file:///tmp/pos-store").unwrap();
/// assert!(local.is_local());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Create a new API URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse, uses an unsupported
    /// scheme, or lacks a host for a network scheme.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ApiUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        // Normalize: a bare origin parses with path "/", which would double
        // the slash when joining endpoint paths.
        let normalized = if url.path() == "/" {
            let mut u = url.clone();
            u.set_path("");
            u
        } else {
            url
        };

        Ok(Self(normalized))
    }

    /// Returns the full URL for an endpoint path (which must start with `/`).
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}{}", base, path)
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the URL scheme (e.g. "https", "http", "file").
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// Returns true if this selects the local filesystem backend.
    pub fn is_local(&self) -> bool {
        self.0.scheme() == "file"
    }

    /// Returns true if this selects the network backend.
    pub fn is_network(&self) -> bool {
        let scheme = self.0.scheme();
        scheme == "http" || scheme == "https"
    }

    /// Returns the filesystem path for `file://` URLs, `None` otherwise.
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.is_local() {
            self.0.to_file_path().ok()
        } else {
            None
        }
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        match url.scheme() {
            "http" | "https" => {
                if url.host_str().is_none() {
                    return Err(InvalidInputError::ApiUrl {
                        value: original.to_string(),
                        reason: "missing host".to_string(),
                    }
                    .into());
                }
            }
            "file" => {}
            other => {
                return Err(InvalidInputError::ApiUrl {
                    value: original.to_string(),
                    reason: format!("unsupported scheme '{}'", other),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let api = ApiUrl::new("http://127.0.0.1:8000/api/").unwrap();
        assert_eq!(
            api.endpoint("/auth/csrf-token"),
            "http://127.0.0.1:8000/api/auth/csrf-token"
        );

        let bare = ApiUrl::new("https://pos.example.com").unwrap();
        assert_eq!(
            bare.endpoint("/auth/login"),
            "https://pos.example.com/auth/login"
        );
    }

    #[test]
    fn file_urls_are_local() {
        let api = ApiUrl::new("file:///var/lib/pos-store").unwrap();
        assert!(api.is_local());
        assert!(!api.is_network());
        assert_eq!(
            api.to_file_path().unwrap(),
            PathBuf::from("/var/lib/pos-store")
        );
    }

    #[test]
    fn rejects_unsupported_schemes() {
        assert!(ApiUrl::new("ftp://example.com").is_err());
        assert!(ApiUrl::new("not a url").is_err());
    }
}
