//! Endpoint templates
//!
//! Paths such as `/api/news/news/{id}/` with `{name}` placeholders filled from
//! request params.

use crate::error::{FetchError, FetchResult};
use regex::Regex;
use reqwest::Url;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid"))
}

/// Path template of a backend resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointTemplate(String);

impl EndpointTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Names of the placeholders, in order of appearance
    pub fn placeholders(&self) -> Vec<&str> {
        placeholder_regex()
            .captures_iter(&self.0)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// Fill placeholders from `params`.
    ///
    /// Returns the path and the names of params that were consumed by it.
    pub fn expand(&self, params: &BTreeMap<String, String>) -> FetchResult<(String, BTreeSet<String>)> {
        let mut used = BTreeSet::new();
        let mut path = String::with_capacity(self.0.len());
        let mut last = 0;

        for caps in placeholder_regex().captures_iter(&self.0) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = params.get(name.as_str()).ok_or_else(|| {
                FetchError::InvalidRequest(format!("missing value for {{{}}} in {}", name.as_str(), self.0))
            })?;
            if !is_segment(value) {
                return Err(FetchError::InvalidRequest(format!(
                    "'{}' is not a valid value for {{{}}}",
                    value,
                    name.as_str()
                )));
            }

            path.push_str(&self.0[last..whole.start()]);
            path.push_str(&encode_segment(value)?);
            last = whole.end();
            used.insert(name.as_str().to_string());
        }
        path.push_str(&self.0[last..]);

        Ok((path, used))
    }
}

impl fmt::Display for EndpointTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EndpointTemplate {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One non-empty path segment that cannot climb out of the template
fn is_segment(value: &str) -> bool {
    !value.trim().is_empty() && value != "." && value != ".." && !value.contains(['/', '\\'])
}

/// Percent-encode a value as a single path segment
fn encode_segment(value: &str) -> FetchResult<String> {
    let invalid = || FetchError::InvalidRequest(format!("cannot encode '{}'", value));
    let mut url = Url::parse("http://segment.invalid/").map_err(|_| invalid())?;
    url.path_segments_mut().map_err(|_| invalid())?.clear().push(value);
    Ok(url.path().trim_start_matches('/').to_string())
}
