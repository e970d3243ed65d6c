//! Segment-based route patterns.
//!
//! A pattern such as `/video/:id` is parsed once, at registration, into an
//! ordered list of [`Segment`]s. Matching a path is then a positional
//! comparison:
//!
//! - Split the path by `/`, dropping empty segments (so `/a/`, `//a` and
//!   `/a` are the same path)
//! - Segment counts must be equal
//! - Literal segments must be equal
//! - `:name` segments capture the path segment verbatim into [`RouteParams`]
//!
//! No regex, no wildcards, no type coercion, no decoding.

use crate::error::RouteError;
use crate::params::RouteParams;
use std::fmt;

/// One position in a [`RoutePattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the path segment exactly.
    Literal(String),
    /// Matches any path segment and records it under this name.
    Capture(String),
}

/// A parsed route template.
///
/// # Examples
///
/// ```
/// use vidshare_navigator::matching::RoutePattern;
///
/// let pattern = RoutePattern::parse("/video/:id").unwrap();
/// let params = pattern.match_path("/video/42").unwrap();
/// assert_eq!(params.get("id"), Some(&"42".to_string()));
///
/// assert!(pattern.match_path("/video").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse and validate a pattern.
    ///
    /// Rules: non-empty, starts with `/`, no empty interior segment, and no
    /// unnamed capture. A single trailing slash is tolerated and `/` is the
    /// zero-segment root pattern.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        if raw.is_empty() {
            return Err(RouteError::EmptyPattern);
        }
        if !raw.starts_with('/') {
            return Err(RouteError::MissingLeadingSlash {
                pattern: raw.to_string(),
            });
        }

        let body = &raw[1..];
        let body = body.strip_suffix('/').unwrap_or(body);
        if body.is_empty() {
            if raw.len() > 1 {
                // "//"
                return Err(RouteError::EmptySegment {
                    pattern: raw.to_string(),
                });
            }
            return Ok(Self {
                raw: raw.to_string(),
                segments: Vec::new(),
            });
        }

        let mut segments = Vec::new();
        for (index, part) in body.split('/').enumerate() {
            if part.is_empty() {
                return Err(RouteError::EmptySegment {
                    pattern: raw.to_string(),
                });
            }
            match extract_param_name(part) {
                Some("") => {
                    return Err(RouteError::UnnamedCapture {
                        pattern: raw.to_string(),
                        index,
                    })
                }
                Some(name) => segments.push(Segment::Capture(name.to_string())),
                None => segments.push(Segment::Literal(part.to_string())),
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The pattern exactly as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments a matching path must have.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// `true` for the root pattern `/`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// `true` if the pattern has no capture segments.
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Names of the capture segments, in order.
    pub fn capture_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Capture(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match an already-split path.
    pub fn match_segments(&self, path_segments: &[&str]) -> Option<RouteParams> {
        if path_segments.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, value) in self.segments.iter().zip(path_segments) {
            match segment {
                Segment::Literal(literal) if literal == value => {}
                Segment::Literal(_) => return None,
                Segment::Capture(name) => params.insert(name.clone(), (*value).to_string()),
            }
        }
        Some(params)
    }

    /// Match a path (query and fragment must already be stripped).
    pub fn match_path(&self, path: &str) -> Option<RouteParams> {
        self.match_segments(&split_path(path))
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split a path into segments, filtering empty segments
///
/// # Examples
///
/// ```
/// use vidshare_navigator::matching::split_path;
///
/// assert_eq!(split_path("/video/123"), vec!["video", "123"]);
/// assert_eq!(split_path("//video/"), vec!["video"]);
/// assert!(split_path("/").is_empty());
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Split `path?query#fragment` into the path part and the raw query.
///
/// ```
/// use vidshare_navigator::matching::strip_query;
///
/// assert_eq!(strip_query("/?search=cats"), ("/", Some("search=cats")));
/// assert_eq!(strip_query("/video/1#t=30"), ("/video/1", None));
/// ```
pub fn strip_query(path: &str) -> (&str, Option<&str>) {
    let path = path.split_once('#').map_or(path, |(p, _)| p);
    match path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path, None),
    }
}

/// Extract parameter name from a route segment
///
/// ```
/// use vidshare_navigator::matching::extract_param_name;
///
/// assert_eq!(extract_param_name(":id"), Some("id"));
/// assert_eq!(extract_param_name("video"), None);
/// ```
pub fn extract_param_name(segment: &str) -> Option<&str> {
    segment.strip_prefix(':')
}
