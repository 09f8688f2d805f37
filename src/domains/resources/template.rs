//! URI templates of the form `scheme://literal/{var}/...`.
//!
//! A `{var}` segment matches one or more characters other than `/`. When the
//! variable is the last segment it takes the rest of the URI, slashes
//! included, so identifiers with unusual characters still route.

use std::collections::HashMap;
use std::fmt;

use super::error::ResourceError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Var(String),
}

/// A parsed URI template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    raw: String,
    scheme: String,
    segments: Vec<Segment>,
}

impl UriTemplate {
    pub fn parse(raw: &str) -> Result<Self, ResourceError> {
        let invalid = |reason: &str| ResourceError::InvalidTemplate {
            template: raw.to_string(),
            reason: reason.to_string(),
        };

        let (scheme, path) = raw.split_once("://").ok_or_else(|| invalid("missing '://'"))?;
        if scheme.is_empty() || scheme.contains(['{', '}', '/']) {
            return Err(invalid("scheme must be a plain word"));
        }
        if path.is_empty() {
            return Err(invalid("empty path"));
        }

        let mut segments = Vec::new();
        let mut names = Vec::new();
        for part in path.split('/') {
            if part.is_empty() {
                return Err(invalid("empty segment"));
            }
            match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                Some(name) => {
                    if name.is_empty()
                        || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                    {
                        return Err(invalid("variable names are letters, digits and '_'"));
                    }
                    if names.contains(&name) {
                        return Err(invalid("variable used twice"));
                    }
                    names.push(name);
                    segments.push(Segment::Var(name.to_string()));
                }
                None if part.contains(['{', '}']) => {
                    return Err(invalid("a variable must fill its whole segment"));
                }
                None => segments.push(Segment::Literal(part.to_string())),
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            scheme: scheme.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the template has no variables, i.e. names one fixed URI.
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Var(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Ranking used when several templates match one URI: more segments
    /// first, then more literal segments.
    pub(crate) fn specificity(&self) -> (usize, usize) {
        let literals = self
            .segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count();
        (self.segments.len(), literals)
    }

    /// Two templates with the same shape match exactly the same URIs.
    pub(crate) fn same_shape(&self, other: &Self) -> bool {
        self.scheme == other.scheme
            && self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Literal(a), Segment::Literal(b)) => a == b,
                    (Segment::Var(_), Segment::Var(_)) => true,
                    _ => false,
                })
    }

    /// Match `uri`, returning the path variables on success.
    pub fn matches(&self, uri: &str) -> Option<PathVars> {
        let (scheme, mut rest) = uri.split_once("://")?;
        if scheme != self.scheme {
            return None;
        }

        let mut vars = HashMap::new();
        let last = self.segments.len() - 1;
        for (i, segment) in self.segments.iter().enumerate() {
            let part = if i == last {
                std::mem::take(&mut rest)
            } else {
                let (part, tail) = rest.split_once('/')?;
                rest = tail;
                part
            };

            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Var(_) if part.is_empty() => return None,
                Segment::Var(name) => {
                    vars.insert(name.clone(), part.to_string());
                }
            }
        }

        Some(PathVars { values: vars })
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Variables captured from a matched URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathVars {
    values: HashMap<String, String>,
}

impl PathVars {
    pub fn get(&self, name: &str) -> Result<&str, ResourceError> {
        self.values
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ResourceError::internal(format!("path variable '{}' is not declared", name)))
    }

    /// A variable used as an API path segment. `None` for `.` and `..`.
    pub fn segment(&self, name: &str) -> Result<Option<&str>, ResourceError> {
        let value = self.get(name)?;
        Ok((!matches!(value, "." | "..")).then_some(value))
    }

    /// Parse a numeric variable. `None` when the text is not an integer.
    pub fn integer(&self, name: &str) -> Result<Option<i64>, ResourceError> {
        Ok(self.get(name)?.parse().ok())
    }
}
