//! Link edges and role-filtered traversal.
//!
//! The same iterator walks forward links (`linkedWorkItems`) and back links
//! (`linkedWorkItemsDerived`); only the wrapped raw collection differs.

use std::iter::FusedIterator;

use serde::Serialize;
use tracker_types::models::RawLink;

/// Role reported for edges stored without a role.
pub const UNSPECIFIED_ROLE: &str = "NA";

/// Prefix that turns a filter token into an exclusion.
pub const NEGATION_MARKER: char = '~';

/// One relationship to another record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LinkEdge {
    pub role: String,
    /// URI of the related record
    pub target: String,
}

impl LinkEdge {
    pub fn new(role: impl Into<String>, target: impl Into<String>) -> Self {
        Self { role: role.into(), target: target.into() }
    }

    fn from_raw(raw: &RawLink) -> Self {
        let role = raw.role.as_ref().map_or(UNSPECIFIED_ROLE, |r| r.id.as_str());
        Self::new(role, raw.work_item_uri.as_str())
    }
}

/// Include/exclude predicate over link roles.
///
/// Plain tokens allow a role, `~`-prefixed tokens deny it. An empty list on
/// either side places no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleFilter {
    allowed: Vec<String>,
    denied: Vec<String>,
}

impl RoleFilter {
    /// Filter that lets every edge through.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::default();
        for token in tokens {
            let token = token.as_ref();
            match token.strip_prefix(NEGATION_MARKER) {
                Some(role) => filter.denied.push(role.to_string()),
                None => filter.allowed.push(token.to_string()),
            }
        }
        filter
    }

    #[must_use]
    pub fn allow(mut self, role: impl Into<String>) -> Self {
        self.allowed.push(role.into());
        self
    }

    #[must_use]
    pub fn deny(mut self, role: impl Into<String>) -> Self {
        self.denied.push(role.into());
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.allowed.is_empty() && self.denied.is_empty()
    }

    pub fn matches(&self, role: &str) -> bool {
        let not_denied = self.denied.is_empty() || !self.denied.iter().any(|r| r == role);
        let allowed = self.allowed.is_empty() || self.allowed.iter().any(|r| r == role);
        not_denied && allowed
    }
}

impl From<&str> for RoleFilter {
    fn from(token: &str) -> Self {
        Self::new([token])
    }
}

impl From<String> for RoleFilter {
    fn from(token: String) -> Self {
        Self::new([token])
    }
}

impl From<&[&str]> for RoleFilter {
    fn from(tokens: &[&str]) -> Self {
        Self::new(tokens)
    }
}

impl<const N: usize> From<[&str; N]> for RoleFilter {
    fn from(tokens: [&str; N]) -> Self {
        Self::new(tokens)
    }
}

impl From<Vec<&str>> for RoleFilter {
    fn from(tokens: Vec<&str>) -> Self {
        Self::new(tokens)
    }
}

impl From<Vec<String>> for RoleFilter {
    fn from(tokens: Vec<String>) -> Self {
        Self::new(tokens)
    }
}

impl<T: Into<RoleFilter>> From<Option<T>> for RoleFilter {
    fn from(tokens: Option<T>) -> Self {
        tokens.map_or_else(Self::any, Into::into)
    }
}

/// Lazy, single-pass sequence of [`LinkEdge`]s passing a [`RoleFilter`].
///
/// Preserves the raw order and does not deduplicate. An absent raw collection
/// yields nothing.
#[derive(Debug, Clone)]
pub struct LinkedEdges<'a> {
    raw: Option<&'a [RawLink]>,
    cursor: usize,
    filter: RoleFilter,
}

impl<'a> LinkedEdges<'a> {
    pub fn new(raw: Option<&'a [RawLink]>, filter: impl Into<RoleFilter>) -> Self {
        Self { raw, cursor: 0, filter: filter.into() }
    }

    pub fn filter(&self) -> &RoleFilter {
        &self.filter
    }
}

impl Iterator for LinkedEdges<'_> {
    type Item = LinkEdge;

    fn next(&mut self) -> Option<LinkEdge> {
        let raw = self.raw?;
        while let Some(link) = raw.get(self.cursor) {
            self.cursor += 1;
            let edge = LinkEdge::from_raw(link);
            if self.filter.matches(&edge.role) {
                return Some(edge);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.raw.map_or(0, |raw| raw.len().saturating_sub(self.cursor));
        (0, Some(remaining))
    }
}

impl FusedIterator for LinkedEdges<'_> {}
