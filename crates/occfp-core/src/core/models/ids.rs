use std::fmt;

/// Identifier of a binding site within a [`Grid`](crate::workflows::grid::Grid).
///
/// Ids are handed out sequentially from zero in insertion order and are never
/// reused, so the id doubles as the site's position in the fingerprint layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SiteId(pub usize);

impl SiteId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for SiteId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "site {}", self.0)
    }
}
