//! Namespace URIs.

use std::fmt;

/// A namespace URI. Two values are the same namespace when their URIs are
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Xmlns(String);

impl Xmlns {
    pub fn load(namespace: impl Into<String>) -> Self {
        Self(namespace.into())
    }

    /// The namespace bound to the reserved `xml` prefix.
    pub fn xml() -> Self {
        Self::load("http://www.w3.org/XML/1998/namespace")
    }

    /// XML Schema instance, home of `xsi:schemaLocation`.
    pub fn xsd() -> Self {
        Self::load("http://www.w3.org/2001/XMLSchema-instance")
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, other: &Xmlns) -> bool {
        self.0 == other.0
    }
}

impl fmt::Display for Xmlns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Xmlns {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Xmlns> for String {
    fn from(namespace: Xmlns) -> Self {
        namespace.0
    }
}
