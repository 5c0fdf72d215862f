use std::borrow::Borrow;
use std::fmt::{Display, Formatter};

use serde::Deserialize;
use smol_str::SmolStr;

/// An identifier = a type-safe wrapper around [SmolStr].
///
/// Short names (which most identifiers are) are stored inline, so cloning a name into every
/// table that mentions it is cheap.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Name(SmolStr);

impl Name {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    pub const fn new_inline(name: &'static str) -> Self {
        Self(SmolStr::new_inline(name))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Lets maps keyed by [Name] be queried with a plain `&str`
impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<'a> PartialEq<&'a str> for Name {
    fn eq(&self, other: &&'a str) -> bool {
        self.as_str() == *other
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&Name> for Name {
    fn from(name: &Name) -> Self {
        name.clone()
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Collects anything name-like into a list of names, e.g. a scope path given as string slices
pub fn names<N: Into<Name>>(names: impl IntoIterator<Item = N>) -> Vec<Name> {
    names.into_iter().map(Into::into).collect()
}
