use std::fmt::{Display, Formatter};
use std::num::NonZeroUsize;
use std::str::FromStr;

use nonempty::NonEmpty;
use serde::Deserialize;
use thiserror::Error;

use crate::names::Name;

/// A path expression like `crate::a::b`, `super::x` or `a::b`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    pub root: RootKind,
    pub segments: NonEmpty<Name>,
}

/// Where resolution of a [Path]'s first segment starts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RootKind {
    /// From the tree root (`crate::`)
    Absolute,
    /// From the scope which wrote the path (`self::`, or no prefix)
    RelativeSelf,
    /// From the `n`th parent of the scope which wrote the path (`super::` repeated `n` times)
    RelativeSuper(NonZeroUsize),
    /// From the root of another tree (`::name::`)
    ExternalRoot(Name),
}

/// Keywords and separator of the textual path form
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PathSyntax {
    pub separator: String,
    pub root_keyword: String,
    pub self_keyword: String,
    pub super_keyword: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathParseError {
    #[error("empty path")]
    Empty,
    #[error("empty segment in path `{path}`")]
    EmptySegment { path: String },
    #[error("`{keyword}` can only appear at the start of a path (in `{path}`)")]
    MisplacedKeyword { keyword: String, path: String },
    #[error("path `{path}` doesn't name anything after its prefix")]
    NoNamedSegment { path: String },
}

impl Path {
    pub fn new(root: RootKind, segments: NonEmpty<Name>) -> Self {
        Self { root, segments }
    }

    /// `crate::<segments>`. Returns `None` if `segments` is empty
    pub fn absolute<N: Into<Name>>(segments: impl IntoIterator<Item = N>) -> Option<Self> {
        Self::from_segments(RootKind::Absolute, segments)
    }

    /// `self::<segments>`. Returns `None` if `segments` is empty
    pub fn relative<N: Into<Name>>(segments: impl IntoIterator<Item = N>) -> Option<Self> {
        Self::from_segments(RootKind::RelativeSelf, segments)
    }

    /// `super::...::<segments>`. Returns `None` if `segments` is empty
    pub fn super_relative<N: Into<Name>>(
        levels: NonZeroUsize,
        segments: impl IntoIterator<Item = N>
    ) -> Option<Self> {
        Self::from_segments(RootKind::RelativeSuper(levels), segments)
    }

    /// A single name, relative to the current scope
    pub fn single(name: impl Into<Name>) -> Self {
        Self::new(RootKind::RelativeSelf, NonEmpty::new(name.into()))
    }

    fn from_segments<N: Into<Name>>(root: RootKind, segments: impl IntoIterator<Item = N>) -> Option<Self> {
        let segments = NonEmpty::from_vec(segments.into_iter().map(Into::into).collect())?;
        Some(Self::new(root, segments))
    }

    /// The name the path resolves to the declaration of, and the default import alias
    pub fn last(&self) -> &Name {
        self.segments.last()
    }

    /// All segments except the last
    pub fn prefix(&self) -> impl Iterator<Item = &Name> + '_ {
        self.segments.iter().take(self.segments.len() - 1)
    }

    /// Parse using the given keywords and separator
    pub fn parse(path: &str, syntax: &PathSyntax) -> Result<Self, PathParseError> {
        if path.trim().is_empty() {
            return Err(PathParseError::Empty);
        }
        let external = path.strip_prefix(syntax.separator.as_str());
        let mut raw = external.unwrap_or(path).split(syntax.separator.as_str()).map(str::trim).peekable();
        let root = if external.is_some() {
            let crate_name = raw.next().unwrap_or_default();
            RootKind::ExternalRoot(syntax.check_segment(crate_name, path)?)
        } else if raw.next_if_eq(&syntax.root_keyword.as_str()).is_some() {
            RootKind::Absolute
        } else if raw.next_if_eq(&syntax.self_keyword.as_str()).is_some() {
            RootKind::RelativeSelf
        } else {
            let mut levels = 0;
            while raw.next_if_eq(&syntax.super_keyword.as_str()).is_some() {
                levels += 1;
            }
            NonZeroUsize::new(levels).map_or(RootKind::RelativeSelf, RootKind::RelativeSuper)
        };
        let segments = raw
            .map(|segment| syntax.check_segment(segment, path))
            .collect::<Result<Vec<_>, _>>()?;
        let segments = NonEmpty::from_vec(segments)
            .ok_or_else(|| PathParseError::NoNamedSegment { path: path.to_string() })?;
        Ok(Self { root, segments })
    }

    /// Display using the given keywords and separator
    pub fn display<'a>(&'a self, syntax: &'a PathSyntax) -> DisplayPath<'a> {
        DisplayPath { path: self, syntax }
    }
}

/// Parse using [PathSyntax::default]
impl FromStr for Path {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, &PathSyntax::default())
    }
}

/// Display using [PathSyntax::default]
impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.display(&PathSyntax::default()), f)
    }
}

/// A path displayed with specific syntax
#[derive(Debug, Clone, Copy)]
pub struct DisplayPath<'a> {
    path: &'a Path,
    syntax: &'a PathSyntax,
}

impl<'a> Display for DisplayPath<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let PathSyntax { separator, root_keyword, super_keyword, .. } = self.syntax;
        match &self.path.root {
            RootKind::Absolute => write!(f, "{}{}", root_keyword, separator)?,
            RootKind::RelativeSelf => {}
            RootKind::RelativeSuper(levels) => {
                for _ in 0..levels.get() {
                    write!(f, "{}{}", super_keyword, separator)?;
                }
            }
            RootKind::ExternalRoot(name) => write!(f, "{}{}{}", separator, name, separator)?,
        }
        for (i, segment) in self.path.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", separator)?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl PathSyntax {
    fn is_keyword(&self, segment: &str) -> bool {
        segment == self.root_keyword || segment == self.self_keyword || segment == self.super_keyword
    }

    fn check_segment(&self, segment: &str, path: &str) -> Result<Name, PathParseError> {
        if segment.is_empty() {
            Err(PathParseError::EmptySegment { path: path.to_string() })
        } else if self.is_keyword(segment) {
            Err(PathParseError::MisplacedKeyword { keyword: segment.to_string(), path: path.to_string() })
        } else {
            Ok(Name::new(segment))
        }
    }
}

impl Default for PathSyntax {
    fn default() -> Self {
        Self {
            separator: "::".to_string(),
            root_keyword: "crate".to_string(),
            self_keyword: "self".to_string(),
            super_keyword: "super".to_string(),
        }
    }
}
