//! Import statement types and the framework modules they may refer to.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::location::SourceLocation;

/// The kind of import statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ImportKind {
    /// Named imports: `import { useRouter } from 'next/router'`
    Named,

    /// Default import: `import Link from 'next/link'`
    Default,

    /// Namespace import: `import * as fs from 'fs'`
    Namespace,

    /// Side-effect import: `import '../styles/globals.css'`
    SideEffect,

    /// Type-only import: `import type { NextPage } from 'next'`
    TypeOnly,
}

impl ImportKind {
    /// Returns `true` if this import brings names into scope.
    #[inline]
    #[must_use]
    pub const fn has_bindings(self) -> bool {
        !matches!(self, Self::SideEffect)
    }

    /// Returns `true` if this is a type-only import.
    #[inline]
    #[must_use]
    pub const fn is_type_only(self) -> bool {
        matches!(self, Self::TypeOnly)
    }
}

/// A framework or runtime module a source file may import.
///
/// # Examples
///
/// ```
/// use nv_core::FrameworkModule;
///
/// assert_eq!(FrameworkModule::NextLink.replacement_package(), Some("react-router-dom"));
/// assert!(FrameworkModule::NodeBuiltin.is_server_only());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FrameworkModule {
    /// `next/router`
    NextRouter,
    /// `next/navigation`
    NextNavigation,
    /// `next/link`
    NextLink,
    /// `next/image`
    NextImage,
    /// `next/head`
    NextHead,
    /// `next/script`
    NextScript,
    /// `next/dynamic`
    NextDynamic,
    /// `next/server`
    NextServer,
    /// `next/config`
    NextConfig,
    /// `next/app`
    NextApp,
    /// `next/document`
    NextDocument,
    /// The bare `next` package (types such as `NextPage`).
    Next,
    /// A Node.js builtin (`fs`, `node:path`, ...).
    NodeBuiltin,
}

impl FrameworkModule {
    /// Returns `true` for modules only usable in a server runtime.
    #[inline]
    #[must_use]
    pub const fn is_server_only(self) -> bool {
        matches!(self, Self::NextServer | Self::NextDocument | Self::NodeBuiltin)
    }

    /// Returns `true` for modules published by the `next` package.
    #[inline]
    #[must_use]
    pub const fn is_next(self) -> bool {
        !matches!(self, Self::NodeBuiltin)
    }

    /// The package that replaces this module after migration, if any.
    #[must_use]
    pub const fn replacement_package(self) -> Option<&'static str> {
        match self {
            Self::NextRouter | Self::NextNavigation | Self::NextLink => Some("react-router-dom"),
            Self::NextImage => Some("@unpic/react"),
            Self::NextHead => Some("react-helmet-async"),
            _ => None,
        }
    }
}

/// An import statement found in a source file.
///
/// # Examples
///
/// ```
/// use nv_core::{FrameworkModule, ImportInfo, ImportKind, SourceLocation};
/// use smallvec::smallvec;
///
/// let import = ImportInfo {
///     path: "next/link".to_owned(),
///     kind: ImportKind::Default,
///     names: smallvec!["NextLink".to_owned()],
///     module: Some(FrameworkModule::NextLink),
///     location: SourceLocation::new(1, 0, 0),
/// };
/// assert!(import.binds("NextLink"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportInfo {
    /// The module specifier without quotes (`next/link`).
    pub path: String,

    /// The kind of import statement.
    pub kind: ImportKind,

    /// Local binding names introduced by the import.
    ///
    /// For aliased named imports (`{ a as b }`) this is the alias.
    pub names: SmallVec<[String; 4]>,

    /// The framework module, if the specifier is a known one.
    pub module: Option<FrameworkModule>,

    /// Where the statement starts.
    pub location: SourceLocation,
}

impl ImportInfo {
    /// Returns `true` if the import introduces the local binding `name`.
    #[must_use]
    pub fn binds(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_kind_bindings() {
        assert!(ImportKind::Named.has_bindings());
        assert!(!ImportKind::SideEffect.has_bindings());
        assert!(ImportKind::TypeOnly.is_type_only());
    }

    #[test]
    fn test_replacement_packages() {
        assert_eq!(
            FrameworkModule::NextImage.replacement_package(),
            Some("@unpic/react")
        );
        assert_eq!(
            FrameworkModule::NextHead.replacement_package(),
            Some("react-helmet-async")
        );
        assert_eq!(FrameworkModule::NextConfig.replacement_package(), None);
    }

    #[test]
    fn test_server_only_modules() {
        assert!(FrameworkModule::NextServer.is_server_only());
        assert!(!FrameworkModule::NextRouter.is_server_only());
        assert!(!FrameworkModule::NodeBuiltin.is_next());
    }
}
