//! Bracket-syntax path segments.

use std::borrow::Cow;

/// One `/`-separated segment of a file-based route path.
///
/// # Examples
///
/// ```
/// use nv_routes::Segment;
///
/// assert_eq!(Segment::parse("[id]"), Segment::Dynamic("id"));
/// assert_eq!(Segment::parse("[...slug]").to_router(), "*");
/// assert_eq!(Segment::parse("[id]").to_router(), ":id");
/// assert_eq!(Segment::parse("about").param(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A literal segment.
    Static(&'a str),
    /// `[name]`
    Dynamic(&'a str),
    /// `[...name]`
    CatchAll(&'a str),
    /// `[[...name]]`
    OptionalCatchAll(&'a str),
}

impl<'a> Segment<'a> {
    /// Classifies a segment. Optional catch-alls are checked before
    /// catch-alls, which are checked before plain parameters.
    #[must_use]
    pub fn parse(segment: &'a str) -> Self {
        if let Some(name) = segment
            .strip_prefix("[[...")
            .and_then(|rest| rest.strip_suffix("]]"))
        {
            Self::OptionalCatchAll(name)
        } else if let Some(name) = segment
            .strip_prefix("[...")
            .and_then(|rest| rest.strip_suffix(']'))
        {
            Self::CatchAll(name)
        } else if let Some(name) = segment
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            Self::Dynamic(name)
        } else {
            Self::Static(segment)
        }
    }

    /// The parameter this segment declares, brackets removed and `...` kept.
    #[must_use]
    pub fn param(self) -> Option<String> {
        match self {
            Self::Static(_) => None,
            Self::Dynamic(name) => Some(name.to_owned()),
            Self::CatchAll(name) | Self::OptionalCatchAll(name) => Some(format!("...{name}")),
        }
    }

    /// The segment in React Router syntax.
    #[must_use]
    pub fn to_router(self) -> Cow<'a, str> {
        match self {
            Self::Static(text) => Cow::Borrowed(text),
            Self::Dynamic(name) => Cow::Owned(format!(":{name}")),
            Self::CatchAll(_) | Self::OptionalCatchAll(_) => Cow::Borrowed("*"),
        }
    }
}

/// Converts a bracket-syntax path to React Router syntax.
///
/// Trailing slashes are stripped and an empty result becomes `/`.
///
/// # Examples
///
/// ```
/// use nv_routes::router_path;
///
/// assert_eq!(router_path("/posts/[id]"), "/posts/:id");
/// assert_eq!(router_path("/shop/[[...filters]]"), "/shop/*");
/// assert_eq!(router_path("/blog/"), "/blog");
/// assert_eq!(router_path(""), "/");
/// ```
#[must_use]
pub fn router_path(path: &str) -> String {
    let converted: Vec<Cow<'_, str>> = path
        .split('/')
        .map(|segment| Segment::parse(segment).to_router())
        .collect();
    let joined = converted.join("/");
    let trimmed = joined.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order() {
        assert_eq!(
            Segment::parse("[[...filters]]"),
            Segment::OptionalCatchAll("filters")
        );
        assert_eq!(Segment::parse("[...slug]"), Segment::CatchAll("slug"));
        assert_eq!(Segment::parse("[id]"), Segment::Dynamic("id"));
        assert_eq!(Segment::parse("posts"), Segment::Static("posts"));
    }

    #[test]
    fn test_params_keep_dots() {
        assert_eq!(Segment::parse("[...slug]").param().as_deref(), Some("...slug"));
        assert_eq!(
            Segment::parse("[[...filters]]").param().as_deref(),
            Some("...filters")
        );
    }

    #[test]
    fn test_router_path_mixed() {
        assert_eq!(router_path("/[team]/docs/[...slug]"), "/:team/docs/*");
        assert_eq!(router_path("/"), "/");
        assert_eq!(router_path("settings"), "settings");
    }
}
