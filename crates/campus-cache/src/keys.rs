//! Cache key construction: prefix registry and canonical key builders.
//!
//! Keys come in two shapes:
//! - point keys, `prefix:id`, for single-resource lookups;
//! - collection keys, `prefix:path?canonical-query`, for listings.
//!
//! Each service owns the prefixes it mints keys under and must never write
//! outside its own namespace; the registry below is the complete set.

use std::fmt::Display;

/// Logical key-space prefixes, one per resource type.
///
/// Point prefixes (`course`) are deliberately distinct from collection
/// prefixes (`courses`) so that a `courses:*` sweep can never remove
/// `course:<id>` point entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachePrefix {
    /// Single course detail.
    Course,
    /// Course listings.
    Courses,
    /// Single package detail.
    Package,
    /// Courses bundled into a package.
    PackageCourses,
    /// Assignment listings.
    Assignments,
    /// Session data.
    Session,
    /// User profile data.
    User,
    /// Decoded JWT claims, keyed by raw token.
    Jwt,
    /// Revoked tokens, keyed by raw token.
    Revoked,
}

impl CachePrefix {
    /// Returns the literal prefix string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Courses => "courses",
            Self::Package => "package",
            Self::PackageCourses => "package-courses",
            Self::Assignments => "assignments",
            Self::Session => "session",
            Self::User => "user",
            Self::Jwt => "jwt",
            Self::Revoked => "revoked",
        }
    }

    /// Returns the invalidation pattern covering every key in this prefix.
    #[must_use]
    pub fn pattern(&self) -> String {
        format!("{}:*", self.as_str())
    }
}

impl Display for CachePrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds a point key for a single resource: `prefix:id`.
#[must_use]
pub fn point_key(prefix: CachePrefix, id: impl Display) -> String {
    format!("{}:{}", prefix.as_str(), id)
}

/// Builds a collection key for a listing request: `prefix:path?canonical`.
///
/// The query string is canonicalized (parameters sorted by name, then value)
/// so that two logically-identical requests always produce the same key
/// regardless of parameter order.
#[must_use]
pub fn collection_key(prefix: CachePrefix, path: &str, query: Option<&str>) -> String {
    match query.and_then(canonical_query) {
        Some(canonical) => format!("{}:{}?{}", prefix.as_str(), path, canonical),
        None => format!("{}:{}", prefix.as_str(), path),
    }
}

/// Canonicalizes a raw query string by sorting its parameters.
///
/// Returns `None` for an empty query. Parameters are compared by name first,
/// then by value, so `a=1&b=2` and `b=2&a=1` canonicalize identically.
/// Values are kept verbatim (no percent-decoding).
#[must_use]
pub fn canonical_query(raw: &str) -> Option<String> {
    let mut pairs: Vec<&str> = raw.split('&').filter(|p| !p.is_empty()).collect();
    if pairs.is_empty() {
        return None;
    }

    pairs.sort_by_key(|p| match p.split_once('=') {
        Some((name, value)) => (name, value),
        None => (*p, ""),
    });

    Some(pairs.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_key() {
        assert_eq!(point_key(CachePrefix::Course, "abc-123"), "course:abc-123");
    }

    #[test]
    fn test_collection_key_without_query() {
        let key = collection_key(CachePrefix::Courses, "/courses", None);
        assert_eq!(key, "courses:/courses");
    }

    #[test]
    fn test_query_order_does_not_affect_key() {
        let a = collection_key(CachePrefix::Courses, "/courses", Some("a=1&b=2"));
        let b = collection_key(CachePrefix::Courses, "/courses", Some("b=2&a=1"));
        assert_eq!(a, b);
        assert_eq!(a, "courses:/courses?a=1&b=2");
    }

    #[test]
    fn test_distinct_queries_do_not_collide() {
        let a = collection_key(CachePrefix::Courses, "/courses", Some("page=1"));
        let b = collection_key(CachePrefix::Courses, "/courses", Some("page=2"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_query_equals_no_query() {
        let a = collection_key(CachePrefix::Courses, "/courses", Some(""));
        let b = collection_key(CachePrefix::Courses, "/courses", None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_collection_pattern_excludes_point_keys() {
        let pattern = CachePrefix::Courses.pattern();
        let point = point_key(CachePrefix::Course, "abc");
        // `courses:*` must not cover `course:abc`.
        assert!(!point.starts_with(pattern.trim_end_matches('*')));
    }

    #[test]
    fn test_repeated_params_are_preserved() {
        let key = collection_key(CachePrefix::Courses, "/courses", Some("tag=b&tag=a"));
        assert_eq!(key, "courses:/courses?tag=a&tag=b");
    }
}
