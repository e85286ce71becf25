//! Per-resource TTL policy table.

use crate::CachePrefix;
use std::time::Duration;

/// TTL policy for cached responses, per resource type.
///
/// These values bound staleness after the known read/write race window;
/// they are tunables, not correctness invariants.
#[derive(Debug, Clone)]
pub struct TtlPolicy {
    /// Single course detail.
    pub course_detail: Duration,
    /// Course listings.
    pub course_list: Duration,
    /// Package listings.
    pub package_list: Duration,
    /// Assignment listings.
    pub assignment_list: Duration,
    /// Everything without a dedicated entry.
    pub default: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            course_detail: Duration::from_secs(1800),
            course_list: Duration::from_secs(1800),
            package_list: Duration::from_secs(7200),
            assignment_list: Duration::from_secs(900),
            default: Duration::from_secs(300),
        }
    }
}

impl TtlPolicy {
    /// Builds a policy from raw seconds (configuration-file values).
    #[must_use]
    pub const fn from_secs(
        course_detail: u64,
        course_list: u64,
        package_list: u64,
        assignment_list: u64,
        default: u64,
    ) -> Self {
        Self {
            course_detail: Duration::from_secs(course_detail),
            course_list: Duration::from_secs(course_list),
            package_list: Duration::from_secs(package_list),
            assignment_list: Duration::from_secs(assignment_list),
            default: Duration::from_secs(default),
        }
    }

    /// Returns the TTL for a key prefix.
    #[must_use]
    pub fn for_prefix(&self, prefix: CachePrefix) -> Duration {
        match prefix {
            CachePrefix::Course => self.course_detail,
            CachePrefix::Courses => self.course_list,
            CachePrefix::Package | CachePrefix::PackageCourses => self.package_list,
            CachePrefix::Assignments => self.assignment_list,
            CachePrefix::Session | CachePrefix::User | CachePrefix::Jwt | CachePrefix::Revoked => {
                self.default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_matches_documented_values() {
        let policy = TtlPolicy::default();
        assert_eq!(policy.for_prefix(CachePrefix::Course), Duration::from_secs(1800));
        assert_eq!(policy.for_prefix(CachePrefix::Package), Duration::from_secs(7200));
        assert_eq!(policy.for_prefix(CachePrefix::Assignments), Duration::from_secs(900));
        assert_eq!(policy.for_prefix(CachePrefix::User), Duration::from_secs(300));
    }

    #[test]
    fn test_from_secs() {
        let policy = TtlPolicy::from_secs(1, 2, 3, 4, 5);
        assert_eq!(policy.for_prefix(CachePrefix::Courses), Duration::from_secs(2));
        assert_eq!(policy.default, Duration::from_secs(5));
    }
}
