//! Release-type difference between two versions
//!
//! Follows npm's notion of a diff, including the special case where the lower
//! version is a prerelease of the higher one (`1.0.0-beta` to `1.0.0` is a
//! major release, not a prerelease bump).

use semver::Version;
use std::cmp::Ordering;

/// Kind of release separating two versions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionDiff {
    Major,
    Minor,
    Patch,
    PreMajor,
    PreMinor,
    PrePatch,
    Prerelease,
}

/// Release type between `a` and `b`, or `None` when they are equal
pub fn diff(a: &Version, b: &Version) -> Option<VersionDiff> {
    let (low, high) = match a.cmp_precedence(b) {
        Ordering::Equal => return None,
        Ordering::Less => (a, b),
        Ordering::Greater => (b, a),
    };

    let low_pre = !low.pre.is_empty();
    let high_pre = !high.pre.is_empty();

    if low_pre && !high_pre {
        if low.patch == 0 && low.minor == 0 {
            return Some(VersionDiff::Major);
        }
        if (low.major, low.minor, low.patch) == (high.major, high.minor, high.patch) {
            if low.minor != 0 && low.patch == 0 {
                return Some(VersionDiff::Minor);
            }
            return Some(VersionDiff::Patch);
        }
    }

    let kind = if a.major != b.major {
        (VersionDiff::Major, VersionDiff::PreMajor)
    } else if a.minor != b.minor {
        (VersionDiff::Minor, VersionDiff::PreMinor)
    } else if a.patch != b.patch {
        (VersionDiff::Patch, VersionDiff::PrePatch)
    } else {
        return Some(VersionDiff::Prerelease);
    };

    Some(if high_pre { kind.1 } else { kind.0 })
}
