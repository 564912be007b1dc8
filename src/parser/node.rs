//! npm version range handling
//!
//! Handles range formats:
//! - Exact: `1.2.3`, `=1.2.3`, `v1.2.3`
//! - Caret / tilde: `^1.2.3`, `~1.2.3`, `~>1.2`
//! - Comparison: `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3`
//! - Wildcard: `*`, `x`, `1.x`, `1.2.*`, empty string
//! - Range: `>=1.0.0 <2.0.0`, `1.0.0 - 2.0.0`, `^1.0.0 || ^2.0.0`
//!
//! Protocol references (`workspace:*`, `npm:foo@1`, `file:../x`, git URLs,
//! `user/repo`) and dist-tags (`latest`) never resolve.

use regex::Regex;
use semver::{Prerelease, Version};
use std::sync::LazyLock;

static PARTIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[vV=]?(\d+|[xX*])(?:\.(\d+|[xX*]))?(?:\.(\d+|[xX*]))?(?:-([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?$",
    )
    .unwrap()
});
static COMPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(<=|>=|~>|<|>|=|\^|~)?(.*)$").unwrap());
static OPERATOR_GAP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<=|>=|~>|<|>|=|\^|~)\s+").unwrap());
static HYPHEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+-\s+(\S+)$").unwrap());
static VERSION_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\d])(\d{1,16})(?:\.(\d{1,16}))?(?:\.(\d{1,16}))?(?:$|[^\d])").unwrap()
});

/// A possibly partial version such as `1`, `1.2`, `1.x` or `1.2.3-beta.1`
#[derive(Debug, Clone, PartialEq, Eq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Partial {
    fn parse(s: &str) -> Option<Self> {
        let caps = PARTIAL_RE.captures(s)?;
        let component = |idx: usize| -> Result<Option<u64>, ()> {
            match caps.get(idx).map(|m| m.as_str()) {
                None | Some("x") | Some("X") | Some("*") => Ok(None),
                Some(n) => n.parse().map(Some).map_err(|_| ()),
            }
        };

        let major = component(1).ok()?;
        // Anything after a wildcard component is ignored, as npm does
        let minor = major.and(component(2).ok()?);
        let patch = minor.and(component(3).ok()?);

        let pre = match (patch, caps.get(4)) {
            (Some(_), Some(p)) => Prerelease::new(p.as_str()).ok()?,
            _ => Prerelease::EMPTY,
        };

        Some(Self {
            major,
            minor,
            patch,
            pre,
        })
    }

    /// Smallest version matched by this partial
    fn floor(&self) -> Version {
        let mut version = Version::new(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        );
        version.pre = self.pre.clone();
        version
    }

    /// Smallest version strictly greater than everything this partial matches
    fn successor(&self) -> Option<Version> {
        match (self.major, self.minor, self.patch) {
            (None, _, _) => None,
            (Some(major), None, _) => Some(Version::new(major.checked_add(1)?, 0, 0)),
            (Some(major), Some(minor), None) => {
                Some(Version::new(major, minor.checked_add(1)?, 0))
            }
            (Some(major), Some(minor), Some(patch)) if self.pre.is_empty() => {
                Some(Version::new(major, minor, patch.checked_add(1)?))
            }
            (Some(major), Some(minor), Some(patch)) => {
                let mut version = Version::new(major, minor, patch);
                version.pre = Prerelease::new(&format!("{}.0", self.pre)).ok()?;
                Some(version)
            }
        }
    }
}

/// Resolve the minimum version that satisfies an npm range.
///
/// Returns `None` for anything that is not a semver range: protocol
/// references, git/GitHub specifiers, dist-tags and malformed input.
pub fn min_version(range: &str) -> Option<Version> {
    let range = range.trim();

    if range.contains(':') || range.contains('/') {
        return None;
    }

    let mut lowest: Option<Version> = None;
    for alternative in range.split("||") {
        let candidate = min_version_of_set(alternative.trim())?;
        lowest = match lowest {
            Some(current) if current <= candidate => Some(current),
            _ => Some(candidate),
        };
    }
    lowest
}

/// Minimum version of a single comparator set (no `||`)
fn min_version_of_set(set: &str) -> Option<Version> {
    if set.is_empty() {
        return Some(Version::new(0, 0, 0));
    }

    if let Some(caps) = HYPHEN_RE.captures(set) {
        let low = Partial::parse(caps.get(1)?.as_str())?.floor();
        let high = Partial::parse(caps.get(2)?.as_str())?;
        return admits_upper(&low, "<=", &high).then_some(low);
    }

    let normalized = OPERATOR_GAP_RE.replace_all(set, "$1");
    let mut floor: Option<Version> = None;
    let mut upper: Vec<(&str, Partial)> = Vec::new();

    for comparator in normalized.split_whitespace() {
        let caps = COMPARATOR_RE.captures(comparator)?;
        let op = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let partial = Partial::parse(caps.get(2)?.as_str())?;

        let bound = match op {
            "" | "=" | ">=" | "^" | "~" | "~>" => partial.floor(),
            ">" => partial.successor()?,
            "<" | "<=" => {
                upper.push((op, partial));
                continue;
            }
            _ => return None,
        };

        floor = match floor {
            Some(current) if current >= bound => Some(current),
            _ => Some(bound),
        };
    }

    let floor = floor.unwrap_or_else(|| Version::new(0, 0, 0));
    upper
        .iter()
        .all(|(op, partial)| admits_upper(&floor, op, partial))
        .then_some(floor)
}

/// Whether `version` stays below an upper-bound comparator
///
/// Partial bounds cover their whole range: `<=1.2` admits every `1.2.x`,
/// `<1.2` stops at `1.2.0`.
fn admits_upper(version: &Version, op: &str, bound: &Partial) -> bool {
    let complete = bound.patch.is_some();
    match (op, bound.major, complete) {
        ("<", None, _) => false,
        ("<", Some(_), _) => *version < bound.floor(),
        (_, None, _) => true,
        (_, Some(_), true) => *version <= bound.floor(),
        (_, Some(_), false) => bound.successor().is_none_or(|next| *version < next),
    }
}

/// Byte offset where the first numeric version substring begins, if any
pub fn version_offset(raw: &str) -> Option<usize> {
    VERSION_RUN_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.start())
}

/// Parse a version string as published by the registry
///
/// Registries occasionally list versions with a leading `v` or `=`; those are
/// tolerated, anything else must be strict semver.
pub fn parse_published(version: &str) -> Option<Version> {
    let trimmed = version.trim();
    let trimmed = trimmed
        .strip_prefix('=')
        .or_else(|| trimmed.strip_prefix('v'))
        .unwrap_or(trimmed);
    Version::parse(trimmed).ok()
}
