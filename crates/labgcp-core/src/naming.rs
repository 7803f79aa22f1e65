//! Canonical instance naming

/// Derive the canonical instance name from a short name and its owner.
///
/// The owner identity is appended unless it already appears somewhere in the
/// short name, so computing the canonical name of a canonical name is a
/// no-op. The containment check is plain substring match, not
/// delimiter-bounded: an owner string that happens to occur inside an
/// unrelated word also suppresses the suffix.
pub fn canonical_name(short_name: &str, owner: &str) -> String {
    if short_name.contains(owner) {
        short_name.to_string()
    } else {
        format!("{short_name}-{owner}")
    }
}
