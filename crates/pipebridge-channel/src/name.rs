use std::fmt;

/// Namespace prefix every canonical pipe name starts with.
pub const CANONICAL_PREFIX: &str = r"\\.\pipe\";

/// A pipe name in canonical form (`\\.\pipe\<name>`).
///
/// Only [`resolve`] builds these, so the prefix is always present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelName(String);

impl ChannelName {
    /// Full canonical path, e.g. `\\.\pipe\mypipe`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name with the namespace prefix removed, as the namespace listing reports it.
    pub fn bare(&self) -> &str {
        // The prefix is ASCII, so the byte offset is a char boundary.
        &self.0[CANONICAL_PREFIX.len()..]
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChannelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolve a short name (`mypipe`) or a full path (`\\.\pipe\mypipe`,
/// `//./pipe/mypipe`) into its canonical form.
///
/// Resolving an already canonical name returns it unchanged. The prefix is
/// matched case-insensitively, like the Windows namespace itself.
pub fn resolve(name: &str) -> ChannelName {
    let normalized = name.trim().replace('/', "\\");
    if has_canonical_prefix(&normalized) {
        return ChannelName(normalized);
    }

    let bare = normalized.trim_start_matches(|c: char| c == '\\' || c.is_whitespace());
    ChannelName(format!("{CANONICAL_PREFIX}{bare}"))
}

fn has_canonical_prefix(name: &str) -> bool {
    name.get(..CANONICAL_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(CANONICAL_PREFIX))
}
