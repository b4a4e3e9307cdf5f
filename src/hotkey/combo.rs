//! Key sets and the `Mod1+Mod2+Key` combo string format

use std::collections::BTreeSet;
use std::fmt;

use super::keys::CanonicalKey;

/// An unordered set of canonical keys
///
/// Used both for the keys currently held down and for the keys a binding
/// requires. `Display` renders the canonical combo string: modifiers in
/// `Ctrl, Alt, Shift, Cmd` order, then the remaining keys alphabetically,
/// each capitalized and joined by `+`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeySet(BTreeSet<CanonicalKey>);

impl KeySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a combo string such as `"Ctrl+Shift+Q"`
    ///
    /// Order- and case-insensitive. Blank segments are skipped, so an empty
    /// string yields an empty set.
    pub fn parse(combo: &str) -> Self {
        combo
            .split('+')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(CanonicalKey::from_name)
            .collect()
    }

    /// Insert a key, returning whether it was newly added
    pub fn insert(&mut self, key: CanonicalKey) -> bool {
        self.0.insert(key)
    }

    /// Remove a key, returning whether it was present
    pub fn remove(&mut self, key: &CanonicalKey) -> bool {
        self.0.remove(key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether at least one ctrl/alt/shift/cmd token is present
    pub fn has_modifier(&self) -> bool {
        self.0.iter().any(CanonicalKey::is_modifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalKey> {
        self.0.iter()
    }

    /// Keys in display order: modifiers by rank, then plain keys alphabetically
    pub fn ordered(&self) -> Vec<&CanonicalKey> {
        let (mut modifiers, plain): (Vec<_>, Vec<_>) =
            self.0.iter().partition(|key| key.is_modifier());
        modifiers.sort_by_key(|key| key.modifier_rank());
        // BTreeSet iteration already yields plain keys alphabetically
        modifiers.extend(plain);
        modifiers
    }
}

impl fmt::Display for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ordered().iter().map(|k| k.capitalized()).collect();
        f.write_str(&parts.join("+"))
    }
}

impl FromIterator<CanonicalKey> for KeySet {
    fn from_iter<I: IntoIterator<Item = CanonicalKey>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
