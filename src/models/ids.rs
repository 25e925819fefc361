//! Identity keys used to collapse duplicate variants.

use std::fmt;

/// Identity of one logical product variant across a whole run.
///
/// Built as `"{colour}-{title} {capacity}"`. Two expanded records with the
/// same key are the same product regardless of which page they came from.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Build the key for one colour variant of a product.
    pub fn generate(colour: &str, title: &str, capacity_label: &str) -> Self {
        Self(format!("{}-{} {}", colour, title, capacity_label))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityKey({})", self.0)
    }
}

impl From<String> for IdentityKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for IdentityKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_key_format() {
        let key = IdentityKey::generate("Green", "iPhone 11", "64GB");
        assert_eq!(key.as_str(), "Green-iPhone 11 64GB");
    }

    #[test]
    fn test_identity_key_deterministic() {
        let a = IdentityKey::generate("Black", "Galaxy S20", "128GB");
        let b = IdentityKey::generate("Black", "Galaxy S20", "128GB");
        assert_eq!(a, b);
    }

    #[test]
    fn test_identity_key_colour_distinguishes() {
        let a = IdentityKey::generate("Black", "Galaxy S20", "128GB");
        let b = IdentityKey::generate("White", "Galaxy S20", "128GB");
        assert_ne!(a, b);
    }

    #[test]
    fn test_identity_key_capacity_distinguishes() {
        let a = IdentityKey::generate("Black", "Galaxy S20", "128GB");
        let b = IdentityKey::generate("Black", "Galaxy S20", "256GB");
        assert_ne!(a, b);
    }

    #[test]
    fn test_identity_key_display_and_debug() {
        let key = IdentityKey::from("Red-Pixel 4 64GB");
        assert_eq!(format!("{}", key), "Red-Pixel 4 64GB");
        assert_eq!(format!("{:?}", key), "IdentityKey(Red-Pixel 4 64GB)");
    }
}
