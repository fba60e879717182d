use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique key of a location, conventionally `"<number> <DISTRICT>"`.
///
/// The district and number are only used to group and order locations for
/// display; the engine treats the address as an opaque key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create an address from any string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The address as written in the case data.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The district code (last word, upper-cased), if the address has one.
    pub fn district(&self) -> Option<String> {
        let parts: Vec<&str> = self.0.split_whitespace().collect();
        if parts.len() >= 2 {
            parts.last().map(|d| d.to_uppercase())
        } else {
            None
        }
    }

    /// The street number (first word), if it parses as one.
    pub fn number(&self) -> Option<u32> {
        self.0.split_whitespace().next()?.parse().ok()
    }

    /// Whether the address follows the `"<number> <DISTRICT>"` convention.
    pub fn is_well_formed(&self) -> bool {
        self.district().is_some() && self.number().is_some()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Address {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn district_and_number() {
        let addr = Address::new("22 NW");
        assert_eq!(addr.district().as_deref(), Some("NW"));
        assert_eq!(addr.number(), Some(22));
        assert!(addr.is_well_formed());
    }

    #[test]
    fn district_is_upper_cased() {
        assert_eq!(Address::new("7 wc").district().as_deref(), Some("WC"));
    }

    #[test]
    fn malformed_address() {
        let addr = Address::new("Scotland Yard");
        assert_eq!(addr.district().as_deref(), Some("YARD"));
        assert_eq!(addr.number(), None);
        assert!(!addr.is_well_formed());

        let single = Address::new("Baker");
        assert_eq!(single.district(), None);
        assert!(!single.is_well_formed());
    }

    #[test]
    fn borrow_as_str_for_lookups() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(Address::new("68 WC"), 1);
        assert_eq!(map.get("68 WC"), Some(&1));
    }
}
