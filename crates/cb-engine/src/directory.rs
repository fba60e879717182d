//! The address directory, grouped by district.

use std::collections::BTreeMap;

use cb_core::{Address, Casebook};
use serde::Serialize;

use crate::state::GameState;

/// Group name for addresses without a district.
pub const OTHER_DISTRICT: &str = "Other";

/// One address in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    /// The address.
    pub address: Address,
    /// Whether the player has been there.
    pub visited: bool,
    /// Whether it is locked.
    pub locked: bool,
}

/// The addresses of one district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistrictGroup {
    /// District code.
    pub district: String,
    /// Entries sorted by street number.
    pub entries: Vec<DirectoryEntry>,
}

/// Group every address by district.
///
/// Districts follow `order`; unlisted districts come after in alphabetical
/// order and addresses without a district come last.
pub fn build_directory(book: &Casebook, state: &GameState, order: &[String]) -> Vec<DistrictGroup> {
    let mut by_district: BTreeMap<String, Vec<DirectoryEntry>> = BTreeMap::new();
    for address in book.addresses() {
        let district = address.district().unwrap_or_else(|| OTHER_DISTRICT.to_string());
        by_district.entry(district).or_default().push(DirectoryEntry {
            address: address.clone(),
            visited: state.has_visited(address.as_str()),
            locked: state.is_locked(address.as_str()),
        });
    }

    let rank = |district: &str| -> (usize, usize) {
        match order.iter().position(|d| d.eq_ignore_ascii_case(district)) {
            Some(i) => (0, i),
            None if district == OTHER_DISTRICT => (2, 0),
            None => (1, 0),
        }
    };

    let mut groups: Vec<DistrictGroup> = by_district
        .into_iter()
        .map(|(district, mut entries)| {
            entries.sort_by(|a, b| {
                a.address
                    .number()
                    .unwrap_or(u32::MAX)
                    .cmp(&b.address.number().unwrap_or(u32::MAX))
                    .then_with(|| a.address.cmp(&b.address))
            });
            DistrictGroup { district, entries }
        })
        .collect();
    groups.sort_by(|a, b| {
        rank(&a.district)
            .cmp(&rank(&b.district))
            .then_with(|| a.district.cmp(&b.district))
    });
    groups
}
