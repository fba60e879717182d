//! The State Store: everything a session remembers.

use std::collections::{BTreeMap, BTreeSet};

use cb_core::{Address, FlagValue, Letter, Updates};

/// Mutable progress of one play session.
///
/// Letters are only ever added, locks are permanent and the lead counter
/// only increases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    visited: BTreeSet<Address>,
    locked: BTreeSet<Address>,
    letters: BTreeSet<Letter>,
    flags: BTreeMap<String, FlagValue>,
    leads: u32,
    current: Option<Address>,
}

impl GameState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    // -- Visits --

    /// Whether the address was visited before.
    pub fn has_visited(&self, address: &str) -> bool {
        self.visited.contains(address)
    }

    /// Record a visit. Returns `true` on the first visit.
    pub fn mark_visited(&mut self, address: Address) -> bool {
        self.visited.insert(address)
    }

    /// Visited addresses in order.
    pub fn visited(&self) -> impl Iterator<Item = &Address> {
        self.visited.iter()
    }

    /// Number of distinct visited addresses.
    pub fn visit_count(&self) -> usize {
        self.visited.len()
    }

    // -- Locks --

    /// Whether the address is locked.
    pub fn is_locked(&self, address: &str) -> bool {
        self.locked.contains(address)
    }

    /// Lock an address. Returns `true` if it was not locked already.
    pub fn lock(&mut self, address: Address) -> bool {
        self.locked.insert(address)
    }

    /// Locked addresses in order.
    pub fn locked(&self) -> impl Iterator<Item = &Address> {
        self.locked.iter()
    }

    // -- Letters --

    /// Whether the letter is circled.
    pub fn has_letter(&self, letter: Letter) -> bool {
        self.letters.contains(&letter)
    }

    /// Circle a letter. Returns `true` if it was new.
    pub fn grant_letter(&mut self, letter: Letter) -> bool {
        self.letters.insert(letter)
    }

    /// Circled letters in alphabetical order.
    pub fn letters(&self) -> impl Iterator<Item = Letter> + '_ {
        self.letters.iter().copied()
    }

    // -- Flags --

    /// Look up a flag.
    pub fn flag(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name)
    }

    /// Whether the flag holds exactly `true`.
    pub fn flag_is_true(&self, name: &str) -> bool {
        self.flag(name).is_some_and(FlagValue::is_true)
    }

    /// Whether the flag is set to anything truthy.
    pub fn flag_is_truthy(&self, name: &str) -> bool {
        self.flag(name).is_some_and(FlagValue::is_truthy)
    }

    /// Set a flag, replacing any previous value.
    pub fn set_flag(&mut self, name: impl Into<String>, value: impl Into<FlagValue>) {
        self.flags.insert(name.into(), value.into());
    }

    /// All flags.
    pub fn flags(&self) -> &BTreeMap<String, FlagValue> {
        &self.flags
    }

    /// Apply an update map: circle its letter and merge its flags.
    ///
    /// Returns the letter if it was newly circled.
    pub fn apply_updates(&mut self, updates: &Updates) -> Option<Letter> {
        for (name, value) in &updates.flags {
            log::debug!("flag {name} = {value}");
            self.flags.insert(name.clone(), value.clone());
        }
        updates
            .circles_letter
            .filter(|letter| self.grant_letter(*letter))
    }

    // -- Leads --

    /// Leads followed so far.
    pub fn leads(&self) -> u32 {
        self.leads
    }

    /// Count one more lead.
    pub fn add_lead(&mut self) -> u32 {
        self.leads = self.leads.saturating_add(1);
        self.leads
    }

    // -- Position --

    /// The location the player is at, if any.
    pub fn current(&self) -> Option<&Address> {
        self.current.as_ref()
    }

    /// Move the player to a location, or back to the introduction.
    pub fn set_current(&mut self, address: Option<Address>) {
        self.current = address;
    }
}
