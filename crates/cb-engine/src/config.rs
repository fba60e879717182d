//! Engine configuration.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use cb_core::{Address, Letter, LoadError, LoadResult};
use serde::{Deserialize, Serialize};

/// Replaces a placeholder token in narrative text with a clickable element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    /// The literal token to look for.
    pub placeholder: String,
    /// Label of the element that replaces it.
    pub label: String,
    /// What the element opens.
    pub target: String,
}

impl Substitution {
    /// Create a substitution.
    pub fn new(
        placeholder: impl Into<String>,
        label: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            placeholder: placeholder.into(),
            label: label.into(),
            target: target.into(),
        }
    }
}

/// Configuration for a play session.
///
/// The defaults carry the values of the bundled case: its free leads, the
/// three hint texts, the single image placeholder, its letter alphabet and
/// the district order of the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Addresses whose first visit does not count as a lead.
    pub free_leads: BTreeSet<Address>,
    /// Hint text per letter, for `hint_<LETTER>` actions.
    pub hints: BTreeMap<Letter, String>,
    /// Placeholder substitutions applied to all narrative text.
    pub substitutions: Vec<Substitution>,
    /// Letters the case uses, in display order.
    pub alphabet: Vec<Letter>,
    /// Order in which districts are listed.
    pub district_order: Vec<String>,
    /// Label of the affordance that leaves a finished interaction.
    pub leave_label: String,
}

const DEFAULT_FREE_LEADS: [&str; 6] = ["35 NW", "45 NW", "80 NW", "81 NW", "82 NW", "83 NW"];
const DEFAULT_ALPHABET: [char; 8] = ['B', 'C', 'E', 'F', 'G', 'H', 'R', 'T'];
const DEFAULT_DISTRICTS: [&str; 8] = ["WC", "SW", "NW", "N", "EC", "E", "SE", "S"];

const HINT_F: &str = "Hint (F): \"Having difficulty finding our racing miscreant? Have you considered that where he is going is less important than where he has been? Even less important than who he actually is, in my opinion.\"";
const HINT_T: &str = "Hint (T): \"Have you spoken to the formidable woman who runs the orphanage? If not, I suggest you locate her quickly. If you are struggling to identify those items you are carrying, perhaps our friend H.R. Murray can set you on the correct path.\"";
const HINT_G: &str = "Hint (G): \"I fear you will struggle if you are attempting to locate Lord Goodwin; if you look in the newspaper you will find that he passed away last week. Now ask yourself; is someone trying to impersonate Lord Harold Goodwin, or are they trying to achieve something else?\"";

impl Default for EngineConfig {
    fn default() -> Self {
        let letter = |c| Letter::new(c).into_iter();
        Self {
            free_leads: DEFAULT_FREE_LEADS.iter().map(|a| Address::new(*a)).collect(),
            hints: [('F', HINT_F), ('T', HINT_T), ('G', HINT_G)]
                .into_iter()
                .flat_map(|(c, text)| letter(c).map(move |l| (l, text.to_string())))
                .collect(),
            substitutions: vec![Substitution::new(
                "(Image: Pawn Slip Fragment)",
                "Burn piece of paper",
                "media/images/clue.png",
            )],
            alphabet: DEFAULT_ALPHABET.into_iter().flat_map(letter).collect(),
            district_order: DEFAULT_DISTRICTS.iter().map(|d| d.to_string()).collect(),
            leave_label: "Leave".to_string(),
        }
    }
}

impl EngineConfig {
    /// Create a config with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// A config with no free leads, hints, substitutions or alphabet.
    pub fn empty() -> Self {
        Self {
            free_leads: BTreeSet::new(),
            hints: BTreeMap::new(),
            substitutions: Vec::new(),
            alphabet: Vec::new(),
            ..Self::default()
        }
    }

    /// Parse a config from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> LoadResult<Self> {
        serde_json::from_str(json).map_err(|e| LoadError::json("engine configuration", e))
    }

    /// Load a config file.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| LoadError::json(path.display().to_string(), e))
    }

    /// Mark an address as a free lead.
    pub fn with_free_lead(mut self, address: impl Into<Address>) -> Self {
        self.free_leads.insert(address.into());
        self
    }

    /// Set the hint text for a letter.
    pub fn with_hint(mut self, letter: Letter, text: impl Into<String>) -> Self {
        self.hints.insert(letter, text.into());
        self
    }

    /// Add a placeholder substitution.
    pub fn with_substitution(mut self, substitution: Substitution) -> Self {
        self.substitutions.push(substitution);
        self
    }

    /// Set the letter alphabet.
    pub fn with_alphabet(mut self, alphabet: Vec<Letter>) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Set the district order.
    pub fn with_district_order(mut self, order: Vec<String>) -> Self {
        self.district_order = order;
        self
    }

    /// Whether the address is a free lead.
    pub fn is_free_lead(&self, address: &str) -> bool {
        self.free_leads.contains(address)
    }

    /// The hint text for a letter.
    pub fn hint(&self, letter: Letter) -> Option<&str> {
        self.hints.get(&letter).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(c: char) -> Letter {
        Letter::new(c).unwrap()
    }

    #[test]
    fn default_config() {
        let cfg = EngineConfig::default();
        assert!(cfg.is_free_lead("35 NW"));
        assert!(!cfg.is_free_lead("22 NW"));
        assert!(cfg.hint(letter('F')).unwrap().starts_with("Hint (F)"));
        assert!(cfg.hint(letter('B')).is_none());
        assert_eq!(cfg.alphabet.len(), 8);
        assert_eq!(cfg.district_order[0], "WC");
        assert_eq!(cfg.substitutions.len(), 1);
    }

    #[test]
    fn builder_methods() {
        let cfg = EngineConfig::empty()
            .with_free_lead("1 WC")
            .with_hint(letter('C'), "Try the hall.")
            .with_substitution(Substitution::new("(Map)", "Open map", "map.pdf"));
        assert!(cfg.is_free_lead("1 WC"));
        assert!(!cfg.is_free_lead("35 NW"));
        assert_eq!(cfg.hint(letter('C')), Some("Try the hall."));
        assert_eq!(cfg.substitutions[0].label, "Open map");
    }

    #[test]
    fn json_overrides_keep_defaults() {
        let cfg = EngineConfig::from_json(
            r#"{"freeLeads": ["1 WC"], "hints": {"c": "Look closer."}, "leaveLabel": "Go back"}"#,
        )
        .unwrap();
        assert!(cfg.is_free_lead("1 WC"));
        assert!(!cfg.is_free_lead("35 NW"));
        assert_eq!(cfg.hint(letter('C')), Some("Look closer."));
        assert_eq!(cfg.leave_label, "Go back");
        assert_eq!(cfg.district_order, EngineConfig::default().district_order);
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = EngineConfig::from_json(r#"{"hints": {"CC": "x"}}"#).unwrap_err();
        assert!(err.to_string().contains("engine configuration"));
    }
}
