use serde::{Deserialize, Serialize};

/// Lead count used for the summary when the case file gives none.
pub const DEFAULT_BENCHMARK_LEADS: u32 = 4;

/// The framing of a case: how it opens and how it ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFile {
    /// Case title.
    #[serde(rename = "case title", alias = "title", default)]
    pub title: Option<String>,
    /// Date line shown above the introduction.
    #[serde(default)]
    pub date: Option<String>,
    /// Introduction narrative.
    #[serde(default)]
    pub intro: String,
    /// Solution narrative read at the end.
    #[serde(default)]
    pub outro: String,
    /// Canonical solution summary.
    #[serde(default)]
    pub case_summary: Option<CaseSummary>,
}

/// The canonical solution: how few leads the case can be solved in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSummary {
    /// Prose description of the canonical solution.
    #[serde(default)]
    pub case_description: Option<String>,
    /// The leads followed in the canonical solution, in order.
    #[serde(default)]
    pub leads: Vec<CanonicalLead>,
    /// Number of leads the canonical solution took.
    #[serde(rename = "holmesLeads", default)]
    pub benchmark_leads: Option<u32>,
}

impl CaseSummary {
    /// Lead count of the canonical solution.
    pub fn benchmark(&self) -> u32 {
        self.benchmark_leads.unwrap_or(DEFAULT_BENCHMARK_LEADS)
    }

    /// Description of the canonical solution, with a generic fallback.
    pub fn description(&self) -> String {
        self.case_description
            .clone()
            .unwrap_or_else(|| format!("The case can be solved in {} leads.", self.benchmark()))
    }
}

/// One lead of the canonical solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalLead {
    /// Display name, usually an address with a note.
    pub name: String,
}
