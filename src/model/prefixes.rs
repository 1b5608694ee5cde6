// Prefix characters for inline project and label references.
//
// The tokenizer and the autocomplete trigger detector both read this table, so
// a reference the menu completes is always one the parser will pick up.
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SyntaxMode {
    /// `#project @label`
    #[default]
    Todoist,
    /// `+project *label`
    Vikunja,
}

impl fmt::Display for SyntaxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxMode::Todoist => write!(f, "Todoist"),
            SyntaxMode::Vikunja => write!(f, "Vikunja"),
        }
    }
}

/// Which reference list a prefix (or an autocomplete menu) refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Project,
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxPrefixes {
    pub project: char,
    pub label: char,
}

impl SyntaxPrefixes {
    pub fn for_kind(&self, kind: RefKind) -> char {
        match kind {
            RefKind::Project => self.project,
            RefKind::Label => self.label,
        }
    }
}

pub fn get_prefixes(mode: SyntaxMode) -> SyntaxPrefixes {
    match mode {
        SyntaxMode::Todoist => SyntaxPrefixes {
            project: '#',
            label: '@',
        },
        SyntaxMode::Vikunja => SyntaxPrefixes {
            project: '+',
            label: '*',
        },
    }
}
