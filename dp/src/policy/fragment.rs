//! Ordered, source-tagged constraint clauses

use serde::Serialize;

use crate::domain::Religion;

/// Where a clause came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClauseSource {
    Profile,
    FastingRule,
    ReligionRule,
    FestivalRule,
}

/// Which composition rule emitted a clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// Always present: the user's measurements and preferences
    BaseProfile,
    /// Any fast other than "None"
    GenericFast,
    /// A religion's strict rules while fasting
    StrictFast(Religion),
    /// A religion's everyday note when not fasting
    StandingNote(Religion),
    /// Festival detection and the detox day
    Festival,
}

impl Rule {
    pub fn source(&self) -> ClauseSource {
        match self {
            Rule::BaseProfile => ClauseSource::Profile,
            Rule::GenericFast => ClauseSource::FastingRule,
            Rule::StrictFast(_) | Rule::StandingNote(_) => ClauseSource::ReligionRule,
            Rule::Festival => ClauseSource::FestivalRule,
        }
    }
}

/// One instruction to the generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clause {
    pub rule: Rule,
    pub text: String,
}

impl Clause {
    pub fn source(&self) -> ClauseSource {
        self.rule.source()
    }
}

/// Clauses in the order the generator should read them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConstraintFragment {
    clauses: Vec<Clause>,
}

impl ConstraintFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Rule, text: impl Into<String>) {
        self.clauses.push(Clause {
            rule,
            text: text.into(),
        });
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Rules in emission order
    pub fn rules(&self) -> Vec<Rule> {
        self.clauses.iter().map(|c| c.rule).collect()
    }

    pub fn contains(&self, rule: Rule) -> bool {
        self.clauses.iter().any(|c| c.rule == rule)
    }

    pub fn count(&self, rule: Rule) -> usize {
        self.clauses.iter().filter(|c| c.rule == rule).count()
    }

    pub fn from_source(&self, source: ClauseSource) -> impl Iterator<Item = &Clause> {
        self.clauses.iter().filter(move |c| c.source() == source)
    }

    /// Clause texts joined by blank lines
    pub fn render(&self) -> String {
        self.clauses
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
