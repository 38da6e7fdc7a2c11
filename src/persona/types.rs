//! Core types for the persona system.
//!
//! Seven fixed roles make up a persona set. Each role gets a display name
//! from the personalization document and a prompt rendered from its template.

use std::fmt;
use std::str::FromStr;

use crate::document::Substitutions;

// ─────────────────────────────────────────────────────────────────
// Persona Role
// ─────────────────────────────────────────────────────────────────

/// The closed set of persona roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PersonaRole {
    /// Default persona; handles everything not routed elsewhere.
    Operator,
    /// Builds, implements, deploys.
    Builder,
    /// Debugs, tests, audits.
    Debugger,
    /// Decisions, options, tradeoffs.
    Strategist,
    /// External-facing writing.
    Writer,
    /// Multi-source research methodology.
    Researcher,
    /// Deep explanation methodology.
    Teacher,
}

impl PersonaRole {
    /// Slug used in template file names and placeholder keys.
    pub fn slug(&self) -> &'static str {
        match self {
            PersonaRole::Operator => "operator",
            PersonaRole::Builder => "builder",
            PersonaRole::Debugger => "debugger",
            PersonaRole::Strategist => "strategist",
            PersonaRole::Writer => "writer",
            PersonaRole::Researcher => "researcher",
            PersonaRole::Teacher => "teacher",
        }
    }

    /// Name used when the personalization document does not set one.
    pub fn default_name(&self) -> &'static str {
        match self {
            PersonaRole::Operator => "Operator",
            PersonaRole::Builder => "Builder",
            PersonaRole::Debugger => "Debugger",
            PersonaRole::Strategist => "Strategist",
            PersonaRole::Writer => "Writer",
            PersonaRole::Researcher => "Researcher",
            PersonaRole::Teacher => "Teacher",
        }
    }

    /// Personalization key and template placeholder for this role's name,
    /// e.g. `operator_name`.
    pub fn name_key(&self) -> String {
        format!("{}_name", self.slug())
    }

    /// All roles in manifest order.
    pub fn all() -> &'static [PersonaRole] {
        &[
            PersonaRole::Operator,
            PersonaRole::Builder,
            PersonaRole::Debugger,
            PersonaRole::Strategist,
            PersonaRole::Writer,
            PersonaRole::Researcher,
            PersonaRole::Teacher,
        ]
    }
}

impl fmt::Display for PersonaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for PersonaRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PersonaRole::all()
            .iter()
            .copied()
            .find(|role| role.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown persona role '{}'. Valid: operator, builder, debugger, strategist, writer, researcher, teacher",
                    s
                )
            })
    }
}

// ─────────────────────────────────────────────────────────────────
// Persona Names
// ─────────────────────────────────────────────────────────────────

/// Display name for every role, in [`PersonaRole::all`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaNames {
    names: Vec<(PersonaRole, String)>,
}

impl PersonaNames {
    /// Build from a lookup; roles the lookup has no name for keep their default.
    pub fn from_lookup<'a, F>(lookup: F) -> Self
    where
        F: Fn(PersonaRole) -> Option<&'a str>,
    {
        let names = PersonaRole::all()
            .iter()
            .map(|role| {
                let name = lookup(*role).unwrap_or(role.default_name());
                (*role, name.to_string())
            })
            .collect();
        Self { names }
    }

    pub fn get(&self, role: PersonaRole) -> &str {
        self.names
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, name)| name.as_str())
            .unwrap_or(role.default_name())
    }

    pub fn iter(&self) -> impl Iterator<Item = (PersonaRole, &str)> {
        self.names.iter().map(|(role, name)| (*role, name.as_str()))
    }

    /// `{{<role>_name}}` placeholder values for all seven roles.
    pub fn substitutions(&self) -> Substitutions {
        self.iter()
            .map(|(role, name)| (role.name_key(), name.to_string()))
            .collect()
    }
}

impl Default for PersonaNames {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
