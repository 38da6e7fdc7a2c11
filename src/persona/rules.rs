//! Routing rule definitions.
//!
//! Two fixed tables: hard-switch rules move the conversation to another
//! persona; methodology rules pull in a persona's method without switching.

use std::fmt;

use crate::document::{substitute, Substitutions};

use super::types::{PersonaNames, PersonaRole};

/// Placeholder in hard-switch instructions that receives the created persona's id.
pub const PERSONA_ID_KEY: &str = "persona_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    HardSwitch,
    Methodology,
}

impl RuleKind {
    fn label(&self) -> &'static str {
        match self {
            RuleKind::HardSwitch => "switch",
            RuleKind::Methodology => "methodology",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::HardSwitch => f.write_str("hard-switch"),
            RuleKind::Methodology => f.write_str("methodology"),
        }
    }
}

/// One row of a static rule table.
#[derive(Debug, Clone, Copy)]
pub struct RuleSeed {
    pub role: PersonaRole,
    pub kind: RuleKind,
    pub condition: &'static str,
}

pub static HARD_SWITCH_RULES: [RuleSeed; 4] = [
    RuleSeed {
        role: PersonaRole::Builder,
        kind: RuleKind::HardSwitch,
        condition: "When the user asks to build, create, implement, deploy, or code systems",
    },
    RuleSeed {
        role: PersonaRole::Debugger,
        kind: RuleKind::HardSwitch,
        condition: "When the user asks to debug, troubleshoot, verify, test, or audit",
    },
    RuleSeed {
        role: PersonaRole::Strategist,
        kind: RuleKind::HardSwitch,
        condition: "When the user needs decisions, options, tradeoffs, or strategy",
    },
    RuleSeed {
        role: PersonaRole::Writer,
        kind: RuleKind::HardSwitch,
        condition: "When the user needs external-facing writing or polished drafts",
    },
];

pub static METHODOLOGY_RULES: [RuleSeed; 2] = [
    RuleSeed {
        role: PersonaRole::Researcher,
        kind: RuleKind::Methodology,
        condition: "When the user asks for research across multiple sources",
    },
    RuleSeed {
        role: PersonaRole::Teacher,
        kind: RuleKind::Methodology,
        condition: "When the user asks for a deep explanation or wants to learn",
    },
];

/// Total number of rules a manifest carries.
pub fn rule_count() -> usize {
    HARD_SWITCH_RULES.len() + METHODOLOGY_RULES.len()
}

/// A rule ready to be created on the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDefinition {
    pub name: String,
    pub role: PersonaRole,
    pub kind: RuleKind,
    pub trigger_condition: String,
    /// Hard-switch instructions still contain `{{persona_id}}`.
    pub instruction_text: String,
}

impl RuleDefinition {
    fn from_seed(seed: &RuleSeed, prefix: &str, names: &PersonaNames) -> Self {
        let instruction_text = match seed.kind {
            RuleKind::HardSwitch => format!(
                "Call set_active_persona('{{{{{}}}}}') before substantive work.",
                PERSONA_ID_KEY
            ),
            RuleKind::Methodology => format!(
                "Load and apply the methodology from the {} prompt without switching persona.",
                names.get(seed.role)
            ),
        };

        Self {
            name: format!("{}: {} {}", prefix, seed.role.slug(), seed.kind.label()),
            role: seed.role,
            kind: seed.kind,
            trigger_condition: seed.condition.to_string(),
            instruction_text,
        }
    }

    /// Whether the instruction needs a persona id before it can be created.
    pub fn needs_persona_id(&self) -> bool {
        self.kind == RuleKind::HardSwitch
    }

    /// Instruction text with the persona id filled in.
    pub fn instruction_for(&self, persona_id: &str) -> String {
        let mut values = Substitutions::new();
        values.insert(PERSONA_ID_KEY.to_string(), persona_id.to_string());
        substitute(&self.instruction_text, &values)
    }
}

/// Hard-switch rules followed by methodology rules, every name prefixed.
pub fn build_rules(prefix: &str, names: &PersonaNames) -> Vec<RuleDefinition> {
    HARD_SWITCH_RULES
        .iter()
        .chain(METHODOLOGY_RULES.iter())
        .map(|seed| RuleDefinition::from_seed(seed, prefix, names))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables() {
        assert_eq!(HARD_SWITCH_RULES.len(), 4);
        assert_eq!(METHODOLOGY_RULES.len(), 2);
        assert_eq!(rule_count(), 6);
        assert!(HARD_SWITCH_RULES.iter().all(|r| r.kind == RuleKind::HardSwitch));
        assert!(METHODOLOGY_RULES.iter().all(|r| r.kind == RuleKind::Methodology));
    }

    #[test]
    fn test_rule_names_are_prefixed() {
        let rules = build_rules("zo", &PersonaNames::default());
        let names: Vec<_> = rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "zo: builder switch",
                "zo: debugger switch",
                "zo: strategist switch",
                "zo: writer switch",
                "zo: researcher methodology",
                "zo: teacher methodology",
            ]
        );
    }

    #[test]
    fn test_hard_switch_instruction_takes_persona_id() {
        let names = PersonaNames::from_lookup(|r| (r == PersonaRole::Builder).then_some("Forge"));
        let rules = build_rules("persona", &names);
        let builder = &rules[0];

        assert!(builder.needs_persona_id());
        assert_eq!(
            builder.instruction_text,
            "Call set_active_persona('{{persona_id}}') before substantive work."
        );
        assert_eq!(
            builder.instruction_for("per_123"),
            "Call set_active_persona('per_123') before substantive work."
        );
    }

    #[test]
    fn test_methodology_instruction_names_persona() {
        let names = PersonaNames::from_lookup(|r| (r == PersonaRole::Teacher).then_some("Sage"));
        let rules = build_rules("persona", &names);
        let teacher = rules.last().unwrap();

        assert!(!teacher.needs_persona_id());
        assert_eq!(
            teacher.instruction_for("ignored"),
            "Load and apply the methodology from the Sage prompt without switching persona."
        );
    }
}
