//! Scenario registry.
//!
//! A fixed table of scenarios, each reproducing one class of reference
//! ambiguity for the gate. `context` is the literal payload sent to the
//! service; `prompt` is only ever displayed.

/// Id used whenever a requested scenario is not registered.
pub const DEFAULT_SCENARIO_ID: &str = "bird_missing_v1";

/// Kind of unresolved reference a scenario exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbiguityClass {
    /// A referring expression with two candidate antecedents.
    Anaphora,
    /// A prepositional phrase that can attach to the verb or the noun.
    Attachment,
    /// A pronoun whose antecedent depends on a causal discourse cue.
    ImplicitCausality,
}

impl std::fmt::Display for AmbiguityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AmbiguityClass::Anaphora => write!(f, "anaphora"),
            AmbiguityClass::Attachment => write!(f, "pp-attachment"),
            AmbiguityClass::ImplicitCausality => write!(f, "implicit-causality"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Scenario {
    pub id: &'static str,
    pub class: AmbiguityClass,
    pub prompt: &'static str,
    pub context: &'static [&'static str],
}

static SCENARIOS: &[Scenario] = &[
    Scenario {
        id: "bird_missing_v1",
        class: AmbiguityClass::Anaphora,
        prompt: "James has a bird.\nJenny has a bird.\nThe bird is missing.\n\nWhere is the bird?",
        context: &[
            "James has a bird.",
            "Jenny has a bird.",
            "The bird is missing.",
        ],
    },
    Scenario {
        id: "telescope_v1",
        class: AmbiguityClass::Attachment,
        prompt: "I saw the man with the telescope.",
        context: &["I saw the man with the telescope."],
    },
    Scenario {
        id: "trophy_v1",
        class: AmbiguityClass::ImplicitCausality,
        prompt: "The trophy didn't fit in the suitcase because it was too small.",
        context: &["The trophy didn't fit in the suitcase because it was too small."],
    },
];

/// All registered scenarios, in display order.
pub fn all() -> &'static [Scenario] {
    SCENARIOS
}

/// Whether `id` names a registered scenario.
pub fn is_registered(id: &str) -> bool {
    SCENARIOS.iter().any(|s| s.id == id)
}

/// Total lookup: unknown ids resolve to the default scenario.
pub fn lookup(id: &str) -> &'static Scenario {
    SCENARIOS
        .iter()
        .find(|s| s.id == id)
        .unwrap_or_else(default_scenario)
}

fn default_scenario() -> &'static Scenario {
    // DEFAULT_SCENARIO_ID is the first table entry
    &SCENARIOS[0]
}
