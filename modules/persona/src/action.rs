use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What a persona does next. THINK is private and never delivered to other
/// agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    Talk,
    Think,
    Done,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionKind::Talk => "TALK",
            ActionKind::Think => "THINK",
            ActionKind::Done => "DONE",
        };
        f.write_str(s)
    }
}

/// One step a persona takes. Requested from the model as strict structured output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PersonaAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// What is said or thought. Empty for DONE.
    pub content: String,
    /// Who a TALK is addressed to. Empty when addressing whoever is present.
    pub target: String,
}

impl PersonaAction {
    pub fn talk(content: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Talk,
            content: content.into(),
            target: target.into(),
        }
    }

    pub fn think(content: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Think,
            content: content.into(),
            target: String::new(),
        }
    }

    pub fn done() -> Self {
        Self {
            kind: ActionKind::Done,
            content: String::new(),
            target: String::new(),
        }
    }

    pub fn is_talk(&self) -> bool {
        self.kind == ActionKind::Talk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_client::StructuredOutput;

    #[test]
    fn wire_format_uses_uppercase_kinds() {
        let action: PersonaAction =
            serde_json::from_str(r#"{"type":"TALK","content":"Hi!","target":"Alex Chen"}"#)
                .unwrap();
        assert_eq!(action, PersonaAction::talk("Hi!", "Alex Chen"));
        assert_eq!(
            serde_json::to_value(PersonaAction::done()).unwrap()["type"],
            "DONE"
        );
    }

    #[test]
    fn schema_is_strict() {
        let schema = PersonaAction::strict_schema();
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["required"].as_array().unwrap().len(), 3);
        let kinds = schema["properties"]["type"].to_string();
        assert!(kinds.contains("TALK") && kinds.contains("THINK") && kinds.contains("DONE"));
        // Kinds stay a flat string enum.
        assert!(!kinds.contains("oneOf"));
    }
}
