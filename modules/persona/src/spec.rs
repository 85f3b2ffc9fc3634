//! Agent specification files (`*.agent.json`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::error::{PersonaError, Result};

const SPEC_SUFFIX: &str = ".agent.json";

fn default_kind() -> String {
    "TinyPerson".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    pub persona: PersonaSpec,
}

/// The persona block. Only the name is required; every other key the spec
/// author wrote is kept as-is and shown to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaSpec {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AgentSpec {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PersonaError::SpecRead {
            path: path.to_path_buf(),
            source,
        })?;
        let spec: AgentSpec =
            serde_json::from_str(&text).map_err(|source| PersonaError::SpecParse {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), name = spec.persona.name.as_str(), "Loaded agent spec");
        Ok(spec)
    }

    /// Every `*.agent.json` in `dir`, sorted by file name.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<AgentSpec>> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| PersonaError::SpecRead {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(SPEC_SUFFIX))
            })
            .collect();
        paths.sort();

        paths.iter().map(AgentSpec::load).collect()
    }

    /// Find an agent by file path, by full name, or by first name. Lisa is
    /// always available; other names are looked up in `agents_dir`.
    pub fn resolve(name_or_path: &str, agents_dir: impl AsRef<Path>) -> Result<Self> {
        let as_path = Path::new(name_or_path);
        if as_path.is_file() {
            return Self::load(as_path);
        }

        let lisa = Self::lisa();
        if lisa.answers_to(name_or_path) {
            return Ok(lisa);
        }

        let agents_dir = agents_dir.as_ref();
        if agents_dir.is_dir() {
            if let Some(spec) = Self::load_dir(agents_dir)?
                .into_iter()
                .find(|s| s.answers_to(name_or_path))
            {
                return Ok(spec);
            }
        }

        Err(PersonaError::UnknownAgent(name_or_path.to_string()))
    }

    fn answers_to(&self, name: &str) -> bool {
        let wanted = name.trim().to_lowercase();
        let full = self.persona.name.to_lowercase();
        full == wanted || full.split_whitespace().next() == Some(wanted.as_str())
    }

    /// The built-in example persona.
    pub fn lisa() -> Self {
        let extra = [
            ("age", serde_json::json!(28)),
            ("nationality", serde_json::json!("Canadian")),
            ("residence", serde_json::json!("USA")),
            (
                "occupation",
                serde_json::json!({
                    "title": "Data Scientist",
                    "organization": "Microsoft, M365 Search Team",
                    "description": "You are a data scientist working on the M365 Search team. You analyze \
                        user behavior and feedback data to improve the relevance and quality of \
                        search results, build and test machine learning models for search \
                        scenarios, and communicate your findings to engineers, designers and \
                        product managers."
                }),
            ),
            (
                "personality",
                serde_json::json!({
                    "traits": [
                        "You are curious and love to learn new things.",
                        "You are analytical and like to solve problems.",
                        "You are friendly and enjoy working with others.",
                        "You don't give up easily, and always try to find a solution, though you can get frustrated when things don't work as expected."
                    ]
                }),
            ),
            (
                "preferences",
                serde_json::json!({
                    "interests": [
                        "Artificial intelligence and machine learning.",
                        "Natural language processing.",
                        "Cooking and trying new recipes.",
                        "Playing the piano.",
                        "Watching movies, especially comedies and thrillers."
                    ]
                }),
            ),
            (
                "skills",
                serde_json::json!([
                    "You are proficient in Python, and use it for most of your work.",
                    "You can use tools like Jupyter Notebook, PyTorch, TensorFlow and Azure ML.",
                    "You are familiar with SQL and Power BI, but struggle with R."
                ]),
            ),
            (
                "other_facts",
                serde_json::json!([
                    "You grew up in Vancouver, Canada, and moved to the US for your master's degree in computer science.",
                    "Your parents are both teachers, and encouraged you to pursue your interests in science and technology.",
                    "You have a cat named Mittens and live in a small apartment in Seattle with a view of the lake."
                ]),
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        AgentSpec {
            kind: default_kind(),
            persona: PersonaSpec {
                name: "Lisa Carter".to_string(),
                extra,
            },
        }
    }
}

impl PersonaSpec {
    /// Raw value of a persona field, e.g. `get("occupation")`.
    pub fn get(&self, key: &str) -> Option<Value> {
        if key == "name" {
            return Some(Value::String(self.name.clone()));
        }
        self.extra.get(key).cloned()
    }

    /// `occupation.title`, or the occupation itself when written as a plain
    /// string. Empty when neither is present.
    pub fn title(&self) -> &str {
        match self.extra.get("occupation") {
            Some(Value::String(title)) => title,
            Some(Value::Object(occupation)) => occupation
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or(""),
            _ => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let spec: AgentSpec = serde_json::from_str(
            r#"{"type":"TinyPerson","persona":{"name":"Pat","big_five":{"openness":"high"}}}"#,
        )
        .unwrap();
        assert_eq!(spec.persona.get("big_five").unwrap()["openness"], "high");
        assert!(spec.persona.get("age").is_none());

        let back = serde_json::to_value(&spec).unwrap();
        assert_eq!(back["persona"]["big_five"]["openness"], "high");
        assert_eq!(back["type"], "TinyPerson");
    }

    #[test]
    fn type_defaults_when_missing() {
        let spec: AgentSpec = serde_json::from_str(r#"{"persona":{"name":"Pat"}}"#).unwrap();
        assert_eq!(spec.kind, "TinyPerson");
    }

    #[test]
    fn lisa_is_a_data_scientist() {
        let lisa = AgentSpec::lisa();
        assert_eq!(lisa.persona.name, "Lisa Carter");
        assert_eq!(lisa.persona.title(), "Data Scientist");
        assert_eq!(lisa.persona.get("age"), Some(Value::from(28)));
        assert!(lisa.persona.extra.contains_key("personality"));
    }

    #[test]
    fn loose_field_shapes_are_accepted() {
        let spec: AgentSpec = serde_json::from_str(
            r#"{"persona":{"name":"Oscar","age":"thirty","occupation":"Architect"}}"#,
        )
        .unwrap();
        assert_eq!(spec.persona.title(), "Architect");
        assert_eq!(spec.persona.get("age"), Some(Value::from("thirty")));

        let spec: AgentSpec =
            serde_json::from_str(r#"{"persona":{"name":"Nell","occupation":{"organization":"Acme"}}}"#)
                .unwrap();
        assert_eq!(spec.persona.title(), "");
    }

    #[test]
    fn answers_to_first_or_full_name() {
        let lisa = AgentSpec::lisa();
        assert!(lisa.answers_to("lisa"));
        assert!(lisa.answers_to("Lisa Carter"));
        assert!(!lisa.answers_to("carter"));
    }
}
