use std::fmt;
use std::sync::Arc;

use ai_client::{strip_code_blocks, truncate_chars, ChatModel, Message, StructuredOutput};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::action::{ActionKind, PersonaAction};
use crate::error::{PersonaError, Result};
use crate::prompt;
use crate::spec::AgentSpec;

/// Upper bound on actions per `act` call when the model never says DONE.
pub const MAX_ACTIONS_PER_ACT: usize = 6;

/// Interactions replayed to the model on each action, most recent last.
const CONTEXT_WINDOW: usize = 40;

/// An entry in a persona's interaction log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Heard {
        from: Option<String>,
        content: String,
    },
    Acted(PersonaAction),
}

/// A simulated person driven by a [`ChatModel`].
pub struct Persona {
    spec: AgentSpec,
    model: Arc<dyn ChatModel>,
    pending: Vec<Interaction>,
    log: Vec<Interaction>,
}

impl Persona {
    pub fn new(spec: AgentSpec, model: Arc<dyn ChatModel>) -> Self {
        Self {
            spec,
            model,
            pending: Vec::new(),
            log: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.persona.name
    }

    /// Raw persona field from the spec.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.spec.persona.get(key)
    }

    /// Queue a stimulus from outside the simulation (the user or a script).
    pub fn listen(&mut self, content: impl Into<String>) {
        self.pending.push(Interaction::Heard {
            from: None,
            content: content.into(),
        });
    }

    /// Queue something another agent said.
    pub fn listen_from(&mut self, from: impl Into<String>, content: impl Into<String>) {
        self.pending.push(Interaction::Heard {
            from: Some(from.into()),
            content: content.into(),
        });
    }

    pub fn has_pending_stimuli(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drop stimuli that have not been acted on yet.
    pub fn clear_stimulus(&mut self) {
        self.pending.clear();
    }

    /// Act on everything heard so far. Asks the model for one action at a
    /// time until it says DONE or the per-call cap is hit.
    pub async fn act(&mut self) -> Result<Vec<PersonaAction>> {
        self.log.append(&mut self.pending);

        let mut actions = Vec::new();
        for _ in 0..MAX_ACTIONS_PER_ACT {
            let action = self.next_action().await?;
            info!(
                agent = self.name(),
                kind = %action.kind,
                target = action.target.as_str(),
                preview = truncate_chars(&action.content, 80),
                "Persona acted"
            );

            let done = action.kind == ActionKind::Done;
            self.log.push(Interaction::Acted(action.clone()));
            actions.push(action);
            if done {
                return Ok(actions);
            }
        }

        warn!(
            agent = self.name(),
            cap = MAX_ACTIONS_PER_ACT,
            "Action cap reached without DONE"
        );
        Ok(actions)
    }

    pub async fn listen_and_act(&mut self, content: impl Into<String>) -> Result<Vec<PersonaAction>> {
        self.listen(content);
        self.act().await
    }

    /// The interaction log, oldest first.
    pub fn current_messages(&self) -> &[Interaction] {
        &self.log
    }

    /// Content of the most recent TALK, if any.
    pub fn last_talk(&self) -> Option<&str> {
        self.log.iter().rev().find_map(|i| match i {
            Interaction::Acted(a) if a.is_talk() => Some(a.content.as_str()),
            _ => None,
        })
    }

    /// The interaction log rendered for reading.
    pub fn pp_current_interactions(&self) -> String {
        self.log
            .iter()
            .map(|i| InteractionLine {
                agent: self.name(),
                interaction: i,
            })
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn next_action(&self) -> Result<PersonaAction> {
        let messages = self.messages();
        debug!(agent = self.name(), messages = messages.len(), "Requesting action");

        let json = self
            .model
            .complete_json(messages, "persona_action", PersonaAction::strict_schema())
            .await?;

        serde_json::from_str(strip_code_blocks(&json))
            .map_err(|e| PersonaError::Action(format!("{e}: {json}")))
    }

    fn messages(&self) -> Vec<Message> {
        let start = self.log.len().saturating_sub(CONTEXT_WINDOW);
        let mut messages = vec![Message::system(prompt::persona_system(&self.spec.persona))];

        for interaction in &self.log[start..] {
            messages.push(match interaction {
                Interaction::Heard {
                    from: Some(from),
                    content,
                } => Message::user(format!("{from} says: {content}")),
                Interaction::Heard { from: None, content } => Message::user(content.clone()),
                Interaction::Acted(action) => Message::assistant(
                    serde_json::to_string(action).unwrap_or_else(|_| action.content.clone()),
                ),
            });
        }

        if matches!(self.log.last(), Some(Interaction::Acted(_)) | None) {
            messages.push(Message::user(prompt::NEXT_ACTION));
        }
        messages
    }
}

/// One interaction as seen from `agent`'s side.
pub struct InteractionLine<'a> {
    pub agent: &'a str,
    pub interaction: &'a Interaction,
}

impl fmt::Display for InteractionLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.interaction {
            Interaction::Heard { from, content } => {
                let from = from.as_deref().unwrap_or("USER");
                write!(f, "{from} --> {}: [CONVERSATION]\n  > {content}", self.agent)
            }
            Interaction::Acted(action) => {
                write!(f, "{} acts: [{}]", self.agent, action.kind)?;
                if !action.target.is_empty() {
                    write!(f, " -> {}", action.target)?;
                }
                if !action.content.is_empty() {
                    write!(f, "\n  > {}", action.content)?;
                }
                Ok(())
            }
        }
    }
}
