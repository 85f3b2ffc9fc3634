//! A shared room where personas hear each other.

use std::collections::HashSet;

use tracing::info;

use crate::action::PersonaAction;
use crate::error::Result;
use crate::persona::Persona;

/// One action taken during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldEvent {
    pub step: usize,
    pub agent: String,
    pub action: PersonaAction,
}

pub struct World {
    pub name: String,
    agents: Vec<Persona>,
    // (speaker, listener) index pairs.
    access: HashSet<(usize, usize)>,
}

impl World {
    pub fn new(name: impl Into<String>, agents: Vec<Persona>) -> Self {
        Self {
            name: name.into(),
            agents,
            access: HashSet::new(),
        }
    }

    pub fn make_everyone_accessible(&mut self) {
        let n = self.agents.len();
        self.access = (0..n)
            .flat_map(|a| (0..n).filter(move |&b| b != a).map(move |b| (a, b)))
            .collect();
    }

    pub fn agent(&self, name: &str) -> Option<&Persona> {
        self.index_of(name).map(|i| &self.agents[i])
    }

    pub fn agent_mut(&mut self, name: &str) -> Option<&mut Persona> {
        self.index_of(name).map(move |i| &mut self.agents[i])
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.agents.iter().position(|a| {
            let full = a.name().to_lowercase();
            full == wanted || full.split_whitespace().next() == Some(wanted.as_str())
        })
    }

    /// Run `steps` rounds. In each round every agent acts in order, and its
    /// TALKs are delivered before the next agent acts: to the named target when
    /// that agent can hear the speaker, else to everyone who can.
    pub async fn run(&mut self, steps: usize) -> Result<Vec<WorldEvent>> {
        let mut events = Vec::new();

        for step in 0..steps {
            info!(world = self.name.as_str(), step, "World step");

            for speaker in 0..self.agents.len() {
                let actions = self.agents[speaker].act().await?;
                let speaker_name = self.agents[speaker].name().to_string();

                for action in actions {
                    if action.is_talk() {
                        self.deliver(speaker, &speaker_name, &action);
                    }
                    events.push(WorldEvent {
                        step,
                        agent: speaker_name.clone(),
                        action,
                    });
                }
            }
        }

        Ok(events)
    }

    fn deliver(&mut self, speaker: usize, speaker_name: &str, action: &PersonaAction) {
        let targeted = self
            .index_of(&action.target)
            .filter(|&t| self.access.contains(&(speaker, t)));

        let listeners: Vec<usize> = match targeted {
            Some(t) => vec![t],
            None => (0..self.agents.len())
                .filter(|&l| self.access.contains(&(speaker, l)))
                .collect(),
        };

        for l in listeners {
            self.agents[l].listen_from(speaker_name, action.content.clone());
        }
    }
}
