//! persona: LLM-backed simulated people that listen, think and talk.
//!
//! An [`AgentSpec`] describes who the persona is. A [`Persona`] turns what it
//! hears into [`PersonaAction`]s, one structured-output call per action, and a
//! [`World`] lets several personas hear each other.

pub mod action;
pub mod error;
pub mod persona;
pub mod prompt;
pub mod scenario;
pub mod spec;
pub mod world;

pub use action::{ActionKind, PersonaAction};
pub use error::PersonaError;
pub use persona::{Interaction, InteractionLine, Persona, MAX_ACTIONS_PER_ACT};
pub use spec::{AgentSpec, PersonaSpec};
pub use world::{World, WorldEvent};
