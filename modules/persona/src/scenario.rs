//! Scripted runs behind the `persona-chat` subcommands.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use ai_client::ChatModel;
use anyhow::{Context, Result};
use tracing::info;

use crate::action::PersonaAction;
use crate::persona::{Interaction, InteractionLine, Persona};
use crate::spec::AgentSpec;
use crate::world::World;

pub const INTRO_PROMPT: &str = "Tell me about your life.";

pub const NO_RESPONSE: &str = "I apologize, but I couldn't generate a response at this time.";

const RULE: &str =
    "======================================================================";

/// Print a batch of actions the way the interaction log renders them.
pub fn print_actions(out: &mut impl Write, agent: &str, actions: &[PersonaAction]) -> Result<()> {
    for action in actions {
        let interaction = Interaction::Acted(action.clone());
        writeln!(
            out,
            "{}",
            InteractionLine {
                agent,
                interaction: &interaction,
            }
        )?;
    }
    Ok(())
}

/// Lisa answers a single opening question.
pub async fn intro(model: Arc<dyn ChatModel>, out: &mut impl Write) -> Result<()> {
    let mut lisa = Persona::new(AgentSpec::lisa(), model);
    let actions = lisa.listen_and_act(INTRO_PROMPT).await?;
    writeln!(out, "USER --> {}: [CONVERSATION]\n  > {INTRO_PROMPT}", lisa.name())?;
    print_actions(out, lisa.name(), &actions)?;
    Ok(())
}

/// One turn of the interactive chat.
pub async fn chat_turn(persona: &mut Persona, input: &str, out: &mut impl Write) -> Result<()> {
    let actions = persona.listen_and_act(input).await?;
    writeln!(out)?;
    print_actions(out, persona.name(), &actions)?;
    writeln!(out)?;
    Ok(())
}

/// Single question, single answer: the persona's last TALK, or an apology.
pub async fn ask(persona: &mut Persona, question: &str) -> Result<String> {
    persona.clear_stimulus();
    let actions = persona.listen_and_act(question).await?;
    let answer = actions
        .iter()
        .rev()
        .find(|a| a.is_talk())
        .map(|a| a.content.clone())
        .unwrap_or_else(|| NO_RESPONSE.to_string());
    Ok(answer)
}

/// The two customer service representatives and the four scripted prompts.
pub struct TeamScript {
    pub first: &'static str,
    pub second: &'static str,
    pub interactions: [(&'static str, &'static str, &'static str); 4],
}

pub const CUSTOMER_SERVICE: TeamScript = TeamScript {
    first: "Sunny Martinez",
    second: "Alex Chen",
    interactions: [
        (
            "INTERACTION 1: Sunny initiates",
            "SUNNY'S PERSPECTIVE",
            "Hi Alex! I just had a really challenging call with a frustrated customer who received a broken product. How do you usually handle those situations? I tried to stay positive but they were pretty upset!",
        ),
        (
            "INTERACTION 2: Alex responds",
            "ALEX'S PERSPECTIVE",
            "Sunny asked me about handling frustrated customers with defective products. I should share my systematic approach.",
        ),
        (
            "INTERACTION 3: Sunny's reaction",
            "SUNNY'S FOLLOW-UP",
            "Alex just shared his approach. Respond to his method and share how your approach might differ in terms of emotional support.",
        ),
        (
            "INTERACTION 4: Alex's final perspective",
            "ALEX'S FINAL THOUGHTS",
            "Sunny mentioned emotional support. Respond with your thoughts on balancing efficiency with empathy.",
        ),
    ],
};

/// Load the team from `agents_dir`, run the scripted discussion and print
/// the evaluation checklist.
pub async fn team(
    model: Arc<dyn ChatModel>,
    agents_dir: &Path,
    out: &mut impl Write,
) -> Result<World> {
    let script = &CUSTOMER_SERVICE;

    writeln!(out, "{RULE}\nCUSTOMER SERVICE BOT SIMULATION\n{RULE}")?;
    let sunny = AgentSpec::resolve(script.first, agents_dir)
        .with_context(|| format!("Loading {} from {}", script.first, agents_dir.display()))?;
    let alex = AgentSpec::resolve(script.second, agents_dir)
        .with_context(|| format!("Loading {} from {}", script.second, agents_dir.display()))?;

    writeln!(out, "\nPersonas loaded:")?;
    for spec in [&sunny, &alex] {
        writeln!(out, "  - {}: {}", spec.persona.name, spec.persona.title())?;
    }

    let mut world = World::new(
        "Customer Service Team Room",
        vec![
            Persona::new(sunny, model.clone()),
            Persona::new(alex, model),
        ],
    );
    world.make_everyone_accessible();

    writeln!(out, "\n{RULE}\nCUSTOMER SERVICE TEAM DISCUSSION SIMULATION\n{RULE}")?;
    writeln!(
        out,
        "\nScenario: Two customer service representatives discuss handling\na frustrated customer who received a defective product.\n"
    )?;

    for (i, (heading, perspective, stimulus)) in script.interactions.iter().enumerate() {
        // Sunny opens, then they alternate.
        let listener = if i % 2 == 0 { script.first } else { script.second };

        writeln!(out, "\n--- {heading} ---")?;
        world
            .agent_mut(listener)
            .with_context(|| format!("{listener} is not in the world"))?
            .listen(*stimulus);

        let events = world.run(2).await?;
        info!(interaction = i + 1, actions = events.len(), "Scripted interaction finished");

        writeln!(out, "\n[{perspective}]")?;
        let agent = world
            .agent(listener)
            .with_context(|| format!("{listener} is not in the world"))?;
        writeln!(out, "{}", agent.pp_current_interactions())?;
    }

    writeln!(out, "\n{RULE}\nSIMULATION COMPLETE\n{RULE}")?;
    writeln!(out, "{EVALUATION_CHECKLIST}")?;
    Ok(world)
}

pub const EVALUATION_CHECKLIST: &str = "
======================================================================
CONVERSATION QUALITY EVALUATION
======================================================================

1. NATURALNESS: does the conversation flow like real dialogue?
   - Look for: natural transitions, acknowledgments, questions
   - Red flags: robotic responses, unnatural phrasing

2. PERSONALITY CONSISTENCY: did each persona keep its character?
   - Sunny: enthusiasm, positivity, empathy, warmth
   - Alex: professionalism, efficiency, directness, logic
   - Red flags: out-of-character statements, personality shifts

3. DEPTH OF INSIGHTS: how good is the advice?
   - Look for: specific strategies, nuanced understanding, expertise
   - Red flags: generic advice, surface-level responses

4. DIVERSITY OF APPROACHES: do the personas respond differently?
   - Expected: clearly distinct approaches based on personality
   - Red flags: similar responses despite different personas

5. CONTEXTUAL COHERENCE: do responses build on earlier messages?
   - Look for: references to prior statements, logical progression
   - Red flags: ignoring context, repetitive points

Manual review:
- Which persona was more convincing, and why?
- Where did the simulation feel less realistic?
- Did personality differences lead to different insights?
- Would these personas be useful for customer service training?
======================================================================";
