use ai_client::Message;
use credence_search::SearchContext;

/// System prompt that grounds the answer in freshly fetched search results.
pub fn grounding_prompt(context: &SearchContext) -> String {
    let query = &context.query;
    let results = context.render();
    format!(
        r#"You are answering with the help of a live web search that was just run for this question.

The user asked: "{query}"

=== WEB SEARCH RESULTS ===
{results}=== END OF SEARCH RESULTS ===

How to answer:
1. Read the result content above and answer from it. Summarize what the sources actually say.
2. Lead with a direct answer. Keep paragraphs to two or three sentences and use bullet points, numbered lists and **bold** key terms where they help.
3. Leave credibility scores out of the main answer.
4. Finish with a "**Sources & Credibility Ratings:**" section listing every source as:
   **[Source Number]: [Source Title]**
   - URL: [URL]
   - Credibility Score: [X]/100 [star rating]
   - Quality Breakdown: Domain=[X], Evidence=[X], Transparency=[X], Quality=[X]
5. Do not claim you lack internet access or real-time information. The results above are current."#
    )
}

/// Messages for one turn. With search context the model sees only the grounding
/// prompt and the latest question, so earlier "no internet" replies can't leak
/// in. Without it, the whole history is sent.
pub fn build_messages(
    history: &[Message],
    prompt: &str,
    context: Option<&SearchContext>,
) -> Vec<Message> {
    match context {
        Some(ctx) => vec![
            Message::system(grounding_prompt(ctx)),
            Message::user(prompt),
        ],
        None => history.to_vec(),
    }
}
