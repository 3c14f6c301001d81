/// Single instruction string sent as the user message
///
/// Context and query are inserted verbatim. An empty `context` leaves the DATA
/// block empty and the model answers from its own knowledge.
pub fn build_prompt(context: &str, query: &str) -> String {
    format!(
        "
You are Travel Guide Chatbot.

Use this DATA if relevant:
{context}

Rules:
- Simple English
- Friendly
- If city mentioned, explain using dataset first
- If not found in dataset, answer normally
- Help with hotels, trips, tourist places

User Question:
{query}
"
    )
}
