//! System prompt for relayed chat requests
//!
//! Every conversation forwarded to the completion gateway is prefixed with
//! the same system prompt; users only supply the message history.

/// Builds the system prompt sent with every chat completion
///
/// # Examples
///
/// ```
/// use chatrelay::prompts::build_system_prompt;
///
/// let prompt = build_system_prompt();
/// assert!(prompt.contains("assistant"));
/// ```
pub fn build_system_prompt() -> String {
    "You are a helpful assistant embedded in a browser chat application. \
Answer the user's questions directly and concisely. Format answers in \
Markdown when structure helps, and include code blocks with language tags \
for any code. If a question is ambiguous, ask for clarification instead of \
guessing."
        .to_string()
}
