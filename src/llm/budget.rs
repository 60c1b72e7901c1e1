//! Context window budgeting.
//!
//! The completion endpoint rejects requests whose prompt plus response exceed
//! its context length. Token counts are approximated at 4 characters per
//! token, which is rough but errs conservatively enough in practice.

/// Hard ceiling on prompt + response tokens accepted by the endpoint.
pub const MAX_CONTEXT_TOKENS: usize = 4090;

/// Tokens reserved for the model's response.
pub const ESTIMATED_RESPONSE_TOKENS: usize = 300;

/// Rough character-per-token approximation.
pub const CHARS_PER_TOKEN: usize = 4;

/// Truncate a transcript so prompt overhead + transcript + response fit the
/// context window.
///
/// Keeps the leading characters of the transcript. The prefix bias matters:
/// the sale outcome and the representative's name tend to appear early in a
/// call, so cutting the tail loses the least signal.
pub fn truncate_transcript<'a>(transcript: &'a str, prompt_overhead: &str) -> &'a str {
    let overhead_tokens = prompt_overhead.len() / CHARS_PER_TOKEN;
    let tokens_left =
        MAX_CONTEXT_TOKENS.saturating_sub(overhead_tokens + ESTIMATED_RESPONSE_TOKENS);
    let char_budget = tokens_left * CHARS_PER_TOKEN;

    truncate_chars(transcript, char_budget)
}

/// Take the first `limit` characters, respecting UTF-8 boundaries.
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
