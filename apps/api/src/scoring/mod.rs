// Relevance scoring: one LLM call per job + profile pair, with a neutral
// fallback whenever the call cannot produce four valid scores.

pub mod handlers;
pub mod prompts;
pub mod relevance;
