// Job discovery pipeline.
// Flow: per-source fetch -> skill extraction -> in-batch dedup -> storage
// duplicate check -> persist. Scoring is a separate, explicit operation.

pub mod dedup;
pub mod handlers;
pub mod normalize;
pub mod orchestrator;
pub mod skills;
pub mod sources;
