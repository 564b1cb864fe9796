// Role ledger: activity-based evaluation with warning/grace semantics, plus
// application of resolved role appeals. Counts come from the review_activity
// event log, never a stored counter.

pub mod appeal;
pub mod evaluation;
pub mod handlers;
