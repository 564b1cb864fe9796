// Flag/report engine. Both record kinds share the same state-machine shape:
// Pending on creation, exactly one terminal resolution, guarded against the
// record's current status so concurrent resolvers cannot both win.

pub mod flags;
pub mod handlers;
pub mod reasons;
pub mod reports;
