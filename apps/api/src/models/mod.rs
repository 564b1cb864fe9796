pub mod analyst;
pub mod flag;
pub mod movie;
pub mod prediction;
pub mod report;
pub mod user;
