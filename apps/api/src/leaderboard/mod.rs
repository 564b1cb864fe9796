// Derived read views: analyst accuracy/ranking and box-office charts.
// Advisory display data; reads are not linearizable with concurrent writes.

pub mod analysts;
pub mod boxoffice;
pub mod handlers;
pub mod window;
