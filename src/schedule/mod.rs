pub mod builder;
pub mod models;
pub mod recurrence;
pub mod resolver;
