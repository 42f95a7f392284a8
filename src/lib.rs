pub mod calendar;
pub mod config;
pub mod error;
pub mod extraction;
pub mod schedule;
pub mod server;
pub mod startup;
