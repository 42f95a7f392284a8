pub mod client;
pub mod token;

pub use client::{CalendarApi, GoogleCalendarClient};
