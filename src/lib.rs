//! Wellness coach: rule-based chat coach and dashboard content.

pub mod api;
pub mod chat;
pub mod coach;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod profile;
pub mod store;
