//! User profile snapshot consumed by the coach and dashboard.

pub mod model;

pub use model::{BmiBand, FALLBACK_NAME, Gender, Profile};
