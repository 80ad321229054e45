//! Chat sessions: transcript state and turn orchestration.

pub mod session;
pub mod transcript;

pub use session::{
    CHAT_POINTS, CHAT_POINTS_DESCRIPTION, CHAT_POINTS_SOURCE, ChatSession, SessionOptions, TurnOutcome,
};
pub use transcript::{Role, Transcript, TranscriptEntry};
