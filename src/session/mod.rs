pub mod machine;
pub mod result;
pub mod state;

pub use machine::{KeyInput, TestSettings, TypingTest};
pub use state::{EndReason, Phase, TestState};
