mod classify;
mod machine;
mod state;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use machine::PracticeSession;
pub use state::{PracticeMode, SessionSnapshot};
