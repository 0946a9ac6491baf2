mod controller;
mod phase;
mod snapshot;

// Public API of the session subsystem.
pub use controller::{QuizSessionController, SessionObserver};
pub use phase::{Ignored, QuizPhase, Step};
pub use snapshot::{Failure, FailureKind, QuizSnapshot};
