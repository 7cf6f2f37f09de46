#![forbid(unsafe_code)]

pub mod error;
pub mod selection;
pub mod sessions;
pub mod stats;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{SessionError, StatsError};
pub use selection::{select_by_category, select_random, select_unanswered, select_weak};
pub use sessions::{
    AnswerOutcome, QuizLoopService, QuizSession, SelectionPolicy, SessionProgress, SessionState,
    Submission,
};
pub use stats::{CategoryStats, Coverage, OverallStats, StatsService};
