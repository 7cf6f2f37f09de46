mod answer;
mod category;
mod ids;
mod ledger;
mod question;
mod settings;

pub use answer::{AnswerChoice, AnswerParseError};
pub use category::{Category, CategoryError};
pub use ids::{ParseIdError, QuestionId};
pub use ledger::{AnswerLedger, AnswerRecord};
pub use question::{Question, QuestionBank, QuestionError};
pub use settings::{QuizSettings, SettingsError};
