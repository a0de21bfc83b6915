pub mod catalog;
pub mod engine;
pub mod grade;
pub mod question;
pub mod session;
pub mod source;

pub use engine::{QuizEngine, SharedQuiz};
pub use grade::{Grade, QuizResult};
pub use question::{decode, Category, Difficulty, Media, MediaKind, Question};
pub use session::{QuizError, QuizSession, Submission, Trigger};
pub use source::{acquire_questions, OpenTdb, TriviaError, TriviaSource};
