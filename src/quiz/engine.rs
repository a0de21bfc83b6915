use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::session::{QuizError, QuizSession, Submission, Tick, Trigger};
use crate::telemetry::ANSWER_CNTR;

pub type SharedQuiz = Arc<Mutex<QuizSession>>;

/// Drives quiz sessions: enters questions, runs their countdowns and advances on submission.
#[derive(Clone, Copy, Debug)]
pub struct QuizEngine {
    question_seconds: u32,
    tick: Duration,
}

impl QuizEngine {
    pub fn new(question_seconds: u32) -> Self {
        Self {
            question_seconds,
            tick: Duration::from_secs(1),
        }
    }

    pub fn question_seconds(&self) -> u32 {
        self.question_seconds
    }

    pub async fn begin(&self, session: QuizSession) -> SharedQuiz {
        let quiz = Arc::new(Mutex::new(session));
        {
            let mut session = quiz.lock().await;
            self.enter(&quiz, &mut session);
        }
        quiz
    }

    pub async fn select(
        &self,
        quiz: &SharedQuiz,
        question: usize,
        answer: usize,
    ) -> Result<(), QuizError> {
        quiz.lock().await.select(question, answer)
    }

    /// Submits `question` on behalf of the Next button.
    pub async fn next(&self, quiz: &SharedQuiz, question: usize) -> Result<Submission, QuizError> {
        let mut session = quiz.lock().await;
        let submission = session.submit(question, Trigger::Next)?;
        record(&submission);
        self.enter(quiz, &mut session);
        Ok(submission)
    }

    pub async fn restart(&self, quiz: &SharedQuiz) {
        let mut session = quiz.lock().await;
        session.restart();
        self.enter(quiz, &mut session);
    }

    /// Stops the countdown of a quiz that is being thrown away.
    pub async fn discard(&self, quiz: &SharedQuiz) {
        quiz.lock().await.stop();
    }

    fn enter(&self, quiz: &SharedQuiz, session: &mut QuizSession) {
        let Some(question) = session.enter(self.question_seconds) else {
            tracing::debug!("Quiz finished with score {}", session.score());
            return;
        };
        let ticker = tokio::spawn(run_ticker(*self, quiz.clone(), question));
        session.attach_ticker(question, ticker.abort_handle());
    }
}

async fn run_ticker(engine: QuizEngine, quiz: SharedQuiz, question: usize) {
    let mut interval = interval_at(Instant::now() + engine.tick, engine.tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let mut session = quiz.lock().await;
        match session.tick(question) {
            Tick::Running(_) => {}
            Tick::Expired => {
                match session.submit(question, Trigger::Timeout) {
                    Ok(submission) => {
                        record(&submission);
                        engine.enter(&quiz, &mut session);
                    }
                    Err(err) => tracing::debug!("Timer lost the race: {err}"),
                }
                return;
            }
            Tick::Stale => return,
        }
    }
}

fn record(submission: &Submission) {
    let outcome = match (submission.answer, submission.correct) {
        (None, _) => "unanswered",
        (Some(_), true) => "correct",
        (Some(_), false) => "incorrect",
    };
    ANSWER_CNTR.with_label_values(&[outcome]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::question::{Category, Question};
    use crate::quiz::session::Phase;

    fn quiz(n: usize) -> QuizSession {
        let questions = (0..n)
            .map(|i| Question::new(format!("Q{i}"), vec!["a".into(), "b".into()], 1))
            .collect();
        QuizSession::new(Category::Any, questions)
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_ticks_every_second() {
        let engine = QuizEngine::new(15);
        let quiz = engine.begin(quiz(2)).await;
        assert_eq!(quiz.lock().await.clock().unwrap().remaining(), 15);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let session = quiz.lock().await;
        assert_eq!(session.clock().unwrap().remaining(), 12);
        assert_eq!(session.current_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_submits_the_pending_selection() {
        let engine = QuizEngine::new(15);
        let quiz = engine.begin(quiz(2)).await;
        engine.select(&quiz, 0, 1).await.unwrap();

        tokio::time::sleep(Duration::from_millis(15_500)).await;
        let session = quiz.lock().await;
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.score(), 1);
        assert_eq!(session.questions()[0].user_answer, Some(1));
        let clock = session.clock().unwrap();
        assert_eq!(clock.question(), 1);
        assert_eq!(clock.remaining(), 15);
        assert!(clock.has_ticker());
    }

    #[tokio::test(start_paused = true)]
    async fn timer_runs_the_whole_quiz_out() {
        let engine = QuizEngine::new(2);
        let quiz = engine.begin(quiz(3)).await;

        tokio::time::sleep(Duration::from_millis(6_500)).await;
        let session = quiz.lock().await;
        assert!(session.is_finished());
        assert_eq!(session.score(), 0);
        assert!(session.questions().iter().all(|q| q.user_answer.is_none()));
    }

    #[tokio::test(start_paused = true)]
    async fn next_cancels_the_countdown() {
        let engine = QuizEngine::new(15);
        let quiz = engine.begin(quiz(2)).await;
        tokio::time::sleep(Duration::from_millis(10_500)).await;

        engine.select(&quiz, 0, 1).await.unwrap();
        let submission = engine.next(&quiz, 0).await.unwrap();
        assert!(submission.correct);

        // The first countdown would have expired at 15s; question 1 must keep its full time.
        tokio::time::sleep(Duration::from_millis(6_200)).await;
        let session = quiz.lock().await;
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.clock().unwrap().remaining(), 9);
        assert_eq!(session.score(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn late_next_after_expiry_is_rejected() {
        let engine = QuizEngine::new(15);
        let quiz = engine.begin(quiz(3)).await;
        tokio::time::sleep(Duration::from_millis(15_500)).await;

        assert_eq!(engine.next(&quiz, 0).await, Err(QuizError::Stale(0)));
        let session = quiz.lock().await;
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.clock().unwrap().phase(), Phase::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_resets_and_restarts_the_clock() {
        let engine = QuizEngine::new(15);
        let quiz = engine.begin(quiz(2)).await;
        engine.select(&quiz, 0, 1).await.unwrap();
        engine.next(&quiz, 0).await.unwrap();
        engine.next(&quiz, 1).await.unwrap();
        assert!(quiz.lock().await.is_finished());

        engine.restart(&quiz).await;
        {
            let session = quiz.lock().await;
            assert_eq!(session.current_index(), 0);
            assert_eq!(session.score(), 0);
            assert_eq!(session.clock().unwrap().remaining(), 15);
        }
        tokio::time::sleep(Duration::from_millis(15_500)).await;
        assert_eq!(quiz.lock().await.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn discard_stops_the_countdown() {
        let engine = QuizEngine::new(15);
        let quiz = engine.begin(quiz(2)).await;
        engine.discard(&quiz).await;

        tokio::time::sleep(Duration::from_secs(20)).await;
        let session = quiz.lock().await;
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.clock().unwrap().remaining(), 15);
        assert!(!session.clock().unwrap().has_ticker());
    }
}
