use thiserror::Error;
use tokio::task::AbortHandle;

use super::grade::QuizResult;
use super::question::{Category, Question};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuizError {
    #[error("question {0} is not the current question")]
    Stale(usize),

    #[error("question {0} was already submitted")]
    AlreadySubmitted(usize),

    #[error("answer {answer} is out of range for question {question}")]
    InvalidAnswer { question: usize, answer: usize },

    #[error("no quiz in progress")]
    NoQuiz,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Active,
    Submitting,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Next,
    Timeout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Running(u32),
    Expired,
    /// The ticker outlived its question and should stop.
    Stale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Submission {
    pub question: usize,
    pub answer: Option<usize>,
    pub correct: bool,
    pub trigger: Trigger,
}

/// Countdown and pending selection of the question on screen.
#[derive(Debug)]
pub struct QuestionClock {
    question: usize,
    remaining: u32,
    phase: Phase,
    selection: Option<usize>,
    ticker: Option<AbortHandle>,
}

impl QuestionClock {
    fn new(question: usize, seconds: u32, selection: Option<usize>) -> Self {
        Self {
            question,
            remaining: seconds,
            phase: Phase::Active,
            selection,
            ticker: None,
        }
    }

    pub fn question(&self) -> usize {
        self.question
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn has_ticker(&self) -> bool {
        self.ticker.is_some()
    }

    /// Counting down for `question`, not yet submitted.
    pub fn is_active_for(&self, question: usize) -> bool {
        self.question == question && self.phase == Phase::Active
    }

    /// Handle is taken out, so a ticker is never aborted twice.
    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

#[derive(Debug)]
pub struct QuizSession {
    category: Category,
    questions: Vec<Question>,
    current: usize,
    score: usize,
    clock: Option<QuestionClock>,
}

impl QuizSession {
    pub fn new(category: Category, questions: Vec<Question>) -> Self {
        Self {
            category,
            questions,
            current: 0,
            score: 0,
            clock: None,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.questions.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// Clock of the current question, if it has been entered.
    pub fn clock(&self) -> Option<&QuestionClock> {
        self.clock
            .as_ref()
            .filter(|clock| clock.question == self.current)
    }

    pub fn result(&self) -> QuizResult {
        QuizResult::new(self.score, self.total())
    }

    /// Starts the countdown for the current question. Returns its index, or `None` once finished.
    /// An answer recorded in an earlier play comes back as the pending selection.
    pub(crate) fn enter(&mut self, seconds: u32) -> Option<usize> {
        self.stop();
        let selection = self.current_question()?.user_answer;
        self.clock = Some(QuestionClock::new(self.current, seconds, selection));
        Some(self.current)
    }

    pub(crate) fn attach_ticker(&mut self, question: usize, ticker: AbortHandle) {
        match self.clock.as_mut() {
            Some(clock) if clock.is_active_for(question) && clock.ticker.is_none() => {
                clock.ticker = Some(ticker)
            }
            _ => ticker.abort(),
        }
    }

    pub fn select(&mut self, question: usize, answer: usize) -> Result<(), QuizError> {
        let count = self
            .questions
            .get(question)
            .map(|q| q.answers.len())
            .ok_or(QuizError::Stale(question))?;
        let clock = self.active_clock(question)?;
        if answer >= count {
            return Err(QuizError::InvalidAnswer { question, answer });
        }
        clock.selection = Some(answer);
        Ok(())
    }

    pub fn tick(&mut self, question: usize) -> Tick {
        match self.clock.as_mut() {
            Some(clock) if clock.is_active_for(question) => {
                clock.remaining = clock.remaining.saturating_sub(1);
                if clock.remaining == 0 {
                    Tick::Expired
                } else {
                    Tick::Running(clock.remaining)
                }
            }
            _ => Tick::Stale,
        }
    }

    /// Records the pending selection and moves on. Succeeds at most once per entered question.
    pub fn submit(&mut self, question: usize, trigger: Trigger) -> Result<Submission, QuizError> {
        let clock = self.active_clock(question)?;
        clock.phase = Phase::Submitting;
        clock.cancel_ticker();
        let answer = clock.selection;

        let entry = &mut self.questions[question];
        entry.user_answer = answer;
        let correct = entry.is_correct(answer);
        if correct {
            self.score += 1;
        }
        self.current += 1;

        if let Some(clock) = self.clock.as_mut() {
            clock.phase = Phase::Done;
        }
        Ok(Submission {
            question,
            answer,
            correct,
            trigger,
        })
    }

    /// Replays the same questions from the start. Score and position reset; recorded answers
    /// stay and are offered again as each question is entered.
    pub fn restart(&mut self) {
        self.stop();
        self.clock = None;
        self.current = 0;
        self.score = 0;
    }

    /// Cancels the live ticker, if any.
    pub fn stop(&mut self) {
        if let Some(clock) = self.clock.as_mut() {
            clock.cancel_ticker();
        }
    }

    fn active_clock(&mut self, question: usize) -> Result<&mut QuestionClock, QuizError> {
        let current = self.current;
        match self.clock.as_mut() {
            Some(clock) if clock.question == question && clock.phase != Phase::Active => {
                Err(QuizError::AlreadySubmitted(question))
            }
            Some(clock) if clock.question == question && question == current => Ok(clock),
            _ => Err(QuizError::Stale(question)),
        }
    }
}
