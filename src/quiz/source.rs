use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

use super::catalog::fixed_questions;
use super::question::{Category, Difficulty, Question};

/// Most questions the trivia API hands out per request.
pub const MAX_AMOUNT: usize = 50;

#[derive(Error, Debug)]
pub enum TriviaError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{}", describe_response_code(.0))]
    Upstream(u8),

    #[error("no questions available")]
    Empty,

    #[error("number of questions must be between 1 and {MAX_AMOUNT}, got {0}")]
    InvalidAmount(usize),
}

fn describe_response_code(code: &u8) -> String {
    match code {
        1 => "not enough questions for this category and difficulty".to_owned(),
        2 => "the trivia service rejected the request parameters".to_owned(),
        5 => "too many requests, wait a few seconds".to_owned(),
        other => format!("trivia service answered with code {other}"),
    }
}

#[derive(Deserialize, Debug)]
pub struct TriviaResponse {
    #[serde(default)]
    pub response_code: u8,
    pub results: Vec<RawQuestion>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawQuestion {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

impl RawQuestion {
    /// Puts the correct answer at a random slot among the incorrect ones.
    pub fn into_question<R: Rng + ?Sized>(self, rng: &mut R) -> Question {
        let mut answers = self.incorrect_answers;
        let correct = rng.gen_range(0..=answers.len());
        answers.insert(correct, self.correct_answer);
        Question::new(self.question, answers, correct)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriviaQuery {
    pub amount: usize,
    pub category: Category,
    pub difficulty: Difficulty,
}

impl TriviaQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("amount", self.amount.to_string())];
        if let Some(category) = self.category.as_param() {
            params.push(("category", category));
        }
        if let Some(difficulty) = self.difficulty.as_param() {
            params.push(("difficulty", difficulty.to_owned()));
        }
        params.push(("type", "multiple".to_owned()));
        params
    }
}

#[async_trait]
pub trait TriviaSource: Send + Sync {
    async fn fetch(&self, query: &TriviaQuery) -> Result<Vec<RawQuestion>, TriviaError>;
}

pub struct OpenTdb {
    client: reqwest::Client,
    base_url: String,
}

impl OpenTdb {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TriviaSource for OpenTdb {
    async fn fetch(&self, query: &TriviaQuery) -> Result<Vec<RawQuestion>, TriviaError> {
        tracing::debug!("Requesting {} questions from {}", query.amount, self.base_url);
        let response: TriviaResponse = self
            .client
            .get(&self.base_url)
            .query(&query.params())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if response.response_code != 0 {
            return Err(TriviaError::Upstream(response.response_code));
        }
        Ok(response.results)
    }
}

/// Builds the question list for a new quiz: fixed multimedia questions first, the rest fetched.
pub async fn acquire_questions<R: Rng + Send + ?Sized>(
    source: &dyn TriviaSource,
    rng: &mut R,
    category: Category,
    difficulty: Difficulty,
    amount: usize,
) -> Result<Vec<Question>, TriviaError> {
    if amount == 0 || amount > MAX_AMOUNT {
        return Err(TriviaError::InvalidAmount(amount));
    }
    let mut questions = fixed_questions(category);
    if amount > questions.len() {
        let query = TriviaQuery {
            amount: amount - questions.len(),
            category,
            difficulty,
        };
        let fetched = source.fetch(&query).await?;
        if fetched.len() < query.amount {
            tracing::warn!(
                "Trivia source returned {} of {} requested questions",
                fetched.len(),
                query.amount
            );
        }
        questions.extend(fetched.into_iter().map(|raw| raw.into_question(rng)));
    }
    if questions.is_empty() {
        return Err(TriviaError::Empty);
    }
    Ok(questions)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    /// Serves numbered questions and remembers every query.
    #[derive(Default)]
    pub struct FakeSource {
        pub queries: Mutex<Vec<TriviaQuery>>,
        pub short_by: usize,
        pub fail: bool,
    }

    pub fn raw(n: usize) -> RawQuestion {
        RawQuestion {
            question: format!("Question &quot;{n}&quot;"),
            correct_answer: format!("right {n}"),
            incorrect_answers: vec![
                format!("wrong {n}a"),
                format!("wrong {n}b"),
                format!("wrong {n}c"),
            ],
        }
    }

    #[async_trait]
    impl TriviaSource for FakeSource {
        async fn fetch(&self, query: &TriviaQuery) -> Result<Vec<RawQuestion>, TriviaError> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail {
                return Err(TriviaError::Upstream(5));
            }
            let count = query.amount.saturating_sub(self.short_by);
            Ok((0..count).map(raw).collect())
        }
    }

    #[test]
    fn correct_answer_lands_on_the_chosen_slot() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let question = raw(1).into_question(&mut rng);
            assert_eq!(question.answers.len(), 4);
            assert_eq!(question.correct_answer(), "right 1");
            let others: Vec<_> = question
                .answers
                .iter()
                .filter(|a| a.starts_with("wrong"))
                .cloned()
                .collect();
            assert_eq!(others, vec!["wrong 1a", "wrong 1b", "wrong 1c"]);
            seen[question.correct] = true;
        }
        assert!(seen.iter().all(|s| *s), "every slot should come up: {seen:?}");
    }

    #[test]
    fn params_omit_any() {
        let query = TriviaQuery {
            amount: 5,
            category: Category::Any,
            difficulty: Difficulty::Any,
        };
        assert_eq!(
            query.params(),
            vec![("amount", "5".to_owned()), ("type", "multiple".to_owned())]
        );

        let query = TriviaQuery {
            amount: 3,
            category: Category::Id(22),
            difficulty: Difficulty::Easy,
        };
        assert_eq!(
            query.params(),
            vec![
                ("amount", "3".to_owned()),
                ("category", "22".to_owned()),
                ("difficulty", "easy".to_owned()),
                ("type", "multiple".to_owned()),
            ]
        );
    }

    #[test]
    fn parses_api_payload() {
        let body = r#"{"response_code":0,"results":[{"type":"multiple","difficulty":"easy",
            "category":"History","question":"Who?","correct_answer":"A",
            "incorrect_answers":["B","C","D"]}]}"#;
        let response: TriviaResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].incorrect_answers, vec!["B", "C", "D"]);
    }

    #[tokio::test]
    async fn fixed_question_alone_needs_no_fetch() {
        let source = FakeSource::default();
        let mut rng = StdRng::seed_from_u64(1);
        let questions = acquire_questions(&source, &mut rng, Category::Id(9), Difficulty::Any, 1)
            .await
            .unwrap();

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "Which animal is shown in this image?");
        assert_eq!(questions[0].correct, 1);
        assert_eq!(questions[0].answers[1], "Dog");
        assert!(source.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn any_category_tops_up_from_the_source() {
        let source = FakeSource::default();
        let mut rng = StdRng::seed_from_u64(2);
        let questions = acquire_questions(&source, &mut rng, Category::Any, Difficulty::Any, 2)
            .await
            .unwrap();

        assert_eq!(questions.len(), 2);
        assert!(questions[0].media.is_some());
        assert_eq!(questions[1].answers.len(), 4);
        assert!(questions[1].answers.contains(&"right 0".to_owned()));
        assert_eq!(questions[1].correct_answer(), "right 0");
        assert_eq!(
            *source.queries.lock().unwrap(),
            vec![TriviaQuery {
                amount: 1,
                category: Category::Any,
                difficulty: Difficulty::Any,
            }]
        );
    }

    #[tokio::test]
    async fn category_without_fixed_questions_fetches_everything() {
        let source = FakeSource::default();
        let mut rng = StdRng::seed_from_u64(3);
        let questions =
            acquire_questions(&source, &mut rng, Category::Id(15), Difficulty::Hard, 4)
                .await
                .unwrap();

        assert_eq!(questions.len(), 4);
        assert!(questions.iter().all(|q| q.media.is_none()));
        let queries = source.queries.lock().unwrap();
        assert_eq!(queries[0].amount, 4);
        assert_eq!(queries[0].difficulty, Difficulty::Hard);
    }

    #[tokio::test]
    async fn short_response_keeps_what_arrived() {
        let source = FakeSource {
            short_by: 2,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(4);
        let questions = acquire_questions(&source, &mut rng, Category::Id(23), Difficulty::Any, 5)
            .await
            .unwrap();
        assert_eq!(questions.len(), 3);
    }

    #[tokio::test]
    async fn failed_fetch_fails_the_quiz() {
        let source = FakeSource {
            fail: true,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let err = acquire_questions(&source, &mut rng, Category::Any, Difficulty::Any, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, TriviaError::Upstream(5)));
        assert_eq!(err.to_string(), "too many requests, wait a few seconds");
    }

    #[tokio::test]
    async fn nothing_fetched_and_nothing_fixed_is_empty() {
        let source = FakeSource {
            short_by: 10,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(6);
        let err = acquire_questions(&source, &mut rng, Category::Id(15), Difficulty::Any, 3)
            .await
            .unwrap_err();
        assert!(matches!(err, TriviaError::Empty));
    }

    #[tokio::test]
    async fn rejects_out_of_range_amounts() {
        let source = FakeSource::default();
        let mut rng = StdRng::seed_from_u64(8);
        for amount in [0, MAX_AMOUNT + 1] {
            let err = acquire_questions(&source, &mut rng, Category::Any, Difficulty::Any, amount)
                .await
                .unwrap_err();
            assert!(matches!(err, TriviaError::InvalidAmount(a) if a == amount));
        }
        assert!(source.queries.lock().unwrap().is_empty());
    }
}
