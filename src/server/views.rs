use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Response};

use crate::auth::{AuthMode, Notice};
use crate::quiz::catalog::{default_image, CATEGORIES};
use crate::quiz::{decode, MediaKind, QuizSession};

const CORRECT_STYLE: &str = "color: #2ecc40; font-weight: bold;";
const WRONG_STYLE: &str = "color: #e74c3c;";

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub form: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/form.html")]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub notice: Option<Notice>,
    /// Set after a successful sign-up: switch back to a blank login form after this many ms.
    pub reset_after_ms: Option<u64>,
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            email: String::new(),
            notice: None,
            reset_after_ms: None,
        }
    }
}

pub struct CategoryOption {
    pub value: String,
    pub name: &'static str,
}

#[derive(Template, WebTemplate)]
#[template(path = "quiz.html")]
pub struct QuizPage {
    pub email: String,
    pub categories: Vec<CategoryOption>,
    pub quiz_box: Option<String>,
}

impl QuizPage {
    pub fn new(email: String, quiz_box: Option<String>) -> Self {
        let categories = CATEGORIES
            .iter()
            .map(|entry| CategoryOption {
                value: entry.category.to_string(),
                name: entry.name,
            })
            .collect();
        Self {
            email,
            categories,
            quiz_box,
        }
    }
}

pub struct AnswerButton {
    pub index: usize,
    pub text: String,
    pub class: &'static str,
}

#[derive(Template, WebTemplate)]
#[template(path = "quiz/question.html")]
pub struct QuestionView {
    pub index: usize,
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub media_kind: &'static str,
    pub media_url: String,
    pub media_alt: &'static str,
    pub remaining: u32,
    pub answers: Vec<AnswerButton>,
}

#[derive(Template, WebTemplate)]
#[template(path = "quiz/result.html")]
pub struct ResultView {
    pub score: usize,
    pub total: usize,
    pub percent: u32,
    pub grade: String,
    pub feedback: &'static str,
}

pub struct ReviewAnswer {
    pub text: String,
    pub style: &'static str,
}

pub struct ReviewItem {
    pub number: usize,
    pub text: String,
    pub answers: Vec<ReviewAnswer>,
}

#[derive(Template, WebTemplate)]
#[template(path = "quiz/review.html")]
pub struct ReviewView {
    pub items: Vec<ReviewItem>,
}

#[derive(Template, WebTemplate)]
#[template(path = "quiz/error.html")]
pub struct QuizErrorView {
    pub message: String,
}

/// Whatever goes into `#quiz-box`.
pub enum QuizBox {
    Question(QuestionView),
    Result(ResultView),
    Review(ReviewView),
    Error(QuizErrorView),
}

impl QuizBox {
    /// The current question, or the result once every question is answered.
    pub fn of(session: &QuizSession) -> Self {
        match question_view(session) {
            Some(view) => QuizBox::Question(view),
            None => QuizBox::Result(result_view(session)),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        QuizBox::Error(QuizErrorView {
            message: message.into(),
        })
    }

    pub fn render(&self) -> askama::Result<String> {
        match self {
            QuizBox::Question(view) => view.render(),
            QuizBox::Result(view) => view.render(),
            QuizBox::Review(view) => view.render(),
            QuizBox::Error(view) => view.render(),
        }
    }
}

impl IntoResponse for QuizBox {
    fn into_response(self) -> Response {
        match self {
            QuizBox::Question(view) => view.into_response(),
            QuizBox::Result(view) => view.into_response(),
            QuizBox::Review(view) => view.into_response(),
            QuizBox::Error(view) => view.into_response(),
        }
    }
}

pub fn question_view(session: &QuizSession) -> Option<QuestionView> {
    let question = session.current_question()?;
    let index = session.current_index();
    let clock = session.clock();
    let selection = clock.and_then(|clock| clock.selection());

    let (media_kind, media_url, media_alt) = match &question.media {
        Some(media) => (
            match media.kind {
                MediaKind::Image => "image",
                MediaKind::Audio => "audio",
                MediaKind::Video => "video",
            },
            media.url.clone(),
            "Question Media",
        ),
        None => ("image", default_image(session.category()).to_owned(), "Quiz"),
    };

    Some(QuestionView {
        index,
        number: index + 1,
        total: session.total(),
        text: decode(&question.text),
        media_kind,
        media_url,
        media_alt,
        remaining: clock.map(|clock| clock.remaining()).unwrap_or(0),
        answers: question
            .answers
            .iter()
            .enumerate()
            .map(|(i, answer)| AnswerButton {
                index: i,
                text: decode(answer),
                class: if selection == Some(i) {
                    "answer-btn selected"
                } else {
                    "answer-btn"
                },
            })
            .collect(),
    })
}

pub fn result_view(session: &QuizSession) -> ResultView {
    let result = session.result();
    ResultView {
        score: result.score,
        total: result.total,
        percent: result.percent,
        grade: result.grade.to_string(),
        feedback: result.grade.feedback(),
    }
}

pub fn review_view(session: &QuizSession) -> ReviewView {
    let passed = session.current_index();
    let items = session
        .questions()
        .iter()
        .enumerate()
        .map(|(idx, question)| ReviewItem {
            number: idx + 1,
            text: decode(&question.text),
            answers: question
                .answers
                .iter()
                .enumerate()
                .map(|(i, answer)| ReviewAnswer {
                    text: decode(answer),
                    style: if i == question.correct {
                        CORRECT_STYLE
                    } else if idx < passed && question.user_answer == Some(i) {
                        WRONG_STYLE
                    } else {
                        ""
                    },
                })
                .collect(),
        })
        .collect();
    ReviewView { items }
}
