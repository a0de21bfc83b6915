use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use crate::quiz::source::MAX_AMOUNT;
use crate::quiz::{acquire_questions, Category, Difficulty, QuizError, QuizSession, SharedQuiz};
use crate::server::app::AppState;
use crate::server::htmx::{navigate, retarget};
use crate::server::session::CurrentUser;
use crate::server::views::{review_view, QuizBox, QuizPage};
use crate::telemetry::QUIZ_CNTR;

use super::ApiResponse;

#[derive(Deserialize)]
struct StartForm {
    category: Category,
    #[serde(default)]
    difficulty: Difficulty,
    // kept as text so a bad value is reported in the quiz box instead of a 422
    #[serde(default)]
    amount: String,
}

#[derive(Deserialize)]
struct SelectForm {
    question: usize,
    answer: usize,
}

#[derive(Deserialize)]
struct QuestionForm {
    question: usize,
}

async fn page(State(state): State<AppState>, user: CurrentUser) -> ApiResponse<QuizPage> {
    let quiz_box = match state.sessions.quiz(user.session_id).await {
        Some(quiz) => Some(QuizBox::of(&*quiz.lock().await).render()?),
        None => None,
    };
    Ok(QuizPage::new(user.email, quiz_box))
}

async fn start(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<StartForm>,
) -> ApiResponse<QuizBox> {
    if let Some(previous) = state.sessions.set_quiz(user.session_id, None).await {
        state.engine.discard(&previous).await;
    }

    let Ok(amount) = form.amount.trim().parse::<usize>() else {
        tracing::debug!("Rejecting question count {:?}", form.amount);
        return Ok(QuizBox::error(format!(
            "Could not load questions: number of questions must be between 1 and {MAX_AMOUNT}, got '{}'",
            form.amount.trim()
        )));
    };

    let mut rng = StdRng::from_entropy();
    let questions = match acquire_questions(
        state.trivia.as_ref(),
        &mut rng,
        form.category,
        form.difficulty,
        amount,
    )
    .await
    {
        Ok(questions) => questions,
        Err(err) => {
            tracing::warn!("Could not start a quiz for {}: {err}", user.email);
            return Ok(QuizBox::error(format!("Could not load questions: {err}")));
        }
    };

    tracing::info!(
        "{} started a quiz of {} questions in category {}",
        user.email,
        questions.len(),
        form.category
    );
    QUIZ_CNTR
        .with_label_values(&[&form.category.to_string()])
        .inc();
    let quiz = state
        .engine
        .begin(QuizSession::new(form.category, questions))
        .await;
    let quiz_box = QuizBox::of(&*quiz.lock().await);
    if let Some(orphan) = state.sessions.set_quiz(user.session_id, Some(quiz)).await {
        state.engine.discard(&orphan).await;
    }
    Ok(quiz_box)
}

async fn select(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<SelectForm>,
) -> ApiResponse<QuizBox> {
    let quiz = current_quiz(&state, &user).await?;
    if let Err(err) = state.engine.select(&quiz, form.question, form.answer).await {
        tracing::debug!("Ignoring selection: {err}");
    }
    let session = quiz.lock().await;
    Ok(QuizBox::of(&session))
}

async fn next(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<QuestionForm>,
) -> ApiResponse<QuizBox> {
    let quiz = current_quiz(&state, &user).await?;
    match state.engine.next(&quiz, form.question).await {
        Ok(submission) => tracing::debug!(
            "{} answered question {} ({})",
            user.email,
            submission.question,
            if submission.correct { "correct" } else { "wrong" }
        ),
        // the countdown got there first; show wherever the quiz is now
        Err(QuizError::Stale(_) | QuizError::AlreadySubmitted(_)) => {}
        Err(err) => return Err(err.into()),
    }
    let session = quiz.lock().await;
    Ok(QuizBox::of(&session))
}

/// Polled every second by the question on screen.
async fn timer(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<QuestionForm>,
) -> ApiResponse<Response> {
    let quiz = current_quiz(&state, &user).await?;
    let session = quiz.lock().await;
    let remaining = session
        .clock()
        .filter(|clock| clock.is_active_for(query.question))
        .map(|clock| clock.remaining());
    Ok(match remaining {
        Some(remaining) => format!("Time left: {remaining}s").into_response(),
        // the question moved on without this page: replace the whole quiz box
        None => (StatusCode::OK, retarget("#quiz-box"), QuizBox::of(&session)).into_response(),
    })
}

async fn review(State(state): State<AppState>, user: CurrentUser) -> ApiResponse<QuizBox> {
    let quiz = current_quiz(&state, &user).await?;
    let session = quiz.lock().await;
    Ok(QuizBox::Review(review_view(&session)))
}

async fn restart(State(state): State<AppState>, user: CurrentUser) -> ApiResponse<QuizBox> {
    let quiz = current_quiz(&state, &user).await?;
    state.engine.restart(&quiz).await;
    tracing::debug!("{} restarted the quiz", user.email);
    let session = quiz.lock().await;
    Ok(QuizBox::of(&session))
}

async fn home(State(state): State<AppState>, user: CurrentUser) -> Response {
    if let Some(quiz) = state.sessions.set_quiz(user.session_id, None).await {
        state.engine.discard(&quiz).await;
    }
    navigate(true, "/")
}

async fn current_quiz(state: &AppState, user: &CurrentUser) -> Result<SharedQuiz, QuizError> {
    state
        .sessions
        .quiz(user.session_id)
        .await
        .ok_or(QuizError::NoQuiz)
}

pub fn quiz_router(state: AppState) -> Router {
    Router::new()
        .route("/quiz", get(page))
        .route("/quiz/start", post(start))
        .route("/quiz/select", post(select))
        .route("/quiz/next", post(next))
        .route("/quiz/timer", get(timer))
        .route("/quiz/review", get(review))
        .route("/quiz/restart", post(restart))
        .route("/quiz/home", post(home))
        .with_state(state)
}
