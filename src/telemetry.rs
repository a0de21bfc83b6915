use prometheus::register_counter_vec;
use prometheus::CounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref AUTH_CNTR: CounterVec = register_counter_vec!(
        "auth_attempts_total",
        "Number of sign-up and sign-in attempts",
        &["action", "outcome"]
    )
    .unwrap();
    pub static ref QUIZ_CNTR: CounterVec = register_counter_vec!(
        "quizzes_started_total",
        "Number of started quizzes",
        &["category"]
    )
    .unwrap();
    pub static ref ANSWER_CNTR: CounterVec = register_counter_vec!(
        "questions_answered_total",
        "Number of submitted questions",
        &["outcome"]
    )
    .unwrap();
}

pub fn init_tracing() {
    let mut fmt_layer = fmt::layer();
    if std::env::var("INCLUDE_SPAN_EVENTS").is_ok_and(|value| value.eq_ignore_ascii_case("true")) {
        fmt_layer = fmt_layer.with_span_events(FmtSpan::ENTER | FmtSpan::EXIT);
    }
    let filter_layer = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
