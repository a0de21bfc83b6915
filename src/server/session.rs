use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use uuid::Uuid;

use super::htmx::{is_htmx, navigate};
use crate::auth::Account;
use crate::quiz::{QuizEngine, SharedQuiz};

pub const SESSION_COOKIE: &str = "trivia_session";

pub struct UserSession {
    pub account: Account,
    pub quiz: Option<SharedQuiz>,
    last_seen: Instant,
}

/// Signed-in users of this process, keyed by the id in their session cookie.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, UserSession>>>,
}

impl SessionStore {
    pub async fn create(&self, account: Account) -> Uuid {
        let id = Uuid::new_v4();
        self.inner
            .write()
            .await
            .insert(
                id,
                UserSession {
                    account,
                    quiz: None,
                    last_seen: Instant::now(),
                },
            );
        id
    }

    /// Email of the session's user; marks the session as seen.
    pub async fn email(&self, id: Uuid) -> Option<String> {
        self.inner.write().await.get_mut(&id).map(|session| {
            session.last_seen = Instant::now();
            session.account.email.clone()
        })
    }

    pub async fn quiz(&self, id: Uuid) -> Option<SharedQuiz> {
        self.inner
            .read()
            .await
            .get(&id)
            .and_then(|session| session.quiz.clone())
    }

    /// Swaps the user's quiz. Returns the quiz nobody holds anymore: the previous one, or
    /// `quiz` itself when the session is gone.
    pub async fn set_quiz(&self, id: Uuid, quiz: Option<SharedQuiz>) -> Option<SharedQuiz> {
        match self.inner.write().await.get_mut(&id) {
            Some(session) => std::mem::replace(&mut session.quiz, quiz),
            None => quiz,
        }
    }

    pub async fn remove(&self, id: Uuid) -> Option<UserSession> {
        self.inner.write().await.remove(&id)
    }

    /// Drops sessions not seen for `max_idle` and hands them back.
    pub async fn evict_idle(&self, max_idle: Duration) -> Vec<UserSession> {
        let now = Instant::now();
        let mut sessions = self.inner.write().await;
        let idle: Vec<Uuid> = sessions
            .iter()
            .filter(|(_, session)| now.duration_since(session.last_seen) >= max_idle)
            .map(|(id, _)| *id)
            .collect();
        idle.iter().filter_map(|id| sessions.remove(id)).collect()
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// Periodically evicts idle sessions and stops the countdowns of their quizzes.
pub fn spawn_sweeper(
    store: SessionStore,
    engine: QuizEngine,
    max_idle: Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = interval(every);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            let evicted = store.evict_idle(max_idle).await;
            if evicted.is_empty() {
                continue;
            }
            tracing::info!("Evicting {} idle sessions", evicted.len());
            for session in evicted {
                if let Some(quiz) = &session.quiz {
                    engine.discard(quiz).await;
                }
            }
        }
    })
}

pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value).ok())
}

pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

/// User behind the request's session cookie.
pub struct CurrentUser {
    pub session_id: Uuid,
    pub email: String,
}

pub struct Unauthenticated {
    htmx: bool,
}

impl IntoResponse for Unauthenticated {
    fn into_response(self) -> Response {
        navigate(self.htmx, "/")
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    SessionStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Unauthenticated;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let rejection = Unauthenticated {
            htmx: is_htmx(&parts.headers),
        };
        let Some(session_id) = session_id(&parts.headers) else {
            return Err(rejection);
        };
        let store = SessionStore::from_ref(state);
        match store.email(session_id).await {
            Some(email) => Ok(CurrentUser { session_id, email }),
            None => {
                tracing::debug!("Unknown session {session_id}");
                Err(rejection)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::quiz::{Category, QuizSession};

    fn account(email: &str) -> Account {
        Account {
            email: email.to_owned(),
            user_id: "uid".to_owned(),
            id_token: SecretString::from("token".to_owned()),
        }
    }

    fn shared_quiz() -> SharedQuiz {
        Arc::new(tokio::sync::Mutex::new(QuizSession::new(Category::Any, vec![])))
    }

    #[test]
    fn finds_the_session_among_other_cookies() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            format!("theme=dark; {SESSION_COOKIE}={id}; other=1").parse().unwrap(),
        );
        assert_eq!(session_id(&headers), Some(id));

        headers.insert(COOKIE, format!("{SESSION_COOKIE}=garbage").parse().unwrap());
        assert_eq!(session_id(&headers), None);
        assert_eq!(session_id(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn store_tracks_users_and_quizzes() {
        let store = SessionStore::default();
        let id = store.create(account("ann@example.com")).await;
        assert_eq!(store.email(id).await.as_deref(), Some("ann@example.com"));
        assert!(store.quiz(id).await.is_none());

        let first = shared_quiz();
        assert!(store.set_quiz(id, Some(first.clone())).await.is_none());
        assert!(Arc::ptr_eq(&store.quiz(id).await.unwrap(), &first));

        let dropped = store.set_quiz(id, Some(shared_quiz())).await.unwrap();
        assert!(Arc::ptr_eq(&dropped, &first));

        let session = store.remove(id).await.unwrap();
        assert_eq!(session.account.email, "ann@example.com");
        assert!(store.email(id).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_are_evicted() {
        let store = SessionStore::default();
        let idle = store.create(account("idle@example.com")).await;
        let active = store.create(account("active@example.com")).await;

        tokio::time::advance(Duration::from_secs(50)).await;
        assert!(store.email(active).await.is_some());
        tokio::time::advance(Duration::from_secs(20)).await;

        let evicted = store.evict_idle(Duration::from_secs(60)).await;
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].account.email, "idle@example.com");
        assert!(store.email(idle).await.is_none());
        assert!(store.email(active).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_stops_the_quiz_of_an_evicted_session() {
        let store = SessionStore::default();
        let engine = QuizEngine::new(15);
        let id = store.create(account("gone@example.com")).await;
        let questions = vec![crate::quiz::Question::new(
            "Q",
            vec!["a".into(), "b".into()],
            0,
        )];
        let quiz = engine.begin(QuizSession::new(Category::Any, questions)).await;
        store.set_quiz(id, Some(quiz.clone())).await;

        let sweeper = spawn_sweeper(
            store.clone(),
            engine,
            Duration::from_secs(10),
            Duration::from_secs(5),
        );
        tokio::time::sleep(Duration::from_secs(12)).await;

        assert_eq!(store.count().await, 0);
        let session = quiz.lock().await;
        assert!(!session.clock().unwrap().has_ticker());
        assert_eq!(session.current_index(), 0);
        sweeper.abort();
    }

    #[tokio::test]
    async fn quiz_for_a_vanished_session_comes_back() {
        let store = SessionStore::default();
        let orphan = shared_quiz();
        let returned = store.set_quiz(Uuid::new_v4(), Some(orphan.clone())).await;
        assert!(Arc::ptr_eq(&returned.unwrap(), &orphan));
    }
}
