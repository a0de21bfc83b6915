use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";
pub const OPEN_TRIVIA_URL: &str = "https://opentdb.com/api.php";

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub identity: IdentitySettings,
    pub trivia: TriviaSettings,
    pub quiz: QuizSettings,
}

#[derive(Deserialize, Debug)]
pub struct ServerSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub static_dir: PathBuf,
    /// Sessions without a request for this long are dropped.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub session_idle_secs: u64,
}

#[derive(Deserialize, Debug)]
pub struct IdentitySettings {
    pub base_url: String,
    pub api_key: SecretString,
}

#[derive(Deserialize, Debug)]
pub struct TriviaSettings {
    pub base_url: String,
}

#[derive(Deserialize, Debug)]
pub struct QuizSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub question_seconds: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub signup_reset_ms: u64,
}

impl Settings {
    /// Reads `trivia.toml` (optional) and `TRIVIA__SECTION__KEY` variables on top of the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        defaults()?
            .add_source(File::with_name("trivia").required(false))
            .add_source(Environment::with_prefix("TRIVIA").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080_i64)?
        .set_default("server.static_dir", "static")?
        .set_default("server.session_idle_secs", 3600_i64)?
        .set_default("identity.base_url", IDENTITY_TOOLKIT_URL)?
        .set_default("trivia.base_url", OPEN_TRIVIA_URL)?
        .set_default("quiz.question_seconds", 15_i64)?
        .set_default("quiz.signup_reset_ms", 1500_i64)
}
