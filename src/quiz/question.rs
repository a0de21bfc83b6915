use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Open Trivia DB category, or `any`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Category {
    Any,
    Id(u16),
}

impl Category {
    /// Value for the `category` query parameter, `None` when unrestricted.
    pub fn as_param(&self) -> Option<String> {
        match self {
            Category::Any => None,
            Category::Id(id) => Some(id.to_string()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Any => f.write_str("any"),
            Category::Id(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("any") {
            return Ok(Category::Any);
        }
        value
            .parse::<u16>()
            .map(Category::Id)
            .map_err(|_| format!("Wrong category {value}, expected 'any' or a number"))
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Any,
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_param(self) -> Option<&'static str> {
        match self {
            Difficulty::Any => None,
            Difficulty::Easy => Some("easy"),
            Difficulty::Medium => Some("medium"),
            Difficulty::Hard => Some("hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "any" => Ok(Difficulty::Any),
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Media {
    pub kind: MediaKind,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    /// Question text as delivered, HTML entities included.
    pub text: String,
    pub answers: Vec<String>,
    pub correct: usize,
    pub media: Option<Media>,
    pub user_answer: Option<usize>,
}

impl Question {
    pub fn new(text: impl Into<String>, answers: Vec<String>, correct: usize) -> Self {
        Self {
            text: text.into(),
            answers,
            correct,
            media: None,
            user_answer: None,
        }
    }

    pub fn with_media(mut self, kind: MediaKind, url: impl Into<String>) -> Self {
        self.media = Some(Media {
            kind,
            url: url.into(),
        });
        self
    }

    pub fn is_correct(&self, answer: Option<usize>) -> bool {
        answer == Some(self.correct)
    }

    pub fn correct_answer(&self) -> &str {
        &self.answers[self.correct]
    }
}

/// Decodes the HTML entities the trivia API embeds in its strings.
pub fn decode(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
