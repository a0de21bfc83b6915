use serde::Deserialize;

pub const SUCCESS_COLOR: &str = "#2ecc40";
pub const ERROR_COLOR: &str = "#e74c3c";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AuthMode::Login => "login",
            AuthMode::Signup => "signup",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Signup => "Sign Up",
        }
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            AuthMode::Login => "Sign Up",
            AuthMode::Signup => "Back to Login",
        }
    }
}

/// Colored line under the auth form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub color: &'static str,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: SUCCESS_COLOR,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: ERROR_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_the_mode() {
        let mode = AuthMode::default();
        assert_eq!(mode.submit_label(), "Login");
        assert_eq!(mode.toggle_label(), "Sign Up");

        let mode = mode.toggled();
        assert_eq!(mode, AuthMode::Signup);
        assert_eq!(mode.submit_label(), "Sign Up");
        assert_eq!(mode.toggle_label(), "Back to Login");
        assert_eq!(mode.toggled(), AuthMode::Login);
    }

    #[test]
    fn notices_carry_their_color() {
        assert_eq!(Notice::success("ok").color, "#2ecc40");
        assert_eq!(Notice::error("no").color, "#e74c3c");
    }
}
