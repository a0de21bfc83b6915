pub const SIGN_UP_SUCCESS: &str = "Signup successful! You can now log in.";

const SIGN_UP_ERRORS: &[(&[&str], &str)] = &[
    (&["auth/email-already-in-use"], "Email already in use."),
    (&["auth/invalid-email"], "Invalid email address."),
    (
        &["auth/weak-password"],
        "Password should be at least 6 characters.",
    ),
];

const SIGN_IN_ERRORS: &[(&[&str], &str)] = &[
    (
        &["INVALID_LOGIN_CREDENTIALS", "auth/wrong-password"],
        "Invalid email or password. Please try again.",
    ),
    (&["auth/user-not-found"], "No account found for this email."),
    (
        &["auth/too-many-requests"],
        "Too many failed attempts. Please try again later.",
    ),
];

fn map_error(table: &[(&[&str], &str)], raw: &str) -> String {
    table
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| raw.contains(needle)))
        .map(|(_, message)| (*message).to_owned())
        .unwrap_or_else(|| raw.to_owned())
}

/// User-facing text for a failed sign-up; unknown errors pass through untouched.
pub fn sign_up_message(raw: &str) -> String {
    map_error(SIGN_UP_ERRORS, raw)
}

/// User-facing text for a failed sign-in; unknown errors pass through untouched.
pub fn sign_in_message(raw: &str) -> String {
    map_error(SIGN_IN_ERRORS, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_up_errors_are_mapped() {
        assert_eq!(
            sign_up_message("Firebase: Error (auth/email-already-in-use)."),
            "Email already in use."
        );
        assert_eq!(
            sign_up_message("Firebase: Error (auth/invalid-email)."),
            "Invalid email address."
        );
        assert_eq!(
            sign_up_message("Firebase: Password should be at least 6 characters (auth/weak-password)."),
            "Password should be at least 6 characters."
        );
    }

    #[test]
    fn sign_in_errors_are_mapped() {
        let invalid = "Invalid email or password. Please try again.";
        assert_eq!(sign_in_message("Firebase: Error (INVALID_LOGIN_CREDENTIALS)."), invalid);
        assert_eq!(sign_in_message("Firebase: Error (auth/wrong-password)."), invalid);
        assert_eq!(
            sign_in_message("Firebase: Error (auth/user-not-found)."),
            "No account found for this email."
        );
        assert_eq!(
            sign_in_message("Firebase: Error (auth/too-many-requests)."),
            "Too many failed attempts. Please try again later."
        );
    }

    #[test]
    fn unknown_errors_pass_through_verbatim() {
        for raw in [
            "Firebase: Error (auth/network-request-failed).",
            "request failed: connection refused",
            "",
        ] {
            assert_eq!(sign_in_message(raw), raw);
            assert_eq!(sign_up_message(raw), raw);
        }
    }

    #[test]
    fn tables_do_not_leak_into_each_other() {
        let raw = "Firebase: Error (auth/user-not-found).";
        assert_eq!(sign_up_message(raw), raw);
        let raw = "Firebase: Error (auth/email-already-in-use).";
        assert_eq!(sign_in_message(raw), raw);
    }
}
