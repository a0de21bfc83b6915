use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::gateway::{Account, GatewayError, IdentityGateway};

/// Email/password accounts through the Identity Toolkit REST API.
pub struct FirebaseGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    id_token: String,
    email: String,
    local_id: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl FirebaseGateway {
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    async fn password_call(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, GatewayError> {
        let url = format!("{}/v1/accounts:{}", self.base_url.trim_end_matches('/'), endpoint);
        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&PasswordRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let token: TokenResponse = response.json().await?;
            return Ok(Account {
                email: token.email,
                user_id: token.local_id,
                id_token: SecretString::from(token.id_token),
            });
        }
        let code = match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => envelope.error.message,
            Err(_) => format!("HTTP_{}", status.as_u16()),
        };
        tracing::info!("Identity provider rejected {endpoint}: {code}");
        Err(GatewayError::Rejected(sdk_message(&code)))
    }
}

#[async_trait]
impl IdentityGateway for FirebaseGateway {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Account, GatewayError> {
        self.password_call("signUp", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, GatewayError> {
        self.password_call("signInWithPassword", email, password).await
    }

    // ID tokens are stateless; forgetting the session is all there is to do.
    async fn sign_out(&self, account: &Account) -> Result<(), GatewayError> {
        tracing::debug!("Signing out {}", account.email);
        Ok(())
    }
}

/// Rewrites a REST error code the way the web SDK reports it, e.g.
/// `EMAIL_EXISTS` becomes `Firebase: Error (auth/email-already-in-use).`
pub fn sdk_message(rest_message: &str) -> String {
    // WEAK_PASSWORD carries a description after " : "
    let (code, detail) = match rest_message.split_once(" : ") {
        Some((code, detail)) => (code.trim(), Some(detail.trim())),
        None => (rest_message.trim(), None),
    };
    let sdk_code = match code {
        "EMAIL_EXISTS" => Some("auth/email-already-in-use"),
        "INVALID_EMAIL" | "MISSING_EMAIL" => Some("auth/invalid-email"),
        "WEAK_PASSWORD" => Some("auth/weak-password"),
        "EMAIL_NOT_FOUND" => Some("auth/user-not-found"),
        "INVALID_PASSWORD" => Some("auth/wrong-password"),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => Some("auth/too-many-requests"),
        "USER_DISABLED" => Some("auth/user-disabled"),
        _ => None,
    };
    match (sdk_code, detail) {
        (Some(sdk_code), Some(detail)) => format!("Firebase: {detail} ({sdk_code})."),
        (Some(sdk_code), None) => format!("Firebase: Error ({sdk_code})."),
        (None, _) => format!("Firebase: Error ({rest_message})."),
    }
}
