use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

/// Signed-in user as reported by the identity provider.
#[derive(Debug)]
pub struct Account {
    pub email: String,
    pub user_id: String,
    pub id_token: SecretString,
}

#[derive(Error, Debug)]
pub enum GatewayError {
    /// The provider refused the request; holds its error message.
    #[error("{0}")]
    Rejected(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait IdentityGateway: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Account, GatewayError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, GatewayError>;

    async fn sign_out(&self, account: &Account) -> Result<(), GatewayError>;
}
