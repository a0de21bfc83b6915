mod firebase;
mod form;
mod gateway;
mod messages;

pub use firebase::FirebaseGateway;
pub use form::{AuthMode, Notice, ERROR_COLOR, SUCCESS_COLOR};
pub use gateway::{Account, GatewayError, IdentityGateway};
pub use messages::{sign_in_message, sign_up_message, SIGN_UP_SUCCESS};
