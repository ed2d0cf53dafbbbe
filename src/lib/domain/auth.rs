//! Authentication module: application credentials and bearer tokens.

mod credentials;
mod errors;
mod issuer;
mod provider;
mod token;

pub use credentials::{ClientSecret, Credentials};
pub use errors::AuthError;
pub use issuer::TokenIssuer;
pub use provider::{TokenProvider, REFRESH_MARGIN};
pub use token::AccessToken;
