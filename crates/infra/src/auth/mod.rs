//! Login flow and session handling

pub mod oauth;
pub mod pkce;
pub mod sessions;

pub use oauth::{decode_id_token, AuthorizationRequest, IdentityClaims, OAuthClient, TokenResponse};
pub use pkce::PkceChallenge;
pub use sessions::SessionStore;
