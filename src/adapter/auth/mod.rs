//! Authentication Module
//!
//! Google OAuth2 認証関連の機能

pub mod client_secrets;
pub mod google_oauth;
pub mod session_token;

pub use google_oauth::GoogleOAuthFlow;
pub use session_token::SessionToken;
