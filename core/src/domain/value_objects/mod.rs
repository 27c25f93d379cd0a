//! Value objects returned by the session flows.

pub mod session_tokens;

pub use session_tokens::SessionTokens;
