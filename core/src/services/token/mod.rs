//! Access token module
//!
//! This module handles the signed, short-lived access credential:
//! - Identity payload encryption with AES-256-GCM
//! - HS256 signing and verification of the claim set
//! - Expiry and issuer validation

mod cipher;
mod config;
mod service;


pub use cipher::PayloadCipher;
pub use config::TokenServiceConfig;
pub use service::TokenIssuer;
