//! Authentication route handlers
//!
//! This module contains all authentication-related endpoints:
//! - Email/password login
//! - Token refresh
//! - Logout
//! - Password reset request and completion

pub mod login;
pub mod logout;
pub mod password;
pub mod refresh;
