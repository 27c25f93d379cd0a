//! Tests for the session service

#[cfg(test)]
mod login_guard_tests;
#[cfg(test)]
mod mocks;
