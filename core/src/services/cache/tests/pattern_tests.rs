use crate::services::cache::glob_match;

#[test]
fn test_literal_and_star() {
    assert!(glob_match("blacklist:*", "blacklist:123"));
    assert!(glob_match("blacklist:*", "blacklist:"));
    assert!(!glob_match("blacklist:*", "refresh_token:123"));
    assert!(glob_match("*", "anything"));
    assert!(glob_match("*:ratelimit:*", "reset:ratelimit:a@b.c"));
}

#[test]
fn test_question_mark() {
    assert!(glob_match("k?y", "key"));
    assert!(!glob_match("k?y", "ky"));
    assert!(!glob_match("k?y", "keey"));
}

#[test]
fn test_escape() {
    assert!(glob_match(r"a\*b", "a*b"));
    assert!(!glob_match(r"a\*b", "axb"));
}

#[test]
fn test_backtracking() {
    assert!(glob_match("a*b*c", "a-b-b-c"));
    assert!(!glob_match("a*b*c", "a-b-b-d"));
}
