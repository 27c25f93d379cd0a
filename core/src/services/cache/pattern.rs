/// Match `key` against a Redis-style glob supporting `*`, `?` and `\` escapes.
pub fn glob_match(pattern: &str, key: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let key: Vec<char> = key.chars().collect();

    let (mut p, mut k) = (0usize, 0usize);
    // position of the last `*` seen and the key index it is currently covering
    let mut backtrack: Option<(usize, usize)> = None;

    while k < key.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, k));
                p += 1;
                continue;
            }
            Some('?') => {
                p += 1;
                k += 1;
                continue;
            }
            Some('\\') if p + 1 < pattern.len() && pattern[p + 1] == key[k] => {
                p += 2;
                k += 1;
                continue;
            }
            Some(&c) if c != '\\' && c == key[k] => {
                p += 1;
                k += 1;
                continue;
            }
            _ => {}
        }

        match backtrack {
            Some((star, covered)) => {
                p = star + 1;
                k = covered + 1;
                backtrack = Some((star, covered + 1));
            }
            None => return false,
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
