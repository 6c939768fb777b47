/// Removes every character of `chars` from `text`.
pub fn strip_chars(text: &str, chars: &str) -> String {
    text.chars().filter(|c| !chars.contains(*c)).collect()
}

/// Removes all whitespace, the usual preparation before compiling.
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
