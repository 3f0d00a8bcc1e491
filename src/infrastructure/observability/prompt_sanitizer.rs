const MAX_VISIBLE_LENGTH: usize = 100;

/// Sanitizes prompt text for safe logging: trims, truncates on a char
/// boundary, and redacts obvious credential patterns.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let sanitized = match trimmed
        .char_indices()
        .nth(MAX_VISIBLE_LENGTH)
        .map(|(idx, _)| idx)
    {
        Some(cut) => format!("{}... ({} chars total)", &trimmed[..cut], trimmed.len()),
        None => trimmed.to_string(),
    };

    redact_sensitive_patterns(&sanitized)
}

fn redact_sensitive_patterns(text: &str) -> String {
    let patterns = [
        ("Bearer ", "Bearer [REDACTED]"),
        ("api_key=", "api_key=[REDACTED]"),
        ("key=", "key=[REDACTED]"),
        ("password=", "password=[REDACTED]"),
        ("secret=", "secret=[REDACTED]"),
        ("token=", "token=[REDACTED]"),
    ];

    let mut result = text.to_string();
    for (pattern, replacement) in patterns {
        if let Some(idx) = result.find(pattern) {
            let end = result[idx + pattern.len()..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
                .map(|i| idx + pattern.len() + i)
                .unwrap_or(result.len());
            result = format!("{}{}{}", &result[..idx], replacement, &result[end..]);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prompt_is_marked() {
        assert_eq!(sanitize_prompt("   "), "[EMPTY]");
    }

    #[test]
    fn long_prompt_is_truncated() {
        let prompt = "x".repeat(300);
        let sanitized = sanitize_prompt(&prompt);
        assert!(sanitized.contains("300 chars total"));
    }

    #[test]
    fn bearer_token_is_redacted() {
        let sanitized = sanitize_prompt("Authorization: Bearer abc123 rest");
        assert!(sanitized.contains("[REDACTED]"));
        assert!(!sanitized.contains("abc123"));
    }
}
