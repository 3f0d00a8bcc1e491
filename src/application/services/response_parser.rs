/// The model reply carried no recognizable JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no JSON object found in model reply")]
pub struct MalformedResponse;

/// Cuts the substring spanning the first `{` through the last `}` out of a
/// free-form model reply. Prose and code-fence markers around the object are
/// discarded; whatever sits between the two braces is returned untouched for
/// the caller to parse. Prompts are tuned around exactly this heuristic, so
/// it must not get smarter.
pub fn extract_json_object(text: &str) -> Result<&str, MalformedResponse> {
    let start = text.find('{').ok_or(MalformedResponse)?;
    let end = text.rfind('}').ok_or(MalformedResponse)?;
    if end < start {
        return Err(MalformedResponse);
    }
    Ok(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_object_from_fenced_reply() {
        let reply = "Sure! ```json\n{\"a\":1}\n```";
        assert_eq!(extract_json_object(reply).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn extracts_object_surrounded_by_prose() {
        let reply = "Here you go: {\"score\": 80, \"feedback\": \"ok\"} Hope that helps.";
        assert_eq!(
            extract_json_object(reply).unwrap(),
            "{\"score\": 80, \"feedback\": \"ok\"}"
        );
    }

    #[test]
    fn spans_first_open_to_last_close() {
        // Two objects collapse into one span; the caller's parse decides.
        let reply = "{\"a\":1} and {\"b\":2}";
        assert_eq!(extract_json_object(reply).unwrap(), "{\"a\":1} and {\"b\":2}");
    }

    #[test]
    fn fails_without_braces() {
        assert_eq!(extract_json_object("no json here"), Err(MalformedResponse));
    }

    #[test]
    fn fails_with_only_open_brace() {
        assert_eq!(extract_json_object("{ truncated"), Err(MalformedResponse));
    }

    #[test]
    fn fails_when_close_precedes_open() {
        assert_eq!(extract_json_object("} backwards {"), Err(MalformedResponse));
    }
}
