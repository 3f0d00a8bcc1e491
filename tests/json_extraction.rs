use prepforge::application::services::{extract_json_object, MalformedResponse};

#[test]
fn given_fenced_reply_when_extracting_then_returns_object() {
    let reply = "Sure! ```json\n{\"a\":1}\n```";
    assert_eq!(extract_json_object(reply).unwrap(), "{\"a\":1}");
}

#[test]
fn given_extracted_object_when_parsed_then_round_trips() {
    let reply = "Of course. Here is the grading result you asked for:\n\n\
        ```json\n{\"score\": 85, \"feedback\": \"Good use of recursion.\"}\n```\n\
        Let me know if you need anything else!";

    let json = extract_json_object(reply).unwrap();
    let value: serde_json::Value = serde_json::from_str(json).unwrap();

    assert_eq!(value["score"], 85);
    assert_eq!(value["feedback"], "Good use of recursion.");
}

#[test]
fn given_braceless_text_when_extracting_then_fails_malformed() {
    assert_eq!(
        extract_json_object("I'm sorry, I can't produce that."),
        Err(MalformedResponse)
    );
}

#[test]
fn given_nested_objects_when_extracting_then_keeps_full_span() {
    let reply = "prefix {\"outer\": {\"inner\": [1, 2]}} suffix";
    assert_eq!(
        extract_json_object(reply).unwrap(),
        "{\"outer\": {\"inner\": [1, 2]}}"
    );
}

#[test]
fn given_truncated_reply_when_extracting_then_fails_malformed() {
    // A reply cut off mid-object has an opening brace but no closing one.
    assert_eq!(
        extract_json_object("{\"score\": 85, \"feedb"),
        Err(MalformedResponse)
    );
}
