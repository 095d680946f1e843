use serde_json::Value;

/// Makes a cluster error message legible.
///
/// Elasticsearch reports validation errors as JSON documents, usually at the
/// end of a longer message. The JSON part is pretty-printed and any text in
/// front of it is kept. Messages without JSON are returned unchanged.
pub fn readable_message(message: &str) -> String {
    if let Some(pretty) = pretty_json(message) {
        return pretty;
    }

    message
        .char_indices()
        .filter(|(_, c)| *c == '{' || *c == '[')
        .find_map(|(start, _)| {
            pretty_json(&message[start..]).map(|pretty| {
                format!("{}\n{}", message[..start].trim_end(), pretty)
            })
        })
        .unwrap_or_else(|| message.to_string())
}

/// [`readable_message`] applied to the display of `err`.
pub fn readable_error(err: &dyn std::error::Error) -> String {
    readable_message(&err.to_string())
}

fn pretty_json(candidate: &str) -> Option<String> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(json @ (Value::Object(_) | Value::Array(_))) => serde_json::to_string_pretty(&json).ok(),
        _ => None,
    }
}
