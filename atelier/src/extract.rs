//! Best-effort JSON recovery from model replies.
//!
//! Replies are requested as `application/json`, but models still wrap output
//! in markdown fences or prose now and then. The ladder here: direct parse,
//! then the first fenced block, then the outermost `{...}` slice.

use serde_json::Value;

/// Parses model reply text as JSON, recovering from markdown noise.
/// Returns `None` when nothing along the ladder parses.
pub fn json_value(text: &str) -> Option<Value> {
    let text = text.trim();
    if let Ok(v) = serde_json::from_str(text) {
        return Some(v);
    }
    if let Some(candidate) = fenced_block(text) {
        if let Ok(v) = serde_json::from_str(candidate) {
            return Some(v);
        }
    }
    if let Some(candidate) = outer_object(text) {
        if let Ok(v) = serde_json::from_str(candidate) {
            return Some(v);
        }
    }
    None
}

/// Body of the first ``` or ```json fence, if any.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after = &text[start + 3..];
    let body = match after.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &after[4..],
        _ => after,
    };
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Slice from the first `{` to the last `}`, if both exist in order.
fn outer_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_json_parses() {
        let v = json_value(r#"{"ideas":[]}"#).unwrap();
        assert!(v.get("ideas").is_some());
    }

    #[test]
    fn fenced_json_block_parses() {
        let text = "Here you go:\n```json\n{\"angles\": [1, 2]}\n```\nDone.";
        let v = json_value(text).unwrap();
        assert_eq!(v["angles"][1], 2);
    }

    #[test]
    fn plain_fence_without_tag_parses() {
        let text = "```\n{\"ok\": true}\n```";
        let v = json_value(text).unwrap();
        assert_eq!(v["ok"], true);
    }

    #[test]
    fn fence_tag_case_is_ignored() {
        let text = "```JSON\n{\"ok\": 1}\n```";
        let v = json_value(text).unwrap();
        assert_eq!(v["ok"], 1);
    }

    /// **Scenario**: no fence at all, just prose around an object; the
    /// outermost brace slice still parses.
    #[test]
    fn object_embedded_in_prose_parses() {
        let text = "Sure! The result is {\"label\": \"A\"} as requested.";
        let v = json_value(text).unwrap();
        assert_eq!(v["label"], "A");
    }

    #[test]
    fn unparsable_text_returns_none() {
        assert!(json_value("no json here").is_none());
        assert!(json_value("{broken").is_none());
        assert!(json_value("").is_none());
    }

    #[test]
    fn broken_fence_falls_through_to_outer_object() {
        let text = "```json\nnot json\n```\nactual: {\"c\": 2}";
        let v = json_value(text).unwrap();
        assert_eq!(v["c"], 2);
    }

    #[test]
    fn multibyte_text_near_fence_is_safe() {
        let text = "```\u{1F600}\n{\"ok\": true}\n```";
        let v = json_value(text).unwrap();
        assert_eq!(v["ok"], true);
    }
}
