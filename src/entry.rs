//! Splits a flat key/value sequence into a level, a message and the remaining fields.

use crate::{Level, Value};

/// Level used when neither `level` nor `lvl` carries a string
pub const DEFAULT_LEVEL: &str = "info";

/// Message used when neither `message` nor `msg` carries a string
pub const DEFAULT_MESSAGE: &str = "no message";

const LEVEL_KEYS: &[&str] = &["level", "lvl"];
const MESSAGE_KEYS: &[&str] = &["message", "msg"];

/// A normalized log entry borrowed from the key/value sequence it was parsed from
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<'a> {
    /// Raw level name, which is not necessarily one of the known levels
    pub level: &'a str,
    pub message: &'a str,
    /// Everything not consumed as a level or message, in input order
    pub fields: Vec<&'a Value>,
}

impl<'a> Entry<'a> {
    /// Scans `kvs` once, left to right.
    ///
    /// `level` always replaces a previously captured level while `lvl` only
    /// applies while the level still equals [`DEFAULT_LEVEL`]. `message` and
    /// `msg` follow the same rule against [`DEFAULT_MESSAGE`]. A special key
    /// without a following value is kept as an ordinary field.
    ///
    /// The check compares values, so a `level` of `"info"` does not stop a
    /// later `lvl` from applying: `["level", "info", "lvl", "warn"]` yields
    /// `warn`.
    pub fn parse(kvs: &'a [Value]) -> Self {
        let mut level = DEFAULT_LEVEL;
        let mut message = DEFAULT_MESSAGE;
        let mut fields = Vec::with_capacity(kvs.len());

        let mut i = 0;
        while i < kvs.len() {
            if let Some(key) = special_key(kvs, i, LEVEL_KEYS) {
                if key == "level" || level == DEFAULT_LEVEL {
                    level = kvs[i + 1].as_str().unwrap_or(DEFAULT_LEVEL);
                }
                i += 2;
                continue;
            }
            if let Some(key) = special_key(kvs, i, MESSAGE_KEYS) {
                if key == "message" || message == DEFAULT_MESSAGE {
                    message = kvs[i + 1].as_str().unwrap_or(DEFAULT_MESSAGE);
                }
                i += 2;
                continue;
            }
            fields.push(&kvs[i]);
            i += 1;
        }

        Entry {
            level,
            message,
            fields,
        }
    }

    /// The level to dispatch at. Unknown names fall back to [`Level::Info`].
    pub fn resolved_level(&self) -> Level {
        self.level.parse().unwrap_or_default()
    }
}

fn special_key<'a>(kvs: &'a [Value], i: usize, keys: &[&str]) -> Option<&'a str> {
    if i + 1 >= kvs.len() {
        return None;
    }
    kvs[i].as_str().filter(|key| keys.contains(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kvs;
    use serde_json::json;

    fn parse(kvs: &[Value]) -> (String, String, Vec<Value>) {
        let entry = Entry::parse(kvs);
        (
            entry.level.to_string(),
            entry.message.to_string(),
            entry.fields.into_iter().cloned().collect(),
        )
    }

    #[test]
    fn normalizes_entries() {
        let cases: Vec<(&str, Vec<Value>, &str, &str, Vec<Value>)> = vec![
            (
                "no level - no message",
                kvs!["key", "value"],
                "info",
                "no message",
                kvs!["key", "value"],
            ),
            (
                "level debug",
                kvs!["level", "debug", "key", "value"],
                "debug",
                "no message",
                kvs!["key", "value"],
            ),
            (
                "lvl warn",
                kvs!["lvl", "warn", "key", "value"],
                "warn",
                "no message",
                kvs!["key", "value"],
            ),
            (
                "some lvl - some msg",
                kvs!["lvl", "debug", "msg", "some message", "key", "value"],
                "debug",
                "some message",
                kvs!["key", "value"],
            ),
            (
                "level and lvl",
                kvs!["lvl", "debug", "level", "warn"],
                "warn",
                "no message",
                kvs![],
            ),
            (
                "level before lvl",
                kvs!["level", "error", "lvl", "debug"],
                "error",
                "no message",
                kvs![],
            ),
            (
                "later level wins",
                kvs!["level", "debug", "level", "warn"],
                "warn",
                "no message",
                kvs![],
            ),
            (
                "earlier lvl wins",
                kvs!["lvl", "debug", "lvl", "warn"],
                "debug",
                "no message",
                kvs![],
            ),
            (
                "lvl equal to the default does not lock the level",
                kvs!["lvl", "info", "lvl", "debug"],
                "debug",
                "no message",
                kvs![],
            ),
            (
                "lvl after a default-valued level still applies",
                kvs!["level", "info", "lvl", "warn"],
                "warn",
                "no message",
                kvs![],
            ),
            (
                "level after lvl overwrites even with the default value",
                kvs!["lvl", "warn", "level", "info"],
                "info",
                "no message",
                kvs![],
            ),
            (
                "message and msg",
                kvs!["message", "the message", "msg", "some msg"],
                "info",
                "the message",
                kvs![],
            ),
            (
                "msg and message",
                kvs!["msg", "some msg", "message", "the message"],
                "info",
                "the message",
                kvs![],
            ),
            (
                "earlier msg wins",
                kvs!["msg", "first", "msg", "second"],
                "info",
                "first",
                kvs![],
            ),
            (
                "later message wins",
                kvs!["message", "first", "message", "second"],
                "info",
                "second",
                kvs![],
            ),
            (
                "invalid message type overwrites msg",
                kvs!["msg", "x", "message", 1],
                "info",
                "no message",
                kvs![],
            ),
            (
                "msg after a default-valued message still applies",
                kvs!["message", "no message", "msg", "other"],
                "info",
                "other",
                kvs![],
            ),
            (
                "invalid level type",
                kvs!["level", 1],
                "info",
                "no message",
                kvs![],
            ),
            (
                "invalid message type",
                kvs!["message", true, "a", "b"],
                "info",
                "no message",
                kvs!["a", "b"],
            ),
            (
                "trailing level key is a field",
                kvs!["a", 1, "level"],
                "info",
                "no message",
                kvs!["a", 1, "level"],
            ),
            (
                "unknown level is kept verbatim",
                kvs!["level", "fatal"],
                "fatal",
                "no message",
                kvs![],
            ),
        ];

        for (name, input, level, message, fields) in cases {
            let (got_level, got_message, got_fields) = parse(&input);
            assert_eq!(got_level, level, "{}", name);
            assert_eq!(got_message, message, "{}", name);
            assert_eq!(got_fields, fields, "{}", name);
        }
    }

    #[test]
    fn residual_fields_keep_their_order() {
        let input = kvs!["a", 1, "msg", "hi", "b", json!({"c": [2]}), "lvl", "warn", "d"];
        let entry = Entry::parse(&input);
        assert_eq!(
            entry.fields,
            vec![&input[0], &input[1], &input[4], &input[5], &input[8]]
        );
    }

    #[test]
    fn non_string_keys_are_never_special() {
        let input = vec![json!(["level"]), json!("debug")];
        let entry = Entry::parse(&input);
        assert_eq!(entry.level, DEFAULT_LEVEL);
        assert_eq!(entry.fields.len(), 2);
    }

    #[test]
    fn resolves_levels() {
        let cases = [
            (kvs!["level", "debug"], Level::Debug),
            (kvs!["level", "warn"], Level::Warn),
            (kvs!["lvl", "error"], Level::Error),
            (kvs!["level", "fatal"], Level::Info),
            (kvs!["level", "WARN"], Level::Info),
            (kvs![], Level::Info),
        ];
        for (input, expected) in cases.iter() {
            assert_eq!(Entry::parse(input).resolved_level(), *expected, "{:?}", input);
        }
    }

    #[test]
    fn leaves_input_untouched() {
        let input = kvs!["level", "warn", "msg", "hello", "k", "v"];
        let before = input.clone();
        let _ = Entry::parse(&input);
        assert_eq!(input, before);
    }
}
