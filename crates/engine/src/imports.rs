//! Import substitution for rule-set documents.
//!
//! Rule-set text may reference a script file with a marker pair,
//! `importJS <path> endImport`; the file's contents are substituted in
//! before JSON parsing, escaped so they are safe inside a JSON string
//! literal, with line breaks collapsed to `"; "` so a multi-line script
//! stays a single expression.
use std::fs;

const OPEN_TAG: &str = "importJS";
const END_TAG: &str = "endImport";

/// Replaces every `importJS … endImport` marker pair with the escaped
/// contents of the named file. A failed read logs an error and substitutes
/// the empty string; an unterminated marker is left as-is.
pub fn preprocess(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(OPEN_TAG) {
        let after_tag = start + OPEN_TAG.len();
        let Some(end) = rest[after_tag..].find(END_TAG) else {
            break;
        };
        out.push_str(&rest[..start]);
        let file = rest[after_tag..after_tag + end].trim();
        match fs::read_to_string(file) {
            Ok(script) => out.push_str(&escape_for_json_string(&script)),
            Err(e) => log::error!("importing from file \"{}\" failed: {}", file, e),
        }
        rest = &rest[after_tag + end + END_TAG.len()..];
    }
    out.push_str(rest);
    out
}

fn escape_for_json_string(script: &str) -> String {
    // Statement-final semicolons would double up once line breaks become
    // "; " separators, so drop them first.
    let normalized = script.replace("\r\n", "\n").replace(";\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(normalized.len());
    for c in normalized.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("; "),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            other => out.push(other),
        }
    }
    out
}
