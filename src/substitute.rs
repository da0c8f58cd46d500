//! Variable substitution for install-time tokens
//!
//! Replaces `${name}` and `$name` with values from a variable table. Bare
//! names may contain `.` and `-` inside but never end with them.
//! Unknown variables and lone `$` signs are copied through untouched, so a
//! string with no tokens always comes back unchanged.

use std::collections::HashMap;

/// Pure text transform applied to display strings
pub trait Substitute {
    fn substitute(&self, text: &str) -> String;
}

/// Identity transform
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSubstitution;

impl Substitute for NoSubstitution {
    fn substitute(&self, text: &str) -> String {
        text.to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct VariableSubstitutor {
    variables: HashMap<String, String>,
}

impl VariableSubstitutor {
    pub fn new(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-'
}

impl Substitute for VariableSubstitutor {
    fn substitute(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            // ${name}
            if let Some(braced) = after.strip_prefix('{') {
                if let Some(end) = braced.find('}') {
                    let name = &braced[..end];
                    match self.variables.get(name) {
                        Some(value) => out.push_str(value),
                        None => out.push_str(&rest[pos..pos + 2 + end + 1]),
                    }
                    rest = &braced[end + 1..];
                    continue;
                }
                out.push('$');
                rest = after;
                continue;
            }

            // $name
            let scanned = after
                .char_indices()
                .find(|(_, c)| !is_name_char(*c))
                .map(|(i, _)| i)
                .unwrap_or(after.len());
            // `.` and `-` only join names, they never end one.
            let name = after[..scanned].trim_end_matches(['.', '-']);
            let len = name.len();
            match self.variables.get(name) {
                Some(value) if !name.is_empty() => out.push_str(value),
                _ => {
                    out.push('$');
                    out.push_str(name);
                }
            }
            rest = &after[len..];
        }

        out.push_str(rest);
        out
    }
}
