//! Field name transformation between object fields and wire keys.
//!
//! A [`NameTransformer`] splits a name into word tokens and joins tokens
//! back into a name. A [`FieldNameTranslator`] pairs a *local* transformer
//! (how fields are named in Rust) with a *remote* one (how keys are named on
//! the wire) and converts in both directions.
//!
//! # Supported Conventions
//!
//! | Transformer | `decode` | `encode` |
//! |-------------|----------|----------|
//! | [`UnderscoreNameTransformer`] | `user_id` → `[user, id]` | `[User, Id]` → `user_id` |
//! | [`CamelCaseNameTransformer`] | `userId` → `[user, Id]` | `[user, id]` → `userId` |
//! | [`KebabCaseNameTransformer`] | `user-id` → `[user, id]` | `[User, Id]` → `user-id` |
//! | [`IdentityNameTransformer`] | `userId` → `[userId]` | `[a, b]` → `ab` |

use std::fmt;
use std::sync::Arc;

/// Splits names into tokens and joins tokens into names.
///
/// Both directions are total: empty input yields an empty token list or an
/// empty string, and `decode` never yields empty tokens.
pub trait NameTransformer: Send + Sync + fmt::Debug {
    fn decode(&self, key: &str) -> Vec<String>;

    fn encode(&self, tokens: &[String]) -> String;
}

/// `snake_case` keys, every token lower-cased.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnderscoreNameTransformer;

impl NameTransformer for UnderscoreNameTransformer {
    fn decode(&self, key: &str) -> Vec<String> {
        split_on(key, '_')
    }

    fn encode(&self, tokens: &[String]) -> String {
        join_lower(tokens, "_")
    }
}

/// `kebab-case` keys, every token lower-cased.
#[derive(Debug, Clone, Copy, Default)]
pub struct KebabCaseNameTransformer;

impl NameTransformer for KebabCaseNameTransformer {
    fn decode(&self, key: &str) -> Vec<String> {
        split_on(key, '-')
    }

    fn encode(&self, tokens: &[String]) -> String {
        join_lower(tokens, "-")
    }
}

/// `camelCase` keys.
///
/// Decoding also splits on underscores, so `user_id` and `userId` decode to
/// the same words. Runs of capitals are kept together (`HTTPServer` →
/// `[HTTP, Server]`).
#[derive(Debug, Clone, Copy, Default)]
pub struct CamelCaseNameTransformer;

impl NameTransformer for CamelCaseNameTransformer {
    fn decode(&self, key: &str) -> Vec<String> {
        let chars: Vec<char> = key.chars().collect();
        let mut tokens = Vec::new();
        let mut current = String::new();

        for (i, &c) in chars.iter().enumerate() {
            if c == '_' {
                flush(&mut tokens, &mut current);
                continue;
            }
            if c.is_uppercase() && !current.is_empty() {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                if prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_is_lower)
                {
                    flush(&mut tokens, &mut current);
                }
            }
            current.push(c);
        }
        flush(&mut tokens, &mut current);

        tokens
    }

    fn encode(&self, tokens: &[String]) -> String {
        let mut result = String::new();
        for (i, token) in tokens.iter().enumerate() {
            if i == 0 {
                result.push_str(&token.to_lowercase());
            } else {
                result.push_str(&capitalize(&token.to_lowercase()));
            }
        }
        result
    }
}

/// Treats the whole name as a single token.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNameTransformer;

impl NameTransformer for IdentityNameTransformer {
    fn decode(&self, key: &str) -> Vec<String> {
        if key.is_empty() {
            Vec::new()
        } else {
            vec![key.to_string()]
        }
    }

    fn encode(&self, tokens: &[String]) -> String {
        tokens.concat()
    }
}

/// Converts between local field identifiers and remote wire keys.
///
/// The default pairs [`CamelCaseNameTransformer`] locally with
/// [`UnderscoreNameTransformer`] remotely, so both `user_id` and `userId`
/// fields map to the wire key `user_id`.
#[derive(Clone, Debug)]
pub struct FieldNameTranslator {
    local: Arc<dyn NameTransformer>,
    remote: Arc<dyn NameTransformer>,
}

impl FieldNameTranslator {
    pub fn new(
        local: impl NameTransformer + 'static,
        remote: impl NameTransformer + 'static,
    ) -> Self {
        Self {
            local: Arc::new(local),
            remote: Arc::new(remote),
        }
    }

    pub fn from_shared(local: Arc<dyn NameTransformer>, remote: Arc<dyn NameTransformer>) -> Self {
        Self { local, remote }
    }

    /// Translator whose wire keys equal the field identifiers
    pub fn identity() -> Self {
        Self::new(IdentityNameTransformer, IdentityNameTransformer)
    }

    pub fn local(&self) -> &dyn NameTransformer {
        self.local.as_ref()
    }

    pub fn remote(&self) -> &dyn NameTransformer {
        self.remote.as_ref()
    }

    /// Field identifier → wire key
    pub fn local_to_remote(&self, field: &str) -> String {
        self.remote.encode(&self.local.decode(field))
    }

    /// Wire key → field identifier
    pub fn remote_to_local(&self, key: &str) -> String {
        self.local.encode(&self.remote.decode(key))
    }
}

impl Default for FieldNameTranslator {
    fn default() -> Self {
        Self::new(CamelCaseNameTransformer, UnderscoreNameTransformer)
    }
}

fn split_on(key: &str, delimiter: char) -> Vec<String> {
    key.split(delimiter)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_lower(tokens: &[String], delimiter: &str) -> String {
    tokens
        .iter()
        .map(|token| token.to_lowercase())
        .collect::<Vec<_>>()
        .join(delimiter)
}

fn flush(tokens: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
