//! KeyValues (`.vdf` / `.acf`) trees.
//!
//! Parsing is done by `keyvalues-parser`; the scanner only sees [`Vdf`]
//! through the [`KeyValueDecoder`] trait, so tests can hand it synthetic trees.

use keyvalues_parser::Value as KvValue;
use thiserror::Error;

/// A value in a KeyValues document: either a leaf string or a nested block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Map(Vdf),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&Vdf> {
        match self {
            Value::Map(map) => Some(map),
            Value::Str(_) => None,
        }
    }
}

/// Key/value block. Entries keep the order the decoder produced and keys
/// may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vdf {
    entries: Vec<(String, Value)>,
}

impl Vdf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.entries.push((key.into(), value));
    }

    /// Last value stored under `key`, so a repeated key overrides earlier
    /// ones. KeyValues keys are case-insensitive.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_map(&self, key: &str) -> Option<&Vdf> {
        self.get(key).and_then(Value::as_map)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Turns raw text into a [`Vdf`] tree.
pub trait KeyValueDecoder {
    fn decode(&self, text: &str) -> Result<Vdf, DecodeError>;
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct DecodeError {
    pub message: String,
}

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// [`KeyValueDecoder`] backed by `keyvalues-parser`, the parser `steamlocate`
/// uses for the same files.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextDecoder;

impl KeyValueDecoder for TextDecoder {
    fn decode(&self, text: &str) -> Result<Vdf, DecodeError> {
        // Steam writes some files with a UTF-8 BOM.
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let parsed =
            keyvalues_parser::Vdf::parse(text).map_err(|err| DecodeError::new(err.to_string()))?;

        let mut root = Vdf::new();
        root.push(parsed.key.to_string(), convert(&parsed.value));
        Ok(root)
    }
}

fn convert(value: &KvValue<'_>) -> Value {
    match value {
        KvValue::Str(s) => Value::Str(s.to_string()),
        KvValue::Obj(obj) => {
            let mut block = Vdf::new();
            for (key, values) in obj.iter() {
                for value in values {
                    block.push(key.to_string(), convert(value));
                }
            }
            Value::Map(block)
        }
    }
}
