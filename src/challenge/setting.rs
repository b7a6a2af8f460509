//! Typed challenge settings
//!
//! A [`SettingBox`] wraps one tunable value with the label and slot it is
//! shown under. Serialized form is `<type>|<value>|<label>|<position>|<options>`
//! where `<options>` is the name of a picker list or `NULL`.

use std::fmt;

use super::error::{ChallengeError, Result};

/// Marker written when a setting has no option list
const NO_OPTIONS: &str = "NULL";

/// A value type that can live inside a [`SettingBox`]
pub trait SettingValue: Clone + PartialEq + fmt::Debug {
    /// Type name written in the serialized form
    const TYPE_NAME: &'static str;

    /// Format the value for serialization
    fn format_value(&self) -> String;

    /// Parse a serialized value
    fn parse_value(raw: &str) -> Option<Self>;
}

impl SettingValue for i32 {
    const TYPE_NAME: &'static str = "System.Int32";

    fn format_value(&self) -> String {
        self.to_string()
    }

    fn parse_value(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl SettingValue for String {
    const TYPE_NAME: &'static str = "System.String";

    fn format_value(&self) -> String {
        self.clone()
    }

    fn parse_value(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl SettingValue for bool {
    const TYPE_NAME: &'static str = "System.Boolean";

    fn format_value(&self) -> String {
        self.to_string()
    }

    fn parse_value(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

/// A named, positioned challenge setting
#[derive(Debug, Clone, PartialEq)]
pub struct SettingBox<T: SettingValue> {
    pub value: T,
    /// UI label
    pub label: String,
    /// Serialization slot and UI order
    pub position: u32,
    /// Name of the option list for picker-style settings
    pub options: Option<String>,
}

impl<T: SettingValue> SettingBox<T> {
    /// Create a setting without an option list
    pub fn new(value: T, label: &str, position: u32) -> Self {
        Self {
            value,
            label: label.to_string(),
            position,
            options: None,
        }
    }

    /// Attach a picker option list
    pub fn with_options(mut self, options: &str) -> Self {
        self.options = Some(options.to_string());
        self
    }

    /// Parse a serialized setting, checking that it holds a `T`
    pub fn parse(raw: &str, challenge: &'static str) -> Result<Self> {
        let invalid = |reason: String| ChallengeError::InvalidSetting { challenge, reason };

        let parts: Vec<&str> = raw.split('|').collect();
        if parts.len() != 5 {
            return Err(invalid(format!(
                "expected 5 parts in '{raw}', found {}",
                parts.len()
            )));
        }
        if parts[0] != T::TYPE_NAME {
            return Err(invalid(format!(
                "expected {} but found {}",
                T::TYPE_NAME,
                parts[0]
            )));
        }

        let value = T::parse_value(parts[1])
            .ok_or_else(|| invalid(format!("cannot parse value '{}'", parts[1])))?;
        let position = parts[3]
            .trim()
            .parse()
            .map_err(|_| invalid(format!("cannot parse position '{}'", parts[3])))?;
        let options = (parts[4] != NO_OPTIONS).then(|| parts[4].to_string());

        Ok(Self {
            value,
            label: parts[2].to_string(),
            position,
            options,
        })
    }
}

impl<T: SettingValue> fmt::Display for SettingBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}",
            T::TYPE_NAME,
            self.value.format_value(),
            self.label,
            self.position,
            self.options.as_deref().unwrap_or(NO_OPTIONS)
        )
    }
}

/// Borrowed view of a setting of any supported type, for UI listing
#[derive(Debug, Clone, Copy)]
pub enum SettingRef<'a> {
    Int(&'a SettingBox<i32>),
    Text(&'a SettingBox<String>),
    Flag(&'a SettingBox<bool>),
}

impl SettingRef<'_> {
    pub fn label(&self) -> &str {
        match self {
            SettingRef::Int(s) => &s.label,
            SettingRef::Text(s) => &s.label,
            SettingRef::Flag(s) => &s.label,
        }
    }

    pub fn position(&self) -> u32 {
        match self {
            SettingRef::Int(s) => s.position,
            SettingRef::Text(s) => s.position,
            SettingRef::Flag(s) => s.position,
        }
    }

    /// Current value formatted for display
    pub fn value_string(&self) -> String {
        match self {
            SettingRef::Int(s) => s.value.format_value(),
            SettingRef::Text(s) => s.value.format_value(),
            SettingRef::Flag(s) => s.value.format_value(),
        }
    }
}
