//! Value randomizers and the preset block format
//!
//! A [`Randomizer`] describes how to draw a value for one challenge setting.
//! Randomizers serialize to short indented text so presets can be stored and
//! edited by hand:
//!
//! ```text
//! GrabPoleMimic {
//!     amount-range 1 4
//!     region-fixed Any Region
//!     oneCycle-weighted {
//!         0.2 true
//!         0.8 false
//!     }
//! }
//! ```

use std::collections::HashMap;

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

use super::error::{ChallengeError, Result};
use super::setting::SettingValue;

/// Indentation added for each nesting level of a preset block
pub const INDENT_INCREMENT: &str = "    ";

/// A setting value that randomizers can produce
pub trait RandomValue: SettingValue {
    /// Whether `range` randomizers are meaningful for this type
    const SUPPORTS_RANGE: bool = false;

    /// Draw uniformly from the inclusive range `[min, max]`
    fn sample_range<R: Rng + ?Sized>(min: &Self, _max: &Self, _rng: &mut R) -> Self {
        min.clone()
    }
}

impl RandomValue for i32 {
    const SUPPORTS_RANGE: bool = true;

    fn sample_range<R: Rng + ?Sized>(min: &Self, max: &Self, rng: &mut R) -> Self {
        if max <= min {
            *min
        } else {
            rng.gen_range(*min..=*max)
        }
    }
}

impl RandomValue for String {}

impl RandomValue for bool {}

/// Distribution for one challenge setting
#[derive(Debug, Clone, PartialEq)]
pub enum Randomizer<T: RandomValue> {
    /// Always the same value
    Fixed(T),
    /// Uniform over an inclusive range
    Range { min: T, max: T },
    /// Pick one value with probability proportional to its weight
    Weighted(Vec<(f64, T)>),
}

impl<T: RandomValue> Randomizer<T> {
    /// Draw a value. Returns `None` only for an empty weighted set; a weighted
    /// set with no positive total yields its first entry.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<T> {
        match self {
            Randomizer::Fixed(value) => Some(value.clone()),
            Randomizer::Range { min, max } => Some(T::sample_range(min, max, rng)),
            Randomizer::Weighted(entries) => {
                match WeightedIndex::new(entries.iter().map(|(weight, _)| *weight)) {
                    Ok(picker) => entries.get(picker.sample(rng)).map(|(_, v)| v.clone()),
                    // No usable weights: fall back to the first entry, if any
                    Err(_) => entries.first().map(|(_, v)| v.clone()),
                }
            }
        }
    }

    /// Serialize at the given indentation. Multi-line forms close at `indent`.
    pub fn serialize(&self, indent: &str) -> String {
        match self {
            Randomizer::Fixed(value) => format!("fixed {}", value.format_value()),
            Randomizer::Range { min, max } => {
                format!("range {} {}", min.format_value(), max.format_value())
            }
            Randomizer::Weighted(entries) => {
                let inner = format!("{indent}{INDENT_INCREMENT}");
                let mut out = String::from("weighted {\n");
                for (weight, value) in entries {
                    out.push_str(&format!("{inner}{weight} {}\n", value.format_value()));
                }
                out.push_str(&format!("{indent}}}"));
                out
            }
        }
    }

    /// Rebuild a randomizer from its serialized form
    pub fn init_deserialize(raw: &str) -> Result<Self> {
        let invalid = || ChallengeError::InvalidRandomizer(raw.to_string());

        let mut lines = raw.lines();
        let first = lines.next().ok_or_else(invalid)?.trim();
        let (tag, rest) = first.split_once(' ').unwrap_or((first, ""));

        match tag {
            "fixed" => T::parse_value(rest).map(Randomizer::Fixed).ok_or_else(invalid),
            "range" if T::SUPPORTS_RANGE => {
                let (min, max) = rest.trim().split_once(' ').ok_or_else(invalid)?;
                Ok(Randomizer::Range {
                    min: T::parse_value(min).ok_or_else(invalid)?,
                    max: T::parse_value(max).ok_or_else(invalid)?,
                })
            }
            "weighted" if rest.trim() == "{" => {
                let mut entries = Vec::new();
                for line in lines {
                    let line = line.trim();
                    if line == "}" {
                        break;
                    }
                    let (weight, value) = line.split_once(' ').ok_or_else(invalid)?;
                    let weight: f64 = weight.parse().map_err(|_| invalid())?;
                    entries.push((weight, T::parse_value(value).ok_or_else(invalid)?));
                }
                if entries.is_empty() {
                    return Err(invalid());
                }
                Ok(Randomizer::Weighted(entries))
            }
            _ => Err(invalid()),
        }
    }
}

/// Chance-based boolean randomizer
pub fn chance(probability: f64) -> Randomizer<bool> {
    Randomizer::Weighted(vec![(probability, true), (1.0 - probability, false)])
}

/// Wrap labelled field lines into a typed preset block
pub fn write_block(type_tag: &str, indent: &str, fields: &[(&str, String)]) -> String {
    let mut out = format!("{type_tag} {{\n");
    for (label, serialized) in fields {
        out.push_str(&format!("{indent}{INDENT_INCREMENT}{label}-{serialized}\n"));
    }
    out.push_str(&format!("{indent}}}"));
    out
}

/// Type tag on the first line of a preset block
pub fn block_type(block: &str) -> Option<&str> {
    let header = block.lines().next()?.trim();
    header.strip_suffix('{').map(str::trim)
}

/// Split a preset block into `label -> raw randomizer text`
///
/// Field order in the block does not matter. Nested multi-line values are
/// captured whole, including their closing brace.
pub fn to_dict(block: &str) -> Result<HashMap<String, String>> {
    let invalid = |line: &str| ChallengeError::InvalidRandomizer(line.to_string());

    let mut lines = block.lines();
    let header = lines.next().unwrap_or_default();
    if block_type(block).is_none() {
        return Err(invalid(header));
    }

    let mut dict = HashMap::new();
    let mut open: Option<(String, Vec<String>)> = None;
    let mut depth = 0usize;

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some((_, ref mut body)) = open {
            body.push(line.to_string());
            if trimmed.ends_with('{') {
                depth += 1;
            } else if trimmed == "}" {
                depth -= 1;
            }
            if depth == 0 {
                if let Some((label, body)) = open.take() {
                    dict.insert(label, body.join("\n"));
                }
            }
            continue;
        }

        if trimmed == "}" {
            break;
        }

        let (label, value) = trimmed.split_once('-').ok_or_else(|| invalid(trimmed))?;
        if value.ends_with('{') {
            depth = 1;
            open = Some((label.to_string(), vec![value.to_string()]));
        } else {
            dict.insert(label.to_string(), value.to_string());
        }
    }

    if let Some((label, _)) = open {
        return Err(invalid(&label));
    }

    Ok(dict)
}

/// Look up and deserialize one labelled field of a block
pub fn field<T: RandomValue>(
    dict: &HashMap<String, String>,
    randomizer: &str,
    label: &'static str,
) -> Result<Randomizer<T>> {
    let raw = dict.get(label).ok_or_else(|| ChallengeError::MissingLabel {
        randomizer: randomizer.to_string(),
        label,
    })?;
    Randomizer::init_deserialize(raw)
}
