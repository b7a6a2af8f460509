//! Presentation primitives
//!
//! A [`Phrase`] is a list of lines, each a list of [`Word`]s, that the host UI
//! turns into icons and labels. Challenges rebuild their phrase from scratch
//! whenever it is needed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// RGB color tint for an icon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
    pub const CYAN: Color = Color {
        r: 0.0,
        g: 1.0,
        b: 1.0,
    };
}

/// One element of a phrase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Word {
    /// Sprite from the host atlas
    Icon {
        name: String,
        scale: f32,
        color: Color,
        /// Rotation in degrees
        rotation: i32,
    },
    /// Plain text
    Verse(String),
    /// Progress toward a single target, shown as `[current/max]`
    Counter { current: i32, max: i32 },
    /// Progress inside a window, shown as `[min<current<max]`
    Range { min: i32, current: i32, max: i32 },
}

impl Word {
    /// Untinted, unrotated icon
    pub fn icon(name: &str) -> Self {
        Word::Icon {
            name: name.to_string(),
            scale: 1.0,
            color: Color::WHITE,
            rotation: 0,
        }
    }

    /// Icon for a host entity type; the host maps entity names to sprites
    pub fn entity_icon(entity: &str) -> Self {
        Self::icon(entity)
    }

    pub fn verse(text: &str) -> Self {
        Word::Verse(text.to_string())
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Word::Icon { name, .. } => write!(f, "({name})"),
            Word::Verse(text) => write!(f, "{text}"),
            Word::Counter { current, max } => write!(f, "[{current}/{max}]"),
            Word::Range { min, current, max } => write!(f, "[{min}<{current}<{max}]"),
        }
    }
}

/// Lines of words describing a challenge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Phrase {
    pub lines: Vec<Vec<Word>>,
}

impl Phrase {
    pub fn new(lines: Vec<Vec<Word>>) -> Self {
        Self { lines }
    }

    /// Append a word to the end of `line`. A line index one past the last
    /// line starts a new line.
    pub fn insert_word(&mut self, word: Word, line: usize) {
        if line >= self.lines.len() {
            self.lines.push(vec![word]);
        } else {
            self.lines[line].push(word);
        }
    }

    /// Append a word to the first line
    pub fn push_word(&mut self, word: Word) {
        self.insert_word(word, 0);
    }

    /// Total number of words
    pub fn word_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let words: Vec<String> = line.iter().map(ToString::to_string).collect();
            write!(f, "{}", words.join(" "))?;
        }
        Ok(())
    }
}
