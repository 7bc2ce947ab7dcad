pub mod bank;
pub mod sampler;
pub mod session;
pub mod shuffle;
pub mod tier;

use std::fmt;

pub const OPTION_COUNT: usize = 4;

/// Option position label. For a `Question` it is the original position,
/// for a presented option it may also be the cosmetic display position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Letter {
    A,
    B,
    C,
    D,
}

impl Letter {
    pub const ALL: [Letter; OPTION_COUNT] = [Letter::A, Letter::B, Letter::C, Letter::D];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_char(self) -> char {
        (b'A' + self as u8) as char
    }

    pub fn from_char(c: char) -> Option<Letter> {
        match c {
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            _ => None,
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Normalized correct answer of a question.
///
/// The key is either a letter (`"B"`) or free text (`"H2O"`, `"水"`). Grading
/// tries the letter first and falls back to the option text, so a
/// single-letter free-text answer never has to be told apart by its shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnswerKey(String);

/// How an answer key resolved against a question's options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMatch {
    Letter(Letter),
    Text(Letter),
}

impl AnswerKey {
    /// Trims the raw answer and uppercases it when it is a single ASCII letter.
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => Self(c.to_ascii_uppercase().to_string()),
            _ => Self(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn letter(&self) -> Option<Letter> {
        let mut chars = self.0.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Letter::from_char(c),
            _ => None,
        }
    }

    pub fn matches(&self, original_letter: Letter, text: &str) -> bool {
        if self.letter() == Some(original_letter) {
            return true;
        }
        !self.0.is_empty() && text.trim() == self.0
    }

    /// Every original option this key grades correct, letter matches first.
    pub fn resolve(&self, options: &[String; OPTION_COUNT]) -> Vec<KeyMatch> {
        let by_letter = self.letter();
        let by_text = Letter::ALL
            .iter()
            .zip(options.iter())
            .filter(|(letter, text)| {
                Some(**letter) != by_letter && self.matches(**letter, text)
            })
            .map(|(letter, _)| KeyMatch::Text(*letter));
        by_letter.map(KeyMatch::Letter).into_iter().chain(by_text).collect()
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct_key: AnswerKey,
}

impl Question {
    pub fn new(text: String, options: [String; OPTION_COUNT], answer: &str) -> Self {
        Self {
            text,
            options,
            correct_key: AnswerKey::normalize(answer),
        }
    }

    pub fn is_correct(&self, original_letter: Letter, text: &str) -> bool {
        self.correct_key.matches(original_letter, text)
    }

    pub fn is_answerable(&self) -> bool {
        !self.correct_key.resolve(&self.options).is_empty()
    }
}
