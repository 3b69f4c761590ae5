use std::fmt;

/// Serialized score: one record per line, every line newline-terminated.
///
/// This is the only form the engine's score loader accepts. An empty score
/// is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreText(String);

impl ScoreText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn lines(&self) -> std::str::Lines<'_> {
        self.0.lines()
    }

    pub fn line_count(&self) -> usize {
        self.0.lines().count()
    }
}

impl From<String> for ScoreText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for ScoreText {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl AsRef<str> for ScoreText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScoreText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
