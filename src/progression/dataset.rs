use super::{Progression, ProgressionParseError};
use crate::core::{Chord, Quality};
use rand::seq::SliceRandom;
use std::{fmt, str::FromStr};
use thiserror::Error;
use tracing::warn;

/// Chord classes a filter can ask for, matched against each chord's
/// quality and addition tokens.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ChordClass {
    All,
    Major,
    Minor,
    Seventh,
    Diminished,
    Augmented,
}

#[derive(Error, Debug)]
pub enum ChordClassParseError {
    #[error("Unknown chord class `{0}`")]
    Unknown(String),
}

impl ChordClass {
    /// Whether `chord` belongs to this class. Sevenths are recognized
    /// by exact addition-token membership, so a fused token like
    /// "7sus4" does not count.
    pub fn matches(&self, chord: &Chord) -> bool {
        match self {
            ChordClass::All => true,
            ChordClass::Major => chord.quality() == Quality::Major,
            ChordClass::Minor => chord.quality() == Quality::Minor,
            ChordClass::Seventh => {
                chord.additions().iter().any(|a| a == "7" || a == "maj7")
            }
            ChordClass::Diminished => chord.quality() == Quality::Diminished,
            ChordClass::Augmented => chord.quality() == Quality::Augmented,
        }
    }

    fn token(&self) -> &'static str {
        match self {
            ChordClass::All => "all",
            ChordClass::Major => "major",
            ChordClass::Minor => "minor",
            ChordClass::Seventh => "seventh",
            ChordClass::Diminished => "dim",
            ChordClass::Augmented => "aug",
        }
    }
}

impl fmt::Display for ChordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for ChordClass {
    type Err = ChordClassParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ChordClass::All),
            "major" => Ok(ChordClass::Major),
            "minor" => Ok(ChordClass::Minor),
            "seventh" => Ok(ChordClass::Seventh),
            "dim" => Ok(ChordClass::Diminished),
            "aug" => Ok(ChordClass::Augmented),
            _ => Err(ChordClassParseError::Unknown(s.to_string())),
        }
    }
}

/// A dataset line that failed to parse.
#[derive(Debug)]
pub struct LineError {
    /// 1-based line number.
    pub line: usize,
    /// The line as read, trimmed.
    pub content: String,
    pub error: ProgressionParseError,
}

impl LineError {
    /// The chord token that caused the failure.
    pub fn token(&self) -> &str {
        let ProgressionParseError::InvalidChord { token, .. } = &self.error;
        token
    }
}

/// A parsed progression dataset.
///
/// The text format is one progression per line,
/// `"<space-separated chords>[, <key>]"`, with the key defaulting
/// to C. Blank lines are skipped.
#[derive(Debug, Default)]
pub struct Dataset {
    pub progressions: Vec<Progression>,
    pub errors: Vec<LineError>,
}

impl Dataset {
    /// Parse a whole dataset. A malformed line is recorded and
    /// skipped; the batch never aborts.
    pub fn parse(text: &str) -> Dataset {
        let mut dataset = Dataset::default();
        for (idx, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let mut parts = trimmed.split(',');
            let prog = parts.next().unwrap_or_default().trim();
            let key = parts.next().map(str::trim).unwrap_or("C");

            match Progression::from_text(prog, key) {
                Ok(prog) => dataset.progressions.push(prog),
                Err(error) => {
                    warn!(line = idx + 1, "skipping malformed progression `{}`", trimmed);
                    dataset.errors.push(LineError {
                        line: idx + 1,
                        content: trimmed.to_string(),
                        error,
                    });
                }
            }
        }
        dataset
    }
}

fn matches_any(prog: &Progression, classes: &[ChordClass]) -> bool {
    prog.chords()
        .iter()
        .any(|chord| classes.iter().any(|class| class.matches(chord)))
}

/// Uniform random pick, returned as an independent copy of the source
/// entry. Mutating the sample never touches the source list.
pub fn sample(list: &[Progression]) -> Option<Progression> {
    list.choose(&mut rand::thread_rng()).cloned()
}

/// Uniform random pick among progressions with exactly `count` chords.
pub fn sample_by_chord_count(list: &[Progression], count: usize) -> Option<Progression> {
    let matching: Vec<&Progression> = list.iter().filter(|p| p.len() == count).collect();
    matching.choose(&mut rand::thread_rng()).map(|p| (*p).clone())
}

/// Uniform random pick among progressions with at least one chord in
/// one of the requested classes. An empty class list is unconstrained,
/// and `All` matches any chord.
pub fn sample_by_class(list: &[Progression], classes: &[ChordClass]) -> Option<Progression> {
    if classes.is_empty() {
        return sample(list);
    }
    let matching: Vec<&Progression> =
        list.iter().filter(|p| matches_any(p, classes)).collect();
    matching.choose(&mut rand::thread_rng()).map(|p| (*p).clone())
}

/// The subset with at most `max_chords` chords (when given) and, unless
/// `All` is requested or the class list is empty, at least one chord in
/// one of the requested classes. Returns owned copies so the result
/// feeds straight into the samplers.
pub fn filter(
    list: &[Progression],
    max_chords: Option<usize>,
    classes: &[ChordClass],
) -> Vec<Progression> {
    list.iter()
        .filter(|p| max_chords.map_or(true, |max| p.len() <= max))
        .filter(|p| {
            classes.is_empty()
                || classes.contains(&ChordClass::All)
                || matches_any(p, classes)
        })
        .cloned()
        .collect()
}
