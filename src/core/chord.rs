use super::pitch;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Note spellings recognized by the grammar. Two-character spellings
/// come first so the alternation never stops short at a natural.
const NOTES: [&str; 17] = [
    "A#", "C#", "D#", "F#", "G#", "Ab", "Bb", "Db", "Eb", "Gb",
    "A", "B", "C", "D", "E", "F", "G",
];

/// Addition tokens, slash-separated after the root and quality.
pub const ADDITIONS: [&str; 11] = [
    "2", "4", "5", "6", "maj6", "maj7", "7", "maj9", "9", "11", "13",
];

/// Modification tokens, slash-separated inside a parenthesized group.
pub const MODIFICATIONS: [&str; 11] = [
    "b3", "#4", "#5", "b5", "b6", "b9", "#9", "#11", "b13", "maj6", "maj7",
];

lazy_static! {
    static ref CHORD_RE: Regex = {
        let note = format!("(?:{})", NOTES.join("|"));
        let add = format!("(?:{})", ADDITIONS.join("|"));
        let adds = format!("(?:{add}(?:/{add})*)", add = add);
        let modif = format!("(?:{})", MODIFICATIONS.join("|"));
        let mods = format!(r"(?:\((?:{m}(?:/{m})*)\))", m = modif);
        Regex::new(&format!(
            r"^{note}(?:m?{adds}?|{adds}?(?:aug|dim|sus2|sus4)){mods}?(?:\\{note})?$",
            note = note,
            adds = adds,
            mods = mods,
        )).unwrap()
    };
}

/// Chord quality. A chord carries at most one; major is written as
/// the empty token.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Quality {
    Major,
    Minor,
    Augmented,
    Diminished,
    Sus2,
    Sus4,
}

impl Quality {
    /// The notation token for this quality.
    pub fn token(&self) -> &'static str {
        match self {
            Quality::Major => "",
            Quality::Minor => "m",
            Quality::Augmented => "aug",
            Quality::Diminished => "dim",
            Quality::Sus2 => "sus2",
            Quality::Sus4 => "sus4",
        }
    }

    /// Non-empty tokens in parse priority order. "m" comes first and is
    /// only considered when the buffer does not open with "maj".
    fn scan_order() -> [Quality; 5] {
        [
            Quality::Minor,
            Quality::Augmented,
            Quality::Diminished,
            Quality::Sus2,
            Quality::Sus4,
        ]
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

#[derive(Error, Debug)]
pub enum ChordParseError {
    #[error("Unrecognized chord `{0}`")]
    Unrecognized(String),
}

/// A single chord symbol: root spelling, quality, added notes,
/// modified notes, bass spelling.
///
/// The canonical `name` is recomputed by every constructor and mutator,
/// so it can never be observed stale.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Chord {
    key: String,
    quality: Quality,
    additions: Vec<String>,
    modifications: Vec<String>,
    bass: String,
    name: String,
}

impl Chord {
    /// Build a chord from its parts. `bass` defaults to the root.
    ///
    /// Spellings and tokens are taken as given: only string parsing
    /// runs the grammar, matching the leniency of the pitch-class
    /// operations for out-of-alphabet spellings.
    pub fn new(
        key: &str,
        quality: Quality,
        additions: &[&str],
        modifications: &[&str],
        bass: Option<&str>,
    ) -> Chord {
        Chord::from_parts(
            key.to_string(),
            quality,
            additions.iter().map(|s| s.to_string()).collect(),
            modifications.iter().map(|s| s.to_string()).collect(),
            bass.unwrap_or(key).to_string(),
        )
    }

    fn from_parts(
        key: String,
        quality: Quality,
        additions: Vec<String>,
        modifications: Vec<String>,
        bass: String,
    ) -> Chord {
        let mut chord = Chord {
            key,
            quality,
            additions,
            modifications,
            bass,
            name: String::new(),
        };
        chord.name = chord.render_name();
        chord
    }

    /// Canonical serialization: root, then the major/minor token, then
    /// additions, then any other quality token, then the modification
    /// group, then the bass when it differs from the root.
    ///
    /// The ordering puts "aug"/"dim"/"sus2"/"sus4" after the additions,
    /// which is why parsing only looks for those tokens at the front of
    /// an addition-free buffer.
    fn render_name(&self) -> String {
        let mut name = self.key.clone();
        if matches!(self.quality, Quality::Major | Quality::Minor) {
            name.push_str(self.quality.token());
        }
        if !self.additions.is_empty() {
            name.push_str(&self.additions.join("/"));
        }
        if !matches!(self.quality, Quality::Major | Quality::Minor) {
            name.push_str(self.quality.token());
        }
        if !self.modifications.is_empty() {
            name.push('(');
            name.push_str(&self.modifications.join("/"));
            name.push(')');
        }
        if self.bass != self.key {
            name.push('\\');
            name.push_str(&self.bass);
        }
        name
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn additions(&self) -> &[String] {
        &self.additions
    }

    pub fn modifications(&self) -> &[String] {
        &self.modifications
    }

    pub fn bass(&self) -> &str {
        &self.bass
    }

    /// The canonical string form.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Move the root and bass by a number of halfsteps, each keeping
    /// its spelling table.
    pub fn transpose(&mut self, halfsteps: isize) {
        self.key = pitch::transpose(&self.key, halfsteps);
        self.bass = pitch::transpose(&self.bass, halfsteps);
        self.name = self.render_name();
    }

    /// Display color for this chord, keyed to the root spelling.
    pub fn color(&self, base_hue: u16) -> String {
        format!("hsl({}, 40%, 70%)", pitch::hue(&self.key, base_hue))
    }
}

/// Split a grammar-accepted chord string into its parts.
///
/// Assumes `s` already matched `CHORD_RE`; on such input this step
/// cannot fail. The quality scan only looks at the front of the
/// buffer, so a post-root quality written after additions (as in
/// "C7sus4") stays fused into the final addition token. The canonical
/// name still reproduces the input.
fn decompose(s: &str) -> Chord {
    let mut buffer = s;

    // Root spelling: base letter plus optional accidental.
    let key_len = match buffer.as_bytes().get(1) {
        Some(b'#') | Some(b'b') => 2,
        _ => 1,
    };
    let key = &buffer[..key_len];
    buffer = &buffer[key_len..];

    // Explicit bass after the backslash.
    let (rest, bass) = match buffer.find('\\') {
        Some(idx) => (&buffer[..idx], &buffer[idx + 1..]),
        None => (buffer, key),
    };
    buffer = rest;

    // Parenthesized modification group; the grammar puts it last.
    let mut modifications: Vec<String> = vec![];
    if let Some(idx) = buffer.find('(') {
        let group = &buffer[idx + 1..buffer.len() - 1];
        modifications = group.split('/').map(str::to_string).collect();
        buffer = &buffer[..idx];
    }

    // Quality token. A leading "maj" always belongs to an addition
    // ("maj7", "maj9"), never to the minor token.
    let mut quality = Quality::Major;
    if !buffer.starts_with("maj") {
        for q in Quality::scan_order() {
            if buffer.starts_with(q.token()) {
                quality = q;
                buffer = &buffer[q.token().len()..];
                break;
            }
        }
    }

    // Whatever remains is the addition list.
    let additions: Vec<String> = buffer
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    Chord::from_parts(
        key.to_string(),
        quality,
        additions,
        modifications,
        bass.to_string(),
    )
}

/// Try to parse a chord from a string, e.g. "Am7" or "G(b5)\E".
impl FromStr for Chord {
    type Err = ChordParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !CHORD_RE.is_match(s) {
            return Err(ChordParseError::Unrecognized(s.to_string()));
        }
        Ok(decompose(s))
    }
}

impl TryFrom<&str> for Chord {
    type Error = ChordParseError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::from_str(s)
    }
}

impl TryFrom<String> for Chord {
    type Error = ChordParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_str(&s)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Chords serialize as their canonical string form.
impl Serialize for Chord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.name)
    }
}
