mod dataset;

pub use dataset::{
    filter, sample, sample_by_chord_count, sample_by_class, ChordClass,
    ChordClassParseError, Dataset, LineError,
};

use crate::core::{pitch, Chord, ChordParseError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Roman-numeral label for each halfstep distance from the key root.
/// Distances 3/4, 8/9 and 10/11 share a label: minor and major
/// third, sixth and seventh collapse into one harmonic category.
const NUMERALS: [&str; 12] = [
    "I", "bII", "II", "III", "III", "IV", "#IV", "V", "VI", "VI", "VII", "VII",
];

#[derive(Error, Debug)]
pub enum ProgressionParseError {
    #[error("Invalid chord `{token}` in progression `{text}`")]
    InvalidChord {
        text: String,
        token: String,
        source: ChordParseError,
    },
}

#[derive(Error, Debug)]
pub enum ProgressionError {
    #[error("Unresolved scale degree `{0}`")]
    UnresolvedDegree(String),
}

/// An ordered chord sequence anchored to a key.
///
/// The roman-numeral `category` is the progression's harmonic shape
/// relative to that key. It is rederived by every constructor and
/// mutator, so it always has one label per chord and is never stale.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Progression {
    key: String,
    chords: Vec<Chord>,
    category: Vec<&'static str>,
}

impl Progression {
    pub fn new(chords: Vec<Chord>, key: &str) -> Progression {
        let mut prog = Progression {
            key: key.to_string(),
            chords,
            category: vec![],
        };
        prog.category = prog.derive_category();
        prog
    }

    /// Parse a space-separated progression, e.g. "C Am F G".
    /// The first token that fails the chord grammar aborts the parse.
    pub fn from_text(text: &str, key: &str) -> Result<Progression, ProgressionParseError> {
        let chords = text
            .split(' ')
            .map(|token| {
                token.parse().map_err(|source| ProgressionParseError::InvalidChord {
                    text: text.to_string(),
                    token: token.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<Chord>, _>>()?;
        Ok(Progression::new(chords, key))
    }

    fn derive_category(&self) -> Vec<&'static str> {
        self.chords
            .iter()
            .map(|chord| NUMERALS[pitch::interval(&self.key, chord.key())])
            .collect()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    /// Number of chords in the progression.
    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// One roman-numeral label per chord.
    pub fn category(&self) -> &[&'static str] {
        &self.category
    }

    /// Replace the chord at `idx`, rederiving the category.
    pub fn set_chord(&mut self, idx: usize, chord: Chord) {
        self.chords[idx] = chord;
        self.category = self.derive_category();
    }

    /// Move the key and every chord by the same number of halfsteps.
    pub fn transpose(&mut self, halfsteps: isize) {
        self.key = pitch::transpose(&self.key, halfsteps);
        for chord in &mut self.chords {
            chord.transpose(halfsteps);
        }
        self.category = self.derive_category();
    }

    /// Two progressions share a harmonic shape iff their numeral
    /// sequences are element-wise equal.
    pub fn same_category(&self, other: &Progression) -> bool {
        self.category == other.category
    }

    pub fn category_string(&self) -> String {
        self.category.join("-")
    }
}

impl fmt::Display for Progression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.chords.iter().map(|c| c.name()).collect();
        write!(f, "{}", names.join(" "))
    }
}

/// Resolve a scale degree to the key at that distance from `root`,
/// e.g. ("C", "V") -> "G". Only a fixed subset of degrees resolves;
/// notably bIII, bVI and bVII have no entry and are reported as
/// unresolved rather than guessed at.
pub fn key_of_degree(root: &str, degree: &str) -> Result<String, ProgressionError> {
    let halfsteps = match degree {
        "I" => 0,
        "bII" => 1,
        "II" => 2,
        "III" => 4,
        "IV" => 5,
        "bV" => 6,
        "#IV" => 6,
        "V" => 7,
        "VI" => 9,
        "VII" => 11,
        _ => return Err(ProgressionError::UnresolvedDegree(degree.to_string())),
    };
    Ok(pitch::transpose(root, halfsteps))
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_text_category() {
        let prog = Progression::from_text("C Am F G", "C").unwrap();
        assert_eq!(prog.len(), 4);
        assert_eq!(prog.category(), vec!["I", "VI", "IV", "V"]);
        assert_eq!(prog.category_string(), "I-VI-IV-V");
        assert_eq!(prog.to_string(), "C Am F G");
    }

    #[test]
    fn test_from_text_names_failing_token() {
        let err = Progression::from_text("C X7bogus G", "C").unwrap_err();
        let ProgressionParseError::InvalidChord { text, token, .. } = err;
        assert_eq!(text, "C X7bogus G");
        assert_eq!(token, "X7bogus");
    }

    #[test]
    fn test_category_matches_chord_count() {
        for (text, n) in [("C", 1), ("C G", 2), ("C Am F G C Am F G", 8)] {
            let prog = Progression::from_text(text, "C").unwrap();
            assert_eq!(prog.category().len(), n);
        }
    }

    #[test]
    fn test_category_collapses_thirds_sixths_sevenths() {
        // Known coarse grouping: distances 3 and 4 share "III",
        // 8 and 9 share "VI", 10 and 11 share "VII".
        let prog = Progression::from_text("Eb E Ab A Bb B", "C").unwrap();
        assert_eq!(prog.category(), vec!["III", "III", "VI", "VI", "VII", "VII"]);
    }

    #[test]
    fn test_same_category_across_keys() {
        let a = Progression::from_text("C Am F G", "C").unwrap();
        let b = Progression::from_text("G Em C D", "G").unwrap();
        assert!(a.same_category(&b));

        let c = Progression::from_text("C F G", "C").unwrap();
        assert!(!a.same_category(&c));

        let d = Progression::from_text("C F Am G", "C").unwrap();
        assert!(!a.same_category(&d));
    }

    #[test]
    fn test_transpose() {
        let mut prog = Progression::from_text("C Am F G", "C").unwrap();
        let before = prog.category().to_vec();

        prog.transpose(2);
        assert_eq!(prog.key(), "D");
        assert_eq!(prog.to_string(), "D Bm G A");
        // Transposition never changes the harmonic shape.
        assert_eq!(prog.category(), before);

        prog.transpose(-2);
        assert_eq!(prog, Progression::from_text("C Am F G", "C").unwrap());
    }

    #[test]
    fn test_transpose_preserves_spelling_table() {
        let mut prog = Progression::from_text("Eb Bb", "Eb").unwrap();
        prog.transpose(0);
        assert_eq!(prog.to_string(), "Eb Bb");
        assert_eq!(prog.key(), "Eb");
    }

    #[test]
    fn test_set_chord_rederives_category() {
        let mut prog = Progression::from_text("C Am F G", "C").unwrap();
        prog.set_chord(1, "Em".parse().unwrap());
        assert_eq!(prog.category(), vec!["I", "III", "IV", "V"]);
        assert_eq!(prog.to_string(), "C Em F G");
    }

    #[test]
    fn test_key_of_degree() {
        assert_eq!(key_of_degree("C", "I").unwrap(), "C");
        assert_eq!(key_of_degree("C", "bII").unwrap(), "C#");
        assert_eq!(key_of_degree("C", "IV").unwrap(), "F");
        assert_eq!(key_of_degree("C", "bV").unwrap(), "F#");
        assert_eq!(key_of_degree("C", "#IV").unwrap(), "F#");
        assert_eq!(key_of_degree("C", "V").unwrap(), "G");
        assert_eq!(key_of_degree("C", "VII").unwrap(), "B");
        // Flat spellings resolve through the flat table.
        assert_eq!(key_of_degree("Bb", "V").unwrap(), "F");
    }

    #[test]
    fn test_key_of_degree_unresolved() {
        for degree in ["bIII", "bVI", "bVII", "VIII", "", "ii"] {
            let err = key_of_degree("C", degree).unwrap_err();
            let ProgressionError::UnresolvedDegree(label) = err;
            assert_eq!(label, degree);
        }
    }

    #[test]
    fn test_unknown_key_intervals_degrade_to_tonic() {
        // Documented leniency: an unresolvable key yields interval 0,
        // so every chord labels as "I" rather than failing.
        let prog = Progression::from_text("C G", "H").unwrap();
        assert_eq!(prog.category(), vec!["I", "I"]);
    }
}
