//! A grammar engine for compact chord notation.
//!
//! Parses, validates, normalizes and transposes chord symbols
//! (`C`, `Am7`, `G(b5)\E`) and chord progressions, and classifies
//! progressions by their roman-numeral shape relative to a key.
//!
//! ```
//! use cadenza::{Chord, Progression};
//!
//! let mut chord: Chord = "Am7".parse().unwrap();
//! chord.transpose(2);
//! assert_eq!(chord.to_string(), "Bm7");
//!
//! let prog = Progression::from_text("C Am F G", "C").unwrap();
//! assert_eq!(prog.category_string(), "I-VI-IV-V");
//! ```

pub mod core;
pub mod progression;

pub use crate::core::{Chord, ChordParseError, Quality};
pub use progression::{
    ChordClass, Dataset, LineError, Progression, ProgressionError, ProgressionParseError,
};
