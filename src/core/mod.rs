mod chord;
pub mod pitch;

pub use chord::{Chord, ChordParseError, Quality, ADDITIONS, MODIFICATIONS};
