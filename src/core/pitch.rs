/// The twelve pitch classes, each with a sharp-preferred and a
/// flat-preferred spelling. Both tables start from A.
pub const SHARP_NAMES: [&str; 12] = [
    "A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#",
];
pub const FLAT_NAMES: [&str; 12] = [
    "A", "Bb", "B", "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab",
];

/// Resolve a spelling to its table and index within it.
/// The sharp table wins when a spelling appears in both (the naturals).
fn lookup(key: &str) -> Option<(&'static [&'static str; 12], usize)> {
    if let Some(idx) = SHARP_NAMES.iter().position(|&n| n == key) {
        Some((&SHARP_NAMES, idx))
    } else {
        FLAT_NAMES.iter().position(|&n| n == key)
            .map(|idx| (&FLAT_NAMES, idx))
    }
}

/// Pitch-class index of a spelling, if it is one of the 17 recognized ones.
pub fn index_of(key: &str) -> Option<usize> {
    lookup(key).map(|(_, idx)| idx)
}

/// Move a spelling by a number of halfsteps, in either direction.
/// The result is spelled from the same table that resolved the input,
/// so "Eb" stays flat-spelled and "D#" stays sharp-spelled.
/// Unrecognized spellings are returned unchanged.
pub fn transpose(key: &str, halfsteps: isize) -> String {
    match lookup(key) {
        Some((names, idx)) => {
            let idx = (idx as isize + halfsteps).rem_euclid(12) as usize;
            names[idx].to_string()
        }
        None => key.to_string(),
    }
}

/// Upward distance in halfsteps from one spelling to another, 0..=11.
/// Each endpoint resolves in whichever table contains it. Unrecognized
/// spellings yield 0; callers must not read 0 as a failure signal.
pub fn interval(from: &str, to: &str) -> usize {
    match (index_of(from), index_of(to)) {
        (Some(a), Some(b)) => (12 - a + b) % 12,
        _ => 0,
    }
}

/// Display hue for a spelling: 30 degrees of the color wheel per
/// pitch class, offset by `base_hue`. Unrecognized spellings fall
/// back to `base_hue` itself.
pub fn hue(key: &str, base_hue: u16) -> u16 {
    match index_of(key) {
        Some(idx) => (base_hue + idx as u16 * 30) % 360,
        None => base_hue,
    }
}
