mod note;
mod scale;

pub use note::{MAX_OCTAVE, MIN_OCTAVE, Note, PitchClass};
pub use scale::{Scale, ScaleKind};
