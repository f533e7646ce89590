//! Turns the musical controls into grid geometry.

use serde::{Deserialize, Serialize};

use crate::sequencer::SequencerControls;
use crate::theory::{Note, Scale};

pub const STEPS_PER_MEASURE: usize = 4;

/// Column indices `1..=measures * 4`. A count that overflows yields no
/// columns.
pub fn get_columns(measures: usize) -> Vec<usize> {
    let steps = measures.checked_mul(STEPS_PER_MEASURE).unwrap_or(0);
    (1..=steps).collect()
}

/// Row indices from `scale.len() - 1` down to `0`, so the highest note
/// renders at the top.
pub fn get_rows<S>(scale: &[S]) -> Vec<usize> {
    (0..scale.len()).rev().collect()
}

/// Note names for `octaves` stacked copies of the scale, lowest first.
pub fn get_scale(tonic: Note, degrees: &[u8], octaves: usize) -> Vec<String> {
    let mut scale = Scale::new(tonic, degrees);
    let mut composite = Vec::new();
    for _ in 0..octaves {
        composite.extend(scale.to_string_array());
        scale.raise_octave();
    }
    composite
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub rows: Vec<usize>,
    pub columns: Vec<usize>,
    pub string_scale: Vec<String>,
}

impl Layout {
    pub fn derive(controls: &SequencerControls) -> Self {
        let string_scale = get_scale(controls.tonic, &controls.scale, controls.octaves);
        Self {
            rows: get_rows(&string_scale),
            columns: get_columns(controls.measures),
            string_scale,
        }
    }
}
