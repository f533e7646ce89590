mod persist;
mod tiles;

pub use persist::{DEFAULT_STORAGE_KEY, init_sequencer, reset_sequencer_controls};
pub use tiles::ActiveTiles;

use serde::{Deserialize, Serialize};

use crate::layout::{Layout, STEPS_PER_MEASURE};
use crate::theory::{MAX_OCTAVE, MIN_OCTAVE, Note, PitchClass, ScaleKind};
use crate::{Error, Result};

pub const MAX_MEASURES: usize = 32;
pub const MAX_OCTAVES: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequencerControls {
    pub tonic: Note,
    /// Semitone offsets from the tonic.
    pub scale: Vec<u8>,
    pub measures: usize,
    pub octaves: usize,
    pub highlight_measure_start: bool,
}

impl Default for SequencerControls {
    fn default() -> Self {
        Self {
            tonic: Note::new(PitchClass::C, 3),
            scale: ScaleKind::Major.degrees().to_vec(),
            measures: 8,
            octaves: 1,
            highlight_measure_start: true,
        }
    }
}

impl SequencerControls {
    pub fn validate(&self) -> Result<()> {
        check_scale(&self.scale)?;
        check_measures(self.measures)?;
        check_octaves(self.octaves)?;
        if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&self.tonic.octave) {
            return Err(Error::InvalidNote(self.tonic.to_string()));
        }
        Ok(())
    }
}

/// Degrees are semitone offsets that strictly ascend and stay below 12.
fn check_scale(scale: &[u8]) -> Result<()> {
    if scale.is_empty() {
        return Err(Error::EmptyScale);
    }
    let ascending = scale.windows(2).all(|w| w[0] < w[1]);
    if !ascending || scale.iter().any(|&d| d >= 12) {
        return Err(Error::InvalidScale(scale.to_vec()));
    }
    Ok(())
}

fn check_measures(measures: usize) -> Result<()> {
    if (1..=MAX_MEASURES).contains(&measures) {
        Ok(())
    } else {
        Err(Error::InvalidMeasures {
            got: measures,
            max: MAX_MEASURES,
        })
    }
}

fn check_octaves(octaves: usize) -> Result<()> {
    if (1..=MAX_OCTAVES).contains(&octaves) {
        Ok(())
    } else {
        Err(Error::InvalidOctaves {
            got: octaves,
            max: MAX_OCTAVES,
        })
    }
}

/// Grid contents plus the controls that shape the grid. The layout is
/// re-derived every time a control changes, so it never goes stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sequencer {
    #[serde(skip)]
    pub is_loaded: bool,
    #[serde(flatten)]
    layout: Layout,
    active_tiles: ActiveTiles,
    #[serde(flatten)]
    controls: SequencerControls,
}

impl Default for Sequencer {
    fn default() -> Self {
        let controls = SequencerControls::default();
        Self {
            is_loaded: false,
            layout: Layout::derive(&controls),
            active_tiles: ActiveTiles::new(),
            controls,
        }
    }
}

impl Sequencer {
    pub fn new(controls: SequencerControls) -> Result<Self> {
        controls.validate()?;
        Ok(Self {
            is_loaded: false,
            layout: Layout::derive(&controls),
            active_tiles: ActiveTiles::new(),
            controls,
        })
    }

    /// Parses persisted state. Stored layout fields are ignored in favour of
    /// a fresh derivation from the stored controls.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut sequencer: Sequencer = serde_json::from_str(json)?;
        sequencer.controls.validate()?;
        sequencer.relayout();
        Ok(sequencer)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn rows(&self) -> &[usize] {
        &self.layout.rows
    }

    pub fn columns(&self) -> &[usize] {
        &self.layout.columns
    }

    pub fn string_scale(&self) -> &[String] {
        &self.layout.string_scale
    }

    pub fn controls(&self) -> &SequencerControls {
        &self.controls
    }

    pub fn active_tiles(&self) -> &ActiveTiles {
        &self.active_tiles
    }

    pub fn contains(&self, column: usize, row: usize) -> bool {
        (1..=self.layout.columns.len()).contains(&column) && row < self.layout.rows.len()
    }

    fn check_bounds(&self, column: usize, row: usize) -> Result<()> {
        if self.contains(column, row) {
            Ok(())
        } else {
            Err(Error::TileOutOfBounds { column, row })
        }
    }

    pub fn is_active(&self, column: usize, row: usize) -> bool {
        self.contains(column, row) && self.active_tiles.is_active(column, row)
    }

    pub fn toggle_tile(&mut self, column: usize, row: usize) -> Result<bool> {
        self.check_bounds(column, row)?;
        Ok(self.active_tiles.toggle(column, row))
    }

    pub fn set_tile(&mut self, column: usize, row: usize, active: bool) -> Result<()> {
        self.check_bounds(column, row)?;
        self.active_tiles.set(column, row, active);
        Ok(())
    }

    pub fn clear_tiles(&mut self) {
        self.active_tiles.clear();
    }

    /// Active cells inside the current grid. Cells left behind by a shrink
    /// stay stored but are skipped here.
    pub fn active_in_bounds(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.active_tiles
            .iter_active()
            .filter(|&(column, row)| self.contains(column, row))
    }

    /// Note names to sound at `column`, lowest row first.
    pub fn notes_at(&self, column: usize) -> Vec<&str> {
        if !(1..=self.layout.columns.len()).contains(&column) {
            return Vec::new();
        }
        self.layout
            .string_scale
            .iter()
            .enumerate()
            .filter(|&(row, _)| self.active_tiles.is_active(column, row))
            .map(|(_, name)| name.as_str())
            .collect()
    }

    pub fn is_measure_start(&self, column: usize) -> bool {
        column >= 1 && (column - 1) % STEPS_PER_MEASURE == 0
    }

    pub fn set_tonic(&mut self, tonic: Note) -> Result<()> {
        if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&tonic.octave) {
            return Err(Error::InvalidNote(tonic.to_string()));
        }
        self.controls.tonic = tonic;
        self.relayout();
        Ok(())
    }

    pub fn set_scale(&mut self, scale: Vec<u8>) -> Result<()> {
        check_scale(&scale)?;
        self.controls.scale = scale;
        self.relayout();
        Ok(())
    }

    pub fn set_measures(&mut self, measures: usize) -> Result<()> {
        check_measures(measures)?;
        self.controls.measures = measures;
        self.relayout();
        Ok(())
    }

    pub fn set_octaves(&mut self, octaves: usize) -> Result<()> {
        check_octaves(octaves)?;
        self.controls.octaves = octaves;
        self.relayout();
        Ok(())
    }

    pub fn set_highlight_measure_start(&mut self, highlight: bool) {
        self.controls.highlight_measure_start = highlight;
    }

    /// Restores default controls. Active tiles are not touched.
    pub fn reset_controls(&mut self) {
        self.controls = SequencerControls::default();
        self.relayout();
    }

    fn relayout(&mut self) {
        self.layout = Layout::derive(&self.controls);
    }
}
