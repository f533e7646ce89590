//! Step sequencer core: scale-driven grid layout, observable sequencer and
//! instrument state, and persistence of the grid between sessions.

pub mod config;
pub mod error;
pub mod instruments;
pub mod layout;
pub mod sequencer;
pub mod storage;
pub mod store;
pub mod theory;
pub mod ui;

pub use config::Config;
pub use error::{Error, Result};
pub use instruments::{Instrument, InstrumentRegistry, Synth, SynthKind, create_instruments};
pub use layout::{Layout, STEPS_PER_MEASURE, get_columns, get_rows, get_scale};
pub use sequencer::{
    ActiveTiles, DEFAULT_STORAGE_KEY, MAX_MEASURES, MAX_OCTAVES, Sequencer, SequencerControls,
    init_sequencer, reset_sequencer_controls,
};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{Store, Subscription};
pub use ui::SequencerApp;
