use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::store::Store;
use crate::{Error, Result};

const PIANO_BASE_URL: &str = "/assets/piano/";
const PIANO_START_OCTAVE: i32 = 2;
const PIANO_END_OCTAVE: i32 = 6;
const PIANO_SAMPLED_NOTES: &[&str] = &["C"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SynthKind {
    Mono,
    Am,
    Fm,
}

/// What the audio backend needs to build a playable voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Synth {
    Sampler {
        urls: BTreeMap<String, String>,
        base_url: String,
    },
    PolySynth {
        voice: SynthKind,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub name: String,
    pub synth: Synth,
}

impl Instrument {
    pub fn new(name: impl Into<String>, synth: Synth) -> Self {
        Self {
            name: name.into(),
            synth,
        }
    }

    pub fn piano() -> Self {
        let urls = (PIANO_START_OCTAVE..=PIANO_END_OCTAVE)
            .flat_map(|octave| {
                PIANO_SAMPLED_NOTES
                    .iter()
                    .map(move |note| format!("{}{}", note, octave))
            })
            .map(|name| {
                let file = format!("{}.ogg", name);
                (name, file)
            })
            .collect();

        Self::new(
            "Piano",
            Synth::Sampler {
                urls,
                base_url: PIANO_BASE_URL.to_string(),
            },
        )
    }

    pub fn poly(name: impl Into<String>, voice: SynthKind) -> Self {
        Self::new(name, Synth::PolySynth { voice })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstrumentRegistry {
    selected: Option<usize>,
    all: Vec<Instrument>,
}

impl InstrumentRegistry {
    pub fn new(all: Vec<Instrument>) -> Self {
        let selected = if all.is_empty() { None } else { Some(0) };
        Self { selected, all }
    }

    pub fn with_defaults() -> Self {
        Self::new(vec![
            Instrument::piano(),
            Instrument::poly("Mono Synth", SynthKind::Mono),
            Instrument::poly("AM Synth", SynthKind::Am),
            Instrument::poly("FM Synth", SynthKind::Fm),
        ])
    }

    pub fn selected(&self) -> Option<&Instrument> {
        self.selected.and_then(|i| self.all.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn select(&mut self, name: &str) -> Result<&Instrument> {
        let index = self
            .all
            .iter()
            .position(|i| i.name == name)
            .ok_or_else(|| Error::UnknownInstrument(name.to_string()))?;
        self.selected = Some(index);
        Ok(&self.all[index])
    }

    pub fn select_index(&mut self, index: usize) -> Result<&Instrument> {
        let instrument = self
            .all
            .get(index)
            .ok_or_else(|| Error::UnknownInstrument(format!("#{}", index)))?;
        self.selected = Some(index);
        Ok(instrument)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.all.iter()
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Replaces the registry with the built-in instruments, first one selected.
pub fn create_instruments(registry: &Store<InstrumentRegistry>) {
    let instruments = InstrumentRegistry::with_defaults();
    tracing::info!(count = instruments.len(), "created instruments");
    registry.set(instruments);
}
