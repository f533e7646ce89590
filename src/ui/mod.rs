mod grid;

use crate::sequencer::{MAX_MEASURES, MAX_OCTAVES};
use crate::theory::{MAX_OCTAVE, MIN_OCTAVE, Note, PitchClass, ScaleKind};
use crate::{InstrumentRegistry, Result, Sequencer, Store, reset_sequencer_controls};
use eframe::egui;
use grid::{GridState, SequencerGrid};

pub struct SequencerApp {
    sequencer: Store<Sequencer>,
    instruments: Store<InstrumentRegistry>,
    grid_state: GridState,
    error_message: Option<String>,
}

impl SequencerApp {
    pub fn new(sequencer: Store<Sequencer>, instruments: Store<InstrumentRegistry>) -> Self {
        Self {
            sequencer,
            instruments,
            grid_state: GridState::default(),
            error_message: None,
        }
    }

    fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "rejected edit");
            self.error_message = Some(e.to_string());
        }
    }

    fn instrument_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Instruments");

        let registry = self.instruments.get();
        for (i, instrument) in registry.iter().enumerate() {
            let is_selected = registry.selected_index() == Some(i);
            if ui.selectable_label(is_selected, &instrument.name).clicked() && !is_selected {
                let result = self
                    .instruments
                    .update(|r| r.select_index(i).map(|_| ()));
                self.report(result);
            }
        }
    }

    fn controls_panel(&mut self, ui: &mut egui::Ui, sequencer: &Sequencer) {
        ui.heading("Controls");
        let controls = sequencer.controls();

        let mut pitch_class = controls.tonic.pitch_class;
        let mut octave = controls.tonic.octave;
        ui.horizontal(|ui| {
            egui::ComboBox::from_label("Tonic")
                .selected_text(pitch_class.name())
                .show_ui(ui, |ui| {
                    for pc in PitchClass::ALL {
                        ui.selectable_value(&mut pitch_class, pc, pc.name());
                    }
                });
            ui.add(egui::DragValue::new(&mut octave).range(MIN_OCTAVE..=MAX_OCTAVE));
        });
        if pitch_class != controls.tonic.pitch_class || octave != controls.tonic.octave {
            let result = self
                .sequencer
                .update(|s| s.set_tonic(Note::new(pitch_class, octave)));
            self.report(result);
        }

        let current = ScaleKind::from_degrees(&controls.scale);
        let mut kind = current;
        egui::ComboBox::from_label("Scale")
            .selected_text(current.map_or("Custom", ScaleKind::name))
            .show_ui(ui, |ui| {
                for k in ScaleKind::ALL {
                    ui.selectable_value(&mut kind, Some(k), k.name());
                }
            });
        if kind != current {
            if let Some(k) = kind {
                let result = self
                    .sequencer
                    .update(|s| s.set_scale(k.degrees().to_vec()));
                self.report(result);
            }
        }

        let mut measures = controls.measures;
        let mut octaves = controls.octaves;
        ui.add(egui::DragValue::new(&mut measures).range(1..=MAX_MEASURES).prefix("Measures: "));
        ui.add(egui::DragValue::new(&mut octaves).range(1..=MAX_OCTAVES).prefix("Octaves: "));
        if measures != controls.measures {
            let result = self.sequencer.update(|s| s.set_measures(measures));
            self.report(result);
        }
        if octaves != controls.octaves {
            let result = self.sequencer.update(|s| s.set_octaves(octaves));
            self.report(result);
        }

        let mut highlight = controls.highlight_measure_start;
        if ui.checkbox(&mut highlight, "Highlight measure start").changed() {
            self.sequencer
                .update(|s| s.set_highlight_measure_start(highlight));
        }

        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("Reset controls").clicked() {
                reset_sequencer_controls(&self.sequencer);
            }
            if ui.button("Clear grid").clicked() {
                self.sequencer.update(Sequencer::clear_tiles);
            }
        });
    }
}

impl eframe::App for SequencerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let sequencer = self.sequencer.get();

        let mut dismiss_error = false;
        if let Some(ref error) = self.error_message {
            egui::TopBottomPanel::top("error").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, error);
                    dismiss_error = ui.small_button("✕").clicked();
                });
            });
        }
        if dismiss_error {
            self.error_message = None;
        }

        egui::SidePanel::left("controls")
            .min_width(220.0)
            .show(ctx, |ui| {
                self.instrument_panel(ui);
                ui.separator();
                self.controls_panel(ui, &sequencer);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if !sequencer.is_loaded {
                ui.vertical_centered(|ui| {
                    ui.heading("Loading sequencer...");
                });
                return;
            }

            let instrument = self
                .instruments
                .with(|r| r.selected().map(|i| i.name.clone()))
                .unwrap_or_else(|| "No instrument".to_string());
            ui.label(format!(
                "{} | {} measures | {} active",
                instrument,
                sequencer.controls().measures,
                sequencer.active_in_bounds().count()
            ));
            ui.separator();

            egui::ScrollArea::both().show(ui, |ui| {
                let response = SequencerGrid::new(&sequencer, &mut self.grid_state).show(ui);
                if let Some((column, row)) = response.toggled {
                    let result = self
                        .sequencer
                        .update(|s| s.toggle_tile(column, row).map(|_| ()));
                    self.report(result);
                }
            });
        });
    }
}
