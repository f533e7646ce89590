use crate::Sequencer;
use eframe::egui;

const LABEL_WIDTH: f32 = 50.0;

#[derive(Clone)]
pub struct GridState {
    pub cell_size: f32,
}

impl Default for GridState {
    fn default() -> Self {
        Self { cell_size: 28.0 }
    }
}

pub struct SequencerGrid<'a> {
    sequencer: &'a Sequencer,
    state: &'a mut GridState,
}

pub struct GridResponse {
    /// `(column, row)` of a clicked cell.
    pub toggled: Option<(usize, usize)>,
}

impl<'a> SequencerGrid<'a> {
    pub fn new(sequencer: &'a Sequencer, state: &'a mut GridState) -> Self {
        Self { sequencer, state }
    }

    pub fn show(mut self, ui: &mut egui::Ui) -> GridResponse {
        self.handle_input(ui);

        let cell = self.state.cell_size;
        let rows = self.sequencer.rows();
        let columns = self.sequencer.columns();
        let size = egui::Vec2::new(
            LABEL_WIDTH + columns.len() as f32 * cell,
            rows.len() as f32 * cell,
        );
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click());
        let rect = response.rect;

        painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(30, 30, 30));

        self.draw_labels(&painter, rect);
        self.draw_cells(&painter, rect);
        self.draw_measure_lines(&painter, rect);

        let mut toggled = None;
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                toggled = cell_at(pos, rect, cell, rows, columns);
            }
        }

        GridResponse { toggled }
    }

    fn handle_input(&mut self, ui: &egui::Ui) {
        ui.input(|i| {
            if i.modifiers.ctrl {
                let zoom_factor = 1.0 + i.smooth_scroll_delta.y * 0.01;
                self.state.cell_size = (self.state.cell_size * zoom_factor).clamp(12.0, 64.0);
            }
        });
    }

    fn draw_labels(&self, painter: &egui::Painter, rect: egui::Rect) {
        let cell = self.state.cell_size;
        let scale = self.sequencer.string_scale();
        let degrees = self.sequencer.controls().scale.len().max(1);

        for (line, &row) in self.sequencer.rows().iter().enumerate() {
            let label_rect = egui::Rect::from_min_size(
                egui::Pos2::new(rect.left(), rect.top() + line as f32 * cell),
                egui::Vec2::new(LABEL_WIDTH, cell),
            );
            let Some(name) = scale.get(row) else {
                continue;
            };

            let (fill, text) = if row % degrees == 0 {
                (egui::Color32::from_rgb(200, 200, 200), egui::Color32::BLACK)
            } else {
                (egui::Color32::from_rgb(60, 60, 60), egui::Color32::WHITE)
            };

            painter.rect_filled(label_rect, 0.0, fill);
            painter.rect_stroke(
                label_rect,
                0.0,
                egui::Stroke::new(1.0, egui::Color32::from_rgb(100, 100, 100)),
                egui::StrokeKind::Inside,
            );
            painter.text(
                label_rect.center(),
                egui::Align2::CENTER_CENTER,
                name,
                egui::FontId::proportional(11.0),
                text,
            );
        }
    }

    fn draw_cells(&self, painter: &egui::Painter, rect: egui::Rect) {
        let cell = self.state.cell_size;
        let highlight = self.sequencer.controls().highlight_measure_start;

        for (line, &row) in self.sequencer.rows().iter().enumerate() {
            for (step, &column) in self.sequencer.columns().iter().enumerate() {
                let cell_rect = egui::Rect::from_min_size(
                    egui::Pos2::new(
                        rect.left() + LABEL_WIDTH + step as f32 * cell,
                        rect.top() + line as f32 * cell,
                    ),
                    egui::Vec2::splat(cell),
                );

                let color = if self.sequencer.is_active(column, row) {
                    egui::Color32::from_rgb(100, 180, 240)
                } else if highlight && self.sequencer.is_measure_start(column) {
                    egui::Color32::from_rgb(60, 60, 75)
                } else {
                    egui::Color32::from_rgb(40, 40, 40)
                };

                painter.rect_filled(cell_rect.shrink(1.0), 2.0, color);
            }
        }
    }

    fn draw_measure_lines(&self, painter: &egui::Painter, rect: egui::Rect) {
        let cell = self.state.cell_size;

        for (step, &column) in self.sequencer.columns().iter().enumerate() {
            if !self.sequencer.is_measure_start(column) {
                continue;
            }
            let x = rect.left() + LABEL_WIDTH + step as f32 * cell;
            painter.line_segment(
                [egui::Pos2::new(x, rect.top()), egui::Pos2::new(x, rect.bottom())],
                egui::Stroke::new(2.0, egui::Color32::from_rgb(100, 100, 100)),
            );
        }
    }
}

/// Maps a screen position to the `(column, row)` under it.
fn cell_at(
    pos: egui::Pos2,
    rect: egui::Rect,
    cell: f32,
    rows: &[usize],
    columns: &[usize],
) -> Option<(usize, usize)> {
    let x = pos.x - rect.left() - LABEL_WIDTH;
    let y = pos.y - rect.top();
    if x < 0.0 || y < 0.0 {
        return None;
    }
    let step = (x / cell) as usize;
    let line = (y / cell) as usize;
    Some((*columns.get(step)?, *rows.get(line)?))
}
