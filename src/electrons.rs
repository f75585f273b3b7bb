//! Electron particles for Circuit Canvas
//! Spawning, segment traversal and glow rendering along board traces

use egui::{Color32, Painter, Rect, Vec2};
use rand::Rng;

use crate::board::{hue_color, CircuitBoard, Trace};
use crate::config::{ColorTheme, ElectronConfig, StyleConfig};

/// One electron travelling a trace, segment by segment.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Electron {
    pub trace: usize,
    pub segment: usize,
    /// Fraction of the current segment covered, always in [0, 1).
    pub progress: f32,
}

impl Electron {
    /// Pixel offset from the canvas origin, interpolated along the segment.
    pub fn position(&self, trace: &Trace, spacing: f32) -> Option<Vec2> {
        let a = trace.points.get(self.segment)?.offset(spacing);
        let b = trace.points.get(self.segment + 1)?.offset(spacing);
        Some(a + (b - a) * self.progress)
    }
}

/// Electron population for one board.
#[derive(Default)]
pub struct ElectronSwarm {
    pub electrons: Vec<Electron>,
}

impl ElectronSwarm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.electrons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.electrons.is_empty()
    }

    /// Drops every electron. Must be called whenever the board's trace set is
    /// replaced, since electrons hold indices into it.
    pub fn clear(&mut self) {
        self.electrons.clear();
    }

    /// Runs one simulation frame: cap enforcement, a single spawn roll, then
    /// advancement and retirement. Runs before drawing, so rendered progress
    /// stays in [0, 1).
    pub fn update(
        &mut self,
        board: &CircuitBoard,
        config: &ElectronConfig,
        dt: f32,
        rng: &mut impl Rng,
    ) {
        // The cap can drop below the live population via the settings panel
        if self.electrons.len() > config.max_electrons {
            self.electrons.truncate(config.max_electrons);
        }
        self.try_spawn(board, config, rng);
        self.advance(board, config, dt);
    }

    fn try_spawn(&mut self, board: &CircuitBoard, config: &ElectronConfig, rng: &mut impl Rng) {
        if board.traces.is_empty() || self.electrons.len() >= config.max_electrons {
            return;
        }
        if rng.gen::<f32>() >= config.spawn_probability {
            return;
        }

        let trace = rng.gen_range(0..board.traces.len());
        // A trace without a full segment has nowhere for an electron to go
        if board.traces[trace].segment_count() == 0 {
            return;
        }

        self.electrons.push(Electron {
            trace,
            segment: 0,
            progress: 0.0,
        });
    }

    fn advance(&mut self, board: &CircuitBoard, config: &ElectronConfig, dt: f32) {
        let step = config.speed * 60.0 * dt;
        self.electrons.retain_mut(|e| {
            let trace = match board.traces.get(e.trace) {
                Some(trace) => trace,
                None => return false,
            };

            e.progress += step;
            if e.progress >= 1.0 {
                e.progress = 0.0;
                e.segment += 1;
                if e.segment >= trace.segment_count() {
                    return false;
                }
            }
            true
        });
    }

    pub fn render(
        &self,
        painter: &Painter,
        rect: Rect,
        board: &CircuitBoard,
        style: &StyleConfig,
        theme: &ColorTheme,
    ) {
        let core_color = Color32::from_rgb(
            theme.electron_core[0],
            theme.electron_core[1],
            theme.electron_core[2],
        );

        for e in &self.electrons {
            let trace = match board.traces.get(e.trace) {
                Some(trace) => trace,
                None => continue,
            };
            let offset = match e.position(trace, board.spacing) {
                Some(offset) => offset,
                None => continue,
            };
            let pos = rect.min + offset;

            // Layer 1: outer soft glow
            painter.circle_filled(
                pos,
                style.electron_radius + style.glow_radius,
                hue_color(trace.hue, 0.15),
            );
            // Layer 2: mid glow
            painter.circle_filled(
                pos,
                style.electron_radius + style.glow_radius * 0.45,
                hue_color(trace.hue, 0.35),
            );
            // Bright core
            painter.circle_filled(pos, style.electron_radius, core_color);
        }
    }
}
