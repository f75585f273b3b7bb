//! Circuit board geometry for Circuit Canvas
//! Grid lattice and randomly routed orthogonal traces

use egui::ecolor::Hsva;
use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2};
use rand::Rng;

use crate::config::{BoardConfig, ColorTheme, StyleConfig};

/// Unit steps for the four routing directions: up, right, down, left.
const STEPS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Translucent color at the given hue, matching the board's neon palette.
pub fn hue_color(hue: f32, alpha: f32) -> Color32 {
    Hsva::new((hue / 360.0).rem_euclid(1.0), 0.97, 0.83, alpha).into()
}

/// Lattice coordinate on the board grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GridPoint {
    pub col: i32,
    pub row: i32,
}

impl GridPoint {
    /// Pixel offset from the canvas origin.
    pub fn offset(self, spacing: f32) -> Vec2 {
        Vec2::new(self.col as f32 * spacing, self.row as f32 * spacing)
    }
}

/// Lattice extent covering a canvas of the given pixel size.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct GridDims {
    pub cols: usize,
    pub rows: usize,
}

impl GridDims {
    pub fn from_size(width: f32, height: f32, spacing: f32) -> Self {
        if width <= 0.0 || height <= 0.0 || spacing <= 0.0 {
            return Self::default();
        }
        Self {
            cols: (width / spacing).ceil() as usize,
            rows: (height / spacing).ceil() as usize,
        }
    }

    pub fn is_empty(self) -> bool {
        self.cols == 0 || self.rows == 0
    }
}

/// One routed trace: an orthogonal polyline over the lattice.
#[derive(Clone, Debug)]
pub struct Trace {
    pub points: Vec<GridPoint>,
    pub hue: f32,
}

impl Trace {
    /// Number of segments an electron can traverse.
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

/// Routes a single trace: random start, random walk with occasional turns.
/// The walk is not clamped, so traces may wander past the canvas edge.
fn random_trace(dims: GridDims, config: &BoardConfig, hue: f32, rng: &mut impl Rng) -> Trace {
    let mut current = GridPoint {
        col: rng.gen_range(0..dims.cols as i32),
        row: rng.gen_range(0..dims.rows as i32),
    };

    let steps = rng.gen_range(config.min_steps..=config.max_steps.max(config.min_steps));
    let mut points = Vec::with_capacity(steps + 1);
    points.push(current);

    let mut dir = rng.gen_range(0..STEPS.len());
    for _ in 0..steps {
        if rng.gen::<f32>() < config.turn_chance {
            dir = rng.gen_range(0..STEPS.len());
        }
        let (dc, dr) = STEPS[dir];
        current = GridPoint {
            col: current.col + dc,
            row: current.row + dr,
        };
        points.push(current);
    }

    Trace { points, hue }
}

/// The generated board: lattice dims plus the current trace set.
pub struct CircuitBoard {
    pub dims: GridDims,
    pub spacing: f32,
    pub traces: Vec<Trace>,
}

impl CircuitBoard {
    pub fn new(
        width: f32,
        height: f32,
        config: &BoardConfig,
        hue: f32,
        rng: &mut impl Rng,
    ) -> Self {
        let mut board = Self {
            dims: GridDims::default(),
            spacing: config.grid_spacing,
            traces: Vec::new(),
        };
        board.regenerate(width, height, config, hue, rng);
        board
    }

    /// Recomputes the lattice for a new canvas size and routes a fresh trace
    /// set. Electrons referencing the old traces must be cleared by the caller.
    pub fn regenerate(
        &mut self,
        width: f32,
        height: f32,
        config: &BoardConfig,
        hue: f32,
        rng: &mut impl Rng,
    ) {
        self.spacing = config.grid_spacing;
        self.dims = GridDims::from_size(width, height, self.spacing);
        self.traces.clear();
        if self.dims.is_empty() {
            return;
        }
        for _ in 0..config.trace_count {
            self.traces.push(random_trace(self.dims, config, hue, rng));
        }
    }

    pub fn render(&self, painter: &Painter, rect: Rect, style: &StyleConfig, theme: &ColorTheme) {
        if self.dims.is_empty() {
            return;
        }

        // Solder dots at every lattice node, drawn as 2x2 squares
        let dot_color = hue_color(theme.base_hue, style.grid_dot_alpha);
        for col in 0..=self.dims.cols {
            for row in 0..=self.dims.rows {
                let center = rect.min
                    + Vec2::new(col as f32 * self.spacing, row as f32 * self.spacing);
                painter.rect_filled(
                    Rect::from_center_size(center, Vec2::splat(2.0)),
                    0.0,
                    dot_color,
                );
            }
        }

        for trace in &self.traces {
            if trace.points.len() < 2 {
                continue;
            }

            let line: Vec<Pos2> = trace
                .points
                .iter()
                .map(|p| rect.min + p.offset(self.spacing))
                .collect();
            painter.add(Shape::line(
                line,
                Stroke::new(style.trace_width, hue_color(trace.hue, style.trace_alpha)),
            ));

            // Terminal pad at the trace end
            if let Some(end) = trace.points.last() {
                painter.rect_filled(
                    Rect::from_center_size(rect.min + end.offset(self.spacing), Vec2::splat(6.0)),
                    0.0,
                    hue_color(trace.hue, style.pad_alpha),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn routed_board(seed: u64) -> CircuitBoard {
        let mut rng = StdRng::seed_from_u64(seed);
        CircuitBoard::new(1920.0, 1080.0, &BoardConfig::default(), 190.0, &mut rng)
    }

    #[test]
    fn test_dims_round_up() {
        assert_eq!(
            GridDims::from_size(1920.0, 1080.0, 40.0),
            GridDims { cols: 48, rows: 27 }
        );
        assert_eq!(
            GridDims::from_size(801.0, 599.0, 40.0),
            GridDims { cols: 21, rows: 15 }
        );
    }

    #[test]
    fn test_degenerate_sizes_yield_empty_dims() {
        assert!(GridDims::from_size(0.0, 600.0, 40.0).is_empty());
        assert!(GridDims::from_size(800.0, -1.0, 40.0).is_empty());
        assert!(GridDims::from_size(800.0, 600.0, 0.0).is_empty());
    }

    #[test]
    fn test_traces_are_orthogonal() {
        let board = routed_board(7);
        for trace in &board.traces {
            for pair in trace.points.windows(2) {
                let dc = (pair[1].col - pair[0].col).abs();
                let dr = (pair[1].row - pair[0].row).abs();
                assert_eq!(dc + dr, 1, "step must move exactly one cell on one axis");
            }
        }
    }

    #[test]
    fn test_trace_point_counts_within_bounds() {
        let config = BoardConfig::default();
        let board = routed_board(11);
        assert_eq!(board.traces.len(), config.trace_count);
        for trace in &board.traces {
            assert!(trace.points.len() >= config.min_steps + 1);
            assert!(trace.points.len() <= config.max_steps + 1);
        }
    }

    #[test]
    fn test_trace_starts_inside_lattice() {
        let board = routed_board(13);
        for trace in &board.traces {
            let start = trace.points[0];
            assert!(start.col >= 0 && (start.col as usize) < board.dims.cols);
            assert!(start.row >= 0 && (start.row as usize) < board.dims.rows);
        }
    }

    #[test]
    fn test_zero_turn_chance_routes_straight_lines() {
        let config = BoardConfig {
            turn_chance: 0.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(17);
        let board = CircuitBoard::new(800.0, 600.0, &config, 190.0, &mut rng);
        for trace in &board.traces {
            let first = trace.points[0];
            let second = trace.points[1];
            let step = (second.col - first.col, second.row - first.row);
            for pair in trace.points.windows(2) {
                assert_eq!((pair[1].col - pair[0].col, pair[1].row - pair[0].row), step);
            }
        }
    }

    #[test]
    fn test_degenerate_canvas_routes_nothing() {
        let mut rng = StdRng::seed_from_u64(19);
        let board = CircuitBoard::new(0.0, 0.0, &BoardConfig::default(), 190.0, &mut rng);
        assert!(board.dims.is_empty());
        assert!(board.traces.is_empty());
    }

    #[test]
    fn test_regenerate_replaces_trace_set() {
        let mut rng = StdRng::seed_from_u64(23);
        let config = BoardConfig::default();
        let mut board = CircuitBoard::new(1920.0, 1080.0, &config, 190.0, &mut rng);
        board.regenerate(800.0, 600.0, &config, 190.0, &mut rng);
        assert_eq!(board.dims, GridDims { cols: 20, rows: 15 });
        assert_eq!(board.traces.len(), config.trace_count);
        for trace in &board.traces {
            let start = trace.points[0];
            assert!((start.col as usize) < 20 && (start.row as usize) < 15);
        }
    }

    #[test]
    fn test_grid_point_offset() {
        let point = GridPoint { col: 3, row: -2 };
        assert_eq!(point.offset(40.0), Vec2::new(120.0, -80.0));
    }
}
