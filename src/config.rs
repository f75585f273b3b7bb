//! Configuration for Circuit Canvas
//! Board geometry, electron behavior, styling, and GitHub settings with JSON persistence

use serde::{Deserialize, Serialize};

/// Settings file looked up in the working directory at startup.
pub const CONFIG_FILE_NAME: &str = "circuit_canvas.json";

// ============================================================================
// Color Theme
// ============================================================================

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct ColorTheme {
    pub name: String,
    /// Base hue in degrees for grid dots, traces, pads and electron glow.
    pub base_hue: f32,
    pub background: [u8; 3],
    pub electron_core: [u8; 3],
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self::cyan()
    }
}

impl ColorTheme {
    pub fn cyan() -> Self {
        Self {
            name: "Cyan".to_string(),
            base_hue: 190.0,
            background: [5, 5, 8],
            electron_core: [255, 255, 255],
        }
    }

    pub fn amber() -> Self {
        Self {
            name: "Amber".to_string(),
            base_hue: 38.0,
            background: [8, 6, 3],
            electron_core: [255, 250, 235],
        }
    }

    pub fn emerald() -> Self {
        Self {
            name: "Emerald".to_string(),
            base_hue: 158.0,
            background: [3, 8, 6],
            electron_core: [240, 255, 248],
        }
    }

    pub fn violet() -> Self {
        Self {
            name: "Violet".to_string(),
            base_hue: 270.0,
            background: [7, 5, 11],
            electron_core: [250, 245, 255],
        }
    }

    pub fn all_themes() -> Vec<ColorTheme> {
        vec![
            Self::cyan(),
            Self::amber(),
            Self::emerald(),
            Self::violet(),
        ]
    }
}

// ============================================================================
// Board Configuration
// ============================================================================

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct BoardConfig {
    /// Lattice spacing in pixels.
    pub grid_spacing: f32,
    pub trace_count: usize,
    /// Minimum random-walk steps per trace (points = steps + 1).
    pub min_steps: usize,
    pub max_steps: usize,
    /// Probability of re-rolling the walk direction before each step.
    pub turn_chance: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            grid_spacing: 40.0,
            trace_count: 20,
            min_steps: 5,
            max_steps: 24,
            turn_chance: 0.2,
        }
    }
}

// ============================================================================
// Electron Configuration
// ============================================================================

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct ElectronConfig {
    pub max_electrons: usize,
    /// Chance per frame of spawning one electron while below the cap.
    pub spawn_probability: f32,
    /// Fraction of a segment covered per frame at the 60 fps baseline.
    pub speed: f32,
}

impl Default for ElectronConfig {
    fn default() -> Self {
        Self {
            max_electrons: 10,
            spawn_probability: 0.1,
            speed: 0.1,
        }
    }
}

// ============================================================================
// Style Configuration
// ============================================================================

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct StyleConfig {
    pub grid_dot_alpha: f32,
    pub trace_alpha: f32,
    pub pad_alpha: f32,
    pub trace_width: f32,
    pub electron_radius: f32,
    pub glow_radius: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            grid_dot_alpha: 0.05,
            trace_alpha: 0.2,
            pad_alpha: 0.1,
            trace_width: 1.0,
            electron_radius: 2.0,
            glow_radius: 10.0,
        }
    }
}

// ============================================================================
// GitHub Configuration
// ============================================================================

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct GithubConfig {
    pub enabled: bool,
    pub username: String,
    pub per_page: usize,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            username: "octocat".to_string(),
            per_page: 10,
        }
    }
}

// ============================================================================
// Main App Configuration
// ============================================================================

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub electrons: ElectronConfig,
    pub style: StyleConfig,
    pub github: GithubConfig,
    pub theme_index: usize,
}

impl AppConfig {
    pub fn get_theme(&self) -> ColorTheme {
        let themes = ColorTheme::all_themes();
        themes.get(self.theme_index).cloned().unwrap_or_default()
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }
}
