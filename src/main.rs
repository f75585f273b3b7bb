//! Circuit Canvas - Main Application
//! Animated circuit-board backdrop with a live GitHub project listing

mod board;
mod config;
mod electrons;
mod github;

use std::sync::mpsc::Receiver;
use std::time::Instant;

use eframe::egui;
use env_logger::Env;

use board::CircuitBoard;
use config::{AppConfig, ColorTheme, CONFIG_FILE_NAME};
use electrons::ElectronSwarm;
use github::{fallback_repos, ListingSource, RepoListing};

/// Main application state
struct CircuitCanvasApp {
    config: AppConfig,
    board: CircuitBoard,
    electrons: ElectronSwarm,
    last_update: Instant,

    // UI state
    show_panel: bool,
    panel_tab: PanelTab,
    paused: bool,
    last_dt: f32,
    canvas_size: egui::Vec2,
    theme_names: Vec<String>,

    // Repository listing state
    repos: Option<RepoListing>,
    repos_rx: Option<Receiver<RepoListing>>,
}

#[derive(Clone, Copy, PartialEq)]
enum PanelTab {
    Projects,
    Board,
}

impl CircuitCanvasApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Dark theme to match the board backdrop
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgba_unmultiplied(10, 12, 18, 245);
        visuals.panel_fill = egui::Color32::from_rgba_unmultiplied(12, 15, 22, 240);
        cc.egui_ctx.set_visuals(visuals);

        let config = match AppConfig::load(CONFIG_FILE_NAME) {
            Ok(config) => {
                log::info!("Loaded settings from {}", CONFIG_FILE_NAME);
                config
            }
            Err(_) => {
                log::debug!("No settings file, using defaults");
                AppConfig::default()
            }
        };

        let theme = config.get_theme();
        let mut rng = rand::thread_rng();
        let board = CircuitBoard::new(1280.0, 720.0, &config.board, theme.base_hue, &mut rng);

        let theme_names: Vec<String> = ColorTheme::all_themes()
            .iter()
            .map(|t| t.name.clone())
            .collect();

        let mut app = Self {
            config,
            board,
            electrons: ElectronSwarm::new(),
            last_update: Instant::now(),
            show_panel: true,
            panel_tab: PanelTab::Projects,
            paused: false,
            last_dt: 0.016,
            canvas_size: egui::Vec2::new(1280.0, 720.0),
            theme_names,
            repos: None,
            repos_rx: None,
        };
        app.refresh_repos();
        app
    }

    /// Reroutes the board for the current canvas size and drops every
    /// electron, since they index into the replaced trace set.
    fn rebuild_board(&mut self) {
        let theme = self.config.get_theme();
        let mut rng = rand::thread_rng();
        self.board.regenerate(
            self.canvas_size.x,
            self.canvas_size.y,
            &self.config.board,
            theme.base_hue,
            &mut rng,
        );
        self.electrons.clear();
    }

    fn refresh_repos(&mut self) {
        if !self.config.github.enabled {
            self.repos = Some(RepoListing {
                repos: fallback_repos(),
                source: ListingSource::Fallback,
            });
            self.repos_rx = None;
            return;
        }

        log::info!(
            "Fetching GitHub repositories for {}",
            self.config.github.username
        );
        self.repos = None;
        self.repos_rx = Some(github::spawn_fetch(self.config.github.clone()));
    }
}

impl eframe::App for CircuitCanvasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_update).as_secs_f32();
        self.last_update = now;
        self.last_dt = dt;

        // Check for the fetch result (non-blocking)
        let mut should_clear_rx = false;
        if let Some(ref rx) = self.repos_rx {
            if let Ok(listing) = rx.try_recv() {
                self.repos = Some(listing);
                should_clear_rx = true;
            }
        }
        if should_clear_rx {
            self.repos_rx = None;
        }

        self.render_top_bar(ctx);

        if self.show_panel {
            self.render_side_panel(ctx);
        }

        self.render_canvas(ctx, dt);

        // Request continuous repaint for animation
        ctx.request_repaint();
    }
}

impl CircuitCanvasApp {
    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("⚡ Circuit Canvas");
                ui.separator();

                if self.paused {
                    if ui.button("▶ Resume").clicked() {
                        self.paused = false;
                    }
                } else if ui.button("⏸ Pause").clicked() {
                    self.paused = true;
                }

                if ui.button("🔄 Reroute").clicked() {
                    self.rebuild_board();
                }

                ui.separator();
                ui.toggle_value(&mut self.show_panel, "⚙ Panel");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let fps = 1.0 / self.last_dt.max(0.001);
                    ui.label(format!("FPS: {:.0}", fps));
                    ui.separator();
                    ui.label(format!("Electrons: {}", self.electrons.len()));
                });
            });
        });
    }

    fn render_side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("side_panel")
            .min_width(280.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.panel_tab, PanelTab::Projects, "Projects");
                    ui.selectable_value(&mut self.panel_tab, PanelTab::Board, "Board");
                });
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| match self.panel_tab {
                    PanelTab::Projects => self.render_projects_tab(ui),
                    PanelTab::Board => self.render_board_tab(ui),
                });
            });
    }

    fn render_projects_tab(&mut self, ui: &mut egui::Ui) {
        ui.heading("Projects");
        ui.add_space(4.0);

        if ui.button("🔄 Refresh").clicked() {
            self.refresh_repos();
        }
        ui.separator();

        match &self.repos {
            Some(listing) => {
                if listing.source == ListingSource::Fallback {
                    ui.colored_label(egui::Color32::YELLOW, "Showing sample projects");
                    ui.add_space(4.0);
                }

                for repo in &listing.repos {
                    ui.hyperlink_to(egui::RichText::new(&repo.name).strong(), &repo.html_url);
                    if let Some(ref description) = repo.description {
                        ui.label(description);
                    }
                    ui.horizontal(|ui| {
                        if let Some(ref language) = repo.language {
                            ui.label(language);
                            ui.separator();
                        }
                        ui.label(format!("★ {}", repo.stargazers_count));
                        ui.separator();
                        ui.label(format!("updated {}", repo.updated_at.format("%Y-%m-%d")));
                    });
                    ui.add_space(6.0);
                    ui.separator();
                }
            }
            None if self.repos_rx.is_some() => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading repositories...");
                });
            }
            None => {
                ui.label("No repositories loaded.");
            }
        }
    }

    fn render_board_tab(&mut self, ui: &mut egui::Ui) {
        ui.heading("Board");
        let mut board_changed = false;

        ui.label("Traces");
        board_changed |= ui
            .add(egui::Slider::new(&mut self.config.board.trace_count, 0..=100))
            .changed();

        ui.label("Grid Spacing");
        board_changed |= ui
            .add(egui::Slider::new(
                &mut self.config.board.grid_spacing,
                10.0..=120.0,
            ))
            .changed();

        ui.label("Min Steps");
        board_changed |= ui
            .add(egui::Slider::new(&mut self.config.board.min_steps, 1..=50))
            .changed();

        ui.label("Max Steps");
        board_changed |= ui
            .add(egui::Slider::new(&mut self.config.board.max_steps, 1..=50))
            .changed();

        ui.label("Turn Chance");
        board_changed |= ui
            .add(egui::Slider::new(
                &mut self.config.board.turn_chance,
                0.0..=1.0,
            ))
            .changed();

        ui.add_space(8.0);
        ui.separator();
        ui.heading("Electrons");

        ui.label("Max Electrons");
        ui.add(egui::Slider::new(
            &mut self.config.electrons.max_electrons,
            0..=50,
        ));

        ui.label("Spawn Probability");
        ui.add(egui::Slider::new(
            &mut self.config.electrons.spawn_probability,
            0.0..=1.0,
        ));

        ui.label("Speed");
        ui.add(egui::Slider::new(
            &mut self.config.electrons.speed,
            0.01..=1.0,
        ));

        ui.add_space(8.0);
        ui.separator();
        ui.heading("Style");

        ui.label("Trace Width");
        ui.add(egui::Slider::new(
            &mut self.config.style.trace_width,
            0.5..=4.0,
        ));

        ui.label("Electron Radius");
        ui.add(egui::Slider::new(
            &mut self.config.style.electron_radius,
            0.5..=6.0,
        ));

        ui.label("Glow Radius");
        ui.add(egui::Slider::new(
            &mut self.config.style.glow_radius,
            0.0..=30.0,
        ));

        ui.add_space(8.0);
        ui.label("Theme");
        egui::ComboBox::from_id_source("theme_combo")
            .selected_text(
                self.theme_names
                    .get(self.config.theme_index)
                    .cloned()
                    .unwrap_or_default(),
            )
            .show_ui(ui, |ui| {
                for (i, name) in self.theme_names.iter().enumerate() {
                    if ui
                        .selectable_value(&mut self.config.theme_index, i, name)
                        .changed()
                    {
                        // Trace hues are baked at routing time
                        board_changed = true;
                    }
                }
            });

        ui.add_space(8.0);
        ui.separator();
        ui.heading("GitHub");

        ui.checkbox(&mut self.config.github.enabled, "Fetch repositories");
        ui.label("Username");
        ui.text_edit_singleline(&mut self.config.github.username);

        ui.label("Listing Size");
        ui.add(egui::Slider::new(&mut self.config.github.per_page, 1..=30));

        ui.add_space(8.0);
        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("💾 Save Config").clicked() {
                match self.config.save(CONFIG_FILE_NAME) {
                    Ok(()) => log::info!("Settings saved to {}", CONFIG_FILE_NAME),
                    Err(e) => log::error!("Error saving settings: {}", e),
                }
            }
            if ui.button("Reset").clicked() {
                self.config = AppConfig::default();
                board_changed = true;
            }
        });

        if board_changed {
            self.rebuild_board();
        }
    }

    fn render_canvas(&mut self, ctx: &egui::Context, dt: f32) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let (rect, _) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());

            // Reroute when the canvas size changes
            let size = rect.size();
            if (size.x - self.canvas_size.x).abs() > 0.5
                || (size.y - self.canvas_size.y).abs() > 0.5
            {
                self.canvas_size = size;
                self.rebuild_board();
            }

            if !self.paused {
                let mut rng = rand::thread_rng();
                self.electrons
                    .update(&self.board, &self.config.electrons, dt, &mut rng);
            }

            let painter = ui.painter_at(rect);
            let theme = self.config.get_theme();

            // Draw background
            let bg_color = egui::Color32::from_rgb(
                theme.background[0],
                theme.background[1],
                theme.background[2],
            );
            painter.rect_filled(rect, 0.0, bg_color);

            // Draw the board, then the electrons on top
            self.board.render(&painter, rect, &self.config.style, &theme);
            self.electrons
                .render(&painter, rect, &self.board, &self.config.style, &theme);
        });
    }
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Circuit Canvas")
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Circuit Canvas",
        options,
        Box::new(|cc| Box::new(CircuitCanvasApp::new(cc))),
    )
}
