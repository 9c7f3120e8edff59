use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use eframe::egui::{self, Color32, RichText};
use tracing::{info, warn};

use shapes_lang::runtime::stack::SHOW_DEPTH;
use shapes_lang::{Input, Runtime, SchedulerConfig};
use shapes_renderer::{shared, SharedScene};

use crate::canvas;
use crate::config::{CanvasConfig, Config};

/// Longest frame step fed to the scheduler, in seconds.
const MAX_DT: f64 = 0.1;

// ─── Output log ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum LineKind { Command, Output, Error }

struct LogLine {
    kind: LineKind,
    text: String,
}

// ─── App state ────────────────────────────────────────────────────────────────

pub struct App {
    runtime: Runtime,
    scene: SharedScene,
    shown: Rc<RefCell<Vec<String>>>,
    canvas: CanvasConfig,

    input: String,
    history: Vec<String>,
    /// Index into `history` while browsing with the arrow keys.
    history_pos: Option<usize>,
    log: Vec<LogLine>,
    /// Top of the stack left by the last command, top first.
    stack: Vec<String>,

    last_tick: Instant,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let scene = shared();
        let shown: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let runtime = Runtime::new(scene.clone(), shown.clone())
            .with_config(SchedulerConfig::from(&config.scheduler));

        let mut app = Self {
            runtime,
            scene,
            shown,
            canvas: config.canvas.clone(),
            input: String::new(),
            history: Vec::new(),
            history_pos: None,
            log: Vec::new(),
            stack: Vec::new(),
            last_tick: Instant::now(),
        };
        if let Some(script) = &config.startup.script {
            app.run_script(script);
        }
        app
    }

    /// Run a command script, logging the first failure.
    pub fn run_script(&mut self, path: &Path) {
        let source = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read script");
                self.push(LineKind::Error, format!("cannot read {}: {e}", path.display()));
                return;
            }
        };
        info!(path = %path.display(), "running script");
        if let Err(e) = self.runtime.exec_script(&source) {
            self.push(LineKind::Error, format!("{}: {e}", path.display()));
        }
        self.drain_output();
    }

    fn submit(&mut self) {
        let line = std::mem::take(&mut self.input);
        let trimmed = line.trim();
        self.history_pos = None;
        if trimmed.is_empty() {
            return;
        }
        if self.history.last().map(String::as_str) != Some(trimmed) {
            self.history.push(trimmed.to_string());
        }
        self.push(LineKind::Command, format!("> {trimmed}"));

        match self.runtime.exec_line(trimmed) {
            Ok(stack) => self.stack = stack.top_items(SHOW_DEPTH).map(|v| v.to_string()).collect(),
            Err(e) => self.push(LineKind::Error, e.to_string()),
        }
        self.drain_output();
    }

    fn browse_history(&mut self, back: bool) {
        if self.history.is_empty() {
            return;
        }
        let last = self.history.len() - 1;
        self.history_pos = match (self.history_pos, back) {
            (None, true)                => Some(last),
            (None, false)               => None,
            (Some(0), true)             => Some(0),
            (Some(i), true)             => Some(i - 1),
            (Some(i), false) if i < last => Some(i + 1),
            (Some(_), false)            => None,
        };
        self.input = self.history_pos.map(|i| self.history[i].clone()).unwrap_or_default();
    }

    fn drain_output(&mut self) {
        let shown: Vec<String> = self.shown.borrow_mut().drain(..).collect();
        for text in shown {
            self.push(LineKind::Output, text);
        }
    }

    fn push(&mut self, kind: LineKind, text: String) {
        self.log.push(LogLine { kind, text });
    }
}

// ─── UI ───────────────────────────────────────────────────────────────────────

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Advance animations ────────────────────────────────────────────────
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f64().min(MAX_DT);
        self.last_tick = now;
        self.runtime.tick(&Input { dt });
        self.drain_output();
        if !self.runtime.scheduler().is_empty() {
            ctx.request_repaint();
        }

        // ── Command line ──────────────────────────────────────────────────────
        egui::TopBottomPanel::bottom("command").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(">").monospace());
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.input)
                        .font(egui::TextStyle::Monospace)
                        .desired_width(f32::INFINITY)
                        .hint_text("add circle sun 200 150 40 orange"),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    self.submit();
                    response.request_focus();
                } else if response.has_focus() {
                    if ui.input(|i| i.key_pressed(egui::Key::ArrowUp)) {
                        self.browse_history(true);
                    } else if ui.input(|i| i.key_pressed(egui::Key::ArrowDown)) {
                        self.browse_history(false);
                    }
                }
            });
        });

        // ── Stack ─────────────────────────────────────────────────────────────
        egui::SidePanel::right("stack").min_width(180.0).show(ctx, |ui| {
            ui.label(RichText::new("Stack").strong());
            ui.separator();
            if self.stack.is_empty() {
                ui.label(RichText::new("empty").color(Color32::GRAY));
            }
            for (i, v) in self.stack.iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(format!("{i:>2}")).monospace().color(Color32::GRAY));
                    ui.label(RichText::new(v).monospace().color(Color32::from_rgb(210, 210, 170)));
                });
            }
            ui.add_space(12.0);
            ui.label(RichText::new(format!("tasks: {}", self.runtime.scheduler().len())).color(Color32::GRAY));
        });

        // ── Canvas and log ────────────────────────────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| {
            canvas::paint(ui, &self.scene.borrow(), &self.canvas);
            ui.separator();
            egui::ScrollArea::vertical().stick_to_bottom(true).show(ui, |ui| {
                for line in &self.log {
                    let color = match line.kind {
                        LineKind::Command => Color32::from_rgb(140, 140, 140),
                        LineKind::Output  => Color32::from_rgb(180, 255, 180),
                        LineKind::Error   => Color32::from_rgb(220, 80, 80),
                    };
                    ui.label(RichText::new(&line.text).monospace().color(color));
                }
            });
        });
    }
}
