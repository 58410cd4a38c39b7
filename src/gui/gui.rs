use eframe::egui;
use log::{error, info};
use std::path::{Path, PathBuf};

use crate::config::{HEADING, SUBTITLE};
use crate::context::AppContext;
use crate::launcher::{LaunchError, Release};

const BUTTON_SIZE: [f32; 2] = [200.0, 24.0];

/// A modal failure report. While one is shown the release buttons are disabled.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDialog {
    pub title: &'static str,
    pub body: String,
    /// Offered through "Open Folder" when the release directory exists.
    pub folder: Option<PathBuf>,
}

impl ErrorDialog {
    pub fn new(err: &LaunchError, release_dir: &Path) -> ErrorDialog {
        ErrorDialog {
            title: err.title(),
            body: err.to_string(),
            folder: release_dir.is_dir().then(|| release_dir.to_path_buf()),
        }
    }
}

pub struct LauncherUI {
    context: AppContext,
    dialog: Option<ErrorDialog>,
}

impl LauncherUI {
    pub fn new(context: AppContext) -> LauncherUI {
        LauncherUI {
            context,
            dialog: None,
        }
    }

    /// Returns true when the game was handed off and the window should close.
    fn attempt(&mut self, release: &Release) -> bool {
        match self.context.orchestrator().launch(release) {
            Ok(launched) => {
                info!(
                    "Closing launcher, PID {} keeps running in {}",
                    launched.pid,
                    launched.release_dir.display()
                );
                true
            }
            Err(e) => {
                self.dialog = Some(ErrorDialog::new(&e, &self.context.release_dir(release)));
                false
            }
        }
    }

    fn release_page(&mut self, ctx: &egui::Context) -> Option<Release> {
        let mut clicked = None;
        let enabled = self.dialog.is_none();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.heading(egui::RichText::new(HEADING).strong());
                ui.label(SUBTITLE);
                ui.add_space(8.0);

                ui.add_enabled_ui(enabled, |ui| {
                    for release in &self.context.releases {
                        if ui.add_sized(BUTTON_SIZE, egui::Button::new(release.label)).clicked() {
                            clicked = Some(*release);
                        }
                    }
                });
            });
        });

        clicked
    }

    fn error_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &self.dialog else {
            return;
        };
        let mut dismissed = false;

        egui::Window::new(dialog.title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().max_height(120.0).show(ui, |ui| {
                    ui.label(egui::RichText::new(&dialog.body).monospace());
                });
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                    if let Some(folder) = &dialog.folder {
                        if ui.button("Open Folder").clicked() {
                            if let Err(e) = opener::open(folder) {
                                error!("Failed to open {}: {}", folder.display(), e);
                            }
                        }
                    }
                });
            });

        if dismissed {
            self.dialog = None;
        }
    }
}

impl eframe::App for LauncherUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(release) = self.release_page(ctx) {
            if self.attempt(&release) {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }
        }
        self.error_dialog(ctx);
    }
}
