#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

pub mod config;
pub mod context;
pub mod gui;
pub mod launcher;

use context::AppContext;
use eframe::egui;
use gui::gui::LauncherUI;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let context = AppContext::discover();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config::WINDOW_TITLE)
            .with_inner_size(config::WINDOW_SIZE)
            .with_resizable(false),
        ..Default::default()
    };
    eframe::run_native(
        config::WINDOW_TITLE,
        native_options,
        Box::new(move |_cc| Box::new(LauncherUI::new(context))),
    )
}
