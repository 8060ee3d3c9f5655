//! Analog Clock — analog dial with a digital readout (Rust + egui)

mod app;
mod config;
mod geometry;
mod logging;
mod position;
mod render;
mod scale;
mod schedule;
mod sound;
mod theme;
mod titlebar;

fn main() -> eframe::Result<()> {
    logging::init();
    let startup = app::Startup::load(config::Paths::resolve());

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(app::window_size(startup.scale))
        .with_resizable(false)
        .with_title("Analog Clock")
        .with_icon(egui::IconData::default());
    // Only the offset is restored; the size always follows the factor
    if let Some(pos) = startup.position {
        viewport = viewport.with_position(pos.to_pos());
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "Analog Clock",
        options,
        Box::new(move |cc| Ok(Box::new(app::ClockApp::new(cc, startup)))),
    )
}
