use env_logger::{Builder, Env};
use log::LevelFilter;

/// Our own messages at info unless `RUST_LOG` says otherwise; eframe internals stay at warn.
pub fn init() {
    let mut builder = Builder::from_env(Env::default().default_filter_or("analog_clock=info"));
    builder.filter_module("eframe", LevelFilter::Warn);
    builder.filter_module("egui_glow", LevelFilter::Warn);
    builder.format_timestamp_millis();
    let _ = builder.try_init();
}
