//! egui main window: digital readout, appearance controls and the analog dial

use std::time::Instant;

use chrono::{DateTime, Local};
use eframe::egui;

use crate::config::{Paths, Settings};
use crate::geometry::ClockFace;
use crate::position::{self, PositionStore, WindowPosition};
use crate::render::{FaceLayout, RenderLoop, RenderState, UPDATE_INTERVAL};
use crate::scale::{self, Scale};
use crate::schedule::{self, Lifecycle, Timer};
use crate::sound::TickPlayer;
use crate::theme::{Palette, Theme, ThemeController};
use crate::titlebar;

/// Header row height at factor 1.0
const HEADER_HEIGHT: f32 = 40.0;
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Inner window size: square dial plus the header row
pub fn window_size(scale: Scale) -> egui::Vec2 {
    let f = scale.factor();
    egui::vec2(ClockFace::BASE.canvas * f, (ClockFace::BASE.canvas + HEADER_HEIGHT) * f)
}

/// Digital readout font, never below 10pt
fn label_font_size(factor: f32) -> f32 {
    (12.0 * factor).max(10.0)
}

/// State loaded from disk before the window opens
pub struct Startup {
    pub paths: Paths,
    pub settings: Settings,
    pub scale: Scale,
    pub positions: PositionStore,
    pub position: Option<WindowPosition>,
}

impl Startup {
    pub fn load(paths: Paths) -> Self {
        let settings = Settings::load_or_default(&paths.settings);
        let scale = scale::load_or_default(&paths.factor);
        let positions = PositionStore::new(paths.position.clone(), position::local_hostname());
        let position = positions.load().unwrap_or_else(|err| {
            log::warn!("{err:#}; starting at the default position");
            None
        });
        Self {
            paths,
            settings,
            scale,
            positions,
            position,
        }
    }
}

/// User input collected while drawing the header
enum Action {
    CycleScale,
    ToggleTheme,
    SetAuto(bool),
    SetTick(bool),
}

pub struct ClockApp {
    /// Where factor, position, settings and the tick sound live
    paths: Paths,
    /// Persisted preferences (theme and auto flag are synced on save)
    settings: Settings,
    /// Current window scale factor
    scale: Scale,
    /// Ticks and numerals for the current scale
    layout: FaceLayout,
    /// Light/dark state plus the 60 s auto check
    theme: ThemeController,
    /// Hand recomputation, once per second
    render: RenderLoop,
    /// Refresh of the digital readout
    label_timer: Timer,
    /// Text of the digital readout
    datetime: String,
    /// Per-host window position file
    positions: PositionStore,
    /// Last outer position reported by the viewport
    position: Option<WindowPosition>,
    /// Disposed once the close request has been handled
    lifecycle: Lifecycle,
    /// Audio thread, started the first time ticking is enabled
    tick_player: Option<TickPlayer>,
    /// Theme the egui visuals were last set to
    visuals_theme: Option<Theme>,
    /// Theme the native title bar currently shows
    titlebar_theme: Option<Theme>,
}

fn spawn_tick_player(paths: &Paths) -> Option<TickPlayer> {
    match TickPlayer::spawn(paths.tick.clone()) {
        Ok(player) => Some(player),
        Err(err) => {
            log::warn!("{err:#}; tick sound disabled");
            None
        }
    }
}

impl ClockApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, startup: Startup) -> Self {
        Self::from_startup(startup, Instant::now())
    }

    fn from_startup(startup: Startup, now: Instant) -> Self {
        let Startup {
            paths,
            settings,
            scale,
            positions,
            position,
        } = startup;

        let theme = ThemeController::new(settings.theme, settings.auto_theme, now);

        let mut render = RenderLoop::new();
        render.restart(now);
        let mut label_timer = Timer::new(UPDATE_INTERVAL);
        label_timer.arm_now(now);

        let tick_player = if settings.tick_sound {
            spawn_tick_player(&paths)
        } else {
            None
        };

        log::info!(
            "starting at factor {} with {:?} theme (auto: {})",
            scale.factor(),
            theme.theme(),
            theme.is_auto()
        );

        Self {
            layout: FaceLayout::new(scale.factor()),
            paths,
            settings,
            scale,
            theme,
            render,
            label_timer,
            datetime: String::new(),
            positions,
            position,
            lifecycle: Lifecycle::Active,
            tick_player,
            visuals_theme: None,
            titlebar_theme: None,
        }
    }

    fn track_position(&mut self, ctx: &egui::Context) {
        if let Some(rect) = ctx.input(|i| i.viewport().outer_rect) {
            self.position = Some(WindowPosition::from_pos(rect.min));
        }
    }

    fn save_position(&self) {
        let Some(pos) = self.position else {
            log::debug!("window position unknown; nothing saved");
            return;
        };
        if let Err(err) = self.positions.save(pos) {
            log::warn!("{err:#}");
        }
    }

    fn save_settings(&mut self) {
        self.settings.theme = self.theme.theme();
        self.settings.auto_theme = self.theme.is_auto();
        if let Err(err) = self.settings.save(&self.paths.settings) {
            log::warn!("{err:#}");
        }
    }

    /// Stop every timer and persist state; nothing touches the window afterwards
    fn dispose(&mut self) {
        self.lifecycle = Lifecycle::Disposed;
        self.render.cancel();
        self.label_timer.cancel();
        self.theme.cancel();
        self.save_position();
        self.save_settings();
        log::info!("clock closed");
    }

    /// Visuals and title bar follow on the next frame
    fn on_theme_changed(&mut self, now: Instant) {
        self.titlebar_theme = None;
        self.render.restart(now);
    }

    /// Resize in place: the window and its timers survive. Returns the viewport commands to send.
    fn cycle_scale(&mut self, now: Instant) -> Vec<egui::ViewportCommand> {
        self.render.cancel();
        self.scale = self.scale.next();
        log::info!("scale factor {}", self.scale.factor());
        if let Err(err) = scale::save(&self.paths.factor, self.scale) {
            log::warn!("{err:#}");
        }
        self.save_position();

        self.layout = FaceLayout::new(self.scale.factor());
        let mut commands = vec![egui::ViewportCommand::InnerSize(window_size(self.scale))];
        if let Some(pos) = self.position {
            commands.push(egui::ViewportCommand::OuterPosition(pos.to_pos()));
        }
        self.render.restart(now);
        commands
    }

    fn apply(&mut self, action: Action, now: Instant, local: &DateTime<Local>) -> Vec<egui::ViewportCommand> {
        match action {
            Action::CycleScale => return self.cycle_scale(now),
            Action::ToggleTheme => {
                self.render.cancel();
                self.theme.toggle();
                self.on_theme_changed(now);
                self.save_settings();
            }
            Action::SetAuto(on) => {
                if self.theme.set_auto(on, now, local) {
                    self.on_theme_changed(now);
                }
                self.save_settings();
            }
            Action::SetTick(on) => {
                self.settings.tick_sound = on;
                if on && self.tick_player.is_none() {
                    self.tick_player = spawn_tick_player(&self.paths);
                }
                self.save_settings();
            }
        }
        Vec::new()
    }

    /// Run whichever timers are due. False once disposed.
    fn advance(&mut self, now: Instant, local: &DateTime<Local>) -> bool {
        if self.lifecycle == Lifecycle::Disposed {
            return false;
        }
        if self.theme.poll(now, local) {
            self.on_theme_changed(now);
            self.save_settings();
        }
        if self.label_timer.fire(now) {
            self.datetime = local.format(DATETIME_FORMAT).to_string();
            self.label_timer.arm(now);
        }
        if let Some(redrawn) = self.render.poll(now, local, &self.layout.face) {
            debug_assert_eq!(self.render.state(), RenderState::Idle);
            if let Some(hands) = self.render.hands() {
                log::trace!("hands at {:?}", hands.angles);
            }
            if redrawn.second_elapsed && self.settings.tick_sound {
                if let Some(player) = &self.tick_player {
                    player.play();
                }
            }
        }
        true
    }

    fn header(&self, ui: &mut egui::Ui, palette: &Palette) -> Option<Action> {
        let mut action = None;
        let size = egui::vec2(ui.available_width(), HEADER_HEIGHT * self.scale.factor());
        ui.allocate_ui_with_layout(size, egui::Layout::left_to_right(egui::Align::Center), |ui| {
            ui.set_min_size(size);
            ui.label(
                egui::RichText::new(&self.datetime)
                    .size(label_font_size(self.scale.factor()))
                    .color(palette.hand)
                    .monospace(),
            );
            if ui.button("Size").on_hover_text("Cycle the clock size").clicked() {
                action = Some(Action::CycleScale);
            }
            if ui.button("Theme").on_hover_text("Switch light / dark").clicked() {
                action = Some(Action::ToggleTheme);
            }
            let mut auto = self.theme.is_auto();
            if ui
                .checkbox(&mut auto, "Auto")
                .on_hover_text("Dark from 18:30 to 06:00")
                .changed()
            {
                action = Some(Action::SetAuto(auto));
            }
            let mut tick = self.settings.tick_sound;
            if ui.checkbox(&mut tick, "Tick").changed() {
                action = Some(Action::SetTick(tick));
            }
        });
        action
    }

    fn paint_dial(&self, ui: &mut egui::Ui, palette: &Palette) {
        let face = &self.layout.face;
        let (response, painter) = ui.allocate_painter(face.size(), egui::Sense::hover());
        let origin = response.rect.min.to_vec2();
        let center = face.center + origin;

        painter.rect_filled(response.rect, 0.0, palette.canvas_bg);
        painter.circle_stroke(center, face.radius, egui::Stroke::new(face.outline_width, palette.outline));

        let font = egui::FontId::proportional(face.font_size);
        for (n, pos) in &self.layout.numerals {
            painter.text(*pos + origin, egui::Align2::CENTER_CENTER, n.to_string(), font.clone(), palette.numeral);
        }
        for tick in &self.layout.ticks {
            painter.line_segment(
                [tick.start + origin, tick.end + origin],
                egui::Stroke::new(tick.width, palette.tick),
            );
        }

        if let Some(hands) = self.render.hands() {
            painter.line_segment([center, hands.hour_end + origin], egui::Stroke::new(face.hour_width, palette.hand));
            painter.line_segment(
                [center, hands.minute_end + origin],
                egui::Stroke::new(face.minute_width, palette.hand),
            );
            painter.line_segment(
                [center, hands.second_end + origin],
                egui::Stroke::new(face.second_width, palette.accent),
            );
        }
        painter.circle_filled(center, face.center_dot, palette.center);
    }

    fn ui(&mut self, ctx: &egui::Context) -> Option<Action> {
        let palette = self.theme.theme().palette();
        let mut action = None;
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(palette.window_bg))
            .show(ctx, |ui| {
                ui.spacing_mut().item_spacing.y = 0.0;
                action = self.header(ui, palette);
                self.paint_dial(ui, palette);
            });
        action
    }
}

impl eframe::App for ClockApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        let now = Instant::now();
        let local = Local::now();

        self.track_position(ctx);
        if ctx.input(|i| i.viewport().close_requested()) {
            self.dispose();
            return;
        }

        if !self.advance(now, &local) {
            return;
        }

        let theme = self.theme.theme();
        if self.visuals_theme != Some(theme) {
            ctx.set_visuals(theme.visuals());
            self.visuals_theme = Some(theme);
        }
        if self.titlebar_theme != Some(theme) && titlebar::try_set_dark(frame, theme.is_dark()) {
            self.titlebar_theme = Some(theme);
        }

        if let Some(action) = self.ui(ctx) {
            for command in self.apply(action, now, &local) {
                ctx.send_viewport_cmd(command);
            }
        }

        let timers = [self.render.timer(), &self.label_timer, self.theme.timer()];
        if let Some(wait) = schedule::next_wakeup(timers, now) {
            ctx.request_repaint_after(wait);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const HOST: &str = "desk";

    fn startup(dir: &tempfile::TempDir, position: Option<WindowPosition>) -> Startup {
        let paths = Paths::in_dir(dir.path());
        let positions = PositionStore::new(paths.position.clone(), HOST.to_owned());
        Startup {
            settings: Settings {
                auto_theme: false,
                ..Settings::default()
            },
            scale: Scale::X1,
            positions,
            position,
            paths,
        }
    }

    #[test]
    fn window_grows_with_factor() {
        assert_eq!(window_size(Scale::X1), egui::vec2(400.0, 440.0));
        assert_eq!(window_size(Scale::X2_5), egui::vec2(1000.0, 1100.0));
    }

    #[test]
    fn readout_font_has_a_floor() {
        assert_eq!(label_font_size(0.5), 10.0);
        assert_eq!(label_font_size(1.0), 12.0);
        assert_eq!(label_font_size(Scale::X2.factor()), 24.0);
    }

    #[test]
    fn cycling_scale_persists_and_resizes_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let t0 = Instant::now();
        let local = Local::now();
        let pos = WindowPosition { x: 120, y: 80 };
        let mut app = ClockApp::from_startup(startup(&dir, Some(pos)), t0);
        assert!(app.advance(t0, &local));

        let t1 = t0 + Duration::from_millis(300);
        let commands = app.apply(Action::CycleScale, t1, &local);

        assert_eq!(app.scale, Scale::X1_5);
        assert_eq!(app.layout.face, ClockFace::scaled(1.5));
        assert_eq!(std::fs::read_to_string(&app.paths.factor).unwrap(), "1.5");
        let csv = std::fs::read_to_string(&app.paths.position).unwrap();
        assert_eq!(csv, "desk,+120+80\n");
        assert_eq!(commands.len(), 2);
        assert!(matches!(
            commands[0],
            egui::ViewportCommand::InnerSize(size) if size == window_size(Scale::X1_5)
        ));
        assert!(matches!(
            commands[1],
            egui::ViewportCommand::OuterPosition(p) if p == pos.to_pos()
        ));
        // Re-armed for an immediate redraw at the new size
        assert_eq!(app.render.timer().remaining(t1), Some(Duration::ZERO));
        assert!(app.advance(t1, &local));
        assert!(app.render.hands().is_some());
    }

    #[test]
    fn unknown_position_skips_the_move_command() {
        let dir = tempfile::tempdir().unwrap();
        let t0 = Instant::now();
        let mut app = ClockApp::from_startup(startup(&dir, None), t0);
        let commands = app.apply(Action::CycleScale, t0, &Local::now());
        assert_eq!(commands.len(), 1);
        assert!(!app.paths.position.exists());
        assert_eq!(std::fs::read_to_string(&app.paths.factor).unwrap(), "1.5");
    }

    #[test]
    fn dispose_stops_timers_and_saves_once() {
        let dir = tempfile::tempdir().unwrap();
        let t0 = Instant::now();
        let local = Local::now();
        let mut app = ClockApp::from_startup(startup(&dir, Some(WindowPosition { x: 5, y: 6 })), t0);
        app.theme.set_auto(true, t0, &local);
        assert!(app.advance(t0, &local));
        assert!(app.render.timer().is_armed());
        assert!(app.label_timer.is_armed());
        assert!(app.theme.timer().is_armed());

        app.dispose();

        assert_eq!(app.lifecycle, Lifecycle::Disposed);
        assert!(!app.render.timer().is_armed());
        assert!(!app.label_timer.is_armed());
        assert!(!app.theme.timer().is_armed());
        let csv = std::fs::read_to_string(&app.paths.position).unwrap();
        assert_eq!(csv, "desk,+5+6\n");
        let saved = Settings::load(&app.paths.settings).unwrap();
        assert!(saved.auto_theme);
    }

    #[test]
    fn disposed_app_ignores_later_wakeups() {
        let dir = tempfile::tempdir().unwrap();
        let t0 = Instant::now();
        let local = Local::now();
        let mut app = ClockApp::from_startup(startup(&dir, None), t0);
        app.dispose();
        let later = t0 + Duration::from_secs(120);
        assert!(!app.advance(later, &local));
        assert!(app.datetime.is_empty());
        assert!(app.render.hands().is_none());
        assert!(!app.render.timer().is_armed());
    }

    #[test]
    fn manual_theme_toggle_restarts_render_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let t0 = Instant::now();
        let mut app = ClockApp::from_startup(startup(&dir, None), t0);
        assert!(app.apply(Action::ToggleTheme, t0, &Local::now()).is_empty());
        assert_eq!(app.theme.theme(), Theme::Dark);
        assert_eq!(app.render.timer().remaining(t0), Some(Duration::ZERO));
        assert_eq!(Settings::load(&app.paths.settings).unwrap().theme, Theme::Dark);
    }
}
