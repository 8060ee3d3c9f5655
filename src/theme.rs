//! Light/dark palettes and the day/night auto switch

use std::time::{Duration, Instant};

use chrono::Timelike;
use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::schedule::Timer;

/// Interval of the auto theme check
pub const AUTO_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Dark from 18:30 (inclusive) until 06:00 (exclusive)
const DARK_FROM: (u32, u32) = (18, 30);
const LIGHT_FROM: (u32, u32) = (6, 0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
}

/// Colors for one theme
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub window_bg: Color32,
    pub canvas_bg: Color32,
    pub hand: Color32,
    pub numeral: Color32,
    pub tick: Color32,
    pub outline: Color32,
    pub center: Color32,
    pub accent: Color32,
}

const SECOND_HAND_RED: Color32 = Color32::from_rgb(0xff, 0x00, 0x00);

const LIGHT: Palette = Palette {
    window_bg: Color32::WHITE,
    canvas_bg: Color32::WHITE,
    hand: Color32::BLACK,
    numeral: Color32::BLACK,
    tick: Color32::from_rgb(0x66, 0x66, 0x66),
    outline: Color32::BLACK,
    center: Color32::BLACK,
    accent: SECOND_HAND_RED,
};

const DARK: Palette = Palette {
    window_bg: Color32::from_rgb(0x2b, 0x2b, 0x2b),
    canvas_bg: Color32::BLACK,
    hand: Color32::WHITE,
    numeral: Color32::from_rgb(0xdd, 0xdd, 0xdd),
    tick: Color32::from_rgb(0xbb, 0xbb, 0xbb),
    outline: Color32::WHITE,
    center: Color32::WHITE,
    accent: SECOND_HAND_RED,
};

impl Theme {
    pub fn palette(self) -> &'static Palette {
        match self {
            Theme::Light => &LIGHT,
            Theme::Dark => &DARK,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn visuals(self) -> egui::Visuals {
        let mut visuals = match self {
            Theme::Light => egui::Visuals::light(),
            Theme::Dark => egui::Visuals::dark(),
        };
        visuals.panel_fill = self.palette().window_bg;
        visuals
    }

    /// Theme expected at a given local time
    pub fn for_time<T: Timelike>(time: &T) -> Self {
        let hm = (time.hour(), time.minute());
        if hm >= DARK_FROM || hm < LIGHT_FROM {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

/// Current theme plus the optional auto switch and its check timer
pub struct ThemeController {
    theme: Theme,
    auto: bool,
    check: Timer,
}

impl ThemeController {
    pub fn new(theme: Theme, auto: bool, now: Instant) -> Self {
        let mut check = Timer::new(AUTO_CHECK_INTERVAL);
        if auto {
            check.arm_now(now);
        }
        Self { theme, auto, check }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }

    pub fn timer(&self) -> &Timer {
        &self.check
    }

    /// Manual flip; auto mode is left as it is
    pub fn toggle(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Turning auto on evaluates immediately. Returns true if the theme changed.
    pub fn set_auto<T: Timelike>(&mut self, auto: bool, now: Instant, local: &T) -> bool {
        self.auto = auto;
        self.check.cancel();
        if !auto {
            return false;
        }
        self.check.arm(now);
        self.apply_expected(local)
    }

    /// Periodic check. Returns true if the theme changed.
    pub fn poll<T: Timelike>(&mut self, now: Instant, local: &T) -> bool {
        if !self.auto || !self.check.fire(now) {
            return false;
        }
        let changed = self.apply_expected(local);
        self.check.arm(now);
        changed
    }

    pub fn cancel(&mut self) {
        self.check.cancel();
    }

    fn apply_expected<T: Timelike>(&mut self, local: &T) -> bool {
        let expected = Theme::for_time(local);
        if expected == self.theme {
            return false;
        }
        log::info!("auto theme: switching to {:?}", expected);
        self.theme = expected;
        true
    }
}
