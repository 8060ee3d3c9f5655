//! Render loop: recomputes hand positions on a fixed interval

use std::time::{Duration, Instant};

use chrono::Timelike;

use crate::geometry::{self, ClockFace, HandAngles, Tick};
use crate::schedule::Timer;

/// Hand refresh interval
pub const UPDATE_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderState {
    /// Waiting for the next wake-up
    Idle,
    /// Recomputing hands
    Drawing,
}

/// Hand geometry for one displayed second (canvas-local coordinates)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandFrame {
    pub angles: HandAngles,
    pub hour_end: egui::Pos2,
    pub minute_end: egui::Pos2,
    pub second_end: egui::Pos2,
    pub second: u32,
}

impl HandFrame {
    pub fn compute<T: Timelike>(time: &T, face: &ClockFace) -> Self {
        let angles = HandAngles::from_hms(time.hour(), time.minute(), time.second());
        Self {
            angles,
            hour_end: geometry::hand_endpoint(face.center, face.hour_hand, angles.hour),
            minute_end: geometry::hand_endpoint(face.center, face.minute_hand, angles.minute),
            second_end: geometry::hand_endpoint(face.center, face.second_hand, angles.second),
            second: time.second(),
        }
    }
}

/// Static parts of the dial; rebuilt only when the scale changes
#[derive(Clone, Debug)]
pub struct FaceLayout {
    pub face: ClockFace,
    pub ticks: Vec<Tick>,
    pub numerals: Vec<(u32, egui::Pos2)>,
}

impl FaceLayout {
    pub fn new(factor: f32) -> Self {
        let face = ClockFace::scaled(factor);
        Self {
            ticks: geometry::ticks(&face),
            numerals: geometry::numerals(&face),
            face,
        }
    }
}

/// Outcome of a render wake-up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Redrawn {
    /// The wall-clock second differs from the previous frame
    pub second_elapsed: bool,
}

pub struct RenderLoop {
    timer: Timer,
    state: RenderState,
    hands: Option<HandFrame>,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            timer: Timer::new(UPDATE_INTERVAL),
            state: RenderState::Idle,
            hands: None,
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn hands(&self) -> Option<&HandFrame> {
        self.hands.as_ref()
    }

    /// Drop any pending wake-up and redraw on the next poll
    pub fn restart(&mut self, now: Instant) {
        self.timer.cancel();
        self.timer.arm_now(now);
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    /// Recompute the hands if the wake-up is due
    pub fn poll<T: Timelike>(&mut self, now: Instant, time: &T, face: &ClockFace) -> Option<Redrawn> {
        if !self.timer.fire(now) {
            return None;
        }
        self.state = RenderState::Drawing;
        let frame = HandFrame::compute(time, face);
        let second_elapsed = self.hands.is_some_and(|prev| prev.second != frame.second);
        self.hands = Some(frame);
        self.state = RenderState::Idle;
        self.timer.arm(now);
        Some(Redrawn { second_elapsed })
    }
}
