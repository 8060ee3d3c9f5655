//! Clock face geometry: hand angles, hand endpoints, tick marks and numeral positions.
//!
//! All coordinates are local to the clock canvas (origin top-left, y grows downward).

use egui::{Pos2, Vec2, pos2, vec2};

/// Degrees per hour on the dial
const DEG_PER_HOUR: f32 = 30.0;
/// Degrees per minute / second on the dial
const DEG_PER_STEP: f32 = 6.0;

/// Layout of the clock face. Every field is a length derived from `BASE` times one factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClockFace {
    pub canvas: f32,
    pub center: Pos2,
    pub radius: f32,
    pub hour_hand: f32,
    pub minute_hand: f32,
    pub second_hand: f32,
    pub numeral_distance: f32,
    pub font_size: f32,
    pub major_tick: f32,
    pub minor_tick: f32,
    pub major_tick_width: f32,
    pub minor_tick_width: f32,
    pub hour_width: f32,
    pub minute_width: f32,
    pub second_width: f32,
    pub center_dot: f32,
    pub outline_width: f32,
}

impl ClockFace {
    /// Layout at factor 1.0 (400 x 400 canvas)
    pub const BASE: ClockFace = ClockFace {
        canvas: 400.0,
        center: pos2(200.0, 200.0),
        radius: 190.0,
        hour_hand: 100.0,
        minute_hand: 150.0,
        second_hand: 175.0,
        numeral_distance: 155.0,
        font_size: 32.0,
        major_tick: 20.0,
        minor_tick: 10.0,
        major_tick_width: 3.0,
        minor_tick_width: 1.0,
        hour_width: 14.0,
        minute_width: 8.0,
        second_width: 3.0,
        center_dot: 7.0,
        outline_width: 2.0,
    };

    pub fn scaled(factor: f32) -> Self {
        let b = Self::BASE;
        Self {
            canvas: b.canvas * factor,
            center: pos2(b.center.x * factor, b.center.y * factor),
            radius: b.radius * factor,
            hour_hand: b.hour_hand * factor,
            minute_hand: b.minute_hand * factor,
            second_hand: b.second_hand * factor,
            numeral_distance: b.numeral_distance * factor,
            font_size: b.font_size * factor,
            major_tick: b.major_tick * factor,
            minor_tick: b.minor_tick * factor,
            major_tick_width: b.major_tick_width * factor,
            minor_tick_width: b.minor_tick_width * factor,
            hour_width: b.hour_width * factor,
            minute_width: b.minute_width * factor,
            second_width: b.second_width * factor,
            center_dot: b.center_dot * factor,
            outline_width: b.outline_width * factor,
        }
    }

    /// Size of the square canvas
    pub fn size(&self) -> Vec2 {
        vec2(self.canvas, self.canvas)
    }
}

/// Hand angles in degrees, clockwise from 12 o'clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandAngles {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

impl HandAngles {
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Self {
        Self {
            hour: ((hour % 12) as f32 + minute as f32 / 60.0) * DEG_PER_HOUR,
            minute: minute as f32 * DEG_PER_STEP,
            second: second as f32 * DEG_PER_STEP,
        }
    }
}

/// End point of a hand of `length` at `angle_deg` (0 = up, clockwise).
pub fn hand_endpoint(center: Pos2, length: f32, angle_deg: f32) -> Pos2 {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    center + vec2(length * sin, -length * cos)
}

/// A single tick mark segment on the dial rim
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    pub start: Pos2,
    pub end: Pos2,
    pub width: f32,
}

/// 60 ticks, 6 degrees apart, measured from 3 o'clock; every 5th is major.
pub fn ticks(face: &ClockFace) -> Vec<Tick> {
    (0..60)
        .map(|i| {
            let (len, width) = if i % 5 == 0 {
                (face.major_tick, face.major_tick_width)
            } else {
                (face.minor_tick, face.minor_tick_width)
            };
            let (sin, cos) = (i as f32 * DEG_PER_STEP).to_radians().sin_cos();
            let dir = vec2(cos, sin);
            Tick {
                start: face.center + dir * (face.radius - len),
                end: face.center + dir * face.radius,
                width,
            }
        })
        .collect()
}

/// Numerals 1..=12 with the center point of each label ("12" at the top).
pub fn numerals(face: &ClockFace) -> Vec<(u32, Pos2)> {
    (1..=12u32)
        .map(|i| {
            let (sin, cos) = (i as f32 * DEG_PER_HOUR - 90.0).to_radians().sin_cos();
            (i, face.center + vec2(cos, sin) * face.numeral_distance)
        })
        .collect()
}
