//! Finger joint patterns
//!
//! Uses finger/space multiples of thickness for automatic finger calculation,
//! as in https://github.com/florianfesti/boxes
//!
//! All paths are produced in a local frame: the joint runs along +x starting at
//! the origin and the panel material lies on the +y side.

use crate::display_shelf::EdgeRole;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerJointSettings {
    /// Width of fingers in multiples of thickness
    pub finger: f64,
    /// Space between fingers in multiples of thickness
    pub space: f64,
    /// Space at start and end in multiples of normal spaces
    pub surrounding_spaces: f64,
    /// Extra space to allow fingers to move in/out (multiples of thickness)
    pub play: f64,
    /// Extra material for burn marks (multiples of thickness)
    pub extra_length: f64,
}

impl Default for FingerJointSettings {
    fn default() -> Self {
        Self {
            finger: 2.0,
            space: 2.0,
            surrounding_spaces: 2.0,
            play: 0.0,
            extra_length: 0.0,
        }
    }
}

impl FingerJointSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.finger < 0.0 || self.space < 0.0 {
            return Err("Finger and space widths must not be negative".to_string());
        }
        if (self.space + self.finger).abs() < 0.1 {
            return Err("Finger + space must not be close to zero".to_string());
        }
        if self.surrounding_spaces < 0.0 {
            return Err("Surrounding spaces must not be negative".to_string());
        }
        Ok(())
    }

    /// Calculate number of fingers and leftover space for a given length
    pub fn calc_fingers(&self, thickness: f64, length: f64) -> (usize, f64) {
        let t = thickness;
        let space = self.space * t;
        let finger = self.finger * t;

        // Negative quotients saturate to zero
        let usable = length - (self.surrounding_spaces - 1.0) * space;
        let mut fingers = (usable / (space + finger)).floor() as usize;

        if fingers == 0 && length > finger + t {
            fingers = 1;
        }

        if finger == 0.0 {
            fingers = 0;
        }

        let leftover = if fingers > 0 {
            length - (fingers as f64) * (space + finger) + space
        } else {
            length
        };

        (fingers, leftover)
    }
}

/// Draws finger edges and finger slot rows for one material thickness.
#[derive(Debug, Clone)]
pub struct FingerJoint {
    settings: FingerJointSettings,
    thickness: f64,
    kerf: f64,
}

impl FingerJoint {
    pub fn new(settings: FingerJointSettings, thickness: f64, kerf: f64) -> Self {
        Self {
            settings,
            thickness,
            kerf,
        }
    }

    pub fn settings(&self) -> &FingerJointSettings {
        &self.settings
    }

    /// Edge path from `(0, -kerf/2)` to `(length, -kerf/2)` for the given role.
    ///
    /// Emitting edges push fingers out to `-t`, receiving edges cut notches in
    /// to `+t`. The whole path sits half a kerf outside the nominal outline;
    /// fingers are widened and notches narrowed by the same amount.
    pub fn edge(&self, length: f64, role: EdgeRole) -> Vec<Point2<f64>> {
        let half_kerf = self.kerf / 2.0;
        let base_y = -half_kerf;
        let mut path = vec![Point2::new(0.0, base_y)];
        let positive = match role {
            EdgeRole::Plain => {
                path.push(Point2::new(length, base_y));
                return path;
            }
            EdgeRole::FingerEmitting => true,
            EdgeRole::FingerReceiving => false,
        };

        let t = self.thickness;
        let kerf = self.kerf;
        let mut space = self.settings.space * t;
        let mut finger = self.settings.finger * t;
        let play = self.settings.play * t;
        let extra = self.settings.extra_length * t;

        let (fingers, mut leftover) = self.settings.calc_fingers(t, length);
        if fingers == 0 {
            path.push(Point2::new(length, base_y));
            return path;
        }

        if !positive {
            finger += play;
            space -= play;
            leftover -= play;
        }

        let (finger_draw, space_draw, leftover_draw, tip_y) = if positive {
            (finger + kerf, space - kerf, leftover - kerf, -t - extra - half_kerf)
        } else {
            (finger - kerf, space + kerf, leftover + kerf, t - half_kerf)
        };

        let mut x = leftover_draw / 2.0;
        for i in 0..fingers {
            path.push(Point2::new(x, base_y));
            path.push(Point2::new(x, tip_y));
            x += finger_draw;
            path.push(Point2::new(x, tip_y));
            path.push(Point2::new(x, base_y));
            if i + 1 < fingers {
                x += space_draw;
            }
        }
        path.push(Point2::new(length, base_y));
        path
    }

    /// Closed slot outlines for a row of finger holes along `length`.
    ///
    /// Slots are one thickness wide, centred on the x axis.
    pub fn holes(&self, length: f64) -> Vec<Vec<Point2<f64>>> {
        let t = self.thickness;
        let half_kerf = self.kerf / 2.0;
        let space = self.settings.space * t;
        let play = self.settings.play * t;
        let finger = self.settings.finger * t + play;

        let (fingers, leftover) = self.settings.calc_fingers(t, length);
        let half_width = t / 2.0 + play / 2.0 - half_kerf;
        let mut x = (leftover - play) / 2.0;

        let mut slots = Vec::with_capacity(fingers);
        for _ in 0..fingers {
            let x0 = x + half_kerf;
            let x1 = x + finger - half_kerf;
            slots.push(vec![
                Point2::new(x0, -half_width),
                Point2::new(x1, -half_width),
                Point2::new(x1, half_width),
                Point2::new(x0, half_width),
                Point2::new(x0, -half_width),
            ]);
            x += finger + space - play;
        }
        slots
    }
}
