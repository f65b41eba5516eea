//! Panel Cutter
//!
//! Turns display shelf panels into closed laser cut paths: finger patterns on
//! the outline edges, finger slots and round holes inside, and a simple row
//! layout on the sheet. The result can be written out as G-code.

use crate::display_shelf::{Panel, PanelSink, ShelfParameters};
use crate::error::{CamToolError, CamToolResult};
use crate::finger_joint::{FingerJoint, FingerJointSettings};
use nalgebra::{Isometry2, Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt::Write as _;
use tracing::debug;

/// Laser and sheet settings for the cutter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutterSettings {
    /// Kerf / tool diameter in mm
    pub burn: f64,
    pub laser_passes: u32,
    pub z_step_down: f64,
    pub laser_power: u32,
    /// Feed rate in mm/min
    pub feed_rate: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Gap between panels on the sheet
    pub spacing: f64,
    /// Panels wrap to a new row past this width, 0 disables wrapping
    pub sheet_width: f64,
    /// Maximum chord length used to approximate round holes
    pub arc_segment_length: f64,
}

impl Default for CutterSettings {
    fn default() -> Self {
        Self {
            burn: 0.1,
            laser_passes: 3,
            z_step_down: 0.5,
            laser_power: 1000,
            feed_rate: 500.0,
            offset_x: 10.0,
            offset_y: 10.0,
            spacing: 5.0,
            sheet_width: 600.0,
            arc_segment_length: 1.0,
        }
    }
}

impl CutterSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.burn < 0.0 {
            return Err("Burn must not be negative".to_string());
        }
        if self.laser_passes == 0 {
            return Err("At least one laser pass is required".to_string());
        }
        if self.feed_rate <= 0.0 {
            return Err("Feed rate must be > 0".to_string());
        }
        if self.spacing < 0.0 || self.sheet_width < 0.0 {
            return Err("Spacing and sheet width must not be negative".to_string());
        }
        if self.arc_segment_length <= 0.0 {
            return Err("Arc segment length must be > 0".to_string());
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
struct LayoutCursor {
    x: f64,
    y: f64,
    spacing: f64,
    sheet_width: f64,
    row_height: f64,
}

impl LayoutCursor {
    fn new(spacing: f64, sheet_width: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            spacing,
            sheet_width,
            row_height: 0.0,
        }
    }

    fn place(&mut self, width: f64, height: f64) -> (f64, f64) {
        if self.sheet_width > 0.0 && self.x > 0.0 && self.x + width > self.sheet_width {
            self.next_row();
        }
        let position = (self.x, self.y);
        self.x += width + self.spacing;
        self.row_height = self.row_height.max(height);
        position
    }

    fn next_row(&mut self) {
        self.y += self.row_height + self.spacing;
        self.x = 0.0;
        self.row_height = 0.0;
    }
}

fn push_unique_point(path: &mut Vec<Point2<f64>>, point: Point2<f64>) {
    if let Some(last) = path.last() {
        if (point.x - last.x).abs() < 0.01 && (point.y - last.y).abs() < 0.01 {
            return;
        }
    }
    path.push(point);
}

/// How far an edge offset by one unit overshoots its end at a left turn.
fn mitre(turn_degrees: f64) -> f64 {
    (turn_degrees.to_radians() / 2.0).tan()
}

/// A panel converted to sheet coordinates.
#[derive(Debug, Clone)]
pub struct CutPanel {
    pub label: String,
    /// Closed outer contour
    pub outline: Vec<Point2<f64>>,
    /// Closed inner contours, cut before the outline
    pub holes: Vec<Vec<Point2<f64>>>,
    pub finger_runs: usize,
    pub round_holes: usize,
    pub width: f64,
    pub height: f64,
}

pub struct PanelCutter {
    joint: FingerJoint,
    settings: CutterSettings,
    layout: LayoutCursor,
    panels: Vec<CutPanel>,
    // Holes of the panel currently being emitted, in panel coordinates
    pending_holes: Vec<Vec<Point2<f64>>>,
    pending_runs: usize,
    pending_round: usize,
}

impl PanelCutter {
    pub fn new(
        thickness: f64,
        finger_joint: FingerJointSettings,
        settings: CutterSettings,
    ) -> CamToolResult<Self> {
        if thickness <= 0.0 {
            return Err(CamToolError::InvalidParameters(format!(
                "material thickness must be positive (got {})",
                thickness
            )));
        }
        finger_joint.validate().map_err(CamToolError::InvalidParameters)?;
        settings.validate().map_err(CamToolError::InvalidParameters)?;
        if settings.burn >= thickness {
            return Err(CamToolError::InvalidParameters(format!(
                "burn {} must be smaller than the material thickness {}",
                settings.burn, thickness
            )));
        }

        Ok(Self {
            joint: FingerJoint::new(finger_joint, thickness, settings.burn),
            layout: LayoutCursor::new(settings.spacing, settings.sheet_width),
            settings,
            panels: Vec::new(),
            pending_holes: Vec::new(),
            pending_runs: 0,
            pending_round: 0,
        })
    }

    pub fn panels(&self) -> &[CutPanel] {
        &self.panels
    }

    /// Walk the panel outline, replacing each edge by its finger pattern.
    ///
    /// Edges are offset outward by half the burn; their ends are stretched to
    /// the mitre point so neighbouring offset edges meet at the corners.
    fn trace_outline(&self, panel: &Panel) -> Vec<Point2<f64>> {
        let mut path: Vec<Point2<f64>> = Vec::new();
        let mut origin = Vector2::new(0.0, 0.0);
        let mut heading = 0.0_f64;
        let half_kerf = self.settings.burn / 2.0;

        let edges = panel.outline.edges();
        // The last turn leads back into the first edge
        let mut incoming = edges.last().map_or(0.0, |e| e.turn_degrees);

        for (edge, role) in edges.iter().zip(panel.edge_roles.iter()) {
            let frame = Isometry2::new(origin, heading.to_radians());
            let mut points = self.joint.edge(edge.length, *role);
            if let Some(first) = points.first_mut() {
                first.x -= half_kerf * mitre(incoming);
            }
            if let Some(last) = points.last_mut() {
                last.x += half_kerf * mitre(edge.turn_degrees);
            }
            for p in points {
                push_unique_point(&mut path, frame * p);
            }
            incoming = edge.turn_degrees;
            origin += frame.rotation * Vector2::new(edge.length, 0.0);
            heading += edge.turn_degrees;
        }

        // Snap the end of the walk onto the start so the contour is exactly closed
        if let Some(first) = path.first().cloned() {
            let closes =
                path.len() > 1 && path.last().is_some_and(|last| (last - first).norm() < 0.01);
            if closes {
                let end = path.len() - 1;
                path[end] = first;
            } else {
                path.push(first);
            }
        }
        path
    }

    fn circle(&self, x: f64, y: f64, radius: f64) -> Vec<Point2<f64>> {
        let r = (radius - self.settings.burn / 2.0).max(0.0);
        let segments = ((2.0 * PI * r) / self.settings.arc_segment_length)
            .ceil()
            .max(16.0) as usize;
        (0..=segments)
            .map(|i| {
                let theta = 2.0 * PI * (i % segments) as f64 / segments as f64;
                Point2::new(x + r * theta.cos(), y + r * theta.sin())
            })
            .collect()
    }

    fn cut_panel(&mut self, panel: &Panel) {
        self.pending_holes.clear();
        self.pending_runs = 0;
        self.pending_round = 0;
        self.emit_holes(&panel.holes);

        let outline = self.trace_outline(panel);
        let (min_x, min_y, max_x, max_y) = outline.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(a, b, c, d), p| (a.min(p.x), b.min(p.y), c.max(p.x), d.max(p.y)),
        );
        if !min_x.is_finite() {
            return;
        }
        let width = max_x - min_x;
        let height = max_y - min_y;
        let (start_x, start_y) = self.layout.place(width, height);
        let shift = Vector2::new(start_x - min_x, start_y - min_y);

        let holes: Vec<Vec<Point2<f64>>> = std::mem::take(&mut self.pending_holes)
            .into_iter()
            .map(|hole| hole.into_iter().map(|p| p + shift).collect())
            .collect();

        debug!(label = %panel.label, width, height, "Placed panel");
        self.panels.push(CutPanel {
            label: panel.label.clone(),
            outline: outline.into_iter().map(|p| p + shift).collect(),
            holes,
            finger_runs: self.pending_runs,
            round_holes: self.pending_round,
            width,
            height,
        });
    }

    /// Plain-text cut list.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for (i, panel) in self.panels.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>2}. {:<14} {:>8.2} x {:>8.2} mm  finger runs: {:<3} holes: {}",
                i + 1,
                panel.label,
                panel.width,
                panel.height,
                panel.finger_runs,
                panel.round_holes
            );
        }
        out
    }

    pub fn to_gcode(&self, params: &ShelfParameters) -> CamToolResult<String> {
        if self.panels.is_empty() {
            return Err(CamToolError::GenerationFailed("no panels have been cut".to_string()));
        }
        let s = &self.settings;
        let fj = self.joint.settings();
        let mut gcode = String::new();

        gcode.push_str("; Display Shelf G-code\n");
        gcode.push_str("; Based on https://github.com/florianfesti/boxes\n");
        gcode.push_str(";\n");
        gcode.push_str("; --- Shelf Dimensions ---\n");
        gcode.push_str(&format!(
            "; Dimensions: {}x{}x{} mm\n",
            params.width, params.depth, params.height
        ));
        gcode.push_str(&format!(
            "; Outside Dimensions: {}\n",
            params.outside_dimensions
        ));
        gcode.push_str(&format!("; Shelves: {}\n", params.shelf_count));
        gcode.push_str(&format!("; Angle: {} deg\n", params.angle_degrees));
        gcode.push_str(&format!(
            "; Front lip height: {} mm\n",
            params.front_lip_height
        ));
        gcode.push_str(&format!("; Slope top: {}\n", params.slope_top));
        gcode.push_str(&format!("; Back panel: {}\n", params.include_back));
        gcode.push_str(&format!("; Hole diameter: {} mm\n", params.hole_diameter));
        gcode.push_str(";\n");

        gcode.push_str("; --- Material Settings ---\n");
        gcode.push_str(&format!("; Material thickness: {} mm\n", params.thickness));
        gcode.push_str(&format!("; Burn / Tool Dia: {} mm\n", s.burn));
        gcode.push_str(&format!(
            "; Finger width: {} * thickness = {} mm\n",
            fj.finger,
            fj.finger * params.thickness
        ));
        gcode.push_str(&format!(
            "; Space width: {} * thickness = {} mm\n",
            fj.space,
            fj.space * params.thickness
        ));
        gcode.push_str(";\n");

        gcode.push_str("; --- Laser Settings ---\n");
        gcode.push_str(&format!("; Laser passes: {}\n", s.laser_passes));
        gcode.push_str(&format!("; Laser power: S{}\n", s.laser_power));
        gcode.push_str(&format!("; Feed rate: {:.0} mm/min\n", s.feed_rate));
        gcode.push_str(";\n");

        gcode.push_str("; Initialization\n");
        gcode.push_str("G21 ; Set units to millimeters\n");
        gcode.push_str("G90 ; Absolute positioning\n");
        gcode.push_str("G17 ; XY plane selection\n");
        gcode.push_str(&format!(
            "G0 Z{:.2} F{:.0} ; Move to safe height\n\n",
            5.0, s.feed_rate
        ));

        for (i, panel) in self.panels.iter().enumerate() {
            gcode.push_str(&format!("; Panel {}: {}\n", i + 1, panel.label));
            for hole in &panel.holes {
                self.push_path(&mut gcode, hole);
            }
            self.push_path(&mut gcode, &panel.outline);
            gcode.push('\n');
        }

        gcode.push_str("M5 ; Ensure laser off\n");
        gcode.push_str("G0 Z10.0 ; Move to safe height\n");
        gcode.push_str("G0 X0 Y0 ; Return to origin\n");
        gcode.push_str("M2 ; Program end\n");

        Ok(gcode)
    }

    fn push_path(&self, gcode: &mut String, path: &[Point2<f64>]) {
        let s = &self.settings;
        let Some(first) = path.first() else {
            return;
        };
        let (dx, dy) = (s.offset_x, s.offset_y);

        gcode.push_str(&format!(
            "G0 X{:.2} Y{:.2} ; Rapid to start\n",
            first.x + dx,
            first.y + dy
        ));

        for pass_num in 1..=s.laser_passes {
            let z_depth = -(pass_num as f64 - 1.0) * s.z_step_down;
            gcode.push_str(&format!(
                "; Pass {}/{} at Z{:.2}\n",
                pass_num, s.laser_passes, z_depth
            ));
            if pass_num > 1 {
                gcode.push_str(&format!("G0 Z{:.2} ; Move to pass depth\n", z_depth));
            }
            gcode.push_str(&format!("M3 S{} ; Laser on\n", s.laser_power));

            for (idx, point) in path.iter().skip(1).enumerate() {
                if idx == 0 {
                    gcode.push_str(&format!(
                        "G1 X{:.2} Y{:.2} F{:.0}\n",
                        point.x + dx,
                        point.y + dy,
                        s.feed_rate
                    ));
                } else {
                    gcode.push_str(&format!("G1 X{:.2} Y{:.2}\n", point.x + dx, point.y + dy));
                }
            }

            gcode.push_str("M5 ; Laser off\n");
            if pass_num < s.laser_passes {
                gcode.push_str(&format!(
                    "G0 X{:.2} Y{:.2} ; Return to start\n",
                    first.x + dx,
                    first.y + dy
                ));
            }
        }
    }
}

impl PanelSink for PanelCutter {
    fn emit_polygon(&mut self, panel: &Panel) {
        self.cut_panel(panel);
    }

    fn emit_rectangle(&mut self, panel: &Panel) {
        self.cut_panel(panel);
    }

    fn emit_finger_joint_run(&mut self, x: f64, y: f64, length: f64, angle_degrees: f64) {
        let frame = Isometry2::new(Vector2::new(x, y), angle_degrees.to_radians());
        for slot in self.joint.holes(length) {
            self.pending_holes
                .push(slot.into_iter().map(|p| frame * p).collect());
        }
        self.pending_runs += 1;
    }

    fn emit_circular_hole(&mut self, x: f64, y: f64, radius: f64) {
        let circle = self.circle(x, y, radius);
        self.pending_holes.push(circle);
        self.pending_round += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_shelf::{
        parse_edge_roles, EdgeRole, HolePlacement, PanelOutline, PolygonEdge,
    };

    fn cutter() -> PanelCutter {
        let settings = CutterSettings {
            burn: 0.0,
            laser_passes: 1,
            offset_x: 0.0,
            offset_y: 0.0,
            ..CutterSettings::default()
        };
        PanelCutter::new(3.0, FingerJointSettings::default(), settings).unwrap()
    }

    fn rect(label: &str, width: f64, height: f64, edges: &str) -> Panel {
        Panel {
            label: label.to_string(),
            outline: PanelOutline::Rectangle { width, height },
            edge_roles: parse_edge_roles(edges).unwrap(),
            holes: Vec::new(),
        }
    }

    #[test]
    fn test_plain_rectangle_outline() {
        let mut cutter = cutter();
        cutter.emit_rectangle(&rect("plain", 40.0, 20.0, "eeee"));
        let panel = &cutter.panels()[0];
        assert_eq!(panel.outline.len(), 5);
        assert!((panel.width - 40.0).abs() < 1e-9);
        assert!((panel.height - 20.0).abs() < 1e-9);
        assert_eq!(panel.outline.first(), panel.outline.last());
    }

    #[test]
    fn test_burn_grows_plain_rectangle() {
        let settings = CutterSettings {
            burn: 0.2,
            ..CutterSettings::default()
        };
        let mut cutter = PanelCutter::new(3.0, FingerJointSettings::default(), settings).unwrap();
        cutter.emit_rectangle(&rect("plain", 40.0, 20.0, "eeee"));
        let panel = &cutter.panels()[0];
        assert!((panel.width - 40.2).abs() < 1e-9);
        assert!((panel.height - 20.2).abs() < 1e-9);
        assert_eq!(panel.outline.len(), 5);
        assert_eq!(panel.outline.first(), panel.outline.last());
    }

    #[test]
    fn test_burn_keeps_finger_corners_closed() {
        let settings = CutterSettings {
            burn: 0.2,
            ..CutterSettings::default()
        };
        let mut cutter = PanelCutter::new(3.0, FingerJointSettings::default(), settings).unwrap();
        cutter.emit_rectangle(&rect("fingers", 100.0, 50.0, "feFe"));
        let panel = &cutter.panels()[0];
        // Fingers stick out 3 mm below, the notched top stays put
        assert!((panel.height - (50.0 + 3.0 + 0.2)).abs() < 1e-9);
        assert!((panel.width - 100.2).abs() < 1e-9);
        assert_eq!(panel.outline.first(), panel.outline.last());
        for pair in panel.outline.windows(2) {
            let d = pair[1] - pair[0];
            // Every segment is axis aligned, so no corner was cut short
            assert!(d.x.abs() < 1e-9 || d.y.abs() < 1e-9);
        }
    }

    #[test]
    fn test_burn_offsets_slanted_polygon() {
        let settings = CutterSettings {
            burn: 0.2,
            ..CutterSettings::default()
        };
        let mut cutter = PanelCutter::new(3.0, FingerJointSettings::default(), settings).unwrap();
        // 3-4-5 right triangle, legs along the axes
        let panel = Panel {
            label: "triangle".to_string(),
            outline: PanelOutline::Polygon {
                edges: vec![
                    PolygonEdge::new(40.0, 180.0 - 36.86989764584402),
                    PolygonEdge::new(50.0, 180.0 - 53.130102354155985),
                    PolygonEdge::new(30.0, 90.0),
                ],
            },
            edge_roles: vec![EdgeRole::Plain; 3],
            holes: Vec::new(),
        };
        cutter.emit_polygon(&panel);
        let cut = &cutter.panels()[0];
        assert_eq!(cut.outline.len(), 4);
        // Right-angle corner moves by half the burn on both axes
        let corner = cut.outline[0];
        let next = cut.outline[1];
        assert!((next.x - corner.x - (40.0 + 0.1 + 0.1 * 3.0)).abs() < 1e-6);
        assert!((next.y - corner.y).abs() < 1e-9);
    }

    #[test]
    fn test_emitting_edge_grows_bounds() {
        let mut cutter = cutter();
        cutter.emit_rectangle(&rect("fingers", 100.0, 50.0, "feee"));
        let panel = &cutter.panels()[0];
        assert!((panel.height - 53.0).abs() < 1e-9);
        assert!((panel.width - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_polygon_outline_closes() {
        let mut cutter = cutter();
        let panel = Panel {
            label: "triangle".to_string(),
            outline: PanelOutline::Polygon {
                edges: vec![
                    PolygonEdge::new(30.0, 90.0),
                    PolygonEdge::new(40.0, 180.0 - 36.86989764584402),
                    PolygonEdge::new(50.0, 180.0 - 53.130102354155985),
                ],
            },
            edge_roles: vec![EdgeRole::Plain; 3],
            holes: Vec::new(),
        };
        cutter.emit_polygon(&panel);
        let outline = &cutter.panels()[0].outline;
        assert_eq!(outline.len(), 4);
        assert_eq!(outline.first(), outline.last());
    }

    #[test]
    fn test_holes_are_cut_and_counted() {
        let mut cutter = cutter();
        let mut panel = rect("holes", 100.0, 100.0, "eeee");
        panel.holes = vec![
            HolePlacement::FingerJointRun {
                x: 10.0,
                y: 10.0,
                length: 60.0,
                angle_degrees: 30.0,
            },
            HolePlacement::CircularHole {
                x: 50.0,
                y: 50.0,
                radius: 5.0,
            },
            HolePlacement::CircularHole {
                x: 50.0,
                y: 50.0,
                radius: 0.0,
            },
        ];
        cutter.emit_rectangle(&panel);
        let cut = &cutter.panels()[0];
        assert_eq!(cut.finger_runs, 1);
        assert_eq!(cut.round_holes, 1);
        let slots = FingerJoint::new(FingerJointSettings::default(), 3.0, 0.0)
            .holes(60.0)
            .len();
        assert_eq!(cut.holes.len(), slots + 1);
    }

    #[test]
    fn test_layout_wraps_rows() {
        let settings = CutterSettings {
            burn: 0.0,
            sheet_width: 100.0,
            spacing: 5.0,
            ..CutterSettings::default()
        };
        let mut cutter = PanelCutter::new(3.0, FingerJointSettings::default(), settings).unwrap();
        cutter.emit_rectangle(&rect("a", 60.0, 20.0, "eeee"));
        cutter.emit_rectangle(&rect("b", 60.0, 30.0, "eeee"));
        let a = &cutter.panels()[0];
        let b = &cutter.panels()[1];
        let a_min_y = a.outline.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let b_min_y = b.outline.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        assert!(a_min_y.abs() < 1e-9);
        assert!((b_min_y - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_gcode_structure() {
        let mut cutter = cutter();
        cutter.emit_rectangle(&rect("plain", 40.0, 20.0, "eeee"));
        let gcode = cutter.to_gcode(&ShelfParameters::default()).unwrap();
        assert!(gcode.contains("G21"));
        assert!(gcode.contains("; Panel 1: plain"));
        assert!(gcode.contains("M3 S1000"));
        assert!(gcode.ends_with("M2 ; Program end\n"));
        assert!(!gcode.contains("NaN"));
    }

    #[test]
    fn test_gcode_requires_panels() {
        let cutter = cutter();
        assert_eq!(
            cutter.to_gcode(&ShelfParameters::default()),
            Err(CamToolError::GenerationFailed("no panels have been cut".to_string()))
        );
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let fj = FingerJointSettings::default;
        assert!(matches!(
            PanelCutter::new(0.0, fj(), CutterSettings::default()),
            Err(CamToolError::InvalidParameters(_))
        ));

        let settings = CutterSettings {
            laser_passes: 0,
            ..CutterSettings::default()
        };
        assert!(matches!(
            PanelCutter::new(3.0, fj(), settings),
            Err(CamToolError::InvalidParameters(_))
        ));

        let settings = CutterSettings {
            burn: 3.0,
            ..CutterSettings::default()
        };
        assert!(matches!(
            PanelCutter::new(3.0, fj(), settings),
            Err(CamToolError::InvalidParameters(_))
        ));

        let joint = FingerJointSettings {
            finger: -1.0,
            ..FingerJointSettings::default()
        };
        assert!(matches!(
            PanelCutter::new(3.0, joint, CutterSettings::default()),
            Err(CamToolError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_summary_lists_panels() {
        let mut cutter = cutter();
        cutter.emit_rectangle(&rect("shelf 1", 40.0, 20.0, "eeee"));
        let summary = cutter.summary();
        assert!(summary.contains("shelf 1"));
        assert!(summary.contains("40.00"));
    }
}
