//! Display Shelf Maker
//!
//! Panel geometry for a slot-jointed shelf unit with slanted floors, after the
//! DisplayShelf generator from https://github.com/florianfesti/boxes
//!
//! The maker derives the shared geometry once, then produces the two side
//! panels, one floor (and optional front lip) per shelf, and an optional back
//! panel. Panels are plain values; a [`PanelSink`] turns them into cut paths.

pub mod types;

pub use types::{
    edge_string, parse_edge_roles, DerivedGeometry, EdgeRole, HoleCollector, HolePlacement,
    Panel, PanelOutline, PolygonEdge, ShelfParameters, TopGeometry,
};

use crate::error::{ConfigurationError, ConfigurationResult};
use tracing::{debug, info, warn};

/// Divisors smaller than this are treated as zero.
const TRIG_EPSILON: f64 = 1e-9;

/// Receives panels in emission order and turns them into something cuttable.
pub trait PanelSink {
    /// Called for panels with a turtle outline.
    fn emit_polygon(&mut self, panel: &Panel);

    /// Called for panels with a rectangular outline.
    fn emit_rectangle(&mut self, panel: &Panel);

    fn emit_finger_joint_run(&mut self, _x: f64, _y: f64, _length: f64, _angle_degrees: f64) {}

    fn emit_circular_hole(&mut self, _x: f64, _y: f64, _radius: f64) {}

    /// Dispatch a panel's holes to the two hole methods.
    fn emit_holes(&mut self, holes: &[HolePlacement]) {
        for hole in holes {
            match *hole {
                HolePlacement::FingerJointRun {
                    x,
                    y,
                    length,
                    angle_degrees,
                } => self.emit_finger_joint_run(x, y, length, angle_degrees),
                HolePlacement::CircularHole { x, y, radius } => {
                    if radius > 0.0 {
                        self.emit_circular_hole(x, y, radius);
                    }
                }
            }
        }
    }
}

/// Convert an outside measurement to an inside one.
///
/// Every bounding edge that carries a finger joint costs one material thickness.
pub fn adjust_for_outside(size: f64, thickness: f64, edge_roles: &[EdgeRole]) -> f64 {
    let walls = edge_roles.iter().filter(|r| r.is_finger()).count() as f64;
    size - walls * thickness
}

/// Derive the secondary quantities used by every panel.
pub fn derive_geometry(params: &ShelfParameters) -> ConfigurationResult<DerivedGeometry> {
    validate_parameters(params)?;

    let t = params.thickness;
    let a = params.angle_degrees.to_radians();
    let (sin_a, cos_a) = a.sin_cos();

    if cos_a.abs() < TRIG_EPSILON {
        return Err(ConfigurationError::SingularAngle {
            angle: params.angle_degrees,
            context: "shelf floor depth".to_string(),
        });
    }

    let effective_width = if params.outside_dimensions {
        adjust_for_outside(
            params.width,
            t,
            &[EdgeRole::FingerReceiving, EdgeRole::FingerReceiving],
        )
    } else {
        params.width
    };

    let shelf_floor_depth = (params.depth
        - t * (cos_a + sin_a.abs())
        - (sin_a * params.front_lip_height).max(0.0))
        / cos_a;

    if shelf_floor_depth <= 0.0 || !shelf_floor_depth.is_finite() {
        return Err(ConfigurationError::DepthTooShallow {
            depth: params.depth,
            shelf_floor_depth,
        });
    }

    if effective_width <= 0.0 {
        return Err(ConfigurationError::InvalidDimensions(format!(
            "width {} leaves no room inside {} mm walls",
            params.width, t
        )));
    }

    let top = if params.slope_top {
        Some(derive_top_geometry(params, sin_a, cos_a)?)
    } else {
        None
    };

    let geometry = DerivedGeometry {
        shelf_floor_depth,
        effective_width,
        top,
    };
    debug!(
        shelf_floor_depth,
        effective_width,
        fallback = geometry.uses_fallback_top_geometry(),
        "Derived display shelf geometry"
    );
    Ok(geometry)
}

fn validate_parameters(params: &ShelfParameters) -> ConfigurationResult<()> {
    if params.shelf_count < 1 {
        return Err(ConfigurationError::ShelfCount(params.shelf_count));
    }

    if params.width <= 0.0 || params.depth <= 0.0 || params.height <= 0.0 {
        return Err(ConfigurationError::InvalidDimensions(format!(
            "width, depth and height must be positive (got {} x {} x {})",
            params.width, params.depth, params.height
        )));
    }

    if params.thickness <= 0.0 {
        return Err(ConfigurationError::InvalidDimensions(format!(
            "material thickness must be positive (got {})",
            params.thickness
        )));
    }

    if params.front_lip_height < 0.0 {
        return Err(ConfigurationError::InvalidDimensions(format!(
            "front lip height must not be negative (got {})",
            params.front_lip_height
        )));
    }

    Ok(())
}

fn derive_top_geometry(
    params: &ShelfParameters,
    sin_a: f64,
    cos_a: f64,
) -> ConfigurationResult<TopGeometry> {
    if sin_a.abs() < TRIG_EPSILON {
        return Err(ConfigurationError::SingularAngle {
            angle: params.angle_degrees,
            context: "sloped top".to_string(),
        });
    }
    if sin_a < 0.0 {
        return Err(ConfigurationError::BackwardSlopeTop(params.angle_degrees));
    }

    // The side panel is as wide as the unit is deep.
    let width = params.depth;
    let height = params.height;
    let lip_height = params.front_lip_height;

    let top_segment_height = height / params.shelf_count as f64;
    let unmodified_segment_height = height - top_segment_height;
    let m = top_segment_height - lip_height;
    let hypotenuse = m / sin_a;
    let top_width = width - (hypotenuse * hypotenuse - m * m).max(0.0).sqrt();

    if hypotenuse >= 0.0 && top_width > 0.0 {
        return Ok(TopGeometry::Standard {
            top_segment_height,
            unmodified_segment_height,
            hypotenuse,
            top_width,
        });
    }

    if hypotenuse < 0.0 {
        warn!(
            lip_height,
            top_segment_height, "Front lip is taller than the top shelf segment"
        );
    }

    let modified_hypotenuse = width / cos_a;
    let rise = (modified_hypotenuse * modified_hypotenuse - width * width)
        .max(0.0)
        .sqrt();
    let modified_height = unmodified_segment_height + lip_height + rise;
    debug!(
        top_width,
        modified_hypotenuse, modified_height, "Using fallback side panel top"
    );

    Ok(TopGeometry::Fallback {
        top_segment_height,
        unmodified_segment_height,
        hypotenuse,
        top_width,
        modified_hypotenuse,
        modified_height,
    })
}

pub struct DisplayShelfMaker {
    params: ShelfParameters,
    geometry: DerivedGeometry,
}

impl DisplayShelfMaker {
    pub fn new(params: ShelfParameters) -> ConfigurationResult<Self> {
        let geometry = derive_geometry(&params)?;
        Ok(Self { params, geometry })
    }

    pub fn geometry(&self) -> &DerivedGeometry {
        &self.geometry
    }

    /// Finger joint runs and cable holes for one side panel, one set per shelf.
    pub fn generate_finger_holes(&self) -> Vec<HolePlacement> {
        let p = &self.params;
        let t = p.thickness;
        let sl = self.geometry.shelf_floor_depth;
        let a = p.angle_degrees.to_radians();
        let count = p.shelf_count as f64;

        let hs = (sl + t) * a.sin() + a.cos() * t;
        let mut holes = HoleCollector::new();

        for i in 0..p.shelf_count {
            let mut pos_x = (0.5 * t * a.sin()).abs();
            let mut pos_y = hs - a.cos() * 0.5 * t + i as f64 * (p.height - hs) / (count - 0.5);
            holes.finger_holes_at(pos_x, pos_y, sl, -p.angle_degrees);

            pos_x += (-a).cos() * (sl + 0.5 * t) + a.sin() * 0.5 * t;
            pos_y += (-a).sin() * (sl + 0.5 * t) + a.cos() * 0.5 * t;
            holes.finger_holes_at(pos_x, pos_y, p.front_lip_height, 90.0 - p.angle_degrees);

            holes.hole_at(
                p.hole_diameter * 1.5,
                pos_y + p.hole_diameter,
                p.hole_diameter / 2.0,
            );
        }

        holes.into_holes()
    }

    /// Outline and edge roles shared by both side panels.
    pub fn side_outline(&self) -> (PanelOutline, Vec<EdgeRole>) {
        use EdgeRole::{FingerReceiving as F, Plain as E};

        let p = &self.params;
        let width = p.depth;
        let angle = p.angle_degrees;

        match self.geometry.top {
            None => {
                let back = if p.include_back { F } else { E };
                (
                    PanelOutline::Rectangle {
                        width,
                        height: p.height,
                    },
                    vec![E, E, E, back],
                )
            }
            Some(TopGeometry::Standard {
                unmodified_segment_height,
                hypotenuse,
                top_width,
                ..
            }) => (
                PanelOutline::Polygon {
                    edges: vec![
                        PolygonEdge::new(width, 90.0),
                        PolygonEdge::new(
                            unmodified_segment_height + p.front_lip_height,
                            90.0 - angle,
                        ),
                        PolygonEdge::new(hypotenuse, angle),
                        PolygonEdge::new(top_width, 90.0),
                        PolygonEdge::new(p.height, 90.0),
                    ],
                },
                vec![E, E, E, E, F],
            ),
            Some(TopGeometry::Fallback {
                unmodified_segment_height,
                modified_hypotenuse,
                modified_height,
                ..
            }) => (
                PanelOutline::Polygon {
                    edges: vec![
                        PolygonEdge::new(width, 90.0),
                        PolygonEdge::new(
                            unmodified_segment_height + p.front_lip_height,
                            90.0 - angle,
                        ),
                        PolygonEdge::new(modified_hypotenuse, 90.0 + angle),
                        PolygonEdge::new(modified_height, 90.0),
                    ],
                },
                vec![E, E, E, F],
            ),
        }
    }

    pub fn side_panel(&self, label: &str) -> Panel {
        let (outline, edge_roles) = self.side_outline();
        Panel {
            label: label.to_string(),
            outline,
            edge_roles,
            holes: self.generate_finger_holes(),
        }
    }

    /// Floor and optional front lip for shelf `index` (zero based).
    pub fn shelf_panels(&self, index: u32) -> Vec<Panel> {
        use EdgeRole::{FingerEmitting as Fe, FingerReceiving as Fr, Plain as E};

        let p = &self.params;
        let width = self.geometry.effective_width;
        let sl = self.geometry.shelf_floor_depth;
        let has_lip = p.front_lip_height > 0.0;

        let mut holes = HoleCollector::new();
        holes.hole_at(width / 2.0, sl - p.hole_diameter, p.hole_diameter / 2.0);

        let front = if has_lip { Fr } else { Fe };
        let mut panels = vec![Panel {
            label: format!("shelf {}", index + 1),
            outline: PanelOutline::Rectangle { width, height: sl },
            edge_roles: vec![front, Fr, E, Fr],
            holes: holes.into_holes(),
        }];

        if has_lip {
            panels.push(Panel {
                label: format!("front lip {}", index + 1),
                outline: PanelOutline::Rectangle {
                    width,
                    height: p.front_lip_height,
                },
                edge_roles: vec![Fe, Fe, E, Fe],
                holes: Vec::new(),
            });
        }

        panels
    }

    pub fn back_panel(&self) -> Option<Panel> {
        use EdgeRole::{FingerEmitting as Fe, Plain as E};

        self.params.include_back.then(|| Panel {
            label: "back wall".to_string(),
            outline: PanelOutline::Rectangle {
                width: self.geometry.effective_width,
                height: self.params.height,
            },
            edge_roles: vec![E, Fe, E, Fe],
            holes: Vec::new(),
        })
    }

    /// All panels in emission order.
    pub fn panels(&self) -> Vec<Panel> {
        let mut panels = vec![self.side_panel("left side"), self.side_panel("right side")];
        for i in 0..self.params.shelf_count {
            panels.extend(self.shelf_panels(i));
        }
        panels.extend(self.back_panel());
        panels
    }

    /// Hand every panel to `sink` in emission order.
    pub fn render<S: PanelSink + ?Sized>(&self, sink: &mut S) {
        let panels = self.panels();
        info!(
            panels = panels.len(),
            shelves = self.params.shelf_count,
            "Rendering display shelf"
        );
        for panel in &panels {
            match panel.outline {
                PanelOutline::Polygon { .. } => sink.emit_polygon(panel),
                PanelOutline::Rectangle { .. } => sink.emit_rectangle(panel),
            }
        }
    }
}
