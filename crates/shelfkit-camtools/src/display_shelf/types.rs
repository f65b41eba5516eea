//! Type definitions for the Display Shelf Maker

use serde::{Deserialize, Serialize};

/// Role of a panel edge in the finger joint pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeRole {
    /// Straight cut, mates with nothing.
    Plain,
    /// Carries the notches of a finger joint.
    FingerReceiving,
    /// Carries the protruding fingers of a finger joint.
    FingerEmitting,
}

impl EdgeRole {
    /// Single character code used in edge strings (`e`, `F`, `f`).
    pub fn code(self) -> char {
        match self {
            EdgeRole::Plain => 'e',
            EdgeRole::FingerReceiving => 'F',
            EdgeRole::FingerEmitting => 'f',
        }
    }

    pub fn is_finger(self) -> bool {
        self != EdgeRole::Plain
    }
}

impl TryFrom<char> for EdgeRole {
    type Error = char;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'e' => Ok(EdgeRole::Plain),
            'F' => Ok(EdgeRole::FingerReceiving),
            'f' => Ok(EdgeRole::FingerEmitting),
            other => Err(other),
        }
    }
}

/// Parse an edge string such as `"eeeF"` into roles.
///
/// Unknown characters are reported back as the error value.
pub fn parse_edge_roles(edges: &str) -> Result<Vec<EdgeRole>, char> {
    edges.chars().map(EdgeRole::try_from).collect()
}

pub fn edge_string(roles: &[EdgeRole]) -> String {
    roles.iter().map(|r| r.code()).collect()
}

/// Input parameters for a slanted display shelf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfParameters {
    /// Width of the shelf unit (x)
    pub width: f64,
    /// Depth of the shelf unit (y), also the width of the side panels
    pub depth: f64,
    /// Height of the shelf unit (h)
    pub height: f64,
    /// Material thickness
    pub thickness: f64,
    /// Angle of the shelf floors in degrees, negative values slant backwards
    pub angle_degrees: f64,
    /// Number of shelves
    pub shelf_count: u32,
    /// Height of the front lip on each shelf, 0 disables lips
    pub front_lip_height: f64,
    /// Add a panel on the back of the unit
    pub include_back: bool,
    /// Slope the top of the side panels down to the topmost lip
    pub slope_top: bool,
    /// Diameter of the cable pass-through holes, 0 disables holes
    pub hole_diameter: f64,
    /// Treat width as an outside measurement
    pub outside_dimensions: bool,
}

impl Default for ShelfParameters {
    fn default() -> Self {
        Self {
            width: 140.0,
            depth: 215.0,
            height: 215.0,
            thickness: 3.0,
            angle_degrees: 45.0,
            shelf_count: 1,
            front_lip_height: 50.0,
            include_back: false,
            slope_top: true,
            hole_diameter: 0.0,
            outside_dimensions: false,
        }
    }
}

/// Shape of the top of the side panels in slope-top mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TopGeometry {
    /// Slanted edge from the top lip up to a short flat top edge.
    Standard {
        top_segment_height: f64,
        unmodified_segment_height: f64,
        hypotenuse: f64,
        top_width: f64,
    },
    /// Slanted edge running the whole panel width, no flat top edge.
    Fallback {
        top_segment_height: f64,
        unmodified_segment_height: f64,
        /// Hypotenuse of the standard construction that was rejected
        hypotenuse: f64,
        /// Top width of the standard construction that was rejected
        top_width: f64,
        modified_hypotenuse: f64,
        modified_height: f64,
    },
}

impl TopGeometry {
    pub fn top_segment_height(&self) -> f64 {
        match *self {
            TopGeometry::Standard {
                top_segment_height, ..
            }
            | TopGeometry::Fallback {
                top_segment_height, ..
            } => top_segment_height,
        }
    }

    pub fn unmodified_segment_height(&self) -> f64 {
        match *self {
            TopGeometry::Standard {
                unmodified_segment_height,
                ..
            }
            | TopGeometry::Fallback {
                unmodified_segment_height,
                ..
            } => unmodified_segment_height,
        }
    }

    pub fn hypotenuse(&self) -> f64 {
        match *self {
            TopGeometry::Standard { hypotenuse, .. } | TopGeometry::Fallback { hypotenuse, .. } => {
                hypotenuse
            }
        }
    }

    pub fn top_width(&self) -> f64 {
        match *self {
            TopGeometry::Standard { top_width, .. } | TopGeometry::Fallback { top_width, .. } => {
                top_width
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, TopGeometry::Fallback { .. })
    }
}

/// Secondary quantities shared by every panel generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedGeometry {
    /// Depth of each slanted shelf floor (`sl`)
    pub shelf_floor_depth: f64,
    /// Width after outside-dimension compensation
    pub effective_width: f64,
    /// Present only when the top of the sides is sloped
    pub top: Option<TopGeometry>,
}

impl DerivedGeometry {
    pub fn top_segment_height(&self) -> Option<f64> {
        self.top.map(|t| t.top_segment_height())
    }

    pub fn unmodified_segment_height(&self) -> Option<f64> {
        self.top.map(|t| t.unmodified_segment_height())
    }

    pub fn hypotenuse(&self) -> Option<f64> {
        self.top.map(|t| t.hypotenuse())
    }

    pub fn top_width(&self) -> Option<f64> {
        self.top.map(|t| t.top_width())
    }

    pub fn uses_fallback_top_geometry(&self) -> bool {
        self.top.is_some_and(|t| t.is_fallback())
    }
}

/// One edge of a polygon outline: draw `length`, then turn left by `turn_degrees`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonEdge {
    pub length: f64,
    pub turn_degrees: f64,
}

impl PolygonEdge {
    pub fn new(length: f64, turn_degrees: f64) -> Self {
        Self {
            length,
            turn_degrees,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelOutline {
    /// Turtle outline starting at the origin heading along +x.
    Polygon { edges: Vec<PolygonEdge> },
    /// Axis aligned rectangle; edges run bottom, right, top, left.
    Rectangle { width: f64, height: f64 },
}

impl PanelOutline {
    pub fn edge_count(&self) -> usize {
        match self {
            PanelOutline::Polygon { edges } => edges.len(),
            PanelOutline::Rectangle { .. } => 4,
        }
    }

    /// The outline expressed as `(length, turn)` pairs.
    pub fn edges(&self) -> Vec<PolygonEdge> {
        match self {
            PanelOutline::Polygon { edges } => edges.clone(),
            PanelOutline::Rectangle { width, height } => vec![
                PolygonEdge::new(*width, 90.0),
                PolygonEdge::new(*height, 90.0),
                PolygonEdge::new(*width, 90.0),
                PolygonEdge::new(*height, 90.0),
            ],
        }
    }

    /// Corner points visited by walking the outline, starting at the origin.
    ///
    /// The returned list has one more point than there are edges; for a closed
    /// outline the last point coincides with the first.
    pub fn vertices(&self) -> Vec<(f64, f64)> {
        let mut points = vec![(0.0, 0.0)];
        let (mut x, mut y, mut heading) = (0.0_f64, 0.0_f64, 0.0_f64);
        for edge in self.edges() {
            let rad = heading.to_radians();
            x += edge.length * rad.cos();
            y += edge.length * rad.sin();
            points.push((x, y));
            heading += edge.turn_degrees;
        }
        points
    }

    /// Distance between the start point and the end of the last edge.
    pub fn closure_gap(&self) -> f64 {
        let points = self.vertices();
        match points.last() {
            Some(&(x, y)) => x.hypot(y),
            None => 0.0,
        }
    }
}

/// A joint or hole cut inside a panel, in panel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HolePlacement {
    /// Row of finger slots starting at `(x, y)` running `length` along `angle_degrees`.
    FingerJointRun {
        x: f64,
        y: f64,
        length: f64,
        angle_degrees: f64,
    },
    CircularHole { x: f64, y: f64, radius: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub label: String,
    pub outline: PanelOutline,
    pub edge_roles: Vec<EdgeRole>,
    pub holes: Vec<HolePlacement>,
}

impl Panel {
    pub fn edge_string(&self) -> String {
        edge_string(&self.edge_roles)
    }
}

/// Collects hole placements for a panel, dropping holes that are disabled.
#[derive(Debug, Default)]
pub struct HoleCollector {
    holes: Vec<HolePlacement>,
}

impl HoleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finger_holes_at(&mut self, x: f64, y: f64, length: f64, angle_degrees: f64) {
        if length <= 0.0 {
            return;
        }
        self.holes.push(HolePlacement::FingerJointRun {
            x,
            y,
            length,
            angle_degrees,
        });
    }

    pub fn hole_at(&mut self, x: f64, y: f64, radius: f64) {
        if radius <= 0.0 {
            return;
        }
        self.holes.push(HolePlacement::CircularHole { x, y, radius });
    }

    pub fn into_holes(self) -> Vec<HolePlacement> {
        self.holes
    }
}
