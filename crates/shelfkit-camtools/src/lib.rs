//! # ShelfKit CAM Tools
//!
//! This crate computes the panels of a laser-cut display shelf with slanted
//! floors and turns them into cut paths and G-Code.
//!
//! ## Modules
//!
//! - **Display Shelf**: Parameter derivation, side panel, shelf and lip layout
//! - **Finger Joint**: Finger edge patterns and finger slot rows
//! - **Panel Cutter**: Panel sink producing closed cut paths, sheet layout and G-Code

pub mod display_shelf;
pub mod error;
pub mod finger_joint;
pub mod panel_cutter;

// Re-export commonly used items
pub use display_shelf::{
    adjust_for_outside, derive_geometry, DerivedGeometry, DisplayShelfMaker, EdgeRole,
    HolePlacement, Panel, PanelOutline, PanelSink, PolygonEdge, ShelfParameters, TopGeometry,
};
pub use error::{CamToolError, CamToolResult, ConfigurationError, ConfigurationResult};
pub use finger_joint::{FingerJoint, FingerJointSettings};
pub use panel_cutter::{CutPanel, CutterSettings, PanelCutter};
