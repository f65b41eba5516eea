//! Command line interface
//!
//! Loads a project file (or the defaults), applies command line overrides and
//! writes either G-code or a cut list.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use shelfkit_camtools::{DisplayShelfMaker, PanelCutter, TopGeometry};
use shelfkit_settings::ShelfProject;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Laser G-code program
    Gcode,
    /// Plain-text cut list
    Summary,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project file (JSON or TOML)
    #[arg(value_name = "PROJECT")]
    pub project: Option<PathBuf>,

    /// Output file, stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Gcode)]
    pub format: OutputFormat,

    /// Width of the shelf unit in mm
    #[arg(long)]
    pub width: Option<f64>,

    /// Depth of the shelf unit in mm
    #[arg(long)]
    pub depth: Option<f64>,

    /// Height of the shelf unit in mm
    #[arg(long)]
    pub height: Option<f64>,

    /// Material thickness in mm
    #[arg(long)]
    pub thickness: Option<f64>,

    /// Angle of the shelf floors in degrees (negative slants backwards)
    #[arg(long, allow_negative_numbers = true)]
    pub angle: Option<f64>,

    /// Number of shelves
    #[arg(long)]
    pub shelves: Option<u32>,

    /// Height of the front lips in mm, 0 disables them
    #[arg(long)]
    pub lip: Option<f64>,

    /// Diameter of cable holes in mm, 0 disables them
    #[arg(long)]
    pub holes: Option<f64>,

    /// Include a back panel
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub back: Option<bool>,

    /// Keep the side panels full height instead of sloping the top
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub flat_top: Option<bool>,

    /// Treat the width as an outside measurement
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub outside: Option<bool>,

    /// Write the effective project to this file
    #[arg(long, value_name = "FILE")]
    pub save_project: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Project file to start from: the argument, else the default project if present.
    pub fn project_path(&self) -> Option<PathBuf> {
        resolve_project_path(self.project.as_deref(), ShelfProject::default_path().ok())
    }

    /// The project file contents with command line overrides applied.
    pub fn project(&self) -> Result<ShelfProject> {
        let mut project = match self.project_path() {
            Some(path) => {
                debug!("Loading project from {:?}", path);
                ShelfProject::load_from_file(&path)
                    .with_context(|| format!("Failed to load project: {:?}", path))?
            }
            None => ShelfProject::new(),
        };

        let shelf = &mut project.shelf;
        if let Some(width) = self.width {
            shelf.width = width;
        }
        if let Some(depth) = self.depth {
            shelf.depth = depth;
        }
        if let Some(height) = self.height {
            shelf.height = height;
        }
        if let Some(thickness) = self.thickness {
            shelf.thickness = thickness;
        }
        if let Some(angle) = self.angle {
            shelf.angle_degrees = angle;
        }
        if let Some(shelves) = self.shelves {
            shelf.shelf_count = shelves;
        }
        if let Some(lip) = self.lip {
            shelf.front_lip_height = lip;
        }
        if let Some(holes) = self.holes {
            shelf.hole_diameter = holes;
        }
        if let Some(back) = self.back {
            shelf.include_back = back;
        }
        if let Some(outside) = self.outside {
            shelf.outside_dimensions = outside;
        }
        if let Some(flat_top) = self.flat_top {
            shelf.slope_top = !flat_top;
        }

        project.validate().context("Invalid shelf project")?;
        Ok(project)
    }
}

fn resolve_project_path(explicit: Option<&Path>, default: Option<PathBuf>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default.filter(|path| path.is_file()),
    }
}

/// Render the project in the requested format.
pub fn generate(project: &ShelfProject, format: OutputFormat) -> Result<String> {
    let maker =
        DisplayShelfMaker::new(project.shelf.clone()).context("Invalid shelf parameters")?;
    let mut cutter = PanelCutter::new(
        project.shelf.thickness,
        project.finger_joint.clone(),
        project.cutter.clone(),
    )
    .context("Invalid cutter settings")?;
    maker.render(&mut cutter);

    let output = match format {
        OutputFormat::Gcode => cutter.to_gcode(&project.shelf)?,
        OutputFormat::Summary => {
            let geometry = maker.geometry();
            let top = match geometry.top {
                None => "flat",
                Some(TopGeometry::Standard { .. }) => "sloped",
                Some(TopGeometry::Fallback { .. }) => "sloped (full width slant)",
            };
            let mut out = String::new();
            writeln!(out, "Shelf floor depth: {:.2} mm", geometry.shelf_floor_depth)?;
            writeln!(out, "Inside width: {:.2} mm", geometry.effective_width)?;
            writeln!(out, "Side panel top: {}", top)?;
            writeln!(out)?;
            out.push_str(&cutter.summary());
            out
        }
    };
    Ok(output)
}

pub fn run(cli: &Cli) -> Result<()> {
    let project = cli.project()?;

    if let Some(path) = &cli.save_project {
        project
            .save_to_file(path)
            .with_context(|| format!("Failed to save project: {:?}", path))?;
        info!("Saved project to {:?}", path);
    }

    let output = generate(&project, cli.format)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            info!("Wrote {} bytes to {:?}", output.len(), path);
        }
        None => print!("{}", output),
    }
    Ok(())
}
