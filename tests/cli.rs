use clap::Parser;
use shelfkit::cli::{generate, run, Cli, OutputFormat};
use tempfile::TempDir;

#[test]
fn test_overrides_apply_to_defaults() {
    let cli = Cli::parse_from([
        "shelfkit",
        "--shelves",
        "3",
        "--height",
        "400",
        "--angle",
        "-15",
        "--flat-top",
        "--back",
    ]);
    let project = cli.project().unwrap();
    assert_eq!(project.shelf.shelf_count, 3);
    assert_eq!(project.shelf.height, 400.0);
    assert_eq!(project.shelf.angle_degrees, -15.0);
    assert!(!project.shelf.slope_top);
    assert!(project.shelf.include_back);
    assert_eq!(project.shelf.width, 140.0);
}

#[test]
fn test_switches_can_turn_project_options_off() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shelf.toml");
    std::fs::write(
        &path,
        "[shelf]\ninclude_back = true\noutside_dimensions = true\nslope_top = false\n",
    )
    .unwrap();
    let path = path.display().to_string();

    let cli = Cli::parse_from(["shelfkit", path.as_str()]);
    let project = cli.project().unwrap();
    assert!(project.shelf.include_back);
    assert!(project.shelf.outside_dimensions);
    assert!(!project.shelf.slope_top);

    let cli = Cli::parse_from([
        "shelfkit",
        "--back=false",
        "--outside=false",
        "--flat-top=false",
        path.as_str(),
    ]);
    let project = cli.project().unwrap();
    assert!(!project.shelf.include_back);
    assert!(!project.shelf.outside_dimensions);
    assert!(project.shelf.slope_top);
}

#[test]
fn test_invalid_override_is_reported() {
    let cli = Cli::parse_from(["shelfkit", "--shelves", "0"]);
    assert!(cli.project().is_err());
}

#[test]
fn test_summary_output() {
    let cli = Cli::parse_from(["shelfkit", "--shelves", "2", "--height", "300"]);
    let project = cli.project().unwrap();
    let summary = generate(&project, OutputFormat::Summary).unwrap();
    assert!(summary.contains("Shelf floor depth:"));
    assert!(summary.contains("Side panel top: sloped"));
    assert!(summary.contains("left side"));
    assert!(summary.contains("front lip 2"));
}

#[test]
fn test_run_writes_output_and_project() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("shelf.gcode");
    let saved = dir.path().join("shelf.toml");

    let cli = Cli::parse_from([
        "shelfkit".to_string(),
        "--output".to_string(),
        output.display().to_string(),
        "--save-project".to_string(),
        saved.display().to_string(),
        "--holes".to_string(),
        "6".to_string(),
    ]);
    run(&cli).unwrap();

    let gcode = std::fs::read_to_string(&output).unwrap();
    assert!(gcode.starts_with("; Display Shelf G-code"));
    assert!(gcode.contains("; Hole diameter: 6 mm"));

    let reloaded = Cli::parse_from(["shelfkit".to_string(), saved.display().to_string()]);
    let project = reloaded.project().unwrap();
    assert_eq!(project.shelf.hole_diameter, 6.0);
}
