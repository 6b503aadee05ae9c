//! Command implementations.  Each returns the text to print so the binary
//! stays a thin dispatcher.

use std::fmt::Write as _;
use std::path::PathBuf;

use colored::Colorize;
use sr_grasp::{Grasp, GraspStash, Posture, StashError};

/// Open and load the stash at `file`, or at the configured default path.
pub fn open_stash(file: Option<PathBuf>) -> Result<GraspStash, StashError> {
    let mut stash = match file {
        Some(path) => GraspStash::new(path),
        None => GraspStash::with_default_path()?,
    };
    stash.load()?;
    Ok(stash)
}

pub fn list(stash: &GraspStash) -> String {
    let mut out = String::new();
    if stash.is_empty() {
        let _ = writeln!(out, "  {}", "No grasps stashed.".dimmed());
        return out;
    }
    let _ = writeln!(
        out,
        "  {:<24} {:>8} {:>7}",
        "ID".bold(),
        "QUALITY".bold(),
        "JOINTS".bold()
    );
    for grasp in stash.iter() {
        let _ = writeln!(
            out,
            "  {:<24} {:>8.3} {:>7}",
            grasp.id,
            grasp.quality,
            grasp.grasp_trajectory.joint_names.len()
        );
    }
    out
}

pub fn show(stash: &GraspStash, id: &str) -> Result<String, StashError> {
    let grasp = stash.get(id)?;
    let mut out = String::new();
    let _ = writeln!(out, "  {} {}", "Grasp".bold(), grasp.id.bold().cyan());
    let _ = writeln!(out, "  quality:           {:.3}", grasp.quality);
    let _ = writeln!(out, "  max contact force: {:.2}", grasp.max_contact_force);
    if !grasp.allowed_touch_objects.is_empty() {
        let _ = writeln!(
            out,
            "  may touch:         {}",
            grasp.allowed_touch_objects.join(", ")
        );
    }
    write_point(&mut out, "pre-grasp", grasp, Posture::PreGrasp);
    write_point(&mut out, "grasp", grasp, Posture::Grasp);
    Ok(out)
}

fn write_point(out: &mut String, label: &str, grasp: &Grasp, posture: Posture) {
    let point = grasp.trajectory_point(posture, 0);
    let _ = writeln!(out, "  {} (point 0, degrees):", label.bold());
    if point.is_empty() {
        let _ = writeln!(out, "    {}", "<unset>".dimmed());
    }
    for (joint, rad) in point {
        let _ = writeln!(out, "    {:<6} {:>9.3}", joint, rad.to_degrees());
    }
}

pub fn export(stash: &GraspStash) -> Result<String, StashError> {
    serde_json::to_string_pretty(&stash.to_grasp_array())
        .map_err(|e| StashError::Serialization(e.to_string()))
}

pub fn schema() -> Result<String, StashError> {
    let schema = schemars::schema_for!(Grasp);
    serde_json::to_string_pretty(&schema).map_err(|e| StashError::Serialization(e.to_string()))
}

pub fn help() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {} [--file PATH] <command>", "sr-grasp".bold());
    let _ = writeln!(out);
    for (cmd, desc) in [
        ("list", "list every grasp with its quality and joint count"),
        ("show <id>", "show one grasp's postures in degrees"),
        ("validate", "load the grasp file and report the result"),
        ("export", "print the stash as a GraspArray in JSON"),
        ("schema", "print the JSON schema of one grasp entry"),
        ("help", "show this list"),
    ] {
        let _ = writeln!(out, "  {:<12} – {}", cmd.cyan(), desc);
    }
    out
}
