//! Driving the external packing-angle measurement tool.
//!
//! The tool is invoked once per structure file as
//! `<tool> -p <code> -q <path>` and prints `<code>: <angle>` on stdout. A
//! missing binary is fatal; a nonzero exit for one structure skips that
//! structure and moves on.

use crate::pdb::scan_structure_dir;
use abpack_core::AngleRecord;
use anyhow::{anyhow, Context};
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

pub const DEFAULT_ANGLE_TOOL: &str = "abpackingangle";

/// Counts for one measurement pass over a directory.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct AngleReport {
    pub files: usize,
    pub measured: usize,
    /// Structures the tool refused or produced unparseable output for.
    pub failed: usize,
}

/// Runs the angle tool over every structure file in `dir`.
pub fn compile_angles(dir: &Path, tool: &str) -> anyhow::Result<(Vec<AngleRecord>, AngleReport)> {
    let files = scan_structure_dir(dir)?;
    let mut report = AngleReport {
        files: files.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(files.len());

    for (code, path) in &files {
        let output = match Command::new(tool)
            .arg("-p")
            .arg(code)
            .arg("-q")
            .arg(path)
            .output()
        {
            Ok(output) => output,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(anyhow!("angle tool '{tool}' not found on PATH"));
            }
            Err(err) => {
                return Err(err).with_context(|| format!("running angle tool '{tool}'"));
            }
        };
        if !output.status.success() {
            warn!(code = code.as_str(), status = %output.status, "angle tool failed, skipping");
            report.failed += 1;
            continue;
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let Some(angle) = parse_angle_output(&stdout) else {
            warn!(code = code.as_str(), "unparseable angle tool output, skipping");
            report.failed += 1;
            continue;
        };
        debug!(code = code.as_str(), angle, "measured");
        records.push(AngleRecord {
            code: code.clone(),
            angle,
        });
        report.measured += 1;
    }
    Ok((records, report))
}

/// The tool prints `<code>: <angle>`; the second whitespace token is the
/// angle whether or not the colon is present.
pub fn parse_angle_output(stdout: &str) -> Option<f64> {
    stdout.split_whitespace().nth(1)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tool_output() {
        assert_eq!(parse_angle_output("1mlb: -44.5\n"), Some(-44.5));
        assert_eq!(parse_angle_output("1mlb -44.5\n"), Some(-44.5));
        assert_eq!(parse_angle_output("  1mlb:   -44.5  trailing\n"), Some(-44.5));
        assert_eq!(parse_angle_output("1mlb\n"), None);
        assert_eq!(parse_angle_output("1mlb: not-a-number\n"), None);
        assert_eq!(parse_angle_output(""), None);
    }

    #[test]
    fn missing_tool_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1mlb.pdb"), "END\n").unwrap();

        let err = compile_angles(dir.path(), "no-such-angle-tool").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[cfg(unix)]
    #[test]
    fn runs_a_stub_tool_per_structure() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1mlb.pdb"), "END\n").unwrap();
        std::fs::write(dir.path().join("2fb4.pdb"), "END\n").unwrap();
        std::fs::write(dir.path().join("bad1.pdb"), "END\n").unwrap();

        // echoes "<code>: -44.5", refuses the structure named bad1
        let tool = dir.path().join("stub-angle-tool");
        std::fs::write(
            &tool,
            "#!/bin/sh\nif [ \"$2\" = bad1 ]; then exit 1; fi\necho \"$2: -44.5\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        let (records, report) = compile_angles(dir.path(), tool.to_str().unwrap()).unwrap();
        assert_eq!(report.files, 3);
        assert_eq!(report.measured, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(records[0].code, "1mlb");
        assert_eq!(records[0].angle, -44.5);
        assert_eq!(records[1].code, "2fb4");
    }
}
