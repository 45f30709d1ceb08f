//! CLI interface for script validation

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::progress::{print_failure, print_success};
use crate::converter::{ConvertOptions, check_script};
use crate::formats::Violation;

/// Check result of one script
#[derive(Debug, Serialize)]
struct CheckReport {
    path: PathBuf,
    /// Set when the script could not be parsed at all
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    violations: Vec<Violation>,
}

impl CheckReport {
    fn is_clean(&self) -> bool {
        self.error.is_none() && self.violations.is_empty()
    }
}

pub fn execute(paths: &[PathBuf], json: bool, section_ext: &str) -> anyhow::Result<()> {
    let options = ConvertOptions::new().with_section_extension(section_ext);

    let reports: Vec<CheckReport> = paths
        .iter()
        .map(|path| match check_script(path, &options) {
            Ok(violations) => CheckReport {
                path: path.clone(),
                error: None,
                violations,
            },
            Err(e) => CheckReport {
                path: path.clone(),
                error: Some(e.to_string()),
                violations: Vec::new(),
            },
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            let name = report.path.display();
            if let Some(ref error) = report.error {
                print_failure(&format!("{name}: {error}"));
            } else if report.violations.is_empty() {
                print_success(&format!("{name}: consistent"));
            } else {
                print_failure(&format!("{name}: {} violations", report.violations.len()));
                for violation in &report.violations {
                    println!("  {violation}");
                }
            }
        }
    }

    let failed = reports.iter().filter(|report| !report.is_clean()).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} scripts failed the check", reports.len());
    }
    Ok(())
}
