use crate::{Error, Result};
use aecscan_scanner::PROJECT_SIDECAR;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Standard project directory template: top-level folder and its
/// subfolders. Mirrors the phase-oriented layout the naming convention
/// assumes.
pub const STANDARD_STRUCTURE: &[(&str, &[&str])] = &[
    (
        "00_Project_Management",
        &["Contracts", "Schedules", "Budgets", "Meeting_Minutes"],
    ),
    ("01_Pre_Design", &["Programming", "Site_Analysis"]),
    ("02_Schematic_Design", &["Drawings", "Calculations", "Reports"]),
    ("03_Design_Development", &["Drawings", "Calculations", "Specifications"]),
    (
        "04_Construction_Documents",
        &[
            "Architectural",
            "Structural",
            "Civil",
            "Mechanical",
            "Electrical",
            "Plumbing",
        ],
    ),
    (
        "05_Construction_Administration",
        &["RFIs", "Submittals", "Change_Orders", "Field_Reports"],
    ),
    ("06_Closeout", &["As_Builts", "OM_Manuals", "Warranties"]),
    ("Resources", &["Standards", "Templates", "References"]),
];

/// Version written into sidecars; bump when STANDARD_STRUCTURE changes.
pub const STRUCTURE_VERSION: u32 = 1;

/// `.aecscan-project.json` contents, written at the project root by
/// `init` and read back by later scans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSidecar {
    pub project_number: String,
    pub project_name: Option<String>,
    pub structure_version: u32,
    pub created_at: String,
}

/// Missing template directories found by [`validate_structure`].
#[derive(Debug, Clone, Serialize)]
pub struct StructureReport {
    pub missing: Vec<String>,
    pub conforms: bool,
}

/// Create the standard directory tree and sidecar under `root`.
/// Existing directories are left alone; an existing sidecar for a
/// different project is an error.
pub fn init_project(
    root: &Path,
    project_number: &str,
    project_name: Option<&str>,
) -> Result<ProjectSidecar> {
    if let Some(existing) = load_sidecar(root)? {
        if existing.project_number != project_number {
            return Err(Error::InvalidOperation(format!(
                "{} already initialized as project {}",
                root.display(),
                existing.project_number
            )));
        }
    }

    for (top, children) in STANDARD_STRUCTURE {
        for child in *children {
            std::fs::create_dir_all(root.join(top).join(child))?;
        }
    }

    let sidecar = ProjectSidecar {
        project_number: project_number.to_owned(),
        project_name: project_name.map(str::to_owned),
        structure_version: STRUCTURE_VERSION,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    let json = serde_json::to_string_pretty(&sidecar)
        .map_err(|err| Error::InvalidOperation(err.to_string()))?;
    std::fs::write(root.join(PROJECT_SIDECAR), json)?;
    Ok(sidecar)
}

pub fn load_sidecar(root: &Path) -> Result<Option<ProjectSidecar>> {
    let path = root.join(PROJECT_SIDECAR);
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)?;
    let sidecar = serde_json::from_str(&content).map_err(|err| {
        Error::InvalidOperation(format!("unreadable sidecar {}: {}", path.display(), err))
    })?;
    Ok(Some(sidecar))
}

/// Compare `root` against the standard template.
pub fn validate_structure(root: &Path) -> Result<StructureReport> {
    let mut missing = Vec::new();
    for (top, children) in STANDARD_STRUCTURE {
        if !root.join(top).is_dir() {
            missing.push((*top).to_owned());
            continue;
        }
        for child in *children {
            let rel = format!("{top}/{child}");
            if !root.join(top).join(child).is_dir() {
                missing.push(rel);
            }
        }
    }
    Ok(StructureReport {
        conforms: missing.is_empty(),
        missing,
    })
}
