use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Raw JSON body returned by the reasoning service. Treated as untrusted
/// until the normalizer has turned it into a [`Plan`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPlanResponse(pub serde_json::Value);

/// One node of the organization structure: either a directory with named
/// children, or a terminal list of source file paths assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanNode {
    Files(Vec<String>),
    Directory(IndexMap<String, PlanNode>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnzipEntry {
    pub source: String,
    pub destination: String,
}

/// Canonical organization plan. `structure` stays `None` when the service
/// response lacked one; execution surfaces that as an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<PlanNode>,
    #[serde(default, alias = "cleanup", skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unzip: Vec<UnzipEntry>,
}

impl Plan {
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write plan to {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Plan> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan from {}", path.display()))?;
        let plan = serde_json::from_str(&content)
            .with_context(|| format!("Plan file {} is not valid JSON", path.display()))?;
        Ok(plan)
    }
}

/// Observable outcome of executing a plan: directories that were created and
/// files whose placement was recorded without being performed.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementRecord {
    DirCreated(PathBuf),
    FilePlanned { source: String, directory: PathBuf },
}
