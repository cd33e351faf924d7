use colored::*;
use indexmap::IndexMap;
use std::fs;
use std::path::Path;

use crate::errors::OrganizerError;
use crate::models::{Plan, PlacementRecord, PlanNode};

/// Materializes the `structure` part of a plan as directories under a
/// destination root. File placements are recorded, never performed, and the
/// `ignore` / `unzip` lists are left to whatever component eventually moves
/// files for real.
pub struct PlanExecutor {
    verbose: bool,
}

impl PlanExecutor {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn execute(
        &self,
        plan: &Plan,
        dest_root: &Path,
    ) -> Result<Vec<PlacementRecord>, OrganizerError> {
        let structure = plan
            .structure
            .as_ref()
            .ok_or(OrganizerError::MissingStructure)?;

        let mut log = Vec::new();
        match structure {
            PlanNode::Directory(children) => self.walk(dest_root, children, &mut log)?,
            // A bare leaf list at the top level places files directly under
            // the destination root.
            PlanNode::Files(files) => self.record_placements(dest_root, files, &mut log),
        }

        Ok(log)
    }

    fn walk(
        &self,
        current_dir: &Path,
        children: &IndexMap<String, PlanNode>,
        log: &mut Vec<PlacementRecord>,
    ) -> Result<(), OrganizerError> {
        for (name, node) in children {
            let child_path = current_dir.join(name);
            fs::create_dir_all(&child_path)?;
            if self.verbose {
                println!(
                    "  {} Created directory: {}",
                    "✓".green(),
                    child_path.display()
                );
            }
            log.push(PlacementRecord::DirCreated(child_path.clone()));

            match node {
                PlanNode::Directory(grandchildren) => {
                    self.walk(&child_path, grandchildren, log)?;
                }
                PlanNode::Files(files) => {
                    self.record_placements(&child_path, files, log);
                }
            }
        }

        Ok(())
    }

    fn record_placements(&self, directory: &Path, files: &[String], log: &mut Vec<PlacementRecord>) {
        for file in files {
            if self.verbose {
                println!(
                    "  {} Will place: {} → {}",
                    "➡".blue(),
                    file.yellow(),
                    directory.display()
                );
            }
            log.push(PlacementRecord::FilePlanned {
                source: file.clone(),
                directory: directory.to_path_buf(),
            });
        }
    }
}

#[cfg(test)]
mod tests;
