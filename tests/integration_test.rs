use std::fs;
use std::path::Path;
use tempfile::TempDir;

use folder_organiser::{
    errors::OrganizerError,
    executor::PlanExecutor,
    models::{PlacementRecord, Plan, RawPlanResponse},
    normalizer::PlanNormalizer,
    requester::PlanRequester,
};

/// Stands in for the reasoning service so the pipeline can run offline.
struct CannedRequester {
    text: String,
}

impl PlanRequester for CannedRequester {
    async fn request_plan(
        &self,
        source: &Path,
        _destination: &Path,
        _goal: &str,
    ) -> Result<RawPlanResponse, OrganizerError> {
        if !source.is_dir() {
            return Err(OrganizerError::InvalidInput(format!(
                "source path is not an existing directory: {}",
                source.display()
            )));
        }

        Ok(RawPlanResponse(serde_json::json!({
            "output": [
                { "content": [ { "type": "output_text", "text": self.text } ] }
            ]
        })))
    }
}

fn seed_source_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("main file.rs"), "fn main() {}").unwrap();
    fs::create_dir_all(dir.path().join("notes")).unwrap();
    fs::write(dir.path().join("notes/todo list.txt"), "todo").unwrap();
    dir
}

#[tokio::test]
async fn full_pipeline_from_messy_response_to_directories() {
    let source = seed_source_dir();
    let dest = TempDir::new().unwrap();

    // Literal \n padding and backslash separators, as a model might emit.
    let requester = CannedRequester {
        text: "\\n{\"structure\": {\"Projects\": {\"demo app\": [\"src\\\\main file.rs\"]}, \
               \"Notes\": [\"notes/todo list.txt\"]}, \"ignore\": [\"tmp/scratch 1.txt\"]}\\n"
            .to_string(),
    };

    let raw = requester
        .request_plan(source.path(), dest.path(), "sort my projects")
        .await
        .unwrap();

    let plan = PlanNormalizer::new(false, false).normalize(&raw).unwrap();

    // Persist and reload: the plan file round-trips exactly.
    let plan_file = dest.path().join("plan.json");
    plan.save(&plan_file).unwrap();
    let reloaded = Plan::load(&plan_file).unwrap();
    assert_eq!(plan, reloaded);

    let log = PlanExecutor::new(false)
        .execute(&reloaded, dest.path())
        .unwrap();

    assert!(dest.path().join("Projects/demo app").is_dir());
    assert!(dest.path().join("Notes").is_dir());

    // Separators normalized and leaf file names space-stripped by the
    // normalizer; the ignore entry kept its space and created nothing.
    assert!(log.contains(&PlacementRecord::FilePlanned {
        source: "src/mainfile.rs".to_string(),
        directory: dest.path().join("Projects/demo app"),
    }));
    assert!(log.contains(&PlacementRecord::FilePlanned {
        source: "notes/todolist.txt".to_string(),
        directory: dest.path().join("Notes"),
    }));
    assert_eq!(reloaded.ignore, vec!["tmp/scratch 1.txt".to_string()]);
    assert!(!dest.path().join("tmp").exists());
}

#[tokio::test]
async fn a_missing_source_directory_is_rejected() {
    let requester = CannedRequester {
        text: "{}".to_string(),
    };

    let err = requester
        .request_plan(Path::new("/no/such/dir"), Path::new("/dest"), "organize")
        .await
        .unwrap_err();

    assert!(matches!(err, OrganizerError::InvalidInput(_)));
}

#[tokio::test]
async fn a_plan_without_structure_aborts_before_execution() {
    let source = seed_source_dir();
    let dest = TempDir::new().unwrap();

    let requester = CannedRequester {
        text: "{\"cleanup\": [\"junk.tmp\"]}".to_string(),
    };

    let raw = requester
        .request_plan(source.path(), dest.path(), "organize")
        .await
        .unwrap();
    let plan = PlanNormalizer::new(false, false).normalize(&raw).unwrap();
    assert!(plan.structure.is_none());

    let err = PlanExecutor::new(false)
        .execute(&plan, dest.path())
        .unwrap_err();

    assert!(matches!(err, OrganizerError::MissingStructure));
    assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 0);
}
