use super::*;
use std::fs;
use tempfile::TempDir;

fn plan_from_json(value: serde_json::Value) -> Plan {
    serde_json::from_value(value).unwrap()
}

#[test]
fn creates_the_directory_tree_and_logs_placements() {
    let dest = TempDir::new().unwrap();
    let plan = plan_from_json(serde_json::json!({
        "structure": {
            "Photos": ["img 1.png"],
            "Docs": { "Resume": ["cv final.pdf"] }
        }
    }));

    let log = PlanExecutor::new(false).execute(&plan, dest.path()).unwrap();

    assert!(dest.path().join("Photos").is_dir());
    assert!(dest.path().join("Docs/Resume").is_dir());

    // Leaf names are source file paths and reach the log verbatim.
    assert_eq!(
        log,
        vec![
            PlacementRecord::DirCreated(dest.path().join("Photos")),
            PlacementRecord::FilePlanned {
                source: "img 1.png".to_string(),
                directory: dest.path().join("Photos"),
            },
            PlacementRecord::DirCreated(dest.path().join("Docs")),
            PlacementRecord::DirCreated(dest.path().join("Docs/Resume")),
            PlacementRecord::FilePlanned {
                source: "cv final.pdf".to_string(),
                directory: dest.path().join("Docs/Resume"),
            },
        ]
    );
}

#[test]
fn executing_twice_is_idempotent() {
    let dest = TempDir::new().unwrap();
    let plan = plan_from_json(serde_json::json!({
        "structure": {
            "a": { "b": ["x.txt"] },
            "c": []
        }
    }));

    let executor = PlanExecutor::new(false);
    let first = executor.execute(&plan, dest.path()).unwrap();
    let second = executor.execute(&plan, dest.path()).unwrap();

    assert_eq!(first, second);
    assert!(dest.path().join("a/b").is_dir());
    assert!(dest.path().join("c").is_dir());

    let top_level: Vec<_> = fs::read_dir(dest.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(top_level.len(), 2);
}

#[test]
fn missing_structure_fails_before_touching_the_filesystem() {
    let dest = TempDir::new().unwrap();
    let plan = Plan::default();

    let err = PlanExecutor::new(false)
        .execute(&plan, dest.path())
        .unwrap_err();

    assert!(matches!(err, OrganizerError::MissingStructure));
    assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 0);
}

#[test]
fn ignore_and_unzip_are_not_interpreted() {
    let dest = TempDir::new().unwrap();
    let plan = plan_from_json(serde_json::json!({
        "structure": { "kept": [] },
        "ignore": ["scratch.txt"],
        "unzip": [
            { "source": "bundle.zip", "destination": "extracted" }
        ]
    }));

    let log = PlanExecutor::new(false).execute(&plan, dest.path()).unwrap();

    assert_eq!(
        log,
        vec![PlacementRecord::DirCreated(dest.path().join("kept"))]
    );
    assert!(!dest.path().join("extracted").exists());
}

#[test]
fn a_root_level_leaf_list_targets_the_destination_itself() {
    let dest = TempDir::new().unwrap();
    let plan = plan_from_json(serde_json::json!({
        "structure": ["loose.txt"]
    }));

    let log = PlanExecutor::new(false).execute(&plan, dest.path()).unwrap();

    assert_eq!(
        log,
        vec![PlacementRecord::FilePlanned {
            source: "loose.txt".to_string(),
            directory: dest.path().to_path_buf(),
        }]
    );
    assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 0);
}
