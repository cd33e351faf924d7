use std::path::Path;

use crate::errors::OrganizerError;
use crate::models::RawPlanResponse;
use crate::utils::snapshot_paths;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Narrow seam to the reasoning service: structured request in, raw response
/// out. The rest of the pipeline only ever sees [`RawPlanResponse`], so it
/// can be driven with canned responses in tests.
pub trait PlanRequester {
    fn request_plan(
        &self,
        source: &Path,
        destination: &Path,
        goal: &str,
    ) -> impl std::future::Future<Output = Result<RawPlanResponse, OrganizerError>> + Send;
}

pub struct OpenAiRequester {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiRequester {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_prompt(source: &Path, destination: &Path, goal: &str, snapshot: &[String]) -> String {
        format!(
            r#"You are an AI specialized in folder organization.

Your task:
Given:
- A folder path
- The current folder structure
- A user prompt describing the organization goal

Return ONLY a valid JSON object (no explanations, no markdown).

The JSON must describe:
1. "structure": a hierarchical mapping of folders to lists of file paths.
   - Nest subfolders as JSON objects whenever sub-projects call for them.
   - A folder maps either to a list of file paths or to nested folders.
2. "ignore": list of file paths to leave out (temporary or irrelevant files).
3. "unzip": list of objects, each with:
   - "source": the path of the archive to extract
   - "destination": the folder it should be extracted into (must be inside {destination})

Rules:
- Do not invent files that are not in the listing below.
- Only include keys that are relevant.
- All paths must use forward slashes ("/").
- Ensure "structure" is properly nested and consistent.
- A path listed under "ignore" must not appear anywhere in "structure".
- Avoid overly generic folder names like "files" or "misc": when the goal is
  generic, classify by file type or by the project a file belongs to.

Example of a correct hierarchical "structure":
"structure": {{
  "projects": {{
    "project_name": [
      "/path/to/file1.doc",
      "/path/to/file2.pdf"
    ]
  }},
  "courses": [
    "/path/to/lesson1.ipynb"
  ]
}}

Input:
- Path: {source}
- Folder structure:
{listing}
- Context: {goal}
- Destination path: {destination}

Output:
A single valid JSON object with the keys "structure", optionally "ignore",
and optionally "unzip"."#,
            source = source.display(),
            destination = destination.display(),
            goal = goal,
            listing = snapshot.join("\n"),
        )
    }
}

impl PlanRequester for OpenAiRequester {
    async fn request_plan(
        &self,
        source: &Path,
        destination: &Path,
        goal: &str,
    ) -> Result<RawPlanResponse, OrganizerError> {
        if !source.is_dir() {
            return Err(OrganizerError::InvalidInput(format!(
                "source path is not an existing directory: {}",
                source.display()
            )));
        }

        let snapshot = snapshot_paths(source);
        let prompt = Self::build_prompt(source, destination, goal, &snapshot);

        let body = serde_json::json!({
            "model": self.model,
            "input": prompt,
        });

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        Ok(RawPlanResponse(payload))
    }
}
