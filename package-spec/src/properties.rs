use anyhow::Context as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Lives next to every statement
pub const PROPERTIES_FILE_NAME: &str = "problem-properties.json";

/// Statement sections, as exported by Polygon into `problem-properties.json`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ProblemProperties {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub legend: String,
    #[serde(deserialize_with = "nullable")]
    pub input: String,
    #[serde(deserialize_with = "nullable")]
    pub output: String,
    #[serde(deserialize_with = "nullable")]
    pub interaction: String,
    #[serde(deserialize_with = "nullable")]
    pub notes: String,
    #[serde(deserialize_with = "nullable")]
    pub scoring: String,
    #[serde(deserialize_with = "nullable")]
    pub author_name: String,
}

// Polygon writes `null` for sections that were never filled in
fn nullable<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ProblemProperties {
    /// Reads properties from given statement directory.
    pub async fn load(statement_dir: &Path) -> anyhow::Result<ProblemProperties> {
        let path = statement_dir.join(PROPERTIES_FILE_NAME);
        let data = tokio::fs::read(&path)
            .await
            .with_context(|| format!("unable to read {}", path.display()))?;
        serde_json::from_slice(&data)
            .with_context(|| format!("unable to unmarshal {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_properties() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"{
            "name": "A+B",
            "legend": "Add two numbers.",
            "input": "Two integers.",
            "output": "Their sum.",
            "authorName": "Jane Doe",
            "scoring": null,
            "tutorial": "",
            "sampleTests": []
        }"#;
        tokio::fs::write(dir.path().join(PROPERTIES_FILE_NAME), json)
            .await
            .unwrap();
        let props = ProblemProperties::load(dir.path()).await.unwrap();
        assert_eq!(props.name, "A+B");
        assert_eq!(props.author_name, "Jane Doe");
        assert!(props.notes.is_empty());
        assert!(props.scoring.is_empty());
    }

    #[tokio::test]
    async fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ProblemProperties::load(dir.path()).await.is_err());
    }
}
