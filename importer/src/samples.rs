//! Discovers sample tests stored next to a statement.
use crate::files::read_text;
use anyhow::Context;
use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

const INPUT_EXTENSIONS: &[&str] = &["", "in", "dat"];
const ANSWER_EXTENSIONS: &[&str] = &["a", "out", "sol", "ans"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePair {
    pub input: PathBuf,
    pub answer: PathBuf,
}

/// Pairs input and answer files of `dir` by stem. Files with unknown
/// extension are inputs keyed by the whole name, so `example.01` pairs
/// with `example.01.a`. Pairs are ordered by key.
pub async fn find_samples(dir: &Path) -> anyhow::Result<Vec<SamplePair>> {
    let mut inputs = BTreeMap::new();
    let mut answers = HashMap::new();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("unable to list {}", dir.display()))?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let (stem, extension) = split_extension(&name);
        if INPUT_EXTENSIONS.contains(&extension) {
            inputs.insert(stem.to_string(), entry.path());
        } else if ANSWER_EXTENSIONS.contains(&extension) {
            answers.insert(stem.to_string(), entry.path());
        } else {
            inputs.insert(name.clone(), entry.path());
        }
    }
    Ok(inputs
        .into_iter()
        .filter_map(|(key, input)| {
            let answer = answers.remove(&key)?;
            Some(SamplePair { input, answer })
        })
        .collect())
}

fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) => (&name[..dot], &name[dot + 1..]),
        None => (name, ""),
    }
}

/// Renders `\Examples` section.
pub async fn render_examples(samples: &[SamplePair]) -> anyhow::Result<String> {
    let mut out = String::from("\\Examples\n\n");
    for sample in samples {
        let input = read_text(&sample.input).await?;
        let answer = read_text(&sample.answer).await?;
        out.push_str(&format!("\\exmp{{{}}}{{{}\n}}\n", input, answer));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(pairs: &[SamplePair]) -> Vec<(String, String)> {
        let name = |p: &Path| p.file_name().unwrap().to_string_lossy().into_owned();
        pairs
            .iter()
            .map(|pair| (name(&pair.input), name(&pair.answer)))
            .collect()
    }

    #[tokio::test]
    async fn pairs_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        for file in &[
            "example.01",
            "example.01.a",
            "02.in",
            "02.ans",
            "10",
            "10.out",
            "lonely.in",
            "orphan.sol",
            "problem.tex",
            "problem-properties.json",
        ] {
            std::fs::write(dir.path().join(file), *file).unwrap();
        }
        let pairs = find_samples(dir.path()).await.unwrap();
        assert_eq!(
            names(&pairs),
            vec![
                ("02.in".to_string(), "02.ans".to_string()),
                ("10".to_string(), "10.out".to_string()),
                ("example.01".to_string(), "example.01.a".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn render() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("example.01"), "1 2").unwrap();
        std::fs::write(dir.path().join("example.01.a"), "3").unwrap();
        let pairs = find_samples(dir.path()).await.unwrap();
        assert_eq!(
            render_examples(&pairs).await.unwrap(),
            "\\Examples\n\n\\exmp{1 2}{3\n}\n"
        );
    }

    #[test]
    fn extensions() {
        assert_eq!(split_extension("a.in"), ("a", "in"));
        assert_eq!(split_extension("a.b.c"), ("a.b", "c"));
        assert_eq!(split_extension("plain"), ("plain", ""));
    }
}
