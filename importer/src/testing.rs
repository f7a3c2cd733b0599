//! Builds test-sets and tests from the judging section of a package.
use crate::{
    groups::{GroupIndex, SAMPLES_INDEX},
    scoring,
};
use anyhow::Context;
use asset_client::ObjectUploader;
use package_spec::{format_path, package_path, Group, Specification, TestMethod};
use snapshot_apis::{FeedbackPolicy, Generator, ScoringMode, Test, TestData, Testset};
use std::{collections::HashMap, path::Path};
use uuid::Uuid;

/// Applies to every test-set
pub const FILE_SIZE_LIMIT: u64 = 536_870_912;

/// Script which produces answers for generated tests
pub const ANSWER_GENERATOR: &str = "solution";

const TEST_CONTENT_TYPE: &str = "text/plain";

const TIME_LIMIT_TAG: &str = "eolymp_tl=";
const MEMORY_LIMIT_TAG: &str = "eolymp_ml=";

/// Settings which packages pass through tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Groups score as their worst test
    pub block_min: bool,
    /// Milliseconds
    pub time_limit: Option<u32>,
    /// Bytes
    pub memory_limit: Option<u64>,
}

impl Overrides {
    pub fn from_tags(tags: &[String]) -> Overrides {
        let mut overrides = Overrides::default();
        for tag in tags {
            if tag == "block_min" || tag == "min_block" {
                overrides.block_min = true;
            } else if let Some(value) = tag.strip_prefix(TIME_LIMIT_TAG) {
                if let Ok(value) = value.parse() {
                    overrides.time_limit = Some(value);
                }
            } else if let Some(value) = tag.strip_prefix(MEMORY_LIMIT_TAG) {
                if let Ok(value) = value.parse() {
                    overrides.memory_limit = Some(value);
                }
            }
        }
        overrides
    }
}

/// Tags which configure the import and are not problem topics.
pub fn is_control_tag(tag: &str) -> bool {
    tag == "block_min"
        || tag == "min_block"
        || tag.starts_with(TIME_LIMIT_TAG)
        || tag.starts_with(MEMORY_LIMIT_TAG)
}

/// Builds one test-set per index, ordered by index. When several groups
/// share an index (only samples can), the first one defines the test-set.
pub fn build_testsets(
    source: &package_spec::Testset,
    mapping: &GroupIndex,
    overrides: &Overrides,
) -> anyhow::Result<Vec<Testset>> {
    let groups: HashMap<&str, &Group> = source
        .groups
        .iter()
        .map(|group| (group.name.as_str(), group))
        .collect();
    let cpu_limit = overrides.time_limit.unwrap_or(source.time_limit);
    let memory_limit = overrides.memory_limit.unwrap_or(source.memory_limit);

    let mut testsets: Vec<Testset> = Vec::with_capacity(mapping.len());
    for (name, index) in mapping.iter() {
        if testsets.iter().any(|set| set.index == index) {
            continue;
        }
        // most packages are ICPC-style
        let mut testset = Testset {
            id: Uuid::new_v4(),
            index,
            cpu_limit,
            memory_limit,
            file_size_limit: FILE_SIZE_LIMIT,
            scoring_mode: ScoringMode::All,
            feedback_policy: FeedbackPolicy::IcpcExpanded,
            dependencies: Vec::new(),
        };
        if index == SAMPLES_INDEX {
            testset.scoring_mode = ScoringMode::Each;
            testset.feedback_policy = FeedbackPolicy::Complete;
        }
        if let Some(group) = groups.get(name) {
            testset.scoring_mode = if group.points_policy == "complete-group" {
                ScoringMode::All
            } else {
                ScoringMode::Each
            };
            if overrides.block_min && index != SAMPLES_INDEX {
                testset.scoring_mode = ScoringMode::Worst;
            }
            testset.feedback_policy = match group.feedback_policy.as_str() {
                "icpc" | "points" | "none" => FeedbackPolicy::Icpc,
                "icpc-expanded" => FeedbackPolicy::IcpcExpanded,
                _ => FeedbackPolicy::Complete,
            };
            for dep in &group.dependencies {
                let dep_index = mapping.get(dep).with_context(|| {
                    format!("group {:?} depends on unknown group {:?}", name, dep)
                })?;
                testset.dependencies.push(dep_index);
            }
        }
        testsets.push(testset);
    }
    testsets.sort_by_key(|set| set.index);
    Ok(testsets)
}

/// Reads the judging section: test-sets of the main testset and its tests.
#[tracing::instrument(skip(package, spec, objects))]
pub(crate) async fn import(
    package: &Path,
    spec: &Specification,
    objects: &ObjectUploader,
) -> anyhow::Result<(Vec<Testset>, Vec<Test>)> {
    let source = match spec.main_testset() {
        Some(set) => set,
        None => {
            tracing::info!("package has no testsets");
            return Ok((Vec::new(), Vec::new()));
        }
    };
    tracing::info!(testset = %source.name, tests = source.tests.len(), "importing tests");

    let overrides = Overrides::from_tags(&spec.tags);
    let mapping = GroupIndex::resolve(source);
    let testsets = build_testsets(source, &mapping, &overrides)?;
    let ids: HashMap<u32, Uuid> = testsets.iter().map(|set| (set.index, set.id)).collect();

    let mut tests = Vec::with_capacity(source.tests.len());
    for (position, test) in source.tests.iter().enumerate() {
        let testset_id = mapping
            .get(&test.group)
            .and_then(|index| ids.get(&index))
            .copied()
            .with_context(|| format!("test {} refers to unknown group {:?}", position + 1, test.group))?;
        let generated = test.method == TestMethod::Generated;

        let input = data_path(package, &source.input_path_pattern, position)?;
        let input = if generated && !exists(&input).await {
            let mut words = test.command.split_whitespace().map(str::to_string);
            TestData::Generator(Generator {
                script_name: words.next().unwrap_or_default(),
                arguments: words.collect(),
            })
        } else {
            upload(objects, &input).await?
        };

        let answer = data_path(package, &source.answer_path_pattern, position)?;
        let answer = if generated && !exists(&answer).await {
            TestData::Generator(Generator {
                script_name: ANSWER_GENERATOR.to_string(),
                arguments: Vec::new(),
            })
        } else {
            upload(objects, &answer).await?
        };

        tests.push(Test {
            testset_id,
            index: position as u32,
            example: test.sample,
            score: test.points.unwrap_or(0.0),
            input,
            answer,
        });
    }
    scoring::assign_scores(&mut tests);
    Ok((testsets, tests))
}

/// Test numbers in path patterns are 1-based.
fn data_path(package: &Path, pattern: &str, position: usize) -> anyhow::Result<std::path::PathBuf> {
    let relative = format_path(pattern, position + 1)?;
    package_path(package, relative)
}

async fn exists(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok()
}

async fn upload(objects: &ObjectUploader, path: &Path) -> anyhow::Result<TestData> {
    let link = objects
        .upload(path, TEST_CONTENT_TYPE)
        .await
        .with_context(|| format!("unable to upload {}", path.display()))?;
    Ok(TestData::Object { link })
}
