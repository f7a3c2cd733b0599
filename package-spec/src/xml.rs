//! `problem.xml` reader.
//!
//! Unknown elements are ignored: packages carry plenty of data the importer
//! does not care about (validators, stresses, properties).
use crate::{
    Checker, Document, Group, Interactor, Judging, Material, Name, Solution, SourceFile,
    Specification, Test, TestMethod, Testset,
};
use anyhow::{bail, Context as _};
use roxmltree::Node;

/// Parses package manifest.
pub fn parse(manifest: &str) -> anyhow::Result<Specification> {
    let doc = roxmltree::Document::parse(manifest).context("manifest is not valid xml")?;
    let node_problem = doc.root_element();
    if node_problem.tag_name().name() != "problem" {
        bail!(
            "root element must be <problem>, got <{}>",
            node_problem.tag_name().name()
        );
    }
    let mut spec = Specification {
        short_name: attr_or_default(node_problem, "short-name"),
        ..Default::default()
    };
    for child in elements(node_problem) {
        match child.tag_name().name() {
            "names" => {
                for node in elements_named(child, "name") {
                    spec.names.push(Name {
                        language: attr_or_default(node, "language"),
                        value: attr_or_default(node, "value"),
                    });
                }
            }
            "statements" => spec.statements = documents(child, "statement")?,
            "tutorials" => spec.tutorials = documents(child, "tutorial")?,
            "judging" => spec.judging = judging(child)?,
            "files" => process_files(child, &mut spec)?,
            "assets" => process_assets(child, &mut spec)?,
            "materials" => {
                for node in elements_named(child, "material") {
                    spec.materials.push(Material {
                        path: required_attr(node, "path")?.to_string(),
                        publish: attr_or_default(node, "publish"),
                    });
                }
            }
            "tags" => {
                for node in elements_named(child, "tag") {
                    spec.tags.push(required_attr(node, "value")?.to_string());
                }
            }
            _ => {}
        }
    }
    Ok(spec)
}

fn elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(|child| child.is_element())
}

fn elements_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    elements(node).filter(move |child| child.tag_name().name() == name)
}

fn attr_or_default(node: Node, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

fn required_attr<'a>(node: Node<'a, '_>, name: &str) -> anyhow::Result<&'a str> {
    node.attribute(name).with_context(|| {
        format!(
            "<{}> does not have {} attribute",
            node.tag_name().name(),
            name
        )
    })
}

fn text(node: Node) -> String {
    node.text().unwrap_or_default().trim().to_string()
}

fn source_file(node: Node) -> anyhow::Result<SourceFile> {
    Ok(SourceFile {
        path: required_attr(node, "path")?.to_string(),
        kind: attr_or_default(node, "type"),
    })
}

fn sources(node: Node) -> anyhow::Result<Vec<SourceFile>> {
    elements_named(node, "source").map(source_file).collect()
}

fn documents(node: Node, name: &'static str) -> anyhow::Result<Vec<Document>> {
    elements_named(node, name)
        .map(|doc| {
            Ok(Document {
                language: attr_or_default(doc, "language"),
                kind: attr_or_default(doc, "type"),
                path: required_attr(doc, "path")?.to_string(),
            })
        })
        .collect()
}

// <problem><judging> is the most important section: it contains
// information about tests
fn judging(node_judging: Node) -> anyhow::Result<Judging> {
    let run_count = match node_judging.attribute("run-count") {
        Some(val) => Some(
            val.trim()
                .parse()
                .with_context(|| format!("run-count {:?} is not a number", val))?,
        ),
        None => None,
    };
    let testsets = elements_named(node_judging, "testset")
        .map(testset)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Judging {
        run_count,
        testsets,
    })
}

fn testset(node_testset: Node) -> anyhow::Result<Testset> {
    let mut set = Testset {
        name: attr_or_default(node_testset, "name"),
        ..Default::default()
    };
    for child in elements(node_testset) {
        match child.tag_name().name() {
            "time-limit" => {
                set.time_limit = text(child)
                    .parse()
                    .context("parsing <time-limit> failed")?;
            }
            "memory-limit" => {
                set.memory_limit = text(child)
                    .parse()
                    .context("parsing <memory-limit> failed")?;
            }
            "input-path-pattern" => set.input_path_pattern = text(child),
            "answer-path-pattern" => set.answer_path_pattern = text(child),
            "tests" => {
                for node_test in elements_named(child, "test") {
                    set.tests.push(test(node_test)?);
                }
            }
            "groups" => {
                for node_group in elements_named(child, "group") {
                    set.groups.push(group(node_group)?);
                }
            }
            _ => {}
        }
    }
    Ok(set)
}

fn test(node_test: Node) -> anyhow::Result<Test> {
    let method = match node_test.attribute("method") {
        None | Some("manual") => TestMethod::Manual,
        Some("generated") => TestMethod::Generated,
        Some(other) => bail!("unknown test method {:?}", other),
    };
    let points = match node_test.attribute("points") {
        Some(val) => Some(
            val.trim()
                .parse()
                .with_context(|| format!("test points {:?} is not a number", val))?,
        ),
        None => None,
    };
    Ok(Test {
        method,
        command: attr_or_default(node_test, "cmd"),
        sample: node_test.attribute("sample") == Some("true"),
        points,
        group: attr_or_default(node_test, "group"),
    })
}

fn group(node_group: Node) -> anyhow::Result<Group> {
    let mut group = Group {
        name: required_attr(node_group, "name")?.to_string(),
        points_policy: attr_or_default(node_group, "points-policy"),
        feedback_policy: attr_or_default(node_group, "feedback-policy"),
        dependencies: Vec::new(),
    };
    for deps in elements_named(node_group, "dependencies") {
        for dep in elements_named(deps, "dependency") {
            group
                .dependencies
                .push(required_attr(dep, "group")?.to_string());
        }
    }
    Ok(group)
}

fn process_files(node_files: Node, spec: &mut Specification) -> anyhow::Result<()> {
    for child in elements(node_files) {
        match child.tag_name().name() {
            "resources" => {
                for file in elements_named(child, "file") {
                    spec.resources.push(source_file(file)?);
                }
            }
            "executables" => {
                for exe in elements_named(child, "executable") {
                    spec.executables.extend(sources(exe)?);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn process_assets(node_assets: Node, spec: &mut Specification) -> anyhow::Result<()> {
    for child in elements(node_assets) {
        match child.tag_name().name() {
            "checker" => {
                spec.checker = Checker {
                    name: attr_or_default(child, "name"),
                    sources: sources(child)?,
                };
            }
            "interactor" => {
                spec.interactor = Interactor {
                    sources: sources(child)?,
                };
            }
            "solutions" => {
                for node_solution in elements_named(child, "solution") {
                    let tag = required_attr(node_solution, "tag")?.to_string();
                    let source = elements_named(node_solution, "source")
                        .next()
                        .with_context(|| format!("solution {} does not have <source>", tag))?;
                    spec.solutions.push(Solution {
                        tag,
                        source: source_file(source)?,
                    });
                }
            }
            _ => {}
        }
    }
    Ok(())
}
