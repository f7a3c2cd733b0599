//! Translates named groups of a package testset into numeric test-set
//! indices.
use package_spec::Testset;
use std::{cmp::Ordering, collections::HashMap};

/// Index of the samples test-set
pub const SAMPLES_INDEX: u32 = 0;

/// Mapping from group name to test-set index.
///
/// Every group mentioned by the testset (defined, depended upon or used by
/// a test) has an entry. Sample groups share index 0, other groups get
/// distinct indices starting from 1.
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    /// In assignment order
    assigned: Vec<(String, u32)>,
    by_name: HashMap<String, u32>,
}

impl GroupIndex {
    pub fn resolve(testset: &Testset) -> GroupIndex {
        let mut names: Vec<&str> = Vec::new();
        for group in &testset.groups {
            names.push(&group.name);
            names.extend(group.dependencies.iter().map(String::as_str));
        }
        names.extend(testset.tests.iter().map(|test| test.group.as_str()));
        names.sort_by(|a, b| compare_names(a, b));

        let mut mapping = GroupIndex::default();
        let mut next = SAMPLES_INDEX + 1;
        for name in names {
            if mapping.by_name.contains_key(name) {
                continue;
            }
            let index = if is_samples(name) {
                SAMPLES_INDEX
            } else {
                let index = next;
                next += 1;
                index
            };
            mapping.by_name.insert(name.to_string(), index);
            mapping.assigned.push((name.to_string(), index));
        }
        mapping
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    /// Iterates over `(name, index)` pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.assigned
            .iter()
            .map(|(name, index)| (name.as_str(), *index))
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

fn is_samples(name: &str) -> bool {
    name == "0" || name.to_lowercase().contains("sample")
}

/// Integer names go first in numeric order, then all other names in
/// lexical order.
fn compare_names(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
