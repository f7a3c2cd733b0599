//! This module is responsible for mapping package source types to runtimes
//! understood by the execution backend.
mod locale;

pub use locale::locale_from_language;

/// Runtime description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Runtime {
    /// Versioned identifier, `<language>:<version>`
    pub name: &'static str,
    /// Source types (as used by packages) which are compiled by this runtime
    pub source_types: &'static [&'static str],
}

impl Runtime {
    /// Language family, i.e. part of the name before `:`.
    pub fn language(&self) -> &'static str {
        language_of(self.name)
    }

    pub fn accepts(&self, source_type: &str) -> bool {
        self.source_types.contains(&source_type)
    }
}

/// All known runtimes. Order matters: some runtimes claim the same
/// legacy source types and the first one wins.
pub static RUNTIMES: &[Runtime] = &[
    Runtime {
        name: "c:17-gnu10",
        source_types: &["c.gcc"],
    },
    Runtime {
        name: "cpp:17-gnu10",
        source_types: &[
            "cpp.g++",
            "cpp.g++11",
            "cpp.g++14",
            "cpp.g++17",
            "cpp.ms",
            "cpp.msys2-mingw64-9-g++17",
        ],
    },
    Runtime {
        name: "cpp:20-gnu10",
        source_types: &[
            "cpp.g++20",
            "cpp.gcc11-64-winlibs-g++20",
            "cpp.gcc13-64-winlibs-g++20",
        ],
    },
    Runtime {
        name: "csharp:5-dotnet",
        source_types: &["csharp.mono"],
    },
    Runtime {
        name: "d:1-gdc",
        source_types: &["d"],
    },
    Runtime {
        name: "go:1.20",
        source_types: &["go"],
    },
    Runtime {
        name: "java:1.8",
        source_types: &["java8"],
    },
    Runtime {
        name: "java:1.17",
        source_types: &["java11"],
    },
    Runtime {
        name: "java:1.21",
        source_types: &["java21"],
    },
    Runtime {
        name: "kotlin:1.7",
        source_types: &["kotlin", "kotlin16", "kotlin17"],
    },
    Runtime {
        name: "kotlin:1.9",
        source_types: &["kotlin19"],
    },
    Runtime {
        name: "pascal:3.2",
        source_types: &["pas.dpr", "pas.fpc"],
    },
    Runtime {
        name: "php:7.4",
        source_types: &["php.5"],
    },
    Runtime {
        name: "python:3-python",
        source_types: &["python.2", "python.3"],
    },
    Runtime {
        name: "python:3-pypy",
        source_types: &["python.pypy2", "python.pypy3", "python.pypy3-64"],
    },
    Runtime {
        name: "ruby:2.4",
        source_types: &["ruby", "ruby.2"],
    },
    Runtime {
        name: "rust:1.46",
        source_types: &["rust"],
    },
];

/// Finds runtime which compiles sources of given type.
pub fn runtime_for_source_type(source_type: &str) -> Option<&'static Runtime> {
    RUNTIMES.iter().find(|rt| rt.accepts(source_type))
}

/// Looks up runtime by its identifier.
pub fn find_runtime(name: &str) -> Option<&'static Runtime> {
    RUNTIMES.iter().find(|rt| rt.name == name)
}

/// Lists source types of the runtime, empty for unknown runtimes.
pub fn source_types(runtime: &str) -> &'static [&'static str] {
    find_runtime(runtime).map(|rt| rt.source_types).unwrap_or(&[])
}

/// All runtimes of given language family, in table order.
pub fn runtimes_of_language(language: &str) -> impl Iterator<Item = &'static Runtime> + '_ {
    RUNTIMES.iter().filter(move |rt| rt.language() == language)
}

fn language_of(runtime: &str) -> &str {
    runtime.split(':').next().unwrap_or(runtime)
}
