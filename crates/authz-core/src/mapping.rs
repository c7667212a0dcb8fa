//! Output mappings: which artifact is rendered by which generator

use std::collections::HashSet;

use authz_fs::NormalizedPath;

use crate::config::OutputEntry;
use crate::error::{Error, Result};

/// Default generator for each known file extension.
const EXTENSION_GENERATORS: &[(&str, &str)] = &[
    ("py", "python"),
    ("pyi", "python"),
    ("ts", "typescript"),
    ("json", "json"),
];

/// The generator inferred for a file extension (without the dot).
pub fn generator_for_extension(extension: &str) -> Option<&'static str> {
    EXTENSION_GENERATORS
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, id)| *id)
}

/// One requested output artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputMapping {
    pub path: NormalizedPath,
    pub generator: String,
    /// True when the generator was named rather than inferred.
    pub explicit: bool,
}

impl OutputMapping {
    /// Parse one `PATH[:GENERATOR]` spec.
    ///
    /// The text after the last `:` is a generator id only when it contains
    /// no path separator, so `C:\out\types.py` stays a plain path.
    pub fn parse(spec: &str) -> std::result::Result<Self, String> {
        let (path, generator) = match spec.rfind(':') {
            Some(i) if !spec[i + 1..].contains(['/', '\\']) => (&spec[..i], Some(&spec[i + 1..])),
            _ => (spec, None),
        };
        Self::resolve(spec, path, generator)
    }

    /// Build a mapping from a configuration `[[outputs]]` entry.
    pub fn from_entry(entry: &OutputEntry) -> std::result::Result<Self, String> {
        Self::resolve(&entry.path, &entry.path, entry.generator.as_deref())
    }

    /// Parse every spec, reporting all problems together.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOutputMappings`] listing every rejected spec and every
    /// path mapped more than once.
    pub fn parse_all<S: AsRef<str>>(specs: &[S]) -> Result<Vec<Self>> {
        Self::collect(specs.iter().map(|s| Self::parse(s.as_ref())))
    }

    /// Like [`parse_all`](Self::parse_all) for configuration entries.
    pub fn from_entries(entries: &[OutputEntry]) -> Result<Vec<Self>> {
        Self::collect(entries.iter().map(Self::from_entry))
    }

    fn collect(
        parsed: impl Iterator<Item = std::result::Result<Self, String>>,
    ) -> Result<Vec<Self>> {
        let mut mappings = Vec::new();
        let mut problems = Vec::new();
        let mut seen = HashSet::new();

        for result in parsed {
            match result {
                Ok(mapping) => {
                    if !seen.insert(mapping.path.clone()) {
                        problems.push(format!("'{}' is mapped more than once", mapping.path));
                    }
                    mappings.push(mapping);
                }
                Err(problem) => problems.push(problem),
            }
        }

        if problems.is_empty() {
            Ok(mappings)
        } else {
            tracing::debug!(count = problems.len(), "rejected output mappings");
            Err(Error::InvalidOutputMappings { problems })
        }
    }

    fn resolve(spec: &str, path: &str, generator: Option<&str>) -> std::result::Result<Self, String> {
        if path.trim().is_empty() {
            return Err(format!("'{spec}': output path is empty"));
        }
        let path = NormalizedPath::new(path);

        match generator {
            Some("") => Err(format!("'{spec}': generator id after ':' is empty")),
            Some(id) => Ok(Self {
                path,
                generator: id.to_string(),
                explicit: true,
            }),
            None => {
                let Some(ext) = path.extension().map(str::to_string) else {
                    return Err(format!(
                        "'{spec}': cannot infer a generator without a file extension; use PATH:GENERATOR"
                    ));
                };
                match generator_for_extension(&ext) {
                    Some(id) => Ok(Self {
                        path,
                        generator: id.to_string(),
                        explicit: false,
                    }),
                    None => Err(format!(
                        "'{spec}': no default generator for '.{ext}' files; use PATH:GENERATOR"
                    )),
                }
            }
        }
    }
}

impl std::fmt::Display for OutputMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.path, self.generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("resources.py", "resources.py", "python", false)]
    #[case("stubs/resources.pyi", "stubs/resources.pyi", "python", false)]
    #[case("web/resources.ts", "web/resources.ts", "typescript", false)]
    #[case("model.json", "model.json", "json", false)]
    #[case("resources.py:typescript", "resources.py", "typescript", true)]
    #[case("out/types.txt:python", "out/types.txt", "python", true)]
    #[case("types.PY", "types.PY", "python", false)]
    fn test_parse(
        #[case] spec: &str,
        #[case] path: &str,
        #[case] generator: &str,
        #[case] explicit: bool,
    ) {
        let mapping = OutputMapping::parse(spec).unwrap();
        assert_eq!(mapping.path.as_str(), path);
        assert_eq!(mapping.generator, generator);
        assert_eq!(mapping.explicit, explicit);
    }

    #[test]
    fn test_colon_in_directory_is_part_of_path() {
        let mapping = OutputMapping::parse("C:\\work\\resources.py").unwrap();
        assert_eq!(mapping.generator, "python");
        assert!(mapping.path.as_str().ends_with("work/resources.py"));
    }

    #[rstest]
    #[case("resources.rs", "no default generator for '.rs'")]
    #[case("Makefile", "without a file extension")]
    #[case("resources.py:", "generator id after ':' is empty")]
    #[case(":python", "output path is empty")]
    #[case("", "output path is empty")]
    fn test_parse_rejects(#[case] spec: &str, #[case] message: &str) {
        let problem = OutputMapping::parse(spec).unwrap_err();
        assert!(problem.contains(message), "{problem}");
    }

    #[test]
    fn test_unknown_explicit_generator_is_accepted() {
        let mapping = OutputMapping::parse("resources.py:jinja").unwrap();
        assert_eq!(mapping.generator, "jinja");
    }

    #[test]
    fn test_parse_all_collects_every_problem() {
        let err = OutputMapping::parse_all(&[
            "ok.py",
            "bad.rs",
            "ok.py",
            "noext",
            "fine.ts",
        ])
        .unwrap_err();
        match err {
            Error::InvalidOutputMappings { problems } => {
                assert_eq!(problems.len(), 3, "{problems:?}");
                assert!(problems[0].contains("bad.rs"));
                assert!(problems[1].contains("mapped more than once"));
                assert!(problems[2].contains("noext"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_entries() {
        let entries = vec![
            OutputEntry {
                path: "a.py".into(),
                generator: None,
            },
            OutputEntry {
                path: "b.txt".into(),
                generator: Some("json".into()),
            },
        ];
        let mappings = OutputMapping::from_entries(&entries).unwrap();
        assert_eq!(
            mappings.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["a.py:python", "b.txt:json"]
        );
    }
}
