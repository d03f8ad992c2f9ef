//! TOML test-definition parser.
//!
//! Loads test definitions from TOML files and directories, and validates
//! them for common authoring mistakes.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Choice, Part, PartKind, Question, ReferenceAnswer, TestDefinition};
use crate::passage;

/// Intermediate TOML structure for parsing test-definition files.
#[derive(Debug, Deserialize)]
struct TomlTestFile {
    test: TomlTestHeader,
    #[serde(default)]
    parts: Vec<TomlPart>,
}

#[derive(Debug, Deserialize)]
struct TomlTestHeader {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlPart {
    id: String,
    kind: String,
    #[serde(default)]
    passage: String,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    options: Vec<TomlChoice>,
    #[serde(default)]
    answer: Option<ReferenceAnswer>,
    #[serde(default)]
    is_example: bool,
}

#[derive(Debug, Deserialize)]
struct TomlChoice {
    key: String,
    text: String,
}

/// Parse a single TOML file into a `TestDefinition`.
pub fn parse_test(path: &Path) -> Result<TestDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test definition: {}", path.display()))?;

    parse_test_str(&content, path)
}

/// Parse a TOML string into a `TestDefinition` (useful for testing).
pub fn parse_test_str(content: &str, source_path: &Path) -> Result<TestDefinition> {
    let parsed: TomlTestFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let parts = parsed
        .parts
        .into_iter()
        .map(|p| {
            let kind: PartKind = p.kind.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?;
            let questions = p
                .questions
                .into_iter()
                .map(|q| Question {
                    id: q.id,
                    prompt: q.prompt,
                    options: q
                        .options
                        .into_iter()
                        .map(|c| Choice {
                            key: c.key,
                            text: c.text,
                        })
                        .collect(),
                    answer: q.answer,
                    is_example: q.is_example,
                })
                .collect();
            Ok(Part {
                id: p.id,
                kind,
                passage: p.passage,
                questions,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TestDefinition {
        id: parsed.test.id,
        title: parsed.test.title,
        description: parsed.test.description,
        parts,
    })
}

/// Recursively load all `.toml` test definitions from a directory.
pub fn load_test_directory(dir: &Path) -> Result<Vec<TestDefinition>> {
    let mut tests = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            tests.extend(load_test_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_test(&path) {
                Ok(test) => tests.push(test),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(tests)
}

/// A warning from test-definition validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The part id (if applicable).
    pub part_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a test definition for common authoring issues.
pub fn validate_test(definition: &TestDefinition) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Duplicate question ids across the whole test
    let mut seen_ids = std::collections::HashSet::new();
    for part in &definition.parts {
        for question in &part.questions {
            if !seen_ids.insert(&question.id) {
                warnings.push(ValidationWarning {
                    part_id: Some(part.id.clone()),
                    message: format!("duplicate question id: {}", question.id),
                });
            }
        }
    }

    for part in &definition.parts {
        if part.questions.is_empty() {
            warnings.push(ValidationWarning {
                part_id: Some(part.id.clone()),
                message: "part has no questions".into(),
            });
            continue;
        }

        match part.kind {
            PartKind::GapFill => {
                let token_count = passage::split_passage(&part.passage, &part.questions)
                    .filter(|s| matches!(s, passage::Segment::Gap { .. }))
                    .count();
                if token_count < part.questions.len() {
                    warnings.push(ValidationWarning {
                        part_id: Some(part.id.clone()),
                        message: format!(
                            "passage has {} gap token(s) for {} question(s); trailing questions will not be rendered",
                            token_count,
                            part.questions.len()
                        ),
                    });
                }
                warn_non_key_answers(part, &mut warnings);
            }
            PartKind::MultipleChoice => {
                warn_non_key_answers(part, &mut warnings);
            }
            PartKind::Ordering => {
                if part.example_questions().count() == 0 {
                    warnings.push(ValidationWarning {
                        part_id: Some(part.id.clone()),
                        message: "ordering part has no example item".into(),
                    });
                }
                let reference = part.reference_order();
                if reference.len() != part.questions.len() {
                    warnings.push(ValidationWarning {
                        part_id: Some(part.id.clone()),
                        message: format!(
                            "reference sequence has {} id(s) for {} question(s)",
                            reference.len(),
                            part.questions.len()
                        ),
                    });
                }
            }
            PartKind::HeadingMatch => {
                for question in part.scored_questions() {
                    if !matches!(question.answer, Some(ReferenceAnswer::Heading(_))) {
                        warnings.push(ValidationWarning {
                            part_id: Some(part.id.clone()),
                            message: format!(
                                "question {} has no heading reference answer",
                                question.id
                            ),
                        });
                    }
                }
            }
        }
    }

    warnings
}

fn warn_non_key_answers(part: &Part, warnings: &mut Vec<ValidationWarning>) {
    for question in part.scored_questions() {
        match &question.answer {
            Some(ReferenceAnswer::Key(key)) => {
                if !question.options.is_empty() && !question.options.iter().any(|c| &c.key == key) {
                    warnings.push(ValidationWarning {
                        part_id: Some(part.id.clone()),
                        message: format!(
                            "question {} reference key '{}' is not among its options",
                            question.id, key
                        ),
                    });
                }
            }
            _ => warnings.push(ValidationWarning {
                part_id: Some(part.id.clone()),
                message: format!("question {} has no choice reference answer", question.id),
            }),
        }
    }
}
