//! Static reference data (questionnaires, questions and their order) loaded
//! from a TOML file by the `import` command.
//!
//! ```toml
//! [[questionnaires]]
//! name = "Onboarding"
//!
//! [[questionnaires.questions]]
//! question = "Are you new here?"
//! type = "single_choice"
//! options = ["Yes", "No"]
//! ```

use intake_types::QuestionType;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub questionnaires: Vec<CatalogQuestionnaire>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogQuestionnaire {
    pub name: String,
    #[serde(default)]
    pub questions: Vec<CatalogQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogQuestion {
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub allow_multiple_answers: bool,
    /// Defaults to the question's 1-based position in the file
    pub priority: Option<i64>,
}

impl Catalog {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let catalog: Catalog = toml::from_str(content)?;

        for questionnaire in &catalog.questionnaires {
            for question in &questionnaire.questions {
                if question.question_type != QuestionType::FreeText && question.options.is_empty()
                {
                    anyhow::bail!(
                        "Question '{}' in '{}' needs at least one option",
                        question.question,
                        questionnaire.name
                    );
                }
            }
        }

        Ok(catalog)
    }
}
