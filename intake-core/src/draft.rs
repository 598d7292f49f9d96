//! In-memory answer state collected while a questionnaire is being filled in.

use crate::model::Question;
use intake_types::DraftValue;
use std::collections::BTreeMap;

/// Separator between selected options in a stored multi-choice answer
pub const OPTION_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftAnswer {
    /// Single-choice option or free text
    Single(String),
    /// Selected options without duplicates, in selection order
    Selection(Vec<String>),
}

impl DraftAnswer {
    /// Text persisted for this answer
    pub fn to_answer_text(&self) -> String {
        match self {
            DraftAnswer::Single(value) => value.clone(),
            DraftAnswer::Selection(options) => options.join(OPTION_SEPARATOR),
        }
    }

    pub fn contains(&self, option: &str) -> bool {
        match self {
            DraftAnswer::Single(value) => value == option,
            DraftAnswer::Selection(options) => options.iter().any(|o| o == option),
        }
    }
}

/// Per-question draft. Questions without an entry are unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseDraft {
    answers: BTreeMap<i64, DraftAnswer>,
}

impl ResponseDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-choice / free-text input: replaces any prior value.
    pub fn set(&mut self, question_id: i64, value: impl Into<String>) {
        self.answers
            .insert(question_id, DraftAnswer::Single(value.into()));
    }

    /// Multi-choice input: adds the option if absent, removes it if present.
    pub fn toggle(&mut self, question_id: i64, option: &str) {
        self.with_selection(question_id, |selection| {
            match selection.iter().position(|o| o == option) {
                Some(index) => {
                    selection.remove(index);
                }
                None => selection.push(option.to_string()),
            }
        });
    }

    /// Adds the option to the selection; no-op if already selected.
    pub fn select(&mut self, question_id: i64, option: &str) {
        self.with_selection(question_id, |selection| {
            if !selection.iter().any(|o| o == option) {
                selection.push(option.to_string());
            }
        });
    }

    pub fn clear(&mut self, question_id: i64) {
        self.answers.remove(&question_id);
    }

    pub fn get(&self, question_id: i64) -> Option<&DraftAnswer> {
        self.answers.get(&question_id)
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// Set answers in question id order
    pub fn iter(&self) -> impl Iterator<Item = (i64, &DraftAnswer)> {
        self.answers.iter().map(|(id, answer)| (*id, answer))
    }

    /// Restores a stored answer, splitting multi-choice text back into options.
    /// Empty stored text leaves the question unset.
    pub fn prefill(&mut self, question: &Question, stored_text: &str) {
        if stored_text.is_empty() {
            return;
        }

        if question.accepts_multiple() {
            for option in stored_text.split(OPTION_SEPARATOR) {
                self.select(question.id, option);
            }
        } else {
            self.set(question.id, stored_text);
        }
    }

    pub fn to_values(&self) -> BTreeMap<i64, DraftValue> {
        self.answers
            .iter()
            .map(|(id, answer)| {
                let value = match answer {
                    DraftAnswer::Single(value) => DraftValue::Single(value.clone()),
                    DraftAnswer::Selection(options) => DraftValue::Multiple(options.clone()),
                };
                (*id, value)
            })
            .collect()
    }

    fn with_selection<R>(
        &mut self,
        question_id: i64,
        f: impl FnOnce(&mut Vec<String>) -> R,
    ) -> R {
        let entry = self
            .answers
            .entry(question_id)
            .or_insert_with(|| DraftAnswer::Selection(Vec::new()));

        if let DraftAnswer::Selection(options) = &mut *entry {
            return f(options);
        }

        // A single value on a toggled question starts a fresh selection
        let mut options = Vec::new();
        let result = f(&mut options);
        *entry = DraftAnswer::Selection(options);
        result
    }
}

impl From<BTreeMap<i64, DraftValue>> for ResponseDraft {
    fn from(values: BTreeMap<i64, DraftValue>) -> Self {
        let mut draft = ResponseDraft::new();

        for (question_id, value) in values {
            match value {
                DraftValue::Single(value) => draft.set(question_id, value),
                DraftValue::Multiple(options) => {
                    // keep an explicitly empty selection rather than dropping it
                    draft.with_selection(question_id, |selection| {
                        for option in options {
                            if !selection.contains(&option) {
                                selection.push(option);
                            }
                        }
                    });
                }
            }
        }

        draft
    }
}
