/// Create questionnaires, questions and the priority-ordered link table
pub fn migration() -> String {
    r#"
CREATE TABLE questionnaires (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL DEFAULT ''
);

CREATE TABLE questions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question TEXT NOT NULL,
    question_type TEXT NOT NULL CHECK (question_type IN ('single_choice', 'multi_choice', 'free_text')),
    options TEXT NOT NULL DEFAULT '[]',
    allow_multiple_answers INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE questionnaire_questions (
    questionnaire_id INTEGER NOT NULL,
    question_id INTEGER NOT NULL,
    priority INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (questionnaire_id, question_id),
    FOREIGN KEY (questionnaire_id) REFERENCES questionnaires (id) ON DELETE CASCADE,
    FOREIGN KEY (question_id) REFERENCES questions (id) ON DELETE CASCADE
);

CREATE INDEX idx_questionnaire_questions_priority
    ON questionnaire_questions(questionnaire_id, priority);
"#
    .to_string()
}
