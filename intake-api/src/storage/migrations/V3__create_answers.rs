/// Create the answers table; one row per (user, questionnaire, question)
pub fn migration() -> String {
    r#"
CREATE TABLE answers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    questionnaire_id INTEGER NOT NULL,
    question_id INTEGER NOT NULL,
    answer_text TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE,
    FOREIGN KEY (questionnaire_id) REFERENCES questionnaires (id) ON DELETE CASCADE,
    FOREIGN KEY (question_id) REFERENCES questions (id) ON DELETE CASCADE
);

CREATE UNIQUE INDEX idx_answers_user_questionnaire_question
    ON answers(user_id, questionnaire_id, question_id);

CREATE INDEX idx_answers_user
    ON answers(user_id);
"#
    .to_string()
}
