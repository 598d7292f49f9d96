use crate::storage::catalog::Catalog;
use crate::DbConnection;
use async_trait::async_trait;
use chrono::Utc;
use intake_core::{
    Answer, AnswerOwner, DetailedAnswer, IntakeStore, Question, Questionnaire,
    QuestionnaireQuestion, StoreError, User,
};
use intake_types::{QuestionType, UserRole};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::sync::MutexGuard;
use tracing::info;

pub struct SqliteIntakeStore {
    connection: DbConnection,
}

/// Rows written by a catalog import
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub questionnaires: usize,
    pub questions: usize,
}

struct QuestionRow {
    id: i64,
    question: String,
    question_type: String,
    options: String,
    allow_multiple_answers: bool,
}

impl QuestionRow {
    fn into_question(self) -> Result<Question, StoreError> {
        let question_type = QuestionType::parse(&self.question_type).ok_or_else(|| {
            StoreError::Corrupt(format!(
                "question {} has unknown type '{}'",
                self.id, self.question_type
            ))
        })?;
        let options: Vec<String> = serde_json::from_str(&self.options)?;

        Ok(Question {
            id: self.id,
            question: self.question,
            question_type,
            options,
            allow_multiple_answers: self.allow_multiple_answers,
        })
    }
}

fn query_failed(e: rusqlite::Error) -> StoreError {
    StoreError::OperationFailed(e.to_string())
}

impl SqliteIntakeStore {
    pub fn new(connection: DbConnection) -> Self {
        Self { connection }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.connection
            .lock()
            .map_err(|e| StoreError::OperationFailed(format!("Lock error: {}", e)))
    }

    pub fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<i64, StoreError> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO users (username, password_hash, role, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![username, password_hash, role.as_str(), Utc::now().timestamp()],
        )
        .map_err(query_failed)?;

        let id = conn.last_insert_rowid();
        info!(user_id = id, username = %username, role = role.as_str(), "Created user");
        Ok(id)
    }

    pub fn create_questionnaire(&self, name: &str) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        insert_questionnaire(&conn, name)
    }

    pub fn create_question(
        &self,
        question: &str,
        question_type: QuestionType,
        options: &[String],
        allow_multiple_answers: bool,
    ) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        insert_question(&conn, question, question_type, options, allow_multiple_answers)
    }

    pub fn link_question(
        &self,
        questionnaire_id: i64,
        question_id: i64,
        priority: i64,
    ) -> Result<(), StoreError> {
        let conn = self.conn()?;
        insert_link(&conn, questionnaire_id, question_id, priority)
    }

    /// Writes every questionnaire of the catalog with its questions and links
    /// in one transaction.
    pub fn import_catalog(&self, catalog: &Catalog) -> Result<ImportSummary, StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_failed)?;
        let mut summary = ImportSummary::default();

        for entry in &catalog.questionnaires {
            let questionnaire_id = insert_questionnaire(&tx, &entry.name)?;
            summary.questionnaires += 1;

            for (position, question) in entry.questions.iter().enumerate() {
                let question_id = insert_question(
                    &tx,
                    &question.question,
                    question.question_type,
                    &question.options,
                    question.allow_multiple_answers,
                )?;
                let priority = question.priority.unwrap_or(position as i64 + 1);
                insert_link(&tx, questionnaire_id, question_id, priority)?;
                summary.questions += 1;
            }
        }

        tx.commit().map_err(query_failed)?;
        info!(
            questionnaires = summary.questionnaires,
            questions = summary.questions,
            "Imported catalog"
        );
        Ok(summary)
    }
}

fn insert_questionnaire(conn: &Connection, name: &str) -> Result<i64, StoreError> {
    conn.execute("INSERT INTO questionnaires (name) VALUES (?1)", params![name])
        .map_err(query_failed)?;
    Ok(conn.last_insert_rowid())
}

fn insert_question(
    conn: &Connection,
    question: &str,
    question_type: QuestionType,
    options: &[String],
    allow_multiple_answers: bool,
) -> Result<i64, StoreError> {
    let options_json = serde_json::to_string(options)?;

    conn.execute(
        r#"
        INSERT INTO questions (question, question_type, options, allow_multiple_answers)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            question,
            question_type.as_str(),
            options_json,
            allow_multiple_answers
        ],
    )
    .map_err(query_failed)?;
    Ok(conn.last_insert_rowid())
}

fn insert_link(
    conn: &Connection,
    questionnaire_id: i64,
    question_id: i64,
    priority: i64,
) -> Result<(), StoreError> {
    conn.execute(
        r#"
        INSERT INTO questionnaire_questions (questionnaire_id, question_id, priority)
        VALUES (?1, ?2, ?3)
        "#,
        params![questionnaire_id, question_id, priority],
    )
    .map_err(query_failed)?;
    Ok(())
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let role: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        role: UserRole::parse(&role),
    })
}

#[async_trait]
impl IntakeStore for SqliteIntakeStore {
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let conn = self.conn()?;

        conn.query_row(
            "SELECT id, username, password_hash, role FROM users WHERE username = ?1",
            params![username],
            user_from_row,
        )
        .optional()
        .map_err(query_failed)
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        let conn = self.conn()?;

        conn.query_row(
            "SELECT id, username, password_hash, role FROM users WHERE id = ?1",
            params![user_id],
            user_from_row,
        )
        .optional()
        .map_err(query_failed)
    }

    async fn get_questionnaire(&self, id: i64) -> Result<Option<Questionnaire>, StoreError> {
        let conn = self.conn()?;

        conn.query_row(
            "SELECT id, name FROM questionnaires WHERE id = ?1",
            params![id],
            |row| {
                Ok(Questionnaire {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .optional()
        .map_err(query_failed)
    }

    async fn list_questionnaires(&self) -> Result<Vec<Questionnaire>, StoreError> {
        let conn = self.conn()?;

        let mut stmt = conn
            .prepare("SELECT id, name FROM questionnaires ORDER BY id ASC")
            .map_err(query_failed)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Questionnaire {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .map_err(query_failed)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(query_failed)
    }

    async fn list_questionnaire_questions(
        &self,
        questionnaire_id: i64,
    ) -> Result<Vec<QuestionnaireQuestion>, StoreError> {
        let conn = self.conn()?;

        let mut stmt = conn
            .prepare(
                r#"
                SELECT questionnaire_id, question_id, priority
                FROM questionnaire_questions
                WHERE questionnaire_id = ?1
                ORDER BY priority ASC
                "#,
            )
            .map_err(query_failed)?;

        let rows = stmt
            .query_map(params![questionnaire_id], |row| {
                Ok(QuestionnaireQuestion {
                    questionnaire_id: row.get(0)?,
                    question_id: row.get(1)?,
                    priority: row.get(2)?,
                })
            })
            .map_err(query_failed)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(query_failed)
    }

    async fn get_questions(&self, ids: &[i64]) -> Result<Vec<Question>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.conn()?;
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT id, question, question_type, options, allow_multiple_answers \
             FROM questions WHERE id IN ({})",
            placeholders
        );

        let mut stmt = conn.prepare(&sql).map_err(query_failed)?;
        let rows = stmt
            .query_map(params_from_iter(ids.iter()), |row| {
                Ok(QuestionRow {
                    id: row.get(0)?,
                    question: row.get(1)?,
                    question_type: row.get(2)?,
                    options: row.get(3)?,
                    allow_multiple_answers: row.get(4)?,
                })
            })
            .map_err(query_failed)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_failed)?;

        rows.into_iter().map(QuestionRow::into_question).collect()
    }

    async fn get_answers(
        &self,
        user_id: i64,
        questionnaire_id: i64,
    ) -> Result<Vec<Answer>, StoreError> {
        let conn = self.conn()?;

        let mut stmt = conn
            .prepare(
                r#"
                SELECT user_id, questionnaire_id, question_id, answer_text
                FROM answers
                WHERE user_id = ?1 AND questionnaire_id = ?2
                ORDER BY id ASC
                "#,
            )
            .map_err(query_failed)?;

        let rows = stmt
            .query_map(params![user_id, questionnaire_id], |row| {
                Ok(Answer {
                    user_id: row.get(0)?,
                    questionnaire_id: row.get(1)?,
                    question_id: row.get(2)?,
                    answer_text: row.get(3)?,
                })
            })
            .map_err(query_failed)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(query_failed)
    }

    async fn upsert_answers(&self, answers: Vec<Answer>) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_failed)?;
        let now = Utc::now().timestamp();

        {
            let mut stmt = tx
                .prepare(
                    r#"
                    INSERT INTO answers
                        (user_id, questionnaire_id, question_id, answer_text, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                    ON CONFLICT (user_id, questionnaire_id, question_id)
                    DO UPDATE SET answer_text = excluded.answer_text,
                                  updated_at = excluded.updated_at
                    "#,
                )
                .map_err(query_failed)?;

            for answer in &answers {
                stmt.execute(params![
                    answer.user_id,
                    answer.questionnaire_id,
                    answer.question_id,
                    answer.answer_text,
                    now
                ])
                .map_err(query_failed)?;
            }
        }

        tx.commit().map_err(query_failed)?;
        Ok(())
    }

    async fn list_all_answers_with_user(&self) -> Result<Vec<AnswerOwner>, StoreError> {
        let conn = self.conn()?;

        let mut stmt = conn
            .prepare(
                r#"
                SELECT a.user_id, u.username, a.questionnaire_id
                FROM answers a
                LEFT JOIN users u ON u.id = a.user_id
                ORDER BY a.user_id ASC, a.id ASC
                "#,
            )
            .map_err(query_failed)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(AnswerOwner {
                    user_id: row.get(0)?,
                    username: row.get(1)?,
                    questionnaire_id: row.get(2)?,
                })
            })
            .map_err(query_failed)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(query_failed)
    }

    async fn get_user_answers_detailed(
        &self,
        user_id: i64,
    ) -> Result<Vec<DetailedAnswer>, StoreError> {
        let conn = self.conn()?;

        let mut stmt = conn
            .prepare(
                r#"
                SELECT q.question, NULLIF(qn.name, ''), a.answer_text
                FROM answers a
                LEFT JOIN questions q ON q.id = a.question_id
                LEFT JOIN questionnaires qn ON qn.id = a.questionnaire_id
                WHERE a.user_id = ?1
                ORDER BY a.id ASC
                "#,
            )
            .map_err(query_failed)?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                let question: Option<String> = row.get(0)?;
                Ok(DetailedAnswer {
                    question: question.unwrap_or_default(),
                    questionnaire_name: row.get(1)?,
                    answer_text: row.get(2)?,
                })
            })
            .map_err(query_failed)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(query_failed)
    }
}
