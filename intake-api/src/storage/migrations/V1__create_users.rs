/// Create the users table holding login accounts
pub fn migration() -> String {
    r#"
CREATE TABLE users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'standard' CHECK (role IN ('admin', 'standard')),
    created_at INTEGER NOT NULL
);
"#
    .to_string()
}
