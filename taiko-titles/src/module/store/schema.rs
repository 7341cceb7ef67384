pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS titles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title_name TEXT NOT NULL,
    is_available INTEGER NOT NULL,    -- 1: obtainable, 0: retired
    rarity_color TEXT NOT NULL,
    obtain_condition TEXT NOT NULL,
    tips TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(title_name, rarity_color, obtain_condition)
);

CREATE INDEX IF NOT EXISTS idx_titles_color ON titles(rarity_color);
";

/// Column list matching [`super::row_to_record`]
pub const TITLE_COLUMNS: &str =
    "id, title_name, is_available, rarity_color, obtain_condition, tips, created_at, updated_at";
