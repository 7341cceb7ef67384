///! Composable lookup over the `titles` table
///!
///! Every predicate is optional and ANDed with the others. Values only ever
///! travel as positional parameters.

use rusqlite::types::Value;

use super::schema::TITLE_COLUMNS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleOrder {
    #[default]
    ById,
    /// Used when listing the versions of one name
    ByColorThenCondition,
}

impl TitleOrder {
    fn as_sql(&self) -> &'static str {
        match self {
            TitleOrder::ById => "id",
            TitleOrder::ByColorThenCondition => "rarity_color, obtain_condition",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleQuery {
    name_contains: Option<String>,
    name_equals: Option<String>,
    color: Option<String>,
    available: Option<bool>,
    order: TitleOrder,
}

impl TitleQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-sensitive substring match on the title name
    pub fn name_contains(mut self, pattern: impl Into<String>) -> Self {
        self.name_contains = Some(pattern.into());
        self
    }

    pub fn name_equals(mut self, name: impl Into<String>) -> Self {
        self.name_equals = Some(name.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    pub fn order_by(mut self, order: TitleOrder) -> Self {
        self.order = order;
        self
    }

    /// Build the SELECT statement and its parameters
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(pattern) = &self.name_contains {
            // instr() is case-sensitive and has no wildcard characters, unlike LIKE
            clauses.push("instr(title_name, ?) > 0");
            params.push(Value::Text(pattern.clone()));
        }
        if let Some(name) = &self.name_equals {
            clauses.push("title_name = ?");
            params.push(Value::Text(name.clone()));
        }
        if let Some(color) = &self.color {
            clauses.push("rarity_color = ?");
            params.push(Value::Text(color.clone()));
        }
        if let Some(available) = self.available {
            clauses.push("is_available = ?");
            params.push(Value::Integer(available as i64));
        }

        let mut sql = format!("SELECT {} FROM titles", TITLE_COLUMNS);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(self.order.as_sql());

        (sql, params)
    }
}
