//! Builds parameterized UPDATE statements.

use super::params::SqlValue;

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: SqlValue) {
        self.params.push(v);
    }
}

/// `UPDATE {table} SET a = ?, b = ? WHERE id = ?` for the given assignments.
/// Returns None when there is nothing to set.
pub fn update_by_id(table: &str, assignments: Vec<(&'static str, SqlValue)>, id: i64) -> Option<QueryBuf> {
    if assignments.is_empty() {
        return None;
    }
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(assignments.len());
    for (column, value) in assignments {
        sets.push(format!("{} = ?", column));
        q.push_param(value);
    }
    q.push_param(SqlValue::Int(id));
    q.sql = format!("UPDATE {} SET {} WHERE id = ?", table, sets.join(", "));
    Some(q)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_lists_columns_then_id() {
        let q = update_by_id(
            "pets",
            vec![("name", SqlValue::from("Kyo".to_string())), ("age", SqlValue::Int(2))],
            7,
        )
        .unwrap();
        assert_eq!(q.sql, "UPDATE pets SET name = ?, age = ? WHERE id = ?");
        assert_eq!(
            q.params,
            vec![SqlValue::Text("Kyo".into()), SqlValue::Int(2), SqlValue::Int(7)]
        );
    }

    #[test]
    fn empty_update_builds_nothing() {
        assert!(update_by_id("pets", Vec::new(), 1).is_none());
    }
}
