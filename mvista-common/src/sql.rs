//! Parameterized SQL construction
//!
//! Catalog queries are assembled from optional filters. [`SqlBuilder`] keeps
//! the SQL text and the positional parameter list in lockstep: every call to
//! [`SqlBuilder::bind`] appends one value and hands back its `$N` placeholder,
//! so placeholder numbering always matches parameter order. A filter that is
//! not present is simply never pushed.
//!
//! Raw text goes in through [`SqlBuilder::push`] and must be a static fragment
//! or an identifier taken from a closed enum. User values always go through
//! `bind`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// One positional query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
    Real(f64),
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl From<&String> for SqlParam {
    fn from(v: &String) -> Self {
        SqlParam::Text(v.clone())
    }
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Int(v)
    }
}

impl From<f64> for SqlParam {
    fn from(v: f64) -> Self {
        SqlParam::Real(v)
    }
}

/// Incremental builder for a parameterized query
#[derive(Debug, Default)]
pub struct SqlBuilder {
    sql: String,
    params: Vec<SqlParam>,
}

impl SqlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a static SQL fragment
    pub fn push(&mut self, fragment: &str) -> &mut Self {
        self.sql.push_str(fragment);
        self
    }

    /// Register a parameter and return its placeholder
    pub fn bind(&mut self, param: impl Into<SqlParam>) -> String {
        self.params.push(param.into());
        format!("${}", self.params.len())
    }

    /// Register every item and return the comma separated placeholders
    pub fn bind_list<I, T>(&mut self, items: I) -> String
    where
        I: IntoIterator<Item = T>,
        T: Into<SqlParam>,
    {
        items
            .into_iter()
            .map(|item| self.bind(item))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Append `LIMIT`/`OFFSET` for the positive values only.
    ///
    /// SQLite has no bare `OFFSET`, so an offset without a limit gets the
    /// literal `LIMIT -1` (no limit).
    pub fn push_page(&mut self, limit: Option<i64>, offset: Option<i64>) -> &mut Self {
        let limit = limit.filter(|l| *l > 0);
        let offset = offset.filter(|o| *o > 0);
        match limit {
            Some(l) => {
                let p = self.bind(l);
                self.push(&format!(" LIMIT {}", p));
            }
            None if offset.is_some() => {
                self.push(" LIMIT -1");
            }
            None => {}
        }
        if let Some(o) = offset {
            let p = self.bind(o);
            self.push(&format!(" OFFSET {}", p));
        }
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn finish(self) -> BuiltQuery {
        BuiltQuery {
            sql: self.sql,
            params: self.params,
        }
    }
}

/// Finished query text plus its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl BuiltQuery {
    /// Distinct `$N` placeholder indices appearing in the SQL text
    pub fn placeholders(&self) -> BTreeSet<usize> {
        placeholder_indices(&self.sql)
    }

    /// True when the placeholders are exactly `$1..=$len`
    pub fn is_consistent(&self) -> bool {
        self.placeholders() == (1..=self.params.len()).collect()
    }
}

/// Collect the `$N` placeholder indices of a SQL string
pub fn placeholder_indices(sql: &str) -> BTreeSet<usize> {
    let mut found = BTreeSet::new();
    let bytes = sql.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end > start {
                if let Ok(n) = sql[start..end].parse() {
                    found.insert(n);
                }
            }
            i = end.max(start);
        } else {
            i += 1;
        }
    }
    found
}

/// `LIKE` pattern matching `term` anywhere
pub fn like_pattern(term: &str) -> String {
    format!("%{}%", term)
}

#[cfg(feature = "sqlx")]
mod exec {
    use super::{BuiltQuery, SqlParam};
    use sqlx::query::Query;
    use sqlx::sqlite::{SqliteArguments, SqlitePool, SqliteRow};
    use sqlx::Sqlite;

    impl BuiltQuery {
        fn query(&self) -> Query<'_, Sqlite, SqliteArguments<'_>> {
            let mut q = sqlx::query(&self.sql);
            for param in &self.params {
                q = match param {
                    SqlParam::Text(v) => q.bind(v.clone()),
                    SqlParam::Int(v) => q.bind(*v),
                    SqlParam::Real(v) => q.bind(*v),
                };
            }
            q
        }

        pub async fn fetch_all(&self, pool: &SqlitePool) -> crate::Result<Vec<SqliteRow>> {
            Ok(self.query().fetch_all(pool).await?)
        }

        pub async fn fetch_one(&self, pool: &SqlitePool) -> crate::Result<SqliteRow> {
            Ok(self.query().fetch_one(pool).await?)
        }

        pub async fn fetch_optional(&self, pool: &SqlitePool) -> crate::Result<Option<SqliteRow>> {
            Ok(self.query().fetch_optional(pool).await?)
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(Error::InvalidInput(format!("invalid sort order: {}", s)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_numbers_in_order() {
        let mut b = SqlBuilder::new();
        let p1 = b.bind("a");
        let p2 = b.bind(3i64);
        let p3 = b.bind(0.5f64);
        assert_eq!((p1.as_str(), p2.as_str(), p3.as_str()), ("$1", "$2", "$3"));
        let q = b.finish();
        assert_eq!(
            q.params,
            vec![
                SqlParam::Text("a".into()),
                SqlParam::Int(3),
                SqlParam::Real(0.5)
            ]
        );
    }

    #[test]
    fn test_bind_list() {
        let mut b = SqlBuilder::new();
        b.bind("first");
        let list = b.bind_list(["x", "y", "z"]);
        assert_eq!(list, "$2, $3, $4");
        assert_eq!(b.finish().params.len(), 4);
    }

    #[test]
    fn test_push_page_variants() {
        let mut b = SqlBuilder::new();
        b.push("SELECT 1").push_page(None, None);
        assert_eq!(b.sql(), "SELECT 1");

        let mut b = SqlBuilder::new();
        b.push("SELECT 1").push_page(Some(10), Some(20));
        assert_eq!(b.sql(), "SELECT 1 LIMIT $1 OFFSET $2");

        let mut b = SqlBuilder::new();
        b.push("SELECT 1").push_page(Some(-1), Some(0));
        assert_eq!(b.sql(), "SELECT 1");

        let mut b = SqlBuilder::new();
        b.push("SELECT 1").push_page(None, Some(5));
        let q = b.finish();
        assert_eq!(q.sql, "SELECT 1 LIMIT -1 OFFSET $1");
        assert_eq!(q.params, vec![SqlParam::Int(5)]);
    }

    #[test]
    fn test_placeholder_indices() {
        let set = placeholder_indices("a = $1 AND b IN ($2, $3) OR c = $1 LIMIT $10");
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 10]);
        assert!(placeholder_indices("no params $ here").is_empty());
    }

    #[test]
    fn test_is_consistent() {
        let mut b = SqlBuilder::new();
        let p = b.bind("id");
        b.push(&format!("x = {p} AND y <> {p}"));
        assert!(b.finish().is_consistent());

        let broken = BuiltQuery {
            sql: "x = $2".into(),
            params: vec![SqlParam::Int(1)],
        };
        assert!(!broken.is_consistent());
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("sideways".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("pop"), "%pop%");
    }
}
