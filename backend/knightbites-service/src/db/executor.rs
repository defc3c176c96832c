//! Parameter-bound statement execution
//!
//! Statements are assembled only from `&'static str` clauses and reference
//! caller values through `${name}` placeholders. Compilation turns each
//! placeholder into a positional `$n` and collects the values to bind, so a
//! caller-supplied value never becomes part of the SQL text.

use crate::config::SERVICE_NAME;
use crate::metrics::{QUERY_DURATION_SECONDS, QUERY_TOTAL};
use chrono::{DateTime, Utc};
use db_pool::acquire_with_metrics;
use sqlx::error::ErrorKind;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, PgPool, Postgres};
use std::collections::HashMap;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("statement {statement} references unbound parameter `{name}`")]
    MissingParam {
        statement: &'static str,
        name: String,
    },

    #[error("statement {statement} has a malformed placeholder")]
    MalformedTemplate { statement: &'static str },

    #[error("statement {statement} expected exactly one row, got none")]
    NoRows { statement: &'static str },

    #[error("statement {statement} expected at most one row, got {count}")]
    MultipleRows {
        statement: &'static str,
        count: usize,
    },

    #[error("constraint violation ({constraint}): {message}")]
    Constraint { constraint: String, message: String },

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl QueryError {
    /// Short label used in metrics and production logs
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::MissingParam { .. } => "missing_param",
            QueryError::MalformedTemplate { .. } => "malformed_template",
            QueryError::NoRows { .. } => "no_rows",
            QueryError::MultipleRows { .. } => "multiple_rows",
            QueryError::Constraint { .. } => "constraint",
            QueryError::Database(_) => "database",
        }
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if matches!(
                db_err.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            ) {
                return QueryError::Constraint {
                    constraint: db_err.constraint().unwrap_or("unnamed").to_string(),
                    message: db_err.message().to_string(),
                };
            }
        }
        QueryError::Database(err)
    }
}

/// A value bound out-of-band to a placeholder.
///
/// Each variant carries an `Option` so a SQL NULL keeps its column type.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(Option<i32>),
    Text(Option<String>),
    Timestamp(Option<DateTime<Utc>>),
}

impl ParamValue {
    fn bind_to<'q, O>(
        &self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        match self {
            ParamValue::Int(v) => query.bind(*v),
            ParamValue::Text(v) => query.bind(v.clone()),
            ParamValue::Timestamp(v) => query.bind(*v),
        }
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(Some(v))
    }
}

impl From<Option<i32>> for ParamValue {
    fn from(v: Option<i32>) -> Self {
        ParamValue::Int(v)
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(Some(v))
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(Some(v.to_string()))
    }
}

impl From<Option<&str>> for ParamValue {
    fn from(v: Option<&str>) -> Self {
        ParamValue::Text(v.map(str::to_string))
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(v: DateTime<Utc>) -> Self {
        ParamValue::Timestamp(Some(v))
    }
}

impl From<Option<DateTime<Utc>>> for ParamValue {
    fn from(v: Option<DateTime<Utc>>) -> Self {
        ParamValue::Timestamp(v)
    }
}

/// Placeholder name to value mapping
#[derive(Debug, Clone, Default)]
pub struct Params(HashMap<&'static str, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Into<ParamValue>) -> Self {
        self.0.insert(name, value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }
}

/// A named statement built from fixed clauses
#[derive(Debug, Clone)]
pub struct Statement {
    name: &'static str,
    clauses: Vec<&'static str>,
}

/// SQL text with positional placeholders plus the values in bind order
#[derive(Debug, PartialEq)]
pub struct CompiledStatement {
    pub sql: String,
    pub values: Vec<ParamValue>,
}

impl Statement {
    pub fn new(name: &'static str, clause: &'static str) -> Self {
        Self {
            name,
            clauses: vec![clause],
        }
    }

    /// Append another fixed clause
    pub fn then(mut self, clause: &'static str) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn text(&self) -> String {
        self.clauses.join(" ")
    }

    /// Rewrite `${name}` placeholders to `$1..$n`.
    ///
    /// Names are numbered in order of first appearance; a repeated name
    /// reuses its number.
    pub fn compile(&self, params: &Params) -> Result<CompiledStatement, QueryError> {
        let text = self.text();
        let mut sql = String::with_capacity(text.len());
        let mut names: Vec<&str> = Vec::new();
        let mut values = Vec::new();
        let mut rest = text.as_str();

        while let Some(start) = rest.find("${") {
            sql.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find('}').ok_or(QueryError::MalformedTemplate {
                statement: self.name,
            })?;
            let name = &after[..end];
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(QueryError::MalformedTemplate {
                    statement: self.name,
                });
            }

            let index = match names.iter().position(|n| *n == name) {
                Some(i) => i + 1,
                None => {
                    let value = params.get(name).ok_or_else(|| QueryError::MissingParam {
                        statement: self.name,
                        name: name.to_string(),
                    })?;
                    names.push(name);
                    values.push(value.clone());
                    names.len()
                }
            };
            sql.push('$');
            sql.push_str(&index.to_string());
            rest = &after[end + 1..];
        }
        sql.push_str(rest);

        Ok(CompiledStatement { sql, values })
    }
}

/// Row count a caller expects from a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Zero or one row
    OneOrNone,
    /// Exactly one row
    One,
    /// Any number of rows
    Many,
}

/// Result shape of an executed statement
#[derive(Debug, PartialEq)]
pub enum Outcome<T> {
    None,
    One(T),
    Many(Vec<T>),
}

impl<T> Outcome<T> {
    /// Check `rows` against the expected cardinality
    pub fn from_rows(
        statement: &'static str,
        cardinality: Cardinality,
        mut rows: Vec<T>,
    ) -> Result<Self, QueryError> {
        match (cardinality, rows.len()) {
            (Cardinality::Many, _) => Ok(Outcome::Many(rows)),
            (Cardinality::OneOrNone, 0) => Ok(Outcome::None),
            (Cardinality::One, 0) => Err(QueryError::NoRows { statement }),
            (Cardinality::One | Cardinality::OneOrNone, 1) => {
                Ok(rows.pop().map_or(Outcome::None, Outcome::One))
            }
            (_, count) => Err(QueryError::MultipleRows { statement, count }),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Outcome::None => "none",
            Outcome::One(_) => "one",
            Outcome::Many(_) => "many",
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Outcome::One(row) => Some(row),
            Outcome::None => None,
            Outcome::Many(mut rows) => rows.pop(),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Outcome::None => Vec::new(),
            Outcome::One(row) => vec![row],
            Outcome::Many(rows) => rows,
        }
    }
}

/// Shared handle to the store, cloned into every worker
#[derive(Clone)]
pub struct Executor {
    pool: PgPool,
}

impl Executor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run `statement` with `params` bound and check the row count.
    pub async fn fetch<T>(
        &self,
        statement: &Statement,
        params: &Params,
        cardinality: Cardinality,
    ) -> Result<Outcome<T>, QueryError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let start = Instant::now();
        let result = match statement.compile(params) {
            Ok(compiled) => self
                .run::<T>(&compiled)
                .await
                .and_then(|rows| Outcome::from_rows(statement.name(), cardinality, rows)),
            Err(err) => Err(err),
        };

        QUERY_DURATION_SECONDS
            .with_label_values(&[statement.name()])
            .observe(start.elapsed().as_secs_f64());
        let outcome = match &result {
            Ok(outcome) => outcome.label(),
            Err(err) => err.kind(),
        };
        QUERY_TOTAL
            .with_label_values(&[statement.name(), outcome])
            .inc();

        tracing::debug!(
            statement = statement.name(),
            outcome,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "statement executed"
        );

        result
    }

    async fn run<T>(&self, compiled: &CompiledStatement) -> Result<Vec<T>, QueryError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut conn = acquire_with_metrics(&self.pool, SERVICE_NAME).await?;

        let mut query = sqlx::query_as::<_, T>(&compiled.sql);
        for value in &compiled.values {
            query = value.bind_to(query);
        }

        Ok(query.fetch_all(&mut *conn).await?)
    }

    pub async fn one<T>(&self, statement: &Statement, params: &Params) -> Result<T, QueryError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        self.fetch(statement, params, Cardinality::One)
            .await?
            .into_option()
            .ok_or(QueryError::NoRows {
                statement: statement.name(),
            })
    }

    pub async fn one_or_none<T>(
        &self,
        statement: &Statement,
        params: &Params,
    ) -> Result<Option<T>, QueryError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        Ok(self
            .fetch(statement, params, Cardinality::OneOrNone)
            .await?
            .into_option())
    }

    pub async fn many<T>(&self, statement: &Statement, params: &Params) -> Result<Vec<T>, QueryError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        Ok(self
            .fetch(statement, params, Cardinality::Many)
            .await?
            .into_vec())
    }
}
