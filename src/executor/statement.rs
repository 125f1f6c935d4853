//! Parameterized SQL statement

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{Query, QueryAs};
use sqlx::{FromRow, Postgres};

use crate::criteria::Param;

/// One parameterized statement: SQL text plus ordered parameters.
/// Statements are inert data until handed to the executor, so command
/// variants can assemble a whole batch before anything touches storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<Param>,
    returns_id: bool,
}

impl Statement {
    /// A read or a mutation reporting affected rows
    pub fn new(sql: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            sql: sql.into(),
            params,
            returns_id: false,
        }
    }

    /// An INSERT whose first result column is the generated id
    /// (`… RETURNING id`)
    pub fn returning_id(sql: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            sql: sql.into(),
            params,
            returns_id: true,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn returns_id(&self) -> bool {
        self.returns_id
    }

    /// Bind parameters onto an untyped sqlx query
    pub(crate) fn as_query(&self) -> Query<'_, Postgres, PgArguments> {
        let mut query = sqlx::query(&self.sql);
        for param in &self.params {
            query = bind(query, param);
        }
        query
    }

    /// Bind parameters onto a row-mapped sqlx query
    pub(crate) fn as_query_as<T>(&self) -> QueryAs<'_, Postgres, T, PgArguments>
    where
        T: for<'r> FromRow<'r, PgRow>,
    {
        let mut query = sqlx::query_as::<Postgres, T>(&self.sql);
        for param in &self.params {
            query = bind_as(query, param);
        }
        query
    }
}

fn bind<'q>(
    query: Query<'q, Postgres, PgArguments>,
    param: &Param,
) -> Query<'q, Postgres, PgArguments> {
    match param {
        Param::Int(v) => query.bind(*v),
        Param::OptInt(v) => query.bind(*v),
        Param::SmallInt(v) => query.bind(*v),
        Param::Decimal(v) => query.bind(*v),
        Param::OptDecimal(v) => query.bind(*v),
        Param::Text(v) => query.bind(v.clone()),
        Param::OptText(v) => query.bind(v.clone()),
        Param::Date(v) => query.bind(*v),
        Param::OptDate(v) => query.bind(*v),
        Param::Timestamp(v) => query.bind(*v),
    }
}

fn bind_as<'q, T>(
    query: QueryAs<'q, Postgres, T, PgArguments>,
    param: &Param,
) -> QueryAs<'q, Postgres, T, PgArguments> {
    match param {
        Param::Int(v) => query.bind(*v),
        Param::OptInt(v) => query.bind(*v),
        Param::SmallInt(v) => query.bind(*v),
        Param::Decimal(v) => query.bind(*v),
        Param::OptDecimal(v) => query.bind(*v),
        Param::Text(v) => query.bind(v.clone()),
        Param::OptText(v) => query.bind(v.clone()),
        Param::Date(v) => query.bind(*v),
        Param::OptDate(v) => query.bind(*v),
        Param::Timestamp(v) => query.bind(*v),
    }
}
