use serde::{Deserialize, Serialize};

use super::{
    SqlFromClause, SqlGroupByClause, SqlOffsetLimitClause, SqlOrderByClause, SqlSelectClause, SqlWhereClause,
};

/// A full query. Only the select clause is mandatory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlQuery {
    pub select_clause: SqlSelectClause,
    pub from_clause: Option<SqlFromClause>,
    pub where_clause: Option<SqlWhereClause>,
    pub group_by_clause: Option<SqlGroupByClause>,
    pub order_by_clause: Option<SqlOrderByClause>,
    pub offset_limit_clause: Option<SqlOffsetLimitClause>,
}

impl SqlQuery {
    pub fn new(select_clause: SqlSelectClause) -> Self {
        Self {
            select_clause,
            from_clause: None,
            where_clause: None,
            group_by_clause: None,
            order_by_clause: None,
            offset_limit_clause: None,
        }
    }

    pub fn with_from(mut self, from_clause: SqlFromClause) -> Self {
        self.from_clause = Some(from_clause);
        self
    }

    pub fn with_where(mut self, where_clause: SqlWhereClause) -> Self {
        self.where_clause = Some(where_clause);
        self
    }

    pub fn with_group_by(mut self, group_by_clause: SqlGroupByClause) -> Self {
        self.group_by_clause = Some(group_by_clause);
        self
    }

    pub fn with_order_by(mut self, order_by_clause: SqlOrderByClause) -> Self {
        self.order_by_clause = Some(order_by_clause);
        self
    }

    pub fn with_offset_limit(mut self, offset_limit_clause: SqlOffsetLimitClause) -> Self {
        self.offset_limit_clause = Some(offset_limit_clause);
        self
    }
}

/// The root of a parsed query text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlProgram {
    pub query: SqlQuery,
}

impl SqlProgram {
    pub fn new(query: SqlQuery) -> Self {
        Self { query }
    }
}
