//! List query assembly: pagination, search and sorting
//!
//! Request parameters arrive as loose strings and are resolved into a
//! `ListQuery` with clamped paging and an allow-listed sort column. Only
//! allow-listed column identifiers are ever written into SQL text; the search
//! term and paging values are always bound.

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;
/// Highest page whose offset still fits in an `i64`
pub const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

/// Raw list parameters from the query string
///
/// Kept as strings so an unparsable value falls back to its default instead
/// of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Only a case-insensitive `asc` sorts ascending
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Allow-list mapping external sort keys to SQL column expressions
#[derive(Debug)]
pub struct SortSpec {
    pub columns: &'static [(&'static str, &'static str)],
    /// Key used when the requested one is missing or unknown
    pub default: &'static str,
}

impl SortSpec {
    pub fn column(&self, key: Option<&str>) -> &'static str {
        let key = key.map(str::trim).unwrap_or(self.default);
        self.lookup(key)
            .or_else(|| self.lookup(self.default))
            .unwrap_or("created_at")
    }

    fn lookup(&self, key: &str) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, column)| *column)
    }
}

/// Resolved, safe list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: i64,
    pub limit: i64,
    pub search: Option<String>,
    pub sort_column: &'static str,
    pub direction: SortDirection,
}

impl ListQuery {
    pub fn resolve(params: &ListParams, sorting: &SortSpec) -> Self {
        let page = parse_positive(params.page.as_deref())
            .unwrap_or(DEFAULT_PAGE)
            .min(MAX_PAGE);
        let limit = parse_positive(params.limit.as_deref())
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);

        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            page,
            limit,
            search,
            sort_column: sorting.column(params.sort.as_deref()),
            direction: SortDirection::parse(params.order.as_deref()),
        }
    }

    /// Never negative: `page` is in `1..=MAX_PAGE`
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// `%term%` with LIKE metacharacters escaped
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|term| format!("%{}%", escape_like(term)))
    }

    /// Append `<prefix> (col ILIKE $n OR ...)` when a search term is present
    ///
    /// `prefix` is `" WHERE "` or `" AND "` depending on the base statement.
    pub fn push_search(
        &self,
        builder: &mut QueryBuilder<'_, Postgres>,
        prefix: &str,
        columns: &[&str],
    ) {
        let Some(pattern) = self.search_pattern() else {
            return;
        };
        if columns.is_empty() {
            return;
        }

        builder.push(prefix).push("(");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            builder
                .push(*column)
                .push(" ILIKE ")
                .push_bind(pattern.clone());
        }
        builder.push(")");
    }

    /// Append `ORDER BY <column> <dir> LIMIT $n OFFSET $m`
    pub fn push_order_and_page(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder
            .push(" ORDER BY ")
            .push(self.sort_column)
            .push(" ")
            .push(self.direction.as_sql())
            .push(" LIMIT ")
            .push_bind(self.limit)
            .push(" OFFSET ")
            .push_bind(self.offset());
    }

    pub fn into_page<T>(&self, items: Vec<T>, total: i64) -> Page<T> {
        Page {
            items,
            page: self.page,
            limit: self.limit,
            total,
        }
    }
}

/// One page of a list endpoint
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
        }
    }
}

fn parse_positive(value: Option<&str>) -> Option<i64> {
    let parsed = value?.trim().parse::<i64>().ok()?;
    (parsed > 0).then_some(parsed)
}

/// Escape LIKE wildcard characters in a search string
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
