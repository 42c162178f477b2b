//! Typed builder for the store's PostgREST-style filter vocabulary.
//!
//! Filters render to `(column, "op.value")` query pairs so the HTTP client
//! handles URL encoding; values are never spliced into a raw query string.

use std::fmt::Write;

/// Embedded select used on listing reads.
pub const LISTING_SELECT: &str = "*,photos(*),regions(*),counties(*)";
/// Embedded select used on favourite reads.
pub const FAVOURITE_SELECT: &str = "*,listing:listings(*)";

#[derive(Debug, Clone)]
pub enum Predicate {
    Eq(&'static str, String),
    Gt(&'static str, String),
    Gte(&'static str, String),
    Lt(&'static str, String),
    Lte(&'static str, String),
    /// The one composite the API needs: listings whose region belongs to a
    /// county. Takes a numeric id only, so nothing user-controlled reaches
    /// the sub-select fragment.
    RegionsInCounty(i64),
}

impl Predicate {
    fn render(&self) -> (String, String) {
        match self {
            Predicate::Eq(col, v) => ((*col).to_string(), format!("eq.{}", quote(v))),
            Predicate::Gt(col, v) => ((*col).to_string(), format!("gt.{}", quote(v))),
            Predicate::Gte(col, v) => ((*col).to_string(), format!("gte.{}", quote(v))),
            Predicate::Lt(col, v) => ((*col).to_string(), format!("lt.{}", quote(v))),
            Predicate::Lte(col, v) => ((*col).to_string(), format!("lte.{}", quote(v))),
            Predicate::RegionsInCounty(county_id) => (
                "region_id".to_string(),
                format!("in.(select id from regions where county_id=eq.{county_id})"),
            ),
        }
    }
}

/// Quote values containing PostgREST-reserved characters so a crafted value
/// cannot smuggle extra operators into the expression.
fn quote(value: &str) -> String {
    if value.contains([',', '(', ')', '"', '\\']) {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('"');
        for c in value.chars() {
            if c == '"' || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('"');
        out
    } else {
        value.to_string()
    }
}

/// A conjunction of predicates plus optional pagination. There is no OR.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    predicates: Vec<Predicate>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &'static str, value: impl ToString) -> Self {
        self.predicates.push(Predicate::Eq(column, value.to_string()));
        self
    }

    pub fn gt(mut self, column: &'static str, value: impl ToString) -> Self {
        self.predicates.push(Predicate::Gt(column, value.to_string()));
        self
    }

    pub fn gte(mut self, column: &'static str, value: impl ToString) -> Self {
        self.predicates.push(Predicate::Gte(column, value.to_string()));
        self
    }

    pub fn lt(mut self, column: &'static str, value: impl ToString) -> Self {
        self.predicates.push(Predicate::Lt(column, value.to_string()));
        self
    }

    pub fn lte(mut self, column: &'static str, value: impl ToString) -> Self {
        self.predicates.push(Predicate::Lte(column, value.to_string()));
        self
    }

    pub fn regions_in_county(mut self, county_id: i64) -> Self {
        self.predicates.push(Predicate::RegionsInCounty(county_id));
        self
    }

    pub fn paginate(mut self, limit: i64, offset: i64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.limit.is_none() && self.offset.is_none()
    }

    /// Render as query pairs for `reqwest::RequestBuilder::query`.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> =
            self.predicates.iter().map(Predicate::render).collect();
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        pairs
    }

    /// Render as a single `a=op.v&b=op.v` expression, used for logging and
    /// by tests.
    pub fn to_expression(&self) -> String {
        let mut out = String::new();
        for (column, value) in self.to_query_pairs() {
            if !out.is_empty() {
                out.push('&');
            }
            let _ = write!(out, "{column}={value}");
        }
        out
    }
}
