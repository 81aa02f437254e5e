//! Request parameters: filter/search/sort/select plus page or cursor paging
//!
//! Filters are syntax only. A clause is `field[.subfield]*:[op]value` and
//! clauses are comma-separated; whether a field or value makes sense is for
//! the service to decide (a bad filter comes back as HTTP 400).

use std::fmt::Display;

use oadigest_core::ClientError;

/// Largest page size the service accepts
pub const PER_PAGE_MAX: u32 = 200;

/// Cursor value that starts a cursor traversal
pub const START_CURSOR: &str = "*";

/// Query parameters in transport order
pub type Params = Vec<(&'static str, String)>;

/// How an exhaustive listing walks the result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Follow `meta.next_cursor`; no depth limit
    Cursor,
    /// Increment `page`; limited by the service's offset depth
    Offset,
}

/// Structured request for one page (or the start of a traversal)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filter: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub select: Option<String>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub cursor: Option<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Traversal mode implied by the request shape.
    ///
    /// A page number without a cursor means offset paging; everything else
    /// (including both set) is cursor paging.
    pub fn traversal(&self) -> Traversal {
        if self.page.is_some() && self.cursor.is_none() {
            Traversal::Offset
        } else {
            Traversal::Cursor
        }
    }

    /// Effective page size after applying the default
    pub fn effective_per_page(&self, default_per_page: u32) -> u32 {
        self.per_page.unwrap_or(default_per_page)
    }

    /// Build transport parameters.
    ///
    /// When both `page` and `cursor` are set, only `cursor` is sent.
    pub fn to_params(&self, default_per_page: u32) -> Result<Params, ClientError> {
        let per_page = self.effective_per_page(default_per_page);
        if !(1..=PER_PAGE_MAX).contains(&per_page) {
            return Err(ClientError::InvalidQuery(format!(
                "per_page must be in 1..={PER_PAGE_MAX}, got {per_page}"
            )));
        }

        let mut params = Params::new();
        if let Some(filter) = &self.filter {
            params.push(("filter", filter.clone()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(sort) = &self.sort {
            params.push(("sort", sort.clone()));
        }
        if let Some(select) = &self.select {
            params.push(("select", select.clone()));
        }
        params.push(("per-page", per_page.to_string()));
        match (&self.cursor, self.page) {
            (Some(cursor), _) => params.push(("cursor", cursor.clone())),
            (None, Some(page)) => params.push(("page", page.to_string())),
            (None, None) => {}
        }
        Ok(params)
    }
}

/// Comparison operator for a filter clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Not,
    Gt,
    Ge,
    Lt,
    Le,
}

impl FilterOp {
    fn prefix(self) -> &'static str {
        match self {
            Self::Eq => "",
            Self::Not => "!",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}

/// Builds a filter string clause by clause
///
/// ```
/// use oadigest_openalex::query::FilterBuilder;
///
/// let filter = FilterBuilder::new()
///     .eq("publication_year", 2023)
///     .gt("cited_by_count", 100)
///     .any_of("type", ["article", "review"])
///     .build();
/// assert_eq!(filter, "publication_year:2023,cited_by_count:>100,type:article|review");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterBuilder {
    clauses: Vec<String>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clause(mut self, field: &str, op: FilterOp, value: impl Display) -> Self {
        self.clauses.push(format!("{field}:{}{value}", op.prefix()));
        self
    }

    pub fn eq(self, field: &str, value: impl Display) -> Self {
        self.clause(field, FilterOp::Eq, value)
    }

    /// Negation: `field:!value`
    pub fn not(self, field: &str, value: impl Display) -> Self {
        self.clause(field, FilterOp::Not, value)
    }

    pub fn gt(self, field: &str, value: impl Display) -> Self {
        self.clause(field, FilterOp::Gt, value)
    }

    pub fn ge(self, field: &str, value: impl Display) -> Self {
        self.clause(field, FilterOp::Ge, value)
    }

    pub fn lt(self, field: &str, value: impl Display) -> Self {
        self.clause(field, FilterOp::Lt, value)
    }

    pub fn le(self, field: &str, value: impl Display) -> Self {
        self.clause(field, FilterOp::Le, value)
    }

    /// OR within one field: `field:a|b|c`
    pub fn any_of<I, V>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        let joined = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("|");
        self.clauses.push(format!("{field}:{joined}"));
        self
    }

    /// Append a pre-formatted clause verbatim
    pub fn raw(mut self, clause: impl Into<String>) -> Self {
        self.clauses.push(clause.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn build(&self) -> String {
        self.clauses.join(",")
    }
}

impl From<FilterBuilder> for String {
    fn from(builder: FilterBuilder) -> Self {
        builder.build()
    }
}
