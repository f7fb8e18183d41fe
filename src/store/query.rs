use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, String),
    Neq(String, String),
    Lte(String, String),
}

/// Row-level query composition: equality/range filters plus ordering and a
/// row limit. The Supabase client serializes this to PostgREST query
/// parameters; the in-memory store evaluates it directly.
#[derive(Debug, Clone, Default)]
pub struct Query {
    filters: Vec<Filter>,
    order: Option<(String, SortDirection)>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push(Filter::Eq(column.to_string(), value.to_string()));
        self
    }

    pub fn neq(mut self, column: &str, value: &str) -> Self {
        self.filters.push(Filter::Neq(column.to_string(), value.to_string()));
        self
    }

    pub fn lte(mut self, column: &str, value: &str) -> Self {
        self.filters.push(Filter::Lte(column.to_string(), value.to_string()));
        self
    }

    pub fn order(mut self, column: &str, direction: SortDirection) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// PostgREST query-string form: `status=eq.active&order=end_date.asc&limit=5`.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for filter in &self.filters {
            let (column, operator, value) = match filter {
                Filter::Eq(c, v) => (c, "eq", v),
                Filter::Neq(c, v) => (c, "neq", v),
                Filter::Lte(c, v) => (c, "lte", v),
            };
            pairs.push((column.clone(), format!("{}.{}", operator, value)));
        }
        if let Some((column, direction)) = &self.order {
            pairs.push(("order".to_string(), format!("{}.{}", column, direction.keyword())));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    pub(crate) fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|filter| {
            let (column, value) = match filter {
                Filter::Eq(c, v) | Filter::Neq(c, v) | Filter::Lte(c, v) => (c, v),
            };
            let field = match row.get(column) {
                Some(field) if !field.is_null() => field_as_string(field),
                _ => return false,
            };
            match filter {
                Filter::Eq(..) => field == *value,
                Filter::Neq(..) => field != *value,
                Filter::Lte(..) => field.as_str() <= value.as_str(),
            }
        })
    }

    /// Evaluate the whole query against an in-memory row set.
    pub(crate) fn apply(&self, rows: Vec<Value>) -> Vec<Value> {
        let mut rows: Vec<Value> = rows.into_iter().filter(|row| self.matches(row)).collect();
        if let Some((column, direction)) = &self.order {
            rows.sort_by(|a, b| {
                let left = a.get(column).map(field_as_string).unwrap_or_default();
                let right = b.get(column).map(field_as_string).unwrap_or_default();
                match direction {
                    SortDirection::Asc => left.cmp(&right),
                    SortDirection::Desc => right.cmp(&left),
                }
            });
        }
        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }
        rows
    }
}

fn field_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
