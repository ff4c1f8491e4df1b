//! Record filtering.
//!
//! Filtering is advisory: criteria that make no sense (e.g. a text query
//! without any fields to search) constrain nothing rather than failing.

use log::trace;

use crate::{Record, Value};

/// An exact-match constraint on a single field.
///
/// A record matches if the field equals the value, or if the field is an
/// array containing the value. A selector without a value matches every
/// record.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    field: String,
    value: Option<Value>,
}

impl Selector {
    /// Constructor.
    pub fn new<F, V>(field: F, value: Option<V>) -> Self
    where
        F: AsRef<str>,
        V: Into<Value>,
    {
        Self {
            field: field.as_ref().to_string(),
            value: value.map(Into::into),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Whether this selector constrains anything at all.
    pub fn is_active(&self) -> bool {
        self.value.is_some()
    }

    pub fn matches(&self, record: &Record) -> bool {
        match &self.value {
            None => true,
            Some(wanted) => record
                .get(&self.field)
                .map(|actual| actual.matches(wanted))
                .unwrap_or(false),
        }
    }
}

/// The set of active filter constraints for a query.
///
/// All constraints must hold for a record to match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    // Stored lowercase. Empty means no query.
    query: String,
    search_fields: Vec<String>,
    selectors: Vec<Selector>,
}

impl Criteria {
    /// Criteria matching every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text query, matched case-insensitively as a substring of
    /// the searchable fields.
    pub fn with_query<Q: AsRef<str>>(mut self, query: Q) -> Self {
        self.query = query.as_ref().to_lowercase();
        self
    }

    /// Designate the fields searched by the free-text query.
    pub fn search_in<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.search_fields = fields.into_iter().map(|f| f.as_ref().to_string()).collect();
        self
    }

    /// Add an exact-match selector. A `None` value is accepted and ignored,
    /// which mirrors an unset choice in a filter form.
    pub fn with_selector<F, V>(mut self, field: F, value: Option<V>) -> Self
    where
        F: AsRef<str>,
        V: Into<Value>,
    {
        self.selectors.push(Selector::new(field, value));
        self
    }

    pub fn query(&self) -> Option<&str> {
        if self.query.is_empty() {
            None
        } else {
            Some(&self.query)
        }
    }

    pub fn search_fields(&self) -> &[String] {
        &self.search_fields
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// True if these criteria match every record.
    pub fn is_empty(&self) -> bool {
        !self.has_text_constraint() && !self.selectors.iter().any(Selector::is_active)
    }

    fn has_text_constraint(&self) -> bool {
        !self.query.is_empty() && !self.search_fields.is_empty()
    }

    /// Whether the given record satisfies every constraint.
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_query(record) && self.selectors.iter().all(|s| s.matches(record))
    }

    fn matches_query(&self, record: &Record) -> bool {
        if !self.has_text_constraint() {
            return true;
        }
        self.search_fields.iter().any(|field| {
            record
                .get(field)
                .map(|v| v.contains_text(&self.query))
                .unwrap_or(false)
        })
    }
}

/// Select the records that satisfy the given criteria, preserving their
/// relative order.
pub fn filter<'a, I>(records: I, criteria: &Criteria) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|r| {
            let keep = criteria.matches(r);
            trace!("Record {} matches = {}", r.id(), keep);
            keep
        })
        .collect()
}
