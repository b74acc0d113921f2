//! List and detail fetch helpers
//!
//! The query layer stays outside this crate; a [`RecordSource`] stands in
//! for it. These helpers only read request inputs and wrap results in
//! envelopes.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::envelope::{empty_data, Envelope};
use crate::responder::Responder;
use crate::validation::Validator;

pub const DEFAULT_PAGE_SIZE: u32 = 15;
pub const DEFAULT_SORT_BY: &str = "id";
pub const FETCHED_LIST_MESSAGE: &str = "Data fetched successfully";
pub const FETCHED_RECORD_MESSAGE: &str = "Record fetched successfully";
pub const NOT_FOUND_MESSAGE: &str = "Record not found";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Case-insensitive `asc`/`desc`; anything else is `Desc`
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

/// Listing parameters read from request inputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageQuery {
    pub sort_by: String,
    pub sort_order: SortOrder,
    /// Status filter; only set when the input is a non-empty array
    pub status: Option<Vec<Value>>,
    pub per_page: u32,
}

impl PageQuery {
    pub fn from_inputs(inputs: &Map<String, Value>, default_per_page: u32) -> Self {
        let sort_by = inputs
            .get("sort_by")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SORT_BY)
            .to_string();
        let sort_order = inputs
            .get("sort_order")
            .and_then(Value::as_str)
            .map(SortOrder::parse)
            .unwrap_or_default();
        let status = inputs
            .get("status")
            .and_then(Value::as_array)
            .filter(|s| !s.is_empty())
            .cloned();

        Self {
            sort_by,
            sort_order,
            status,
            per_page: page_size(inputs, default_per_page),
        }
    }
}

/// `per_page` from inputs when it is a positive number (or numeric string),
/// else `default`
pub fn page_size(inputs: &Map<String, Value>, default: u32) -> u32 {
    let requested = match inputs.get("per_page") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    requested
        .filter(|n| n.is_finite() && *n >= 1.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32)
        .unwrap_or(default)
}

/// The query layer behind list/detail endpoints
pub trait RecordSource {
    type Record: Serialize;
    type Page: Serialize;

    fn find(&self, id: i64) -> Option<Self::Record>;

    fn paginate(&self, query: &PageQuery) -> Self::Page;
}

impl<V: Validator> Responder<V> {
    /// Paginated listing wrapped in a success envelope
    pub fn fetch_page<S: RecordSource>(&self, source: &S, inputs: &Map<String, Value>) -> Envelope {
        let query = PageQuery::from_inputs(inputs, DEFAULT_PAGE_SIZE);
        self.success(source.paginate(&query), FETCHED_LIST_MESSAGE, 200)
    }

    /// Single record, or a 404 error envelope (logged, attributed to the caller)
    #[track_caller]
    pub fn fetch_by_id<S: RecordSource>(
        &self,
        source: &S,
        id: i64,
        not_found_message: Option<&str>,
    ) -> Envelope {
        match source.find(id) {
            Some(record) => self.success(record, FETCHED_RECORD_MESSAGE, 200),
            None => self.error(
                empty_data(),
                not_found_message.unwrap_or(NOT_FOUND_MESSAGE),
                404,
                None,
            ),
        }
    }
}
