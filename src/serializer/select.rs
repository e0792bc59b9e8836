//! Paginated `select` bodies.

use serde_json::{json, Value};

use super::{append_context, append_filter, header};
use crate::query::{PagingSpec, QuerySpec, SortDirection, TIME_COLUMN};

/// Render `spec` as one page of a select query.
///
/// Dimension columns become the selected dimensions (all of them when none
/// are given); metrics are always selected in full.
pub fn select(spec: &QuerySpec, paging: &PagingSpec) -> Value {
    let mut body = header("select", spec);

    let descending = matches!(
        spec.order_by(),
        [only] if only.dimension == TIME_COLUMN && only.direction == SortDirection::Descending
    );
    body.insert("descending".to_string(), json!(descending));

    let dimensions: Vec<&str> = spec
        .dimensions()
        .iter()
        .filter(|d| !d.is_time())
        .map(|d| d.column.as_str())
        .collect();
    body.insert("dimensions".to_string(), json!(dimensions));
    body.insert("metrics".to_string(), json!([]));
    body.insert("pagingSpec".to_string(), json!(paging));

    append_filter(&mut body, spec);
    append_context(&mut body, spec);
    Value::Object(body)
}
