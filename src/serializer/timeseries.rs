//! `timeseries` bodies.

use serde_json::{json, Value};

use super::{append_common, header};
use crate::query::{QuerySpec, SortDirection, TIME_COLUMN};

pub(super) fn serialize(spec: &QuerySpec) -> Value {
    let mut body = header("timeseries", spec);

    if is_descending(spec) {
        body.insert("descending".to_string(), json!(true));
    }
    if let Some(limit) = spec.limit().filter(|l| l.is_bounded()) {
        body.insert("limit".to_string(), json!(limit.cap));
    }

    append_common(&mut body, spec);
    Value::Object(body)
}

/// True when the only order-by is the time column, descending.
fn is_descending(spec: &QuerySpec) -> bool {
    let time_output = spec
        .dimensions()
        .first()
        .map(|d| d.output_name())
        .unwrap_or(TIME_COLUMN);
    match spec.order_by() {
        [only] => {
            (only.dimension == TIME_COLUMN || only.dimension == time_output)
                && only.direction == SortDirection::Descending
        }
        _ => false,
    }
}
