//! Data source discovery through the coordinator.

use serde_json::Value;

use super::druid::DruidClient;
use super::error::{DruidError, DruidResult};
use super::transport::Transport;
use crate::query::{Interval, TIME_COLUMN};
use crate::response::segment_columns;
use crate::serializer;

/// Dimension and metric columns of a data source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Structure {
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
}

impl<T: Transport> DruidClient<T> {
    /// Intervals with segments for `data_source`, as reported by the coordinator.
    pub fn intervals(&self, data_source: &str) -> DruidResult<Vec<Interval>> {
        let url = format!(
            "{}/{}/intervals",
            self.settings().datasources_url(),
            data_source
        );
        let response = self.executor().get(&url, None)?;
        let Some(items) = response.as_array() else {
            return Err(DruidError::engine(
                "InvalidIntervals",
                format!("unexpected intervals response for {}: {}", data_source, response),
                Value::Null,
            ));
        };

        items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| Interval::parse(s).map_err(DruidError::from))
            .collect()
    }

    /// Split the columns of the newest segment interval into dimensions
    /// and metrics.
    pub fn describe(&self, data_source: &str) -> DruidResult<Structure> {
        let newest = self
            .intervals(data_source)?
            .into_iter()
            .max_by_key(|interval| interval.end())
            .ok_or_else(|| {
                DruidError::engine(
                    "NoIntervals",
                    format!("data source {} has no segments", data_source),
                    Value::Null,
                )
            })?;

        let body = serializer::segment_metadata(data_source, &[newest]);
        let raw = self.post_query(body.clone())?;
        let columns = segment_columns(&raw).ok_or_else(|| {
            DruidError::engine(
                "NoColumns",
                format!("segment metadata for {} has no columns", data_source),
                body,
            )
        })?;

        let mut structure = Structure::default();
        for column in columns.into_iter().filter(|c| c.name != TIME_COLUMN) {
            if column.is_metric {
                structure.metrics.push(column.name);
            } else {
                structure.dimensions.push(column.name);
            }
        }
        Ok(structure)
    }
}
