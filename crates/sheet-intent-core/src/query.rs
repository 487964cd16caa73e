//! Intent query model: the UI form, the per-intent descriptor, and its wire form.
//!
//! A [`QueryForm`] carries the loosely-typed inputs of an intent form. Building
//! a [`QueryDescriptor`] checks that the chosen [`Intent`] has every field it
//! needs and that referenced columns exist in the table. [`QueryDescriptor::to_wire`]
//! yields the flat JSON object the analytics service consumes.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cell::serialize_number;
use crate::validation::slice_val_compatible;
use crate::{DateColumnProfile, Error, Grid, Rectangle, Result};

/// Aggregation applied to the metric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum SummaryOperator {
    /// Sum of values
    Sum,
    /// Arithmetic mean
    Mean,
    /// Median value
    Median,
    /// Row count
    Count,
    /// Largest value
    Maximum,
    /// Smallest value
    Minimum,
    /// Standard deviation
    #[serde(rename = "Standard Deviation")]
    StandardDeviation,
    /// Variance
    Variance,
    /// First value in table order
    First,
    /// Last value in table order
    Last,
    /// Number of distinct values
    #[serde(rename = "Count Distinct")]
    CountDistinct,
}

/// Bucket size for trend queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum TimeGranularity {
    /// One bucket per year
    Annually,
    /// One bucket per month
    Monthly,
    /// One bucket per day
    Daily,
    /// One bucket per hour
    Hourly,
}

/// Filter operator of a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum SliceOp {
    /// `=`
    #[serde(rename = "Equal to")]
    EqualTo,
    /// `!=`
    #[serde(rename = "Not equal to")]
    NotEqualTo,
    /// `>`
    #[serde(rename = "Greater than")]
    GreaterThan,
    /// `<`
    #[serde(rename = "Less than")]
    LessThan,
    /// `>=`
    #[serde(rename = "Greater than or equal")]
    GreaterThanOrEqual,
    /// `<=`
    #[serde(rename = "Less than or equal")]
    LessThanOrEqual,
    /// Membership
    #[serde(rename = "In")]
    In,
    /// Non-membership
    #[serde(rename = "Not in")]
    NotIn,
}

impl SliceOp {
    /// Whether the operator takes a list of values.
    pub fn takes_list(&self) -> bool {
        matches!(self, SliceOp::In | SliceOp::NotIn)
    }

    /// Whether the operator is an ordering comparison needing a number.
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            SliceOp::GreaterThan
                | SliceOp::LessThan
                | SliceOp::GreaterThanOrEqual
                | SliceOp::LessThanOrEqual
        )
    }
}

/// A single slice value.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SliceScalar {
    /// Boolean value
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
}

impl Serialize for SliceScalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            SliceScalar::Bool(b) => serializer.serialize_bool(*b),
            SliceScalar::Number(n) => serialize_number(*n, serializer),
            SliceScalar::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl SliceScalar {
    /// Whether the value reads as a number (blank text counts, as in the form).
    pub fn is_numeric(&self) -> bool {
        match self {
            SliceScalar::Bool(_) | SliceScalar::Number(_) => true,
            SliceScalar::Text(s) => {
                let s = s.trim();
                s.is_empty() || s.parse::<f64>().map_or(false, |v| !v.is_nan())
            }
        }
    }

    /// Whether this is blank text.
    pub fn is_blank(&self) -> bool {
        matches!(self, SliceScalar::Text(s) if s.is_empty())
    }
}

/// Slice value: a scalar, or a list for `In` / `Not in`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SliceValue {
    /// List of values
    List(Vec<SliceScalar>),
    /// Single value
    Scalar(SliceScalar),
}

/// Filter predicate applied to one column before aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Slice {
    /// Column filtered on
    pub slice_col: String,
    /// Filter operator
    pub slice_op: SliceOp,
    /// Filter operand
    pub slice_val: SliceValue,
}

impl Slice {
    /// Create a slice.
    pub fn new(column: impl Into<String>, op: SliceOp, value: SliceValue) -> Self {
        Self {
            slice_col: column.into(),
            slice_op: op,
            slice_val: value,
        }
    }

    /// Check the operand shape against the operator.
    ///
    /// `In` and `Not in` take a list; other operators take one value, numeric
    /// for ordering comparisons.
    pub fn validate(&self) -> Result<()> {
        let reject = |reason: &str| Error::InvalidSlice {
            column: self.slice_col.clone(),
            reason: reason.to_string(),
        };
        let values = match &self.slice_val {
            SliceValue::Scalar(_) if self.slice_op.takes_list() => {
                return Err(reject("'In' and 'Not in' take a list of values"))
            }
            SliceValue::Scalar(value) => std::slice::from_ref(value),
            SliceValue::List(values) => values.as_slice(),
        };
        if slice_val_compatible(values, self.slice_op) {
            Ok(())
        } else if values.len() > 1 {
            Err(reject("operator takes a single value"))
        } else {
            Err(reject("ordering comparison needs a numeric value"))
        }
    }
}

/// Date window filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// Date column filtered on
    pub date_col: String,
    /// Start date (yyyy-mm-dd)
    pub date_start: String,
    /// End date (yyyy-mm-dd)
    pub date_end: String,
}

/// Marker for "every other slice" in a slice comparison.
pub const REST_OF_SLICES: &str = "*";

/// Two slices of one column to compare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SliceComparison {
    /// Column holding the slices
    pub comparison_column: String,
    /// First slice value
    pub slice1: String,
    /// Second slice value, or `*` for everything else
    pub slice2: String,
}

impl SliceComparison {
    /// Whether the first slice is compared against all remaining rows.
    pub fn against_rest(&self) -> bool {
        self.slice2 == REST_OF_SLICES
    }
}

/// Two date windows to compare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompareDateRange {
    /// Date column holding the windows
    pub date_col: String,
    /// First window start
    pub date_start1: String,
    /// First window end
    pub date_end1: String,
    /// Second window start
    pub date_start2: String,
    /// Second window end
    pub date_end2: String,
}

/// Metric pair for correlation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CorrelationMetrics {
    /// First metric column
    pub metric1: String,
    /// Second metric column
    pub metric2: String,
}

/// Name of an intent as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// Aggregate a metric
    Show,
    /// Best/worst k groups
    #[serde(rename = "topk")]
    TopK,
    /// Compare two slices of a column
    #[serde(alias = "slice-compare")]
    SliceCompare,
    /// Compare two date windows
    #[serde(alias = "time-compare")]
    TimeCompare,
    /// Metric over time
    Trend,
    /// Correlation of two metrics
    Correlation,
}

impl IntentKind {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::Show => "show",
            IntentKind::TopK => "topk",
            IntentKind::SliceCompare => "slice_compare",
            IntentKind::TimeCompare => "time_compare",
            IntentKind::Trend => "trend",
            IntentKind::Correlation => "correlation",
        }
    }
}

fn default_top_k_limit() -> u32 {
    10
}

/// Accept `7` as well as `7.0`; form widgets hand numbers over as floats.
fn count_from_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "expected a whole non-negative count, got {value}"
        )));
    }
    Ok(value as u32)
}

/// Raw inputs of an intent form, every intent-specific field optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryForm {
    /// Requested intent
    pub intent: IntentKind,
    /// Metric column
    #[serde(default)]
    pub metric: Option<String>,
    /// Aggregation of the metric
    #[serde(default)]
    pub summary_operator: Option<SummaryOperator>,
    /// Ascending order for top-k
    #[serde(default)]
    pub is_asc: bool,
    /// Number of groups for top-k
    #[serde(
        default = "default_top_k_limit",
        deserialize_with = "count_from_number"
    )]
    #[schemars(with = "u32")]
    pub top_k_limit: u32,
    /// Grouping columns
    #[serde(default)]
    pub dimensions: Vec<String>,
    /// Row filters
    #[serde(default)]
    pub slices: Vec<Slice>,
    /// Date window filter
    #[serde(default)]
    pub date_range: Option<DateRange>,
    /// Trend bucket size
    #[serde(default)]
    pub time_granularity: Option<TimeGranularity>,
    /// Slice-compare operands
    #[serde(default)]
    pub comparison_value: Option<SliceComparison>,
    /// Time-compare operands
    #[serde(default)]
    pub compare_date_range: Option<CompareDateRange>,
    /// Correlation operands
    #[serde(default)]
    pub correlation_metrics: Option<CorrelationMetrics>,
}

impl QueryForm {
    /// Empty form for an intent.
    pub fn new(intent: IntentKind) -> Self {
        Self {
            intent,
            metric: None,
            summary_operator: None,
            is_asc: false,
            top_k_limit: default_top_k_limit(),
            dimensions: Vec::new(),
            slices: Vec::new(),
            date_range: None,
            time_granularity: None,
            comparison_value: None,
            compare_date_range: None,
            correlation_metrics: None,
        }
    }
}

/// Analytical operation with the fields it requires.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Aggregate a metric, optionally over a date window
    Show {
        /// Metric column
        metric: String,
        /// Aggregation
        summary_operator: SummaryOperator,
        /// Date window filter
        date_range: Option<DateRange>,
    },
    /// Best/worst `limit` groups by metric
    TopK {
        /// Metric column
        metric: String,
        /// Aggregation; None ranks raw rows
        summary_operator: Option<SummaryOperator>,
        /// Number of groups (>= 1)
        limit: u32,
        /// Ascending order
        is_asc: bool,
        /// Date window filter
        date_range: Option<DateRange>,
    },
    /// Metric for two slices of a column
    SliceCompare {
        /// Metric column
        metric: String,
        /// Aggregation
        summary_operator: SummaryOperator,
        /// Slices to compare
        comparison: SliceComparison,
        /// Date window filter
        date_range: Option<DateRange>,
    },
    /// Metric for two date windows
    TimeCompare {
        /// Metric column
        metric: String,
        /// Aggregation
        summary_operator: SummaryOperator,
        /// Windows to compare
        compare_date_range: CompareDateRange,
    },
    /// Metric bucketed over time
    Trend {
        /// Metric column
        metric: String,
        /// Aggregation
        summary_operator: SummaryOperator,
        /// Bucket size
        time_granularity: TimeGranularity,
        /// Date window the trend covers
        date_range: DateRange,
    },
    /// Correlation between two metrics
    Correlation {
        /// Metric pair
        metrics: CorrelationMetrics,
        /// Date window filter
        date_range: Option<DateRange>,
    },
}

fn require<T: Clone>(value: &Option<T>, intent: IntentKind, field: &'static str) -> Result<T> {
    value.clone().ok_or(Error::MissingField {
        intent: intent.as_str(),
        field,
    })
}

impl Intent {
    /// Pick the fields an intent needs out of a form.
    ///
    /// Fields the intent does not use are dropped.
    pub fn from_form(form: &QueryForm) -> Result<Self> {
        let kind = form.intent;
        let metric = || require(&form.metric, kind, "metric");
        let operator = || require(&form.summary_operator, kind, "summaryOperator");

        let intent = match kind {
            IntentKind::Show => Intent::Show {
                metric: metric()?,
                summary_operator: operator()?,
                date_range: form.date_range.clone(),
            },
            IntentKind::TopK => {
                if form.top_k_limit < 1 {
                    return Err(Error::InvalidTopKLimit(form.top_k_limit));
                }
                Intent::TopK {
                    metric: metric()?,
                    summary_operator: form.summary_operator,
                    limit: form.top_k_limit,
                    is_asc: form.is_asc,
                    date_range: form.date_range.clone(),
                }
            }
            IntentKind::SliceCompare => Intent::SliceCompare {
                metric: metric()?,
                summary_operator: operator()?,
                comparison: require(&form.comparison_value, kind, "comparisonValue")?,
                date_range: form.date_range.clone(),
            },
            IntentKind::TimeCompare => Intent::TimeCompare {
                metric: metric()?,
                summary_operator: operator()?,
                compare_date_range: require(&form.compare_date_range, kind, "compareDateRange")?,
            },
            IntentKind::Trend => Intent::Trend {
                metric: metric()?,
                summary_operator: operator()?,
                time_granularity: require(&form.time_granularity, kind, "timeGranularity")?,
                date_range: require(&form.date_range, kind, "dateRange")?,
            },
            IntentKind::Correlation => Intent::Correlation {
                metrics: require(&form.correlation_metrics, kind, "correlationMetrics")?,
                date_range: form.date_range.clone(),
            },
        };
        Ok(intent)
    }

    /// Intent name.
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::Show { .. } => IntentKind::Show,
            Intent::TopK { .. } => IntentKind::TopK,
            Intent::SliceCompare { .. } => IntentKind::SliceCompare,
            Intent::TimeCompare { .. } => IntentKind::TimeCompare,
            Intent::Trend { .. } => IntentKind::Trend,
            Intent::Correlation { .. } => IntentKind::Correlation,
        }
    }

    fn metric(&self) -> Option<&str> {
        match self {
            Intent::Show { metric, .. }
            | Intent::TopK { metric, .. }
            | Intent::SliceCompare { metric, .. }
            | Intent::TimeCompare { metric, .. }
            | Intent::Trend { metric, .. } => Some(metric),
            Intent::Correlation { .. } => None,
        }
    }

    fn summary_operator(&self) -> Option<SummaryOperator> {
        match self {
            Intent::Show { summary_operator, .. }
            | Intent::SliceCompare { summary_operator, .. }
            | Intent::TimeCompare { summary_operator, .. }
            | Intent::Trend { summary_operator, .. } => Some(*summary_operator),
            Intent::TopK { summary_operator, .. } => *summary_operator,
            Intent::Correlation { .. } => None,
        }
    }

    fn date_range(&self) -> Option<&DateRange> {
        match self {
            Intent::Show { date_range, .. }
            | Intent::TopK { date_range, .. }
            | Intent::SliceCompare { date_range, .. }
            | Intent::Correlation { date_range, .. } => date_range.as_ref(),
            Intent::Trend { date_range, .. } => Some(date_range),
            Intent::TimeCompare { .. } => None,
        }
    }

    /// Columns the intent reads, excluding date columns.
    fn value_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = self.metric().into_iter().collect();
        match self {
            Intent::SliceCompare { comparison, .. } => {
                columns.push(&comparison.comparison_column)
            }
            Intent::Correlation { metrics, .. } => {
                columns.push(&metrics.metric1);
                columns.push(&metrics.metric2);
            }
            _ => {}
        }
        columns
    }

    /// Date columns the intent reads.
    fn date_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = self.date_range().map(|d| d.date_col.as_str()).into_iter().collect();
        if let Intent::TimeCompare {
            compare_date_range, ..
        } = self
        {
            columns.push(&compare_date_range.date_col);
        }
        columns
    }
}

/// Sort metadata sent with every query.
///
/// Only top-k reads it; other intents carry it inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranking {
    /// Ascending order
    pub is_asc: bool,
    /// Group count
    pub top_k_limit: u32,
}

impl Default for Ranking {
    fn default() -> Self {
        Self {
            is_asc: false,
            top_k_limit: default_top_k_limit(),
        }
    }
}

/// Normalized query ready to send to the analytics service.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDescriptor {
    /// Intent and its fields
    pub intent: Intent,
    /// Header row followed by data rows
    pub table: Grid,
    /// Selected range the table came from
    pub range: Rectangle,
    /// Grouping columns
    pub dimensions: Vec<String>,
    /// Row filters
    pub slices: Vec<Slice>,
    /// Date classification of the table's columns
    pub date_columns: DateColumnProfile,
    /// Sort metadata for non-top-k intents
    pub ranking: Ranking,
}

impl QueryDescriptor {
    /// Build a descriptor from a form and the current table snapshot.
    ///
    /// `table` must start with its header row; every referenced column must be
    /// a header, and every date filter must name a profiled date column.
    pub fn build(
        form: &QueryForm,
        table: Grid,
        range: Rectangle,
        date_columns: DateColumnProfile,
    ) -> Result<Self> {
        let intent = Intent::from_form(form)?;
        for slice in &form.slices {
            slice.validate()?;
        }

        let descriptor = Self {
            intent,
            table,
            range,
            dimensions: form.dimensions.clone(),
            slices: form.slices.clone(),
            date_columns,
            ranking: Ranking {
                is_asc: form.is_asc,
                top_k_limit: form.top_k_limit,
            },
        };
        descriptor.check_columns()?;
        Ok(descriptor)
    }

    fn check_columns(&self) -> Result<()> {
        let headers: Vec<String> = self
            .table
            .row(1)
            .map(|row| row.iter().map(|c| c.display()).collect())
            .unwrap_or_default();

        let referenced = self
            .intent
            .value_columns()
            .into_iter()
            .chain(self.dimensions.iter().map(String::as_str))
            .chain(self.slices.iter().map(|s| s.slice_col.as_str()));
        for column in referenced {
            if !crate::validation::is_valid_column_name(&headers, column) {
                return Err(Error::UnknownColumn(column.to_string()));
            }
        }
        for column in self.intent.date_columns() {
            if !crate::validation::is_valid_date_column(&self.date_columns, column) {
                return Err(Error::NotADateColumn(column.to_string()));
            }
        }
        Ok(())
    }

    /// Sort metadata as sent: the intent's own for top-k, inert otherwise.
    pub fn effective_ranking(&self) -> Ranking {
        match &self.intent {
            Intent::TopK { limit, is_asc, .. } => Ranking {
                is_asc: *is_asc,
                top_k_limit: *limit,
            },
            _ => self.ranking,
        }
    }

    /// Flat wire object; unset optional fields and empty lists are omitted.
    pub fn to_wire(&self) -> WireQuery<'_> {
        let ranking = self.effective_ranking();
        let (time_granularity, comparison_value, compare_date_range, correlation_metrics) =
            match &self.intent {
                Intent::Trend {
                    time_granularity, ..
                } => (Some(*time_granularity), None, None, None),
                Intent::SliceCompare { comparison, .. } => (None, Some(comparison), None, None),
                Intent::TimeCompare {
                    compare_date_range, ..
                } => (None, None, Some(compare_date_range), None),
                Intent::Correlation { metrics, .. } => (None, None, None, Some(metrics)),
                _ => (None, None, None, None),
            };

        WireQuery {
            table: &self.table,
            intent: self.intent.kind(),
            range_a1_notation: self.range.to_a1(),
            metric: self.intent.metric(),
            summary_operator: self.intent.summary_operator(),
            is_asc: ranking.is_asc,
            top_k_limit: ranking.top_k_limit,
            dimensions: &self.dimensions,
            slices: &self.slices,
            date_range: self.intent.date_range(),
            time_granularity,
            comparison_value,
            compare_date_range,
            correlation_metrics,
            date_columns: &self.date_columns,
        }
    }

    /// Serialized wire object.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_wire())?)
    }
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

/// Flat JSON shape of a query, borrowed from a [`QueryDescriptor`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireQuery<'a> {
    table: &'a Grid,
    intent: IntentKind,
    range_a1_notation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    metric: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary_operator: Option<SummaryOperator>,
    is_asc: bool,
    top_k_limit: u32,
    #[serde(skip_serializing_if = "is_empty")]
    dimensions: &'a [String],
    #[serde(skip_serializing_if = "is_empty")]
    slices: &'a [Slice],
    #[serde(skip_serializing_if = "Option::is_none")]
    date_range: Option<&'a DateRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_granularity: Option<TimeGranularity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison_value: Option<&'a SliceComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    compare_date_range: Option<&'a CompareDateRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_metrics: Option<&'a CorrelationMetrics>,
    date_columns: &'a DateColumnProfile,
}
