//! Browse-page argument validation and query construction.
//!
//! The browse UI drives everything through query-string parameters. This
//! module turns the raw parameter map into a validated [`BrowseQuery`] and
//! renders that as a complete SQL query over the `blobs` table. Validation
//! is all-or-nothing: the first violation aborts the request before any
//! query runs.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use thiserror::Error;

/// The metadata table the browse queries run against.
const BLOBS_TABLE: &str = "blobs";

/// Raw query-string parameters for `GET /browse`, all optional.
///
/// Values are kept as strings so validation can distinguish "absent" from
/// "present but malformed" and report the right field.
#[derive(Debug, Default, Deserialize)]
pub struct BrowseParams {
    pub sort_col: Option<String>,
    pub sort_dir: Option<String>,
    pub filter: Option<String>,
    pub filename_prefix: Option<String>,
    pub content_type: Option<String>,
    pub size: Option<String>,
    pub size_op: Option<String>,
    pub size_unit: Option<String>,
    pub creation_op: Option<String>,
    pub creation_start: Option<String>,
    pub creation_end: Option<String>,
    /// Opaque pagination cursor, passed through to the datastore untouched.
    pub start: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BrowseArgsError {
    #[error("sort_col must be one of filename, content_type, size, creation")]
    InvalidSortColumn,
    #[error("sort_dir must be one of asc, desc")]
    InvalidSortDirection,
    #[error("size_op must be one of le, ge")]
    InvalidSizeOp,
    #[error("size_unit must be one of B, KB, MB, GB")]
    InvalidSizeUnit,
    #[error("size must be a number")]
    SizeNotNumeric,
    #[error("size must be non-negative")]
    SizeNegative,
    #[error("creation_op must be one of day, week, month, range")]
    InvalidCreationOp,
    #[error("{field} must be an integer")]
    CreationBoundNotInteger { field: &'static str },
    #[error("{field} must be non-negative")]
    CreationBoundNegative { field: &'static str },
    #[error("filter must be one of filename, content_type, size, creation")]
    InvalidFilter,
    #[error("filename_prefix is required for the filename filter")]
    MissingFilenamePrefix,
    #[error("content_type is required for the content_type filter")]
    MissingContentType,
    #[error("size, size_op and size_unit are required for the size filter")]
    MissingSizeFields,
    #[error("creation_op is required for the creation filter")]
    MissingCreationOp,
    #[error("at least one of creation_start or creation_end is required")]
    MissingCreationBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Filename,
    ContentType,
    Size,
    Creation,
}

impl SortColumn {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "filename" => Some(Self::Filename),
            "content_type" => Some(Self::ContentType),
            "size" => Some(Self::Size),
            "creation" => Some(Self::Creation),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Filename => "filename",
            Self::ContentType => "content_type",
            Self::Size => "size",
            Self::Creation => "creation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeOp {
    Le,
    Ge,
}

impl SizeOp {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "le" => Some(Self::Le),
            "ge" => Some(Self::Ge),
            _ => None,
        }
    }

    fn comparison(self) -> &'static str {
        match self {
            Self::Le => "<=",
            Self::Ge => ">=",
        }
    }

    /// Paging direction paired with the comparison, so the page closest to
    /// the threshold comes first.
    fn direction(self) -> SortDirection {
        match self {
            Self::Le => SortDirection::Asc,
            Self::Ge => SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    B,
    Kb,
    Mb,
    Gb,
}

impl SizeUnit {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "B" => Some(Self::B),
            "KB" => Some(Self::Kb),
            "MB" => Some(Self::Mb),
            "GB" => Some(Self::Gb),
            _ => None,
        }
    }

    fn multiplier(self) -> f64 {
        match self {
            Self::B => 1.0,
            Self::Kb => 1024.0,
            Self::Mb => 1024.0 * 1024.0,
            Self::Gb => 1024.0 * 1024.0 * 1024.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CreationOp {
    Day,
    Week,
    Month,
    Range,
}

impl CreationOp {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "range" => Some(Self::Range),
            _ => None,
        }
    }
}

/// Creation-time filter payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationWindow {
    /// Blobs created within the trailing `days` days.
    Within { days: i64 },
    /// Explicit epoch-second bounds. Zero-valued parameters are treated as
    /// absent, matching the UI's "unset" encoding.
    Range { start: Option<i64>, end: Option<i64> },
}

/// The four mutually exclusive browse filters.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseFilter {
    Filename { prefix: String },
    ContentType { value: String },
    Size { value: f64, op: SizeOp, unit: SizeUnit },
    Creation(CreationWindow),
}

/// A validated browse request: either a plain sort or a single filter.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseQuery {
    pub sort_col: SortColumn,
    pub sort_dir: SortDirection,
    pub filter: Option<BrowseFilter>,
}

impl BrowseQuery {
    /// Validate raw parameters into a query description.
    ///
    /// Checks run in a fixed order and the first failure wins, so the
    /// surfaced message is deterministic for a given input. The sort fields
    /// are validated even when a filter is present: the defaults still need
    /// a well-formed fallback.
    pub fn from_params(params: &BrowseParams) -> Result<Self, BrowseArgsError> {
        let sort_col = match params.sort_col.as_deref().map(str::trim) {
            None => SortColumn::Filename,
            Some(raw) => SortColumn::parse(raw).ok_or(BrowseArgsError::InvalidSortColumn)?,
        };

        let sort_dir = match params.sort_dir.as_deref().map(str::trim) {
            None => SortDirection::Asc,
            Some(raw) => SortDirection::parse(raw).ok_or(BrowseArgsError::InvalidSortDirection)?,
        };

        let size_op = match params.size_op.as_deref().map(str::trim) {
            None => None,
            Some(raw) => Some(SizeOp::parse(raw).ok_or(BrowseArgsError::InvalidSizeOp)?),
        };

        let size_unit = match params.size_unit.as_deref().map(str::trim) {
            None => None,
            Some(raw) => Some(SizeUnit::parse(raw).ok_or(BrowseArgsError::InvalidSizeUnit)?),
        };

        let size = match params.size.as_deref().map(str::trim) {
            None => None,
            Some(raw) => {
                let value: f64 = raw.parse().map_err(|_| BrowseArgsError::SizeNotNumeric)?;
                if !value.is_finite() {
                    return Err(BrowseArgsError::SizeNotNumeric);
                }
                if value < 0.0 {
                    return Err(BrowseArgsError::SizeNegative);
                }
                Some(value)
            }
        };

        let creation_op = match params.creation_op.as_deref().map(str::trim) {
            None => None,
            Some(raw) => Some(CreationOp::parse(raw).ok_or(BrowseArgsError::InvalidCreationOp)?),
        };

        let creation_start = parse_epoch_bound(&params.creation_start, "creation_start")?;
        let creation_end = parse_epoch_bound(&params.creation_end, "creation_end")?;

        let filter = match params.filter.as_deref().map(str::trim) {
            None => None,
            Some(raw) => {
                let column = SortColumn::parse(raw).ok_or(BrowseArgsError::InvalidFilter)?;
                Some(match column {
                    SortColumn::Filename => {
                        let prefix = params
                            .filename_prefix
                            .as_deref()
                            .map(str::trim)
                            .ok_or(BrowseArgsError::MissingFilenamePrefix)?;
                        BrowseFilter::Filename {
                            prefix: prefix.to_string(),
                        }
                    }
                    SortColumn::ContentType => {
                        let value = params
                            .content_type
                            .as_deref()
                            .map(str::trim)
                            .ok_or(BrowseArgsError::MissingContentType)?;
                        BrowseFilter::ContentType {
                            value: value.to_string(),
                        }
                    }
                    SortColumn::Size => {
                        let (Some(value), Some(op), Some(unit)) = (size, size_op, size_unit)
                        else {
                            return Err(BrowseArgsError::MissingSizeFields);
                        };
                        BrowseFilter::Size { value, op, unit }
                    }
                    SortColumn::Creation => {
                        let op = creation_op.ok_or(BrowseArgsError::MissingCreationOp)?;
                        match op {
                            CreationOp::Day => BrowseFilter::Creation(CreationWindow::Within {
                                days: 1,
                            }),
                            CreationOp::Week => BrowseFilter::Creation(CreationWindow::Within {
                                days: 7,
                            }),
                            CreationOp::Month => BrowseFilter::Creation(CreationWindow::Within {
                                days: 31,
                            }),
                            CreationOp::Range => {
                                if params.creation_start.is_none()
                                    && params.creation_end.is_none()
                                {
                                    return Err(BrowseArgsError::MissingCreationBounds);
                                }
                                BrowseFilter::Creation(CreationWindow::Range {
                                    start: creation_start.filter(|v| *v != 0),
                                    end: creation_end.filter(|v| *v != 0),
                                })
                            }
                        }
                    }
                })
            }
        };

        Ok(Self {
            sort_col,
            sort_dir,
            filter,
        })
    }

    /// Render a complete query over the blobs table.
    ///
    /// Pure string assembly; `now` anchors the trailing creation windows so
    /// the output is deterministic under test. String literals go through
    /// [`sql_str`], the single injection-defense point.
    pub fn to_sql(&self, now: DateTime<Utc>) -> String {
        let Some(filter) = &self.filter else {
            return format!(
                "SELECT * FROM {BLOBS_TABLE} ORDER BY {} {}",
                self.sort_col.as_str(),
                self.sort_dir.as_str()
            );
        };

        match filter {
            BrowseFilter::Filename { prefix } => format!(
                "SELECT * FROM {BLOBS_TABLE} WHERE filename >= {} AND filename < {} \
                 ORDER BY filename",
                sql_str(prefix, false),
                sql_str(prefix, true)
            ),
            BrowseFilter::ContentType { value } => format!(
                "SELECT * FROM {BLOBS_TABLE} WHERE content_type = {} ORDER BY content_type",
                sql_str(value, false)
            ),
            BrowseFilter::Size { value, op, unit } => {
                let threshold = (value * unit.multiplier()) as i64;
                format!(
                    "SELECT * FROM {BLOBS_TABLE} WHERE size {} {} ORDER BY size {}",
                    op.comparison(),
                    threshold,
                    op.direction().as_str()
                )
            }
            BrowseFilter::Creation(CreationWindow::Within { days }) => {
                let start = now - Duration::days(*days);
                format!(
                    "SELECT * FROM {BLOBS_TABLE} WHERE creation >= {} ORDER BY creation",
                    start.timestamp()
                )
            }
            BrowseFilter::Creation(CreationWindow::Range { start, end }) => {
                let mut clauses = Vec::new();
                if let Some(start) = start {
                    clauses.push(format!("creation >= {start}"));
                }
                if let Some(end) = end {
                    clauses.push(format!("creation <= {end}"));
                }
                if clauses.is_empty() {
                    format!("SELECT * FROM {BLOBS_TABLE} ORDER BY creation")
                } else {
                    format!(
                        "SELECT * FROM {BLOBS_TABLE} WHERE {} ORDER BY creation",
                        clauses.join(" AND ")
                    )
                }
            }
        }
    }
}

fn parse_epoch_bound(
    raw: &Option<String>,
    field: &'static str,
) -> Result<Option<i64>, BrowseArgsError> {
    let Some(raw) = raw.as_deref().map(str::trim) else {
        return Ok(None);
    };
    let value: i64 = raw
        .parse()
        .map_err(|_| BrowseArgsError::CreationBoundNotInteger { field })?;
    if value < 0 {
        return Err(BrowseArgsError::CreationBoundNegative { field });
    }
    Ok(Some(value))
}

/// Quote a string literal, doubling embedded quotes. With `high_sentinel`
/// set, a `~` is appended inside the quotes: it sorts after the printable
/// ASCII normally found in filenames, turning a prefix into a half-open
/// range.
fn sql_str(value: &str, high_sentinel: bool) -> String {
    let escaped = value.replace('\'', "''");
    if high_sentinel {
        format!("'{escaped}~'")
    } else {
        format!("'{escaped}'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn params() -> BrowseParams {
        BrowseParams::default()
    }

    fn now() -> DateTime<Utc> {
        // 2024-05-01T12:00:00Z == 1714564800
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn sql_for(params: &BrowseParams) -> String {
        BrowseQuery::from_params(params).unwrap().to_sql(now())
    }

    #[test]
    fn defaults_to_filename_ascending() {
        assert_eq!(
            sql_for(&params()),
            "SELECT * FROM blobs ORDER BY filename asc"
        );
    }

    #[test]
    fn every_sort_pair_builds_exact_query() {
        for col in ["filename", "content_type", "size", "creation"] {
            for dir in ["asc", "desc"] {
                let p = BrowseParams {
                    sort_col: Some(col.into()),
                    sort_dir: Some(dir.into()),
                    ..params()
                };
                assert_eq!(
                    sql_for(&p),
                    format!("SELECT * FROM blobs ORDER BY {col} {dir}")
                );
            }
        }
    }

    #[test]
    fn rejects_unknown_sort_column() {
        let p = BrowseParams {
            sort_col: Some("owner".into()),
            ..params()
        };
        assert_eq!(
            BrowseQuery::from_params(&p),
            Err(BrowseArgsError::InvalidSortColumn)
        );
    }

    #[test]
    fn rejects_unknown_sort_direction() {
        let p = BrowseParams {
            sort_dir: Some("sideways".into()),
            ..params()
        };
        assert_eq!(
            BrowseQuery::from_params(&p),
            Err(BrowseArgsError::InvalidSortDirection)
        );
    }

    #[test]
    fn sort_column_is_validated_even_with_filter_present() {
        // The default sort still needs a well-formed fallback, and the
        // sort_col check runs first.
        let p = BrowseParams {
            sort_col: Some("bogus".into()),
            filter: Some("filename".into()),
            filename_prefix: Some("a".into()),
            ..params()
        };
        assert_eq!(
            BrowseQuery::from_params(&p),
            Err(BrowseArgsError::InvalidSortColumn)
        );
    }

    #[test]
    fn filename_filter_builds_prefix_range() {
        let p = BrowseParams {
            filter: Some("filename".into()),
            filename_prefix: Some("foo".into()),
            ..params()
        };
        assert_eq!(
            sql_for(&p),
            "SELECT * FROM blobs WHERE filename >= 'foo' AND filename < 'foo~' \
             ORDER BY filename"
        );
    }

    #[test]
    fn filename_prefix_quotes_are_doubled() {
        let p = BrowseParams {
            filter: Some("filename".into()),
            filename_prefix: Some("O'Brien".into()),
            ..params()
        };
        assert_eq!(
            sql_for(&p),
            "SELECT * FROM blobs WHERE filename >= 'O''Brien' AND filename < 'O''Brien~' \
             ORDER BY filename"
        );
    }

    #[test]
    fn filename_filter_requires_prefix() {
        let p = BrowseParams {
            filter: Some("filename".into()),
            ..params()
        };
        assert_eq!(
            BrowseQuery::from_params(&p),
            Err(BrowseArgsError::MissingFilenamePrefix)
        );
    }

    #[test]
    fn content_type_filter_builds_equality() {
        let p = BrowseParams {
            filter: Some("content_type".into()),
            content_type: Some("image/png".into()),
            ..params()
        };
        assert_eq!(
            sql_for(&p),
            "SELECT * FROM blobs WHERE content_type = 'image/png' ORDER BY content_type"
        );
    }

    #[test]
    fn content_type_filter_requires_value() {
        let p = BrowseParams {
            filter: Some("content_type".into()),
            ..params()
        };
        assert_eq!(
            BrowseQuery::from_params(&p),
            Err(BrowseArgsError::MissingContentType)
        );
    }

    #[test]
    fn size_filter_le_pages_ascending_toward_threshold() {
        let p = BrowseParams {
            filter: Some("size".into()),
            size: Some("2".into()),
            size_op: Some("le".into()),
            size_unit: Some("KB".into()),
            ..params()
        };
        assert_eq!(
            sql_for(&p),
            "SELECT * FROM blobs WHERE size <= 2048 ORDER BY size asc"
        );
    }

    #[test]
    fn size_filter_ge_pages_descending_toward_threshold() {
        let p = BrowseParams {
            filter: Some("size".into()),
            size: Some("2".into()),
            size_op: Some("ge".into()),
            size_unit: Some("KB".into()),
            ..params()
        };
        assert_eq!(
            sql_for(&p),
            "SELECT * FROM blobs WHERE size >= 2048 ORDER BY size desc"
        );
    }

    #[test]
    fn size_unit_multipliers() {
        for (unit, threshold) in [
            ("B", 3),
            ("KB", 3 * 1024_i64),
            ("MB", 3 * 1024 * 1024),
            ("GB", 3 * 1024 * 1024 * 1024),
        ] {
            let p = BrowseParams {
                filter: Some("size".into()),
                size: Some("3".into()),
                size_op: Some("le".into()),
                size_unit: Some(unit.into()),
                ..params()
            };
            assert_eq!(
                sql_for(&p),
                format!("SELECT * FROM blobs WHERE size <= {threshold} ORDER BY size asc")
            );
        }
    }

    #[test]
    fn fractional_sizes_truncate_to_whole_bytes() {
        let p = BrowseParams {
            filter: Some("size".into()),
            size: Some("1.5".into()),
            size_op: Some("le".into()),
            size_unit: Some("KB".into()),
            ..params()
        };
        assert_eq!(
            sql_for(&p),
            "SELECT * FROM blobs WHERE size <= 1536 ORDER BY size asc"
        );
    }

    #[test]
    fn size_filter_requires_all_three_fields() {
        for (size, op, unit) in [
            (None, Some("le"), Some("KB")),
            (Some("2"), None, Some("KB")),
            (Some("2"), Some("le"), None),
        ] {
            let p = BrowseParams {
                filter: Some("size".into()),
                size: size.map(Into::into),
                size_op: op.map(Into::into),
                size_unit: unit.map(Into::into),
                ..params()
            };
            assert_eq!(
                BrowseQuery::from_params(&p),
                Err(BrowseArgsError::MissingSizeFields)
            );
        }
    }

    #[test]
    fn rejects_malformed_size_values() {
        for (raw, err) in [
            ("large", BrowseArgsError::SizeNotNumeric),
            ("NaN", BrowseArgsError::SizeNotNumeric),
            ("inf", BrowseArgsError::SizeNotNumeric),
            ("-1", BrowseArgsError::SizeNegative),
        ] {
            let p = BrowseParams {
                size: Some(raw.into()),
                ..params()
            };
            assert_eq!(BrowseQuery::from_params(&p), Err(err), "size={raw}");
        }
    }

    #[test]
    fn rejects_unknown_size_op_and_unit() {
        let p = BrowseParams {
            size_op: Some("eq".into()),
            ..params()
        };
        assert_eq!(
            BrowseQuery::from_params(&p),
            Err(BrowseArgsError::InvalidSizeOp)
        );

        let p = BrowseParams {
            size_unit: Some("TB".into()),
            ..params()
        };
        assert_eq!(
            BrowseQuery::from_params(&p),
            Err(BrowseArgsError::InvalidSizeUnit)
        );
    }

    #[test]
    fn creation_windows_anchor_on_now() {
        for (op, expected_start) in [
            ("day", 1714478400_i64),
            ("week", 1713960000),
            ("month", 1711886400),
        ] {
            let p = BrowseParams {
                filter: Some("creation".into()),
                creation_op: Some(op.into()),
                ..params()
            };
            assert_eq!(
                sql_for(&p),
                format!(
                    "SELECT * FROM blobs WHERE creation >= {expected_start} ORDER BY creation"
                ),
                "creation_op={op}"
            );
        }
    }

    #[test]
    fn creation_range_with_start_only() {
        let p = BrowseParams {
            filter: Some("creation".into()),
            creation_op: Some("range".into()),
            creation_start: Some("100".into()),
            ..params()
        };
        assert_eq!(
            sql_for(&p),
            "SELECT * FROM blobs WHERE creation >= 100 ORDER BY creation"
        );
    }

    #[test]
    fn creation_range_with_end_only() {
        let p = BrowseParams {
            filter: Some("creation".into()),
            creation_op: Some("range".into()),
            creation_end: Some("200".into()),
            ..params()
        };
        assert_eq!(
            sql_for(&p),
            "SELECT * FROM blobs WHERE creation <= 200 ORDER BY creation"
        );
    }

    #[test]
    fn creation_range_with_both_bounds_ands_them() {
        let p = BrowseParams {
            filter: Some("creation".into()),
            creation_op: Some("range".into()),
            creation_start: Some("100".into()),
            creation_end: Some("200".into()),
            ..params()
        };
        assert_eq!(
            sql_for(&p),
            "SELECT * FROM blobs WHERE creation >= 100 AND creation <= 200 ORDER BY creation"
        );
    }

    #[test]
    fn zero_bounds_count_as_absent() {
        // A zero timestamp is the UI's "unset" encoding; it passes the
        // presence check but contributes no clause.
        let p = BrowseParams {
            filter: Some("creation".into()),
            creation_op: Some("range".into()),
            creation_start: Some("0".into()),
            creation_end: Some("200".into()),
            ..params()
        };
        assert_eq!(
            sql_for(&p),
            "SELECT * FROM blobs WHERE creation <= 200 ORDER BY creation"
        );

        let p = BrowseParams {
            filter: Some("creation".into()),
            creation_op: Some("range".into()),
            creation_start: Some("0".into()),
            creation_end: Some("0".into()),
            ..params()
        };
        assert_eq!(sql_for(&p), "SELECT * FROM blobs ORDER BY creation");
    }

    #[test]
    fn creation_range_requires_at_least_one_bound() {
        let p = BrowseParams {
            filter: Some("creation".into()),
            creation_op: Some("range".into()),
            ..params()
        };
        assert_eq!(
            BrowseQuery::from_params(&p),
            Err(BrowseArgsError::MissingCreationBounds)
        );
    }

    #[test]
    fn creation_filter_requires_an_op() {
        let p = BrowseParams {
            filter: Some("creation".into()),
            ..params()
        };
        assert_eq!(
            BrowseQuery::from_params(&p),
            Err(BrowseArgsError::MissingCreationOp)
        );
    }

    #[test]
    fn rejects_malformed_creation_bounds() {
        let p = BrowseParams {
            creation_start: Some("yesterday".into()),
            ..params()
        };
        assert_eq!(
            BrowseQuery::from_params(&p),
            Err(BrowseArgsError::CreationBoundNotInteger {
                field: "creation_start"
            })
        );

        let p = BrowseParams {
            creation_end: Some("-5".into()),
            ..params()
        };
        assert_eq!(
            BrowseQuery::from_params(&p),
            Err(BrowseArgsError::CreationBoundNegative {
                field: "creation_end"
            })
        );
    }

    #[test]
    fn rejects_unknown_creation_op() {
        let p = BrowseParams {
            creation_op: Some("year".into()),
            ..params()
        };
        assert_eq!(
            BrowseQuery::from_params(&p),
            Err(BrowseArgsError::InvalidCreationOp)
        );
    }

    #[test]
    fn rejects_unknown_filter() {
        let p = BrowseParams {
            filter: Some("owner".into()),
            ..params()
        };
        assert_eq!(
            BrowseQuery::from_params(&p),
            Err(BrowseArgsError::InvalidFilter)
        );
    }

    #[test]
    fn parameters_are_trimmed() {
        let p = BrowseParams {
            sort_col: Some("  size ".into()),
            sort_dir: Some(" desc".into()),
            ..params()
        };
        assert_eq!(sql_for(&p), "SELECT * FROM blobs ORDER BY size desc");
    }

    #[test]
    fn error_messages_name_the_field() {
        assert_eq!(
            BrowseArgsError::CreationBoundNotInteger {
                field: "creation_start"
            }
            .to_string(),
            "creation_start must be an integer"
        );
        assert!(
            BrowseArgsError::MissingFilenamePrefix
                .to_string()
                .contains("filename_prefix")
        );
    }

    #[test]
    fn opposite_direction_flips() {
        assert_eq!(SortDirection::Asc.opposite(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.opposite(), SortDirection::Asc);
    }
}
