//! Pipe-delimited step files.
//!
//! ```text
//! # dancer | step | qualifier | clock | beats
//! man   | forward |  | 0.0 | 1.0
//! woman | forward |  | 0.0 | 1.0
//! man   | embrace |  | 0.0 | 0.0
//! ```
//!
//! The first line names the columns, in any order. Later lines starting
//! with `#` are comments. A row with fewer fields than the header is
//! dropped with a warning, or rejected when the loader is strict.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use pivot_types::{DancerSelector, PivotConfig};

use crate::error::{DanceError, Result};

/// Marks comment lines, and may prefix the header.
pub const COMMENT: char = '#';

const REQUIRED: [&str; 4] = ["dancer", "step", "clock", "beats"];

/// One data row keyed by column name, as read from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRow {
    /// 1-based line number.
    pub line: usize,
    /// Value per header column.
    pub fields: BTreeMap<String, String>,
}

impl StepRow {
    /// Value of `column`, empty if the header has no such column.
    #[must_use]
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map_or("", String::as_str)
    }
}

/// A step-file row with typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    /// Who dances the step.
    pub dancer: DancerSelector,
    /// Short step name, full clip name, or `embrace`.
    pub step: String,
    /// Free text such as `on right`; `None` when blank.
    pub qualifier: Option<String>,
    /// When the step starts, in beats.
    pub clock: f64,
    /// How long it lasts, in beats.
    pub beats: f64,
    /// 1-based line number in the source file.
    pub line: usize,
}

impl TryFrom<&StepRow> for StepRecord {
    type Error = DanceError;

    fn try_from(row: &StepRow) -> Result<Self> {
        let line = row.line;
        let dancer = row
            .get("dancer")
            .parse::<DancerSelector>()
            .map_err(|e| DanceError::file_format(line, format!("{e}")))?;
        let step = row.get("step").to_string();
        if step.is_empty() {
            return Err(DanceError::file_format(line, "empty step name"));
        }
        let qualifier = Some(row.get("qualifier"))
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        Ok(Self {
            dancer,
            step,
            qualifier,
            clock: beats(row, "clock")?,
            beats: beats(row, "beats")?,
            line,
        })
    }
}

fn beats(row: &StepRow, column: &str) -> Result<f64> {
    let text = row.get(column);
    let value: f64 = text.parse().map_err(|_| {
        DanceError::file_format(row.line, format!("{column} '{text}' is not a number"))
    })?;
    if value < 0.0 || !value.is_finite() {
        return Err(DanceError::file_format(
            row.line,
            format!("{column} must be a non-negative number, got {value}"),
        ));
    }
    Ok(value)
}

fn split(line: &str) -> Vec<String> {
    line.split('|').map(|field| field.trim().to_string()).collect()
}

/// Step-file reader.
///
/// # Example
///
/// ```
/// use pivot_dance::StepLoader;
/// use pivot_types::DancerSelector;
///
/// let text = "# dancer | step | qualifier | clock | beats\n\
///             both | forward | | 0.0 | 1.0\n";
/// let records = StepLoader::new().parse_str(text).unwrap();
/// assert_eq!(records[0].dancer, DancerSelector::Both);
/// assert_eq!(records[0].qualifier, None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepLoader {
    strict_rows: bool,
}

impl StepLoader {
    /// Lenient loader: short rows are dropped.
    #[must_use]
    pub const fn new() -> Self {
        Self { strict_rows: false }
    }

    /// Loader following the config's row policy.
    #[must_use]
    pub const fn from_config(config: &PivotConfig) -> Self {
        Self {
            strict_rows: config.strict_rows,
        }
    }

    /// Reject short rows instead of dropping them.
    #[must_use]
    pub const fn strict(mut self, strict_rows: bool) -> Self {
        self.strict_rows = strict_rows;
        self
    }

    /// Split lines into rows keyed by the header's column names.
    ///
    /// # Errors
    ///
    /// Returns [`DanceError::FileFormat`] for a missing or incomplete
    /// header, or a short row in strict mode.
    pub fn rows<I, S>(&self, lines: I) -> Result<Vec<StepRow>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines = lines.into_iter();
        let header = lines
            .next()
            .ok_or_else(|| DanceError::file_format(1, "missing header"))?;
        let columns = split(header.as_ref().trim_start().trim_start_matches(COMMENT));
        if let Some(missing) = REQUIRED.iter().find(|c| !columns.iter().any(|h| h == *c)) {
            return Err(DanceError::file_format(
                1,
                format!("header has no '{missing}' column"),
            ));
        }

        let mut rows = Vec::new();
        for (idx, text) in lines.enumerate() {
            let line = idx + 2;
            let text = text.as_ref();
            if text.trim_start().starts_with(COMMENT) || text.trim().is_empty() {
                continue;
            }
            let values = split(text);
            if values.len() < columns.len() {
                if self.strict_rows {
                    return Err(DanceError::file_format(
                        line,
                        format!("{} fields, header has {}", values.len(), columns.len()),
                    ));
                }
                warn!(line, fields = values.len(), columns = columns.len(), "Dropping short step row");
                continue;
            }
            let fields = columns.iter().cloned().zip(values).collect();
            rows.push(StepRow { line, fields });
        }
        debug!(rows = rows.len(), ?columns, "Read step rows");
        Ok(rows)
    }

    /// Parse lines into step records, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`DanceError::FileFormat`] for a bad header, a bad field, or
    /// a short row in strict mode.
    pub fn parse<I, S>(&self, lines: I) -> Result<Vec<StepRecord>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.rows(lines)?.iter().map(StepRecord::try_from).collect()
    }

    /// Parse a whole file's text.
    ///
    /// # Errors
    ///
    /// See [`Self::parse`].
    pub fn parse_str(&self, text: &str) -> Result<Vec<StepRecord>> {
        self.parse(text.lines())
    }

    /// Read and parse a step file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error, or see [`Self::parse`].
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Vec<StepRecord>> {
        let text = std::fs::read_to_string(path)?;
        self.parse_str(&text)
    }
}

/// Parse step-file lines with the lenient loader.
///
/// # Errors
///
/// See [`StepLoader::parse`].
pub fn parse<I, S>(lines: I) -> Result<Vec<StepRecord>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    StepLoader::new().parse(lines)
}
