//! Typed description of the `UPDATE` the handler runs.
//!
//! Table and column names are restricted to plain identifiers, and the extra assignments
//! configured through the environment are parsed into a closed set of value kinds instead
//! of being pasted into the statement.

use std::{fmt::Display, str::FromStr};

use thiserror::Error;

const MAX_IDENTIFIER_LEN: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignmentErr {
    #[error("{0:?} is not a valid identifier")]
    InvalidIdentifier(String),
    #[error("expected `column = value`, got {0:?}")]
    MalformedAssignment(String),
    #[error("unsupported value {0:?}")]
    UnsupportedValue(String),
    #[error("unterminated quote in {0:?}")]
    UnterminatedQuote(String),
    #[error("column {0} is assigned more than once")]
    DuplicateColumn(String),
}

/// A table or column name: a letter or underscore followed by letters, digits or underscores
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Backtick quoted form for use inside a statement
    pub fn quoted(&self) -> String {
        format!("`{}`", self.0)
    }
}

impl FromStr for Identifier {
    type Err = AssignmentErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid_start || !valid_rest || s.len() > MAX_IDENTIFIER_LEN {
            return Err(AssignmentErr::InvalidIdentifier(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The values an extra assignment may set a column to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentValue {
    Null,
    Now,
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl FromStr for AssignmentValue {
    type Err = AssignmentErr;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        let upper = value.to_ascii_uppercase();

        match upper.as_str() {
            "NULL" => return Ok(AssignmentValue::Null),
            "NOW()" | "CURRENT_TIMESTAMP" | "CURRENT_TIMESTAMP()" => {
                return Ok(AssignmentValue::Now);
            }
            "TRUE" => return Ok(AssignmentValue::Bool(true)),
            "FALSE" => return Ok(AssignmentValue::Bool(false)),
            _ => (),
        }

        if let Some(inner) = value
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
        {
            // a quote inside the text must be doubled
            if inner.replace("''", "").contains('\'') {
                return Err(AssignmentErr::UnsupportedValue(value.to_string()));
            }
            return Ok(AssignmentValue::Text(inner.replace("''", "'")));
        }

        value
            .parse::<i64>()
            .map(AssignmentValue::Integer)
            .map_err(|_| AssignmentErr::UnsupportedValue(value.to_string()))
    }
}

/// `column = value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAssignment {
    pub column: Identifier,
    pub value: AssignmentValue,
}

impl FromStr for ColumnAssignment {
    type Err = AssignmentErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, value) = s
            .split_once('=')
            .ok_or_else(|| AssignmentErr::MalformedAssignment(s.trim().to_string()))?;

        Ok(Self {
            column: column.trim().parse()?,
            value: value.parse()?,
        })
    }
}

/// Parses `a = 1, b = 'x, y', c = NOW()` into assignments.
/// An empty or blank input yields no assignments.
pub fn parse_assignments(input: &str) -> Result<Vec<ColumnAssignment>, AssignmentErr> {
    let mut assignments: Vec<ColumnAssignment> = Vec::new();

    for part in split_top_level(input)? {
        if part.trim().is_empty() {
            continue;
        }

        let assignment: ColumnAssignment = part.parse()?;
        if assignments.iter().any(|a| a.column == assignment.column) {
            return Err(AssignmentErr::DuplicateColumn(
                assignment.column.to_string(),
            ));
        }
        assignments.push(assignment);
    }

    Ok(assignments)
}

/// Splits on commas that are not inside single quotes
fn split_top_level(input: &str) -> Result<Vec<&str>, AssignmentErr> {
    let mut parts = Vec::new();
    let mut in_quote = false;
    let mut start = 0;

    for (idx, c) in input.char_indices() {
        match c {
            '\'' => in_quote = !in_quote,
            ',' if !in_quote => {
                parts.push(&input[start..idx]);
                start = idx + 1;
            }
            _ => (),
        }
    }

    if in_quote {
        return Err(AssignmentErr::UnterminatedQuote(input.to_string()));
    }

    parts.push(&input[start..]);
    Ok(parts)
}

/// Everything needed to build the update statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdate {
    pub table: Identifier,
    pub primary_key: Identifier,
    pub url_column: Identifier,
    pub additional: Vec<ColumnAssignment>,
}

impl RecordUpdate {
    pub fn new(
        table: Identifier,
        primary_key: Identifier,
        url_column: Identifier,
        additional: Vec<ColumnAssignment>,
    ) -> Result<Self, AssignmentErr> {
        if additional.iter().any(|a| a.column == url_column) {
            return Err(AssignmentErr::DuplicateColumn(url_column.to_string()));
        }

        Ok(Self {
            table,
            primary_key,
            url_column,
            additional,
        })
    }
}
