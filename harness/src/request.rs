//! Trip request: the two user inputs, parsed and validated.
//!
//! Interactive prompting re-asks each question until the answer is valid,
//! printing the corresponding hint after every rejected line.

use std::io::{BufRead, Write};

use trailhead_search::policy::SearchBudget;

const DAYS_PROMPT: &str = "Enter the number of days for your trip: ";
const BUDGET_PROMPT: &str = "Enter your budget for the trip in currency units: ";

/// A validated trip request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripRequest {
    pub num_days: u32,
    pub budget: f64,
}

/// Invalid or unreadable trip input.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// Day count is not an integer.
    DaysNotInteger { input: String },
    /// Day count is zero or negative.
    DaysNotPositive { value: i64 },
    /// Day count does not fit the supported range.
    DaysOutOfRange { value: i64 },
    /// Budget is not a number.
    BudgetNotNumber { input: String },
    /// Budget is zero, negative or not finite.
    BudgetNotPositive { value: f64 },
    /// Reading or writing the terminal failed, or input ended.
    Io { detail: String },
}

impl RequestError {
    /// The hint shown before re-asking, as the interactive prompt prints it.
    #[must_use]
    pub fn hint(&self) -> &'static str {
        match self {
            Self::DaysNotInteger { .. } => "Invalid input. Please enter an integer.",
            Self::DaysNotPositive { .. } | Self::DaysOutOfRange { .. } => {
                "Please enter a valid number of days (greater than 0)."
            }
            Self::BudgetNotNumber { .. } => "Invalid input. Please enter a number.",
            Self::BudgetNotPositive { .. } => "Please enter a valid budget (greater than 0).",
            Self::Io { .. } => "Input unavailable.",
        }
    }
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DaysNotInteger { input } => write!(f, "days: {input:?} is not an integer"),
            Self::DaysNotPositive { value } => write!(f, "days: {value} is not greater than 0"),
            Self::DaysOutOfRange { value } => write!(f, "days: {value} is out of range"),
            Self::BudgetNotNumber { input } => write!(f, "budget: {input:?} is not a number"),
            Self::BudgetNotPositive { value } => {
                write!(f, "budget: {value} is not a positive finite number")
            }
            Self::Io { detail } => write!(f, "input: {detail}"),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<std::io::Error> for RequestError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            detail: e.to_string(),
        }
    }
}

impl TripRequest {
    /// Validate already-typed inputs.
    ///
    /// # Errors
    ///
    /// [`RequestError::DaysNotPositive`] for zero days,
    /// [`RequestError::BudgetNotPositive`] for a budget that is not a
    /// positive finite number.
    pub fn new(num_days: u32, budget: f64) -> Result<Self, RequestError> {
        if num_days == 0 {
            return Err(RequestError::DaysNotPositive { value: 0 });
        }
        check_budget(budget)?;
        Ok(Self { num_days, budget })
    }

    /// Ceilings for the search: `num_days` eight-hour days and the budget.
    #[must_use]
    pub fn search_budget(&self) -> SearchBudget {
        SearchBudget::from_trip(self.num_days, self.budget)
    }

    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "budget": self.budget,
            "num_days": self.num_days,
        })
    }
}

/// Parse a day count: a positive integer, surrounding whitespace ignored.
///
/// # Errors
///
/// See [`RequestError`].
pub fn parse_days(input: &str) -> Result<u32, RequestError> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| RequestError::DaysNotInteger {
            input: trimmed.to_string(),
        })?;
    if value <= 0 {
        return Err(RequestError::DaysNotPositive { value });
    }
    u32::try_from(value).map_err(|_| RequestError::DaysOutOfRange { value })
}

/// Parse a budget: a positive finite number, surrounding whitespace ignored.
///
/// # Errors
///
/// See [`RequestError`].
pub fn parse_budget(input: &str) -> Result<f64, RequestError> {
    let trimmed = input.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| RequestError::BudgetNotNumber {
            input: trimmed.to_string(),
        })?;
    check_budget(value)?;
    Ok(value)
}

fn check_budget(value: f64) -> Result<(), RequestError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RequestError::BudgetNotPositive { value })
    }
}

/// Ask for the day count, then the budget, re-asking until each is valid.
///
/// # Errors
///
/// Returns [`RequestError::Io`] if the writer fails or the reader reaches
/// end of input before both answers are valid.
pub fn prompt_trip_request<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
) -> Result<TripRequest, RequestError> {
    let num_days = prompt_days(reader, writer)?;
    let budget = prompt_budget(reader, writer)?;
    Ok(TripRequest { num_days, budget })
}

/// Ask for the day count until it is valid.
///
/// # Errors
///
/// See [`prompt_trip_request`].
pub fn prompt_days<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
) -> Result<u32, RequestError> {
    prompt_until_valid(reader, writer, DAYS_PROMPT, parse_days)
}

/// Ask for the budget until it is valid.
///
/// # Errors
///
/// See [`prompt_trip_request`].
pub fn prompt_budget<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
) -> Result<f64, RequestError> {
    prompt_until_valid(reader, writer, BUDGET_PROMPT, parse_budget)
}

fn prompt_until_valid<R, W, T>(
    reader: &mut R,
    writer: &mut W,
    prompt: &str,
    parse: fn(&str) -> Result<T, RequestError>,
) -> Result<T, RequestError>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        write!(writer, "{prompt}")?;
        writer.flush()?;
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(RequestError::Io {
                detail: "unexpected end of input".into(),
            });
        }
        match parse(&line) {
            Ok(value) => return Ok(value),
            Err(e) => writeln!(writer, "{}", e.hint())?,
        }
    }
}
