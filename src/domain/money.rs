use std::fmt;

/// Amounts are signed decimal numbers, stored as `f64` to match the persisted
/// JSON `number`. Positive amounts are money received, negative are money paid.
pub type Amount = f64;

/// Format an amount with two fixed decimals.
/// Example: 50.0 -> "50.00", -20.5 -> "-20.50"
pub fn format_amount(amount: Amount) -> String {
    format!("{:.2}", amount)
}

/// Returns true if the amount may be recorded: finite and nonzero.
pub fn is_valid_amount(amount: Amount) -> bool {
    amount.is_finite() && amount != 0.0
}

/// Parse free-text input into a recordable amount.
/// Example: "50.00" -> 50.0, "-20" -> -20.0, " 12.5 " -> 12.5
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    // f64's parser accepts "inf" and "NaN"; both are caught below.
    let amount: Amount = input
        .parse()
        .map_err(|_| ParseAmountError::InvalidFormat(input.to_string()))?;

    if !amount.is_finite() {
        return Err(ParseAmountError::NotFinite);
    }
    if amount == 0.0 {
        return Err(ParseAmountError::Zero);
    }
    Ok(amount)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidFormat(String),
    NotFinite,
    Zero,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "amount is empty"),
            ParseAmountError::InvalidFormat(input) => write!(f, "not a number: '{}'", input),
            ParseAmountError::NotFinite => write!(f, "amount must be a finite number"),
            ParseAmountError::Zero => write!(f, "amount must not be zero"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
