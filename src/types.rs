use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use thiserror::Error;

/// The kind of arithmetic a [`CalculationStep`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, AsRefStr)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Operation {
    Initial,
    Add,
    Subtract,
    Multiply,
    Compare,
    Rate,
    Result,
    Info,
}

impl Operation {
    fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply | Operation::Rate => "x",
            Operation::Result => "=",
            Operation::Compare => "?",
            Operation::Initial | Operation::Info => " ",
        }
    }
}

/// Represents a single step in the Zakat calculation process.
///
/// The trace lets a host show users exactly how the final amount was derived.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct CalculationStep {
    /// Human-readable description of what this step does.
    pub description: String,
    /// The value at this step (if applicable).
    pub amount: Option<Decimal>,
    pub operation: Operation,
}

impl CalculationStep {
    fn new(description: impl Into<String>, amount: Option<Decimal>, operation: Operation) -> Self {
        Self {
            description: description.into(),
            amount,
            operation,
        }
    }

    pub fn initial(description: impl Into<String>, amount: Decimal) -> Self {
        Self::new(description, Some(amount), Operation::Initial)
    }

    pub fn add(description: impl Into<String>, amount: Decimal) -> Self {
        Self::new(description, Some(amount), Operation::Add)
    }

    pub fn subtract(description: impl Into<String>, amount: Decimal) -> Self {
        Self::new(description, Some(amount), Operation::Subtract)
    }

    pub fn multiply(description: impl Into<String>, factor: Decimal) -> Self {
        Self::new(description, Some(factor), Operation::Multiply)
    }

    pub fn compare(description: impl Into<String>, amount: Decimal) -> Self {
        Self::new(description, Some(amount), Operation::Compare)
    }

    pub fn rate(description: impl Into<String>, rate: Decimal) -> Self {
        Self::new(description, Some(rate), Operation::Rate)
    }

    pub fn result(description: impl Into<String>, amount: Decimal) -> Self {
        Self::new(description, Some(amount), Operation::Result)
    }

    pub fn info(description: impl Into<String>) -> Self {
        Self::new(description, None, Operation::Info)
    }
}

/// Snapshot emitted after every mutating call on the engine.
///
/// Never mutated by the host: every field is recomputed from the current
/// portfolio, liabilities and market prices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ZakatResult {
    /// Net wealth after liabilities, floored at zero.
    pub total_zakatable_wealth: Decimal,
    /// The final Zakat amount due.
    pub total_zakat: Decimal,
    /// Whether Zakat is due (net wealth >= Nisab).
    pub is_eligible: bool,
    /// The lower of the gold and silver Nisab values.
    pub nisab_threshold: Decimal,
    /// Weighted sum of all asset categories before deductions.
    pub gross_assets: Decimal,
    /// Sum of all deductible liabilities.
    pub total_liabilities: Decimal,
    /// Reason for the status, if not eligible (e.g. "Hawl not met").
    pub status_reason: Option<String>,
    /// Step-by-step trace of how this result was derived.
    pub calculation_trace: Vec<CalculationStep>,
}

impl Default for ZakatResult {
    fn default() -> Self {
        Self {
            total_zakatable_wealth: Decimal::ZERO,
            total_zakat: Decimal::ZERO,
            is_eligible: false,
            nisab_threshold: Decimal::ZERO,
            gross_assets: Decimal::ZERO,
            total_liabilities: Decimal::ZERO,
            status_reason: None,
            calculation_trace: Vec::new(),
        }
    }
}

impl ZakatResult {
    /// Returns the Zakat due formatted as a string with 2 decimal places.
    pub fn format_amount(&self) -> String {
        use rust_decimal::RoundingStrategy;
        let rounded = self
            .total_zakat
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.2}", rounded)
    }

    /// Returns a concise status string.
    /// Format: "Zakat: {Payable/Exempt} ({reason}) - Due: {Amount}"
    pub fn summary(&self) -> String {
        let status = if self.is_eligible { "Payable" } else { "Exempt" };
        let reason = match &self.status_reason {
            Some(r) => format!(" ({})", r),
            None => String::new(),
        };
        format!("Zakat: {}{} - Due: {}", status, reason, self.format_amount())
    }

    /// Generates a human-readable explanation of the calculation, one trace
    /// step per line.
    pub fn explain(&self) -> String {
        let mut lines = Vec::with_capacity(self.calculation_trace.len() + 4);
        lines.push("Zakat calculation:".to_string());
        lines.push(format!("{:-<50}", ""));

        let width = self
            .calculation_trace
            .iter()
            .map(|step| step.description.len())
            .max()
            .unwrap_or(20)
            .max(20);

        for step in &self.calculation_trace {
            match (step.operation, step.amount) {
                (Operation::Info, _) | (_, None) => {
                    lines.push(format!("  INFO: {}", step.description));
                }
                (op, Some(amount)) => {
                    // Rates and ratios keep more precision, e.g. 0.025.
                    let amount_str = if matches!(op, Operation::Rate | Operation::Multiply) {
                        format!("{:.3}", amount)
                    } else {
                        format!("{:.2}", amount)
                    };
                    lines.push(format!(
                        "  {:<width$} : {} {:>12} ({})",
                        step.description,
                        op.symbol(),
                        amount_str,
                        op,
                        width = width
                    ));
                }
            }
        }

        lines.push(format!("{:-<50}", ""));
        if self.is_eligible {
            lines.push("Status: PAYABLE".to_string());
            lines.push(format!("Amount Due: {}", self.format_amount()));
        } else {
            lines.push("Status: EXEMPT".to_string());
            if let Some(reason) = &self.status_reason {
                lines.push(format!("Reason: {}", reason));
            }
        }

        let mut output = lines.join("\n");
        output.push('\n');
        output
    }
}

impl std::fmt::Display for ZakatResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Net Wealth: {} | Nisab: {}",
            self.total_zakatable_wealth, self.nisab_threshold
        )?;
        if self.is_eligible {
            write!(f, "Status: PAYABLE ({} due)", self.format_amount())
        } else {
            match &self.status_reason {
                Some(reason) => write!(f, "Status: EXEMPT - {}", reason),
                None => write!(f, "Status: EXEMPT"),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ZakatError {
    #[error("Invalid Input [{field}]: '{value}' {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },
    #[error("Configuration Error: {0}")]
    ConfigurationError(String),
    #[error("Arithmetic Overflow: operation '{operation}' failed")]
    Overflow { operation: String },
    #[error("Missing Configuration: field '{field}' is required")]
    MissingConfig { field: String },
}

impl ZakatError {
    pub(crate) fn invalid(value: impl Into<String>, reason: impl Into<String>) -> Self {
        ZakatError::InvalidInput {
            field: String::new(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(operation: impl Into<String>) -> Self {
        ZakatError::Overflow {
            operation: operation.into(),
        }
    }

    /// Attaches the name of the field the error originated from.
    pub fn with_field(self, name: impl Into<String>) -> Self {
        match self {
            ZakatError::InvalidInput { value, reason, .. } => ZakatError::InvalidInput {
                field: name.into(),
                value,
                reason,
            },
            other => other,
        }
    }
}
