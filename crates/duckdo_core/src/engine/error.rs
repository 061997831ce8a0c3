use std::error::Error;
use std::fmt::{Display, Formatter};

/// Precondition refusals of economy transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EconomyError {
    /// A draw purchase must request at least one draw.
    InvalidDrawCount(u32),
    /// Not enough currency for the whole batch.
    InsufficientCurrency { required: u32, available: u32 },
    /// Egg progress has not reached 100%.
    IncubationIncomplete { progress: u8 },
}

impl EconomyError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDrawCount(_) => "invalid_draw_count",
            Self::InsufficientCurrency { .. } => "insufficient_currency",
            Self::IncubationIncomplete { .. } => "incubation_incomplete",
        }
    }
}

impl Display for EconomyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDrawCount(count) => write!(f, "draw count must be positive, got {count}"),
            Self::InsufficientCurrency {
                required,
                available,
            } => write!(
                f,
                "not enough tickets: need {required}, have {available}"
            ),
            Self::IncubationIncomplete { progress } => {
                write!(f, "egg is not ready to hatch ({progress}%)")
            }
        }
    }
}

impl Error for EconomyError {}
