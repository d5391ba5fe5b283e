use std::fmt;

use crate::value::Value;

/// Settlement lifecycle. A future leaves `Pending` at most once, for either
/// `Fulfilled` or `Rejected`, and the carried value never changes after
/// that transition.
#[derive(Debug, Clone, PartialEq)]
pub enum FutureState {
    Pending,
    Fulfilled(Value),
    Rejected(Value),
}

impl FutureState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Self::Fulfilled(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

impl fmt::Display for FutureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Fulfilled(_) => f.write_str("fulfilled"),
            Self::Rejected(_) => f.write_str("rejected"),
        }
    }
}
