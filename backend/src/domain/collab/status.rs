//! Collaboration request lifecycle states and the legal transition table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle state of a collaboration request.
///
/// `Pending` is the only initial state. `Declined`, `Cancelled`, and
/// `Completed` are terminal: no edge leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
    Cancelled,
    Completed,
}

/// Error returned when parsing an unknown status keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRequestStatusError(String);

impl fmt::Display for ParseRequestStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown request status: {}", self.0)
    }
}

impl std::error::Error for ParseRequestStatusError {}

impl RequestStatus {
    /// Canonical uppercase keyword as stored and exposed on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Declined => "DECLINED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        }
    }

    /// Whether no further transition may leave this state.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Declined | Self::Cancelled | Self::Completed)
    }

    /// The fixed transition table. Every status mutation must pass this
    /// check before anything is written.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (
                Self::Pending,
                Self::Accepted | Self::Declined | Self::Cancelled
            ) | (Self::Accepted, Self::Cancelled | Self::Completed)
        )
    }

    /// Whether `scheduled_at` may still be changed in this state.
    pub const fn allows_reschedule(self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = ParseRequestStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "ACCEPTED" => Ok(Self::Accepted),
            "DECLINED" => Ok(Self::Declined),
            "CANCELLED" => Ok(Self::Cancelled),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(ParseRequestStatusError(other.to_owned())),
        }
    }
}
