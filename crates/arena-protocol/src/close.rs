//! Close codes sent by the game server.

/// The connection was opened without a token.
pub const NO_TOKEN: u16 = 4000;

/// The token was rejected.
pub const INVALID_TOKEN: u16 = 4001;

/// Why the server closed the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Close code 4000.
    NoToken,
    /// Close code 4001.
    InvalidToken,
    /// Any other code, or no code at all.
    Other(Option<u16>),
}

impl CloseReason {
    /// Classify a close code.
    #[must_use]
    pub fn from_code(code: Option<u16>) -> Self {
        match code {
            Some(NO_TOKEN) => CloseReason::NoToken,
            Some(INVALID_TOKEN) => CloseReason::InvalidToken,
            other => CloseReason::Other(other),
        }
    }

    /// Whether the session credentials must be discarded.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, CloseReason::NoToken | CloseReason::InvalidToken)
    }

    /// Label used in logs and metrics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CloseReason::NoToken => "no_token",
            CloseReason::InvalidToken => "invalid_token",
            CloseReason::Other(_) => "closed",
        }
    }
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloseReason::NoToken => write!(f, "No token provided"),
            CloseReason::InvalidToken => write!(f, "Invalid token"),
            CloseReason::Other(Some(code)) => write!(f, "Connection closed ({})", code),
            CloseReason::Other(None) => write!(f, "Connection closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_reason_classification() {
        assert_eq!(CloseReason::from_code(Some(4000)), CloseReason::NoToken);
        assert_eq!(CloseReason::from_code(Some(4001)), CloseReason::InvalidToken);
        assert_eq!(
            CloseReason::from_code(Some(1000)),
            CloseReason::Other(Some(1000))
        );
        assert_eq!(CloseReason::from_code(None), CloseReason::Other(None));
    }

    #[test]
    fn test_only_token_codes_are_auth_failures() {
        assert!(CloseReason::from_code(Some(4000)).is_auth_failure());
        assert!(CloseReason::from_code(Some(4001)).is_auth_failure());
        for code in [1000, 1001, 1006, 4002, 4999] {
            assert!(!CloseReason::from_code(Some(code)).is_auth_failure());
        }
        assert!(!CloseReason::from_code(None).is_auth_failure());
    }
}
