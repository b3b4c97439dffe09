use core::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// No backing storage on this host (private browsing, no window)
    Unavailable,
    /// Storage refused the write (quota, permissions)
    WriteFailed { key: &'static str, reason: String },
    Encode(String),
    Decode(String),
    /// A remote leaderboard could not be reached or rejected the call.
    /// Network-backed `Leaderboard` impls report transport and server
    /// failures through this variant; local stores never return it.
    Remote(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::WriteFailed { key, reason } => write!(f, "failed to write {key}: {reason}"),
            Self::Encode(msg) => write!(f, "encode error: {msg}"),
            Self::Decode(msg) => write!(f, "decode error: {msg}"),
            Self::Remote(msg) => write!(f, "remote error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_data() || e.is_syntax() || e.is_eof() {
            Self::Decode(e.to_string())
        } else {
            Self::Encode(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = StoreError::WriteFailed {
            key: "best",
            reason: "quota".into(),
        };
        assert_eq!(e.to_string(), "failed to write best: quota");
        assert_eq!(StoreError::Unavailable.to_string(), "storage unavailable");
        assert_eq!(StoreError::Remote("timeout".into()).to_string(), "remote error: timeout");
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<u64>("nope").unwrap_err();
        assert!(matches!(StoreError::from(err), StoreError::Decode(_)));
    }
}
