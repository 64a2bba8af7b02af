use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Code {
    NotFound,
    AlreadyExists,
    InvalidProperty,
    DisabledStateConflict,
    PreconditionFailed,
    InvalidArgument,
    Corruption,
    IOError,
}

#[derive(Debug, Clone)]
pub struct Status {
    code: Code,
    message: Option<String>,
}

impl Status {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Status {
            code: Code::NotFound,
            message: Some(msg.into()),
        }
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Status {
            code: Code::AlreadyExists,
            message: Some(msg.into()),
        }
    }

    pub fn invalid_property(msg: impl Into<String>) -> Self {
        Status {
            code: Code::InvalidProperty,
            message: Some(msg.into()),
        }
    }

    pub fn disabled_state_conflict(msg: impl Into<String>) -> Self {
        Status {
            code: Code::DisabledStateConflict,
            message: Some(msg.into()),
        }
    }

    pub fn precondition_failed(msg: impl Into<String>) -> Self {
        Status {
            code: Code::PreconditionFailed,
            message: Some(msg.into()),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Status {
            code: Code::InvalidArgument,
            message: Some(msg.into()),
        }
    }

    pub fn corruption(msg: impl Into<String>) -> Self {
        Status {
            code: Code::Corruption,
            message: Some(msg.into()),
        }
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Status {
            code: Code::IOError,
            message: Some(msg.into()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code == Code::NotFound
    }

    pub fn is_already_exists(&self) -> bool {
        self.code == Code::AlreadyExists
    }

    pub fn is_invalid_property(&self) -> bool {
        self.code == Code::InvalidProperty
    }

    pub fn is_disabled_state_conflict(&self) -> bool {
        self.code == Code::DisabledStateConflict
    }

    pub fn is_precondition_failed(&self) -> bool {
        self.code == Code::PreconditionFailed
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.code == Code::InvalidArgument
    }

    pub fn is_corruption(&self) -> bool {
        self.code == Code::Corruption
    }

    pub fn is_io_error(&self) -> bool {
        self.code == Code::IOError
    }

    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{:?}: {}", self.code, msg),
            None => write!(f, "{:?}", self.code),
        }
    }
}

impl std::error::Error for Status {}

impl From<std::io::Error> for Status {
    fn from(err: std::io::Error) -> Self {
        Status::io_error(err.to_string())
    }
}

impl From<serde_json::Error> for Status {
    fn from(err: serde_json::Error) -> Self {
        Status::corruption(err.to_string())
    }
}

impl From<regex::Error> for Status {
    fn from(err: regex::Error) -> Self {
        Status::invalid_argument(format!("Invalid pattern: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, Status>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_not_found() {
        let status = Status::not_found("table 'users' not found");
        assert!(status.is_not_found());
        assert!(!status.is_already_exists());
        assert_eq!(status.message(), Some("table 'users' not found"));
    }

    #[test]
    fn test_status_display() {
        let status = Status::disabled_state_conflict("table is disabled");
        assert_eq!(status.to_string(), "DisabledStateConflict: table is disabled");
    }

    #[test]
    fn test_status_from_io_error() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let status: Status = err.into();
        assert!(status.is_io_error());
    }

    #[test]
    fn test_status_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let status: Status = err.into();
        assert!(status.is_corruption());
    }
}
