use crate::error::{ErrorKind, Failure};

/// 面向用户的单条消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(Failure),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Success(message) => message,
            Notice::Error(failure) => &failure.message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Notice::Success(_) => None,
            Notice::Error(failure) => Some(failure.kind),
        }
    }
}
