/// ## Loader and player errors
///
/// The interpreter itself never fails. Malformed event content degrades
/// to skipped or frozen sequences. Errors only surface while loading an
/// event database or driving the terminal player.

#[derive(Clone, PartialEq)]
pub struct Error {
    code: u16,
    event_id: Option<i32>,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $event:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_event($event)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code: code as u16,
            event_id: None,
            message: String::new(),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code as u16
    }

    pub fn in_event(self, event_id: i32) -> Error {
        debug_assert!(self.event_id.is_none());
        Error {
            event_id: Some(event_id),
            ..self
        }
    }

    pub fn message<S: Into<String>>(self, message: S) -> Error {
        debug_assert!(self.message.is_empty());
        Error {
            message: message.into(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    FileNotFound = 1,
    MalformedDatabase = 2,
    DuplicateId = 3,
    UndefinedMap = 4,
    UndefinedEvent = 5,
    InvalidConfig = 6,
    IoError = 7,
    InternalError = 51,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = match self.code {
            1 => "FILE NOT FOUND",
            2 => "MALFORMED DATABASE",
            3 => "DUPLICATE ID",
            4 => "UNDEFINED MAP",
            5 => "UNDEFINED EVENT",
            6 => "INVALID CONFIG",
            7 => "I/O ERROR",
            51 => "INTERNAL ERROR",
            _ => "",
        };
        let mut suffix = String::new();
        if let Some(event_id) = self.event_id {
            suffix.push_str(&format!(" EVENT {}", event_id));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        if code_str.is_empty() {
            if suffix.is_empty() {
                write!(f, "PROGRAM ERROR {}", self.code)
            } else {
                write!(f, "PROGRAM ERROR {} IN{}", self.code, suffix)
            }
        } else if suffix.is_empty() {
            write!(f, "{}", code_str)
        } else {
            write!(f, "{} IN{}", code_str, suffix)
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Error {
        match error.kind() {
            std::io::ErrorKind::NotFound => Error::new(ErrorCode::FileNotFound),
            _ => Error::new(ErrorCode::IoError),
        }
        .message(error.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Error {
        Error::new(ErrorCode::MalformedDatabase).message(format!(
            "line {} column {}: {}",
            error.line(),
            error.column(),
            error
        ))
    }
}
