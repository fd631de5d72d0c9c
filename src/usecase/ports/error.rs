#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    Parse(String),
    NoUsableData,
    EmptySave,
    RowOutOfBounds { index: usize, len: usize },
    UnknownColumn(String),
    Export(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Parse(message) => write!(f, "failed to parse file: {message}"),
            EngineError::NoUsableData => write!(f, "no usable data found in file"),
            EngineError::EmptySave => write!(f, "nothing to save: the table has no rows"),
            EngineError::RowOutOfBounds { index, len } => {
                write!(f, "row {index} out of range (rows: {len})")
            }
            EngineError::UnknownColumn(column) => write!(f, "unknown column: {column}"),
            EngineError::Export(message) => write!(f, "failed to save file: {message}"),
        }
    }
}

impl std::error::Error for EngineError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// The one message currently shown to the user; setting a new one replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&EngineError> for Notice {
    fn from(err: &EngineError) -> Self {
        Notice::error(err.to_string())
    }
}
