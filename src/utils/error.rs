use thiserror::Error;

use crate::core::schema::FieldKind;

/// 映射掛鉤執行階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    Before,
    After,
}

impl std::fmt::Display for HookStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookStage::Before => write!(f, "before"),
            HookStage::After => write!(f, "after"),
        }
    }
}

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration parse error in {field}: {message}")]
    ConfigParseError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{type_name} has no field '{field}'")]
    UnknownTargetField { type_name: String, field: String },

    #[error("Cannot resolve source path '{path}' on {type_name}: {reason}")]
    UnknownSourcePath {
        type_name: String,
        path: String,
        reason: String,
    },

    #[error("Unknown transform '{name}'")]
    UnknownTransform { name: String },

    #[error("Transform '{name}' is already registered")]
    DuplicateTransform { name: String },

    #[error("Transform '{transform}' needs text field '{field}' on {element_type}")]
    TransformRequirement {
        transform: String,
        field: String,
        element_type: String,
    },

    #[error("Transform '{transform}' failed: {reason}")]
    TransformFailed { transform: String, reason: String },

    #[error("Target field '{field}' is mapped more than once")]
    DuplicateRule { field: String },

    #[error("Kind mismatch for '{field}': expected {expected:?}, found {found:?}")]
    KindMismatch {
        field: String,
        expected: FieldKind,
        found: FieldKind,
    },

    #[error("Unmapped target fields on {type_name}: {}", .fields.join(", "))]
    UnmappedTargetFields {
        type_name: String,
        fields: Vec<String>,
    },

    #[error("Hook '{hook}' failed during {stage} mapping: {message}")]
    Hook {
        hook: String,
        stage: HookStage,
        message: String,
    },
}

/// 錯誤分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    RuleTable,
    Mapping,
    System,
}

impl MapperError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MapperError::IoError(_) | MapperError::SerializationError(_) => ErrorCategory::System,
            MapperError::ConfigParseError { .. } | MapperError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            MapperError::Hook { .. } | MapperError::TransformFailed { .. } => ErrorCategory::Mapping,
            _ => ErrorCategory::RuleTable,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Mapping configuration is invalid: {}", self),
            ErrorCategory::RuleTable => format!("Mapping rules could not be built: {}", self),
            ErrorCategory::Mapping => format!("Mapping failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the TOML file syntax and field values",
            ErrorCategory::RuleTable => {
                "Check that every rule names an existing target field, source path and transform"
            }
            ErrorCategory::Mapping => "Inspect the failing hook and the source object it received",
            ErrorCategory::System => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, MapperError>;
