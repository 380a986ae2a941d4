use crate::core::schema::FieldValue;
use crate::domain::ports::{MappingSource, SourceField};
use crate::utils::error::{MapperError, Result};
use std::fmt;

/// 已解析的點號來源路徑，例如 `organization.name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePath {
    segments: Vec<String>,
}

impl SourcePath {
    pub fn parse(path: &str) -> Result<Self> {
        let segments: Vec<String> = path.split('.').map(|s| s.trim().to_string()).collect();

        if segments.iter().any(|s| s.is_empty()) {
            return Err(MapperError::InvalidConfigValueError {
                field: "source_path".to_string(),
                value: path.to_string(),
                reason: "Path segments cannot be empty".to_string(),
            });
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }
}

impl fmt::Display for SourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// 執行期路徑解析結果
pub enum Resolved<'a> {
    /// 中間某段參照缺值
    Missing,
    Value(FieldValue),
    Object(&'a dyn MappingSource),
    Collection(Vec<&'a dyn MappingSource>),
}

impl<'a> Resolved<'a> {
    pub fn into_value(self) -> FieldValue {
        match self {
            Resolved::Value(value) => value,
            Resolved::Missing | Resolved::Object(_) | Resolved::Collection(_) => FieldValue::Null,
        }
    }

    /// 缺值的集合視為空集合
    pub fn into_items(self) -> Vec<&'a dyn MappingSource> {
        match self {
            Resolved::Collection(items) => items,
            _ => Vec::new(),
        }
    }
}

/// 逐段存取欄位；任何一段缺值就短路為 `Missing`，絕不失敗
pub fn resolve<'a>(root: &'a dyn MappingSource, path: &SourcePath) -> Resolved<'a> {
    let mut current = root;
    let mut segments = path.segments().peekable();

    while let Some(segment) = segments.next() {
        let is_last = segments.peek().is_none();
        let field = match current.field(segment) {
            Some(field) => field,
            None => {
                tracing::trace!("Field '{}' not found while resolving '{}'", segment, path);
                return Resolved::Missing;
            }
        };

        match field {
            SourceField::Object(Some(next)) if !is_last => current = next,
            SourceField::Object(Some(next)) => return Resolved::Object(next),
            SourceField::Object(None) => return Resolved::Missing,
            SourceField::Value(value) if is_last => return Resolved::Value(value),
            SourceField::Collection(items) if is_last => return Resolved::Collection(items),
            // 純值或集合不能再往下走
            SourceField::Value(_) | SourceField::Collection(_) => return Resolved::Missing,
        }
    }

    Resolved::Object(current)
}
