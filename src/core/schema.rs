//! 靜態欄位存取表 (schema) 與映射時流動的欄位值
//!
//! 每個來源/目標型別都宣告一張 `Schema`，規則在 mapper 建立時就依此驗證，
//! 執行期不需要任何反射。

use crate::utils::error::{MapperError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 欄位種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    TextSet,
    Object,
    Collection,
}

impl FieldKind {
    /// 可以直接複製到目標欄位的種類
    pub fn is_value(self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Integer | FieldKind::TextSet)
    }
}

#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// `Object` / `Collection` 欄位指向的元素型別
    pub nested: Option<&'static Schema>,
}

impl FieldSpec {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            nested: None,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
            nested: None,
        }
    }

    pub const fn text_set(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::TextSet,
            nested: None,
        }
    }

    pub const fn object(name: &'static str, schema: &'static Schema) -> Self {
        Self {
            name,
            kind: FieldKind::Object,
            nested: Some(schema),
        }
    }

    pub const fn collection(name: &'static str, schema: &'static Schema) -> Self {
        Self {
            name,
            kind: FieldKind::Collection,
            nested: Some(schema),
        }
    }
}

#[derive(Debug)]
pub struct Schema {
    pub type_name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// 靜態解析點號路徑，回傳最後一段的欄位定義
    ///
    /// 中間段必須是 `Object`；集合不能再往下走，需要搭配 transform 使用。
    pub fn resolve_path<'p>(
        &'static self,
        segments: impl IntoIterator<Item = &'p str>,
    ) -> Result<&'static FieldSpec> {
        let mut schema: &'static Schema = self;
        let mut walked: Vec<&str> = Vec::new();
        let mut current: Option<&'static FieldSpec> = None;

        for segment in segments {
            if let Some(previous) = current {
                match (previous.kind, previous.nested) {
                    (FieldKind::Object, Some(nested)) => schema = nested,
                    _ => {
                        return Err(MapperError::UnknownSourcePath {
                            type_name: self.type_name.to_string(),
                            path: join_path(&walked, segment),
                            reason: format!(
                                "'{}' is a {:?} field and cannot be traversed",
                                previous.name, previous.kind
                            ),
                        })
                    }
                }
            }

            let spec = schema.field(segment).ok_or_else(|| MapperError::UnknownSourcePath {
                type_name: self.type_name.to_string(),
                path: join_path(&walked, segment),
                reason: format!("{} has no field '{}'", schema.type_name, segment),
            })?;
            walked.push(segment);
            current = Some(spec);
        }

        current.ok_or_else(|| MapperError::UnknownSourcePath {
            type_name: self.type_name.to_string(),
            path: String::new(),
            reason: "path is empty".to_string(),
        })
    }
}

fn join_path(walked: &[&str], segment: &str) -> String {
    let mut parts = walked.to_vec();
    parts.push(segment);
    parts.join(".")
}

/// 映射過程中流動的值
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Text(String),
    Integer(i64),
    TextSet(BTreeSet<String>),
}

impl FieldValue {
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            FieldValue::Null => None,
            FieldValue::Text(_) => Some(FieldKind::Text),
            FieldValue::Integer(_) => Some(FieldKind::Integer),
            FieldValue::TextSet(_) => Some(FieldKind::TextSet),
        }
    }

    pub fn into_text(self, field: &str) -> Result<Option<String>> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::Text(text) => Ok(Some(text)),
            other => Err(other.mismatch(field, FieldKind::Text)),
        }
    }

    pub fn into_integer(self, field: &str) -> Result<Option<i64>> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::Integer(value) => Ok(Some(value)),
            other => Err(other.mismatch(field, FieldKind::Integer)),
        }
    }

    /// `Null` 視為空集合，目標集合永遠不會是缺值
    pub fn into_text_set(self, field: &str) -> Result<BTreeSet<String>> {
        match self {
            FieldValue::Null => Ok(BTreeSet::new()),
            FieldValue::TextSet(set) => Ok(set),
            other => Err(other.mismatch(field, FieldKind::TextSet)),
        }
    }

    fn mismatch(&self, field: &str, expected: FieldKind) -> MapperError {
        MapperError::KindMismatch {
            field: field.to_string(),
            expected,
            found: self.kind().unwrap_or(expected),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<Option<&str>> for FieldValue {
    fn from(value: Option<&str>) -> Self {
        value.map(FieldValue::from).unwrap_or(FieldValue::Null)
    }
}
