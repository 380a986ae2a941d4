//! 具名的衍生轉換 (transform) 與集合投影
//!
//! 集合投影的輸出是 `BTreeSet`：兩個元素投影結果相同時會合併成一筆，
//! 需要保留筆數時請改用 `count`。

use crate::core::path::Resolved;
use crate::core::schema::{FieldKind, FieldValue};
use crate::domain::ports::{MappingSource, SourceField};
use crate::utils::error::{MapperError, Result};
use std::collections::{BTreeSet, HashMap};

pub type TransformFn = fn(Resolved<'_>) -> Result<FieldValue>;

#[derive(Clone)]
pub struct Transform {
    pub name: String,
    /// 路徑解析後必須是的種類
    pub input: FieldKind,
    pub output: FieldKind,
    /// 集合元素必須提供的文字欄位
    pub required_fields: &'static [&'static str],
    pub apply: TransformFn,
}

impl Transform {
    pub fn new(name: &str, input: FieldKind, output: FieldKind, apply: TransformFn) -> Self {
        Self {
            name: name.to_string(),
            input,
            output,
            required_fields: &[],
            apply,
        }
    }

    pub fn requiring(mut self, fields: &'static [&'static str]) -> Self {
        self.required_fields = fields;
        self
    }
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transform")
            .field("name", &self.name)
            .field("input", &self.input)
            .field("output", &self.output)
            .field("required_fields", &self.required_fields)
            .finish()
    }
}

/// 讀取元素上的文字欄位；缺值或非文字時回傳 `None`
pub fn text_field(item: &dyn MappingSource, name: &str) -> Option<String> {
    match item.field(name) {
        Some(SourceField::Value(FieldValue::Text(text))) => Some(text),
        _ => None,
    }
}

/// 將集合投影成字串集合，回傳 `None` 的元素會被略過
pub fn project_set<F>(items: &[&dyn MappingSource], projection: F) -> BTreeSet<String>
where
    F: Fn(&dyn MappingSource) -> Option<String>,
{
    items.iter().filter_map(|item| projection(*item)).collect()
}

/// `first_name + last_name`，不加分隔字元
pub fn full_name(item: &dyn MappingSource) -> Option<String> {
    match (text_field(item, "first_name"), text_field(item, "last_name")) {
        (None, None) => None,
        (first, last) => Some(format!(
            "{}{}",
            first.unwrap_or_default(),
            last.unwrap_or_default()
        )),
    }
}

fn full_name_set(resolved: Resolved<'_>) -> Result<FieldValue> {
    Ok(FieldValue::TextSet(project_set(&resolved.into_items(), full_name)))
}

fn name_set(resolved: Resolved<'_>) -> Result<FieldValue> {
    let items = resolved.into_items();
    Ok(FieldValue::TextSet(project_set(&items, |item| {
        text_field(item, "name")
    })))
}

fn count(resolved: Resolved<'_>) -> Result<FieldValue> {
    let len = resolved.into_items().len();
    let len = i64::try_from(len).map_err(|_| MapperError::TransformFailed {
        transform: "count".to_string(),
        reason: format!("{} elements do not fit in an integer field", len),
    })?;
    Ok(FieldValue::Integer(len))
}

fn lowercase(resolved: Resolved<'_>) -> Result<FieldValue> {
    Ok(match resolved.into_value() {
        FieldValue::Text(text) => FieldValue::Text(text.to_lowercase()),
        other => other,
    })
}

/// 依名稱查找 transform
#[derive(Debug, Clone, Default)]
pub struct TransformRegistry {
    transforms: HashMap<String, Transform>,
}

impl TransformRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// 內建：`full_name`、`names`、`count`、`lowercase`
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        let builtins = [
            Transform::new("full_name", FieldKind::Collection, FieldKind::TextSet, full_name_set)
                .requiring(&["first_name", "last_name"]),
            Transform::new("names", FieldKind::Collection, FieldKind::TextSet, name_set)
                .requiring(&["name"]),
            Transform::new("count", FieldKind::Collection, FieldKind::Integer, count),
            Transform::new("lowercase", FieldKind::Text, FieldKind::Text, lowercase),
        ];
        for transform in builtins {
            registry.transforms.insert(transform.name.clone(), transform);
        }
        registry
    }

    pub fn register(&mut self, transform: Transform) -> Result<()> {
        if self.transforms.contains_key(&transform.name) {
            return Err(MapperError::DuplicateTransform {
                name: transform.name,
            });
        }
        tracing::debug!("Registered transform '{}'", transform.name);
        self.transforms.insert(transform.name.clone(), transform);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Transform> {
        self.transforms
            .get(name)
            .ok_or_else(|| MapperError::UnknownTransform {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Person {
        first_name: Option<String>,
        last_name: Option<String>,
    }

    impl MappingSource for Person {
        fn field(&self, name: &str) -> Option<SourceField<'_>> {
            match name {
                "first_name" => Some(SourceField::optional_text(self.first_name.as_deref())),
                "last_name" => Some(SourceField::optional_text(self.last_name.as_deref())),
                _ => None,
            }
        }
    }

    fn person(first: &str, last: &str) -> Person {
        Person {
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
        }
    }

    #[test]
    fn test_full_name_projection_collapses_duplicates() {
        let people = [person("Manoj", "Mishra"), person("Manoj", "Mishra"), person("Asha", "Rao")];
        let items: Vec<&dyn MappingSource> = people.iter().map(|p| p as &dyn MappingSource).collect();

        let registry = TransformRegistry::with_builtins();
        let transform = registry.get("full_name").unwrap();
        let value = (transform.apply)(Resolved::Collection(items)).unwrap();

        let expected: BTreeSet<String> = ["AshaRao", "ManojMishra"].iter().map(|s| s.to_string()).collect();
        assert_eq!(value, FieldValue::TextSet(expected));
    }

    #[test]
    fn test_missing_collection_projects_to_empty_set() {
        let registry = TransformRegistry::with_builtins();
        let value = (registry.get("full_name").unwrap().apply)(Resolved::Missing).unwrap();
        assert_eq!(value, FieldValue::TextSet(BTreeSet::new()));

        let value = (registry.get("count").unwrap().apply)(Resolved::Missing).unwrap();
        assert_eq!(value, FieldValue::Integer(0));
    }

    #[test]
    fn test_full_name_skips_nameless_elements() {
        let people = [
            Person {
                first_name: None,
                last_name: None,
            },
            Person {
                first_name: None,
                last_name: Some("Solo".to_string()),
            },
        ];
        let items: Vec<&dyn MappingSource> = people.iter().map(|p| p as &dyn MappingSource).collect();
        let names = project_set(&items, full_name);
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["Solo".to_string()]);
    }

    #[test]
    fn test_lowercase() {
        let registry = TransformRegistry::with_builtins();
        let value = (registry.get("lowercase").unwrap().apply)(Resolved::Value("Electrical".into())).unwrap();
        assert_eq!(value, FieldValue::Text("electrical".to_string()));
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = TransformRegistry::with_builtins();
        let dup = Transform::new("count", FieldKind::Collection, FieldKind::Integer, count);
        assert!(matches!(
            registry.register(dup),
            Err(MapperError::DuplicateTransform { .. })
        ));
        assert!(registry.get("unknown").is_err());
        assert_eq!(registry.names(), vec!["count", "full_name", "lowercase", "names"]);
    }
}
