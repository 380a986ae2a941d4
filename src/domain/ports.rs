use crate::core::schema::{FieldValue, Schema};
use crate::utils::error::Result;

/// 型別層級的欄位存取表
pub trait HasSchema {
    fn schema() -> &'static Schema;
}

/// 執行期讀取單一欄位的結果
pub enum SourceField<'a> {
    Value(FieldValue),
    /// `None` 表示參照缺值
    Object(Option<&'a dyn MappingSource>),
    Collection(Vec<&'a dyn MappingSource>),
}

impl<'a> SourceField<'a> {
    pub fn text(value: &str) -> Self {
        SourceField::Value(FieldValue::from(value))
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        SourceField::Value(FieldValue::from(value))
    }

    pub fn integer(value: i64) -> Self {
        SourceField::Value(FieldValue::Integer(value))
    }

    pub fn collection<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a T>,
        T: MappingSource + 'a,
    {
        SourceField::Collection(items.into_iter().map(|item| item as &dyn MappingSource).collect())
    }
}

/// 可作為映射來源的物件，只讀不寫
pub trait MappingSource {
    fn field(&self, name: &str) -> Option<SourceField<'_>>;
}

/// 映射目標，從 `Default` 開始逐欄填值
pub trait MappingTarget: HasSchema + Default {
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()>;
}

/// 映射前後的掛鉤
///
/// `before_mapping` 在欄位複製之前執行，`after_mapping` 在複製完成之後執行；
/// 後執行者的寫入會覆蓋先執行者。回傳錯誤會中止該次映射。
pub trait MappingHook<S, T>: Send + Sync {
    fn name(&self) -> &str;

    fn before_mapping(&self, _source: &S, _target: &mut T) -> anyhow::Result<()> {
        Ok(())
    }

    fn after_mapping(&self, _source: &S, _target: &mut T) -> anyhow::Result<()> {
        Ok(())
    }
}
