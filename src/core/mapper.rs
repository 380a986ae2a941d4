use crate::core::path::{self, SourcePath};
use crate::core::projection::{Transform, TransformRegistry};
use crate::core::schema::{FieldKind, FieldSpec, Schema};
use crate::domain::ports::{HasSchema, MappingHook, MappingSource, MappingTarget};
use crate::utils::error::{HookStage, MapperError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::marker::PhantomData;

/// 靜態規則表中的一筆宣告
#[derive(Debug, Clone, Copy)]
pub struct StaticRule {
    pub target: &'static str,
    pub source: &'static str,
    pub transform: Option<&'static str>,
}

impl StaticRule {
    pub const fn path(target: &'static str, source: &'static str) -> Self {
        Self {
            target,
            source,
            transform: None,
        }
    }

    pub const fn derived(target: &'static str, source: &'static str, transform: &'static str) -> Self {
        Self {
            target,
            source,
            transform: Some(transform),
        }
    }
}

/// 一筆映射規則：`target` 欄位由 `source` 路徑（可選 transform）取得
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRule {
    pub target: String,
    pub source: String,
    pub transform: Option<String>,
}

impl MappingRule {
    pub fn path(target: &str, source: &str) -> Self {
        Self {
            target: target.to_string(),
            source: source.to_string(),
            transform: None,
        }
    }

    pub fn derived(target: &str, source: &str, transform: &str) -> Self {
        Self {
            target: target.to_string(),
            source: source.to_string(),
            transform: Some(transform.to_string()),
        }
    }
}

impl From<&StaticRule> for MappingRule {
    fn from(rule: &StaticRule) -> Self {
        Self {
            target: rule.target.to_string(),
            source: rule.source.to_string(),
            transform: rule.transform.map(str::to_string),
        }
    }
}

/// 沒有任何規則的目標欄位如何處理
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmappedTargetPolicy {
    Ignore,
    #[default]
    Warn,
    Error,
}

struct CompiledRule {
    target: &'static str,
    path: SourcePath,
    transform: Option<Transform>,
}

pub struct MapperBuilder<S, T> {
    name: String,
    rules: Vec<MappingRule>,
    ignored: BTreeSet<String>,
    hooks: Vec<Box<dyn MappingHook<S, T>>>,
    registry: TransformRegistry,
    policy: UnmappedTargetPolicy,
    _marker: PhantomData<fn(&S) -> T>,
}

impl<S, T> MapperBuilder<S, T>
where
    S: MappingSource + HasSchema,
    T: MappingTarget,
{
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rules: Vec::new(),
            ignored: BTreeSet::new(),
            hooks: Vec::new(),
            registry: TransformRegistry::with_builtins(),
            policy: UnmappedTargetPolicy::default(),
            _marker: PhantomData,
        }
    }

    pub fn rule(mut self, target: &str, source: &str) -> Self {
        self.rules.push(MappingRule::path(target, source));
        self
    }

    pub fn derived(mut self, target: &str, source: &str, transform: &str) -> Self {
        self.rules.push(MappingRule::derived(target, source, transform));
        self
    }

    pub fn rules<'r>(mut self, rules: impl IntoIterator<Item = &'r StaticRule>) -> Self {
        self.rules.extend(rules.into_iter().map(MappingRule::from));
        self
    }

    /// 取代同一目標欄位的既有規則，沒有則新增
    pub fn override_rule(mut self, rule: MappingRule) -> Self {
        self.rules.retain(|existing| existing.target != rule.target);
        self.ignored.remove(&rule.target);
        self.rules.push(rule);
        self
    }

    /// 排除目標欄位：該欄位的明確規則與隱含對應都不會套用
    pub fn ignore(mut self, target: &str) -> Self {
        self.ignored.insert(target.to_string());
        self
    }

    pub fn hook(mut self, hook: impl MappingHook<S, T> + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn registry(mut self, registry: TransformRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn policy(mut self, policy: UnmappedTargetPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 驗證所有規則並產生 mapper
    ///
    /// 明確規則先套用；其餘目標欄位若來源有同名同種類的欄位就自動對應。
    pub fn build(self) -> Result<ObjectMapper<S, T>> {
        let source_schema = S::schema();
        let target_schema = T::schema();
        let mut compiled = Vec::with_capacity(target_schema.fields.len());
        let mut mapped: BTreeSet<&'static str> = BTreeSet::new();

        for ignored in &self.ignored {
            target_field(target_schema, ignored)?;
        }

        for rule in &self.rules {
            let target = target_field(target_schema, &rule.target)?;
            if self.ignored.contains(&rule.target) {
                tracing::debug!("{}: '{}' is ignored, dropping its rule", self.name, rule.target);
                continue;
            }
            if !mapped.insert(target.name) {
                return Err(MapperError::DuplicateRule {
                    field: rule.target.clone(),
                });
            }
            compiled.push(self.compile(source_schema, target, rule)?);
        }

        let mut unmapped = Vec::new();
        for target in target_schema.fields {
            if mapped.contains(target.name) || self.ignored.contains(target.name) {
                continue;
            }
            match source_schema.field(target.name) {
                Some(source) if source.kind == target.kind && target.kind.is_value() => {
                    tracing::trace!("{}: implicit rule for '{}'", self.name, target.name);
                    compiled.push(CompiledRule {
                        target: target.name,
                        path: SourcePath::parse(source.name)?,
                        transform: None,
                    });
                    mapped.insert(target.name);
                }
                _ => unmapped.push(target.name.to_string()),
            }
        }

        if !unmapped.is_empty() {
            match self.policy {
                UnmappedTargetPolicy::Ignore => {}
                UnmappedTargetPolicy::Warn => tracing::warn!(
                    "⚠️ {}: unmapped target fields on {}: {}",
                    self.name,
                    target_schema.type_name,
                    unmapped.join(", ")
                ),
                UnmappedTargetPolicy::Error => {
                    return Err(MapperError::UnmappedTargetFields {
                        type_name: target_schema.type_name.to_string(),
                        fields: unmapped,
                    })
                }
            }
        }

        tracing::debug!(
            "🔧 {}: built {} rules ({} -> {}), {} hooks",
            self.name,
            compiled.len(),
            source_schema.type_name,
            target_schema.type_name,
            self.hooks.len()
        );

        Ok(ObjectMapper {
            name: self.name,
            rules: compiled,
            hooks: self.hooks,
            _marker: PhantomData,
        })
    }

    fn compile(
        &self,
        source_schema: &'static Schema,
        target: &'static FieldSpec,
        rule: &MappingRule,
    ) -> Result<CompiledRule> {
        let path = SourcePath::parse(&rule.source)?;
        let source = source_schema.resolve_path(path.segments())?;

        let (produced, transform) = match &rule.transform {
            Some(name) => {
                let transform = self.registry.get(name)?;
                if transform.input != source.kind {
                    return Err(MapperError::KindMismatch {
                        field: format!("{} (transform '{}')", rule.target, name),
                        expected: transform.input,
                        found: source.kind,
                    });
                }
                if let Some(element) = source.nested {
                    for required in transform.required_fields {
                        if element.field(required).map(|f| f.kind) != Some(FieldKind::Text) {
                            return Err(MapperError::TransformRequirement {
                                transform: name.clone(),
                                field: required.to_string(),
                                element_type: element.type_name.to_string(),
                            });
                        }
                    }
                }
                (transform.output, Some(transform.clone()))
            }
            None => (source.kind, None),
        };

        if produced != target.kind {
            return Err(MapperError::KindMismatch {
                field: rule.target.clone(),
                expected: target.kind,
                found: produced,
            });
        }

        Ok(CompiledRule {
            target: target.name,
            path,
            transform,
        })
    }
}

fn target_field(schema: &'static Schema, name: &str) -> Result<&'static FieldSpec> {
    schema.field(name).ok_or_else(|| MapperError::UnknownTargetField {
        type_name: schema.type_name.to_string(),
        field: name.to_string(),
    })
}

/// 已驗證的 (來源, 目標) 映射
///
/// 每次呼叫：建立預設目標 → before 掛鉤 → 欄位複製 → after 掛鉤。
/// 不持有任何可變共享狀態。
pub struct ObjectMapper<S, T> {
    name: String,
    rules: Vec<CompiledRule>,
    hooks: Vec<Box<dyn MappingHook<S, T>>>,
    _marker: PhantomData<fn(&S) -> T>,
}

impl<S, T> ObjectMapper<S, T>
where
    S: MappingSource + HasSchema,
    T: MappingTarget,
{
    pub fn builder(name: &str) -> MapperBuilder<S, T> {
        MapperBuilder::new(name)
    }

    /// 目前生效的目標欄位（依套用順序）
    pub fn mapped_fields(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.target).collect()
    }

    pub fn map(&self, source: &S) -> Result<T> {
        let mut target = T::default();

        self.run_hooks(HookStage::Before, source, &mut target)?;

        for rule in &self.rules {
            let resolved = path::resolve(source, &rule.path);
            let value = match &rule.transform {
                Some(transform) => (transform.apply)(resolved)?,
                None => resolved.into_value(),
            };
            target.set_field(rule.target, value)?;
        }

        self.run_hooks(HookStage::After, source, &mut target)?;

        tracing::trace!("{}: mapped {} fields", self.name, self.rules.len());
        Ok(target)
    }

    /// 來源缺值時回傳預設（空的）目標，不視為錯誤
    pub fn map_optional(&self, source: Option<&S>) -> Result<T> {
        match source {
            Some(source) => self.map(source),
            None => {
                tracing::debug!("{}: no source, returning default target", self.name);
                Ok(T::default())
            }
        }
    }

    /// 任一筆失敗即中止，不回傳部分結果
    pub fn map_all<'s, I>(&self, sources: I) -> Result<Vec<T>>
    where
        I: IntoIterator<Item = &'s S>,
        S: 's,
    {
        sources.into_iter().map(|source| self.map(source)).collect()
    }

    fn run_hooks(&self, stage: HookStage, source: &S, target: &mut T) -> Result<()> {
        for hook in &self.hooks {
            let outcome = match stage {
                HookStage::Before => hook.before_mapping(source, target),
                HookStage::After => hook.after_mapping(source, target),
            };
            if let Err(e) = outcome {
                tracing::error!("❌ {}: hook '{}' failed during {} mapping: {}", self.name, hook.name(), stage, e);
                return Err(MapperError::Hook {
                    hook: hook.name().to_string(),
                    stage,
                    message: e.to_string(),
                });
            }
        }
        Ok(())
    }
}
