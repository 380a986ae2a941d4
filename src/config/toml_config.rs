use crate::core::path::SourcePath;
use crate::core::{MappingRule, UnmappedTargetPolicy};
use crate::utils::error::{MapperError, Result};
use crate::utils::validation::{validate_field_name, validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_DEPARTMENT_SUFFIX: &str = "_DEPT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapperConfig {
    #[serde(default)]
    pub mapper: MapperSettings,
    #[serde(default)]
    pub mappings: MappingSections,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapperSettings {
    pub unmapped_target_policy: Option<UnmappedTargetPolicy>,
    pub department_suffix: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingSections {
    pub employee: Option<MappingSection>,
    pub department: Option<MappingSection>,
    pub organization: Option<MappingSection>,
}

/// 單一 (來源, 目標) 對的覆寫規則
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingSection {
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, RuleSpec>,
}

/// `field = "a.b"` 或 `field = { path = "a", transform = "names" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    Path(String),
    Derived { path: String, transform: String },
}

impl MappingSection {
    pub fn rules(&self) -> Vec<MappingRule> {
        self.fields
            .iter()
            .map(|(target, spec)| match spec {
                RuleSpec::Path(path) => MappingRule::path(target, path),
                RuleSpec::Derived { path, transform } => MappingRule::derived(target, path, transform),
            })
            .collect()
    }

    fn validate_section(&self, section: &str) -> Result<()> {
        for (target, spec) in &self.fields {
            let field = format!("mappings.{}.{}", section, target);
            validate_field_name(&field, target)?;
            match spec {
                RuleSpec::Path(path) => {
                    SourcePath::parse(path).map_err(|_| invalid_path(&field, path))?;
                }
                RuleSpec::Derived { path, transform } => {
                    SourcePath::parse(path).map_err(|_| invalid_path(&field, path))?;
                    validate_non_empty_string(&format!("{}.transform", field), transform)?;
                }
            }
        }
        for ignored in &self.ignore {
            validate_field_name(&format!("mappings.{}.ignore", section), ignored)?;
        }
        Ok(())
    }
}

fn invalid_path(field: &str, path: &str) -> MapperError {
    MapperError::InvalidConfigValueError {
        field: field.to_string(),
        value: path.to_string(),
        reason: "Source path must be dot-separated field names".to_string(),
    }
}

impl MapperConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MapperError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MapperError::ConfigParseError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DEPT_SUFFIX})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MapperError::ConfigParseError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn unmapped_target_policy(&self) -> UnmappedTargetPolicy {
        self.mapper.unmapped_target_policy.unwrap_or_default()
    }

    pub fn department_suffix(&self) -> &str {
        self.mapper
            .department_suffix
            .as_deref()
            .unwrap_or(DEFAULT_DEPARTMENT_SUFFIX)
    }
}

impl Validate for MapperConfig {
    fn validate(&self) -> Result<()> {
        if let Some(suffix) = &self.mapper.department_suffix {
            validate_non_empty_string("mapper.department_suffix", suffix)?;
        }

        let sections = [
            ("employee", &self.mappings.employee),
            ("department", &self.mappings.department),
            ("organization", &self.mappings.organization),
        ];
        for (name, section) in sections {
            if let Some(section) = section {
                section.validate_section(name)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_CONFIG: &str = r#"
[mapper]
unmapped_target_policy = "error"
department_suffix = "_UNIT"

[mappings.employee]
organization_name = "organization.name"

[mappings.department]
ignore = ["organization_name"]
employee_names = { path = "employees", transform = "full_name" }
"#;

    #[test]
    fn test_parse_full_config() {
        let config = MapperConfig::from_toml_str(FULL_CONFIG).unwrap();

        assert_eq!(config.unmapped_target_policy(), UnmappedTargetPolicy::Error);
        assert_eq!(config.department_suffix(), "_UNIT");

        let employee = config.mappings.employee.as_ref().unwrap();
        assert_eq!(
            employee.rules(),
            vec![MappingRule::path("organization_name", "organization.name")]
        );

        let department = config.mappings.department.as_ref().unwrap();
        assert_eq!(department.ignore, vec!["organization_name".to_string()]);
        assert_eq!(
            department.rules(),
            vec![MappingRule::derived("employee_names", "employees", "full_name")]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = MapperConfig::from_toml_str("").unwrap();
        assert_eq!(config.unmapped_target_policy(), UnmappedTargetPolicy::Warn);
        assert_eq!(config.department_suffix(), DEFAULT_DEPARTMENT_SUFFIX);
        assert!(config.mappings.employee.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SMALL_MAPPER_TEST_SUFFIX", "_TEAM");

        let config = MapperConfig::from_toml_str(
            r#"
[mapper]
department_suffix = "${SMALL_MAPPER_TEST_SUFFIX}"
"#,
        )
        .unwrap();
        assert_eq!(config.department_suffix(), "_TEAM");

        std::env::remove_var("SMALL_MAPPER_TEST_SUFFIX");
    }

    #[test]
    fn test_config_validation() {
        let config = MapperConfig::from_toml_str(
            r#"
[mappings.employee]
organization_name = "organization..name"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(MapperError::InvalidConfigValueError { .. })
        ));

        let config = MapperConfig::from_toml_str(
            r#"
[mapper]
department_suffix = "  "
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let result = MapperConfig::from_toml_str(
            r#"
[mapper]
unmapped_target_policy = "explode"
"#,
        );
        assert!(matches!(result, Err(MapperError::ConfigParseError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(FULL_CONFIG.as_bytes()).unwrap();

        let config = MapperConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.department_suffix(), "_UNIT");
    }
}
