use crate::config::toml_config::{MapperConfig, MappingSection, DEFAULT_DEPARTMENT_SUFFIX};
use crate::core::{
    HasSchema, MapperBuilder, MappingHook, MappingSource, MappingTarget, ObjectMapper, StaticRule,
    UnmappedTargetPolicy,
};
use crate::domain::dto::{DepartmentDto, EmployeeDto, OrganizationDto};
use crate::domain::model::{Department, Employee, Organization};
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// Employee -> EmployeeDto；其餘同名欄位自動對應
pub const EMPLOYEE_RULES: &[StaticRule] = &[
    StaticRule::path("department_name", "department_name"),
    StaticRule::path("organization_name", "organization.name"),
];

pub const DEPARTMENT_RULES: &[StaticRule] = &[
    StaticRule::derived("employee_names", "employees", "full_name"),
    StaticRule::path("organization_name", "organization.name"),
];

pub const ORGANIZATION_RULES: &[StaticRule] = &[
    StaticRule::derived("department_names", "departments", "names"),
    StaticRule::derived("employee_names", "employees", "full_name"),
];

/// before：組織名稱先填入小寫的部門名稱
pub struct LowercaseOrganizationName;

impl MappingHook<Department, DepartmentDto> for LowercaseOrganizationName {
    fn name(&self) -> &str {
        "lowercase_organization_name"
    }

    fn before_mapping(&self, source: &Department, target: &mut DepartmentDto) -> anyhow::Result<()> {
        target.organization_name = Some(source.name.to_lowercase());
        tracing::debug!("Before mapping: {:?}", target);
        Ok(())
    }
}

/// after：組織名稱改為小寫部門名稱加上後綴，覆蓋欄位複製的結果
pub struct OrganizationNameSuffix {
    suffix: String,
}

impl OrganizationNameSuffix {
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
        }
    }
}

impl Default for OrganizationNameSuffix {
    fn default() -> Self {
        Self::new(DEFAULT_DEPARTMENT_SUFFIX)
    }
}

impl MappingHook<Department, DepartmentDto> for OrganizationNameSuffix {
    fn name(&self) -> &str {
        "organization_name_suffix"
    }

    fn after_mapping(&self, source: &Department, target: &mut DepartmentDto) -> anyhow::Result<()> {
        target.organization_name = Some(format!("{}{}", source.name.to_lowercase(), self.suffix));
        tracing::debug!("After mapping: {:?}", target);
        Ok(())
    }
}

/// 實體到 DTO 的 mapper 集合
pub struct EntityToDtoMapper {
    employee: ObjectMapper<Employee, EmployeeDto>,
    department: ObjectMapper<Department, DepartmentDto>,
    organization: ObjectMapper<Organization, OrganizationDto>,
}

impl EntityToDtoMapper {
    /// 使用靜態規則表
    pub fn new() -> Result<Self> {
        Self::from_config(&MapperConfig::default())
    }

    /// 靜態規則表再套上配置中的覆寫
    pub fn from_config(config: &MapperConfig) -> Result<Self> {
        config.validate()?;
        let policy = config.unmapped_target_policy();

        let employee: ObjectMapper<Employee, EmployeeDto> = with_section(
            ObjectMapper::builder("employee_to_dto").rules(EMPLOYEE_RULES),
            config.mappings.employee.as_ref(),
            policy,
        )
        .build()?;

        let department: ObjectMapper<Department, DepartmentDto> = with_section(
            ObjectMapper::builder("department_to_dto")
                .rules(DEPARTMENT_RULES)
                .hook(LowercaseOrganizationName)
                .hook(OrganizationNameSuffix::new(config.department_suffix())),
            config.mappings.department.as_ref(),
            policy,
        )
        .build()?;

        let organization: ObjectMapper<Organization, OrganizationDto> = with_section(
            ObjectMapper::builder("organization_to_dto").rules(ORGANIZATION_RULES),
            config.mappings.organization.as_ref(),
            policy,
        )
        .build()?;

        tracing::info!("✅ Entity mappers ready (unmapped target policy: {:?})", policy);

        Ok(Self {
            employee,
            department,
            organization,
        })
    }

    pub fn employee_to_dto(&self, source: &Employee) -> Result<EmployeeDto> {
        self.employee.map(source)
    }

    pub fn department_to_dto(&self, source: &Department) -> Result<DepartmentDto> {
        self.department.map(source)
    }

    pub fn organization_to_dto(&self, source: &Organization) -> Result<OrganizationDto> {
        self.organization.map(source)
    }

    pub fn employee_mapper(&self) -> &ObjectMapper<Employee, EmployeeDto> {
        &self.employee
    }

    pub fn department_mapper(&self) -> &ObjectMapper<Department, DepartmentDto> {
        &self.department
    }

    pub fn organization_mapper(&self) -> &ObjectMapper<Organization, OrganizationDto> {
        &self.organization
    }
}

fn with_section<S, T>(
    mut builder: MapperBuilder<S, T>,
    section: Option<&MappingSection>,
    policy: UnmappedTargetPolicy,
) -> MapperBuilder<S, T>
where
    S: MappingSource + HasSchema,
    T: MappingTarget,
{
    if let Some(section) = section {
        for rule in section.rules() {
            tracing::debug!("Overriding rule for '{}' from config", rule.target);
            builder = builder.override_rule(rule);
        }
        for ignored in &section.ignore {
            builder = builder.ignore(ignored);
        }
    }
    builder.policy(policy)
}
