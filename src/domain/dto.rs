use crate::core::schema::{FieldSpec, FieldValue, Schema};
use crate::domain::ports::{HasSchema, MappingTarget};
use crate::utils::error::{MapperError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub static EMPLOYEE_DTO_SCHEMA: Schema = Schema {
    type_name: "EmployeeDto",
    fields: &[
        FieldSpec::text("first_name"),
        FieldSpec::text("last_name"),
        FieldSpec::text("position"),
        FieldSpec::integer("salary"),
        FieldSpec::integer("age"),
        FieldSpec::text("department_name"),
        FieldSpec::text("organization_name"),
    ],
};

pub static DEPARTMENT_DTO_SCHEMA: Schema = Schema {
    type_name: "DepartmentDto",
    fields: &[
        FieldSpec::text("name"),
        FieldSpec::text_set("employee_names"),
        FieldSpec::text("organization_name"),
    ],
};

pub static ORGANIZATION_DTO_SCHEMA: Schema = Schema {
    type_name: "OrganizationDto",
    fields: &[
        FieldSpec::text("name"),
        FieldSpec::text_set("department_names"),
        FieldSpec::text_set("employee_names"),
    ],
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub salary: Option<i64>,
    pub age: Option<i64>,
    pub department_name: Option<String>,
    pub organization_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDto {
    pub name: Option<String>,
    pub employee_names: BTreeSet<String>,
    pub organization_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDto {
    pub name: Option<String>,
    pub department_names: BTreeSet<String>,
    pub employee_names: BTreeSet<String>,
}

fn unknown_field(schema: &Schema, name: &str) -> MapperError {
    MapperError::UnknownTargetField {
        type_name: schema.type_name.to_string(),
        field: name.to_string(),
    }
}

impl HasSchema for EmployeeDto {
    fn schema() -> &'static Schema {
        &EMPLOYEE_DTO_SCHEMA
    }
}

impl MappingTarget for EmployeeDto {
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        match name {
            "first_name" => self.first_name = value.into_text(name)?,
            "last_name" => self.last_name = value.into_text(name)?,
            "position" => self.position = value.into_text(name)?,
            "salary" => self.salary = value.into_integer(name)?,
            "age" => self.age = value.into_integer(name)?,
            "department_name" => self.department_name = value.into_text(name)?,
            "organization_name" => self.organization_name = value.into_text(name)?,
            _ => return Err(unknown_field(&EMPLOYEE_DTO_SCHEMA, name)),
        }
        Ok(())
    }
}

impl HasSchema for DepartmentDto {
    fn schema() -> &'static Schema {
        &DEPARTMENT_DTO_SCHEMA
    }
}

impl MappingTarget for DepartmentDto {
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        match name {
            "name" => self.name = value.into_text(name)?,
            "employee_names" => self.employee_names = value.into_text_set(name)?,
            "organization_name" => self.organization_name = value.into_text(name)?,
            _ => return Err(unknown_field(&DEPARTMENT_DTO_SCHEMA, name)),
        }
        Ok(())
    }
}

impl HasSchema for OrganizationDto {
    fn schema() -> &'static Schema {
        &ORGANIZATION_DTO_SCHEMA
    }
}

impl MappingTarget for OrganizationDto {
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        match name {
            "name" => self.name = value.into_text(name)?,
            "department_names" => self.department_names = value.into_text_set(name)?,
            "employee_names" => self.employee_names = value.into_text_set(name)?,
            _ => return Err(unknown_field(&ORGANIZATION_DTO_SCHEMA, name)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_field_rejects_unknown_and_mismatched() {
        let mut dto = EmployeeDto::default();
        assert!(dto.set_field("nickname", FieldValue::from("x")).is_err());
        assert!(dto.set_field("salary", FieldValue::from("x")).is_err());

        dto.set_field("salary", FieldValue::Integer(10000)).unwrap();
        assert_eq!(dto.salary, Some(10000));
    }

    #[test]
    fn test_serialized_field_names() {
        let dto = DepartmentDto {
            name: Some("Electrical".to_string()),
            employee_names: BTreeSet::new(),
            organization_name: Some("electrical_DEPT".to_string()),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["organizationName"], "electrical_DEPT");
        assert_eq!(json["employeeNames"], serde_json::json!([]));
    }
}
