//! 組織領域模型
//!
//! 父物件獨佔子物件；子物件只保留 `OrganizationRef`（以名稱識別的非擁有參照），
//! 不會形成循環參照。

use crate::core::schema::{FieldSpec, Schema};
use crate::domain::ports::{HasSchema, MappingSource, SourceField};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub static ORGANIZATION_REF_SCHEMA: Schema = Schema {
    type_name: "OrganizationRef",
    fields: &[FieldSpec::text("name")],
};

pub static EMPLOYEE_SCHEMA: Schema = Schema {
    type_name: "Employee",
    fields: &[
        FieldSpec::text("first_name"),
        FieldSpec::text("last_name"),
        FieldSpec::text("position"),
        FieldSpec::integer("salary"),
        FieldSpec::integer("age"),
        FieldSpec::text("department_name"),
        FieldSpec::object("organization", &ORGANIZATION_REF_SCHEMA),
    ],
};

pub static DEPARTMENT_SCHEMA: Schema = Schema {
    type_name: "Department",
    fields: &[
        FieldSpec::text("name"),
        FieldSpec::collection("employees", &EMPLOYEE_SCHEMA),
        FieldSpec::object("organization", &ORGANIZATION_REF_SCHEMA),
    ],
};

pub static ORGANIZATION_SCHEMA: Schema = Schema {
    type_name: "Organization",
    fields: &[
        FieldSpec::text("name"),
        FieldSpec::collection("departments", &DEPARTMENT_SCHEMA),
        FieldSpec::collection("employees", &EMPLOYEE_SCHEMA),
    ],
};

/// 指向所屬組織的非擁有參照
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrganizationRef {
    pub name: String,
}

impl OrganizationRef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Employee {
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub salary: i64,
    pub age: i64,
    /// 所屬部門名稱的反正規化副本
    pub department_name: Option<String>,
    pub organization: Option<OrganizationRef>,
}

impl Employee {
    pub fn new(first_name: &str, last_name: &str, position: &str, salary: i64, age: i64) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            position: position.to_string(),
            salary,
            age,
            department_name: None,
            organization: None,
        }
    }

    pub fn with_department(mut self, department_name: &str) -> Self {
        self.department_name = Some(department_name.to_string());
        self
    }

    pub fn with_organization(mut self, organization: OrganizationRef) -> Self {
        self.organization = Some(organization);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
    pub employees: BTreeSet<Employee>,
    pub organization: Option<OrganizationRef>,
}

impl Department {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            employees: BTreeSet::new(),
            organization: None,
        }
    }

    pub fn with_organization(mut self, organization: OrganizationRef) -> Self {
        self.attach_to(organization);
        self
    }

    /// 加入員工，並同步員工的部門名稱與組織參照
    pub fn add_employee(&mut self, mut employee: Employee) -> bool {
        employee.department_name = Some(self.name.clone());
        employee.organization = self.organization.clone();
        self.employees.insert(employee)
    }

    /// 設定所屬組織並重新標記已加入的員工
    fn attach_to(&mut self, organization: OrganizationRef) {
        self.employees = std::mem::take(&mut self.employees)
            .into_iter()
            .map(|mut employee| {
                employee.organization = Some(organization.clone());
                employee
            })
            .collect();
        self.organization = Some(organization);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    pub departments: BTreeSet<Department>,
    pub employees: BTreeSet<Employee>,
}

impl Organization {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            departments: BTreeSet::new(),
            employees: BTreeSet::new(),
        }
    }

    pub fn reference(&self) -> OrganizationRef {
        OrganizationRef::new(&self.name)
    }

    /// 收下部門；部門員工同時登記到組織的員工集合
    pub fn add_department(&mut self, mut department: Department) -> bool {
        department.attach_to(self.reference());
        self.employees.extend(department.employees.iter().cloned());
        self.departments.insert(department)
    }

    /// 直接隸屬組織、不屬於任何部門的員工
    pub fn add_employee(&mut self, mut employee: Employee) -> bool {
        employee.organization = Some(self.reference());
        self.employees.insert(employee)
    }

    pub fn department(&self, name: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.name == name)
    }
}

impl HasSchema for OrganizationRef {
    fn schema() -> &'static Schema {
        &ORGANIZATION_REF_SCHEMA
    }
}

impl MappingSource for OrganizationRef {
    fn field(&self, name: &str) -> Option<SourceField<'_>> {
        match name {
            "name" => Some(SourceField::text(&self.name)),
            _ => None,
        }
    }
}

impl HasSchema for Employee {
    fn schema() -> &'static Schema {
        &EMPLOYEE_SCHEMA
    }
}

impl MappingSource for Employee {
    fn field(&self, name: &str) -> Option<SourceField<'_>> {
        let field = match name {
            "first_name" => SourceField::text(&self.first_name),
            "last_name" => SourceField::text(&self.last_name),
            "position" => SourceField::text(&self.position),
            "salary" => SourceField::integer(self.salary),
            "age" => SourceField::integer(self.age),
            "department_name" => SourceField::optional_text(self.department_name.as_deref()),
            "organization" => SourceField::Object(
                self.organization
                    .as_ref()
                    .map(|org| org as &dyn MappingSource),
            ),
            _ => return None,
        };
        Some(field)
    }
}

impl HasSchema for Department {
    fn schema() -> &'static Schema {
        &DEPARTMENT_SCHEMA
    }
}

impl MappingSource for Department {
    fn field(&self, name: &str) -> Option<SourceField<'_>> {
        let field = match name {
            "name" => SourceField::text(&self.name),
            "employees" => SourceField::collection(&self.employees),
            "organization" => SourceField::Object(
                self.organization
                    .as_ref()
                    .map(|org| org as &dyn MappingSource),
            ),
            _ => return None,
        };
        Some(field)
    }
}

impl HasSchema for Organization {
    fn schema() -> &'static Schema {
        &ORGANIZATION_SCHEMA
    }
}

impl MappingSource for Organization {
    fn field(&self, name: &str) -> Option<SourceField<'_>> {
        let field = match name {
            "name" => SourceField::text(&self.name),
            "departments" => SourceField::collection(&self.departments),
            "employees" => SourceField::collection(&self.employees),
            _ => return None,
        };
        Some(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_links_employees() {
        let mut department = Department::new("Electrical");
        department.add_employee(Employee::new("Manoj", "Mishra", "Assistant", 10000, 10));

        let mut organization = Organization::new("Acme");
        assert!(organization.add_department(department));

        let department = organization.department("Electrical").unwrap();
        assert_eq!(department.organization, Some(OrganizationRef::new("Acme")));

        let employee = department.employees.iter().next().unwrap();
        assert_eq!(employee.department_name.as_deref(), Some("Electrical"));
        assert_eq!(employee.organization, Some(OrganizationRef::new("Acme")));
        assert!(organization.employees.contains(employee));
    }

    #[test]
    fn test_organization_employee_without_department() {
        let mut organization = Organization::new("Acme");
        organization.add_employee(Employee::new("Asha", "Rao", "Engineer", 5000, 30));

        let employee = organization.employees.iter().next().unwrap();
        assert_eq!(employee.department_name, None);
        assert_eq!(employee.organization.as_ref().map(|o| o.name.as_str()), Some("Acme"));
    }

    #[test]
    fn test_field_access_table() {
        let employee = Employee::new("Manoj", "Mishra", "Assistant", 10000, 10);
        assert!(matches!(employee.field("organization"), Some(SourceField::Object(None))));
        assert!(employee.field("unknown").is_none());

        for spec in EMPLOYEE_SCHEMA.fields {
            assert!(employee.field(spec.name).is_some(), "missing accessor for {}", spec.name);
        }
    }
}
