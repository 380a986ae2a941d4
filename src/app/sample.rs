use crate::domain::model::{Department, Employee, Organization};

/// CLI 示範用的組織：一個部門、一位員工
pub fn sample_organization() -> Organization {
    let mut department = Department::new("Electrical");
    department.add_employee(Employee::new("Manoj", "Mishra", "Assistant", 10000, 10));

    let mut organization = Organization::new("Electrical");
    organization.add_department(department);
    organization
}
