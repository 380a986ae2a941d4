use anyhow::Result;
use small_mapper::app::sample::sample_organization;
use small_mapper::domain::model::{Department, Employee, Organization};
use small_mapper::EntityToDtoMapper;

#[test]
fn test_organization_projects_name_sets() -> Result<()> {
    let mut organization = Organization::new("Acme");

    let mut electrical = Department::new("Electrical");
    electrical.add_employee(Employee::new("Manoj", "Mishra", "Assistant", 10000, 10));
    let mut sales = Department::new("Sales");
    sales.add_employee(Employee::new("Asha", "Rao", "Lead", 8000, 35));

    organization.add_department(electrical);
    organization.add_department(sales);
    organization.add_employee(Employee::new("Ravi", "Kumar", "Director", 20000, 50));

    let mapper = EntityToDtoMapper::new()?;
    let dto = mapper.organization_to_dto(&organization)?;

    assert_eq!(dto.name.as_deref(), Some("Acme"));
    assert_eq!(
        dto.department_names.iter().collect::<Vec<_>>(),
        vec!["Electrical", "Sales"]
    );
    assert_eq!(
        dto.employee_names.iter().collect::<Vec<_>>(),
        vec!["AshaRao", "ManojMishra", "RaviKumar"]
    );
    Ok(())
}

/// 投影結果相同的員工只留下一筆
#[test]
fn test_identical_projections_collapse() -> Result<()> {
    let mut organization = Organization::new("Acme");
    organization.add_employee(Employee::new("Manoj", "Mishra", "Assistant", 10000, 10));
    organization.add_employee(Employee::new("Manoj", "Mishra", "Manager", 30000, 45));
    assert_eq!(organization.employees.len(), 2);

    let mapper = EntityToDtoMapper::new()?;
    let dto = mapper.organization_to_dto(&organization)?;
    assert_eq!(dto.employee_names.len(), 1);
    Ok(())
}

#[test]
fn test_empty_organization() -> Result<()> {
    let mapper = EntityToDtoMapper::new()?;
    let dto = mapper.organization_to_dto(&Organization::new("Empty"))?;

    assert!(dto.department_names.is_empty());
    assert!(dto.employee_names.is_empty());
    Ok(())
}

#[test]
fn test_sample_organization_serializes() -> Result<()> {
    let organization = sample_organization();
    let mapper = EntityToDtoMapper::new()?;

    let dto = mapper.organization_to_dto(&organization)?;
    let json = serde_json::to_value(&dto)?;

    assert_eq!(json["name"], "Electrical");
    assert_eq!(json["departmentNames"], serde_json::json!(["Electrical"]));
    assert_eq!(json["employeeNames"], serde_json::json!(["ManojMishra"]));
    Ok(())
}
