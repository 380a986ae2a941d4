use anyhow::Result;
use small_mapper::domain::dto::EmployeeDto;
use small_mapper::domain::model::{Employee, OrganizationRef};
use small_mapper::EntityToDtoMapper;

fn manoj() -> Employee {
    Employee::new("Manoj", "Mishra", "Assistant", 10000, 10)
        .with_department("Electrical")
        .with_organization(OrganizationRef::new("Electrical"))
}

/// 測試員工的純值欄位與巢狀組織名稱映射
#[test]
fn test_employee_maps_to_flat_dto() -> Result<()> {
    let mapper = EntityToDtoMapper::new()?;
    let dto = mapper.employee_to_dto(&manoj())?;

    let expected = EmployeeDto {
        first_name: Some("Manoj".to_string()),
        last_name: Some("Mishra".to_string()),
        position: Some("Assistant".to_string()),
        salary: Some(10000),
        age: Some(10),
        department_name: Some("Electrical".to_string()),
        organization_name: Some("Electrical".to_string()),
    };
    assert_eq!(dto, expected);

    Ok(())
}

/// 組織名稱永遠等於來源組織參照的名稱，缺值時為 None
#[test]
fn test_organization_name_follows_reference() -> Result<()> {
    let mapper = EntityToDtoMapper::new()?;

    for org in [Some("Acme"), Some(""), None] {
        let mut employee = Employee::new("Asha", "Rao", "Engineer", 5000, 30);
        employee.organization = org.map(OrganizationRef::new);

        let dto = mapper.employee_to_dto(&employee)?;
        assert_eq!(
            dto.organization_name.as_deref(),
            employee.organization.as_ref().map(|o| o.name.as_str())
        );
    }

    Ok(())
}

#[test]
fn test_missing_links_map_to_defaults() -> Result<()> {
    let mapper = EntityToDtoMapper::new()?;
    let dto = mapper.employee_to_dto(&Employee::new("Solo", "Worker", "Intern", 0, 19))?;

    assert_eq!(dto.department_name, None);
    assert_eq!(dto.organization_name, None);
    assert_eq!(dto.first_name.as_deref(), Some("Solo"));

    Ok(())
}

#[test]
fn test_null_source_returns_empty_dto() -> Result<()> {
    let mapper = EntityToDtoMapper::new()?;
    let dto = mapper.employee_mapper().map_optional(None)?;
    assert_eq!(dto, EmployeeDto::default());
    Ok(())
}

#[test]
fn test_mapping_is_idempotent_and_pure() -> Result<()> {
    let mapper = EntityToDtoMapper::new()?;
    let employee = manoj();
    let snapshot = employee.clone();

    let first = mapper.employee_to_dto(&employee)?;
    let second = mapper.employee_to_dto(&employee)?;

    assert_eq!(first, second);
    assert_eq!(employee, snapshot);
    Ok(())
}

#[test]
fn test_batch_mapping() -> Result<()> {
    let mapper = EntityToDtoMapper::new()?;
    let employees = vec![manoj(), Employee::new("Asha", "Rao", "Engineer", 5000, 30)];

    let dtos = mapper.employee_mapper().map_all(&employees)?;
    assert_eq!(dtos.len(), 2);
    assert_eq!(dtos[1].first_name.as_deref(), Some("Asha"));
    Ok(())
}
