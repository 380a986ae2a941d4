use clap::Parser;
use serde::Serialize;
use small_mapper::app::sample::sample_organization;
use small_mapper::utils::{logger, validation::Validate};
use small_mapper::{CliConfig, EntityKind, EntityToDtoMapper, MapperConfig, MapperError};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting small-mapper CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config) {
        tracing::error!(
            "❌ Mapping failed: {} (Category: {:?})",
            e,
            e.category()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }
}

fn run(config: &CliConfig) -> Result<(), MapperError> {
    config.validate()?;

    let mapper_config = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading mapping configuration from: {}", path);
            MapperConfig::from_file(path)?
        }
        None => MapperConfig::default(),
    };

    let mapper = EntityToDtoMapper::from_config(&mapper_config)?;
    let organization = sample_organization();

    if matches!(config.entity, EntityKind::Employee | EntityKind::All) {
        for employee in &organization.employees {
            print_json("EmployeeDto", &mapper.employee_to_dto(employee)?, config.pretty)?;
        }
    }

    if matches!(config.entity, EntityKind::Department | EntityKind::All) {
        for department in &organization.departments {
            print_json("DepartmentDto", &mapper.department_to_dto(department)?, config.pretty)?;
        }
    }

    if matches!(config.entity, EntityKind::Organization | EntityKind::All) {
        print_json(
            "OrganizationDto",
            &mapper.organization_to_dto(&organization)?,
            config.pretty,
        )?;
    }

    tracing::info!("✅ Mapping completed successfully!");
    Ok(())
}

fn print_json<T: Serialize>(label: &str, dto: &T, pretty: bool) -> Result<(), MapperError> {
    let json = if pretty {
        serde_json::to_string_pretty(dto)?
    } else {
        serde_json::to_string(dto)?
    };
    tracing::debug!("Printing {}", label);
    println!("{}", json);
    Ok(())
}
