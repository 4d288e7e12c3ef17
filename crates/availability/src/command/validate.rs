use client::InventoryApi;
use colored::Colorize;
use config::AvailabilityConfig;

use crate::prelude::{AvailabilityError, ResourceResolver, WindowCalculator};

use super::connect;

/// Dry run: computes the window and resolves resources, then prints what a
/// `generate` run would query. Nothing is written.
pub fn validate_availability(
    config: &AvailabilityConfig,
    calculator: &WindowCalculator,
) -> Result<(), AvailabilityError> {
    let window = calculator.compute(config.report.start_offset, config.report.end_offset)?;
    let client = connect(&config.inventory)?;

    let resources = ResourceResolver::new(&client).resolve(&config.report.family_model_list)?;

    println!("{}", "Resource Availability (dry run):".white().bold().underline());
    println!(
        " {} {} - {} (GMT)",
        "Window:".cyan().bold(),
        window.start_wire(),
        window.end_wire()
    );

    if resources.is_empty() {
        println!(" {}", "No resources match the configured filters".dimmed());
    }

    for name in &resources {
        // existence is only checked when the run would check it too
        if config.report.skip_missing_resources && !client.check_resource_exists(name).unwrap_or(false) {
            println!("  - {} {}", name.red(), "(missing, would be skipped)".dimmed());
        } else {
            println!("  - {}", name.green());
        }
    }

    println!(
        " {} {}",
        "Output:".cyan().bold(),
        config.report.output_file.display()
    );

    Ok(())
}
