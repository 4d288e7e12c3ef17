use config::AvailabilityConfig;

use crate::prelude::{AvailabilityError, WindowCalculator, print_summary};

use super::{connect, generate_report};

/// Builds the availability report and writes it out.
///
/// Process
/// - Computes the query window (before any network traffic)
/// - Opens an inventory session
/// - Resolves resources, fetches reservations, writes the document
/// - Prints a short summary
///
/// # Errors
///
/// Returns an error if:
/// - The configured offsets put the start after the end
/// - The inventory session cannot be opened
/// - Any inventory query fails
/// - The output file cannot be written
pub fn generate_availability(
    config: &AvailabilityConfig,
    calculator: &WindowCalculator,
) -> Result<(), AvailabilityError> {
    let window = calculator.compute(config.report.start_offset, config.report.end_offset)?;
    tracing::info!(
        "Query window {} - {} (GMT)",
        window.start_wire(),
        window.end_wire()
    );

    let client = connect(&config.inventory)?;
    let report = generate_report(&client, &config.report, &window)?;

    print_summary(&report, &window, &config.report.output_file);
    Ok(())
}
