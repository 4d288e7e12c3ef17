use availability::prelude::{
    AvailabilityCommand, AvailabilityError, Cli, WindowCalculator, generate_availability,
    match_and_print, validate_availability,
};
use clap::Parser;
use config::{AvailabilityConfig, Interpolator, LoggingConfig};

fn main() {
    let cli = Cli::parse();
    match_and_print(run(&cli));
}

fn run(cli: &Cli) -> Result<(), AvailabilityError> {
    let interpolator = Interpolator::from_process_env()?;
    let config: AvailabilityConfig = config::load_config(&cli.config_paths(), &interpolator)?;

    init_tracing(&config.logging)?;
    tracing::info!("tracing has been started");
    tracing::debug!("loaded config from {}", cli.config.display());

    let calculator = WindowCalculator::from_local();
    tracing::debug!(
        "host is {} seconds west of GMT",
        calculator.timezone_offset()
    );

    match cli.command.unwrap_or_default() {
        AvailabilityCommand::Generate => generate_availability(&config, &calculator),
        AvailabilityCommand::Validate => validate_availability(&config, &calculator),
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), AvailabilityError> {
    let subscriber = tracing_subscriber::fmt::fmt()
        .pretty()
        .with_max_level(logging.max_level);

    if let Some(output_file) = logging.log_file.as_ref() {
        let file = std::fs::File::create(output_file).map_err(|e| AvailabilityError::Output {
            path: output_file.display().to_string(),
            source: e,
        })?;
        let file = std::sync::Mutex::new(file);

        let subscriber = subscriber.with_writer(file).finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| AvailabilityError::Logging(e.to_string()))
    } else {
        // stdout carries the run summary
        let subscriber = subscriber.with_writer(std::io::stderr).finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| AvailabilityError::Logging(e.to_string()))
    }
}
