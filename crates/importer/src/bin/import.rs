use chrono::Datelike;
use clap::{Parser, Subcommand};
use importer::{CanonicalFormat, CanonicalTransformer, CanonicalValidator, check_file};
use std::path::{Path, PathBuf};
use storage::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tatami-import")]
#[command(about = "Tatami rulesets, clubs and athletes importer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://tatami.db")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import one canonical JSON file
    Canonical {
        file: PathBuf,

        #[arg(long)]
        validate_only: bool,
    },
    /// Import every canonical JSON file in a directory (one level deep)
    BulkImport {
        #[arg(long, default_value = "./imports")]
        directory: PathBuf,

        #[arg(long)]
        validate_only: bool,
    },
    /// Print each athlete's classification against the file's active ruleset
    Check {
        file: PathBuf,

        #[arg(long, value_parser = clap::value_parser!(i32).range(1900..=2200))]
        reference_year: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("import={},importer={},storage={}", log_level, log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Canonical {
            file,
            validate_only,
        } => {
            handle_canonical_import(file, validate_only, &cli.database_url).await?;
        }
        Commands::BulkImport {
            directory,
            validate_only,
        } => {
            handle_bulk_import(directory, validate_only, &cli.database_url).await?;
        }
        Commands::Check {
            file,
            reference_year,
        } => {
            handle_check(file, reference_year).await?;
        }
    }

    Ok(())
}

async fn load_canonical(file: &Path) -> Result<CanonicalFormat, Box<dyn std::error::Error>> {
    let json_content = tokio::fs::read_to_string(file).await?;
    let canonical: CanonicalFormat = serde_json::from_str(&json_content)?;
    Ok(canonical)
}

async fn connect(database_url: &str) -> Result<Database, Box<dyn std::error::Error>> {
    tracing::info!("Connecting to database...");
    let db = Database::new(database_url).await?;
    db.run_migrations().await?;
    Ok(db)
}

async fn handle_canonical_import(
    file: PathBuf,
    validate_only: bool,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Loading canonical JSON from: {}", file.display());
    let canonical = load_canonical(&file).await?;

    tracing::info!(
        "Loaded {} ruleset(s), {} club(s), {} athlete(s) (v{})",
        canonical.rulesets.len(),
        canonical.clubs.len(),
        canonical.athletes.len(),
        canonical.format_version
    );

    tracing::info!("Validating canonical format...");
    let validation_report = CanonicalValidator::validate(&canonical)?;
    validation_report.log_warnings();
    tracing::info!("Validation successful");

    if validate_only {
        return Ok(());
    }

    let db = connect(database_url).await?;
    let summary = CanonicalTransformer::new(db.pool())
        .import_to_database(&canonical)
        .await?;

    tracing::info!(
        "Import completed: {} ruleset(s) created, {} reused; {} club(s) created, {} reused; {} athlete(s) created, {} skipped",
        summary.rulesets_created,
        summary.rulesets_reused,
        summary.clubs_created,
        summary.clubs_reused,
        summary.athletes_created,
        summary.athletes_skipped
    );

    Ok(())
}

async fn handle_bulk_import(
    directory: PathBuf,
    validate_only: bool,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Scanning directory for canonical JSON files: {}", directory.display());

    let mut json_files = Vec::new();
    let mut entries = tokio::fs::read_dir(&directory).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_dir() {
            let mut sub_entries = tokio::fs::read_dir(&path).await?;
            while let Some(sub_entry) = sub_entries.next_entry().await? {
                let sub_path = sub_entry.path();
                if sub_path.extension().is_some_and(|ext| ext == "json") {
                    json_files.push(sub_path);
                }
            }
        } else if path.extension().is_some_and(|ext| ext == "json") {
            json_files.push(path);
        }
    }

    if json_files.is_empty() {
        tracing::warn!("No JSON files found in {}", directory.display());
        return Ok(());
    }

    json_files.sort();
    tracing::info!("Found {} canonical JSON file(s)", json_files.len());

    let db = if !validate_only {
        Some(connect(database_url).await?)
    } else {
        None
    };

    let mut success_count = 0;
    let mut error_count = 0;

    for (idx, file_path) in json_files.iter().enumerate() {
        tracing::info!("[{}/{}] Processing: {}", idx + 1, json_files.len(), file_path.display());

        match process_canonical_file(file_path, db.as_ref()).await {
            Ok(_) => {
                success_count += 1;
                tracing::info!("  Success");
            }
            Err(e) => {
                error_count += 1;
                tracing::error!("  Error: {}", e);
            }
        }
    }

    tracing::info!("Summary: {} succeeded, {} failed", success_count, error_count);

    if error_count > 0 {
        return Err(format!("{} file(s) failed to import", error_count).into());
    }

    Ok(())
}

async fn process_canonical_file(
    file_path: &Path,
    db: Option<&Database>,
) -> Result<(), Box<dyn std::error::Error>> {
    let canonical = load_canonical(file_path).await?;

    let validation_report = CanonicalValidator::validate(&canonical)?;
    for warning in &validation_report.warnings {
        tracing::warn!("  {}", warning);
    }

    if let Some(db) = db {
        CanonicalTransformer::new(db.pool())
            .import_to_database(&canonical)
            .await?;
    }

    Ok(())
}

async fn handle_check(
    file: PathBuf,
    reference_year: Option<i32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let canonical = load_canonical(&file).await?;
    let reference_year = reference_year.unwrap_or_else(|| chrono::Local::now().year());

    let checks = check_file(&canonical, reference_year)?;
    let mut flagged = 0;

    for check in &checks {
        tracing::info!(
            "{}: {} / {}",
            check.athlete,
            check.age_category,
            check.weight_division
        );
        for conflict in &check.conflicts {
            tracing::warn!(
                "  {:?} {:?}: {}{}",
                conflict.severity,
                conflict.conflict_type,
                conflict.message,
                conflict
                    .details
                    .as_deref()
                    .map(|d| format!(" ({})", d))
                    .unwrap_or_default()
            );
        }
        if !check.conflicts.is_empty() {
            flagged += 1;
        }
    }

    tracing::info!(
        "{} athlete(s) checked for {}, {} with conflicts",
        checks.len(),
        reference_year,
        flagged
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(year: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(["tatami-import", "check", "club.json", "--reference-year", year])
    }

    #[test]
    fn test_reference_year_in_range() {
        let cli = parse("2026").unwrap();
        assert!(matches!(
            cli.command,
            Commands::Check {
                reference_year: Some(2026),
                ..
            }
        ));
    }

    #[test]
    fn test_reference_year_out_of_range_is_rejected() {
        for year in ["1899", "2201", "-2147483648"] {
            assert!(parse(year).is_err(), "{} should be rejected", year);
        }
    }
}
