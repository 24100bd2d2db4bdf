mod seeder;
mod telemetry;
mod verify;

use std::process::ExitCode;

use thiserror::Error;
use tracing::{error, info};

use jobboard_core::SAMPLE;
use jobboard_util::{load_env_file, SeedConfig};

use crate::seeder::{SeedError, SeedReport};
use crate::verify::VerifyError;

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error("verification failed: {0}")]
    Verify(#[from] VerifyError),
}

#[tokio::main]
async fn main() -> ExitCode {
    load_env_file();
    let config = match SeedConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = telemetry::init_tracing(config.environment) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    let outcome = run(&config).await;
    match &outcome {
        Ok(report) => info!(
            stage = "seed",
            users = report.users,
            companies = report.companies,
            jobs = report.jobs,
            applications = report.applications,
            "seed data inserted successfully"
        ),
        Err(err) => error!(stage = "seed", error = %err, "seeding failed"),
    }
    ExitCode::from(exit_status(&outcome))
}

async fn run(config: &SeedConfig) -> Result<SeedReport, RunError> {
    let database = seeder::connect(&config.database_url).await?;
    let seeded = seeder::seed(&database, &SAMPLE).await?;

    if config.verify {
        verify::verify(&database, &SAMPLE).await?;
    } else {
        info!(stage = "verify", "verification skipped");
    }

    Ok(seeded.report())
}

fn exit_status<T>(outcome: &Result<T, RunError>) -> u8 {
    match outcome {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobboard_storage::Collection;
    use jobboard_util::Environment;

    fn config(database_url: String) -> SeedConfig {
        SeedConfig {
            database_url,
            environment: Environment::Test,
            verify: true,
        }
    }

    #[tokio::test]
    async fn successful_run_exits_zero() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config(seeder::tests::database_url(&dir));

        let outcome = run(&config).await;
        assert_eq!(exit_status(&outcome), 0);
        let report = outcome.expect("run succeeds");
        assert_eq!(report.users, 5);
        assert_eq!(report.applications, 6);
    }

    #[tokio::test]
    async fn running_twice_keeps_the_same_counts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config(seeder::tests::database_url(&dir));

        let first = run(&config).await.expect("first run");
        let second = run(&config).await.expect("second run");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unreachable_database_exits_one_and_leaves_data_alone() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good = config(seeder::tests::database_url(&dir));
        run(&good).await.expect("initial run");

        let bad = config(format!(
            "sqlite://{}",
            dir.path().join("missing").join("jobboard.db").display()
        ));
        let outcome = run(&bad).await;
        assert_eq!(exit_status(&outcome), 1);
        assert!(matches!(outcome, Err(RunError::Seed(SeedError::Connect(_)))));

        let database = seeder::connect(&good.database_url).await.expect("connect");
        assert_eq!(database.count(Collection::Users).await.expect("count"), 5);
        assert_eq!(database.count(Collection::Jobs).await.expect("count"), 10);
    }
}
