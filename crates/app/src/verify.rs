use std::collections::HashMap;

use thiserror::Error;
use tracing::info;

use jobboard_core::{Role, SeedData, User};
use jobboard_storage::{Collection, Database, StorageError};

/// Row counts observed after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionCounts {
    pub users: u64,
    pub companies: u64,
    pub jobs: u64,
    pub applications: u64,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("failed to read back seeded records: {0}")]
    Storage(#[from] StorageError),
    #[error("{collection} holds {actual} rows, expected {expected}")]
    CountMismatch {
        collection: &'static str,
        expected: u64,
        actual: u64,
    },
    #[error("{collection} record {id} has {field} = {target}, which does not resolve")]
    BrokenReference {
        collection: &'static str,
        id: String,
        field: &'static str,
        target: String,
    },
    #[error("{collection} record {id} refers through {field} to user {user} with role {role}")]
    WrongRole {
        collection: &'static str,
        id: String,
        field: &'static str,
        user: String,
        role: Role,
    },
    #[error("job {job} lists applications {listed:?} but {expected:?} refer to it")]
    ApplicationListMismatch {
        job: String,
        listed: Vec<String>,
        expected: Vec<String>,
    },
}

/// Reloads all four collections and checks the seeded graph is consistent
/// with `data`: counts, resolvable references, roles, and application lists.
pub async fn verify(
    database: &Database,
    data: &SeedData<'_>,
) -> Result<CollectionCounts, VerifyError> {
    let counts = CollectionCounts {
        users: expect_count(database, Collection::Users, data.user_count()).await?,
        companies: expect_count(database, Collection::Companies, data.companies.len()).await?,
        jobs: expect_count(database, Collection::Jobs, data.jobs.len()).await?,
        applications: expect_count(database, Collection::Applications, data.applications.len())
            .await?,
    };

    let users: HashMap<String, User> = database
        .users()
        .list()
        .await?
        .into_iter()
        .map(|user| (user.id.clone(), user))
        .collect();
    let companies = database.companies().list().await?;
    let jobs = database.jobs().list().await?;
    let applications = database.applications().list().await?;

    for company in &companies {
        expect_user(
            &users,
            "companies",
            &company.id,
            "user_id",
            &company.user_id,
            Role::Recruiter,
        )?;
    }

    for user in users.values() {
        if let Some(company_id) = &user.profile.company {
            if !companies.iter().any(|company| &company.id == company_id) {
                return Err(VerifyError::BrokenReference {
                    collection: "users",
                    id: user.id.clone(),
                    field: "profile.company",
                    target: company_id.clone(),
                });
            }
        }
    }

    for job in &jobs {
        if !companies.iter().any(|company| company.id == job.company) {
            return Err(VerifyError::BrokenReference {
                collection: "jobs",
                id: job.id.clone(),
                field: "company",
                target: job.company.clone(),
            });
        }
        expect_user(
            &users,
            "jobs",
            &job.id,
            "created_by",
            &job.created_by,
            Role::Recruiter,
        )?;
    }

    for application in &applications {
        if !jobs.iter().any(|job| job.id == application.job) {
            return Err(VerifyError::BrokenReference {
                collection: "applications",
                id: application.id.clone(),
                field: "job",
                target: application.job.clone(),
            });
        }
        expect_user(
            &users,
            "applications",
            &application.id,
            "applicant",
            &application.applicant,
            Role::Student,
        )?;
    }

    // Applications are listed in insertion order, so the append order must match.
    for job in &jobs {
        let expected: Vec<String> = applications
            .iter()
            .filter(|application| application.job == job.id)
            .map(|application| application.id.clone())
            .collect();
        if job.applications != expected {
            return Err(VerifyError::ApplicationListMismatch {
                job: job.id.clone(),
                listed: job.applications.clone(),
                expected,
            });
        }
    }

    info!(
        stage = "verify",
        users = counts.users,
        companies = counts.companies,
        jobs = counts.jobs,
        applications = counts.applications,
        "seeded records verified"
    );
    Ok(counts)
}

async fn expect_count(
    database: &Database,
    collection: Collection,
    expected: usize,
) -> Result<u64, VerifyError> {
    let actual = database.count(collection).await?;
    let expected = expected as u64;
    if actual != expected {
        return Err(VerifyError::CountMismatch {
            collection: collection.table(),
            expected,
            actual,
        });
    }
    Ok(actual)
}

fn expect_user(
    users: &HashMap<String, User>,
    collection: &'static str,
    id: &str,
    field: &'static str,
    user_id: &str,
    role: Role,
) -> Result<(), VerifyError> {
    let Some(user) = users.get(user_id) else {
        return Err(VerifyError::BrokenReference {
            collection,
            id: id.to_string(),
            field,
            target: user_id.to_string(),
        });
    };
    if user.role != role {
        return Err(VerifyError::WrongRole {
            collection,
            id: id.to_string(),
            field,
            user: user.id.clone(),
            role: user.role,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeder::{connect, seed, tests::database_url, Seeded};
    use jobboard_core::SAMPLE;
    use tempfile::TempDir;

    async fn seeded_db() -> (TempDir, Database, Seeded) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = connect(&database_url(&dir)).await.expect("connect");
        let seeded = seed(&db, &SAMPLE).await.expect("seed");
        (dir, db, seeded)
    }

    #[tokio::test]
    async fn sample_seed_passes_verification() {
        let (_dir, db, _seeded) = seeded_db().await;
        let counts = verify(&db, &SAMPLE).await.expect("verify");
        assert_eq!(
            counts,
            CollectionCounts {
                users: 5,
                companies: 3,
                jobs: 10,
                applications: 6,
            }
        );
    }

    #[tokio::test]
    async fn detects_missing_rows() {
        let (_dir, db, _seeded) = seeded_db().await;
        db.delete_all(Collection::Applications)
            .await
            .expect("delete");

        let err = verify(&db, &SAMPLE).await.unwrap_err();
        assert!(matches!(
            err,
            VerifyError::CountMismatch {
                collection: "applications",
                expected: 6,
                actual: 0
            }
        ));
    }

    #[tokio::test]
    async fn detects_application_missing_from_job_list() {
        let (_dir, db, seeded) = seeded_db().await;
        let mut job = db
            .jobs()
            .find_by_id(&seeded.jobs[0].id)
            .await
            .expect("find")
            .expect("job exists");
        job.applications.clear();
        db.jobs().save(&mut job).await.expect("save");

        let err = verify(&db, &SAMPLE).await.unwrap_err();
        assert!(
            matches!(err, VerifyError::ApplicationListMismatch { ref job, .. } if *job == seeded.jobs[0].id)
        );
    }

    #[tokio::test]
    async fn detects_student_used_as_job_creator() {
        let (_dir, db, seeded) = seeded_db().await;
        let mut job = seeded.jobs[3].clone();
        job.created_by = seeded.students[0].id.clone();
        db.jobs().save(&mut job).await.expect("save");

        let err = verify(&db, &SAMPLE).await.unwrap_err();
        assert!(matches!(
            err,
            VerifyError::WrongRole {
                collection: "jobs",
                field: "created_by",
                role: Role::Student,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn detects_profile_pointing_at_unknown_company() {
        let (_dir, db, seeded) = seeded_db().await;
        let mut alice = seeded.recruiters[0].clone();
        alice.profile.company = Some("no-such-company".to_string());
        db.users().save(&mut alice).await.expect("save");

        let err = verify(&db, &SAMPLE).await.unwrap_err();
        assert!(matches!(
            err,
            VerifyError::BrokenReference {
                collection: "users",
                field: "profile.company",
                ..
            }
        ));
    }
}
