use thiserror::Error;
use tracing::info;

use jobboard_core::{Application, Company, Job, SeedData, User};
use jobboard_storage::{Collection, Database, StorageError};

/// Rows written by one seeding run, per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub companies: usize,
    pub jobs: usize,
    pub applications: usize,
    pub linked_recruiters: usize,
}

/// Records produced by a run, in seed-list order.
#[derive(Debug, Clone)]
pub struct Seeded {
    pub recruiters: Vec<User>,
    pub students: Vec<User>,
    pub companies: Vec<Company>,
    pub jobs: Vec<Job>,
    pub applications: Vec<Application>,
    pub linked_recruiters: usize,
}

impl Seeded {
    pub fn report(&self) -> SeedReport {
        SeedReport {
            users: self.recruiters.len() + self.students.len(),
            companies: self.companies.len(),
            jobs: self.jobs.len(),
            applications: self.applications.len(),
            linked_recruiters: self.linked_recruiters,
        }
    }
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to connect to the database: {0}")]
    Connect(StorageError),
    #[error("failed to prepare the schema: {0}")]
    Migrate(StorageError),
    #[error("failed to clear {collection}: {source}")]
    Wipe {
        collection: &'static str,
        source: StorageError,
    },
    #[error("failed to insert users: {0}")]
    InsertUsers(StorageError),
    #[error("failed to insert companies: {0}")]
    InsertCompanies(StorageError),
    #[error("failed to link recruiter to company: {0}")]
    LinkRecruiter(StorageError),
    #[error("failed to insert jobs: {0}")]
    InsertJobs(StorageError),
    #[error("failed to insert applications: {0}")]
    InsertApplications(StorageError),
    #[error("failed to link application to job: {0}")]
    LinkApplication(StorageError),
    #[error("seed data refers to {collection} position {position}, which was not inserted")]
    DanglingReference {
        collection: &'static str,
        position: usize,
    },
}

/// Opens the database and brings its schema up to date.
pub async fn connect(database_url: &str) -> Result<Database, SeedError> {
    let database = Database::connect(database_url)
        .await
        .map_err(SeedError::Connect)?;
    database
        .run_migrations()
        .await
        .map_err(SeedError::Migrate)?;
    info!(stage = "seed", "connected to database");
    Ok(database)
}

/// Replaces the contents of all four collections with `data`.
///
/// Steps run strictly in dependency order and stop at the first failure;
/// rows committed by earlier steps stay in place.
pub async fn seed(database: &Database, data: &SeedData<'_>) -> Result<Seeded, SeedError> {
    wipe(database).await?;

    let users = database.users();
    let mut recruiters = users
        .insert_many(&data.recruiters.iter().map(|s| s.to_new_user()).collect::<Vec<_>>())
        .await
        .map_err(SeedError::InsertUsers)?;
    let students = users
        .insert_many(&data.students.iter().map(|s| s.to_new_user()).collect::<Vec<_>>())
        .await
        .map_err(SeedError::InsertUsers)?;
    info!(
        stage = "seed",
        recruiters = recruiters.len(),
        students = students.len(),
        "users inserted"
    );

    let new_companies = data
        .companies
        .iter()
        .map(|seed| {
            let owner = lookup(&recruiters, seed.owner, "recruiter")?;
            Ok(seed.to_new_company(&owner.id))
        })
        .collect::<Result<Vec<_>, SeedError>>()?;
    let companies = database
        .companies()
        .insert_many(&new_companies)
        .await
        .map_err(SeedError::InsertCompanies)?;
    info!(stage = "seed", companies = companies.len(), "companies inserted");

    let mut linked_recruiters = 0;
    for &(recruiter_pos, company_pos) in data.recruiter_links {
        let company_id = lookup(&companies, company_pos, "company")?.id.clone();
        let recruiter = recruiters
            .get_mut(recruiter_pos)
            .ok_or(SeedError::DanglingReference {
                collection: "recruiter",
                position: recruiter_pos,
            })?;
        recruiter.profile.company = Some(company_id);
        users
            .save(recruiter)
            .await
            .map_err(SeedError::LinkRecruiter)?;
        linked_recruiters += 1;
    }
    info!(
        stage = "seed",
        linked = linked_recruiters,
        "recruiter profiles linked to companies"
    );

    let new_jobs = data
        .jobs
        .iter()
        .map(|seed| {
            let company = lookup(&companies, seed.company, "company")?;
            let creator = lookup(&recruiters, seed.creator, "recruiter")?;
            Ok(seed.to_new_job(&company.id, &creator.id))
        })
        .collect::<Result<Vec<_>, SeedError>>()?;
    let jobs_repo = database.jobs();
    let mut jobs = jobs_repo
        .insert_many(&new_jobs)
        .await
        .map_err(SeedError::InsertJobs)?;
    info!(stage = "seed", jobs = jobs.len(), "jobs inserted");

    let new_applications = data
        .applications
        .iter()
        .map(|seed| {
            let job = lookup(&jobs, seed.job, "job")?;
            let applicant = lookup(&students, seed.applicant, "student")?;
            Ok(seed.to_new_application(&job.id, &applicant.id))
        })
        .collect::<Result<Vec<_>, SeedError>>()?;
    let applications = database
        .applications()
        .insert_many(&new_applications)
        .await
        .map_err(SeedError::InsertApplications)?;
    info!(
        stage = "seed",
        applications = applications.len(),
        "applications inserted"
    );

    // One application at a time: each append re-reads the job it extends.
    for application in &applications {
        let updated = jobs_repo
            .push_application(&application.job, &application.id)
            .await
            .map_err(SeedError::LinkApplication)?;
        if let Some(job) = jobs.iter_mut().find(|job| job.id == updated.id) {
            *job = updated;
        }
    }
    info!(
        stage = "seed",
        applications = applications.len(),
        "applications linked to jobs"
    );

    Ok(Seeded {
        recruiters,
        students,
        companies,
        jobs,
        applications,
        linked_recruiters,
    })
}

/// Clears the four collections concurrently.
async fn wipe(database: &Database) -> Result<(), SeedError> {
    let (users, companies, jobs, applications) = tokio::try_join!(
        clear(database, Collection::Users),
        clear(database, Collection::Companies),
        clear(database, Collection::Jobs),
        clear(database, Collection::Applications),
    )?;
    info!(
        stage = "seed",
        users, companies, jobs, applications, "existing records cleared"
    );
    Ok(())
}

async fn clear(database: &Database, collection: Collection) -> Result<u64, SeedError> {
    database
        .delete_all(collection)
        .await
        .map_err(|source| SeedError::Wipe {
            collection: collection.table(),
            source,
        })
}

fn lookup<'a, T>(
    records: &'a [T],
    position: usize,
    collection: &'static str,
) -> Result<&'a T, SeedError> {
    records.get(position).ok_or(SeedError::DanglingReference {
        collection,
        position,
    })
}
