use std::{str::FromStr, time::Duration};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::{
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    Sqlite, SqlitePool, Transaction,
};
use thiserror::Error;

use jobboard_core::{
    new_record_id, Application, Company, Job, NewApplication, NewCompany, NewJob, NewUser,
    UnknownVariant, User,
};

/// Top-level database handle that owns the SQLite connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Establishes a new SQLite connection pool for the provided connection string.
    ///
    /// The database file is created when missing; its parent directory is not.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(StorageError::Connect)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(StorageError::Connect)?;

        Ok(Self { pool })
    }

    /// Applies migrations located under `migrations/`.
    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(StorageError::Migration)?;
        Ok(())
    }

    /// Removes every row of the collection, returning how many were deleted.
    pub async fn delete_all(&self, collection: Collection) -> Result<u64, StorageError> {
        let sql = format!("DELETE FROM {}", collection.table());
        let result = sqlx::query(&sql).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Counts the rows currently stored in the collection.
    pub async fn count(&self, collection: Collection) -> Result<u64, StorageError> {
        let sql = format!("SELECT COUNT(*) FROM {}", collection.table());
        let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(&self.pool).await?;
        Ok(count as u64)
    }

    /// Returns a handle for the users collection.
    pub fn users(&self) -> UserRepository {
        UserRepository {
            pool: self.pool.clone(),
        }
    }

    /// Returns a handle for the companies collection.
    pub fn companies(&self) -> CompanyRepository {
        CompanyRepository {
            pool: self.pool.clone(),
        }
    }

    /// Returns a handle for the jobs collection.
    pub fn jobs(&self) -> JobRepository {
        JobRepository {
            pool: self.pool.clone(),
        }
    }

    /// Returns a handle for the applications collection.
    pub fn applications(&self) -> ApplicationRepository {
        ApplicationRepository {
            pool: self.pool.clone(),
        }
    }
}

/// The four collections making up the job board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Companies,
    Jobs,
    Applications,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Users,
        Collection::Companies,
        Collection::Jobs,
        Collection::Applications,
    ];

    /// Name of the backing table, also used as the log label.
    pub fn table(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Companies => "companies",
            Self::Jobs => "jobs",
            Self::Applications => "applications",
        }
    }
}

/// General storage level errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to connect to sqlite: {0}")]
    Connect(sqlx::Error),
    #[error("failed to run database migrations: {0}")]
    Migration(MigrateError),
    #[error("{collection} record {id} not found")]
    NotFound { collection: &'static str, id: String },
    #[error("{collection} record violates a unique constraint: {detail}")]
    Duplicate {
        collection: &'static str,
        detail: String,
    },
    #[error("failed to encode or decode json column: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid stored value: {0}")]
    Decode(#[from] UnknownVariant),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn map_write_error(collection: Collection) -> impl Fn(sqlx::Error) -> StorageError {
    move |err| match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("2067") => {
            StorageError::Duplicate {
                collection: collection.table(),
                detail: db_err.message().to_string(),
            }
        }
        other => StorageError::Database(other),
    }
}

/// Repository for the `users` table.
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

const USER_COLUMNS: &str =
    "id, fullname, email, phone_number, password, role, profile_json, created_at, updated_at";

impl UserRepository {
    /// Inserts all users in one transaction and returns them with their new ids.
    pub async fn insert_many(&self, users: &[NewUser]) -> Result<Vec<User>, StorageError> {
        let now = timestamp();
        let stamp = to_rfc3339(now);
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(users.len());

        for user in users {
            let id = new_record_id();
            let profile_json = serde_json::to_string(&user.profile)?;
            sqlx::query(
                "INSERT INTO users \
                 (id, fullname, email, phone_number, password, role, profile_json, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(&user.fullname)
            .bind(&user.email)
            .bind(user.phone_number)
            .bind(&user.password)
            .bind(user.role.as_str())
            .bind(&profile_json)
            .bind(&stamp)
            .bind(&stamp)
            .execute(&mut *tx)
            .await
            .map_err(map_write_error(Collection::Users))?;

            inserted.push(User {
                id,
                fullname: user.fullname.clone(),
                email: user.email.clone(),
                phone_number: user.phone_number,
                password: user.password.clone(),
                role: user.role,
                profile: user.profile.clone(),
                created_at: now,
                updated_at: now,
            });
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Persists every mutable field of the user and refreshes `updated_at`.
    pub async fn save(&self, user: &mut User) -> Result<(), StorageError> {
        let now = timestamp();
        let profile_json = serde_json::to_string(&user.profile)?;
        let result = sqlx::query(
            "UPDATE users \
             SET fullname = ?, email = ?, phone_number = ?, password = ?, role = ?, \
                 profile_json = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&user.fullname)
        .bind(&user.email)
        .bind(user.phone_number)
        .bind(&user.password)
        .bind(user.role.as_str())
        .bind(&profile_json)
        .bind(to_rfc3339(now))
        .bind(&user.id)
        .execute(&self.pool)
        .await
        .map_err(map_write_error(Collection::Users))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound {
                collection: Collection::Users.table(),
                id: user.id.clone(),
            });
        }
        user.updated_at = now;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, StorageError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(UserRow::into_domain)
            .transpose()
    }

    /// Lists users in insertion order.
    pub async fn list(&self) -> Result<Vec<User>, StorageError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY rowid");
        sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(UserRow::into_domain)
            .collect()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    fullname: String,
    email: String,
    phone_number: i64,
    password: String,
    role: String,
    profile_json: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_domain(self) -> Result<User, StorageError> {
        Ok(User {
            id: self.id,
            fullname: self.fullname,
            email: self.email,
            phone_number: self.phone_number,
            password: self.password,
            role: self.role.parse()?,
            profile: serde_json::from_str(&self.profile_json)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for the `companies` table.
#[derive(Clone)]
pub struct CompanyRepository {
    pool: SqlitePool,
}

const COMPANY_COLUMNS: &str =
    "id, name, description, website, location, logo, user_id, created_at, updated_at";

impl CompanyRepository {
    /// Inserts all companies in one transaction and returns them with their new ids.
    pub async fn insert_many(
        &self,
        companies: &[NewCompany],
    ) -> Result<Vec<Company>, StorageError> {
        let now = timestamp();
        let stamp = to_rfc3339(now);
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(companies.len());

        for company in companies {
            let id = new_record_id();
            sqlx::query(
                "INSERT INTO companies \
                 (id, name, description, website, location, logo, user_id, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(&company.name)
            .bind(&company.description)
            .bind(&company.website)
            .bind(&company.location)
            .bind(&company.logo)
            .bind(&company.user_id)
            .bind(&stamp)
            .bind(&stamp)
            .execute(&mut *tx)
            .await
            .map_err(map_write_error(Collection::Companies))?;

            inserted.push(Company {
                id,
                name: company.name.clone(),
                description: company.description.clone(),
                website: company.website.clone(),
                location: company.location.clone(),
                logo: company.logo.clone(),
                user_id: company.user_id.clone(),
                created_at: now,
                updated_at: now,
            });
        }

        tx.commit().await?;
        Ok(inserted)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Company>, StorageError> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = ?");
        let row = sqlx::query_as::<_, CompanyRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(CompanyRow::into_domain))
    }

    /// Lists companies in insertion order.
    pub async fn list(&self) -> Result<Vec<Company>, StorageError> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies ORDER BY rowid");
        let rows = sqlx::query_as::<_, CompanyRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(CompanyRow::into_domain).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CompanyRow {
    id: String,
    name: String,
    description: String,
    website: String,
    location: String,
    logo: String,
    user_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CompanyRow {
    fn into_domain(self) -> Company {
        Company {
            id: self.id,
            name: self.name,
            description: self.description,
            website: self.website,
            location: self.location,
            logo: self.logo,
            user_id: self.user_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for the `jobs` table.
#[derive(Clone)]
pub struct JobRepository {
    pool: SqlitePool,
}

const JOB_COLUMNS: &str = "id, title, description, requirements_json, salary, experience_level, \
     location, job_type, position, company_id, created_by, applications_json, created_at, updated_at";

impl JobRepository {
    /// Inserts all jobs in one transaction and returns them with their new ids.
    pub async fn insert_many(&self, jobs: &[NewJob]) -> Result<Vec<Job>, StorageError> {
        let now = timestamp();
        let stamp = to_rfc3339(now);
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(jobs.len());

        for job in jobs {
            let id = new_record_id();
            let requirements_json = serde_json::to_string(&job.requirements)?;
            sqlx::query(
                "INSERT INTO jobs \
                 (id, title, description, requirements_json, salary, experience_level, location, \
                  job_type, position, company_id, created_by, applications_json, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, '[]', ?, ?)",
            )
            .bind(&id)
            .bind(&job.title)
            .bind(&job.description)
            .bind(&requirements_json)
            .bind(job.salary)
            .bind(job.experience_level)
            .bind(&job.location)
            .bind(job.job_type.as_str())
            .bind(job.position)
            .bind(&job.company)
            .bind(&job.created_by)
            .bind(&stamp)
            .bind(&stamp)
            .execute(&mut *tx)
            .await
            .map_err(map_write_error(Collection::Jobs))?;

            inserted.push(Job {
                id,
                title: job.title.clone(),
                description: job.description.clone(),
                requirements: job.requirements.clone(),
                salary: job.salary,
                experience_level: job.experience_level,
                location: job.location.clone(),
                job_type: job.job_type,
                position: job.position,
                company: job.company.clone(),
                created_by: job.created_by.clone(),
                applications: Vec::new(),
                created_at: now,
                updated_at: now,
            });
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Persists every mutable field of the job and refreshes `updated_at`.
    pub async fn save(&self, job: &mut Job) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        let updated_at = Self::write(&mut tx, job).await?;
        tx.commit().await?;
        job.updated_at = updated_at;
        Ok(())
    }

    /// Re-reads the job, appends the application id to its list and saves it.
    ///
    /// The read and the write share one transaction so appends issued for the
    /// same job can never overwrite each other.
    pub async fn push_application(
        &self,
        job_id: &str,
        application_id: &str,
    ) -> Result<Job, StorageError> {
        let mut tx = self.pool.begin().await?;
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?");
        let mut job = sqlx::query_as::<_, JobRow>(&sql)
            .bind(job_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| StorageError::NotFound {
                collection: Collection::Jobs.table(),
                id: job_id.to_string(),
            })?
            .into_domain()?;

        job.applications.push(application_id.to_string());
        job.updated_at = Self::write(&mut tx, &job).await?;
        tx.commit().await?;
        Ok(job)
    }

    async fn write(
        tx: &mut Transaction<'_, Sqlite>,
        job: &Job,
    ) -> Result<DateTime<Utc>, StorageError> {
        let now = timestamp();
        let requirements_json = serde_json::to_string(&job.requirements)?;
        let applications_json = serde_json::to_string(&job.applications)?;
        let result = sqlx::query(
            "UPDATE jobs \
             SET title = ?, description = ?, requirements_json = ?, salary = ?, \
                 experience_level = ?, location = ?, job_type = ?, position = ?, \
                 company_id = ?, created_by = ?, applications_json = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&job.title)
        .bind(&job.description)
        .bind(&requirements_json)
        .bind(job.salary)
        .bind(job.experience_level)
        .bind(&job.location)
        .bind(job.job_type.as_str())
        .bind(job.position)
        .bind(&job.company)
        .bind(&job.created_by)
        .bind(&applications_json)
        .bind(to_rfc3339(now))
        .bind(&job.id)
        .execute(&mut **tx)
        .await
        .map_err(map_write_error(Collection::Jobs))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound {
                collection: Collection::Jobs.table(),
                id: job.id.clone(),
            });
        }
        Ok(now)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Job>, StorageError> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?");
        sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(JobRow::into_domain)
            .transpose()
    }

    /// Lists jobs in insertion order.
    pub async fn list(&self) -> Result<Vec<Job>, StorageError> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs ORDER BY rowid");
        sqlx::query_as::<_, JobRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(JobRow::into_domain)
            .collect()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: String,
    title: String,
    description: String,
    requirements_json: String,
    salary: i64,
    experience_level: i64,
    location: String,
    job_type: String,
    position: i64,
    company_id: String,
    created_by: String,
    applications_json: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl JobRow {
    fn into_domain(self) -> Result<Job, StorageError> {
        Ok(Job {
            id: self.id,
            title: self.title,
            description: self.description,
            requirements: serde_json::from_str(&self.requirements_json)?,
            salary: self.salary,
            experience_level: self.experience_level,
            location: self.location,
            job_type: self.job_type.parse()?,
            position: self.position,
            company: self.company_id,
            created_by: self.created_by,
            applications: serde_json::from_str(&self.applications_json)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for the `applications` table.
#[derive(Clone)]
pub struct ApplicationRepository {
    pool: SqlitePool,
}

const APPLICATION_COLUMNS: &str = "id, job_id, applicant_id, status, created_at, updated_at";

impl ApplicationRepository {
    /// Inserts all applications in one transaction and returns them with their new ids.
    pub async fn insert_many(
        &self,
        applications: &[NewApplication],
    ) -> Result<Vec<Application>, StorageError> {
        let now = timestamp();
        let stamp = to_rfc3339(now);
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(applications.len());

        for application in applications {
            let id = new_record_id();
            sqlx::query(
                "INSERT INTO applications \
                 (id, job_id, applicant_id, status, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(&application.job)
            .bind(&application.applicant)
            .bind(application.status.as_str())
            .bind(&stamp)
            .bind(&stamp)
            .execute(&mut *tx)
            .await
            .map_err(map_write_error(Collection::Applications))?;

            inserted.push(Application {
                id,
                job: application.job.clone(),
                applicant: application.applicant.clone(),
                status: application.status,
                created_at: now,
                updated_at: now,
            });
        }

        tx.commit().await?;
        Ok(inserted)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Application>, StorageError> {
        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = ?");
        sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(ApplicationRow::into_domain)
            .transpose()
    }

    /// Lists applications in insertion order.
    pub async fn list(&self) -> Result<Vec<Application>, StorageError> {
        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM applications ORDER BY rowid");
        sqlx::query_as::<_, ApplicationRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(ApplicationRow::into_domain)
            .collect()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ApplicationRow {
    id: String,
    job_id: String,
    applicant_id: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ApplicationRow {
    fn into_domain(self) -> Result<Application, StorageError> {
        Ok(Application {
            id: self.id,
            job: self.job_id,
            applicant: self.applicant_id,
            status: self.status.parse()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Current time at the precision stored in the database.
fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn to_rfc3339(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
