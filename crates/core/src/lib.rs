//! Domain records of the job board and the sample data used to seed it.

pub mod fixtures;
pub mod types;

pub use types::{
    new_record_id, Application, ApplicationStatus, Company, Job, JobType, NewApplication,
    NewCompany, NewJob, NewUser, Role, UnknownVariant, User, UserProfile,
};
pub use fixtures::{SeedData, SAMPLE};
