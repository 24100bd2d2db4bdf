//! Literal sample data loaded by the seeder.
//!
//! Records reference earlier records by their position in an earlier list:
//! companies point into [`RECRUITERS`], jobs into [`COMPANIES`] and
//! [`RECRUITERS`], applications into [`JOBS`] and [`STUDENTS`]. The seeder
//! resolves positions to stored identifiers in insertion order.

use crate::types::{
    ApplicationStatus, JobType, NewApplication, NewCompany, NewJob, NewUser, Role, UserProfile,
};

/// Password stored for every sample account.
pub const PLACEHOLDER_PASSWORD: &str = "hashedpassword";

#[derive(Debug, Clone, Copy)]
pub struct UserSeed {
    pub fullname: &'static str,
    pub email: &'static str,
    pub phone_number: i64,
    pub role: Role,
    pub bio: Option<&'static str>,
    pub skills: &'static [&'static str],
    pub resume: Option<&'static str>,
    pub resume_original_name: Option<&'static str>,
}

impl UserSeed {
    const fn recruiter(fullname: &'static str, email: &'static str, phone_number: i64) -> Self {
        Self {
            fullname,
            email,
            phone_number,
            role: Role::Recruiter,
            bio: None,
            skills: &[],
            resume: None,
            resume_original_name: None,
        }
    }

    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            fullname: self.fullname.to_string(),
            email: self.email.to_string(),
            phone_number: self.phone_number,
            password: PLACEHOLDER_PASSWORD.to_string(),
            role: self.role,
            profile: UserProfile {
                bio: self.bio.map(str::to_string),
                skills: self.skills.iter().map(|s| s.to_string()).collect(),
                resume: self.resume.map(str::to_string),
                resume_original_name: self.resume_original_name.map(str::to_string),
                company: None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CompanySeed {
    pub name: &'static str,
    pub description: &'static str,
    pub website: &'static str,
    pub location: &'static str,
    pub logo: &'static str,
    /// Position in [`RECRUITERS`].
    pub owner: usize,
}

impl CompanySeed {
    pub fn to_new_company(&self, owner_id: &str) -> NewCompany {
        NewCompany {
            name: self.name.to_string(),
            description: self.description.to_string(),
            website: self.website.to_string(),
            location: self.location.to_string(),
            logo: self.logo.to_string(),
            user_id: owner_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct JobSeed {
    pub title: &'static str,
    pub description: &'static str,
    pub requirements: &'static [&'static str],
    pub salary: i64,
    pub experience_level: i64,
    pub location: &'static str,
    pub job_type: JobType,
    pub position: i64,
    /// Position in [`COMPANIES`].
    pub company: usize,
    /// Position in [`RECRUITERS`].
    pub creator: usize,
}

impl JobSeed {
    pub fn to_new_job(&self, company_id: &str, creator_id: &str) -> NewJob {
        NewJob {
            title: self.title.to_string(),
            description: self.description.to_string(),
            requirements: self.requirements.iter().map(|s| s.to_string()).collect(),
            salary: self.salary,
            experience_level: self.experience_level,
            location: self.location.to_string(),
            job_type: self.job_type,
            position: self.position,
            company: company_id.to_string(),
            created_by: creator_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ApplicationSeed {
    /// Position in [`JOBS`].
    pub job: usize,
    /// Position in [`STUDENTS`].
    pub applicant: usize,
    pub status: ApplicationStatus,
}

impl ApplicationSeed {
    pub fn to_new_application(&self, job_id: &str, applicant_id: &str) -> NewApplication {
        NewApplication {
            job: job_id.to_string(),
            applicant: applicant_id.to_string(),
            status: self.status,
        }
    }
}

/// Recruiter profiles that get a company reference after companies exist.
/// CloudBase stays unlinked: a profile holds a single company.
pub const RECRUITER_COMPANY_LINKS: &[(usize, usize)] = &[(0, 0), (1, 1)];

pub const RECRUITERS: &[UserSeed] = &[
    UserSeed::recruiter("Alice Johnson", "alice@techcorp.com", 1_111_111_111),
    UserSeed::recruiter("David Kim", "david@devhouse.com", 2_222_222_222),
];

pub const STUDENTS: &[UserSeed] = &[
    UserSeed {
        fullname: "Bob Student",
        email: "bob@student.com",
        phone_number: 3_333_333_333,
        role: Role::Student,
        bio: Some("Frontend enthusiast"),
        skills: &["HTML", "CSS", "JavaScript"],
        resume: Some("https://example.com/bob_resume.pdf"),
        resume_original_name: Some("Bob_Resume.pdf"),
    },
    UserSeed {
        fullname: "Carol Developer",
        email: "carol@student.com",
        phone_number: 4_444_444_444,
        role: Role::Student,
        bio: Some("Backend developer"),
        skills: &["Node.js", "MongoDB"],
        resume: Some("https://example.com/carol_resume.pdf"),
        resume_original_name: Some("Carol_Resume.pdf"),
    },
    UserSeed {
        fullname: "Ethan Learner",
        email: "ethan@student.com",
        phone_number: 5_555_555_555,
        role: Role::Student,
        bio: Some("Full-stack dev"),
        skills: &["React", "Express", "MongoDB"],
        resume: Some("https://example.com/ethan_resume.pdf"),
        resume_original_name: Some("Ethan_Resume.pdf"),
    },
];

pub const COMPANIES: &[CompanySeed] = &[
    CompanySeed {
        name: "TechCorp",
        description: "Leading tech company",
        website: "https://techcorp.com",
        location: "San Francisco",
        logo: "https://example.com/logo1.png",
        owner: 0,
    },
    CompanySeed {
        name: "DevHouse",
        description: "Software development agency",
        website: "https://devhouse.io",
        location: "New York",
        logo: "https://example.com/logo2.png",
        owner: 1,
    },
    CompanySeed {
        name: "CloudBase",
        description: "Cloud computing startup",
        website: "https://cloudbase.net",
        location: "Seattle",
        logo: "https://example.com/logo3.png",
        owner: 1,
    },
];

pub const JOBS: &[JobSeed] = &[
    // TechCorp
    JobSeed {
        title: "React Developer",
        description: "Build UI with React",
        requirements: &["React", "Redux", "CSS"],
        salary: 85_000,
        experience_level: 2,
        location: "Remote",
        job_type: JobType::FullTime,
        position: 1,
        company: 0,
        creator: 0,
    },
    JobSeed {
        title: "UI/UX Designer",
        description: "Design web interfaces",
        requirements: &["Figma", "Sketch"],
        salary: 75_000,
        experience_level: 1,
        location: "Remote",
        job_type: JobType::Contract,
        position: 1,
        company: 0,
        creator: 0,
    },
    JobSeed {
        title: "QA Engineer",
        description: "Test our platform",
        requirements: &["Selenium", "Jest"],
        salary: 70_000,
        experience_level: 2,
        location: "On-site",
        job_type: JobType::FullTime,
        position: 2,
        company: 0,
        creator: 0,
    },
    // DevHouse
    JobSeed {
        title: "Backend Developer",
        description: "Node.js microservices",
        requirements: &["Node.js", "MongoDB", "Docker"],
        salary: 95_000,
        experience_level: 3,
        location: "New York",
        job_type: JobType::FullTime,
        position: 1,
        company: 1,
        creator: 1,
    },
    JobSeed {
        title: "DevOps Engineer",
        description: "CI/CD pipelines",
        requirements: &["AWS", "GitHub Actions", "Terraform"],
        salary: 100_000,
        experience_level: 3,
        location: "Hybrid",
        job_type: JobType::FullTime,
        position: 1,
        company: 1,
        creator: 1,
    },
    JobSeed {
        title: "Project Manager",
        description: "Lead dev team",
        requirements: &["Agile", "Scrum", "Jira"],
        salary: 105_000,
        experience_level: 4,
        location: "Remote",
        job_type: JobType::Contract,
        position: 1,
        company: 1,
        creator: 1,
    },
    // CloudBase
    JobSeed {
        title: "Cloud Engineer",
        description: "Deploy cloud infra",
        requirements: &["GCP", "Kubernetes"],
        salary: 99_000,
        experience_level: 2,
        location: "Seattle",
        job_type: JobType::FullTime,
        position: 1,
        company: 2,
        creator: 1,
    },
    JobSeed {
        title: "AI Researcher",
        description: "AI & ML projects",
        requirements: &["TensorFlow", "Python"],
        salary: 120_000,
        experience_level: 5,
        location: "Remote",
        job_type: JobType::FullTime,
        position: 1,
        company: 2,
        creator: 1,
    },
    JobSeed {
        title: "Data Analyst",
        description: "Analyze product data",
        requirements: &["SQL", "Tableau"],
        salary: 85_000,
        experience_level: 2,
        location: "Remote",
        job_type: JobType::FullTime,
        position: 1,
        company: 2,
        creator: 1,
    },
    JobSeed {
        title: "Support Engineer",
        description: "Assist users",
        requirements: &["Customer Service", "Troubleshooting"],
        salary: 65_000,
        experience_level: 1,
        location: "On-site",
        job_type: JobType::PartTime,
        position: 2,
        company: 2,
        creator: 1,
    },
];

pub const APPLICATIONS: &[ApplicationSeed] = &[
    ApplicationSeed {
        job: 0,
        applicant: 0,
        status: ApplicationStatus::Pending,
    },
    ApplicationSeed {
        job: 1,
        applicant: 1,
        status: ApplicationStatus::Accepted,
    },
    ApplicationSeed {
        job: 2,
        applicant: 2,
        status: ApplicationStatus::Pending,
    },
    ApplicationSeed {
        job: 3,
        applicant: 0,
        status: ApplicationStatus::Rejected,
    },
    ApplicationSeed {
        job: 4,
        applicant: 1,
        status: ApplicationStatus::Pending,
    },
    ApplicationSeed {
        job: 5,
        applicant: 2,
        status: ApplicationStatus::Pending,
    },
];

/// One complete set of seed lists, loaded together by the seeder.
#[derive(Debug, Clone, Copy)]
pub struct SeedData<'a> {
    pub recruiters: &'a [UserSeed],
    pub students: &'a [UserSeed],
    pub companies: &'a [CompanySeed],
    /// `(recruiter position, company position)` profile links.
    pub recruiter_links: &'a [(usize, usize)],
    pub jobs: &'a [JobSeed],
    pub applications: &'a [ApplicationSeed],
}

/// The job board's sample data.
pub const SAMPLE: SeedData<'static> = SeedData {
    recruiters: RECRUITERS,
    students: STUDENTS,
    companies: COMPANIES,
    recruiter_links: RECRUITER_COMPANY_LINKS,
    jobs: JOBS,
    applications: APPLICATIONS,
};

impl SeedData<'_> {
    /// Number of users the data produces.
    pub fn user_count(&self) -> usize {
        self.recruiters.len() + self.students.len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn literal_counts_match_the_sample_data() {
        assert_eq!(RECRUITERS.len(), 2);
        assert_eq!(STUDENTS.len(), 3);
        assert_eq!(SAMPLE.user_count(), 5);
        assert_eq!(COMPANIES.len(), 3);
        assert_eq!(JOBS.len(), 10);
        assert_eq!(APPLICATIONS.len(), 6);
    }

    #[test]
    fn roles_match_their_lists() {
        assert!(RECRUITERS.iter().all(|seed| seed.role == Role::Recruiter));
        assert!(STUDENTS.iter().all(|seed| seed.role == Role::Student));
    }

    #[test]
    fn every_position_points_into_an_earlier_list() {
        for company in COMPANIES {
            assert!(company.owner < RECRUITERS.len(), "{}", company.name);
        }
        for job in JOBS {
            assert!(job.company < COMPANIES.len(), "{}", job.title);
            assert!(job.creator < RECRUITERS.len(), "{}", job.title);
        }
        for application in APPLICATIONS {
            assert!(application.job < JOBS.len());
            assert!(application.applicant < STUDENTS.len());
        }
        for &(recruiter, company) in RECRUITER_COMPANY_LINKS {
            assert!(recruiter < RECRUITERS.len());
            assert!(company < COMPANIES.len());
        }
    }

    #[test]
    fn job_creator_owns_the_job_company() {
        for job in JOBS {
            assert_eq!(COMPANIES[job.company].owner, job.creator, "{}", job.title);
        }
    }

    #[test]
    fn unique_columns_are_unique() {
        let emails: HashSet<_> = RECRUITERS.iter().chain(STUDENTS).map(|s| s.email).collect();
        assert_eq!(emails.len(), SAMPLE.user_count());

        let names: HashSet<_> = COMPANIES.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), COMPANIES.len());
    }

    #[test]
    fn student_seed_builds_full_profile() {
        let user = STUDENTS[1].to_new_user();
        assert_eq!(user.fullname, "Carol Developer");
        assert_eq!(user.password, PLACEHOLDER_PASSWORD);
        assert_eq!(user.profile.skills, vec!["Node.js", "MongoDB"]);
        assert_eq!(
            user.profile.resume_original_name.as_deref(),
            Some("Carol_Resume.pdf")
        );
        assert!(user.profile.company.is_none());
    }

    #[test]
    fn recruiter_seed_starts_with_empty_profile() {
        let user = RECRUITERS[0].to_new_user();
        assert_eq!(user.role, Role::Recruiter);
        assert_eq!(user.profile, UserProfile::default());
    }
}
