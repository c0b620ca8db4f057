//! `siga` command line.
//!
//! Every command opens the configured database, signs in when it acts on
//! behalf of a user, runs one service operation and prints the result.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::models::availability::{AvailabilityEdit, AvailabilityForm};
use crate::models::career::Career;
use crate::models::subject::{Subject, SubjectHours};
use crate::models::user::Role;
use crate::schedule::access::TeacherSelection;
use crate::schedule::alias::{AliasResolver, DIALOG_SEPARATOR};
use crate::schedule::controller::{GridController, RefreshOutcome};
use crate::services::availability::AvailabilityService;
use crate::services::career::CareerService;
use crate::services::database::Database;
use crate::services::identity::LocalIdentityProvider;
use crate::services::session::navigation::navigation_for;
use crate::services::session::{SessionContext, SessionManager};
use crate::services::settings::SettingsService;
use crate::services::store::SqliteRecordStore;
use crate::services::subject::SubjectService;
use crate::services::user::{NewUser, UserService};
use crate::utils::time::format_hhmm;

pub mod render;

#[derive(Parser, Debug)]
#[command(name = "siga", version, about = "Teacher availability scheduling")]
pub struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding the settings
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Sign-in for commands that act as a user.
#[derive(Args, Debug, Clone)]
pub struct Credentials {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database and the first administrator
    Init {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
    },
    /// Create an account (administrators only)
    AddUser {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long)]
        new_email: String,
        #[arg(long)]
        new_password: String,
        #[arg(long)]
        name: String,
        /// admin, director or profesor
        #[arg(long)]
        role: String,
    },
    AddCareer {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long)]
        name: String,
        #[arg(long)]
        semesters: u32,
    },
    AddSubject {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long)]
        name: String,
        #[arg(long)]
        semester: u32,
        #[arg(long, default_value_t = 0)]
        theory: u32,
        #[arg(long, default_value_t = 0)]
        practice: u32,
        /// Per-career display name, as CAREER_ID=NAME
        #[arg(long = "alias", value_parser = parse_alias)]
        aliases: Vec<(String, String)>,
    },
    /// Add a subject to a semester of a career's curriculum
    Assign {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long)]
        career: String,
        #[arg(long)]
        semester: u32,
        #[arg(long)]
        subject: String,
    },
    /// List subjects, or a career's subject picker by semester
    Subjects {
        #[arg(long)]
        career: Option<String>,
        #[arg(long, requires = "career")]
        semester: Option<u32>,
    },
    AddAvailability {
        #[command(flatten)]
        auth: Credentials,
        /// Teacher uid (supervisors only)
        #[arg(long)]
        teacher: Option<String>,
        #[arg(long)]
        day: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        subject: String,
    },
    EditAvailability {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long)]
        id: String,
        #[arg(long)]
        day: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    DeleteAvailability {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long)]
        id: String,
    },
    /// Print the availability grid
    Grid {
        #[command(flatten)]
        auth: Credentials,
        /// Teacher uid, or "all"
        #[arg(long)]
        teacher: Option<String>,
        /// Career whose subject aliases to show
        #[arg(long)]
        career: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Print the configured time slots
    Slots {
        /// Form selector slots instead of grid rows
        #[arg(long)]
        input: bool,
    },
    /// List teachers for the grid's teacher filter
    Teachers {
        #[command(flatten)]
        auth: Credentials,
    },
}

fn parse_alias(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((career, alias)) if !career.trim().is_empty() => {
            Ok((career.trim().to_string(), alias.trim().to_string()))
        }
        _ => Err(format!("expected CAREER_ID=NAME, got '{}'", raw)),
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let settings_service = SettingsService::new(
        cli.config
            .clone()
            .unwrap_or_else(SettingsService::default_path),
    );
    let settings = settings_service.load_or_default();

    if let Command::Slots { input } = &cli.command {
        let slots = if *input {
            settings.schedule.input_slots()?
        } else {
            settings.schedule.grid_slots()?
        };
        for label in slots.labels() {
            println!("{}", label);
        }
        return Ok(());
    }

    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| SettingsService::database_path(&settings));
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let db = Database::new(&db_path.to_string_lossy())?;
    db.initialize_schema()?;

    let store = SqliteRecordStore::new(db.connection());
    let identity = LocalIdentityProvider::new(db.connection());
    let users = UserService::new(&store);
    let sessions = SessionManager::new(&identity, &users);
    let login = |auth: &Credentials| -> Result<SessionContext> {
        let session = sessions.login(&auth.email, &auth.password)?;
        let menu: Vec<_> = navigation_for(&session.role).iter().map(|n| n.label()).collect();
        log::info!(
            "Signed in as {} [{}] ({}), sections: {}",
            session.name,
            session.initials(),
            session.display_role(),
            menu.join(", ")
        );
        Ok(session)
    };

    match cli.command {
        Command::Init { email, password, name } => {
            let admin = users.bootstrap_admin(&identity, &email, &password, &name)?;
            println!("Database ready at {}", db_path.display());
            println!("Administrator {} ({})", admin.nombre, admin.uid);
        }
        Command::AddUser {
            auth,
            new_email,
            new_password,
            name,
            role,
        } => {
            let session = login(&auth)?;
            let new_user = NewUser {
                email: new_email,
                password: new_password,
                nombre: name,
                rol: Role::parse_assignable(&role)?,
            };
            let profile = users.create_user(&session, &identity, new_user)?;
            println!("{}", profile.uid);
        }
        Command::AddCareer { auth, name, semesters } => {
            let session = login(&auth)?;
            let id = CareerService::new(&store).create(&session, &Career::new(name, semesters))?;
            println!("{}", id);
        }
        Command::AddSubject {
            auth,
            name,
            semester,
            theory,
            practice,
            aliases,
        } => {
            let session = login(&auth)?;
            let mut subject = Subject::new(name, semester, SubjectHours::new(theory, practice));
            for (career_id, alias) in aliases {
                subject.set_alias(career_id, alias);
            }
            let id = SubjectService::new(&store).create(&session, &subject)?;
            println!("{}", id);
        }
        Command::Assign {
            auth,
            career,
            semester,
            subject,
        } => {
            let session = login(&auth)?;
            if SubjectService::new(&store).get(&subject)?.is_none() {
                return Err(anyhow!("Subject {} does not exist", subject));
            }
            let added = CareerService::new(&store).assign_subject(&session, &career, semester, &subject)?;
            if !added {
                println!("Subject {} is already part of this career", subject);
            }
        }
        Command::Subjects { career, semester } => {
            let subjects = SubjectService::new(&store);
            match career {
                Some(career_id) => {
                    let career = CareerService::new(&store)
                        .get(&career_id)?
                        .ok_or_else(|| anyhow!("Career {} does not exist", career_id))?;
                    let semesters: Vec<u32> = match semester {
                        Some(semester) => vec![semester],
                        None => career.semester_numbers().collect(),
                    };
                    for semester in semesters {
                        for option in subjects.career_subject_options(&career, semester)? {
                            println!("{}\t{}\t{}", semester, option.id, option.label);
                        }
                    }
                }
                None => print!("{}", render::subject_list(&subjects.list()?)),
            }
        }
        Command::AddAvailability {
            auth,
            teacher,
            day,
            start,
            end,
            subject,
        } => {
            let session = login(&auth)?;
            let form = AvailabilityForm {
                day,
                start_time: start,
                end_time: end,
                subject_id: subject,
            };
            let selection = TeacherSelection::from_filter(teacher.as_deref());
            let record = AvailabilityService::new(&store).create(&session, &selection, &form)?;
            println!("{}", record.id.unwrap_or_default());
        }
        Command::EditAvailability {
            auth,
            id,
            day,
            start,
            end,
        } => {
            let session = login(&auth)?;
            let edit = AvailabilityEdit {
                day,
                start_time: start,
                end_time: end,
            };
            let availability = AvailabilityService::new(&store);
            availability.update(&session, &id, &edit)?;
            if let Some(record) = availability.get(&id)? {
                let subject = SubjectService::new(&store).get(&record.subject_id)?;
                println!(
                    "{}: {} {}-{}",
                    AliasResolver::new(DIALOG_SEPARATOR).resolve_full(subject.as_ref()),
                    record.day,
                    format_hhmm(record.start_time),
                    format_hhmm(record.end_time)
                );
            }
        }
        Command::DeleteAvailability { auth, id } => {
            let session = login(&auth)?;
            AvailabilityService::new(&store).delete(&session, &id)?;
        }
        Command::Grid {
            auth,
            teacher,
            career,
            json,
        } => {
            let session = login(&auth)?;
            let request = session.grid_request(TeacherSelection::from_filter(teacher.as_deref()), career);
            let controller = GridController::new(settings.schedule.grid_slots()?);
            let availability = AvailabilityService::new(&store);

            let outcome = controller
                .refresh(&request, async { availability.load_grid_inputs(&request) })
                .await?;
            if let RefreshOutcome::Discarded { generation, latest } = outcome {
                log::warn!("Grid refresh {} superseded by {}", generation, latest);
            }

            let grid = controller.current();
            if json {
                println!("{}", serde_json::to_string_pretty(&grid)?);
            } else {
                print!("{}", render::grid_table(&grid));
            }
        }
        Command::Teachers { auth } => {
            login(&auth)?;
            print!("{}", render::teacher_list(&users.list_teachers()?));
        }
        Command::Slots { .. } => {}
    }

    sessions.logout();
    Ok(())
}
