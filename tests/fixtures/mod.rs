// Test fixtures - reusable test data
// A file-backed database seeded with accounts, a career and its subjects

#![allow(dead_code)]

use siga_scheduler::models::career::Career;
use siga_scheduler::models::subject::{Subject, SubjectHours};
use siga_scheduler::models::user::{Role, UserProfile};
use siga_scheduler::services::career::CareerService;
use siga_scheduler::services::database::Database;
use siga_scheduler::services::identity::LocalIdentityProvider;
use siga_scheduler::services::session::{SessionContext, SessionManager};
use siga_scheduler::services::store::{collections, to_document, RecordStore, SqliteRecordStore};
use siga_scheduler::services::subject::SubjectService;
use siga_scheduler::services::user::{NewUser, UserService};
use tempfile::TempDir;

pub const PASSWORD: &str = "secret1";

/// Sample accounts
pub mod people {
    pub const ADMIN: &str = "admin@school.edu";
    pub const DIRECTOR: &str = "dora@school.edu";
    pub const ANA: &str = "ana@school.edu";
    pub const LUIS: &str = "luis@school.edu";
    pub const GUEST: &str = "guest@school.edu";
}

/// Ids created by [`seed`].
#[derive(Debug, Clone)]
pub struct Seeded {
    pub ana_uid: String,
    pub luis_uid: String,
    pub career_id: String,
    pub calc_id: String,
    pub prog_id: String,
}

/// Temporary database file; removed when dropped.
pub struct TestDb {
    pub dir: TempDir,
    pub db: Database,
}

impl TestDb {
    pub fn path(&self) -> String {
        self.dir.path().join("siga.db").to_string_lossy().to_string()
    }
}

pub fn open_db() -> TestDb {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("siga.db");
    let db = Database::new(path.to_str().unwrap()).expect("Failed to create database");
    db.initialize_schema().expect("Failed to initialize schema");
    TestDb { dir, db }
}

pub fn login(db: &Database, email: &str) -> SessionContext {
    let store = SqliteRecordStore::new(db.connection());
    let identity = LocalIdentityProvider::new(db.connection());
    let users = UserService::new(&store);
    SessionManager::new(&identity, &users)
        .login(email, PASSWORD)
        .expect("Failed to log in")
}

fn new_user(email: &str, name: &str, rol: Role) -> NewUser {
    NewUser {
        email: email.to_string(),
        password: PASSWORD.to_string(),
        nombre: name.to_string(),
        rol,
    }
}

/// Accounts for every role, one career with two subjects in semester 1.
pub fn seed(db: &Database) -> Seeded {
    let store = SqliteRecordStore::new(db.connection());
    let identity = LocalIdentityProvider::new(db.connection());
    let users = UserService::new(&store);

    users
        .bootstrap_admin(&identity, people::ADMIN, PASSWORD, "Ada Admin")
        .expect("Failed to create admin");
    let admin = login(db, people::ADMIN);

    let ana = users
        .create_user(&admin, &identity, new_user(people::ANA, "Ana Ruiz", Role::Profesor))
        .expect("Failed to create Ana");
    let luis = users
        .create_user(&admin, &identity, new_user(people::LUIS, "Luis Paz", Role::Profesor))
        .expect("Failed to create Luis");
    users
        .create_user(&admin, &identity, new_user(people::DIRECTOR, "Dora Díaz", Role::Director))
        .expect("Failed to create director");

    // Roles outside the known set can only come from hand-edited documents.
    let guest_uid = identity.register(people::GUEST, PASSWORD).expect("Failed to register guest");
    let guest = UserProfile::new(&guest_uid, people::GUEST, "Gus Guest", Role::Other("alumno".to_string()));
    store
        .set(collections::USERS, &guest_uid, to_document(&guest).unwrap())
        .expect("Failed to write guest profile");

    let careers = CareerService::new(&store);
    let career_id = careers
        .create(&admin, &Career::new("Systems Engineering", 10))
        .expect("Failed to create career");

    let subjects = SubjectService::new(&store);
    let calc_id = subjects
        .create(
            &admin,
            &Subject::new("Cálculo Diferencial", 1, SubjectHours::new(4, 2)).with_alias(&career_id, "Calc I"),
        )
        .expect("Failed to create calculus");
    let prog_id = subjects
        .create(&admin, &Subject::new("Programming", 1, SubjectHours::new(2, 4)))
        .expect("Failed to create programming");

    careers.assign_subject(&admin, &career_id, 1, &calc_id).unwrap();
    careers.assign_subject(&admin, &career_id, 1, &prog_id).unwrap();

    Seeded {
        ana_uid: ana.uid,
        luis_uid: luis.uid,
        career_id,
        calc_id,
        prog_id,
    }
}
