// Subject service
// Subject catalog in the `subjects` collection

use std::collections::HashMap;

use serde::Serialize;

use crate::error::AppError;
use crate::models::career::Career;
use crate::models::subject::Subject;
use crate::schedule::alias::AliasResolver;
use crate::services::session::navigation::can_manage_catalog;
use crate::services::session::SessionContext;
use crate::services::store::{collections, to_document, RecordStore, StoredDocument};

/// One entry of the subject picker in the availability form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectOption {
    pub id: String,
    pub label: String,
}

pub struct SubjectService<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> SubjectService<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    pub fn create(&self, session: &SessionContext, subject: &Subject) -> Result<String, AppError> {
        require_catalog_role(session)?;
        subject.validate()?;

        let data = to_document(subject).map_err(|e| AppError::mutation("subject", e))?;
        let id = self
            .store
            .create(collections::SUBJECTS, data)
            .map_err(|e| AppError::mutation("subject", e))?;

        log::info!("Created subject {} ({})", id, subject.name);
        Ok(id)
    }

    /// Replace a subject's name, semester, hours and aliases.
    pub fn update(&self, session: &SessionContext, id: &str, subject: &Subject) -> Result<(), AppError> {
        require_catalog_role(session)?;
        subject.validate()?;
        self.ensure_exists(id)?;

        let data = to_document(subject).map_err(|e| AppError::mutation("subject", e))?;
        self.store
            .set(collections::SUBJECTS, id, data)
            .map_err(|e| AppError::mutation("subject", e))?;

        log::info!("Updated subject {}", id);
        Ok(())
    }

    pub fn delete(&self, session: &SessionContext, id: &str) -> Result<(), AppError> {
        require_catalog_role(session)?;
        self.ensure_exists(id)?;

        self.store
            .delete(collections::SUBJECTS, id)
            .map_err(|e| AppError::mutation("subject", e))?;

        log::info!("Deleted subject {}", id);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<Subject>, AppError> {
        self.store
            .get(collections::SUBJECTS, id)
            .and_then(|doc| doc.map(|d| decode(&d)).transpose())
            .map_err(|e| AppError::fetch("subject", e))
    }

    /// All subjects, sorted by name.
    pub fn list(&self) -> Result<Vec<Subject>, AppError> {
        let mut subjects = self.load_all()?;
        subjects.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(subjects)
    }

    /// Subjects keyed by id, as the grid renderer looks them up.
    pub fn by_id(&self) -> Result<HashMap<String, Subject>, AppError> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter_map(|subject| subject.id.clone().map(|id| (id, subject)))
            .collect())
    }

    /// Subjects of a career's semester, labelled as that career names them.
    ///
    /// Curriculum entries whose subject no longer exists are skipped.
    pub fn career_subject_options(&self, career: &Career, semester: u32) -> Result<Vec<SubjectOption>, AppError> {
        let subjects = self.by_id()?;
        let career_id = career.id.as_deref().unwrap_or_default();
        let resolver = AliasResolver::default();

        Ok(career
            .subjects_in(semester)
            .iter()
            .filter_map(|id| {
                subjects.get(id).map(|subject| SubjectOption {
                    id: id.clone(),
                    label: resolver.resolve(Some(subject), career_id),
                })
            })
            .collect())
    }

    fn load_all(&self) -> Result<Vec<Subject>, AppError> {
        self.store
            .list(collections::SUBJECTS)
            .and_then(|docs| docs.iter().map(decode).collect())
            .map_err(|e| AppError::fetch("subjects", e))
    }

    fn ensure_exists(&self, id: &str) -> Result<(), AppError> {
        match self.get(id)? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found(collections::SUBJECTS, id)),
        }
    }
}

fn require_catalog_role(session: &SessionContext) -> Result<(), AppError> {
    if can_manage_catalog(&session.role) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied("only directors and administrators manage the catalog"))
    }
}

fn decode(doc: &StoredDocument) -> anyhow::Result<Subject> {
    let mut subject: Subject = doc.parse()?;
    subject.id = Some(doc.id.clone());
    Ok(subject)
}
