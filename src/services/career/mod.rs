// Career service
// Careers and their curricula in the `careers` collection

use serde_json::{Map, Value};

use crate::error::{AppError, ValidationError};
use crate::models::career::{validate_curriculum, Career, Curriculum};
use crate::models::subject::Subject;
use crate::services::session::navigation::can_manage_catalog;
use crate::services::session::SessionContext;
use crate::services::store::{collections, to_document, RecordStore, StoredDocument};

pub struct CareerService<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> CareerService<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    pub fn create(&self, session: &SessionContext, career: &Career) -> Result<String, AppError> {
        require_catalog_role(session)?;
        career.validate()?;

        let data = to_document(career).map_err(|e| AppError::mutation("career", e))?;
        let id = self
            .store
            .create(collections::CAREERS, data)
            .map_err(|e| AppError::mutation("career", e))?;

        log::info!("Created career {} ({})", id, career.name);
        Ok(id)
    }

    /// Change name and semester count, keeping the curriculum.
    ///
    /// Fails if the curriculum uses a semester beyond the new count.
    pub fn update(&self, session: &SessionContext, id: &str, name: &str, semesters: u32) -> Result<(), AppError> {
        require_catalog_role(session)?;
        let mut career = self.require(id)?;
        career.name = name.trim().to_string();
        career.semesters = semesters;
        career.validate()?;

        let mut patch = Map::new();
        patch.insert("name".to_string(), Value::from(career.name.clone()));
        patch.insert("semesters".to_string(), Value::from(semesters));
        self.store
            .update(collections::CAREERS, id, patch)
            .map_err(|e| AppError::mutation("career", e))?;

        log::info!("Updated career {}", id);
        Ok(())
    }

    pub fn delete(&self, session: &SessionContext, id: &str) -> Result<(), AppError> {
        require_catalog_role(session)?;
        self.require(id)?;

        self.store
            .delete(collections::CAREERS, id)
            .map_err(|e| AppError::mutation("career", e))?;

        log::info!("Deleted career {}", id);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<Career>, AppError> {
        self.store
            .get(collections::CAREERS, id)
            .and_then(|doc| doc.map(|d| decode(&d)).transpose())
            .map_err(|e| AppError::fetch("career", e))
    }

    pub fn list(&self) -> Result<Vec<Career>, AppError> {
        self.store
            .list(collections::CAREERS)
            .and_then(|docs| docs.iter().map(decode).collect())
            .map_err(|e| AppError::fetch("careers", e))
    }

    /// Replace the whole curriculum. Empty semesters are dropped.
    pub fn set_curriculum(
        &self,
        session: &SessionContext,
        id: &str,
        curriculum: Curriculum,
    ) -> Result<(), AppError> {
        require_catalog_role(session)?;
        let career = self.require(id)?;

        let curriculum: Curriculum = curriculum
            .into_iter()
            .filter(|(_, ids)| !ids.is_empty())
            .collect();
        validate_curriculum(&curriculum, career.semesters)?;

        let value = serde_json::to_value(&curriculum).map_err(|e| AppError::mutation("curriculum", e.into()))?;
        let mut patch = Map::new();
        patch.insert("curriculum".to_string(), value);
        self.store
            .update(collections::CAREERS, id, patch)
            .map_err(|e| AppError::mutation("curriculum", e))?;

        log::info!("Saved curriculum of career {}", id);
        Ok(())
    }

    /// Add one subject to a semester of the curriculum.
    ///
    /// Returns `false` if the subject was already assigned in this career.
    pub fn assign_subject(
        &self,
        session: &SessionContext,
        id: &str,
        semester: u32,
        subject_id: &str,
    ) -> Result<bool, AppError> {
        require_catalog_role(session)?;
        let career = self.require(id)?;
        if semester == 0 {
            return Err(ValidationError::InvalidSemester.into());
        }
        if semester > career.semesters {
            return Err(ValidationError::SemesterOutOfRange {
                semester,
                max: career.semesters,
            }
            .into());
        }
        if career.is_assigned(subject_id) {
            return Ok(false);
        }

        let mut curriculum = career.curriculum;
        curriculum
            .entry(semester.to_string())
            .or_default()
            .push(subject_id.to_string());
        self.set_curriculum(session, id, curriculum)?;
        Ok(true)
    }

    fn require(&self, id: &str) -> Result<Career, AppError> {
        self.get(id)?
            .ok_or_else(|| AppError::not_found(collections::CAREERS, id))
    }
}

/// Subjects that may still be added to a career's semester: their own
/// semester matches and they are not assigned anywhere in the career.
pub fn assignable_subjects<'s>(career: &Career, semester: u32, subjects: &'s [Subject]) -> Vec<&'s Subject> {
    subjects
        .iter()
        .filter(|subject| subject.semester == semester)
        .filter(|subject| {
            subject
                .id
                .as_deref()
                .is_some_and(|id| !career.is_assigned(id))
        })
        .collect()
}

fn require_catalog_role(session: &SessionContext) -> Result<(), AppError> {
    if can_manage_catalog(&session.role) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied("only directors and administrators manage the catalog"))
    }
}

fn decode(doc: &StoredDocument) -> anyhow::Result<Career> {
    let mut career: Career = doc.parse()?;
    career.id = Some(doc.id.clone());
    Ok(career)
}
