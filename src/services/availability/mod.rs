// Availability service
// Teacher availability records in the `teacherAvailability` collection

use serde_json::{json, Map, Value};

use crate::error::{AppError, ValidationError};
use crate::models::availability::{AvailabilityEdit, AvailabilityForm, AvailabilityRecord, TeacherRef};
use crate::models::user::{Role, UserProfile};
use crate::schedule::access::{edit_permission, visible_record_filter, RecordFilter, TeacherSelection};
use crate::schedule::{GridInputs, GridRequest};
use crate::services::session::SessionContext;
use crate::services::store::{collections, to_document, RecordStore, StoredDocument};
use crate::services::subject::SubjectService;
use crate::utils::time::format_hhmm;

pub struct AvailabilityService<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> AvailabilityService<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Save a new record from the availability form.
    ///
    /// A professor always records their own availability. Supervisors
    /// record it for the teacher picked in the teacher filter, which must
    /// be a specific teacher.
    pub fn create(
        &self,
        session: &SessionContext,
        selection: &TeacherSelection,
        form: &AvailabilityForm,
    ) -> Result<AvailabilityRecord, AppError> {
        let validated = form.validate()?;

        let owner = match (&session.role, selection) {
            (Role::Profesor, _) => session.teacher_ref(),
            (Role::Admin | Role::Director, TeacherSelection::All) => {
                return Err(ValidationError::TeacherNotSelected.into());
            }
            (Role::Admin | Role::Director, TeacherSelection::Teacher(teacher_id)) => {
                self.teacher_ref(teacher_id)?
            }
            (Role::Other(_), _) => {
                return Err(AppError::PermissionDenied("this role cannot record availability"));
            }
        };

        let mut record = validated.into_record(&owner)?;
        let data = to_document(&record).map_err(|e| AppError::mutation("availability", e))?;
        let id = self
            .store
            .create(collections::AVAILABILITY, data)
            .map_err(|e| AppError::mutation("availability", e))?;

        log::info!(
            "Created availability {} for {} on {} {}-{}",
            id,
            record.teacher_id,
            record.day,
            format_hhmm(record.start_time),
            format_hhmm(record.end_time)
        );
        record.id = Some(id);
        Ok(record)
    }

    pub fn get(&self, id: &str) -> Result<Option<AvailabilityRecord>, AppError> {
        self.store
            .get(collections::AVAILABILITY, id)
            .and_then(|doc| doc.map(|d| decode(&d)).transpose())
            .map_err(|e| AppError::fetch("availability", e))
    }

    /// Move a record to another day or time range. Teacher and subject stay.
    pub fn update(&self, session: &SessionContext, id: &str, edit: &AvailabilityEdit) -> Result<(), AppError> {
        let (day, start_time, end_time) = edit.validate()?;
        self.require_editable(session, id)?;

        let mut patch = Map::new();
        patch.insert("day".to_string(), json!(day));
        patch.insert("startTime".to_string(), Value::from(format_hhmm(start_time)));
        patch.insert("endTime".to_string(), Value::from(format_hhmm(end_time)));

        self.store
            .update(collections::AVAILABILITY, id, patch)
            .map_err(|e| AppError::mutation("availability", e))?;

        log::info!("Updated availability {}", id);
        Ok(())
    }

    pub fn delete(&self, session: &SessionContext, id: &str) -> Result<(), AppError> {
        self.require_editable(session, id)?;

        self.store
            .delete(collections::AVAILABILITY, id)
            .map_err(|e| AppError::mutation("availability", e))?;

        log::info!("Deleted availability {}", id);
        Ok(())
    }

    /// Records admitted by a visibility filter.
    ///
    /// A deny-all filter returns nothing without querying the store.
    pub fn fetch_visible(&self, filter: &RecordFilter) -> Result<Vec<AvailabilityRecord>, AppError> {
        let documents = match filter {
            RecordFilter::Nothing => return Ok(Vec::new()),
            RecordFilter::All => self.store.list(collections::AVAILABILITY),
            RecordFilter::OwnedBy(teacher_id) => {
                log::debug!("Fetching availability for teacher {}", teacher_id);
                self.store
                    .query_eq(collections::AVAILABILITY, "teacherUid", &json!(teacher_id))
            }
        }
        .map_err(|e| AppError::fetch("availability", e))?;

        documents
            .iter()
            .map(decode)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| AppError::fetch("availability", e))
    }

    /// Everything a grid render needs for the given request.
    pub fn load_grid_inputs(&self, request: &GridRequest) -> Result<GridInputs, AppError> {
        let records = self.fetch_visible(&request.filter())?;
        let subjects = SubjectService::new(self.store).by_id()?;
        Ok(GridInputs { records, subjects })
    }

    fn teacher_ref(&self, teacher_id: &str) -> Result<TeacherRef, AppError> {
        let doc = self
            .store
            .get(collections::USERS, teacher_id)
            .map_err(|e| AppError::fetch("teacher", e))?
            .ok_or_else(|| AppError::not_found(collections::USERS, teacher_id))?;
        let profile: UserProfile = doc.parse().map_err(|e| AppError::fetch("teacher", e))?;
        Ok(TeacherRef::new(teacher_id, profile.nombre))
    }

    /// The record must exist, the role must allow editing, and the record
    /// must be one the session can see.
    fn require_editable(&self, session: &SessionContext, id: &str) -> Result<AvailabilityRecord, AppError> {
        if !edit_permission(&session.role) {
            return Err(AppError::PermissionDenied("this role cannot edit availability"));
        }

        let record = self
            .get(id)?
            .ok_or_else(|| AppError::not_found(collections::AVAILABILITY, id))?;

        let visible = visible_record_filter(&session.role, &session.uid, &TeacherSelection::All);
        if !visible.matches(&record) {
            return Err(AppError::PermissionDenied("record belongs to another teacher"));
        }
        Ok(record)
    }
}

fn decode(doc: &StoredDocument) -> anyhow::Result<AvailabilityRecord> {
    let mut record: AvailabilityRecord = doc.parse()?;
    record.id = Some(doc.id.clone());
    Ok(record)
}
