//! Generation-tagged grid refreshes.
//!
//! Every refresh takes a new generation number before it suspends on its
//! fetch. When the fetch completes, the result is applied only if no later
//! refresh has started in the meantime ("last request wins"). Everything
//! runs on one thread; the counter and the current grid sit in `Cell` and
//! `RefCell`.

use std::cell::{Cell, RefCell};
use std::future::Future;

use crate::error::AppError;
use crate::models::day::Weekday;

use super::grid::AvailabilityGrid;
use super::time_slots::TimeSlotGenerator;
use super::{build_grid, GridInputs, GridRequest};

/// Result of a refresh that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The grid was rebuilt from this refresh's data.
    Applied { generation: u64 },
    /// A newer refresh started while this one was waiting; its data was
    /// dropped.
    Discarded { generation: u64, latest: u64 },
}

/// Holds the latest rendered grid for a view.
#[derive(Debug)]
pub struct GridController {
    slots: TimeSlotGenerator,
    generation: Cell<u64>,
    current: RefCell<AvailabilityGrid>,
}

impl GridController {
    pub fn new(slots: TimeSlotGenerator) -> Self {
        let empty = AvailabilityGrid::empty(&Weekday::ALL, &slots.slots());
        Self {
            slots,
            generation: Cell::new(0),
            current: RefCell::new(empty),
        }
    }

    /// Generation of the most recently started refresh.
    pub fn latest_generation(&self) -> u64 {
        self.generation.get()
    }

    /// Snapshot of the grid currently on display.
    pub fn current(&self) -> AvailabilityGrid {
        self.current.borrow().clone()
    }

    /// Fetch inputs and rebuild the grid unless superseded.
    ///
    /// A fetch failure for the latest generation clears the grid to an empty
    /// skeleton and returns the error; a failure for a superseded generation
    /// is dropped like any other stale result.
    pub async fn refresh<F>(&self, request: &GridRequest, fetch: F) -> Result<RefreshOutcome, AppError>
    where
        F: Future<Output = Result<GridInputs, AppError>>,
    {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        log::debug!("Grid refresh {} started", generation);

        let fetched = fetch.await;

        let latest = self.generation.get();
        if generation != latest {
            log::warn!(
                "Discarding stale grid refresh {} (latest is {})",
                generation,
                latest
            );
            return Ok(RefreshOutcome::Discarded { generation, latest });
        }

        match fetched {
            Ok(inputs) => {
                let grid = build_grid(request, inputs, &self.slots);
                *self.current.borrow_mut() = grid;
                Ok(RefreshOutcome::Applied { generation })
            }
            Err(err) => {
                log::warn!("Grid refresh {} failed: {}", generation, err);
                *self.current.borrow_mut() =
                    AvailabilityGrid::empty(&Weekday::ALL, &self.slots.slots());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::availability::{AvailabilityRecord, TeacherRef};
    use crate::models::user::Role;
    use crate::schedule::access::TeacherSelection;
    use crate::schedule::time_slots::TimeSlot;
    use chrono::NaiveTime;
    use std::collections::HashMap;
    use tokio::sync::oneshot;

    fn inputs_for(teacher: &str, subject: &str) -> GridInputs {
        let record = AvailabilityRecord::new(
            &TeacherRef::new(teacher, teacher),
            Weekday::Monday,
            NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
            subject,
        )
        .unwrap();
        GridInputs {
            records: vec![record],
            subjects: HashMap::new(),
        }
    }

    fn admin_request() -> GridRequest {
        GridRequest::new(Role::Admin, "A1", TeacherSelection::All, None)
    }

    fn controller() -> GridController {
        GridController::new(TimeSlotGenerator::new(7, 9, 45).unwrap())
    }

    fn first_cell_teacher(controller: &GridController) -> Option<String> {
        let slot = TimeSlot::parse("07:00").unwrap();
        controller
            .current()
            .cell(Weekday::Monday, slot)
            .first()
            .and_then(|entry| entry.teacher_label.clone())
    }

    #[tokio::test]
    async fn test_refresh_applies_result() {
        let controller = controller();
        let outcome = controller
            .refresh(&admin_request(), async { Ok(inputs_for("T1", "calc")) })
            .await
            .unwrap();

        assert_eq!(outcome, RefreshOutcome::Applied { generation: 1 });
        assert_eq!(first_cell_teacher(&controller), Some("T1".to_string()));
    }

    #[tokio::test]
    async fn test_late_response_from_older_refresh_is_discarded() {
        let controller = controller();
        let request = admin_request();
        let (slow_tx, slow_rx) = oneshot::channel::<GridInputs>();
        let (fast_tx, fast_rx) = oneshot::channel::<GridInputs>();

        let slow = controller.refresh(&request, async {
            Ok(slow_rx.await.expect("slow sender dropped"))
        });
        let fast = controller.refresh(&request, async {
            Ok(fast_rx.await.expect("fast sender dropped"))
        });
        let deliver = async {
            // Newer request answers first, older one arrives late.
            fast_tx.send(inputs_for("NEW", "calc")).ok();
            tokio::task::yield_now().await;
            slow_tx.send(inputs_for("OLD", "calc")).ok();
        };

        let (slow_outcome, fast_outcome, ()) = tokio::join!(slow, fast, deliver);

        assert_eq!(
            slow_outcome.unwrap(),
            RefreshOutcome::Discarded { generation: 1, latest: 2 }
        );
        assert_eq!(fast_outcome.unwrap(), RefreshOutcome::Applied { generation: 2 });
        assert_eq!(first_cell_teacher(&controller), Some("NEW".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_error_clears_previous_grid() {
        let controller = controller();
        controller
            .refresh(&admin_request(), async { Ok(inputs_for("T1", "calc")) })
            .await
            .unwrap();
        assert!(!controller.current().is_empty());

        let result = controller
            .refresh(&admin_request(), async {
                Err(AppError::fetch("availability", anyhow::anyhow!("offline")))
            })
            .await;

        assert!(matches!(result, Err(AppError::Fetch { .. })));
        assert!(controller.current().is_empty());
        assert_eq!(controller.latest_generation(), 2);
    }
}
