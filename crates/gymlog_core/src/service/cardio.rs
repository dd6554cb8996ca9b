//! Cardio sessions and the per-day cardio form draft.

use super::store::{active_sede_mut, AppStore, StoreError, StoreResult};
use crate::model::nada::{NadaFormData, NadaFormField, NadaSession, NewNadaSession};
use crate::model::RecordId;
use crate::repo::state_repo::StateRepository;

impl<R: StateRepository> AppStore<R> {
    /// Records a cardio session for the active sede, newest first.
    pub fn add_nada_session(&mut self, input: NewNadaSession) -> StoreResult<RecordId> {
        self.mutate("add_nada_session", |state| {
            let (sede_name, _) = active_sede_mut(state)?;
            let session = NadaSession::from_new(input, sede_name);
            let id = session.id.clone();
            state.summary_nada_sessions.insert(0, session);
            Ok(id)
        })
    }

    /// Records the day's current form draft as a session.
    ///
    /// The draft is kept so the same values can be re-submitted.
    pub fn submit_nada_form(&mut self, day: &str) -> StoreResult<RecordId> {
        let form = self
            .active_sede_data()
            .ok_or(StoreError::NoActiveSede)?
            .workout_days
            .get(day)
            .map(|day_state| day_state.nada.clone())
            .unwrap_or_else(NadaFormData::fresh_today);
        let notes = Some(form.notes).filter(|notes| !notes.is_empty());
        self.add_nada_session(NewNadaSession {
            date: form.date,
            day: day.to_string(),
            title: form.title,
            metrics: form.metrics,
            notes,
        })
    }

    /// Sets one field of a day's cardio form draft by its stored name.
    ///
    /// Unknown days are ignored; returns whether a form was updated.
    pub fn update_workout_day_form(&mut self, day: &str, field: &str, value: &str) -> StoreResult<bool> {
        let field = NadaFormField::parse(field)
            .ok_or_else(|| StoreError::InvalidFormField(format!("unknown field `{field}`")))?;
        let mut draft = match self.active_sede_data() {
            Some(sede) => match sede.workout_days.get(day) {
                Some(day_state) => day_state.nada.clone(),
                None => return Ok(false),
            },
            None => return Err(StoreError::NoActiveSede),
        };
        draft
            .set_field(field, value.to_string())
            .map_err(StoreError::InvalidFormField)?;

        self.mutate("update_workout_day_form", |state| {
            let (_, sede) = active_sede_mut(state)?;
            if let Some(day_state) = sede.workout_days.get_mut(day) {
                day_state.nada = draft;
            }
            Ok(true)
        })
    }

    /// Resets a day's cardio form to an empty draft dated today.
    pub fn clear_nada_form(&mut self, day: &str) -> StoreResult<bool> {
        self.mutate("clear_nada_form", |state| {
            let (_, sede) = active_sede_mut(state)?;
            let Some(day_state) = sede.workout_days.get_mut(day) else {
                return Ok(false);
            };
            day_state.nada = NadaFormData::fresh_today();
            Ok(true)
        })
    }
}
