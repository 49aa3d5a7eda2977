//! Daily attendance business logic.
//!
//! This module covers the three steps of taking attendance for a roster on one
//! date:
//!
//! 1. **Build** an [`AttendanceSheet`]: every roster entity gets exactly one
//!    entry, copied from its stored record or defaulted to Present.
//! 2. **Edit** the sheet through [`AttendanceSheet::transition`]. Moving to
//!    Sick or Permission asks a [`NotePrompt`] for a short reason; cancelling
//!    the prompt discards the change.
//! 3. **Submit** the sheet with [`submit_sheet`], one upsert keyed on
//!    `(subject, subject_id, date)`.
//!
//! The same code serves students and teachers through [`RosterScope`].

use crate::{
    core::roster::{self, RosterEntry, RosterScope},
    entities::{AttendanceRecord, AttendanceStatus, AttendanceSubject, attendance_record},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, sea_query::OnConflict,
};
use std::collections::HashMap;
use std::future::Future;
use tracing::{debug, info};

/// Parses a `YYYY-MM-DD` date argument.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate {
        input: input.to_string(),
    })
}

/// Status and note of one entity on the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceEntry {
    /// Attendance status
    pub status: AttendanceStatus,
    /// Reason for Sick/Permission; empty otherwise
    pub note: String,
}

impl AttendanceEntry {
    /// An entry with an empty note.
    #[must_use]
    pub const fn new(status: AttendanceStatus) -> Self {
        Self {
            status,
            note: String::new(),
        }
    }
}

impl Default for AttendanceEntry {
    fn default() -> Self {
        Self::new(AttendanceStatus::Present)
    }
}

/// Per-status counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    /// Hadir
    pub present: u32,
    /// Sakit
    pub sick: u32,
    /// Izin
    pub permission: u32,
    /// Alfa
    pub absent: u32,
}

impl StatusCounts {
    /// Counts one occurrence of `status`.
    pub const fn record(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Sick => self.sick += 1,
            AttendanceStatus::Permission => self.permission += 1,
            AttendanceStatus::Absent => self.absent += 1,
        }
    }

    /// Count for one status.
    #[must_use]
    pub const fn get(&self, status: AttendanceStatus) -> u32 {
        match status {
            AttendanceStatus::Present => self.present,
            AttendanceStatus::Sick => self.sick,
            AttendanceStatus::Permission => self.permission,
            AttendanceStatus::Absent => self.absent,
        }
    }

    /// Sum of all four counters.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.present + self.sick + self.permission + self.absent
    }
}

impl FromIterator<AttendanceStatus> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = AttendanceStatus>>(iter: I) -> Self {
        let mut counts = Self::default();
        for status in iter {
            counts.record(status);
        }
        counts
    }
}

/// A pending note prompt: which status is being set and the note to offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRequest {
    /// Entity being changed
    pub entity_id: i64,
    /// Status the entity is moving to
    pub status: AttendanceStatus,
    /// Previous note, offered as the default answer
    pub default_note: String,
}

/// Source of notes for Sick/Permission transitions.
///
/// `Ok(None)` means the person cancelled the prompt.
pub trait NotePrompt {
    /// Asks for a note for `request`.
    fn ask_note(
        &mut self,
        request: &NoteRequest,
    ) -> impl Future<Output = Result<Option<String>>> + Send;
}

/// Attendance of one roster on one date, as edited before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSheet {
    scope: RosterScope,
    date: NaiveDate,
    roster: Vec<RosterEntry>,
    entries: HashMap<i64, AttendanceEntry>,
}

impl AttendanceSheet {
    /// Builds a sheet from an already loaded roster and records.
    ///
    /// Records for other subjects, other dates or entities outside the roster
    /// are ignored. Entities without a record default to Present.
    #[must_use]
    pub fn from_records(
        scope: RosterScope,
        date: NaiveDate,
        roster: Vec<RosterEntry>,
        records: &[attendance_record::Model],
    ) -> Self {
        let subject = scope.subject();
        let stored: HashMap<i64, &attendance_record::Model> = records
            .iter()
            .filter(|r| r.subject == subject && r.date == date)
            .map(|r| (r.subject_id, r))
            .collect();

        let entries = roster
            .iter()
            .map(|entity| {
                let entry = stored.get(&entity.id).map_or_else(AttendanceEntry::default, |r| {
                    AttendanceEntry {
                        status: r.status,
                        note: r.note.clone(),
                    }
                });
                (entity.id, entry)
            })
            .collect();

        Self {
            scope,
            date,
            roster,
            entries,
        }
    }

    /// Roster the sheet covers.
    #[must_use]
    pub const fn scope(&self) -> RosterScope {
        self.scope
    }

    /// Date the sheet is for.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Entities on the sheet, in roster order.
    #[must_use]
    pub fn roster(&self) -> &[RosterEntry] {
        &self.roster
    }

    /// Number of entities on the sheet.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the roster was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current entry of an entity.
    #[must_use]
    pub fn entry(&self, entity_id: i64) -> Option<&AttendanceEntry> {
        self.entries.get(&entity_id)
    }

    /// Lookup structure from entity id to entry.
    #[must_use]
    pub const fn entries(&self) -> &HashMap<i64, AttendanceEntry> {
        &self.entries
    }

    /// Finds the only roster entity with this case-insensitive name.
    /// `None` when nobody or more than one entity has the name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&RosterEntry> {
        let wanted = name.trim().to_lowercase();
        let mut matches = self
            .roster
            .iter()
            .filter(|entity| entity.name.to_lowercase() == wanted);
        let first = matches.next()?;
        matches.next().is_none().then_some(first)
    }

    /// Finds a roster entity from a command argument: its id, as autocomplete
    /// sends it, or else a unique name.
    #[must_use]
    pub fn resolve(&self, input: &str) -> Option<&RosterEntry> {
        let input = input.trim();
        input
            .parse::<i64>()
            .ok()
            .and_then(|id| self.roster.iter().find(|entity| entity.id == id))
            .or_else(|| self.find_by_name(input))
    }

    /// Status counts over the whole sheet.
    #[must_use]
    pub fn counts(&self) -> StatusCounts {
        self.entries.values().map(|entry| entry.status).collect()
    }

    /// Returns the note prompt a move to `status` needs, if any.
    pub fn note_request(
        &self,
        entity_id: i64,
        status: AttendanceStatus,
    ) -> Result<Option<NoteRequest>> {
        let entry = self
            .entries
            .get(&entity_id)
            .ok_or(Error::NotInRoster { id: entity_id })?;

        Ok(status.requires_note().then(|| NoteRequest {
            entity_id,
            status,
            default_note: entry.note.clone(),
        }))
    }

    /// Applies a status change with the prompt's answer.
    ///
    /// For Sick and Permission a `None` answer means the prompt was cancelled:
    /// the sheet is left untouched and `false` is returned. Present and Absent
    /// ignore the answer and clear the note.
    pub fn apply(
        &mut self,
        entity_id: i64,
        status: AttendanceStatus,
        answer: Option<String>,
    ) -> Result<bool> {
        let entry = self
            .entries
            .get_mut(&entity_id)
            .ok_or(Error::NotInRoster { id: entity_id })?;

        if status.requires_note() {
            let Some(note) = answer else {
                debug!(entity_id, %status, "Note prompt cancelled, keeping previous entry");
                return Ok(false);
            };
            *entry = AttendanceEntry {
                status,
                note: note.trim().to_string(),
            };
        } else {
            *entry = AttendanceEntry::new(status);
        }

        Ok(true)
    }

    /// Moves an entity to `status`, asking `prompt` for a note when needed.
    /// Returns whether the sheet changed.
    pub async fn transition<P>(
        &mut self,
        entity_id: i64,
        status: AttendanceStatus,
        prompt: &mut P,
    ) -> Result<bool>
    where
        P: NotePrompt + Send,
    {
        let answer = match self.note_request(entity_id, status)? {
            Some(request) => prompt.ask_note(&request).await?,
            None => None,
        };
        self.apply(entity_id, status, answer)
    }
}

/// All records of one subject kind on exactly `date`.
pub async fn records_for_date(
    db: &DatabaseConnection,
    subject: AttendanceSubject,
    date: NaiveDate,
) -> Result<Vec<attendance_record::Model>> {
    AttendanceRecord::find()
        .filter(attendance_record::Column::Subject.eq(subject))
        .filter(attendance_record::Column::Date.eq(date))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Loads the roster for `scope` and its records on `date` and builds the sheet.
///
/// Either fetch failing returns the error; no partial sheet is produced.
pub async fn build_sheet(
    db: &DatabaseConnection,
    scope: RosterScope,
    date: NaiveDate,
) -> Result<AttendanceSheet> {
    let roster = roster::load_roster(db, scope).await?;
    let ids: Vec<i64> = roster.iter().map(|entity| entity.id).collect();

    let records = AttendanceRecord::find()
        .filter(attendance_record::Column::Subject.eq(scope.subject()))
        .filter(attendance_record::Column::Date.eq(date))
        .filter(attendance_record::Column::SubjectId.is_in(ids))
        .all(db)
        .await?;

    Ok(AttendanceSheet::from_records(scope, date, roster, &records))
}

/// Persists the sheet as the authoritative records for its date.
///
/// Every roster entity gets exactly one record, written in a single
/// `INSERT ... ON CONFLICT (subject, subject_id, date) DO UPDATE` statement, so
/// a failure leaves the previous records in place. Submitting the same sheet
/// twice yields the same end state. Returns the number of rows written.
pub async fn submit_sheet(db: &DatabaseConnection, sheet: &AttendanceSheet) -> Result<u64> {
    let subject = sheet.scope.subject();

    let mut missing = Vec::new();
    let mut models = Vec::with_capacity(sheet.roster.len());
    for entity in &sheet.roster {
        let Some(entry) = sheet.entries.get(&entity.id) else {
            missing.push(entity.id);
            continue;
        };
        models.push(attendance_record::ActiveModel {
            subject: Set(subject),
            subject_id: Set(entity.id),
            date: Set(sheet.date),
            status: Set(entry.status),
            note: Set(if entry.status.requires_note() {
                entry.note.clone()
            } else {
                String::new()
            }),
            ..Default::default()
        });
    }

    if !missing.is_empty() {
        return Err(Error::IncompleteSheet { missing });
    }
    if models.is_empty() {
        debug!(date = %sheet.date, "Empty roster, nothing to submit");
        return Ok(0);
    }

    let written = AttendanceRecord::insert_many(models)
        .on_conflict(
            OnConflict::columns([
                attendance_record::Column::Subject,
                attendance_record::Column::SubjectId,
                attendance_record::Column::Date,
            ])
            .update_columns([
                attendance_record::Column::Status,
                attendance_record::Column::Note,
            ])
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    info!(
        ?subject,
        date = %sheet.date,
        entities = sheet.roster.len(),
        written,
        "Submitted attendance"
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::ConnectionTrait;

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn entry(id: i64, name: &str) -> RosterEntry {
        RosterEntry {
            id,
            name: name.to_string(),
            code: format!("{id:04}"),
            detail: None,
        }
    }

    fn record(
        subject_id: i64,
        date: NaiveDate,
        status: AttendanceStatus,
        note: &str,
    ) -> attendance_record::Model {
        attendance_record::Model {
            id: subject_id * 100,
            subject: AttendanceSubject::Student,
            subject_id,
            date,
            status,
            note: note.to_string(),
        }
    }

    async fn stored_records(
        db: &DatabaseConnection,
    ) -> Result<Vec<(i64, AttendanceStatus, String)>> {
        let mut rows: Vec<_> = AttendanceRecord::find()
            .all(db)
            .await?
            .into_iter()
            .map(|r| (r.subject_id, r.status, r.note))
            .collect();
        rows.sort_by_key(|(id, _, _)| *id);
        Ok(rows)
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-05-01").unwrap(), may_first());
        assert!(matches!(
            parse_date("01/05/2024"),
            Err(Error::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_default_sheet_is_present_with_empty_note() {
        let sheet = AttendanceSheet::from_records(
            RosterScope::Class(1),
            may_first(),
            vec![entry(1, "Ani")],
            &[],
        );

        assert_eq!(sheet.len(), 1);
        assert_eq!(
            sheet.entry(1),
            Some(&AttendanceEntry {
                status: AttendanceStatus::Present,
                note: String::new(),
            })
        );
    }

    #[test]
    fn test_sheet_has_one_entry_per_roster_entity_only() {
        let roster = vec![entry(1, "Ani"), entry(2, "Budi"), entry(3, "Citra")];
        let records = vec![
            record(2, may_first(), AttendanceStatus::Sick, "demam"),
            // not on the roster
            record(9, may_first(), AttendanceStatus::Absent, ""),
            // other date
            record(3, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), AttendanceStatus::Absent, ""),
        ];

        let sheet =
            AttendanceSheet::from_records(RosterScope::Class(1), may_first(), roster, &records);

        assert_eq!(sheet.len(), 3);
        assert!(sheet.entry(9).is_none());
        assert_eq!(sheet.entry(2).unwrap().status, AttendanceStatus::Sick);
        assert_eq!(sheet.entry(2).unwrap().note, "demam");
        assert_eq!(sheet.entry(3).unwrap().status, AttendanceStatus::Present);
    }

    #[test]
    fn test_sheet_ignores_records_of_other_subject() {
        let mut teacher_record = record(1, may_first(), AttendanceStatus::Absent, "");
        teacher_record.subject = AttendanceSubject::Teacher;

        let sheet = AttendanceSheet::from_records(
            RosterScope::Class(1),
            may_first(),
            vec![entry(1, "Ani")],
            &[teacher_record],
        );
        assert_eq!(sheet.entry(1).unwrap().status, AttendanceStatus::Present);
    }

    #[tokio::test]
    async fn test_cancelled_permission_prompt_leaves_sheet_unchanged() -> Result<()> {
        let mut sheet = AttendanceSheet::from_records(
            RosterScope::Class(1),
            may_first(),
            vec![entry(1, "Ani")],
            &[record(1, may_first(), AttendanceStatus::Sick, "flu")],
        );
        let before = sheet.clone();
        let mut prompt = ScriptedPrompt::new([None]);

        let changed = sheet
            .transition(1, AttendanceStatus::Permission, &mut prompt)
            .await?;

        assert!(!changed);
        assert_eq!(sheet, before);
        assert_eq!(prompt.asked.len(), 1);
        assert_eq!(prompt.asked[0].default_note, "flu");

        Ok(())
    }

    #[tokio::test]
    async fn test_sick_transition_records_note() -> Result<()> {
        let mut sheet = AttendanceSheet::from_records(
            RosterScope::Class(1),
            may_first(),
            vec![entry(1, "Ani")],
            &[],
        );
        let mut prompt = ScriptedPrompt::new([Some(" flu ".to_string())]);

        assert!(sheet.transition(1, AttendanceStatus::Sick, &mut prompt).await?);
        assert_eq!(
            sheet.entry(1),
            Some(&AttendanceEntry {
                status: AttendanceStatus::Sick,
                note: "flu".to_string(),
            })
        );
        assert_eq!(prompt.asked[0].default_note, "");

        Ok(())
    }

    #[tokio::test]
    async fn test_present_and_absent_clear_note_without_prompt() -> Result<()> {
        let mut sheet = AttendanceSheet::from_records(
            RosterScope::Class(1),
            may_first(),
            vec![entry(1, "Ani")],
            &[record(1, may_first(), AttendanceStatus::Permission, "acara keluarga")],
        );
        let mut prompt = ScriptedPrompt::default();

        assert!(sheet.transition(1, AttendanceStatus::Absent, &mut prompt).await?);
        assert_eq!(sheet.entry(1), Some(&AttendanceEntry::new(AttendanceStatus::Absent)));
        assert!(prompt.asked.is_empty());

        Ok(())
    }

    #[test]
    fn test_transition_for_unknown_entity() {
        let mut sheet = AttendanceSheet::from_records(
            RosterScope::Teachers,
            may_first(),
            vec![entry(1, "Siti")],
            &[],
        );
        let result = sheet.apply(5, AttendanceStatus::Absent, None);
        assert!(matches!(result, Err(Error::NotInRoster { id: 5 })));
    }

    #[test]
    fn test_find_by_name_and_counts() {
        let mut sheet = AttendanceSheet::from_records(
            RosterScope::Class(1),
            may_first(),
            vec![entry(1, "Ani"), entry(2, "Budi")],
            &[],
        );
        sheet.apply(2, AttendanceStatus::Absent, None).unwrap();

        assert_eq!(sheet.find_by_name("  budi ").map(|e| e.id), Some(2));
        assert!(sheet.find_by_name("Bud").is_none());

        let counts = sheet.counts();
        assert_eq!(counts.present, 1);
        assert_eq!(counts.absent, 1);
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn test_same_name_entities_resolve_by_id() {
        let mut sheet = AttendanceSheet::from_records(
            RosterScope::Class(1),
            may_first(),
            vec![entry(1, "Ani"), entry(2, "Ani"), entry(3, "Budi")],
            &[],
        );

        assert!(sheet.find_by_name("Ani").is_none());
        assert_eq!(sheet.resolve("2").map(|e| e.id), Some(2));
        assert_eq!(sheet.resolve(" 1 ").map(|e| e.id), Some(1));
        assert_eq!(sheet.resolve("budi").map(|e| e.id), Some(3));
        assert!(sheet.resolve("99").is_none());

        let second = sheet.resolve("2").unwrap().id;
        sheet.apply(second, AttendanceStatus::Absent, None).unwrap();
        assert_eq!(sheet.entry(1).unwrap().status, AttendanceStatus::Present);
        assert_eq!(sheet.entry(2).unwrap().status, AttendanceStatus::Absent);
    }

    #[tokio::test]
    async fn test_build_default_sheet_for_new_date() -> Result<()> {
        let db = setup_test_db().await?;
        let class = create_test_class(&db, "TK A1").await?;
        let ani = create_test_student(&db, "Ani", class.id).await?;

        let sheet = build_sheet(&db, RosterScope::Class(class.id), may_first()).await?;

        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.entry(ani.id), Some(&AttendanceEntry::default()));

        Ok(())
    }

    #[tokio::test]
    async fn test_submit_then_rebuild_round_trips() -> Result<()> {
        let db = setup_test_db().await?;
        let class = create_test_class(&db, "TK A1").await?;
        let ani = create_test_student(&db, "Ani", class.id).await?;

        let mut sheet = build_sheet(&db, RosterScope::Class(class.id), may_first()).await?;
        sheet.apply(ani.id, AttendanceStatus::Sick, Some("flu".to_string()))?;
        submit_sheet(&db, &sheet).await?;

        let rebuilt = build_sheet(&db, RosterScope::Class(class.id), may_first()).await?;
        assert_eq!(
            rebuilt.entry(ani.id),
            Some(&AttendanceEntry {
                status: AttendanceStatus::Sick,
                note: "flu".to_string(),
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_submit_twice_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let class = create_test_class(&db, "TK A1").await?;
        let ani = create_test_student(&db, "Ani", class.id).await?;
        let budi = create_test_student(&db, "Budi", class.id).await?;

        let mut sheet = build_sheet(&db, RosterScope::Class(class.id), may_first()).await?;
        sheet.apply(budi.id, AttendanceStatus::Absent, None)?;

        submit_sheet(&db, &sheet).await?;
        let once = stored_records(&db).await?;
        submit_sheet(&db, &sheet).await?;
        let twice = stored_records(&db).await?;

        assert_eq!(once, twice);
        assert_eq!(twice.len(), 2);
        assert!(twice.contains(&(ani.id, AttendanceStatus::Present, String::new())));
        assert!(twice.contains(&(budi.id, AttendanceStatus::Absent, String::new())));

        Ok(())
    }

    #[tokio::test]
    async fn test_resubmission_replaces_previous_status() -> Result<()> {
        let db = setup_test_db().await?;
        let class = create_test_class(&db, "TK A1").await?;
        let ani = create_test_student(&db, "Ani", class.id).await?;

        let mut sheet = build_sheet(&db, RosterScope::Class(class.id), may_first()).await?;
        sheet.apply(ani.id, AttendanceStatus::Permission, Some("lomba".to_string()))?;
        submit_sheet(&db, &sheet).await?;

        let mut sheet = build_sheet(&db, RosterScope::Class(class.id), may_first()).await?;
        sheet.apply(ani.id, AttendanceStatus::Present, None)?;
        submit_sheet(&db, &sheet).await?;

        let stored = stored_records(&db).await?;
        assert_eq!(stored, vec![(ani.id, AttendanceStatus::Present, String::new())]);

        Ok(())
    }

    #[tokio::test]
    async fn test_submit_leaves_other_dates_and_classes_alone() -> Result<()> {
        let db = setup_test_db().await?;
        let a1 = create_test_class(&db, "TK A1").await?;
        let b1 = create_test_class(&db, "TK B1").await?;
        let ani = create_test_student(&db, "Ani", a1.id).await?;
        let dani = create_test_student(&db, "Dani", b1.id).await?;
        let may_second = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        insert_test_record(
            &db,
            AttendanceSubject::Student,
            ani.id,
            may_second,
            AttendanceStatus::Sick,
        )
        .await?;
        insert_test_record(
            &db,
            AttendanceSubject::Student,
            dani.id,
            may_first(),
            AttendanceStatus::Absent,
        )
        .await?;

        let sheet = build_sheet(&db, RosterScope::Class(a1.id), may_first()).await?;
        submit_sheet(&db, &sheet).await?;

        let all = AttendanceRecord::find().all(&db).await?;
        assert_eq!(all.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_teacher_sheet_uses_teacher_subject() -> Result<()> {
        let db = setup_test_db().await?;
        let siti = create_test_teacher(&db, "Siti").await?;

        let mut sheet = build_sheet(&db, RosterScope::Teachers, may_first()).await?;
        sheet.apply(siti.id, AttendanceStatus::Sick, Some("batuk".to_string()))?;
        assert_eq!(submit_sheet(&db, &sheet).await?, 1);

        let stored = records_for_date(&db, AttendanceSubject::Teacher, may_first()).await?;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].note, "batuk");
        assert!(
            records_for_date(&db, AttendanceSubject::Student, may_first())
                .await?
                .is_empty()
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_submit_empty_roster_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let class = create_test_class(&db, "TK A1").await?;

        let sheet = build_sheet(&db, RosterScope::Class(class.id), may_first()).await?;
        assert!(sheet.is_empty());
        assert_eq!(submit_sheet(&db, &sheet).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_build_sheet_for_missing_class_fails() -> Result<()> {
        let db = setup_test_db().await?;
        let result = build_sheet(&db, RosterScope::Class(404), may_first()).await;
        assert!(matches!(result, Err(Error::ClassNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_aborted_submit_keeps_previous_records() -> Result<()> {
        let db = setup_test_db().await?;
        let class = create_test_class(&db, "TK A1").await?;
        let ani = create_test_student(&db, "Ani", class.id).await?;
        let budi = create_test_student(&db, "Budi", class.id).await?;
        insert_test_record(
            &db,
            AttendanceSubject::Student,
            budi.id,
            may_first(),
            AttendanceStatus::Sick,
        )
        .await?;
        db.execute_unprepared(
            "CREATE TRIGGER reject_update BEFORE UPDATE ON attendance_records \
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .await?;

        let mut sheet = build_sheet(&db, RosterScope::Class(class.id), may_first()).await?;
        sheet.apply(budi.id, AttendanceStatus::Absent, None)?;
        let result = submit_sheet(&db, &sheet).await;

        assert!(matches!(result, Err(Error::Database(_))));
        // Ani's new row is rolled back along with Budi's update
        let stored = stored_records(&db).await?;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].0, budi.id);
        assert_eq!(stored[0].1, AttendanceStatus::Sick);
        assert!(stored.iter().all(|(id, _, _)| *id != ani.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_error() -> Result<()> {
        let db = setup_test_db().await?;
        let class = create_test_class(&db, "TK A1").await?;
        create_test_student(&db, "Ani", class.id).await?;
        let sheet = build_sheet(&db, RosterScope::Class(class.id), may_first()).await?;

        db.execute_unprepared("DROP TABLE attendance_records").await?;

        assert!(matches!(submit_sheet(&db, &sheet).await, Err(Error::Database(_))));
        assert!(matches!(
            build_sheet(&db, RosterScope::Class(class.id), may_first()).await,
            Err(Error::Database(_))
        ));

        Ok(())
    }
}
