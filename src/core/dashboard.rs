//! Dashboard summary - headline numbers for one day.

use crate::{
    core::{attendance::{self, StatusCounts}, class_room, student},
    entities::{AttendanceRecord, AttendanceStatus, AttendanceSubject, Teacher, attendance_record},
    errors::Result,
};
use chrono::{Datelike, Days, NaiveDate};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use std::collections::HashMap;

/// Number of students assigned to one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPopulation {
    /// Class id
    pub class_id: i64,
    /// Class name
    pub class_name: String,
    /// Students assigned to the class
    pub students: u32,
}

/// Snapshot shown on the dashboard.
///
/// `student_counts` covers records dated exactly [`Self::date`];
/// `class_populations` lists every class, empty ones included, ordered by
/// class name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    /// Day summarised
    pub date: NaiveDate,
    /// Student statuses recorded on that day
    pub student_counts: StatusCounts,
    /// Teachers recorded Present on that day
    pub teachers_present: u32,
    /// Size of the teacher roster
    pub teachers_total: u64,
    /// Per-class student population
    pub class_populations: Vec<ClassPopulation>,
}

impl DashboardSummary {
    /// Number of classes.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.class_populations.len()
    }

    /// Number of students across all classes.
    #[must_use]
    pub fn student_total(&self) -> u32 {
        self.class_populations.iter().map(|class| class.students).sum()
    }
}

/// Present students on one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyPresence {
    /// Day
    pub date: NaiveDate,
    /// Students recorded Present
    pub present: u32,
}

/// Builds the dashboard summary for `date`.
pub async fn today_summary(db: &DatabaseConnection, date: NaiveDate) -> Result<DashboardSummary> {
    let student_counts: StatusCounts =
        attendance::records_for_date(db, AttendanceSubject::Student, date)
            .await?
            .into_iter()
            .map(|record| record.status)
            .collect();

    let teacher_counts: StatusCounts =
        attendance::records_for_date(db, AttendanceSubject::Teacher, date)
            .await?
            .into_iter()
            .map(|record| record.status)
            .collect();
    let teachers_total = Teacher::find().count(db).await?;

    let mut per_class: HashMap<i64, u32> = HashMap::new();
    for student in student::get_all_students(db).await? {
        *per_class.entry(student.class_id).or_default() += 1;
    }
    let class_populations = class_room::get_all_classes(db)
        .await?
        .into_iter()
        .map(|class| ClassPopulation {
            students: per_class.get(&class.id).copied().unwrap_or(0),
            class_id: class.id,
            class_name: class.name,
        })
        .collect();

    Ok(DashboardSummary {
        date,
        student_counts,
        teachers_present: teacher_counts.present,
        teachers_total,
        class_populations,
    })
}

/// Monday of the week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Present-student counts for Monday to Friday of the week containing `date`.
pub async fn weekly_trend(db: &DatabaseConnection, date: NaiveDate) -> Result<Vec<DailyPresence>> {
    let monday = week_start(date);
    let days: Vec<NaiveDate> = monday.iter_days().take(5).collect();
    let friday = days.last().copied().unwrap_or(monday);

    let records = AttendanceRecord::find()
        .filter(attendance_record::Column::Subject.eq(AttendanceSubject::Student))
        .filter(attendance_record::Column::Status.eq(AttendanceStatus::Present))
        .filter(attendance_record::Column::Date.between(monday, friday))
        .all(db)
        .await?;

    // A single day never holds more than u32::MAX records.
    #[allow(clippy::cast_possible_truncation)]
    let trend = days
        .into_iter()
        .map(|day| DailyPresence {
            date: day,
            present: records.iter().filter(|r| r.date == day).count() as u32,
        })
        .collect();
    Ok(trend)
}
