//! Monthly class report.
//!
//! [`generate_monthly_report`] gathers everything the printed report shows
//! into a [`MonthlyReport`]. Turning it into a document is the job of a
//! [`ReportRenderer`]; PDF rasterisation happens outside this crate, while
//! [`PlainTextRenderer`] produces a monospaced document with the same layout.

use crate::{
    core::{
        attendance::StatusCounts,
        class_room,
        monthly::{self, YearMonth, month_name_id},
        roster::RosterScope,
        settings,
    },
    entities::AttendanceStatus,
    errors::Result,
};
use chrono::{Datelike, NaiveDate};
use sea_orm::DatabaseConnection;
use std::fmt::Write;

/// Report subtitle under the school name
pub const REPORT_TITLE: &str = "LAPORAN KEHADIRAN SISWA BULANAN";

/// Table header, left to right
pub const TABLE_HEADER: [&str; 8] = ["No", "NIS", "Nama Siswa", "H", "S", "I", "A", "Total"];

const NAME_PLACEHOLDER: &str = "............................";

/// Formats a date the way the report prints it, e.g. `14 Oktober 2026`.
#[must_use]
pub fn format_date_id(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), month_name_id(date.month()), date.year())
}

/// A signature block at the foot of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signatory {
    /// Lines above the signature space
    pub heading: Vec<String>,
    /// Signer's name, may be empty
    pub name: String,
    /// Signer's NIP, may be empty
    pub nip: String,
}

impl Signatory {
    /// `(name)`, or a dotted line to sign over when the name is unknown.
    #[must_use]
    pub fn name_line(&self) -> String {
        if self.name.is_empty() {
            format!("({NAME_PLACEHOLDER})")
        } else {
            format!("({})", self.name)
        }
    }

    /// `NIP: ...`, `-` when unknown.
    #[must_use]
    pub fn nip_line(&self) -> String {
        if self.nip.is_empty() {
            "NIP: -".to_string()
        } else {
            format!("NIP: {}", self.nip)
        }
    }
}

/// One student line of the report table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// 1-based row number
    pub number: usize,
    /// Student NIS
    pub nis: String,
    /// Student name
    pub name: String,
    /// Status counts for the month
    pub counts: StatusCounts,
}

impl ReportRow {
    /// Cell values in [`TABLE_HEADER`] order.
    #[must_use]
    pub fn cells(&self) -> [String; 8] {
        let count = |status| self.counts.get(status).to_string();
        [
            self.number.to_string(),
            self.nis.clone(),
            self.name.clone(),
            count(AttendanceStatus::Present),
            count(AttendanceStatus::Sick),
            count(AttendanceStatus::Permission),
            count(AttendanceStatus::Absent),
            self.counts.total().to_string(),
        ]
    }
}

/// Everything printed on a class's monthly attendance report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyReport {
    /// School name, upper-cased for the letterhead
    pub school_name: String,
    /// Class name
    pub class_name: String,
    /// Reported month
    pub month: YearMonth,
    /// Supervising teacher, `-` when unset
    pub teacher_label: String,
    /// One row per student of the class, ordered by name
    pub rows: Vec<ReportRow>,
    /// Date the report was produced
    pub printed_on: NaiveDate,
    /// Left signature block
    pub headmaster: Signatory,
    /// Right signature block
    pub class_teacher: Signatory,
}

impl MonthlyReport {
    /// `Laporan_Absensi_<class>_<YYYY-MM>.pdf`
    #[must_use]
    pub fn file_name(&self) -> String {
        self.file_name_with_extension("pdf")
    }

    /// Same as [`Self::file_name`] with another extension.
    #[must_use]
    pub fn file_name_with_extension(&self, extension: &str) -> String {
        format!(
            "Laporan_Absensi_{}_{}.{extension}",
            self.class_name, self.month
        )
    }

    /// Metadata lines printed under the letterhead.
    #[must_use]
    pub fn metadata_lines(&self) -> [String; 3] {
        [
            format!("Kelas : {}", self.class_name),
            format!("Bulan : {}", self.month.label_id()),
            format!("Guru  : {}", self.teacher_label),
        ]
    }

    /// `Dicetak pada: <date>`
    #[must_use]
    pub fn printed_on_line(&self) -> String {
        format!("Dicetak pada: {}", format_date_id(self.printed_on))
    }
}

/// Collects the monthly report for one class.
///
/// # Arguments
/// * `db` - Database connection
/// * `class_id` - Class to report on
/// * `month` - Reported month
/// * `printed_on` - Date printed at the foot of the report
/// * `default_school` - School name used when no settings were saved
pub async fn generate_monthly_report(
    db: &DatabaseConnection,
    class_id: i64,
    month: YearMonth,
    printed_on: NaiveDate,
    default_school: &str,
) -> Result<MonthlyReport> {
    let class = class_room::require_class(db, class_id).await?;
    let school = settings::load_school_settings(db, default_school).await?;
    let tallies = monthly::aggregate_month(db, RosterScope::Class(class_id), month).await?;

    let rows = tallies
        .into_iter()
        .enumerate()
        .map(|(index, tally)| ReportRow {
            number: index + 1,
            nis: tally.entry.code,
            name: tally.entry.name,
            counts: tally.counts,
        })
        .collect();

    let teacher_label = if class.teacher_name.is_empty() {
        "-".to_string()
    } else {
        class.teacher_name.clone()
    };

    Ok(MonthlyReport {
        school_name: school.school_name.to_uppercase(),
        class_name: class.name,
        month,
        teacher_label,
        rows,
        printed_on,
        headmaster: Signatory {
            heading: vec!["Mengetahui,".to_string(), "Kepala Sekolah".to_string()],
            name: class.headmaster_name,
            nip: class.headmaster_nip,
        },
        class_teacher: Signatory {
            heading: vec!["Wali Kelas,".to_string()],
            name: class.teacher_name,
            nip: class.teacher_nip,
        },
    })
}

/// Turns a [`MonthlyReport`] into a document.
pub trait ReportRenderer {
    /// File extension of the produced document, without the dot.
    fn extension(&self) -> &'static str;

    /// Renders the report into document bytes.
    fn render(&self, report: &MonthlyReport) -> Result<Vec<u8>>;
}

/// Monospaced text rendering of the report.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl PlainTextRenderer {
    const MIN_WIDTH: usize = 64;

    /// Renders the report as a `String`.
    pub fn render_text(report: &MonthlyReport) -> Result<String> {
        let rows: Vec<[String; 8]> = report.rows.iter().map(ReportRow::cells).collect();

        let mut widths = TABLE_HEADER.map(|cell| cell.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        let separator = widths
            .iter()
            .map(|width| "-".repeat(width + 2))
            .collect::<Vec<_>>()
            .join("+");
        let page_width = separator.chars().count().max(Self::MIN_WIDTH);

        let mut out = String::new();
        writeln!(out, "{:^page_width$}", report.school_name)?;
        writeln!(out, "{REPORT_TITLE:^page_width$}")?;
        writeln!(out)?;
        for line in report.metadata_lines() {
            writeln!(out, "{line}")?;
        }
        writeln!(out)?;

        let header = TABLE_HEADER.map(str::to_string);
        writeln!(out, "{}", Self::table_line(&header, &widths))?;
        writeln!(out, "{separator}")?;
        for row in &rows {
            writeln!(out, "{}", Self::table_line(row, &widths))?;
        }
        writeln!(out)?;

        writeln!(out, "{}", report.printed_on_line())?;
        writeln!(out)?;

        let column = page_width / 2;
        let left = Self::signature_lines(&report.headmaster);
        let right = Self::signature_lines(&report.class_teacher);
        for index in 0..left.len().max(right.len()) {
            let l = left.get(index).map_or("", String::as_str);
            let r = right.get(index).map_or("", String::as_str);
            writeln!(out, "{}", format!("{l:<column$}{r}").trim_end())?;
        }

        Ok(out)
    }

    /// Text columns are left aligned, counts right aligned.
    fn table_line(cells: &[String; 8], widths: &[usize; 8]) -> String {
        cells
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(index, (cell, width))| {
                if index == 1 || index == 2 {
                    format!(" {cell:<width$} ")
                } else {
                    format!(" {cell:>width$} ")
                }
            })
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Heading, blank signing space, name and NIP. Both blocks are padded to
    /// the same heading height so names line up.
    fn signature_lines(signatory: &Signatory) -> Vec<String> {
        const HEADING_LINES: usize = 2;
        const SIGNING_SPACE: usize = 3;

        let mut lines = signatory.heading.clone();
        lines.resize(HEADING_LINES.max(lines.len()) + SIGNING_SPACE, String::new());
        lines.push(signatory.name_line());
        lines.push(signatory.nip_line());
        lines
    }
}

impl ReportRenderer for PlainTextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, report: &MonthlyReport) -> Result<Vec<u8>> {
        Self::render_text(report).map(String::into_bytes)
    }
}
