//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the attendance service,
//! including all slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (classes, students, teachers, attendance, reports)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::school::Config,
    core::{
        attendance::{self, AttendanceEntry, AttendanceSheet},
        roster::RosterScope,
    },
    entities::AttendanceStatus,
    errors::{Error, Result},
};
use chrono::NaiveDate;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

/// An attendance sheet being edited by one staff member.
#[derive(Debug, Clone)]
pub struct OpenSheet {
    /// Heading shown above the sheet, e.g. `TK A1 · 2024-05-06`
    pub label: String,
    /// The sheet itself
    pub sheet: AttendanceSheet,
    /// Changes every time the staff member opens a sheet
    pub generation: u64,
}

/// Result of applying a status change to an open sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetUpdate {
    /// The entry now reads like this
    Applied(AttendanceEntry),
    /// The note prompt was cancelled; nothing changed
    Cancelled,
    /// The sheet was closed or replaced while the prompt was open
    Stale,
}

/// Shared data available to all bot commands.
/// This structure holds the database connection, the loaded configuration and
/// the sheets staff members currently have open.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Configuration loaded at startup
    pub config: Arc<Config>,
    sheets: Mutex<HashMap<serenity::UserId, OpenSheet>>,
    next_generation: AtomicU64,
}

impl BotData {
    /// Creates a new `BotData` with no open sheets.
    #[must_use]
    pub fn new(database: DatabaseConnection, config: Arc<Config>) -> Self {
        Self {
            database,
            config,
            sheets: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(1),
        }
    }

    /// School name used until one is saved in the settings.
    #[must_use]
    pub fn default_school_name(&self) -> &str {
        &self.config.school.default_name
    }

    /// Builds the sheet for `scope` on `date` and makes it the open sheet of
    /// `user`. On failure the previously open sheet is kept.
    pub async fn open_sheet(
        &self,
        user: serenity::UserId,
        scope: RosterScope,
        label: String,
        date: NaiveDate,
    ) -> Result<OpenSheet> {
        let sheet = attendance::build_sheet(&self.database, scope, date).await?;
        let open = OpenSheet {
            label,
            sheet,
            generation: self.next_generation.fetch_add(1, Ordering::Relaxed),
        };
        self.sheets.lock().await.insert(user, open.clone());
        Ok(open)
    }

    /// Applies a status change to the open sheet of `user`, provided it is
    /// still the sheet of `generation`.
    ///
    /// The note prompt runs without the lock held, so the sheet may have been
    /// replaced or closed in the meantime; the change is then dropped.
    pub async fn apply_to_sheet(
        &self,
        user: serenity::UserId,
        generation: u64,
        entity_id: i64,
        status: AttendanceStatus,
        answer: Option<String>,
    ) -> Result<SheetUpdate> {
        let mut sheets = self.sheets.lock().await;
        let Some(open) = sheets
            .get_mut(&user)
            .filter(|open| open.generation == generation)
        else {
            debug!(%user, generation, "Open sheet changed during note prompt");
            return Ok(SheetUpdate::Stale);
        };

        if !open.sheet.apply(entity_id, status, answer)? {
            return Ok(SheetUpdate::Cancelled);
        }
        Ok(open
            .sheet
            .entry(entity_id)
            .cloned()
            .map_or(SheetUpdate::Stale, SheetUpdate::Applied))
    }

    /// Removes and returns the open sheet of `user`.
    pub async fn take_sheet(&self, user: serenity::UserId) -> Option<OpenSheet> {
        self.sheets.lock().await.remove(&user)
    }

    /// Copy of the open sheet of `user`.
    pub async fn sheet(&self, user: serenity::UserId) -> Option<OpenSheet> {
        self.sheets.lock().await.get(&user).cloned()
    }
}

/// Embed descriptions hold at most this many characters
pub const EMBED_DESCRIPTION_LIMIT: usize = 4096;

/// Joins `lines` with newlines, dropping trailing lines that would exceed
/// `max_chars` and noting how many were left out.
#[must_use]
pub fn clip_lines(lines: &[String], max_chars: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for (index, line) in lines.iter().enumerate() {
        let separator = usize::from(index > 0);
        let is_last = index + 1 == lines.len();
        let footer = format!("… {} more", lines.len() - index);
        let reserve = if is_last { 0 } else { footer.chars().count() + 1 };
        let cost = separator + line.chars().count();
        if used + cost + reserve > max_chars {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&footer);
            return out;
        }
        if index > 0 {
            out.push('\n');
        }
        out.push_str(line);
        used += cost;
    }
    out
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the poise framework and runs the Discord client until it stops.
#[instrument(skip_all)]
pub async fn run_bot(
    token: String,
    config: Arc<Config>,
    database: DatabaseConnection,
) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::class_manage(),
                commands::student_manage(),
                commands::teacher_manage(),
                commands::attendance(),
                commands::dashboard(),
                commands::recap(),
                commands::teacher_recap(),
                commands::settings(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(database, config))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::ConnectionTrait;

    async fn setup_bot() -> Result<(BotData, i64, i64)> {
        let db = setup_test_db().await?;
        let class = create_test_class(&db, "TK A1").await?;
        let ani = create_test_student(&db, "Ani", class.id).await?;
        Ok((BotData::new(db, Arc::new(Config::default())), class.id, ani.id))
    }

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[tokio::test]
    async fn test_failed_open_keeps_previous_sheet() -> Result<()> {
        let (data, class_id, ani_id) = setup_bot().await?;
        let user = serenity::UserId::new(7);
        let scope = RosterScope::Class(class_id);
        let first = data.open_sheet(user, scope, "TK A1".to_string(), may_first()).await?;
        data.apply_to_sheet(user, first.generation, ani_id, AttendanceStatus::Absent, None)
            .await?;

        data.database
            .execute_unprepared("DROP TABLE attendance_records")
            .await?;
        let reopened = data.open_sheet(user, scope, "TK A1".to_string(), may_first()).await;

        assert!(matches!(reopened, Err(Error::Database(_))));
        let kept = data.sheet(user).await.unwrap();
        assert_eq!(kept.generation, first.generation);
        assert_eq!(kept.sheet.entry(ani_id).unwrap().status, AttendanceStatus::Absent);

        Ok(())
    }

    #[tokio::test]
    async fn test_change_for_replaced_sheet_is_dropped() -> Result<()> {
        let (data, class_id, ani_id) = setup_bot().await?;
        let user = serenity::UserId::new(7);
        let scope = RosterScope::Class(class_id);
        let stale = data.open_sheet(user, scope, "TK A1".to_string(), may_first()).await?;
        let current = data.open_sheet(user, scope, "TK A1".to_string(), may_first()).await?;

        let update = data
            .apply_to_sheet(user, stale.generation, ani_id, AttendanceStatus::Absent, None)
            .await?;
        assert_eq!(update, SheetUpdate::Stale);
        let open = data.sheet(user).await.unwrap();
        assert_eq!(open.generation, current.generation);
        assert_eq!(open.sheet.entry(ani_id).unwrap().status, AttendanceStatus::Present);

        let update = data
            .apply_to_sheet(
                user,
                current.generation,
                ani_id,
                AttendanceStatus::Sick,
                Some("flu".to_string()),
            )
            .await?;
        assert!(matches!(update, SheetUpdate::Applied(entry) if entry.note == "flu"));

        Ok(())
    }

    #[tokio::test]
    async fn test_cancelled_note_and_closed_sheet() -> Result<()> {
        let (data, class_id, ani_id) = setup_bot().await?;
        let user = serenity::UserId::new(7);
        let open = data
            .open_sheet(user, RosterScope::Class(class_id), "TK A1".to_string(), may_first())
            .await?;

        let update = data
            .apply_to_sheet(user, open.generation, ani_id, AttendanceStatus::Permission, None)
            .await?;
        assert_eq!(update, SheetUpdate::Cancelled);

        data.take_sheet(user).await;
        let update = data
            .apply_to_sheet(user, open.generation, ani_id, AttendanceStatus::Absent, None)
            .await?;
        assert_eq!(update, SheetUpdate::Stale);

        Ok(())
    }

    #[test]
    fn test_clip_lines_keeps_short_lists() {
        let lines = vec!["1. Ani".to_string(), "2. Budi".to_string()];
        assert_eq!(clip_lines(&lines, 100), "1. Ani\n2. Budi");
    }

    #[test]
    fn test_clip_lines_notes_dropped_lines() {
        let lines: Vec<String> = (1..=50).map(|i| format!("{i:02}. Siswa")).collect();
        let clipped = clip_lines(&lines, 60);
        assert!(clipped.chars().count() <= 60);
        assert!(clipped.starts_with("01. Siswa"));
        assert!(clipped.ends_with("more"));
    }
}
