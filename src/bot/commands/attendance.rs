//! Attendance Discord commands - `attendance` and its subcommands.
//!
//! Each staff member edits one sheet at a time. `/attendance open` (or
//! `teachers`) builds it from the store, `mark` changes one entry, `save`
//! writes the whole sheet back. Marking someone Sakit or Izin opens a modal
//! for the note, pre-filled with the previous note; dismissing the modal keeps
//! the entry as it was.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData, EMBED_DESCRIPTION_LIMIT, OpenSheet, SheetUpdate, clip_lines,
            handlers::autocomplete,
        },
        core::{
            attendance::{self, NotePrompt, NoteRequest},
            class_room,
            roster::RosterScope,
        },
        entities::AttendanceStatus,
        errors::{Error, Result},
    };
    use chrono::{NaiveDate, Utc};
    use poise::{Modal, serenity_prelude as serenity};

    /// Status picked from the slash command menu.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum StatusChoice {
        #[name = "Hadir"]
        Present,
        #[name = "Sakit"]
        Sick,
        #[name = "Izin"]
        Permission,
        #[name = "Alfa"]
        Absent,
    }

    impl From<StatusChoice> for AttendanceStatus {
        fn from(choice: StatusChoice) -> Self {
            match choice {
                StatusChoice::Present => Self::Present,
                StatusChoice::Sick => Self::Sick,
                StatusChoice::Permission => Self::Permission,
                StatusChoice::Absent => Self::Absent,
            }
        }
    }

    #[derive(Debug, Modal)]
    #[name = "Keterangan"]
    struct NoteModal {
        #[name = "Keterangan"]
        #[placeholder = "Contoh: demam, acara keluarga"]
        #[max_length = 200]
        note: Option<String>,
    }

    /// Asks for the note through a Discord modal.
    struct ModalPrompt<'a> {
        ctx: poise::ApplicationContext<'a, BotData, Error>,
    }

    impl NotePrompt for ModalPrompt<'_> {
        async fn ask_note(&mut self, request: &NoteRequest) -> Result<Option<String>> {
            let defaults = NoteModal {
                note: (!request.default_note.is_empty()).then(|| request.default_note.clone()),
            };
            // `None` when the modal times out or is dismissed
            let answer = NoteModal::execute_with_defaults(self.ctx, defaults).await?;
            Ok(answer.map(|modal| modal.note.unwrap_or_default()))
        }
    }

    fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
        date.map_or_else(|| Ok(Utc::now().date_naive()), attendance::parse_date)
    }

    fn entry_line(number: usize, name: &str, status: AttendanceStatus, note: &str) -> String {
        if note.is_empty() {
            format!("`{number:>2}.` {name} · **{status}**")
        } else {
            format!("`{number:>2}.` {name} · **{status}** ({note})")
        }
    }

    fn sheet_embed(open: &OpenSheet) -> serenity::CreateEmbed {
        let sheet = &open.sheet;
        let lines: Vec<String> = sheet
            .roster()
            .iter()
            .enumerate()
            .filter_map(|(index, entity)| {
                sheet
                    .entry(entity.id)
                    .map(|entry| entry_line(index + 1, &entity.name, entry.status, &entry.note))
            })
            .collect();

        let description = if lines.is_empty() {
            "Nobody on this roster.".to_string()
        } else {
            clip_lines(&lines, EMBED_DESCRIPTION_LIMIT)
        };
        let counts = sheet.counts();
        let footer = AttendanceStatus::ALL
            .iter()
            .map(|status| format!("{} {}", status.abbreviation(), counts.get(*status)))
            .collect::<Vec<_>>()
            .join(" · ");

        serenity::CreateEmbed::default()
            .title(format!("**Absensi {}**", open.label))
            .color(0x0058_65F2)
            .description(description)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{footer} · Not saved until /attendance save"
            )))
    }

    async fn open_sheet(
        ctx: poise::Context<'_, BotData, Error>,
        scope: RosterScope,
        label: String,
        date: NaiveDate,
    ) -> Result<()> {
        let open = ctx
            .data()
            .open_sheet(ctx.author().id, scope, label, date)
            .await?;

        ctx.send(poise::CreateReply::default().embed(sheet_embed(&open)))
            .await?;
        Ok(())
    }

    /// Parent command for taking daily attendance.
    #[poise::command(
        slash_command,
        subcommands(
            "attendance_open",
            "attendance_teachers",
            "attendance_mark",
            "attendance_show",
            "attendance_save",
            "attendance_discard"
        )
    )]
    pub async fn attendance(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Attendance command. Available subcommands:\n\
            `/attendance open` - Open a class sheet\n\
            `/attendance teachers` - Open the teacher sheet\n\
            `/attendance mark` - Change one entry\n\
            `/attendance show` - Show your open sheet\n\
            `/attendance save` - Save your open sheet\n\
            `/attendance discard` - Close your sheet without saving";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Opens the student attendance sheet of a class.
    #[poise::command(slash_command, rename = "open")]
    pub async fn attendance_open(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Class"]
        #[autocomplete = "autocomplete::autocomplete_class_name"]
        class: String,
        #[description = "Date as YYYY-MM-DD (defaults to today)"] date: Option<String>,
    ) -> Result<()> {
        let date = resolve_date(date.as_deref())?;
        let Some(class) = class_room::get_class_by_name(&ctx.data().database, &class).await?
        else {
            ctx.say(format!("❌ Class '{class}' not found.")).await?;
            return Ok(());
        };

        let label = format!("{} · {date}", class.name);
        open_sheet(ctx, RosterScope::Class(class.id), label, date).await
    }

    /// Opens the teacher attendance sheet.
    #[poise::command(slash_command, rename = "teachers")]
    pub async fn attendance_teachers(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Date as YYYY-MM-DD (defaults to today)"] date: Option<String>,
    ) -> Result<()> {
        let date = resolve_date(date.as_deref())?;
        open_sheet(ctx, RosterScope::Teachers, format!("Guru · {date}"), date).await
    }

    /// Changes the status of one person on your open sheet.
    #[poise::command(slash_command, rename = "mark")]
    pub async fn attendance_mark(
        ctx: poise::ApplicationContext<'_, BotData, Error>,
        #[description = "Student or teacher on the sheet"]
        #[autocomplete = "autocomplete::autocomplete_sheet_entry"]
        name: String,
        #[description = "New status"] status: StatusChoice,
    ) -> Result<()> {
        let generic = poise::Context::Application(ctx);
        let data = generic.data();
        let user = generic.author().id;
        let status = AttendanceStatus::from(status);

        let Some(open) = data.sheet(user).await else {
            generic
                .say("❌ No open sheet. Use `/attendance open` or `/attendance teachers` first.")
                .await?;
            return Ok(());
        };

        let Some(entity) = open.sheet.resolve(&name).cloned() else {
            generic
                .say(format!(
                    "❌ '{name}' is not on your open sheet, or matches more than one person. \
                     Pick from the suggestions."
                ))
                .await?;
            return Ok(());
        };

        // The sheet stays in place while the modal is open
        let answer = match open.sheet.note_request(entity.id, status)? {
            Some(request) => ModalPrompt { ctx }.ask_note(&request).await?,
            None => None,
        };
        let update = data
            .apply_to_sheet(user, open.generation, entity.id, status, answer)
            .await?;

        let reply = match update {
            SheetUpdate::Applied(entry) if entry.note.is_empty() => {
                format!("✅ {} → **{status}**", entity.name)
            }
            SheetUpdate::Applied(entry) => {
                format!("✅ {} → **{status}** ({})", entity.name, entry.note)
            }
            SheetUpdate::Cancelled => format!("↩️ Cancelled, {} is unchanged.", entity.name),
            SheetUpdate::Stale => format!(
                "⚠️ Your sheet was replaced or closed meanwhile, {} was not changed.",
                entity.name
            ),
        };
        generic.say(reply).await?;
        Ok(())
    }

    /// Shows your open sheet.
    #[poise::command(slash_command, rename = "show")]
    pub async fn attendance_show(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(open) = ctx.data().sheet(ctx.author().id).await else {
            ctx.say("No open sheet.").await?;
            return Ok(());
        };

        ctx.send(poise::CreateReply::default().embed(sheet_embed(&open)))
            .await?;
        Ok(())
    }

    /// Saves your open sheet. The sheet stays open for further changes.
    #[poise::command(slash_command, rename = "save")]
    pub async fn attendance_save(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let Some(open) = data.sheet(ctx.author().id).await else {
            ctx.say("❌ No open sheet to save.").await?;
            return Ok(());
        };

        let written = attendance::submit_sheet(&data.database, &open.sheet).await?;
        ctx.say(format!("💾 Saved {written} record(s) for {}.", open.label))
            .await?;
        Ok(())
    }

    /// Closes your open sheet without saving.
    #[poise::command(slash_command, rename = "discard")]
    pub async fn attendance_discard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        match ctx.data().take_sheet(ctx.author().id).await {
            Some(open) => {
                ctx.say(format!("🗑️ Closed {} without saving.", open.label))
                    .await?;
            }
            None => {
                ctx.say("No open sheet.").await?;
            }
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_status_choice_maps_to_status() {
            assert_eq!(AttendanceStatus::from(StatusChoice::Sick), AttendanceStatus::Sick);
            assert_eq!(AttendanceStatus::from(StatusChoice::Absent), AttendanceStatus::Absent);
        }

        #[test]
        fn test_entry_line_shows_note_only_when_present() {
            assert_eq!(
                entry_line(1, "Ani", AttendanceStatus::Sick, "flu"),
                "` 1.` Ani · **Sakit** (flu)"
            );
            assert_eq!(
                entry_line(12, "Budi", AttendanceStatus::Present, ""),
                "`12.` Budi · **Hadir**"
            );
        }

        #[test]
        fn test_resolve_date_rejects_bad_input() {
            assert!(matches!(resolve_date(Some("kemarin")), Err(Error::InvalidDate { .. })));
            assert!(resolve_date(None).is_ok());
        }
    }
}

// Re-export all commands
pub use inner::*;
