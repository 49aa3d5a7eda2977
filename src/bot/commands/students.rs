//! Student Discord commands - `student_manage` and its subcommands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, EMBED_DESCRIPTION_LIMIT, clip_lines, handlers::autocomplete},
        core::{
            class_room,
            student::{self, StudentDetails},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::collections::HashMap;

    /// Parent command for managing students.
    #[poise::command(
        slash_command,
        subcommands("student_add", "student_edit", "student_delete", "student_list")
    )]
    pub async fn student_manage(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Student management command. Available subcommands:\n\
            `/student_manage add` - Add a student to a class\n\
            `/student_manage edit` - Edit a student by id\n\
            `/student_manage delete` - Delete a student and their attendance history\n\
            `/student_manage list` - List or search students";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a student to a class.
    #[poise::command(slash_command, rename = "add")]
    pub async fn student_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Class the student joins"]
        #[autocomplete = "autocomplete::autocomplete_class_name"]
        class: String,
        #[description = "Student number (NIS)"] nis: String,
        #[description = "Full name"] name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(class) = class_room::get_class_by_name(db, &class).await? else {
            ctx.say(format!("❌ Class '{class}' not found.")).await?;
            return Ok(());
        };

        let created = student::create_student(
            db,
            StudentDetails {
                nis,
                name,
                class_id: class.id,
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Student '{}' (NIS {}) added to {} with id `{}`.",
            created.name, created.nis, class.name, created.id
        ))
        .await?;
        Ok(())
    }

    /// Edits a student. Only the fields you provide are changed.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn student_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student id (see /student_manage list)"] id: i64,
        #[description = "New NIS"] nis: Option<String>,
        #[description = "New name"] name: Option<String>,
        #[description = "Move to class"]
        #[autocomplete = "autocomplete::autocomplete_class_name"]
        class: Option<String>,
        #[description = "Whether the student appears on attendance sheets"] active: Option<bool>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let existing = student::require_student(db, id).await?;

        let class_id = match class {
            Some(class_name) => {
                let Some(class) = class_room::get_class_by_name(db, &class_name).await? else {
                    ctx.say(format!("❌ Class '{class_name}' not found.")).await?;
                    return Ok(());
                };
                class.id
            }
            None => existing.class_id,
        };

        let updated = student::edit_student(
            db,
            id,
            StudentDetails {
                nis: nis.unwrap_or(existing.nis),
                name: name.unwrap_or(existing.name),
                class_id,
            },
            active,
        )
        .await?;

        let state = if updated.is_active { "active" } else { "inactive" };
        ctx.say(format!("✅ Student '{}' updated ({state}).", updated.name))
            .await?;
        Ok(())
    }

    /// Deletes a student together with their attendance history.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn student_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student id (see /student_manage list)"] id: i64,
    ) -> Result<()> {
        let deleted = student::delete_student(&ctx.data().database, id).await?;
        ctx.say(format!("🗑️ Student '{}' deleted.", deleted.name)).await?;
        Ok(())
    }

    /// Lists students, optionally filtered by class and a name or NIS search.
    #[poise::command(slash_command, rename = "list")]
    pub async fn student_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only this class"]
        #[autocomplete = "autocomplete::autocomplete_class_name"]
        class: Option<String>,
        #[description = "Name or NIS contains"] search: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let class_id = match &class {
            Some(class_name) => {
                let Some(found) = class_room::get_class_by_name(db, class_name).await? else {
                    ctx.say(format!("❌ Class '{class_name}' not found.")).await?;
                    return Ok(());
                };
                Some(found.id)
            }
            None => None,
        };

        let students =
            student::search_students(db, search.as_deref().unwrap_or_default(), class_id).await?;
        if students.is_empty() {
            ctx.say("No students found.").await?;
            return Ok(());
        }

        let class_names: HashMap<i64, String> = class_room::get_all_classes(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let lines: Vec<String> = students
            .iter()
            .map(|s| {
                let class_name = class_names.get(&s.class_id).map_or("?", String::as_str);
                let inactive = if s.is_active { "" } else { " (nonaktif)" };
                format!(
                    "`{}` **{}** · NIS {} · {class_name}{inactive}",
                    s.id, s.name, s.nis
                )
            })
            .collect();

        let title = class.map_or_else(
            || format!("**Daftar Siswa** ({})", students.len()),
            |name| format!("**Daftar Siswa {name}** ({})", students.len()),
        );
        let list_embed = serenity::CreateEmbed::default()
            .title(title)
            .color(0x0058_65F2)
            .description(clip_lines(&lines, EMBED_DESCRIPTION_LIMIT));

        ctx.send(poise::CreateReply::default().embed(list_embed))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
