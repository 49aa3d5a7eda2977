//! Teacher Discord commands - `teacher_manage` and its subcommands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, EMBED_DESCRIPTION_LIMIT, clip_lines},
        core::teacher::{self, TeacherDetails},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Parent command for managing teachers.
    #[poise::command(
        slash_command,
        subcommands("teacher_add", "teacher_edit", "teacher_delete", "teacher_list")
    )]
    pub async fn teacher_manage(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Teacher management command. Available subcommands:\n\
            `/teacher_manage add` - Add a teacher\n\
            `/teacher_manage edit` - Edit a teacher by id\n\
            `/teacher_manage delete` - Delete a teacher and their attendance history\n\
            `/teacher_manage list` - List all teachers";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a teacher.
    #[poise::command(slash_command, rename = "add")]
    pub async fn teacher_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Staff number (NIP)"] nip: String,
        #[description = "Full name"] name: String,
        #[description = "Position (e.g., 'Guru Kelas')"] role: Option<String>,
    ) -> Result<()> {
        let created = teacher::create_teacher(
            &ctx.data().database,
            TeacherDetails {
                nip,
                name,
                role: role.unwrap_or_default(),
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Teacher '{}' (NIP {}) added with id `{}`.",
            created.name, created.nip, created.id
        ))
        .await?;
        Ok(())
    }

    /// Edits a teacher. Only the fields you provide are changed.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn teacher_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Teacher id (see /teacher_manage list)"] id: i64,
        #[description = "New NIP"] nip: Option<String>,
        #[description = "New name"] name: Option<String>,
        #[description = "New position"] role: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(existing) = teacher::get_teacher_by_id(db, id).await? else {
            ctx.say(format!("❌ Teacher `{id}` not found.")).await?;
            return Ok(());
        };

        let updated = teacher::update_teacher(
            db,
            id,
            TeacherDetails {
                nip: nip.unwrap_or(existing.nip),
                name: name.unwrap_or(existing.name),
                role: role.unwrap_or(existing.role),
            },
        )
        .await?;

        ctx.say(format!("✅ Teacher '{}' updated.", updated.name)).await?;
        Ok(())
    }

    /// Deletes a teacher together with their attendance history.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn teacher_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Teacher id (see /teacher_manage list)"] id: i64,
    ) -> Result<()> {
        let deleted = teacher::delete_teacher(&ctx.data().database, id).await?;
        ctx.say(format!("🗑️ Teacher '{}' deleted.", deleted.name)).await?;
        Ok(())
    }

    /// Lists all teachers.
    #[poise::command(slash_command, rename = "list")]
    pub async fn teacher_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let teachers = teacher::get_all_teachers(&ctx.data().database).await?;

        if teachers.is_empty() {
            ctx.say("No teachers yet. Use `/teacher_manage add` to create one!")
                .await?;
            return Ok(());
        }

        let lines: Vec<String> = teachers
            .iter()
            .map(|t| {
                let role = if t.role.is_empty() { "-" } else { t.role.as_str() };
                format!("`{}` **{}** · NIP {} · {role}", t.id, t.name, t.nip)
            })
            .collect();

        let list_embed = serenity::CreateEmbed::default()
            .title(format!("**Daftar Guru** ({})", teachers.len()))
            .color(0x0058_65F2)
            .description(clip_lines(&lines, EMBED_DESCRIPTION_LIMIT));

        ctx.send(poise::CreateReply::default().embed(list_embed))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
