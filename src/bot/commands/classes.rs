//! Class Discord commands - `class_manage` and its subcommands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::class_room::{self, ClassDetails},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    async fn find_class(
        ctx: poise::Context<'_, BotData, Error>,
        name: &str,
    ) -> Result<Option<crate::entities::ClassRoomModel>> {
        let class = class_room::get_class_by_name(&ctx.data().database, name).await?;
        if class.is_none() {
            ctx.say(format!("❌ Class '{name}' not found.")).await?;
        }
        Ok(class)
    }

    /// Parent command for managing classes.
    #[poise::command(
        slash_command,
        subcommands("class_add", "class_edit", "class_delete", "class_list")
    )]
    pub async fn class_manage(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Class management command. Available subcommands:\n\
            `/class_manage add` - Add a class\n\
            `/class_manage edit` - Edit a class\n\
            `/class_manage delete` - Delete an empty class\n\
            `/class_manage list` - List all classes";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a new class.
    #[poise::command(slash_command, rename = "add")]
    pub async fn class_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Class name (e.g., 'TK A1')"] name: String,
        #[description = "Class teacher (wali kelas)"] teacher_name: Option<String>,
        #[description = "Class teacher NIP"] teacher_nip: Option<String>,
        #[description = "Headmaster name"] headmaster_name: Option<String>,
        #[description = "Headmaster NIP"] headmaster_nip: Option<String>,
    ) -> Result<()> {
        let details = ClassDetails {
            name,
            teacher_name: teacher_name.unwrap_or_default(),
            teacher_nip: teacher_nip.unwrap_or_default(),
            headmaster_name: headmaster_name.unwrap_or_default(),
            headmaster_nip: headmaster_nip.unwrap_or_default(),
        };

        let class = class_room::create_class(&ctx.data().database, details).await?;
        ctx.say(format!("✅ Class '{}' added.", class.name)).await?;
        Ok(())
    }

    /// Edits a class. Only the fields you provide are changed.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn class_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Class to edit"]
        #[autocomplete = "autocomplete::autocomplete_class_name"]
        class: String,
        #[description = "New class name"] new_name: Option<String>,
        #[description = "Class teacher (wali kelas)"] teacher_name: Option<String>,
        #[description = "Class teacher NIP"] teacher_nip: Option<String>,
        #[description = "Headmaster name"] headmaster_name: Option<String>,
        #[description = "Headmaster NIP"] headmaster_nip: Option<String>,
    ) -> Result<()> {
        let Some(existing) = find_class(ctx, &class).await? else {
            return Ok(());
        };

        let details = ClassDetails {
            name: new_name.unwrap_or(existing.name),
            teacher_name: teacher_name.unwrap_or(existing.teacher_name),
            teacher_nip: teacher_nip.unwrap_or(existing.teacher_nip),
            headmaster_name: headmaster_name.unwrap_or(existing.headmaster_name),
            headmaster_nip: headmaster_nip.unwrap_or(existing.headmaster_nip),
        };

        let updated = class_room::update_class(&ctx.data().database, existing.id, details).await?;
        ctx.say(format!("✅ Class '{}' updated.", updated.name)).await?;
        Ok(())
    }

    /// Deletes a class that has no students left.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn class_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Class to delete"]
        #[autocomplete = "autocomplete::autocomplete_class_name"]
        class: String,
    ) -> Result<()> {
        let Some(existing) = find_class(ctx, &class).await? else {
            return Ok(());
        };

        match class_room::delete_class(&ctx.data().database, existing.id).await {
            Ok(deleted) => {
                ctx.say(format!("🗑️ Class '{}' deleted.", deleted.name)).await?;
            }
            Err(Error::ClassNotEmpty { name, students }) => {
                ctx.say(format!(
                    "⚠️ Class '{name}' still has {students} student(s). \
                     Move or delete them first."
                ))
                .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Lists all classes with their teacher and student count.
    #[poise::command(slash_command, rename = "list")]
    pub async fn class_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let classes = class_room::get_all_classes(db).await?;

        if classes.is_empty() {
            ctx.say("No classes yet. Use `/class_manage add` to create one!")
                .await?;
            return Ok(());
        }

        let mut embed_fields = Vec::new();
        for class in classes {
            let students = class_room::count_students_in_class(db, class.id).await?;
            let teacher = if class.teacher_name.is_empty() {
                "-"
            } else {
                class.teacher_name.as_str()
            };
            embed_fields.push((
                class.name.clone(),
                format!("Wali kelas: {teacher}\nSiswa: {students}"),
                true,
            ));
        }

        let list_embed = serenity::CreateEmbed::default()
            .title("**Daftar Kelas**")
            .color(0x0058_65F2)
            .fields(embed_fields);

        ctx.send(poise::CreateReply::default().embed(list_embed))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
