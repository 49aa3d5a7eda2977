//! Settings Discord commands - `settings show` and `settings school_name`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::settings as school_settings,
        errors::{Error, Result},
    };

    /// Parent command for school settings.
    #[poise::command(slash_command, subcommands("settings_show", "settings_school_name"))]
    pub async fn settings(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Settings command. Available subcommands:\n\
            `/settings show` - Show the current settings\n\
            `/settings school_name` - Change the school name";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows the current school settings.
    #[poise::command(slash_command, rename = "show")]
    pub async fn settings_show(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let current =
            school_settings::load_school_settings(&data.database, data.default_school_name())
                .await?;

        let saved = current.updated_at.map_or_else(
            || "never (using the configured default)".to_string(),
            |at| at.format("%Y-%m-%d %H:%M UTC").to_string(),
        );
        ctx.say(format!(
            "🏫 School name: **{}**\nLast saved: {saved}",
            current.school_name
        ))
        .await?;
        Ok(())
    }

    /// Changes the school name printed on reports.
    #[poise::command(slash_command, rename = "school_name")]
    pub async fn settings_school_name(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "New school name"] name: String,
    ) -> Result<()> {
        let saved = school_settings::update_school_name(&ctx.data().database, &name).await?;
        ctx.say(format!("✅ School name set to **{}**.", saved.school_name))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
