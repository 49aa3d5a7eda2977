//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**AttendanceBuddy Help**\n\
        Here is a summary of all available commands.\n\n\
        **Daily Attendance**\n\
        • `/attendance open <class> [date]` - Opens the student sheet of a class.\n\
        • `/attendance teachers [date]` - Opens the teacher sheet.\n\
        • `/attendance mark <name> <status>` - Sets Hadir, Sakit, Izin or Alfa.\n\
          Sakit and Izin ask for a note.\n\
        • `/attendance show` - Shows your open sheet.\n\
        • `/attendance save` - Saves your open sheet.\n\
        • `/attendance discard` - Closes your open sheet without saving.\n\n\
        **Reports**\n\
        • `/dashboard [date]` - Today's numbers and this week's trend.\n\
        • `/recap <class> [month]` - Monthly class report (YYYY-MM), printable.\n\
        • `/teacher_recap [month]` - Monthly teacher attendance.\n\n\
        **Management Commands**\n\
        • `/class_manage <subcommand>` - Manage classes (add, edit, delete, list).\n\
        • `/student_manage <subcommand>` - Manage students (add, edit, delete, list).\n\
        • `/teacher_manage <subcommand>` - Manage teachers (add, edit, delete, list).\n\
        • `/settings <subcommand>` - Show or change the school name.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
