//! Report Discord commands - `dashboard`, `recap` and `teacher_recap`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            attendance, class_room, dashboard,
            monthly::{self, MonthlyTally, YearMonth},
            report::{self, PlainTextRenderer, ReportRenderer},
            roster::RosterScope,
            settings,
        },
        errors::{Error, Result},
    };
    use chrono::{NaiveDate, Utc};
    use poise::serenity_prelude as serenity;

    /// Rows shown in the recap preview; the attachment has all of them.
    const PREVIEW_ROWS: usize = 20;

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    fn resolve_month(month: Option<&str>) -> Result<YearMonth> {
        month.map_or_else(|| YearMonth::from_date(today()), str::parse)
    }

    fn bar(value: u32, max: u32) -> String {
        const WIDTH: u32 = 10;
        let filled = if max == 0 { 0 } else { value * WIDTH / max };
        format!(
            "{}{}",
            "█".repeat(filled as usize),
            "░".repeat((WIDTH - filled) as usize)
        )
    }

    fn tally_table(tallies: &[MonthlyTally], limit: usize) -> String {
        let mut lines = vec![format!(
            "{:<3} {:<20} {:>3} {:>3} {:>3} {:>3} {:>5}",
            "No", "Nama", "H", "S", "I", "A", "Total"
        )];
        for (index, tally) in tallies.iter().take(limit).enumerate() {
            let name: String = tally.entry.name.chars().take(20).collect();
            let counts = tally.counts;
            lines.push(format!(
                "{:<3} {name:<20} {:>3} {:>3} {:>3} {:>3} {:>5}",
                index + 1,
                counts.present,
                counts.sick,
                counts.permission,
                counts.absent,
                counts.total()
            ));
        }
        if tallies.len() > limit {
            lines.push(format!("… {} more", tallies.len() - limit));
        }
        format!("```\n{}\n```", lines.join("\n"))
    }

    /// Shows today's attendance numbers and this week's trend.
    #[poise::command(slash_command)]
    pub async fn dashboard(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Date as YYYY-MM-DD (defaults to today)"] date: Option<String>,
    ) -> Result<()> {
        let date = date
            .as_deref()
            .map_or_else(|| Ok(today()), attendance::parse_date)?;
        let data = ctx.data();
        let db = &data.database;

        let school = settings::load_school_settings(db, data.default_school_name()).await?;
        let summary = dashboard::today_summary(db, date).await?;
        let trend = dashboard::weekly_trend(db, date).await?;

        let counts = summary.student_counts;
        let students = format!(
            "Hadir: **{}**\nSakit: **{}**\nIzin: **{}**\nAlfa: **{}**",
            counts.present, counts.sick, counts.permission, counts.absent
        );
        let teachers = format!(
            "**{}** / {} hadir",
            summary.teachers_present, summary.teachers_total
        );
        let classes = if summary.class_populations.is_empty() {
            "-".to_string()
        } else {
            summary
                .class_populations
                .iter()
                .map(|class| format!("{}: {} siswa", class.class_name, class.students))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let max_present = trend.iter().map(|day| day.present).max().unwrap_or(0);
        let trend_text = trend
            .iter()
            .map(|day| {
                format!(
                    "{} {} {}",
                    day.date.format("%a %d"),
                    bar(day.present, max_present),
                    day.present
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let embed = serenity::CreateEmbed::default()
            .title(format!("**{}** · {}", school.school_name, report::format_date_id(date)))
            .color(0x0058_65F2)
            .field("Siswa", students, true)
            .field("Guru", teachers, true)
            .field(
                format!("Kelas ({})", summary.class_count()),
                classes,
                true,
            )
            .field("Kehadiran minggu ini", format!("```\n{trend_text}\n```"), false);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Monthly attendance report of a class, with a printable attachment.
    #[poise::command(slash_command)]
    pub async fn recap(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Class"]
        #[autocomplete = "autocomplete::autocomplete_class_name"]
        class: String,
        #[description = "Month as YYYY-MM (defaults to this month)"] month: Option<String>,
    ) -> Result<()> {
        let month = resolve_month(month.as_deref())?;
        let data = ctx.data();
        let db = &data.database;

        let Some(class) = class_room::get_class_by_name(db, &class).await? else {
            ctx.say(format!("❌ Class '{class}' not found.")).await?;
            return Ok(());
        };

        let report = report::generate_monthly_report(
            db,
            class.id,
            month,
            today(),
            data.default_school_name(),
        )
        .await?;

        let renderer = PlainTextRenderer;
        let document = renderer.render(&report)?;
        let attachment = serenity::CreateAttachment::bytes(
            document,
            report.file_name_with_extension(renderer.extension()),
        );

        let preview = report
            .rows
            .iter()
            .take(PREVIEW_ROWS)
            .map(|row| row.cells().join(" | "))
            .collect::<Vec<_>>()
            .join("\n");
        let mut message = format!(
            "📋 **{}** · {} · {}\n```\n{}\n{}\n```",
            report.school_name,
            report.class_name,
            month.label_id(),
            report::TABLE_HEADER.join(" | "),
            preview
        );
        if report.rows.len() > PREVIEW_ROWS {
            message.push_str(&format!(
                "… {} more rows in the attachment",
                report.rows.len() - PREVIEW_ROWS
            ));
        }

        ctx.send(
            poise::CreateReply::default()
                .content(message)
                .attachment(attachment),
        )
        .await?;
        Ok(())
    }

    /// Monthly attendance of every teacher.
    #[poise::command(slash_command)]
    pub async fn teacher_recap(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Month as YYYY-MM (defaults to this month)"] month: Option<String>,
    ) -> Result<()> {
        let month = resolve_month(month.as_deref())?;
        let tallies =
            monthly::aggregate_month(&ctx.data().database, RosterScope::Teachers, month).await?;

        if tallies.is_empty() {
            ctx.say("No teachers yet. Use `/teacher_manage add` to create one!")
                .await?;
            return Ok(());
        }

        let embed = serenity::CreateEmbed::default()
            .title(format!("**Rekap Kehadiran Guru** · {}", month.label_id()))
            .color(0x0058_65F2)
            .description(tally_table(&tallies, PREVIEW_ROWS * 2));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

}

// Re-export all commands
pub use inner::*;
