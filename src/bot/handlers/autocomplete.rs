//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions are recomputed on every keystroke from the store (class names)
//! or from the caller's open attendance sheet (student and teacher names).

use crate::{
    bot::BotData,
    core::{class_room, roster::RosterEntry},
    errors::Error,
};
use poise::serenity_prelude as serenity;

/// Discord shows at most this many suggestions
const MAX_SUGGESTIONS: usize = 25;

fn matching(names: impl IntoIterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Provides autocomplete suggestions for class names.
///
/// # Arguments
/// * `ctx` - The poise context containing the database connection
/// * `partial` - The partial string the user has typed so far
///
/// # Returns
/// Class names containing the partial input, alphabetically
pub async fn autocomplete_class_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(classes) = class_room::get_all_classes(db).await else {
        return Vec::new();
    };

    matching(classes.into_iter().map(|class| class.name), partial)
}

/// Label and value of each roster entity matching `partial` by name or code.
///
/// The value is the entity id, so people sharing a name stay distinguishable.
fn roster_suggestions(roster: &[RosterEntry], partial: &str) -> Vec<(String, String)> {
    let partial_lower = partial.to_lowercase();
    roster
        .iter()
        .filter(|entry| {
            entry.name.to_lowercase().contains(&partial_lower)
                || entry.code.to_lowercase().contains(&partial_lower)
        })
        .take(MAX_SUGGESTIONS)
        .map(|entry| (format!("{} ({})", entry.name, entry.code), entry.id.to_string()))
        .collect()
}

/// Provides autocomplete suggestions from the caller's open attendance sheet,
/// in roster order. Each choice shows `name (NIS/NIP)` and submits the entity
/// id. Empty when no sheet is open.
pub async fn autocomplete_sheet_entry(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let Some(open) = ctx.data().sheet(ctx.author().id).await else {
        return Vec::new();
    };

    roster_suggestions(open.sheet.roster(), partial)
        .into_iter()
        .map(|(label, value)| serenity::AutocompleteChoice::new(label, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_is_case_insensitive_and_capped() {
        let names = ["TK A1", "TK A2", "TK B1"].map(str::to_string);
        assert_eq!(matching(names.clone(), "a"), vec!["TK A1", "TK A2"]);
        assert_eq!(matching(names, "").len(), 3);

        let many = (0..40).map(|i| format!("Siswa {i}"));
        assert_eq!(matching(many, "siswa").len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_roster_suggestions_keep_same_names_apart() {
        let entry = |id: i64, name: &str, code: &str| RosterEntry {
            id,
            name: name.to_string(),
            code: code.to_string(),
            detail: None,
        };
        let roster = vec![
            entry(1, "Ani", "1001"),
            entry(2, "Ani", "1002"),
            entry(3, "Budi", "1003"),
        ];

        let suggestions = roster_suggestions(&roster, "ani");
        assert_eq!(
            suggestions,
            vec![
                ("Ani (1001)".to_string(), "1".to_string()),
                ("Ani (1002)".to_string(), "2".to_string()),
            ]
        );
        assert_eq!(roster_suggestions(&roster, "1003")[0].1, "3");
    }
}
