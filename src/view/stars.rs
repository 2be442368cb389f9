//! Per-day star completion grid.
//!
//! Columns are the days at least one participant has a completion record
//! for, ascending. Rows follow the scoreboard order. The grid is wrapped in
//! a code block so it renders in a monospace font. Names are left-aligned
//! and padded to the longest name.

use std::collections::BTreeSet;

use super::Embed;
use super::scoreboard::ranked;
use crate::domain::{Day, Participant, Snapshot};

/// Title of the stars embed.
pub const STARS_TITLE: &str = "AoC Stars:";

/// Accent color of the stars embed.
pub const STARS_COLOR: u32 = 0xB2_22_22;

/// Both levels of the day earned.
pub const FULL_STAR: char = '★';

/// Only the first level earned.
pub const HALF_STAR: char = '☆';

const CODE_FENCE: &str = "```";

/// Glyph for one participant-day cell.
#[must_use]
pub fn glyph(member: &Participant, day: Day) -> char {
    if member.has_level_two(day) {
        FULL_STAR
    } else if member.has_level_one(day) {
        HALF_STAR
    } else {
        ' '
    }
}

/// Days with at least one completion record, ascending.
#[must_use]
pub fn active_days(snapshot: &Snapshot) -> Vec<Day> {
    snapshot
        .participants
        .values()
        .flat_map(|member| member.completions.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Renders the star grid.
///
/// Returns `None` only when there is no snapshot. A snapshot without
/// participants still yields a header-only grid.
#[must_use]
pub fn render_stars(snapshot: Option<&Snapshot>) -> Option<Embed> {
    let snapshot = snapshot?;
    let days = active_days(snapshot);
    let members = ranked(snapshot);
    let width = members
        .iter()
        .map(|m| m.display_name().chars().count())
        .max()
        .unwrap_or(0);

    let header: String = std::iter::once("Day".to_string())
        .chain(days.iter().map(|day| format!("{day:>3}")))
        .collect();

    let rows = members.iter().map(|member| {
        let cells: String = days
            .iter()
            .map(|day| format!("  {}", glyph(member, *day)))
            .collect();
        format!("   {cells}  {:<width$}", member.display_name())
    });

    let lines: Vec<String> = std::iter::once(header).chain(rows).collect();
    let description = format!("{CODE_FENCE}{}{CODE_FENCE}", lines.join("\n"));
    Some(Embed::new(STARS_TITLE, description, STARS_COLOR))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{DayCompletion, Participant, StarDetail};

    fn sample() -> Snapshot {
        let alice = Participant::new(1, "Alice", 0, 3)
            .with_completion(
                1,
                DayCompletion::both(
                    StarDetail::at(1_672_444_800, 1),
                    StarDetail::at(1_672_444_900, 2),
                ),
            )
            .with_completion(2, DayCompletion::level_one(StarDetail::at(1_672_445_000, 3)));
        let bob = Participant::new(2, "Bob", 0, 0);
        Snapshot::new("2024", 12345, [alice, bob])
    }

    #[test]
    fn renders_grid_with_glyphs() {
        let Some(embed) = render_stars(Some(&sample())) else {
            panic!("expected a grid");
        };
        assert_eq!(embed.title, "AoC Stars:");
        assert_eq!(embed.color, 0xB22222);
        assert_eq!(
            embed.description,
            "```Day  1  2\n     ★  ☆  Alice\n           Bob  ```"
        );
    }

    #[test]
    fn glyph_selection() {
        let one = StarDetail::at(1, 1);
        let two = StarDetail::at(2, 2);
        let member = Participant::new(1, "Alice", 0, 3)
            .with_completion(1, DayCompletion::both(one, two))
            .with_completion(2, DayCompletion::level_one(one))
            .with_completion(3, DayCompletion::default());
        assert_eq!(glyph(&member, 1), FULL_STAR);
        assert_eq!(glyph(&member, 2), HALF_STAR);
        assert_eq!(glyph(&member, 3), ' ');
        assert_eq!(glyph(&member, 4), ' ');
    }

    #[test]
    fn names_are_padded_to_longest() {
        let snapshot = Snapshot::new(
            "2024",
            1,
            [
                Participant::new(1, "Zoë", 20, 0),
                Participant::new(2, "Maximilian", 10, 0),
            ],
        );
        let Some(embed) = render_stars(Some(&snapshot)) else {
            panic!("expected a grid");
        };
        assert_eq!(
            embed.description,
            "```Day\n     Zoë       \n     Maximilian```"
        );
    }

    #[test]
    fn days_come_from_all_participants_sorted() {
        let star = DayCompletion::level_one(StarDetail::at(1, 1));
        let snapshot = Snapshot::new(
            "2024",
            1,
            [
                Participant::new(1, "A", 0, 1).with_completion(12, star.clone()),
                Participant::new(2, "B", 0, 2)
                    .with_completion(3, star.clone())
                    .with_completion(12, star),
            ],
        );
        assert_eq!(active_days(&snapshot), vec![3, 12]);
    }

    #[test]
    fn double_digit_days_stay_aligned() {
        let star = DayCompletion::level_one(StarDetail::at(1, 1));
        let snapshot = Snapshot::new(
            "2024",
            1,
            [Participant::new(1, "A", 0, 1).with_completion(10, star)],
        );
        let Some(embed) = render_stars(Some(&snapshot)) else {
            panic!("expected a grid");
        };
        assert_eq!(embed.description, "```Day 10\n     ☆  A```");
    }

    #[test]
    fn rows_follow_scoreboard_order() {
        let snapshot = Snapshot::new(
            "2024",
            1,
            [
                Participant::new(1, "Low", 10, 0),
                Participant::new(2, "High", 90, 0),
            ],
        );
        let Some(embed) = render_stars(Some(&snapshot)) else {
            panic!("expected a grid");
        };
        assert_eq!(embed.description, "```Day\n     High\n     Low ```");
    }

    #[test]
    fn empty_snapshot_renders_header_only() {
        let snapshot = Snapshot::new("2024", 12345, []);
        let Some(embed) = render_stars(Some(&snapshot)) else {
            panic!("empty snapshot should still render");
        };
        assert_eq!(embed.title, "AoC Stars:");
        assert_eq!(embed.description, "```Day```");
    }

    #[test]
    fn missing_snapshot_renders_nothing() {
        assert!(render_stars(None).is_none());
    }
}
