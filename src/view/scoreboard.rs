//! Ranked scoreboard rendering.

use super::Embed;
use crate::domain::{Participant, Snapshot};

/// Title of the scoreboard embed.
pub const SCOREBOARD_TITLE: &str = "AoC Leaderboard:";

/// Accent color of the scoreboard embed.
pub const SCOREBOARD_COLOR: u32 = 0x03_4F_20;

/// Participants in presentation order: local score descending, then id
/// ascending.
#[must_use]
pub fn ranked(snapshot: &Snapshot) -> Vec<&Participant> {
    let mut members: Vec<&Participant> = snapshot.participants.values().collect();
    members.sort_by(|a, b| b.local_score.cmp(&a.local_score).then(a.id.cmp(&b.id)));
    members
}

/// Competition ranks (`1, 2, 2, 4`) for participants already in
/// [`ranked`] order.
///
/// A participant's rank is one plus the number of participants with a
/// strictly higher score.
#[must_use]
pub fn competition_ranks(ordered: &[&Participant]) -> Vec<usize> {
    let mut ranks = Vec::with_capacity(ordered.len());
    let mut previous_score = None;
    let mut rank = 0;
    for (position, member) in ordered.iter().enumerate() {
        if previous_score != Some(member.local_score) {
            rank = position + 1;
            previous_score = Some(member.local_score);
        }
        ranks.push(rank);
    }
    ranks
}

/// Renders the scoreboard.
///
/// Returns `None` when there is no snapshot or it has no participants; the
/// caller should send nothing in that case.
#[must_use]
pub fn render_scoreboard(snapshot: Option<&Snapshot>) -> Option<Embed> {
    let snapshot = snapshot.filter(|s| !s.is_empty())?;
    let ordered = ranked(snapshot);
    let ranks = competition_ranks(&ordered);

    let description: String = ranks
        .iter()
        .zip(&ordered)
        .map(|(rank, member)| {
            format!(
                "{rank}. {} - {} points ({} stars)\n",
                member.display_name(),
                member.local_score,
                member.star_count
            )
        })
        .collect();

    Some(Embed::new(SCOREBOARD_TITLE, description, SCOREBOARD_COLOR))
}
