//! Home screen aggregation: recent entries and the mood histogram.
//!
//! Everything here is pure. [`load_home_summary`] is the only function that
//! touches the store, and it does so with a single full fetch.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Journal, Mood};
use crate::services::DatabaseService;
use crate::Result;

/// How many entries the home screen shows under "recent".
pub const RECENT_ENTRY_COUNT: usize = 2;

/// Sort entries newest first by `date_created`.
///
/// Entries whose timestamp is missing or malformed sort after every valid
/// one, keeping their relative order.
pub fn sort_by_recency(journals: &mut [Journal]) {
    journals.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
}

/// The [`RECENT_ENTRY_COUNT`] most recently created entries.
#[must_use]
pub fn recent_entries(journals: &[Journal]) -> Vec<Journal> {
    let mut sorted = journals.to_vec();
    sort_by_recency(&mut sorted);
    sorted.truncate(RECENT_ENTRY_COUNT);
    sorted
}

/// Count of entries per mood. Entries without a mood are not counted at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoodDistribution {
    counts: BTreeMap<Mood, usize>,
}

/// One row of the mood breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoodShare {
    pub mood: Mood,
    pub count: usize,
    pub percentage: u8,
}

impl MoodDistribution {
    #[must_use]
    pub fn from_journals(journals: &[Journal]) -> Self {
        let mut counts = BTreeMap::new();
        for mood in journals.iter().filter_map(|journal| journal.mood) {
            *counts.entry(mood).or_insert(0) += 1;
        }
        Self { counts }
    }

    #[must_use]
    pub fn count(&self, mood: Mood) -> usize {
        self.counts.get(&mood).copied().unwrap_or(0)
    }

    /// Sum of all mood counts (not the number of entries).
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Moods that occur at least once, in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (Mood, usize)> + '_ {
        self.counts.iter().map(|(mood, count)| (*mood, *count))
    }

    /// Share of `mood` among counted moods, rounded half-up to a whole percent.
    #[must_use]
    pub fn percentage(&self, mood: Mood) -> u8 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        let rounded = (self.count(mood) * 200 + total) / (2 * total);
        u8::try_from(rounded).unwrap_or(100)
    }

    /// Highest count wins; ties go to the mood listed first in [`Mood::ALL`],
    /// not to whichever tied mood appears first in the fetched entries.
    #[must_use]
    pub fn most_common(&self) -> Option<Mood> {
        self.iter()
            .fold(None, |best: Option<(Mood, usize)>, (mood, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((mood, count)),
            })
            .map(|(mood, _)| mood)
    }

    #[must_use]
    pub fn breakdown(&self) -> Vec<MoodShare> {
        self.iter()
            .map(|(mood, count)| MoodShare {
                mood,
                count,
                percentage: self.percentage(mood),
            })
            .collect()
    }
}

/// Everything the home screen renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeSummary {
    pub recent: Vec<Journal>,
    pub moods: Vec<MoodShare>,
    pub most_common_mood: Option<Mood>,
    pub total_entries: usize,
}

impl HomeSummary {
    #[must_use]
    pub fn from_journals(journals: &[Journal]) -> Self {
        let distribution = MoodDistribution::from_journals(journals);
        Self {
            recent: recent_entries(journals),
            moods: distribution.breakdown(),
            most_common_mood: distribution.most_common(),
            total_entries: journals.len(),
        }
    }
}

/// Fetch the full collection and aggregate it.
pub async fn load_home_summary(service: &DatabaseService) -> Result<HomeSummary> {
    let journals = service.list_journals().await?;
    tracing::debug!("Aggregating {} journal entries", journals.len());
    Ok(HomeSummary::from_journals(&journals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JournalDraft, JournalId};
    use pretty_assertions::assert_eq;

    fn journal(title: &str, created: &str, mood: Option<Mood>) -> Journal {
        Journal {
            id: JournalId::new(),
            title: title.to_string(),
            description: String::new(),
            date_created: created.to_string(),
            date_modified: created.to_string(),
            mood,
            photo: None,
            voice_note: None,
        }
    }

    #[test]
    fn happy_happy_sad_distribution() {
        let journals = vec![
            journal("a", "2025-01-01T10:00:00.000Z", Some(Mood::Happy)),
            journal("b", "2025-01-02T10:00:00.000Z", Some(Mood::Happy)),
            journal("c", "2025-01-03T10:00:00.000Z", Some(Mood::Sad)),
        ];

        let distribution = MoodDistribution::from_journals(&journals);
        assert_eq!(distribution.count(Mood::Happy), 2);
        assert_eq!(distribution.count(Mood::Sad), 1);
        assert_eq!(distribution.count(Mood::Angry), 0);
        assert_eq!(distribution.percentage(Mood::Happy), 67);
        assert_eq!(distribution.percentage(Mood::Sad), 33);
        assert_eq!(distribution.most_common(), Some(Mood::Happy));
    }

    #[test]
    fn entries_without_mood_are_excluded_from_totals() {
        let journals = vec![
            journal("a", "2025-01-01T10:00:00.000Z", Some(Mood::Angry)),
            journal("b", "2025-01-02T10:00:00.000Z", None),
            journal("c", "2025-01-03T10:00:00.000Z", None),
        ];

        let distribution = MoodDistribution::from_journals(&journals);
        assert_eq!(distribution.total(), 1);
        assert_eq!(distribution.percentage(Mood::Angry), 100);
        assert_eq!(distribution.breakdown().len(), 1);
    }

    #[test]
    fn percentage_rounds_half_up() {
        // 1 of 8 is 12.5%
        let mut journals = vec![journal("x", "", Some(Mood::Sad))];
        journals.extend((0..7).map(|_| journal("y", "", Some(Mood::Relaxed))));

        let distribution = MoodDistribution::from_journals(&journals);
        assert_eq!(distribution.percentage(Mood::Sad), 13);
        assert_eq!(distribution.percentage(Mood::Relaxed), 88);
    }

    #[test]
    fn ties_go_to_enumeration_order() {
        let journals = vec![
            journal("a", "", Some(Mood::Relaxed)),
            journal("b", "", Some(Mood::Sad)),
        ];
        assert_eq!(
            MoodDistribution::from_journals(&journals).most_common(),
            Some(Mood::Sad)
        );
    }

    #[test]
    fn empty_input_yields_empty_summary() {
        let summary = HomeSummary::from_journals(&[]);
        assert!(summary.recent.is_empty());
        assert!(summary.moods.is_empty());
        assert_eq!(summary.most_common_mood, None);
        assert_eq!(summary.total_entries, 0);
        assert_eq!(MoodDistribution::default().percentage(Mood::Happy), 0);
    }

    #[test]
    fn recent_entries_are_newest_first_and_capped() {
        let journals = vec![
            journal("old", "2024-06-01T08:00:00.000Z", None),
            journal("newest", "2025-02-01T08:00:00.000Z", None),
            journal("middle", "2024-12-24T08:00:00.000Z", None),
        ];

        let titles: Vec<_> = recent_entries(&journals)
            .into_iter()
            .map(|journal| journal.title)
            .collect();
        assert_eq!(titles, vec!["newest", "middle"]);
    }

    #[test]
    fn malformed_dates_sort_last() {
        let mut journals = vec![
            journal("broken", "not a date", None),
            journal("missing", "", None),
            journal("valid", "2020-01-01T00:00:00.000Z", None),
        ];

        sort_by_recency(&mut journals);
        let titles: Vec<_> = journals.iter().map(|journal| journal.title.as_str()).collect();
        assert_eq!(titles, vec!["valid", "broken", "missing"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn load_home_summary_reads_the_whole_collection() {
        let service = DatabaseService::open_in_memory().await.unwrap();
        for (title, mood) in [("a", Mood::Happy), ("b", Mood::Happy), ("c", Mood::Sad)] {
            service
                .create_journal(&JournalDraft::new(title, "").with_mood(Some(mood)))
                .await
                .unwrap();
        }

        let summary = load_home_summary(&service).await.unwrap();
        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.recent.len(), RECENT_ENTRY_COUNT);
        assert_eq!(
            summary.moods,
            vec![
                MoodShare {
                    mood: Mood::Happy,
                    count: 2,
                    percentage: 67
                },
                MoodShare {
                    mood: Mood::Sad,
                    count: 1,
                    percentage: 33
                },
            ]
        );
    }
}
