use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The closed set of admissible mood symbols. Stored as TEXT; the same five
/// glyphs back the schema CHECK constraint (see `db::pool::init_schema`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum Emoji {
    #[sqlx(rename = "😢")]
    #[serde(rename = "😢")]
    Sad,
    #[sqlx(rename = "😐")]
    #[serde(rename = "😐")]
    Neutral,
    #[sqlx(rename = "😊")]
    #[serde(rename = "😊")]
    Happy,
    #[sqlx(rename = "😄")]
    #[serde(rename = "😄")]
    VeryHappy,
    #[sqlx(rename = "🥰")]
    #[serde(rename = "🥰")]
    Loved,
}

impl Emoji {
    pub const ALL: [Emoji; 5] = [
        Emoji::Sad,
        Emoji::Neutral,
        Emoji::Happy,
        Emoji::VeryHappy,
        Emoji::Loved,
    ];

    pub fn as_symbol(&self) -> &'static str {
        match self {
            Emoji::Sad => "😢",
            Emoji::Neutral => "😐",
            Emoji::Happy => "😊",
            Emoji::VeryHappy => "😄",
            Emoji::Loved => "🥰",
        }
    }

    pub fn from_symbol(s: &str) -> Option<Emoji> {
        Emoji::ALL.iter().copied().find(|e| e.as_symbol() == s)
    }
}

/// Storage projection: one row of the `moods` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MoodEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub emoji: Emoji,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// External projection returned over the API. Field-for-field identical to
/// the storage row today; kept as its own type so internal bookkeeping
/// columns can be added without leaking.
#[derive(Debug, Clone, Serialize)]
pub struct MoodView {
    pub id: i64,
    pub date: NaiveDate,
    pub emoji: Emoji,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MoodEntry> for MoodView {
    fn from(e: MoodEntry) -> Self {
        MoodView {
            id: e.id,
            date: e.date,
            emoji: e.emoji,
            note: e.note,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// A candidate that has passed full validation and is safe to insert.
/// Only `validation::validate_candidate` constructs these.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodCandidate {
    pub date: NaiveDate,
    pub emoji: Emoji,
    pub note: Option<String>,
}

/// GET /api/moods query params
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// One page of entries, newest first, plus pagination metadata.
#[derive(Debug, Serialize)]
pub struct MoodPage {
    pub moods: Vec<MoodView>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

/// GET /api/moods/stats query params
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub days: Option<i64>,
}

/// Entry count for one (date, emoji) pair within the statistics window.
#[derive(Debug, Serialize, FromRow)]
pub struct DailyMoodCount {
    pub date: NaiveDate,
    pub emoji: Emoji,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct MoodStats {
    #[serde(rename = "totalEntries")]
    pub total_entries: i64,
    /// Count per emoji symbol; all five symbols present, zero-filled.
    pub distribution: std::collections::BTreeMap<String, i64>,
    #[serde(rename = "dailyBreakdown")]
    pub daily_breakdown: Vec<DailyMoodCount>,
    /// Window size in days.
    pub period: i64,
}

// These tests pin the serde and sqlx representations of every variant to
// `as_symbol()`, the form the validator and the schema CHECK are built
// from; a drift in any of the rename attributes fails here.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_form_of_every_variant_matches_symbol() {
        for emoji in Emoji::ALL {
            let serialized = serde_json::to_value(emoji).unwrap();
            assert_eq!(
                serialized,
                serde_json::Value::String(emoji.as_symbol().to_string())
            );

            let back: Emoji = serde_json::from_value(serialized).unwrap();
            assert_eq!(back, emoji);
        }
    }

    #[test]
    fn from_symbol_round_trips_every_variant() {
        for emoji in Emoji::ALL {
            assert_eq!(Emoji::from_symbol(emoji.as_symbol()), Some(emoji));
        }
        assert_eq!(Emoji::from_symbol("🤖"), None);
        assert_eq!(Emoji::from_symbol(""), None);
    }

    #[tokio::test]
    async fn sqlx_text_form_of_every_variant_matches_symbol() {
        let pool = crate::db::pool::test_pool().await;

        for (i, emoji) in Emoji::ALL.into_iter().enumerate() {
            let date = format!("2025-09-{:02}", i + 1);
            sqlx::query("INSERT INTO moods (date, emoji) VALUES (?1, ?2)")
                .bind(&date)
                .bind(emoji)
                .execute(&pool)
                .await
                .unwrap();

            let stored: String = sqlx::query_scalar("SELECT emoji FROM moods WHERE date = ?1")
                .bind(&date)
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(stored, emoji.as_symbol());

            let decoded: Emoji = sqlx::query_scalar("SELECT emoji FROM moods WHERE date = ?1")
                .bind(&date)
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(decoded, emoji);
        }
    }
}
