//! Mood repository: validation, persistence, and query semantics for the
//! one-entry-per-day store.
//!
//! Each date slot moves `ABSENT → PRESENT` (create) `→ ABSENT` (delete);
//! there is no in-place update — callers model "change today's mood" as
//! delete-then-create. The existence pre-check in `create` is an
//! optimization only: the store's UNIQUE constraint on `date` is the
//! authority, and a unique violation from any code path is remapped to
//! `AppError::DuplicateDate`.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use sqlx::error::ErrorKind;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::mood::{DailyMoodCount, Emoji, ListQuery, MoodCandidate, MoodEntry, MoodPage, MoodStats};
use crate::perf::{self, OpTimer};
use crate::validation;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;
pub const DEFAULT_STATS_DAYS: i64 = 30;

#[derive(Clone)]
pub struct MoodRepository {
    pool: SqlitePool,
}

impl MoodRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Validate and persist a new entry. No store access happens when
    /// validation fails; a date that is already occupied fails with
    /// `DuplicateDate` whether it is caught by the pre-check or by the
    /// store's constraint during a racing insert.
    pub async fn create(
        &self,
        date: Option<&str>,
        emoji: Option<&str>,
        note: Option<&str>,
    ) -> AppResult<MoodEntry> {
        let _t = OpTimer::start("create_mood", perf::CREATE_BUDGET);

        let candidate = validation::validate_candidate(date, emoji, note)
            .map_err(|errors| AppError::Validation(errors.join("; ")))?;

        if self.find_by_date(candidate.date).await?.is_some() {
            return Err(AppError::DuplicateDate {
                date: candidate.date.to_string(),
            });
        }

        self.insert(&candidate).await
    }

    /// Raw insert with the unique-violation remap. Split from `create` so
    /// the constraint path is testable without the pre-check in front.
    pub(crate) async fn insert(&self, candidate: &MoodCandidate) -> AppResult<MoodEntry> {
        let now = Utc::now();
        let result = sqlx::query_as::<_, MoodEntry>(
            r#"
            INSERT INTO moods (date, emoji, note, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING *
            "#,
        )
        .bind(candidate.date)
        .bind(candidate.emoji)
        .bind(&candidate.note)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(entry) => Ok(entry),
            Err(sqlx::Error::Database(db)) if matches!(db.kind(), ErrorKind::UniqueViolation) => {
                Err(AppError::DuplicateDate {
                    date: candidate.date.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Exact lookup. Absence is a normal outcome, not an error.
    pub async fn get_by_date(&self, date: NaiveDate) -> AppResult<Option<MoodEntry>> {
        let _t = OpTimer::start("get_mood", perf::READ_BUDGET);
        self.find_by_date(date).await
    }

    async fn find_by_date(&self, date: NaiveDate) -> AppResult<Option<MoodEntry>> {
        let entry = sqlx::query_as::<_, MoodEntry>("SELECT * FROM moods WHERE date = ?1")
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(entry)
    }

    /// Paginated listing, newest date first. `total` counts entries
    /// matching the filter, not the whole table; a page past the end is an
    /// empty slice with correct metadata.
    pub async fn list(&self, query: &ListQuery) -> AppResult<MoodPage> {
        let _t = OpTimer::start("list_moods", perf::LIST_BUDGET);

        let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }

        let page = query.page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::Validation("page must be at least 1".into()));
        }

        if let (Some(from), Some(to)) = (query.from, query.to) {
            if from > to {
                return Err(AppError::Validation(
                    "'from' date must not be after 'to' date".into(),
                ));
            }
        }

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM moods
            WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
            "#,
        )
        .bind(query.from)
        .bind(query.to)
        .fetch_one(&self.pool)
        .await?;

        // A page number too large to even compute an offset for is just
        // past the end: empty slice, correct metadata, no overflow.
        let offset = page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(limit))
            .unwrap_or(total);
        let moods = sqlx::query_as::<_, MoodEntry>(
            r#"
            SELECT * FROM moods
            WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
            ORDER BY date DESC
            LIMIT ?3 OFFSET ?4
            "#,
        )
        .bind(query.from)
        .bind(query.to)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };

        Ok(MoodPage {
            moods: moods.into_iter().map(Into::into).collect(),
            total,
            page,
            limit,
            total_pages,
        })
    }

    /// Remove the entry for `date`, returning the pre-delete snapshot.
    /// A racing second delete observes `NotFound` via the rows_affected
    /// check even after the lookup succeeded.
    pub async fn delete_by_date(&self, date: NaiveDate) -> AppResult<MoodEntry> {
        let _t = OpTimer::start("delete_mood", perf::DELETE_BUDGET);

        let snapshot = self
            .find_by_date(date)
            .await?
            .ok_or_else(|| AppError::NotFound(date.to_string()))?;

        let result = sqlx::query("DELETE FROM moods WHERE date = ?1")
            .bind(date)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(date.to_string()));
        }

        Ok(snapshot)
    }

    /// Aggregate counts over entries with `date >= today - days`.
    pub async fn statistics(&self, days: i64) -> AppResult<MoodStats> {
        self.statistics_from(Utc::now().date_naive(), days).await
    }

    pub(crate) async fn statistics_from(&self, today: NaiveDate, days: i64) -> AppResult<MoodStats> {
        let _t = OpTimer::start("mood_statistics", perf::STATS_BUDGET);

        if days < 1 {
            return Err(AppError::Validation("days must be at least 1".into()));
        }

        let cutoff = today - chrono::Duration::days(days);

        let daily_breakdown: Vec<DailyMoodCount> = sqlx::query_as(
            r#"
            SELECT date, emoji, COUNT(*) AS count FROM moods
            WHERE date >= ?1
            GROUP BY date, emoji
            ORDER BY date DESC
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        let mut distribution: BTreeMap<String, i64> = Emoji::ALL
            .iter()
            .map(|e| (e.as_symbol().to_string(), 0))
            .collect();
        let mut total_entries = 0;
        for row in &daily_breakdown {
            *distribution
                .entry(row.emoji.as_symbol().to_string())
                .or_insert(0) += row.count;
            total_entries += row.count;
        }

        Ok(MoodStats {
            total_entries,
            distribution,
            daily_breakdown,
            period: days,
        })
    }

    /// Trivial round trip against the store; never errors.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
