use std::collections::HashSet;

use chrono::{Datelike, Duration, Local, NaiveDate};
use metrics::counter;
use rand::{seq::SliceRandom, Rng};
use tracing::info;

use crate::{
    database::Database, errors::AppError, groups::Membership, log_and_wrap_custom_internal,
};

use super::models::PresidentTerm;

const FAIRNESS_LOOKBACK_DAYS: i64 = 28;

/// A Monday-through-Sunday calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn containing(day: NaiveDate) -> Self {
        let start = day - Duration::days(day.weekday().num_days_from_monday() as i64);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn exclusion_start(&self) -> NaiveDate {
        self.start - Duration::days(FAIRNESS_LOOKBACK_DAYS)
    }
}

/// Returns the group's organizer for `week`, electing one if the week has
/// none yet. Reading twice in the same week is idempotent. Two concurrent
/// elections converge on the unique (group, week_start_date) constraint: the
/// loser re-reads the winner's term instead of failing.
pub async fn resolve_president<R: Rng>(
    database: &Database,
    group_pk: i64,
    week: &WeekWindow,
    rng: &mut R,
) -> Result<PresidentTerm, AppError> {
    if let Some(term) = PresidentTerm::find(database, group_pk, week.start).await? {
        return Ok(term);
    }

    let members = Membership::member_pks(database, group_pk).await?;
    if members.is_empty() {
        return Err(AppError::custom_internal("No group members found"));
    }

    let recent =
        PresidentTerm::recent_holders(database, group_pk, week.exclusion_start(), week.start)
            .await?;

    let candidates = eligible_candidates(&members, &recent);
    let selected = candidates
        .choose(rng)
        .copied()
        .ok_or_else(|| AppError::custom_internal("Empty candidate pool"))?;

    match PresidentTerm::insert(database, group_pk, selected, week.start, week.end).await {
        Ok(term) => {
            counter!("kudu_president_elections_total").increment(1);
            info!(group = group_pk, president = selected, week = %week.start, "president elected");
            Ok(term)
        }
        Err(e) if is_unique_violation(&e) => {
            // Lost the race: another request already elected this week's
            // president. Converge on the winner.
            PresidentTerm::find(database, group_pk, week.start)
                .await?
                .ok_or_else(|| {
                    AppError::custom_internal("Failed to resolve president election")
                })
        }
        Err(e) => Err(log_and_wrap_custom_internal!(e)),
    }
}

/// Members minus recent holders; fairness is best-effort, so when everyone
/// served in the lookback window the full member set is used instead.
fn eligible_candidates(members: &[i64], recent: &HashSet<i64>) -> Vec<i64> {
    let eligible: Vec<i64> = members
        .iter()
        .copied()
        .filter(|m| !recent.contains(m))
        .collect();
    if eligible.is_empty() {
        members.to_vec()
    } else {
        eligible
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}
