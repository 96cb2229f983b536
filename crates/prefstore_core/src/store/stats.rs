//! Read-only preference statistics over the `users` table.
//!
//! # Invariants
//! - Recomputed from storage on every call; nothing is cached.
//! - Every known category is present in the result, zero when unseen.
//! - NULL categories count as `neutral`, matching how user rows are read.
//! - Unknown categories in storage are ignored.

use crate::db::Database;
use crate::model::user::TemperaturePreference;
use crate::store::{StoreError, StoreResult};
use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeMap;

/// Row counts per temperature preference.
///
/// Serializes as `{"neutral": n, "gets_cold_easily": n, "gets_hot_easily": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PreferenceStatistics(BTreeMap<TemperaturePreference, u64>);

impl PreferenceStatistics {
    /// All categories at zero.
    pub fn empty() -> Self {
        Self(
            TemperaturePreference::ALL
                .into_iter()
                .map(|pref| (pref, 0))
                .collect(),
        )
    }

    pub fn count(&self, preference: TemperaturePreference) -> u64 {
        self.0.get(&preference).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TemperaturePreference, u64)> + '_ {
        self.0.iter().map(|(pref, count)| (*pref, *count))
    }
}

impl Default for PreferenceStatistics {
    fn default() -> Self {
        Self::empty()
    }
}

/// Groups users by `preference_temperature`.
#[derive(Debug, Clone)]
pub struct PreferenceAggregator {
    db: Database,
}

impl PreferenceAggregator {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn get_user_preference_statistics(&self) -> StoreResult<PreferenceStatistics> {
        let conn = self.db.connect()?;
        let mut stmt = conn.prepare(
            "SELECT COALESCE(preference_temperature, ?1) AS category, COUNT(*)
             FROM users
             GROUP BY category;",
        )?;
        let mut rows = stmt.query([TemperaturePreference::default().as_str()])?;
        let mut stats = PreferenceStatistics::empty();

        while let Some(row) = rows.next()? {
            let category: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            let Ok(preference) = category.parse::<TemperaturePreference>() else {
                warn!(
                    "event=preference_stats module=store status=skip count={} error_code=unknown_category",
                    count
                );
                continue;
            };
            let count = u64::try_from(count).map_err(|_| {
                StoreError::InvalidData(format!("negative group count {count}"))
            })?;
            stats.0.insert(preference, count);
        }

        debug!(
            "event=preference_stats module=store status=ok total={}",
            stats.total()
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::PreferenceStatistics;
    use crate::model::user::TemperaturePreference;

    #[test]
    fn empty_statistics_cover_every_category() {
        let stats = PreferenceStatistics::empty();
        assert_eq!(stats.iter().count(), 3);
        assert_eq!(stats.total(), 0);
        assert_eq!(stats.count(TemperaturePreference::GetsHotEasily), 0);
    }

    #[test]
    fn statistics_serialize_as_category_map() {
        let json = serde_json::to_value(PreferenceStatistics::empty()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"neutral": 0, "gets_cold_easily": 0, "gets_hot_easily": 0})
        );
    }
}
