pub mod chart;
pub mod config;
pub mod edit;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod locations;
pub mod log;
pub mod stats;

use crate::cli::parser::PeriodArgs;
use crate::config::Config;
use crate::core::filter::filter_by_period;
use crate::db::pool::DbPool;
use crate::db::store::RecordStore;
use crate::errors::{AppError, AppResult};
use crate::models::period::Period;
use crate::models::record::Record;
use crate::utils::zone::Zone;
use chrono::{DateTime, Duration, Utc};

/// Open the configured database with the configured busy timeout.
pub(crate) fn open_store(cfg: &Config) -> AppResult<DbPool> {
    let path = cfg.database_path();
    DbPool::open_initialized(&path.to_string_lossy(), cfg.store_timeout())
}

/// `--period` expression, `--last N`, or the default rolling window.
pub(crate) fn resolve_period(
    range: &PeriodArgs,
    cfg: &Config,
    zone: &Zone,
    now: DateTime<Utc>,
) -> AppResult<Period> {
    if let Some(p) = &range.period {
        if p.trim().eq_ignore_ascii_case("all") {
            return Err(AppError::InvalidRange(
                "'all' is not supported: choose a year, month, day or range".into(),
            ));
        }
        return Period::from_range(p, zone);
    }

    let days = range.last.unwrap_or(cfg.default_period_days);
    if days == 0 {
        return Err(AppError::InvalidRange("--last must be at least 1".into()));
    }
    Ok(Period::last_days(days, now))
}

/// What every dashboard view works on: the owner's records inside one period.
pub(crate) struct View {
    pub owner: String,
    pub zone: Zone,
    pub period: Period,
    pub records: Vec<Record>,
}

pub(crate) fn load_view(cfg: &Config, range: &PeriodArgs) -> AppResult<(DbPool, View)> {
    let owner = cfg.require_owner()?.to_string();
    let zone = cfg.zone()?;
    let now = Utc::now();
    let period = resolve_period(range, cfg, &zone, now)?;

    // Rolling windows read the usual history; explicit periods read from
    // their own start.
    let since = if range.period.is_some() {
        period.start
    } else {
        period
            .start
            .min(now - Duration::days(i64::from(cfg.history_days)))
    };

    let mut pool = open_store(cfg)?;
    let fetched = pool.list_records(&owner, Some(since))?;
    let records = filter_by_period(&fetched, &period);

    tracing::debug!(
        owner = %owner,
        fetched = fetched.len(),
        in_period = records.len(),
        period = %period.display_label(&zone),
        "records loaded"
    );

    Ok((
        pool,
        View {
            owner,
            zone,
            period,
            records,
        },
    ))
}
