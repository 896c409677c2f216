//! Calendrical resolver
//!
//! Turns a Gregorian birth moment into the Four Pillars sexagenary encoding
//! and the decade luck cycle. Pure computation, no I/O.

pub mod ganzhi;
pub mod luck;
pub mod solar_terms;

use crate::error::{AppError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use luck::{LuckCycle, LuckDirection};

/// Birth gender, which drives the luck direction parity rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Display label used in prompts
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "男",
            Gender::Female => "女",
        }
    }
}

/// User-supplied birth facts
///
/// Hour and minute outside their valid ranges are clamped rather than
/// rejected; the date portion is calendar-checked.
#[derive(Debug, Clone, Deserialize)]
pub struct BirthInput {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: i32,
    pub minute: i32,
    pub gender: Gender,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
}

/// Sexagenary encoding of the birth moment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FourPillars {
    pub year_pillar: String,
    pub month_pillar: String,
    pub day_pillar: String,
    pub hour_pillar: String,
}

impl FourPillars {
    /// Pillars in year/month/day/hour order
    pub fn as_array(&self) -> [String; 4] {
        [
            self.year_pillar.clone(),
            self.month_pillar.clone(),
            self.day_pillar.clone(),
            self.hour_pillar.clone(),
        ]
    }

    /// Space-joined form used in prompts
    pub fn joined(&self) -> String {
        format!(
            "{} {} {} {}",
            self.year_pillar, self.month_pillar, self.day_pillar, self.hour_pillar
        )
    }
}

/// Resolved chart handed to the synthesis pipeline
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaziChart {
    pub pillars: FourPillars,
    pub luck: LuckCycle,
    pub birth_year: i32,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
}

/// Resolve a birth input into its Four Pillars chart and luck cycle.
///
/// Deterministic: identical input always yields an identical chart.
pub fn resolve(input: &BirthInput) -> Result<BaziChart> {
    if input.year < 1900 || input.year > 2100 {
        return Err(AppError::Conversion(format!(
            "{}年超出支持范围 (1900-2100)",
            input.year
        )));
    }

    let birth = NaiveDate::from_ymd_opt(input.year, input.month, input.day).ok_or_else(|| {
        AppError::InvalidDate(format!(
            "日期 {}年{}月{}日 不存在，请检查输入",
            input.year, input.month, input.day
        ))
    })?;

    let hour = input.hour.clamp(0, 23);
    let minute = input.minute.clamp(0, 59);
    debug!("resolving birth moment {} {:02}:{:02}", birth, hour, minute);

    let pillars = four_pillars(birth, hour);
    let luck = luck::compute(
        birth,
        input.gender,
        &pillars.year_pillar,
        &pillars.month_pillar,
    )?;

    Ok(BaziChart {
        pillars,
        luck,
        birth_year: input.year,
        gender: input.gender,
        name: input.name.clone(),
        place: input.place.clone(),
    })
}

fn four_pillars(birth: NaiveDate, hour: i32) -> FourPillars {
    // Day pillar: sexagenary day count anchored so 1949-10-01 is 甲子
    let day_position = (birth.num_days_from_ce() as i64 + 14).rem_euclid(60);
    let day_pillar = ganzhi::cycle_pillar(day_position);

    // Year pillar: the sexagenary year opens at 立春, not January 1st
    let lichun = solar_terms::jie_day(birth.year(), 2);
    let before_lichun = (birth.month(), birth.day()) < (2, lichun);
    let sexagenary_year = if before_lichun {
        birth.year() - 1
    } else {
        birth.year()
    };
    let year_stem = (sexagenary_year - 4).rem_euclid(10) as usize;
    let year_branch = (sexagenary_year - 4).rem_euclid(12) as usize;
    let year_pillar = ganzhi::pillar(year_stem, year_branch);

    // Month pillar: branch from the jie interval containing the date,
    // stem from the year stem by the five tigers rule
    let mut passed = birth.month() as i32;
    if birth.day() < solar_terms::jie_day(birth.year(), birth.month()) {
        passed -= 1;
    }
    let month_num = (passed - 2).rem_euclid(12) as usize + 1; // 1 = 寅 month
    let month_branch = (month_num + 1) % 12;
    let first_month_stem = (year_stem * 2 + 2) % 10;
    let month_stem = (first_month_stem + month_num - 1) % 10;
    let month_pillar = ganzhi::pillar(month_stem, month_branch);

    // Hour pillar: two-hour branches (23:00 opens 子), stem from the day
    // stem by the five rats rule. The late 子 hour keeps the current day.
    let hour_branch = (((hour + 1) / 2) % 12) as usize;
    let day_stem = (day_position % 10) as usize;
    let hour_stem = (day_stem % 5 * 2 + hour_branch) % 10;
    let hour_pillar = ganzhi::pillar(hour_stem, hour_branch);

    FourPillars {
        year_pillar,
        month_pillar,
        day_pillar,
        hour_pillar,
    }
}
