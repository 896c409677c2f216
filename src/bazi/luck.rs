//! Decade luck cycle (Da Yun) derivation
//!
//! Direction follows the traditional parity rule, the start age counts days
//! to the adjacent jie term at three days per year, and the decade pillars
//! step through the sexagenary cycle from the month pillar.

use super::ganzhi::{self, Polarity};
use super::solar_terms;
use super::Gender;
use crate::error::{AppError, Result};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Direction the decade pillars progress in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LuckDirection {
    Forward,
    Reverse,
}

impl LuckDirection {
    /// Display label used in prompts
    pub fn label(&self) -> &'static str {
        match self {
            LuckDirection::Forward => "顺行",
            LuckDirection::Reverse => "逆行",
        }
    }
}

/// Decade-scale luck progression metadata
#[derive(Debug, Clone, Serialize)]
pub struct LuckCycle {
    #[serde(rename = "startAge")]
    pub start_age: u32,
    pub direction: LuckDirection,
    #[serde(rename = "firstDaYun")]
    pub first_pillar: String,
    #[serde(rename = "daYunList")]
    pub decades: Vec<String>,
}

/// Derive the full luck cycle for a birth date.
pub(super) fn compute(
    birth: NaiveDate,
    gender: Gender,
    year_pillar: &str,
    month_pillar: &str,
) -> Result<LuckCycle> {
    let direction = direction_for(gender, ganzhi::stem_polarity(year_pillar));
    let start_age = start_age(birth, direction)?;
    let (first_pillar, decades) = decade_sequence(month_pillar, direction)?;

    Ok(LuckCycle {
        start_age,
        direction,
        first_pillar,
        decades,
    })
}

/// Forward for male + yang or female + yin year stems, reverse otherwise.
fn direction_for(gender: Gender, polarity: Polarity) -> LuckDirection {
    let forward = match gender {
        Gender::Male => polarity == Polarity::Yang,
        Gender::Female => polarity == Polarity::Yin,
    };
    if forward {
        LuckDirection::Forward
    } else {
        LuckDirection::Reverse
    }
}

/// Whole days to the adjacent jie term, three days per year of start age.
fn start_age(birth: NaiveDate, direction: LuckDirection) -> Result<u32> {
    let year = birth.year();

    let mut terms: Vec<NaiveDate> = Vec::with_capacity(14);
    if let Some(d) = solar_terms::jie_date(year - 1, 12) {
        terms.push(d);
    }
    for month in 1..=12 {
        if let Some(d) = solar_terms::jie_date(year, month) {
            terms.push(d);
        }
    }
    if let Some(d) = solar_terms::jie_date(year + 1, 1) {
        terms.push(d);
    }

    let days = match direction {
        LuckDirection::Forward => terms
            .iter()
            .find(|d| **d > birth)
            .map(|d| (*d - birth).num_days()),
        LuckDirection::Reverse => terms
            .iter()
            .rev()
            .find(|d| **d <= birth)
            .map(|d| (birth - *d).num_days()),
    }
    .ok_or_else(|| AppError::Conversion("无法确定起运节气".to_string()))?;

    Ok((days / 3) as u32)
}

/// Decade pillars stepping from the month pillar.
///
/// Position 0 of the underlying sequence is the pre-onset childhood period
/// and carries no pillar; the first usable decade pillar sits at position 1,
/// falling back to position 0 and then to the unknown sentinel.
fn decade_sequence(month_pillar: &str, direction: LuckDirection) -> Result<(String, Vec<String>)> {
    let base = ganzhi::cycle_position(month_pillar).ok_or_else(|| {
        AppError::Conversion(format!("月柱 {} 不在六十甲子中", month_pillar))
    })?;

    let step: i64 = match direction {
        LuckDirection::Forward => 1,
        LuckDirection::Reverse => -1,
    };

    let mut raw: Vec<Option<String>> = vec![None];
    for i in 1..=10i64 {
        raw.push(Some(ganzhi::cycle_pillar(base + step * i)));
    }

    let first = raw
        .get(1)
        .cloned()
        .flatten()
        .or_else(|| raw.first().cloned().flatten())
        .unwrap_or_else(|| ganzhi::UNKNOWN_PILLAR.to_string());

    let decades = raw.into_iter().flatten().collect();

    Ok((first, decades))
}
