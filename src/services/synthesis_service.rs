//! Synthesis Service
//!
//! Orchestrates the destiny timeline synthesis: builds the four prompts,
//! issues the gateway calls concurrently, decodes and shape-checks every
//! payload, and merges the batches into the final 120-point result.

use crate::bazi::{self, BaziChart, BirthInput, FourPillars};
use crate::decoder;
use crate::error::{AppError, Result};
use crate::gateway::{ChatGateway, GatewayConfig, OpenAiGateway};
use crate::prompts;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

/// Fixed age ranges of the three timeline batches, in merge order
const BATCH_RANGES: [(u32, u32); 3] = [(1, 40), (41, 80), (81, 120)];

/// Fallback score when an analysis score field is absent or unusable
const DEFAULT_SCORE: f64 = 7.0;

/// One year of the 120-year fortune series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelinePoint {
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub year: i32,
    #[serde(rename = "daYun", default)]
    pub da_yun: String,
    #[serde(rename = "ganZhi", default)]
    pub gan_zhi: String,
    #[serde(default)]
    pub open: f64,
    #[serde(default)]
    pub close: f64,
    #[serde(default)]
    pub high: f64,
    #[serde(default)]
    pub low: f64,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub reason: String,
}

/// Narrative verdict over the whole chart
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRecord {
    pub bazi: [String; 4],
    pub summary: String,
    #[serde(rename = "summaryScore")]
    pub summary_score: f64,
    pub industry: String,
    #[serde(rename = "industryScore")]
    pub industry_score: f64,
    pub wealth: String,
    #[serde(rename = "wealthScore")]
    pub wealth_score: f64,
    pub marriage: String,
    #[serde(rename = "marriageScore")]
    pub marriage_score: f64,
    pub health: String,
    #[serde(rename = "healthScore")]
    pub health_score: f64,
    pub family: String,
    #[serde(rename = "familyScore")]
    pub family_score: f64,
}

/// Aggregate handed to the rendering layer
#[derive(Debug, Clone, Serialize)]
pub struct DestinyResult {
    #[serde(rename = "chartData")]
    pub chart_data: Vec<TimelinePoint>,
    pub analysis: AnalysisRecord,
}

/// Synthesis service for business logic
pub struct SynthesisService;

impl SynthesisService {
    /// Full pipeline: resolve the chart, then synthesize against the
    /// configured endpoint.
    ///
    /// Resolver and configuration failures surface before any network
    /// activity.
    pub async fn synthesize(config: GatewayConfig, input: &BirthInput) -> Result<DestinyResult> {
        let chart = bazi::resolve(input)?;
        let gateway = OpenAiGateway::new(config)?;
        Self::run(&gateway, &chart).await
    }

    /// Synthesize a destiny result for an already-resolved chart.
    ///
    /// All four requests run concurrently; the first failure aborts the
    /// whole synthesis and the remaining results are discarded. Partial
    /// timelines are never returned.
    pub async fn run(gateway: &dyn ChatGateway, chart: &BaziChart) -> Result<DestinyResult> {
        let run_id = Uuid::new_v4();
        info!(
            "SynthesisService::run {} - 八字 {} {}",
            run_id,
            chart.pillars.joined(),
            chart.gender.label()
        );

        let (analysis_value, batch1, batch2, batch3) = tokio::try_join!(
            Self::fetch_analysis(gateway, chart),
            Self::fetch_batch(gateway, chart, BATCH_RANGES[0]),
            Self::fetch_batch(gateway, chart, BATCH_RANGES[1]),
            Self::fetch_batch(gateway, chart, BATCH_RANGES[2]),
        )?;

        let analysis = Self::analysis_from_value(&analysis_value, &chart.pillars);

        let mut chart_data = Vec::with_capacity(120);
        chart_data.extend(batch1);
        chart_data.extend(batch2);
        chart_data.extend(batch3);

        info!(
            "SynthesisService::run {} - complete, {} points",
            run_id,
            chart_data.len()
        );

        Ok(DestinyResult {
            chart_data,
            analysis,
        })
    }

    /// Request and decode the narrative analysis payload.
    async fn fetch_analysis(gateway: &dyn ChatGateway, chart: &BaziChart) -> Result<Value> {
        let prompt = prompts::analysis_prompt(chart);
        let content = gateway.complete(&prompt).await?;
        let value = decoder::decode(&content)?;
        info!("analysis response decoded");
        Ok(value)
    }

    /// Request, decode and shape-check one timeline batch.
    async fn fetch_batch(
        gateway: &dyn ChatGateway,
        chart: &BaziChart,
        range: (u32, u32),
    ) -> Result<Vec<TimelinePoint>> {
        let (start_age, end_age) = range;
        let prompt = prompts::batch_prompt(chart, start_age, end_age);
        let content = gateway.complete(&prompt).await?;
        let mut value = decoder::decode(&content)?;

        let raw_points = match value.get_mut("chartPoints") {
            Some(Value::Array(arr)) => std::mem::take(arr),
            _ => {
                return Err(AppError::BatchShape { start_age, end_age });
            }
        };

        let expected = (end_age - start_age + 1) as usize;
        if raw_points.len() != expected {
            warn!(
                "batch {}-{} returned {} points, expected {}",
                start_age,
                end_age,
                raw_points.len(),
                expected
            );
        }

        let points = raw_points
            .into_iter()
            .map(serde_json::from_value::<TimelinePoint>)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        info!(
            "batch {}-{} decoded: {} points",
            start_age,
            end_age,
            points.len()
        );
        Ok(points)
    }

    /// Build the analysis record, defaulting each absent or unusable field
    /// rather than failing the synthesis over narrative content.
    fn analysis_from_value(value: &Value, pillars: &FourPillars) -> AnalysisRecord {
        let bazi = value
            .get("bazi")
            .and_then(|b| serde_json::from_value::<[String; 4]>(b.clone()).ok())
            .unwrap_or_else(|| pillars.as_array());

        AnalysisRecord {
            bazi,
            summary: Self::text_or(value, "summary", "命理分析完成"),
            summary_score: Self::score_or(value, "summaryScore"),
            industry: Self::text_or(value, "industry", "事业运正常"),
            industry_score: Self::score_or(value, "industryScore"),
            wealth: Self::text_or(value, "wealth", "财运平稳"),
            wealth_score: Self::score_or(value, "wealthScore"),
            marriage: Self::text_or(value, "marriage", "婚姻顺遂"),
            marriage_score: Self::score_or(value, "marriageScore"),
            health: Self::text_or(value, "health", "健康无虞"),
            health_score: Self::score_or(value, "healthScore"),
            family: Self::text_or(value, "family", "六亲和睦"),
            family_score: Self::score_or(value, "familyScore"),
        }
    }

    /// Non-empty string field, or the documented default.
    fn text_or(value: &Value, key: &str, default: &str) -> String {
        match value.get(key) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => {
                warn!("analysis field '{}' missing, using default", key);
                default.to_string()
            }
        }
    }

    /// Numeric score field, or the default. A zero or non-numeric score
    /// falls back, coercing numeric strings on the way.
    fn score_or(value: &Value, key: &str) -> f64 {
        let parsed = match value.get(key) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed.filter(|s| *s != 0.0) {
            Some(score) => score,
            None => {
                warn!("analysis score '{}' missing, using default", key);
                DEFAULT_SCORE
            }
        }
    }
}
