//! Prompt templates for the model gateway
//!
//! Pure template substitution over the resolved chart. The wording is
//! load-bearing: both request kinds instruct the model to answer with a
//! single strict JSON object.

use crate::bazi::BaziChart;

/// One-shot narrative analysis instruction.
pub fn analysis_prompt(chart: &BaziChart) -> String {
    let p = &chart.pillars;
    format!(
        "八字：{} {} {} {}，{} 命\n\n\
         生成JSON：{{ \"bazi\": [\"{}\", \"{}\", \"{}\", \"{}\"], \
         \"summary\": \"30字总评\", \"summaryScore\": 7, \
         \"industry\": \"20字事业\", \"industryScore\": 7, \
         \"wealth\": \"20字财运\", \"wealthScore\": 7, \
         \"marriage\": \"20字婚姻\", \"marriageScore\": 7, \
         \"health\": \"20字健康\", \"healthScore\": 7, \
         \"family\": \"20字六亲\", \"familyScore\": 7 }}\n\n\
         评分规则：9-10=喜用神得力、格局明显有利；7-8=较好；5-6=平常；3-4=较差；1-2=忌神当令、格局明显不利。\n\
         各项分数必须依据八字强弱差异化打分，禁止全部给同一个中间分。",
        p.year_pillar,
        p.month_pillar,
        p.day_pillar,
        p.hour_pillar,
        chart.gender.label(),
        p.year_pillar,
        p.month_pillar,
        p.day_pillar,
        p.hour_pillar,
    )
}

/// Timeline-batch instruction for an inclusive age range.
pub fn batch_prompt(chart: &BaziChart, start_age: u32, end_age: u32) -> String {
    let count = end_age - start_age + 1;
    let first_year = chart.birth_year + start_age as i32 - 1;

    format!(
        "你是八字命理专家。生成 {}-{} 岁共 {} 条K线数据。\n\n\
         八字：{}\n\
         出生：{}年，起运：{}岁，首运：{}，{}\n\n\
         只输出JSON：{{\"chartPoints\":[{{\"age\":{},\"year\":{},\"daYun\":\"干支\",\"ganZhi\":\"干支\",\
         \"open\":45,\"close\":62,\"high\":70,\"low\":38,\"score\":62,\"reason\":\"10字\"}},...]}}\n\n\
         【重要】K线形态 - 区分度 (High Contrast)：\n\
         - **拒绝平均**：不要每年都差不多长！必须有长有短。\n\
         - **平稳年份 (70%)**：open和close非常接近 (差值 < 5)，K线很短，表示运势平稳。\n\
         - **转折年份 (30%)**：open和close差距极大 (差值 > 15-25)，K线很长，表示大起大落。\n\
         - **吉凶分明**：吉年(>70分)要长红，凶年(<40分)要长绿。\n\
         - **制造疏密**：平稳期像一条线，动荡期像一根柱，视觉上要有明显的疏密节奏。\n\n\
         daYun每10年变，ganZhi每年变，reason≤10字，score=close值",
        start_age,
        end_age,
        count,
        chart.pillars.joined(),
        chart.birth_year,
        chart.luck.start_age,
        chart.luck.first_pillar,
        chart.luck.direction.label(),
        start_age,
        first_year,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bazi::{resolve, BirthInput, Gender};

    fn chart() -> BaziChart {
        resolve(&BirthInput {
            year: 2000,
            month: 1,
            day: 1,
            hour: 12,
            minute: 0,
            gender: Gender::Male,
            name: None,
            place: None,
        })
        .unwrap()
    }

    #[test]
    fn test_analysis_prompt_embeds_pillars_and_gender() {
        let prompt = analysis_prompt(&chart());
        assert!(prompt.contains("己卯 丙子 戊午 戊午"));
        assert!(prompt.contains("男 命"));
        assert!(prompt.contains("\"summaryScore\""));
        assert!(prompt.contains("\"familyScore\""));
    }

    #[test]
    fn test_analysis_prompt_states_scoring_rubric() {
        let prompt = analysis_prompt(&chart());
        assert!(prompt.contains("9-10"));
        assert!(prompt.contains("1-2"));
        assert!(prompt.contains("禁止全部给同一个中间分"));
    }

    #[test]
    fn test_batch_prompt_embeds_range_and_luck() {
        let prompt = batch_prompt(&chart(), 41, 80);
        assert!(prompt.contains("41-80 岁共 40 条"));
        assert!(prompt.contains("己卯 丙子 戊午 戊午"));
        assert!(prompt.contains("出生：2000年"));
        assert!(prompt.contains("起运：8岁"));
        assert!(prompt.contains("首运：乙亥"));
        assert!(prompt.contains("逆行"));
        assert!(prompt.contains("\"chartPoints\""));
        // first entry's calendar year lines up with the range start
        assert!(prompt.contains("\"year\":2040"));
    }

    #[test]
    fn test_batch_prompt_shaping_rules() {
        let prompt = batch_prompt(&chart(), 1, 40);
        assert!(prompt.contains("平稳年份 (70%)"));
        assert!(prompt.contains("转折年份 (30%)"));
        assert!(prompt.contains("吉年(>70分)"));
        assert!(prompt.contains("凶年(<40分)"));
    }
}
