//! Health report summary over a user's symptom journal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::SymptomLog;

/// One point on the pain chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PainPoint {
    /// Day the log was recorded (UTC).
    pub date: NaiveDate,
    /// Pain level recorded.
    pub pain_level: u8,
}

/// Summary statistics for a symptom journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Number of logs.
    pub total_logs: usize,
    /// Mean pain level rounded to one decimal. `None` without logs.
    pub average_pain: Option<f64>,
    /// Day of the earliest log.
    pub first_logged: Option<NaiveDate>,
    /// Pain levels in chronological order.
    pub pain_series: Vec<PainPoint>,
}

impl HealthReport {
    /// Build a report from a symptom list in any order.
    #[must_use]
    pub fn from_symptoms(symptoms: &[SymptomLog]) -> Self {
        let mut ordered: Vec<&SymptomLog> = symptoms.iter().collect();
        ordered.sort_by_key(|s| s.timestamp);

        let pain_series: Vec<PainPoint> = ordered
            .iter()
            .map(|s| PainPoint {
                date: s.timestamp.date_naive(),
                pain_level: s.pain_level,
            })
            .collect();

        let average_pain = if symptoms.is_empty() {
            None
        } else {
            let total: u32 = symptoms.iter().map(|s| u32::from(s.pain_level)).sum();
            #[allow(clippy::cast_precision_loss)]
            let mean = f64::from(total) / symptoms.len() as f64;
            Some((mean * 10.0).round() / 10.0)
        };

        Self {
            total_logs: symptoms.len(),
            average_pain,
            first_logged: pain_series.first().map(|p| p.date),
            pain_series,
        }
    }

    /// Whether there is enough data to draw a chart.
    #[must_use]
    pub fn has_trend(&self) -> bool {
        self.pain_series.len() > 1
    }
}

impl std::fmt::Display for HealthReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total logs:    {}", self.total_logs)?;
        match self.average_pain {
            Some(avg) => writeln!(f, "Average pain:  {avg:.1}/10")?,
            None => writeln!(f, "Average pain:  N/A")?,
        }
        match self.first_logged {
            Some(date) => write!(f, "First logged:  {}", date.format("%d/%m/%Y"))?,
            None => write!(f, "First logged:  N/A")?,
        }
        if self.has_trend() {
            writeln!(f)?;
            write!(f, "Pain series:")?;
            for point in &self.pain_series {
                write!(f, "\n  {}  {:>2}", point.date.format("%d/%m"), point.pain_level)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn log(day: u32, pain: u8) -> SymptomLog {
        let mut log = SymptomLog::new(pain, "Bụng", "Cơm");
        log.timestamp = Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap();
        log
    }

    #[test]
    fn test_empty_report() {
        let report = HealthReport::from_symptoms(&[]);
        assert_eq!(report.total_logs, 0);
        assert!(report.average_pain.is_none());
        assert!(report.first_logged.is_none());
        assert!(report.pain_series.is_empty());
        assert!(!report.has_trend());
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        let report = HealthReport::from_symptoms(&[log(1, 3), log(2, 4), log(3, 4)]);
        assert_eq!(report.total_logs, 3);
        assert_eq!(report.average_pain, Some(3.7));

        let report = HealthReport::from_symptoms(&[log(1, 0), log(2, 0)]);
        assert_eq!(report.average_pain, Some(0.0));
    }

    #[test]
    fn test_series_is_chronological() {
        let report = HealthReport::from_symptoms(&[log(9, 2), log(3, 7), log(5, 0)]);
        let days: Vec<u8> = report.pain_series.iter().map(|p| p.pain_level).collect();
        assert_eq!(days, vec![7, 0, 2]);
        assert_eq!(report.first_logged, NaiveDate::from_ymd_opt(2024, 5, 3));
        assert!(report.has_trend());
    }

    #[test]
    fn test_serializes_camel_case() {
        let report = HealthReport::from_symptoms(&[log(1, 5)]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["totalLogs"], 1);
        assert_eq!(json["averagePain"], 5.0);
        assert_eq!(json["firstLogged"], "2024-05-01");
        assert_eq!(json["painSeries"][0]["painLevel"], 5);
    }

    #[test]
    fn test_display() {
        let text = HealthReport::from_symptoms(&[log(1, 2), log(2, 4)]).to_string();
        assert!(text.contains("Total logs:    2"));
        assert!(text.contains("Average pain:  3.0/10"));
        assert!(text.contains("First logged:  01/05/2024"));
        assert!(text.contains("02/05   4"));

        let text = HealthReport::from_symptoms(&[]).to_string();
        assert!(text.contains("Average pain:  N/A"));
    }
}
