//! Summary statistics over scraped spots
//!
//! Mirrors the usual `describe()` summary: count, mean, sample standard
//! deviation, min, quartiles with linear interpolation, and max.

use std::fmt;

use crate::store::SpotRecord;

/// Summary of one numeric column
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summarizes a column, or `None` when it is empty
pub fn describe(values: &[f64]) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    });

    Some(Summary {
        count,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

/// Linear-interpolated quantile of sorted, non-empty data
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Summaries for the spot table's numeric columns
#[derive(Debug, Clone, PartialEq)]
pub struct SpotSummary {
    pub text_length: Summary,
    pub section_count: Summary,
}

impl SpotSummary {
    /// Summarizes stored spots, or `None` when there are none
    pub fn from_records(records: &[SpotRecord]) -> Option<Self> {
        let text: Vec<f64> = records.iter().map(|r| r.text_length as f64).collect();
        let sections: Vec<f64> = records.iter().map(|r| r.section_count as f64).collect();

        Some(Self {
            text_length: describe(&text)?,
            section_count: describe(&sections)?,
        })
    }
}

impl fmt::Display for SpotSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (t, s) = (&self.text_length, &self.section_count);
        let na = |v: Option<f64>| v.map_or_else(|| "NaN".to_string(), |v| format!("{:.6}", v));

        writeln!(f, "{:<6} {:>16} {:>16}", "", "text_length", "section_count")?;
        writeln!(f, "{:<6} {:>16.6} {:>16.6}", "count", t.count as f64, s.count as f64)?;
        writeln!(f, "{:<6} {:>16.6} {:>16.6}", "mean", t.mean, s.mean)?;
        writeln!(f, "{:<6} {:>16} {:>16}", "std", na(t.std), na(s.std))?;
        writeln!(f, "{:<6} {:>16.6} {:>16.6}", "min", t.min, s.min)?;
        writeln!(f, "{:<6} {:>16.6} {:>16.6}", "25%", t.q25, s.q25)?;
        writeln!(f, "{:<6} {:>16.6} {:>16.6}", "50%", t.median, s.median)?;
        writeln!(f, "{:<6} {:>16.6} {:>16.6}", "75%", t.q75, s.q75)?;
        write!(f, "{:<6} {:>16.6} {:>16.6}", "max", t.max, s.max)
    }
}
