//! Retrospective analysis over the ledger
//!
//! Produces the temperature/AQI trend series and a Pearson correlation
//! matrix across the headline metrics. Rendering is left to the caller.

use crate::AirLogError;
use crate::Result;
use crate::ledger::Ledger;
use crate::models::Record;
use chrono::NaiveDateTime;
use std::fmt::Write as _;
use tracing::{info, instrument, warn};

/// Metrics included in the correlation matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Temperature,
    Humidity,
    WindSpeed,
    Aqi,
    Pm2_5,
    Pm10,
}

impl Metric {
    /// Every metric, in matrix order
    pub const ALL: [Metric; 6] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::WindSpeed,
        Metric::Aqi,
        Metric::Pm2_5,
        Metric::Pm10,
    ];

    /// Column name as it appears in the ledger header
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::WindSpeed => "Wind Speed",
            Metric::Aqi => "AQI",
            Metric::Pm2_5 => "PM2.5",
            Metric::Pm10 => "PM10",
        }
    }

    #[must_use]
    pub fn value(&self, record: &Record) -> f64 {
        match self {
            Metric::Temperature => record.temperature_c,
            Metric::Humidity => record.humidity_pct,
            Metric::WindSpeed => record.wind_speed,
            Metric::Aqi => f64::from(record.aqi),
            Metric::Pm2_5 => record.pm2_5,
            Metric::Pm10 => record.pm10,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One point of the headline trend series
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub timestamp: NaiveDateTime,
    pub temperature_c: f64,
    pub aqi: i32,
}

/// Symmetric Pearson correlation matrix over `Metric::ALL`
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    values: [[f64; 6]; 6],
}

impl CorrelationMatrix {
    /// Compute the matrix. Undefined entries (fewer than two rows, or a
    /// field with zero variance) are NaN, diagonal included.
    #[must_use]
    pub fn from_records(records: &[Record]) -> Self {
        let columns: Vec<Vec<f64>> = Metric::ALL
            .iter()
            .map(|metric| records.iter().map(|r| metric.value(r)).collect())
            .collect();

        let mut values = [[f64::NAN; 6]; 6];
        for i in 0..Metric::ALL.len() {
            if has_variance(&columns[i]) {
                values[i][i] = 1.0;
            }
            for j in (i + 1)..Metric::ALL.len() {
                let r = pearson(&columns[i], &columns[j]);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Self { values }
    }

    /// Correlation between two metrics
    #[must_use]
    pub fn get(&self, a: Metric, b: Metric) -> f64 {
        self.values[a.index()][b.index()]
    }

    /// All `((row, column), value)` entries in matrix order
    pub fn iter(&self) -> impl Iterator<Item = ((Metric, Metric), f64)> + '_ {
        Metric::ALL.iter().flat_map(move |&a| {
            Metric::ALL
                .iter()
                .map(move |&b| ((a, b), self.get(a, b)))
        })
    }

    /// Fixed-width text table
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("{:<12}", "");
        for metric in Metric::ALL {
            let _ = write!(out, "{:>12}", metric.label());
        }
        out.push('\n');
        for row in Metric::ALL {
            let _ = write!(out, "{:<12}", row.label());
            for column in Metric::ALL {
                let value = self.get(row, column);
                if value.is_nan() {
                    let _ = write!(out, "{:>12}", "NaN");
                } else {
                    let _ = write!(out, "{value:>12.6}");
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Trend series plus correlation summary
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub trend: Vec<TrendPoint>,
    pub correlation: CorrelationMatrix,
}

impl AnalysisResult {
    #[must_use]
    pub fn from_records(records: &[Record]) -> Self {
        let mut trend: Vec<TrendPoint> = records
            .iter()
            .map(|r| TrendPoint {
                timestamp: r.timestamp,
                temperature_c: r.temperature_c,
                aqi: r.aqi,
            })
            .collect();
        // Stable: rows sharing a timestamp keep ledger order
        trend.sort_by_key(|point| point.timestamp);

        Self {
            trend,
            correlation: CorrelationMatrix::from_records(records),
        }
    }
}

/// Runs analysis over the full ledger
#[derive(Debug, Clone)]
pub struct Analyzer {
    ledger: Ledger,
}

impl Analyzer {
    #[must_use]
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    /// Load every record and analyze it.
    ///
    /// Ledger read failures propagate unchanged; a ledger with only a header
    /// fails with `LedgerEmpty`.
    #[instrument(skip(self), fields(ledger = %self.ledger.path().display()))]
    pub fn analyze(&self) -> Result<AnalysisResult> {
        let records = self.ledger.read_all()?;
        if records.is_empty() {
            warn!("Ledger {} has no records", self.ledger.path().display());
            return Err(AirLogError::LedgerEmpty {
                path: self.ledger.path().to_path_buf(),
            });
        }

        let result = AnalysisResult::from_records(&records);
        info!("Analyzed {} records", records.len());
        if records.len() < 2 {
            warn!("Correlation is undefined for fewer than two records");
        }
        Ok(result)
    }
}

fn has_variance(xs: &[f64]) -> bool {
    if xs.len() < 2 {
        return false;
    }
    let first = xs[0];
    xs.iter().any(|&x| x != first)
}

/// Pearson correlation coefficient; NaN when undefined
#[must_use]
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 || n != ys.len() || !has_variance(xs) || !has_variance(ys) {
        return f64::NAN;
    }

    let len = n as f64;
    let mean_x = xs.iter().sum::<f64>() / len;
    let mean_y = ys.iter().sum::<f64>() / len;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record(
        hour: u32,
        temperature: f64,
        humidity: f64,
        wind: f64,
        aqi: i32,
        pm2_5: f64,
        pm10: f64,
    ) -> Record {
        Record {
            timestamp: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            city: "Metropolis".to_string(),
            temperature_c: temperature,
            humidity_pct: humidity,
            wind_speed: wind,
            aqi,
            pm2_5,
            pm10,
            no2: 12.0,
            so2: 4.0,
            co: 200.0,
        }
    }

    fn varied_records() -> Vec<Record> {
        vec![
            record(8, 15.0, 80.0, 1.0, 1, 5.0, 10.0),
            record(9, 18.0, 70.0, 2.5, 2, 9.0, 14.0),
            record(10, 21.0, 65.0, 2.0, 3, 12.0, 22.0),
            record(11, 24.0, 50.0, 4.0, 3, 20.0, 25.0),
            record(12, 22.0, 55.0, 3.5, 5, 30.0, 41.0),
        ]
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert!((pearson(&xs, &[2.0, 4.0, 6.0, 8.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&xs, &[8.0, 6.0, 4.0, 2.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_undefined_cases() {
        assert!(pearson(&[1.0], &[2.0]).is_nan());
        assert!(pearson(&[], &[]).is_nan());
        assert!(pearson(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]).is_nan());
        assert!(pearson(&[1.0, 2.0], &[1.0, 2.0, 3.0]).is_nan());
    }

    #[test]
    fn test_matrix_symmetric_with_unit_diagonal() {
        let matrix = CorrelationMatrix::from_records(&varied_records());

        for a in Metric::ALL {
            assert_eq!(matrix.get(a, a), 1.0);
            for b in Metric::ALL {
                let value = matrix.get(a, b);
                assert!(!value.is_nan());
                assert!((-1.0..=1.0).contains(&value));
                assert_eq!(value, matrix.get(b, a));
            }
        }
        assert!(matrix.get(Metric::Temperature, Metric::Humidity) < 0.0);
        assert!(matrix.get(Metric::Pm2_5, Metric::Pm10) > 0.9);
        assert_eq!(matrix.iter().count(), 36);
    }

    #[test]
    fn test_matrix_zero_variance_is_nan() {
        let mut records = varied_records();
        for r in &mut records {
            r.wind_speed = 3.0;
        }
        let matrix = CorrelationMatrix::from_records(&records);

        assert!(matrix.get(Metric::WindSpeed, Metric::WindSpeed).is_nan());
        assert!(matrix.get(Metric::WindSpeed, Metric::Aqi).is_nan());
        assert!(matrix.get(Metric::Aqi, Metric::WindSpeed).is_nan());
        assert_eq!(matrix.get(Metric::Aqi, Metric::Aqi), 1.0);
    }

    #[test]
    fn test_matrix_single_row_is_all_nan() {
        let matrix = CorrelationMatrix::from_records(&varied_records()[..1]);
        assert!(matrix.iter().all(|(_, value)| value.is_nan()));
        assert!(matrix.render().contains("NaN"));
    }

    #[test]
    fn test_trend_is_chronological() {
        let mut records = varied_records();
        records.swap(0, 3);
        let result = AnalysisResult::from_records(&records);

        let hours: Vec<String> = result
            .trend
            .iter()
            .map(|p| p.timestamp.format("%H").to_string())
            .collect();
        assert_eq!(hours, ["08", "09", "10", "11", "12"]);
        assert_eq!(result.trend[0].temperature_c, 15.0);
        assert_eq!(result.trend[4].aqi, 5);
    }

    #[test]
    fn test_render_header_and_rows() {
        let rendered = CorrelationMatrix::from_records(&varied_records()).render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].contains("Wind Speed"));
        assert!(lines[1].starts_with("Temperature"));
        assert!(lines[1].contains("1.000000"));
    }

    #[test]
    fn test_analyze_missing_ledger() {
        let dir = TempDir::new().unwrap();
        let analyzer = Analyzer::new(Ledger::new(dir.path().join("missing.csv")));
        assert!(matches!(
            analyzer.analyze(),
            Err(AirLogError::LedgerNotFound { .. })
        ));
    }

    #[test]
    fn test_analyze_header_only_ledger() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.csv");
        std::fs::write(&path, format!("{}\n", Record::HEADER.join(","))).unwrap();

        let analyzer = Analyzer::new(Ledger::new(path));
        assert!(matches!(
            analyzer.analyze(),
            Err(AirLogError::LedgerEmpty { .. })
        ));
    }

    #[test]
    fn test_analyze_from_ledger() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::new(dir.path().join("ledger.csv"));
        for r in varied_records() {
            ledger.append(&r).unwrap();
        }

        let result = Analyzer::new(ledger).analyze().unwrap();
        assert_eq!(result.trend.len(), 5);
        assert_eq!(result.correlation.get(Metric::Aqi, Metric::Aqi), 1.0);
    }
}
