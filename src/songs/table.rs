//! In-memory song table loaded once from a headed CSV.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};

/// One column of the table.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell(&self, row: usize) -> String {
        match self {
            Column::Numeric(v) => v[row].to_string(),
            Column::Text(v) => v[row].clone(),
        }
    }
}

/// Descriptive statistics of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1 denominator); NaN for a single value.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Parsed CSV: ordered headers and one column per header.
#[derive(Debug, Clone)]
pub struct SongTable {
    headers: Vec<String>,
    columns: Vec<Column>,
    rows: usize,
}

/// Parse a finite numeric cell, accepting thousands separators ("1,412").
/// "NaN" and "inf" are text.
fn parse_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell.chars().filter(|&c| c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl SongTable {
    pub fn from_path(path: &Path) -> Result<Self> {
        let t_start = Instant::now();
        let file = File::open(path)
            .map_err(|e| Error::io(format!("failed to open {}", path.display()), e))?;
        let table = Self::from_reader(file)?;
        info!(
            "Loaded {} rows x {} columns from {} in {:.1} ms",
            table.len(),
            table.headers.len(),
            path.display(),
            t_start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(Error::EmptyData("CSV has no header row".into()));
        }

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in rdr.records() {
            let record = record?;
            for (col, value) in cells.iter_mut().zip(record.iter()) {
                col.push(value.to_string());
            }
        }
        let rows = cells[0].len();
        if rows == 0 {
            return Err(Error::EmptyData("CSV has a header but no rows".into()));
        }

        let columns = cells
            .into_iter()
            .map(|raw| {
                let parsed: Option<Vec<f64>> = raw.iter().map(|c| parse_number(c)).collect();
                match parsed {
                    Some(values) => Column::Numeric(values),
                    None => Column::Text(raw),
                }
            })
            .collect();

        Ok(Self {
            headers,
            columns,
            rows,
        })
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match self.column(name)? {
            Column::Numeric(v) => Ok(v),
            Column::Text(_) => Err(Error::NonNumericColumn(name.to_string())),
        }
    }

    /// First `n` rows rendered as strings.
    pub fn head(&self, n: usize) -> Vec<Vec<String>> {
        (0..n.min(self.rows))
            .map(|row| self.columns.iter().map(|c| c.cell(row)).collect())
            .collect()
    }

    pub fn describe(&self, name: &str) -> Result<Summary> {
        let values = self.numeric(name)?;
        summarize(values).ok_or_else(|| Error::EmptyData(name.to_string()))
    }
}

/// Linear-interpolation quantile of sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

pub(crate) fn summarize(values: &[f64]) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(Summary {
        count: n,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Index,Title,Danceability,Length (Duration)
1,Sunrise,53,201
2,Black Night,50,\"1,412\"
3,Clint Eastwood,66,340
";

    #[test]
    fn infers_column_kinds() {
        let t = SongTable::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.headers().len(), 4);
        assert!(matches!(t.column("Title").unwrap(), Column::Text(_)));
        assert_eq!(t.numeric("Danceability").unwrap(), &[53.0, 50.0, 66.0]);
        assert_eq!(t.numeric("Length (Duration)").unwrap()[1], 1412.0);
    }

    #[test]
    fn non_finite_cells_are_text() {
        let t = SongTable::from_reader("Title,X\nNaN,1\ninf,2\n".as_bytes()).unwrap();
        assert!(matches!(t.column("Title").unwrap(), Column::Text(_)));
        assert_eq!(t.numeric("X").unwrap(), &[1.0, 2.0]);
        assert_eq!(parse_number("-infinity"), None);
        assert_eq!(parse_number("1,412"), Some(1412.0));
    }

    #[test]
    fn column_errors() {
        let t = SongTable::from_reader(CSV.as_bytes()).unwrap();
        assert!(matches!(t.numeric("Energy"), Err(Error::MissingColumn(_))));
        assert!(matches!(t.numeric("Title"), Err(Error::NonNumericColumn(_))));
    }

    #[test]
    fn head_is_capped_at_row_count() {
        let t = SongTable::from_reader(CSV.as_bytes()).unwrap();
        let head = t.head(5);
        assert_eq!(head.len(), 3);
        assert_eq!(head[0][1], "Sunrise");
        assert_eq!(head[2][2], "66");
    }

    #[test]
    fn header_only_is_empty_data() {
        let err = SongTable::from_reader("a,b\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::EmptyData(_)));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = SongTable::from_reader("a,b\n1,2\n3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Csv(_)));
    }

    #[test]
    fn quartiles_interpolate() {
        let s = summarize(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert!((s.q25 - 1.75).abs() < 1e-12);
        assert!((s.median - 2.5).abs() < 1e-12);
        assert!((s.q75 - 3.25).abs() < 1e-12);
        assert!((s.std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }
}
