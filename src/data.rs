//! Labelled datasets.
//!
//! A [`Dataset`] keeps feature rows and labels side by side, validated so that
//! every row has the same length and there is one label per row.

use std::io::BufRead;

use crate::linalg::{self, Vector};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<L> {
    features: Vec<Vector>,
    labels: Vec<L>,
}

impl<L> Dataset<L> {
    /// Build a dataset from per-sample rows and their labels.
    pub fn from_rows(features: Vec<Vector>, labels: Vec<L>) -> Result<Self> {
        linalg::check_dimension_match(&features, &labels, true)?;
        Ok(Self { features, labels })
    }

    #[inline]
    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    /// Returns true if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[inline]
    /// Returns the per-sample feature count (zero for an empty dataset).
    pub fn n_features(&self) -> usize {
        self.features.first().map_or(0, Vec::len)
    }

    #[inline]
    pub fn features(&self) -> &[Vector] {
        &self.features
    }

    #[inline]
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    pub fn into_parts(self) -> (Vec<Vector>, Vec<L>) {
        (self.features, self.labels)
    }

    /// Convert every label, failing on the first one `f` rejects.
    pub fn map_labels<M, F>(self, f: F) -> Result<Dataset<M>>
    where
        F: FnMut(L) -> Result<M>,
    {
        let labels = self.labels.into_iter().map(f).collect::<Result<Vec<_>>>()?;
        Ok(Dataset {
            features: self.features,
            labels,
        })
    }
}

impl Dataset<String> {
    /// Read delimited text, one sample per line.
    ///
    /// `feature_columns` are parsed as `f64` in the given order; `label_column`
    /// is kept as text. Blank lines are skipped. Column indices are zero-based.
    pub fn read_delimited<R: BufRead>(
        reader: R,
        delimiter: char,
        feature_columns: &[usize],
        label_column: usize,
    ) -> Result<Self> {
        let mut features = Vec::new();
        let mut labels = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let lineno = i + 1;
            let line = line.map_err(|e| Error::InvalidData(format!("line {lineno}: {e}")))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();
            let field = |column: usize| {
                fields.get(column).copied().ok_or_else(|| {
                    Error::InvalidData(format!(
                        "line {lineno}: missing column {column} (found {})",
                        fields.len()
                    ))
                })
            };

            let row = feature_columns
                .iter()
                .map(|&column| {
                    let text = field(column)?;
                    text.parse::<f64>().map_err(|e| {
                        Error::InvalidData(format!(
                            "line {lineno}, column {column}: {text:?} is not a number ({e})"
                        ))
                    })
                })
                .collect::<Result<Vector>>()?;

            features.push(row);
            labels.push(field(label_column)?.to_owned());
        }

        log::debug!("read {} samples", labels.len());
        Self::from_rows(features, labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Id,SepalLength,PetalLength,PetalWidth,Species
1,5.1,1.4,0.2,setosa

2,7.0,4.7,1.4,versicolor
";

    #[test]
    fn from_rows_validates_shapes() {
        assert!(Dataset::from_rows(vec![vec![0.0, 1.0], vec![2.0, 3.0]], vec![0, 1]).is_ok());
        assert!(Dataset::from_rows(vec![vec![0.0, 1.0], vec![2.0]], vec![0, 1]).is_err());
        assert!(Dataset::from_rows(vec![vec![0.0]], vec![0, 1]).is_err());
    }

    #[test]
    fn reads_selected_columns_and_skips_blank_lines() {
        // Drop the header row, which has no numeric features.
        let body = SAMPLE.lines().skip(1).collect::<Vec<_>>().join("\n");
        let ds = Dataset::read_delimited(body.as_bytes(), ',', &[2, 3], 4).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.n_features(), 2);
        assert_eq!(ds.features(), &[vec![1.4, 0.2], vec![4.7, 1.4]]);
        assert_eq!(ds.labels(), &["setosa".to_owned(), "versicolor".to_owned()]);
    }

    #[test]
    fn parse_errors_name_the_line() {
        let err = Dataset::read_delimited(SAMPLE.as_bytes(), ',', &[2, 3], 4).unwrap_err();
        match err {
            Error::InvalidData(msg) => assert!(msg.starts_with("line 1, column 2"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = Dataset::read_delimited("1,2\n".as_bytes(), ',', &[0], 4).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn map_labels_converts_or_fails() {
        let ds = Dataset::from_rows(vec![vec![0.0], vec![1.0]], vec!["a", "b"]).unwrap();
        let mapped = ds
            .clone()
            .map_labels(|l| Ok(if l == "a" { 0 } else { 1 }))
            .unwrap();
        assert_eq!(mapped.labels(), &[0, 1]);

        let failed: Result<Dataset<i32>> =
            ds.map_labels(|l| Err(Error::InvalidData(format!("bad label {l}"))));
        assert!(failed.is_err());
    }
}
