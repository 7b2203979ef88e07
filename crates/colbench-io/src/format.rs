use colbench_columnar::parquet::{Compression, GzipLevel};
use std::fmt;
use std::str::FromStr;

/// On-disk representation of a benchmarked table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormatKind {
    Csv,
    ParquetUncompressed,
    ParquetSnappy,
    ParquetGzip,
}

impl FormatKind {
    pub const ALL: [FormatKind; 4] = [
        FormatKind::Csv,
        FormatKind::ParquetUncompressed,
        FormatKind::ParquetSnappy,
        FormatKind::ParquetGzip,
    ];

    /// Stable label used in artifact names and persisted results.
    pub fn as_str(self) -> &'static str {
        match self {
            FormatKind::Csv => "csv",
            FormatKind::ParquetUncompressed => "parquet-uncompressed",
            FormatKind::ParquetSnappy => "parquet-snappy",
            FormatKind::ParquetGzip => "parquet-gzip",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FormatKind::Csv => "csv",
            FormatKind::ParquetUncompressed
            | FormatKind::ParquetSnappy
            | FormatKind::ParquetGzip => "parquet",
        }
    }

    /// Whether reading the artifact back restores native column types without coercion.
    pub fn is_schema_preserving(self) -> bool {
        !matches!(self, FormatKind::Csv)
    }

    /// Parquet codec applied at write time; `None` for non-Parquet formats.
    pub fn parquet_compression(self) -> Option<Compression> {
        match self {
            FormatKind::Csv => None,
            FormatKind::ParquetUncompressed => Some(Compression::UNCOMPRESSED),
            FormatKind::ParquetSnappy => Some(Compression::SNAPPY),
            FormatKind::ParquetGzip => Some(Compression::GZIP(GzipLevel::default())),
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "unknown format `{0}` (expected csv, parquet-uncompressed, parquet-snappy or parquet-gzip)"
)]
pub struct UnknownFormat(pub String);

impl FromStr for FormatKind {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormatKind::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownFormat(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_str() {
        for format in FormatKind::ALL {
            assert_eq!(format.as_str().parse::<FormatKind>(), Ok(format));
        }
        assert_eq!(
            "PARQUET-GZIP".parse::<FormatKind>(),
            Ok(FormatKind::ParquetGzip)
        );
        assert!("parquet-zstd".parse::<FormatKind>().is_err());
    }

    #[test]
    fn only_csv_loses_types() {
        assert!(!FormatKind::Csv.is_schema_preserving());
        assert!(FormatKind::Csv.parquet_compression().is_none());
        for format in &FormatKind::ALL[1..] {
            assert!(format.is_schema_preserving());
            assert_eq!(format.extension(), "parquet");
        }
    }
}
