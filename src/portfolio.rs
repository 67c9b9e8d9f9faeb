use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::{Bucket, Dollar, Error};

mod provider {
    pub(crate) mod fidelity {
        use std::path::Path;

        use tracing::{debug, warn};

        use crate::{
            Bucket, Dollar, Error,
            portfolio::{DisplayRow, parse_currency},
        };

        pub enum Columns {
            Symbol = 2,
            CurrentValue = 7,
        }

        /// Row 0 is the export header and row 1 the core money market position.
        const FIRST_BUCKET_ROW: usize = 2;

        pub(crate) fn parse_positions(
            path: &Path,
        ) -> Result<(Vec<Dollar>, Vec<DisplayRow>), Error> {
            let mut csv_reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_path(path)
                .map_err(|e| Error::from_csv(path, e))?;
            let rows = csv_reader
                .records()
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| Error::from_csv(path, e))?;

            let needed = FIRST_BUCKET_ROW + Bucket::ALL.len();
            if rows.len() < needed {
                warn!(rows = rows.len(), "Too few rows for a positions export");
                return Err(Error::Format(format!(
                    "expected at least {needed} rows in {}, found {}",
                    path.display(),
                    rows.len()
                )));
            }

            let mut balances = Vec::with_capacity(Bucket::ALL.len());
            let mut display = Vec::with_capacity(Bucket::ALL.len());
            for (index, (row, bucket)) in rows[FIRST_BUCKET_ROW..]
                .iter()
                .zip(Bucket::ALL)
                .enumerate()
            {
                let line = FIRST_BUCKET_ROW + index;
                debug!(?row, line, ?bucket, "parsed row");
                let (Some(symbol), Some(value_text)) = (
                    row.get(Columns::Symbol as usize),
                    row.get(Columns::CurrentValue as usize),
                ) else {
                    return Err(Error::Format(format!(
                        "row {line} has {} fields, expected at least {}",
                        row.len(),
                        Columns::CurrentValue as usize + 1
                    )));
                };
                let value = parse_currency(value_text)?;
                balances.push(value);
                display.push(DisplayRow {
                    symbol: symbol.to_string(),
                    value: strip_currency(value_text).to_string(),
                });
            }
            Ok((balances, display))
        }

        fn strip_currency(text: &str) -> &str {
            let text = text.trim();
            text.strip_prefix('$').unwrap_or(text)
        }
    }
}

/// Current balance of each bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balances {
    pub bonds: Dollar,
    pub international: Dollar,
    pub national: Dollar,
}

impl Balances {
    pub fn get(&self, bucket: Bucket) -> Dollar {
        match bucket {
            Bucket::Bonds => self.bonds,
            Bucket::International => self.international,
            Bucket::National => self.national,
        }
    }

    pub fn total(&self) -> Dollar {
        Bucket::ALL.iter().map(|&b| self.get(b)).sum()
    }
}

impl TryFrom<&[Dollar]> for Balances {
    type Error = Error;

    fn try_from(amounts: &[Dollar]) -> Result<Self, Self::Error> {
        match *amounts {
            [bonds, international, national] => Ok(Self {
                bonds,
                international,
                national,
            }),
            _ => Err(Error::BalanceCount(amounts.len())),
        }
    }
}

/// Symbol and value text of a bucket as they appeared in the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub symbol: String,
    pub value: String,
}

/// Everything read from one positions export.
#[derive(Debug, Clone)]
pub struct Holdings {
    pub source: PathBuf,
    pub balances: Balances,
    pub display: Vec<DisplayRow>,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum Provider {
    Fidelity,
}

impl Holdings {
    pub fn load_from_file(path: impl AsRef<Path>, provider: Provider) -> Result<Self, Error> {
        let path = path.as_ref();
        match provider {
            Provider::Fidelity => {
                let (amounts, display) = provider::fidelity::parse_positions(path)?;
                Ok(Self {
                    source: path.to_path_buf(),
                    balances: Balances::try_from(amounts.as_slice())?,
                    display,
                })
            }
        }
    }

    /// File name of the export, used to pick an allocation policy. Directories
    /// are left out, so `d2020/positions.csv` does not select the 2020 targets.
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

pub fn load_balances(path: impl AsRef<Path>) -> Result<Holdings, Error> {
    Holdings::load_from_file(path, Provider::Fidelity)
}

/// Parses `$1234.56` (the `$` is optional) into a non-negative amount.
pub fn parse_currency(text: &str) -> Result<Dollar, Error> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let value = digits
        .parse::<Dollar>()
        .map_err(|_| Error::Format(format!("invalid currency value {text:?}")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Format(format!(
            "currency value {text:?} must be a non-negative amount"
        )));
    }
    Ok(value)
}
