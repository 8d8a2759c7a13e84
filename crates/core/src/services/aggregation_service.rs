use std::cmp::Ordering;

use crate::errors::CoreError;
use crate::models::holding::HoldingInput;
use crate::models::quote::QuoteResult;
use crate::models::record::{HoldingRecord, SectorRecord, Snapshot};

/// Sector assigned to anything the provider doesn't classify (funds, mostly).
pub const FALLBACK_SECTOR: &str = "ETF";

/// Sector values that mean "no sector".
const EMPTY_SECTORS: [&str; 2] = ["N/A", "None"];

/// Turns raw fetch results into the ranked holdings and sector tables.
///
/// Pure business logic: no I/O, no API calls. Each step is also exposed
/// as a free function below.
pub struct AggregationService;

impl AggregationService {
    pub fn new() -> Self {
        Self
    }

    /// Run the whole pipeline.
    ///
    /// Never fails. An empty retained set yields two empty tables; a retained
    /// set worth exactly zero keeps its rows with 0% each.
    pub fn aggregate(&self, holdings: &[HoldingInput], results: Vec<QuoteResult>) -> Snapshot {
        let mut records = merge(holdings, results);
        normalize_sectors(&mut records);

        let mut records = retain_valued(records);
        if records.is_empty() {
            tracing::warn!("no holding has a value; writing empty snapshot");
            return Snapshot::default();
        }
        rank_holdings(&mut records);
        if let Err(e) = apply_portfolio_percentages(&mut records) {
            tracing::warn!(error = %e, "portfolio percentages set to zero");
            for record in records.iter_mut() {
                record.percent_of_portfolio = Some(0.0);
            }
        }

        let mut sectors = rollup_sectors(&records);
        rank_sectors(&mut sectors);
        if let Err(e) = apply_sector_percentages(&mut sectors) {
            tracing::warn!(error = %e, "sector percentages set to zero");
            for sector in sectors.iter_mut() {
                sector.percent_of_portfolio = 0.0;
            }
        }

        tracing::debug!(
            holdings = records.len(),
            sectors = sectors.len(),
            "aggregated portfolio"
        );
        Snapshot {
            holdings: records,
            sectors,
        }
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Pair each holding with its fetch result (by position) and value it.
pub fn merge(holdings: &[HoldingInput], results: Vec<QuoteResult>) -> Vec<HoldingRecord> {
    if holdings.len() != results.len() {
        tracing::warn!(
            holdings = holdings.len(),
            results = results.len(),
            "holding/result count mismatch; extra entries ignored"
        );
    }
    holdings
        .iter()
        .zip(results)
        .map(|(holding, result)| HoldingRecord::from_result(holding, result))
        .collect()
}

/// Map absent, empty, "N/A" and "None" sectors to [`FALLBACK_SECTOR`].
pub fn normalize_sector(sector: Option<String>) -> String {
    match sector {
        Some(s) if !s.is_empty() && !EMPTY_SECTORS.contains(&s.as_str()) => s,
        _ => FALLBACK_SECTOR.to_string(),
    }
}

pub fn normalize_sectors(records: &mut [HoldingRecord]) {
    for record in records {
        record.sector = Some(normalize_sector(record.sector.take()));
    }
}

/// Drop records without a total value (failed fetch or missing price).
pub fn retain_valued(records: Vec<HoldingRecord>) -> Vec<HoldingRecord> {
    records
        .into_iter()
        .filter(|r| {
            let keep = r.total_value.is_some();
            if !keep {
                tracing::debug!(ticker = %r.ticker, error = ?r.error, "dropping unvalued holding");
            }
            keep
        })
        .collect()
}

/// Descending by value; `sort_by` is stable so ties keep input order.
fn by_value_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

pub fn rank_holdings(records: &mut [HoldingRecord]) {
    records.sort_by(|a, b| {
        by_value_desc(a.total_value.unwrap_or(0.0), b.total_value.unwrap_or(0.0))
    });
}

/// `value / total * 100` for each value. Errors if there is nothing to divide by.
fn percentages(values: &[f64]) -> Result<(f64, Vec<f64>), CoreError> {
    if values.is_empty() {
        return Err(CoreError::DivisionUndefined("no records".into()));
    }
    let total: f64 = values.iter().sum();
    if total == 0.0 || !total.is_finite() {
        return Err(CoreError::DivisionUndefined(format!(
            "total value is {total}"
        )));
    }
    Ok((total, values.iter().map(|v| v / total * 100.0).collect()))
}

/// Annotate each holding with its share of the portfolio. Returns the total.
pub fn apply_portfolio_percentages(records: &mut [HoldingRecord]) -> Result<f64, CoreError> {
    let values: Vec<f64> = records
        .iter()
        .map(|r| r.total_value.unwrap_or(0.0))
        .collect();
    let (total, pcts) = percentages(&values)?;
    for (record, pct) in records.iter_mut().zip(pcts) {
        record.percent_of_portfolio = Some(pct);
    }
    Ok(total)
}

/// Group by (already normalized) sector and sum values, in first-seen order.
pub fn rollup_sectors(records: &[HoldingRecord]) -> Vec<SectorRecord> {
    let mut sectors: Vec<SectorRecord> = Vec::new();
    for record in records {
        let Some(value) = record.total_value else {
            continue;
        };
        let name = normalize_sector(record.sector.clone());
        match sectors.iter_mut().find(|s| s.sector == name) {
            Some(sector) => sector.total_value += value,
            None => sectors.push(SectorRecord::new(name, value)),
        }
    }
    sectors
}

pub fn rank_sectors(sectors: &mut [SectorRecord]) {
    sectors.sort_by(|a, b| by_value_desc(a.total_value, b.total_value));
}

/// Annotate each sector with its share. The total is recomputed from the
/// sector table itself so the two tables can be checked independently.
pub fn apply_sector_percentages(sectors: &mut [SectorRecord]) -> Result<f64, CoreError> {
    let values: Vec<f64> = sectors.iter().map(|s| s.total_value).collect();
    let (total, pcts) = percentages(&values)?;
    for (sector, pct) in sectors.iter_mut().zip(pcts) {
        sector.percent_of_portfolio = pct;
    }
    Ok(total)
}
