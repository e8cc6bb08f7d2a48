//! Summary CSVs and bar charts over loose tables and the `cases` table.

use anyhow::Result;
use caseflow_db::CaseDb;
use caseflow_model::{submitted_flag, Table};
use plotters::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::info;

/// Outputs produced by [`aggregate_cases_report`].
#[derive(Debug)]
pub struct CasesReport {
    pub summary_csv: PathBuf,
    pub tables: Vec<PathBuf>,
    pub charts: Vec<PathBuf>,
}

/// Write a per-column summary of a loose table: non-null count, distinct
/// count, min, and max (numeric when the whole column is numeric).
pub fn write_summary_csv(table: &Table, out: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(out)?;
    writer.write_record(["column", "count", "distinct", "min", "max"])?;

    for column in table.columns() {
        let cells = table.column_values(column);
        let texts: Vec<String> = cells.iter().filter_map(|c| c.as_text()).collect();
        let numbers: Vec<f64> = cells.iter().filter_map(|c| c.as_f64()).collect();

        let (min, max) = if !numbers.is_empty() && numbers.len() == texts.len() {
            let min = numbers.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = numbers.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            (min.to_string(), max.to_string())
        } else {
            (
                texts.iter().min().cloned().unwrap_or_default(),
                texts.iter().max().cloned().unwrap_or_default(),
            )
        };

        let distinct = texts.iter().collect::<BTreeSet<_>>().len();
        writer.write_record([
            column.clone(),
            texts.len().to_string(),
            distinct.to_string(),
            min,
            max,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Render a histogram SVG for every fully-numeric column.
///
/// Returns the chart paths, named `<prefix>_<column>.svg`.
pub fn plot_numeric_histograms(table: &Table, prefix: &str) -> Result<Vec<PathBuf>> {
    let mut charts = Vec::new();
    for column in table.columns() {
        let cells = table.column_values(column);
        let non_null = cells.iter().filter(|c| !c.is_null()).count();
        let values: Vec<f64> = cells.iter().filter_map(|c| c.as_f64()).collect();
        if values.is_empty() || values.len() != non_null {
            continue;
        }

        let (labels, counts) = histogram_bins(&values, 10);
        let path = PathBuf::from(format!("{prefix}_{column}.svg"));
        draw_bar_chart(&path, column, &labels, &[("count".into(), counts)])?;
        charts.push(path);
    }
    Ok(charts)
}

/// Aggregate the `cases` table into summary CSVs and bar charts.
///
/// A missing database or empty table produces a single "no data" CSV and no
/// charts, mirroring an unattended reporting run against a fresh deployment.
pub async fn aggregate_cases_report(
    db_path: &Path,
    out_csv: &Path,
    out_prefix: &str,
) -> Result<CasesReport> {
    let cases = match CaseDb::open_existing(db_path).await {
        Ok(db) => {
            let table = db
                .read_table("cases")
                .await
                .unwrap_or_else(|_| Table::new(Vec::new()));
            db.close().await;
            table
        }
        Err(_) => Table::new(Vec::new()),
    };

    if cases.is_empty() {
        let mut writer = csv::Writer::from_path(out_csv)?;
        writer.write_record(["message"])?;
        writer.write_record(["no data"])?;
        writer.flush()?;
        return Ok(CasesReport {
            summary_csv: out_csv.to_path_buf(),
            tables: Vec::new(),
            charts: Vec::new(),
        });
    }

    // Counts by court, split by submitted status. Rows with no court value
    // are excluded from the per-court breakdowns but still count overall.
    let mut by_court: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    let mut submitted_total = 0u64;
    for row in 0..cases.row_count() {
        let submitted = submitted_flag(cases.cell(row, "submitted"));
        if submitted {
            submitted_total += 1;
        }
        if let Some(court) = cases.cell(row, "court_heard_in").as_text() {
            let entry = by_court.entry(court).or_default();
            if submitted {
                entry.1 += 1;
            } else {
                entry.0 += 1;
            }
        }
    }

    let mut court_counts: Vec<(String, u64)> = by_court
        .iter()
        .map(|(court, (not_submitted, submitted))| (court.clone(), not_submitted + submitted))
        .collect();
    court_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut tables = Vec::new();
    let mut charts = Vec::new();

    let by_court_csv = PathBuf::from(format!("{out_prefix}_by_court.csv"));
    let mut writer = csv::Writer::from_path(&by_court_csv)?;
    writer.write_record(["court_heard_in", "count"])?;
    for (court, count) in &court_counts {
        writer.write_record([court.clone(), count.to_string()])?;
    }
    writer.flush()?;
    tables.push(by_court_csv);

    let labels: Vec<String> = court_counts.iter().map(|(court, _)| court.clone()).collect();
    let totals: Vec<u64> = court_counts.iter().map(|(_, count)| *count).collect();
    let by_court_svg = PathBuf::from(format!("{out_prefix}_by_court.svg"));
    draw_bar_chart(
        &by_court_svg,
        "Cases by Court",
        &labels,
        &[("cases".into(), totals)],
    )?;
    charts.push(by_court_svg);

    let pivot_csv = PathBuf::from(format!("{out_prefix}_submitted_by_court.csv"));
    let mut writer = csv::Writer::from_path(&pivot_csv)?;
    writer.write_record(["court_heard_in", "not_submitted", "submitted"])?;
    for (court, _) in &court_counts {
        let (not_submitted, submitted) = by_court[court];
        writer.write_record([
            court.clone(),
            not_submitted.to_string(),
            submitted.to_string(),
        ])?;
    }
    writer.flush()?;
    tables.push(pivot_csv);

    let not_submitted: Vec<u64> = court_counts.iter().map(|(c, _)| by_court[c].0).collect();
    let submitted: Vec<u64> = court_counts.iter().map(|(c, _)| by_court[c].1).collect();
    let pivot_svg = PathBuf::from(format!("{out_prefix}_submitted_by_court.svg"));
    draw_bar_chart(
        &pivot_svg,
        "Submitted vs Unsubmitted by Court",
        &labels,
        &[
            ("not submitted".into(), not_submitted),
            ("submitted".into(), submitted),
        ],
    )?;
    charts.push(pivot_svg);

    let mut writer = csv::Writer::from_path(out_csv)?;
    writer.write_record(["total_cases", "unique_courts", "submitted_count"])?;
    writer.write_record([
        cases.row_count().to_string(),
        by_court.len().to_string(),
        submitted_total.to_string(),
    ])?;
    writer.flush()?;

    info!(
        summary = %out_csv.display(),
        tables = tables.len(),
        charts = charts.len(),
        "Cases report generated"
    );

    Ok(CasesReport {
        summary_csv: out_csv.to_path_buf(),
        tables,
        charts,
    })
}

/// Bucket values into `bins` equal-width bins; returns (labels, counts).
fn histogram_bins(values: &[f64], bins: usize) -> (Vec<String>, Vec<u64>) {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return (vec![format!("{min}")], vec![values.len() as u64]);
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0u64; bins];
    for value in values {
        let mut idx = ((value - min) / width) as usize;
        if idx >= bins {
            idx = bins - 1;
        }
        counts[idx] += 1;
    }
    let labels = (0..bins)
        .map(|i| format!("{:.1}", min + width * i as f64))
        .collect();
    (labels, counts)
}

/// Draw a (possibly stacked) vertical bar chart as SVG.
fn draw_bar_chart(
    path: &Path,
    title: &str,
    labels: &[String],
    series: &[(String, Vec<u64>)],
) -> Result<()> {
    let n = labels.len().max(1);
    let max_total = (0..labels.len())
        .map(|i| series.iter().map(|(_, values)| values[i]).sum::<u64>())
        .max()
        .unwrap_or(0)
        .max(1);

    let root = SVGBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..n as f64, 0f64..max_total as f64 * 1.1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| {
            labels
                .get(*x as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_desc("Count")
        .draw()?;

    for (idx, (name, values)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).filled();
        // Stack on top of the preceding series.
        let bases: Vec<u64> = (0..labels.len())
            .map(|i| series[..idx].iter().map(|(_, v)| v[i]).sum())
            .collect();
        chart
            .draw_series(values.iter().enumerate().map(|(i, value)| {
                let base = bases[i] as f64;
                Rectangle::new(
                    [
                        (i as f64 + 0.15, base),
                        (i as f64 + 0.85, base + *value as f64),
                    ],
                    color,
                )
            }))?
            .label(name.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color));
    }

    if series.len() > 1 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseflow_model::Cell;
    use tempfile::TempDir;

    fn loose() -> Table {
        let mut t = Table::new(vec!["name".into(), "amount".into()]);
        t.push_row(vec![Cell::Text("alpha".into()), Cell::Int(3)]);
        t.push_row(vec![Cell::Text("beta".into()), Cell::Int(5)]);
        t.push_row(vec![Cell::Null, Cell::Int(3)]);
        t
    }

    #[test]
    fn summary_csv_counts_and_bounds() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("summary.csv");
        write_summary_csv(&loose(), &out).unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "column,count,distinct,min,max");
        assert_eq!(lines.next().unwrap(), "name,2,2,alpha,beta");
        assert_eq!(lines.next().unwrap(), "amount,3,2,3,5");
    }

    #[test]
    fn histograms_only_for_numeric_columns() {
        let tmp = TempDir::new().unwrap();
        let prefix = tmp.path().join("report").display().to_string();
        let charts = plot_numeric_histograms(&loose(), &prefix).unwrap();

        assert_eq!(charts.len(), 1);
        assert!(charts[0].ends_with("report_amount.svg"));
        assert!(charts[0].exists());
    }

    #[test]
    fn histogram_binning() {
        let (labels, counts) = histogram_bins(&[0.0, 0.5, 1.0, 9.9, 10.0], 10);
        assert_eq!(labels.len(), 10);
        assert_eq!(counts.iter().sum::<u64>(), 5);
        assert_eq!(counts[0], 2);
        assert_eq!(counts[9], 2);

        let (labels, counts) = histogram_bins(&[4.0, 4.0], 10);
        assert_eq!(labels, vec!["4"]);
        assert_eq!(counts, vec![2]);
    }

    #[tokio::test]
    async fn empty_database_yields_no_data_report() {
        let tmp = TempDir::new().unwrap();
        let out_csv = tmp.path().join("cases_summary.csv");
        let prefix = tmp.path().join("cases_report").display().to_string();

        let report =
            aggregate_cases_report(&tmp.path().join("missing.db"), &out_csv, &prefix)
                .await
                .unwrap();

        assert!(report.charts.is_empty());
        let text = std::fs::read_to_string(&out_csv).unwrap();
        assert!(text.contains("no data"));
    }
}
