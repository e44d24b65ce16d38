use crate::analysis::ranking::Ranking;

use super::{RunSummary, TargetResult};

// ---------------------------------------------------------------------------
// Sweep results table
// ---------------------------------------------------------------------------

const RESULT_HEADERS: [&str; 5] = [
    "Tag",
    "URL",
    "Average Response Time (ms)",
    "Minimum Response Time (ms)",
    "Maximum Response Time (ms)",
];

/// Render sweep results as a plain-text table, one row per target in input
/// order. Min and max carry their distance from the average.
pub fn render_results_table(results: &[TargetResult]) -> String {
    let rows: Vec<[String; 5]> = results
        .iter()
        .map(|r| {
            [
                r.tag.clone(),
                r.url.clone(),
                format!("{:.4}", r.average_response_time),
                format!(
                    "{:.4} (-{:.4})",
                    r.minimum_response_time,
                    r.average_response_time - r.minimum_response_time
                ),
                format!(
                    "{:.4} (+{:.4})",
                    r.maximum_response_time,
                    r.maximum_response_time - r.average_response_time
                ),
            ]
        })
        .collect();

    render_table(&RESULT_HEADERS, &rows)
}

/// Column-aligned table: text columns (the first two) are left-aligned,
/// the rest right-aligned, with a dashed rule under the header.
fn render_table<const N: usize>(headers: &[&str; N], rows: &[[String; N]]) -> String {
    let mut widths = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(col, (cell, width))| {
                if col < 2 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&format_row(headers.to_vec()));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

/// One line naming the fastest target and how far behind the others are.
pub fn render_target_ranking(ranking: &Ranking<'_, TargetResult>) -> String {
    let mut out = format!(
        "Fastest by {}: {} ({:.4} ms)\n",
        ranking.metric, ranking.winner.tag, ranking.winner.average_response_time
    );
    for entry in &ranking.others {
        out.push_str(&format!(
            "  {}: {:.2}% slower\n",
            entry.item.tag, entry.percent_worse
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// Analysis report
// ---------------------------------------------------------------------------

/// Multi-line summary of one analyzed result file.
pub fn render_run_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Summary for {}\n", summary.key));
    out.push_str(&format!(
        "data_received..................: {:.2} MB\n",
        summary.data_received
    ));
    out.push_str(&format!(
        "data_sent......................: {:.2} kB\n",
        summary.data_sent
    ));
    out.push_str(&format!(
        "http_req_duration..............: {}\n",
        summary.http_req_duration
    ));
    out.push_str(&format!(
        "rps............................: {}\n",
        summary.rps
    ));
    out
}

/// Winner first, then each other run with its percentage gap, in input order.
/// With `full` set every run gets a full summary, otherwise just its key.
pub fn render_ranking(ranking: &Ranking<'_, RunSummary>, full: bool) -> String {
    let describe = |summary: &RunSummary| -> String {
        if full {
            format!("{}\n", render_run_summary(summary))
        } else {
            format!("{}\n", summary.key)
        }
    };

    let mut out = format!("Winner by {}:\n", ranking.metric);
    out.push_str(&describe(ranking.winner));
    for entry in &ranking.others {
        out.push_str(&format!(
            "{:.2}% worse than winner by {}:\n",
            entry.percent_worse, ranking.metric
        ));
        out.push_str(&describe(entry.item));
    }
    out
}

/// Export sweep results as pretty-printed JSON.
pub fn export_json(results: &[TargetResult]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(results)
}
