//! Table formatting using comfy-table.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use headsweep_types::{AlgorithmResult, Step, StepKind, Track};

/// Creates an empty table with the shared preset and a bold header row.
fn styled_table(columns: &[&str]) -> Table {
    let mut table = Table::new();

    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = columns
        .iter()
        .map(|col| {
            if super::no_color() {
                Cell::new(col)
            } else {
                Cell::new(col)
                    .add_attribute(Attribute::Bold)
                    .fg(Color::Cyan)
            }
        })
        .collect();
    table.set_header(header_cells);

    table
}

fn number(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

fn tracks(list: &[Track]) -> String {
    if list.is_empty() {
        return "-".to_string();
    }
    list.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn kind_cell(kind: StepKind) -> Cell {
    let cell = Cell::new(kind);
    if super::no_color() {
        return cell;
    }
    match kind {
        StepKind::Service => cell.fg(Color::Green),
        StepKind::WrapService => cell.fg(Color::Cyan),
        StepKind::Edge | StepKind::Wrap => cell.fg(Color::DarkGrey),
    }
}

/// Creates the per-step trace table for one run.
///
/// The buffer column only appears when some step reports one.
pub fn step_table(result: &AlgorithmResult) -> Table {
    let with_buffer = result.steps.iter().any(|step| step.buffer.is_some());

    let mut columns = vec!["#", "From", "To", "Dist", "Start", "Arrival", "Kind", "Queue"];
    if with_buffer {
        columns.push("Buffer");
    }
    let mut table = styled_table(&columns);

    for (index, step) in result.steps.iter().enumerate() {
        table.add_row(step_row(index + 1, step, with_buffer));
    }

    table
}

fn step_row(position: usize, step: &Step, with_buffer: bool) -> Vec<Cell> {
    let arrival = step
        .arrival_instant
        .map_or_else(|| "-".to_string(), |t| format!("{t:.1}"));

    let mut row = vec![
        number(position),
        number(step.from),
        number(step.to),
        number(step.distance),
        number(format!("{:.1}", step.instant)),
        number(arrival),
        kind_cell(step.kind),
        Cell::new(tracks(&step.remaining)),
    ];
    if with_buffer {
        row.push(Cell::new(
            step.buffer.as_deref().map_or_else(|| "-".to_string(), tracks),
        ));
    }
    row
}

/// One line of the comparison ranking.
pub struct RankingRow {
    pub algorithm: String,
    pub outcome: Result<(u64, f64, usize, usize), String>,
}

/// Creates the cross-algorithm ranking table.
///
/// Rows are printed in the order given; failed runs show their error.
pub fn ranking_table(rows: &[RankingRow]) -> Table {
    let mut table = styled_table(&["Rank", "Algorithm", "Tracks", "Time", "Serviced", "Overhead"]);

    let mut rank = 0;
    for row in rows {
        match &row.outcome {
            Ok((total_tracks, total_time, serviced, overhead)) => {
                rank += 1;
                table.add_row(vec![
                    number(rank),
                    Cell::new(&row.algorithm),
                    number(total_tracks),
                    number(format!("{total_time:.1}")),
                    number(serviced),
                    number(overhead),
                ]);
            }
            Err(message) => {
                let error = if super::no_color() {
                    Cell::new(message)
                } else {
                    Cell::new(message).fg(Color::Red)
                };
                table.add_row(vec![
                    Cell::new("-"),
                    Cell::new(&row.algorithm),
                    error,
                ]);
            }
        }
    }

    table
}

/// Creates a key-value info table (two columns: key and value).
pub fn info_table(entries: &[(&str, String)]) -> Table {
    let mut table = Table::new();

    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    for (key, value) in entries {
        let key_cell = if super::no_color() {
            Cell::new(key)
        } else {
            Cell::new(key).fg(Color::DarkGrey)
        };
        table.add_row(vec![key_cell, Cell::new(value)]);
    }

    table
}

/// Prints a key-value info table.
pub fn print_info_table(entries: &[(&str, String)]) {
    println!("{}", info_table(entries));
}

#[cfg(test)]
mod tests {
    use super::*;
    use headsweep_types::Track;

    fn step(from: i64, to: i64, kind: StepKind, buffer: Option<Vec<Track>>) -> Step {
        Step {
            from: Track::new(from),
            to: Track::new(to),
            distance: Track::new(from).distance_to(Track::new(to)),
            remaining: vec![Track::new(to)],
            buffer,
            instant: 0.0,
            arrival_instant: kind.is_service().then_some(0.0),
            kind,
        }
    }

    #[test]
    fn buffer_column_only_when_reported() {
        super::super::set_no_color(true);

        let plain = AlgorithmResult {
            sequence: vec![Track::new(5)],
            total_tracks: 5,
            steps: vec![step(0, 5, StepKind::Service, None)],
            total_time: 5.0,
        };
        assert!(!step_table(&plain).to_string().contains("Buffer"));

        let buffered = AlgorithmResult {
            steps: vec![step(0, 5, StepKind::Service, Some(vec![Track::new(9)]))],
            ..plain
        };
        let rendered = step_table(&buffered).to_string();
        assert!(rendered.contains("Buffer"));
        assert!(rendered.contains('9'));
    }

    #[test]
    fn ranking_skips_failed_rows_when_numbering() {
        super::super::set_no_color(true);

        let rows = vec![
            RankingRow {
                algorithm: "C-SCAN".to_string(),
                outcome: Err("unreachable".to_string()),
            },
            RankingRow {
                algorithm: "LOOK".to_string(),
                outcome: Ok((25, 126.0, 6, 0)),
            },
        ];
        let rendered = ranking_table(&rows).to_string();
        assert!(rendered.contains("unreachable"));
        assert!(rendered.contains("126.0"));
        assert!(!rendered.contains(" 2 "));
    }
}
