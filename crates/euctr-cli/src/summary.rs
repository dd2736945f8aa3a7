//! Human-readable run summary printed after the pipeline finishes.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use euctr_model::ExclusionStatus;
use euctr_stats::{Z_95, confidence_interval};

use crate::types::StudyResult;

pub fn print_summary(result: &StudyResult) {
    if let Some(dir) = &result.output_dir {
        println!("Output: {}", dir.display());
    }
    println!(
        "Protocols: {} rows across {} trials",
        result.protocol_row_count, result.trial_count
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Trials"),
        header_cell("Share"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);

    for status in [
        ExclusionStatus::NoEuStart,
        ExclusionStatus::CannotInfer,
        ExclusionStatus::Extracted,
        ExclusionStatus::Inferred,
    ] {
        let count = result.category_count(status);
        table.add_row(vec![
            category_cell(status),
            Cell::new(count),
            share_cell(count, result.trial_count),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.trial_count).add_attribute(Attribute::Bold),
        share_cell(result.trial_count, result.trial_count),
    ]);
    println!("{table}");

    println!(
        "Eligible population: {} trials (final date before cutoff)",
        result.eligible_count
    );
    if let Ok((lower, point, upper)) = confidence_interval(
        result.eligible_inferred_count as u64,
        result.eligible_count as u64,
        Z_95,
    ) {
        println!(
            "Inferred dates among eligible: {} ({:.1}%, 95% CI {:.1}-{:.1}%)",
            result.eligible_inferred_count,
            point * 100.0,
            lower * 100.0,
            upper * 100.0
        );
    }
    println!(
        "Sampled: {} primary + {} replacement",
        result.primary_sample_count, result.replacement_sample_count
    );
    if let Some(outputs) = &result.outputs {
        println!("Population table: {}", outputs.final_population.display());
        println!("Primary sample: {}", outputs.primary_sample.display());
        println!(
            "Replacement sample: {}",
            outputs.replacement_sample.display()
        );
        println!("Config snapshot: {}", outputs.config_snapshot.display());
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn category_cell(status: ExclusionStatus) -> Cell {
    match status {
        ExclusionStatus::Extracted | ExclusionStatus::Inferred => Cell::new(status)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        ExclusionStatus::NoEuStart | ExclusionStatus::CannotInfer => {
            Cell::new(status).fg(Color::DarkGrey)
        }
    }
}

fn share_cell(count: usize, total: usize) -> Cell {
    if total == 0 {
        return Cell::new("-").fg(Color::DarkGrey);
    }
    Cell::new(format!("{:.1}%", 100.0 * count as f64 / total as f64))
}
