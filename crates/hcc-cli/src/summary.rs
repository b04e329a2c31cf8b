use std::fmt::Display;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use hcc_core::BatchReport;
use hcc_model::{
    CategoryInfo, CodeDescription, DiffResult, GapResult, IncrementResult, MemberScore, Money,
    Score,
};
use hcc_standards::DoctorReport;

pub fn print_member_score(score: &MemberScore, base_rate: f64) {
    let demographics = &score.demographics;
    println!(
        "Model: {} {}  Member: {} {} orec {}{}{}",
        score.model.version,
        score.model.model,
        demographics.age,
        demographics.sex.label(),
        demographics.orec,
        if demographics.medicaid { ", medicaid" } else { "" },
        if demographics.originally_disabled {
            ", originally disabled"
        } else {
            ""
        },
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Diagnosis"),
        header_cell("Description"),
        header_cell("Category"),
        header_cell("Category description"),
        header_cell("Coefficient"),
        header_cell("Premium"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);

    for factor in &score.raf.demographic_detail {
        table.add_row(vec![
            dim_cell("-"),
            Cell::new("Demographic"),
            Cell::new(&factor.code),
            dim_cell("-"),
            Cell::new(factor.coefficient),
            Cell::new(factor.coefficient.premium(base_rate)),
        ]);
    }
    for line in &score.conditions {
        let diagnosis = line
            .diagnosis
            .as_ref()
            .map_or_else(|| dim_cell("-"), Cell::new);
        let description = line
            .description
            .as_deref()
            .map_or_else(|| dim_cell("-"), Cell::new);
        if line.categories.is_empty() {
            table.add_row(vec![
                diagnosis,
                description,
                dim_cell("-"),
                dim_cell("not in model"),
                dim_cell("-"),
                dim_cell("-"),
            ]);
            continue;
        }
        for (index, category) in line.categories.iter().enumerate() {
            let (diagnosis, description) = if index == 0 {
                (diagnosis.clone(), description.clone())
            } else {
                (Cell::new(""), Cell::new(""))
            };
            let (coefficient, premium) = match (category.trumped_by, category.coefficient) {
                (Some(parent), _) => (dim_cell(format!("trumped by {parent}")), dim_cell("-")),
                (None, Some(coefficient)) => (
                    Cell::new(coefficient),
                    category.premium.map_or_else(|| dim_cell("-"), Cell::new),
                ),
                (None, None) => (dim_cell("-"), dim_cell("-")),
            };
            table.add_row(vec![
                diagnosis,
                description,
                Cell::new(category.code),
                Cell::new(&category.description),
                coefficient,
                premium,
            ]);
        }
    }
    table.add_row(vec![
        total_cell("TOTAL"),
        total_cell(format!(
            "demographic {} + conditions {}",
            score.raf.demographic_score, score.raf.condition_score
        )),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(score.raf.total).add_attribute(Attribute::Bold),
        Cell::new(score.raf.premium).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

/// One comma-joined line, the way the worksheet functions render lists.
pub fn print_codes<T: Display>(codes: &[T]) {
    println!("{}", join(codes));
}

pub fn print_descriptions(descriptions: &[CodeDescription]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Description"),
        header_cell("Trumped by"),
    ]);
    apply_table_style(&mut table);
    for entry in descriptions {
        let description = if entry.description.is_empty() {
            dim_cell("unknown")
        } else {
            Cell::new(&entry.description)
        };
        table.add_row(vec![
            Cell::new(&entry.code),
            description,
            entry.trumped_by.map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
}

pub fn print_category_info(info: &CategoryInfo) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    table.add_row(vec![Cell::new("Category"), Cell::new(info.code)]);
    table.add_row(vec![Cell::new("Description"), Cell::new(&info.description)]);
    table.add_row(vec![Cell::new("Children"), list_cell(&info.children)]);
    table.add_row(vec![Cell::new("Parents"), list_cell(&info.parents)]);
    table.add_row(vec![
        Cell::new("RAF"),
        Cell::new(info.raf).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

pub fn print_diff<C: Display>(diff: &DiffResult<C>) {
    let mut table = change_table();
    table.add_row(vec![Cell::new("Adds"), list_cell(&diff.adds)]);
    table.add_row(vec![Cell::new("Upgraded"), list_cell(&diff.upgraded)]);
    table.add_row(vec![Cell::new("Downgraded"), list_cell(&diff.downgraded)]);
    table.add_row(vec![Cell::new("Downgraded to"), list_cell(&diff.downgraded_to)]);
    table.add_row(vec![Cell::new("Deletes"), list_cell(&diff.deletes)]);
    add_money_rows(&mut table, diff.raf, diff.premium);
    println!("{table}");
}

pub fn print_gap<C: Display>(gap: &GapResult<C>) {
    let mut table = change_table();
    table.add_row(vec![Cell::new("Deletes"), list_cell(&gap.deletes)]);
    table.add_row(vec![Cell::new("Downgraded"), list_cell(&gap.downgraded)]);
    add_money_rows(&mut table, gap.raf, gap.premium);
    println!("{table}");
}

pub fn print_increment<C: Display>(increment: &IncrementResult<C>) {
    let mut table = change_table();
    table.add_row(vec![Cell::new("Adds"), list_cell(&increment.adds)]);
    table.add_row(vec![Cell::new("Upgraded"), list_cell(&increment.upgraded)]);
    table.add_row(vec![
        Cell::new("Final conditions"),
        list_cell(&increment.final_conditions),
    ]);
    add_money_rows(&mut table, increment.raf, increment.premium);
    println!("{table}");
}

pub fn print_batch_summary(report: &BatchReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Members"),
        header_cell("Scored"),
        header_cell("Failed"),
        header_cell("Elapsed"),
    ]);
    apply_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(report.outcomes.len()),
        Cell::new(report.success_count()),
        count_cell(report.failed_count(), Color::Red),
        Cell::new(format!("{} ms", report.elapsed_ms)),
    ]);
    eprintln!("{table}");
    for outcome in &report.outcomes {
        if let Err(error) = &outcome.result {
            eprintln!("- {}: {error}", outcome.member_id);
        }
    }
}

pub fn print_doctor(report: &DoctorReport) {
    println!("Schema: {} v{}", report.schema, report.schema_version);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Version"),
        header_cell("Diagnoses"),
        header_cell("Categories"),
        header_cell("Coefficients"),
        header_cell("Hierarchy violations"),
        header_cell("Unmapped categories"),
    ]);
    apply_table_style(&mut table);
    for index in 1..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for version in &report.versions {
        table.add_row(vec![
            Cell::new(version.counts.version).add_attribute(Attribute::Bold),
            Cell::new(version.counts.diagnoses),
            Cell::new(version.counts.categories),
            Cell::new(version.counts.coefficients),
            count_cell(version.inverse_violations.len(), Color::Red),
            count_cell(version.unmapped_categories.len(), Color::Yellow),
        ]);
    }
    println!("{table}");

    let mut issues = Table::new();
    issues.set_header(vec![
        header_cell("Version"),
        header_cell("Issue"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut issues);
    let mut has_issues = false;
    for version in &report.versions {
        for violation in &version.inverse_violations {
            has_issues = true;
            issues.add_row(vec![
                Cell::new(version.counts.version),
                Cell::new("hierarchy").fg(Color::Red),
                Cell::new(format!(
                    "{} lists {} as {} without the inverse link",
                    violation.category, violation.related, violation.relation
                )),
            ]);
        }
        for unmapped in &version.unmapped_categories {
            has_issues = true;
            issues.add_row(vec![
                Cell::new(version.counts.version),
                Cell::new("unmapped").fg(Color::Yellow),
                Cell::new(format!(
                    "{} maps to {}, which the hierarchy does not define",
                    unmapped.diagnosis, unmapped.category
                )),
            ]);
        }
    }
    if has_issues {
        println!("{issues}");
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn change_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Change"), header_cell("Codes")]);
    apply_table_style(&mut table);
    table
}

fn add_money_rows(table: &mut Table, raf: Score, premium: Money) {
    table.add_row(vec![
        total_cell("RAF"),
        Cell::new(raf).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        total_cell("Premium"),
        Cell::new(premium).add_attribute(Attribute::Bold),
    ]);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn join<T: Display>(codes: &[T]) -> String {
    codes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn list_cell<T: Display>(codes: &[T]) -> Cell {
    if codes.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(join(codes))
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn total_cell<T: ToString>(label: T) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
