//! Text rendering of attention weight matrices

use ndarray::ArrayView2;
use std::fmt::Write;

use crate::error::AttentionError;

/// Shades from lowest to highest weight
const SHADES: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Renders weights as a grayscale heatmap, rows labelled by `row_labels`
///
/// Columns are numbered and the numbers are listed with their labels below
/// the grid. Each row is scaled against the largest weight in the matrix.
pub fn render_heatmap(
    weights: ArrayView2<f64>,
    row_labels: &[String],
    col_labels: &[String],
) -> Result<String, AttentionError> {
    check_labels(weights, row_labels, col_labels)?;

    let max = weights.fold(0.0f64, |a, &b| a.max(b));
    let label_width = label_width(row_labels);
    let mut out = String::new();

    write_header(&mut out, label_width, col_labels.len(), 3);
    for (label, row) in row_labels.iter().zip(weights.rows()) {
        let _ = write!(out, "{}", pad(label, label_width));
        for &w in row.iter() {
            let _ = write!(out, "  {}", shade(w, max));
        }
        out.push('\n');
    }

    out.push('\n');
    write_legend(&mut out, col_labels);
    Ok(out)
}

/// Renders weights as a numeric table with three decimals
pub fn render_table(
    weights: ArrayView2<f64>,
    row_labels: &[String],
    col_labels: &[String],
) -> Result<String, AttentionError> {
    check_labels(weights, row_labels, col_labels)?;

    let label_width = label_width(row_labels);
    let mut out = String::new();

    write_header(&mut out, label_width, col_labels.len(), 6);
    for (label, row) in row_labels.iter().zip(weights.rows()) {
        let _ = write!(out, "{}", pad(label, label_width));
        for &w in row.iter() {
            let _ = write!(out, " {:>5.3}", w);
        }
        out.push('\n');
    }

    out.push('\n');
    write_legend(&mut out, col_labels);
    Ok(out)
}

fn check_labels(
    weights: ArrayView2<f64>,
    row_labels: &[String],
    col_labels: &[String],
) -> Result<(), AttentionError> {
    if row_labels.len() != weights.nrows() {
        return Err(AttentionError::shape_mismatch("row labels", weights.nrows(), row_labels.len()));
    }
    if col_labels.len() != weights.ncols() {
        return Err(AttentionError::shape_mismatch("column labels", weights.ncols(), col_labels.len()));
    }
    Ok(())
}

fn shade(weight: f64, max: f64) -> char {
    if !weight.is_finite() || max <= 0.0 {
        return SHADES[0];
    }
    let level = (weight / max * (SHADES.len() - 1) as f64).round() as usize;
    SHADES[level.min(SHADES.len() - 1)]
}

fn label_width(labels: &[String]) -> usize {
    labels.iter().map(|l| l.chars().count()).max().unwrap_or(0)
}

// Pads by characters so accented words line up
fn pad(label: &str, width: usize) -> String {
    let fill = width.saturating_sub(label.chars().count());
    format!("{}{}", label, " ".repeat(fill))
}

fn write_header(out: &mut String, label_width: usize, cols: usize, cell_width: usize) {
    out.push_str(&" ".repeat(label_width));
    for col in 0..cols {
        let _ = write!(out, "{:>width$}", col, width = cell_width);
    }
    out.push('\n');
}

fn write_legend(out: &mut String, col_labels: &[String]) {
    let legend: Vec<String> = col_labels
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{i}={label}"))
        .collect();
    let _ = writeln!(out, "columns: {}", legend.join(" "));
}
