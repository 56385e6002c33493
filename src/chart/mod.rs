//! Pie chart geometry, independent of any drawing surface.

use std::f64::consts::{FRAC_PI_2, TAU};

use serde::Serialize;

use crate::{
    domain::category::{color_for, EXPENSES_LABEL, INCOME_LABEL},
    stats::MonthlySummary,
};

/// Space left between the pie and the edge of the surface.
pub const EDGE_PADDING: f64 = 20.0;

/// Angle of the first slice edge: twelve o'clock.
pub const START_ANGLE: f64 = -FRAC_PI_2;

/// One wedge, angles in radians measured clockwise on a y-down surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub amount: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: &'static str,
}

impl Slice {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieLayout {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub slices: Vec<Slice>,
}

/// Result of laying out a pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PieChart {
    /// Nothing to draw; the caller shows a placeholder at `(center_x, center_y)`.
    NoData { center_x: f64, center_y: f64 },
    Pie(PieLayout),
}

impl PieChart {
    pub fn has_data(&self) -> bool {
        matches!(self, PieChart::Pie(_))
    }

    pub fn slices(&self) -> &[Slice] {
        match self {
            PieChart::Pie(layout) => &layout.slices,
            PieChart::NoData { .. } => &[],
        }
    }
}

/// Splits the full circle between `data` entries in proportion to their amounts.
pub fn layout_pie<L: AsRef<str>>(data: &[(L, f64)], width: f64, height: f64) -> PieChart {
    let center_x = width / 2.0;
    let center_y = height / 2.0;
    let total: f64 = data.iter().map(|(_, amount)| amount).sum();
    if total == 0.0 {
        return PieChart::NoData { center_x, center_y };
    }

    let mut current = START_ANGLE;
    let slices = data
        .iter()
        .map(|(label, amount)| {
            let label = label.as_ref();
            let start_angle = current;
            current += amount / total * TAU;
            Slice {
                label: label.to_string(),
                amount: *amount,
                start_angle,
                end_angle: current,
                color: color_for(label),
            }
        })
        .collect();

    PieChart::Pie(PieLayout {
        center_x,
        center_y,
        radius: (width.min(height) / 2.0 - EDGE_PADDING).max(0.0),
        slices,
    })
}

/// `Income` / `Expenses` pairs for the monthly comparison chart.
pub fn income_expense_series(summary: &MonthlySummary) -> Vec<(&'static str, f64)> {
    vec![
        (INCOME_LABEL, summary.income),
        (EXPENSES_LABEL, summary.expenses),
    ]
}
