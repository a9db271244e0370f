//! Human- and machine-readable rendering of the computed analytics.
//!
//! The kernels keep raw units; every display convention lives here:
//! theta is quoted per trading day (year / 252), vega and rho per 1% move
//! (raw / 100). The text layout follows the operational report of the
//! engine: per-instrument Greeks, portfolio totals, the two VaR/ES
//! sections, and a Greek-by-instrument table.

use std::fmt::Write as _;

use serde::Serialize;

use crate::core::{Greeks, InstrumentKind, RiskMetrics};
use crate::instruments::InstrumentBook;
use crate::risk::PortfolioGreeks;
use crate::universe::Universe;

/// Trading-day count used to quote theta per day.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Theta per trading day from theta per year.
#[inline]
pub fn theta_per_day(theta_year: f64) -> f64 {
    theta_year / TRADING_DAYS_PER_YEAR
}

/// Vega per 1% volatility move from vega per 1.00 move.
#[inline]
pub fn vega_per_percent(vega: f64) -> f64 {
    vega / 100.0
}

/// Rho per 1% rate move from rho per 1.00 move.
#[inline]
pub fn rho_per_percent(rho: f64) -> f64 {
    rho / 100.0
}

/// Greeks in display units.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScaledGreeks {
    pub price: f64,
    pub delta: f64,
    pub gamma: f64,
    /// Dollars per 1% volatility move.
    pub vega_pct: f64,
    /// Dollars per trading day.
    pub theta_day: f64,
    /// Dollars per 1% rate move.
    pub rho_pct: f64,
}

impl From<Greeks> for ScaledGreeks {
    fn from(g: Greeks) -> Self {
        Self {
            price: g.price,
            delta: g.delta,
            gamma: g.gamma,
            vega_pct: vega_per_percent(g.vega),
            theta_day: theta_per_day(g.theta),
            rho_pct: rho_per_percent(g.rho),
        }
    }
}

/// One instrument line of the report.
#[derive(Debug, Clone, Serialize)]
pub struct InstrumentReport {
    pub id: u32,
    pub label: String,
    pub qty: f64,
    pub per_contract: ScaledGreeks,
    pub per_position: ScaledGreeks,
}

/// Full report payload.
#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub alpha: f64,
    pub horizon: f64,
    pub portfolio_value: f64,
    pub instruments: Vec<InstrumentReport>,
    pub totals: ScaledGreeks,
    pub historical: RiskMetrics,
    pub monte_carlo: RiskMetrics,
}

/// Assembles the report from the raw analytics.
///
/// Equity rows are labeled with their universe ticker, option rows with
/// their side.
pub fn build_report(
    book: &InstrumentBook,
    universe: &Universe,
    greeks: &PortfolioGreeks,
    historical: RiskMetrics,
    monte_carlo: RiskMetrics,
    alpha: f64,
    horizon: f64,
) -> RiskReport {
    let mut instruments = Vec::with_capacity(book.len());
    let mut portfolio_value = 0.0;

    for i in 0..book.len() {
        let label = match book.kind[i] {
            InstrumentKind::Option => {
                if book.is_call[i] {
                    "Call".to_string()
                } else {
                    "Put".to_string()
                }
            }
            InstrumentKind::Equity => universe
                .symbol(book.id[i] as usize)
                .unwrap_or("<unknown>")
                .to_string(),
        };

        portfolio_value += greeks.per_position[i].price;
        instruments.push(InstrumentReport {
            id: book.id[i],
            label,
            qty: book.qty[i],
            per_contract: greeks.per_contract[i].into(),
            per_position: greeks.per_position[i].into(),
        });
    }

    RiskReport {
        alpha,
        horizon,
        portfolio_value,
        instruments,
        totals: greeks.totals.into(),
        historical,
        monte_carlo,
    }
}

impl RiskReport {
    /// Renders the fixed-layout text report.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let pct = self.alpha * 100.0;

        let _ = writeln!(out, "==================== Portfolio ====================");
        for inst in &self.instruments {
            let _ = writeln!(out, "Instrument {} ({})", inst.id, inst.label);
            let _ = writeln!(out, "  Price:    {:.4} (per contract)", inst.per_contract.price);
            let _ = writeln!(
                out,
                "  Position: {:.4} ({} units)",
                inst.per_position.price, inst.qty
            );
            let _ = writeln!(
                out,
                "  Greeks per contract: Δ={:.4} shares, Γ={:.4} 1/$^2, ν={:.4} $ per 1% vol, Θ={:.4} $ per day, ρ={:.4} $ per 1% rate",
                inst.per_contract.delta,
                inst.per_contract.gamma,
                inst.per_contract.vega_pct,
                inst.per_contract.theta_day,
                inst.per_contract.rho_pct
            );
            let _ = writeln!(
                out,
                "  Greeks for position: Δ={:.4} shares, Γ={:.4} 1/$^2, ν={:.4} $ per 1% vol, Θ={:.4} $ per day, ρ={:.4} $ per 1% rate",
                inst.per_position.delta,
                inst.per_position.gamma,
                inst.per_position.vega_pct,
                inst.per_position.theta_day,
                inst.per_position.rho_pct
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Portfolio totals");
        let _ = writeln!(out, "  Market value: {:.4}", self.portfolio_value);
        let _ = writeln!(out, "  Δ: {:.4} shares", self.totals.delta);
        let _ = writeln!(out, "  Γ: {:.4} 1/$^2", self.totals.gamma);
        let _ = writeln!(out, "  ν: {:.4} $ per 1% vol", self.totals.vega_pct);
        let _ = writeln!(out, "  Θ: {:.4} $ per day", self.totals.theta_day);
        let _ = writeln!(out, "  ρ: {:.4} $ per 1% rate", self.totals.rho_pct);

        let _ = writeln!(out);
        let _ = writeln!(out, "==================== Historical ====================");
        let _ = writeln!(out, "{pct}% HVaR: ${:.4}", self.historical.var);
        let _ = writeln!(out, "{pct}% HVaR (ES): ${:.4}", self.historical.cvar);

        let _ = writeln!(out, "==================== Monte Carlo ====================");
        let _ = writeln!(out, "{pct}% MCVaR: ${:.4}", self.monte_carlo.var);
        let _ = writeln!(out, "{pct}% MCVaR (ES): ${:.4}", self.monte_carlo.cvar);

        let _ = writeln!(out, "==================== Greeks ====================");
        let mut header = String::from("Greek   |");
        for inst in &self.instruments {
            let _ = write!(header, " {} |", inst.label);
        }
        header.push_str(" Portfolio | Unit");
        let _ = writeln!(out, "{header}");

        self.write_greek_row(&mut out, "Delta", |g| g.delta, self.totals.delta, "shares");
        self.write_greek_row(&mut out, "Gamma", |g| g.gamma, self.totals.gamma, "1/$^2");
        self.write_greek_row(
            &mut out,
            "Vega",
            |g| g.vega_pct,
            self.totals.vega_pct,
            "$ per 1% vol",
        );
        self.write_greek_row(
            &mut out,
            "Theta",
            |g| g.theta_day,
            self.totals.theta_day,
            "$ per day",
        );
        self.write_greek_row(
            &mut out,
            "Rho",
            |g| g.rho_pct,
            self.totals.rho_pct,
            "$ per 1% rate",
        );

        out
    }

    fn write_greek_row(
        &self,
        out: &mut String,
        name: &str,
        extract: impl Fn(&ScaledGreeks) -> f64,
        total: f64,
        unit: &str,
    ) {
        let mut line = format!("{name:>7} |");
        for inst in &self.instruments {
            let _ = write!(line, " {:>8.4} |", extract(&inst.per_position));
        }
        let _ = write!(line, " {total:>9.4} | {unit}");
        let _ = writeln!(out, "{line}");
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
