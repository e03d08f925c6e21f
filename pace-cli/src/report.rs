//! Plain-text rendering of a financial state report.

use std::fmt::{self, Write};

use pace_core::{FinancialStateReport, MonthStatus};

fn money(v: f64) -> String {
    format!("${v:.2}")
}

fn pct(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

pub fn render(report: &FinancialStateReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let p = &report.period;
    let t = &report.targets;
    let m = &report.monthly;
    let d = &report.daily;

    writeln!(
        out,
        "# {} for {}-{:02} (as of {})\n",
        report.user_id, p.year, p.month, report.as_of
    )?;
    writeln!(
        out,
        "Working days: {} (day {} of {})",
        p.working_days, p.effective_day_index, p.working_days
    )?;

    if m.status == MonthStatus::Unconfigured {
        writeln!(out, "\n{}", m.message)?;
        writeln!(out, "Income this month: {}", money(m.total_income))?;
        return Ok(out);
    }

    writeln!(
        out,
        "Monthly target: {} | daily target: {}\n",
        money(t.monthly_income_target),
        money(t.daily_income_target)
    )?;

    writeln!(out, "## Month\n")?;
    writeln!(
        out,
        "Income: {} of {} ({}) [{:?}]",
        money(m.total_income),
        money(t.monthly_income_target),
        pct(m.ratio),
        m.status
    )?;
    writeln!(
        out,
        "Expected by today: {} | pace: {} | projected month: {}",
        money(m.expected_to_date),
        pct(m.pace_ratio),
        money(m.projected_month_income)
    )?;
    writeln!(out, "{}\n", m.message)?;

    writeln!(out, "## Today\n")?;
    writeln!(out, "Income: {} [{:?}]", money(d.today_income), d.status)?;
    writeln!(out, "{}", d.message)?;
    for line in &d.distribution.lines {
        writeln!(
            out,
            "- {}: ideal {} | set aside today {}",
            line.name,
            money(line.ideal_daily),
            money(line.recommended_today)
        )?;
    }
    writeln!(out)?;

    if !report.categories.is_empty() {
        writeln!(out, "## Categories\n")?;
        for c in &report.categories {
            writeln!(
                out,
                "- {}: {} of {} ({}) {}",
                c.name,
                money(c.real),
                money(c.target),
                pct(c.ratio),
                c.label
            )?;
        }
        writeln!(out)?;
    }

    if !report.savings.is_empty() {
        writeln!(out, "## Savings goals\n")?;
        for g in &report.savings {
            writeln!(
                out,
                "- [{}] {}: {} of {} ({}), needed by today {} [{:?}]",
                g.id,
                g.name,
                money(g.accumulated),
                money(g.target),
                pct(g.progress_fraction),
                money(g.required_to_date),
                g.status
            )?;
            writeln!(out, "  {}", g.message)?;
        }
        writeln!(out)?;
    }

    let a = &report.annual;
    writeln!(out, "## Year {}\n", a.year)?;
    writeln!(
        out,
        "Real: {} | ideal: {} | projected: {}",
        money(a.real_annual),
        money(a.ideal_annual),
        money(a.projected_annual_income)
    )?;
    if let Some(goal) = a.income_goal {
        writeln!(out, "Income goal: {} ({})", money(goal), pct(a.income_goal_ratio))?;
    }
    if let Some(goal) = a.savings_goal {
        writeln!(
            out,
            "Savings goal: {} of {} ({})",
            money(a.savings_contributed),
            money(goal),
            pct(a.savings_goal_ratio)
        )?;
    }

    Ok(out)
}
