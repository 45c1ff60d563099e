use colored::Colorize;

use crate::{
    config::EngineConfig,
    currency::{format_money, format_number},
    view::{BudgetSnapshot, DerivedPerDayRecord},
};

const MIN_CELL_WIDTH: usize = 10;
const CELL_GAP: &str = " ";
const CELL_LINES: usize = 5;

/// Describes how a grid cell line should be styled once padded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tone {
    Plain,
    Muted,
    Today,
    Pay,
    Assigned,
    Exhausted,
    Confirmed,
}

/// Renders a [`BudgetSnapshot`] as a week grid followed by the month summary.
pub struct GridRenderer<'a> {
    config: &'a EngineConfig,
    styled: bool,
}

impl<'a> GridRenderer<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            styled: true,
        }
    }

    /// Disables ANSI styling.
    pub fn plain(mut self) -> Self {
        self.styled = false;
        self
    }

    pub fn render(&self, snapshot: &BudgetSnapshot) -> String {
        let mut out = String::new();
        let title = format!("=== {} ===", snapshot.summary.title);
        out.push_str(&self.paint(&title, Tone::Today));
        out.push('\n');

        if snapshot.records.is_empty() {
            out.push_str("(no days to show)\n");
        } else {
            let width = self.cell_width(snapshot);
            out.push_str(&self.render_header(snapshot, width));
            out.push('\n');
            out.push_str(&"-".repeat(width * 7 + CELL_GAP.len() * 6));
            out.push('\n');
            for week in snapshot.weeks() {
                for line in self.render_week(week, width) {
                    out.push_str(line.trim_end());
                    out.push('\n');
                }
                out.push('\n');
            }
        }

        out.push_str(&self.render_summary(snapshot));
        out
    }

    fn render_header(&self, snapshot: &BudgetSnapshot, width: usize) -> String {
        snapshot
            .week_start
            .weekday_labels()
            .iter()
            .map(|label| format!("{label:>width$}"))
            .collect::<Vec<_>>()
            .join(CELL_GAP)
    }

    fn render_week(&self, week: &[DerivedPerDayRecord], width: usize) -> Vec<String> {
        let mut lines = vec![String::new(); CELL_LINES];
        for (column, record) in week.iter().enumerate() {
            for (line, (text, tone)) in lines.iter_mut().zip(self.cell_lines(record)) {
                if column > 0 {
                    line.push_str(CELL_GAP);
                }
                line.push_str(&self.paint(&format!("{text:>width$}"), tone));
            }
        }
        lines
    }

    fn cell_lines(&self, record: &DerivedPerDayRecord) -> [(String, Tone); CELL_LINES] {
        let day = &record.day;
        if day.is_padding {
            return [
                (day.day_number.to_string(), Tone::Muted),
                (String::new(), Tone::Plain),
                (String::new(), Tone::Plain),
                (String::new(), Tone::Plain),
                (String::new(), Tone::Plain),
            ];
        }

        let locale = &self.config.locale;
        let label = if day.is_today {
            (format!("*{}", day.day_number), Tone::Today)
        } else {
            (day.day_number.to_string(), Tone::Plain)
        };
        let pay = if record.pay_amount > 0.0 {
            (format!("+{}", format_number(locale, record.pay_amount)), Tone::Pay)
        } else {
            (String::new(), Tone::Plain)
        };
        let assigned = if record.assigned_amount > 0.0 {
            (
                format!("-{}", format_number(locale, record.assigned_amount)),
                Tone::Assigned,
            )
        } else {
            (String::new(), Tone::Plain)
        };
        let remaining = record.remaining_budget.unwrap_or(0.0);
        let remaining = (
            format_number(locale, remaining),
            if remaining > 0.0 {
                Tone::Plain
            } else {
                Tone::Exhausted
            },
        );
        let confirmed = match record.confirmed_spending {
            Some(spent) => (format!("={}", format_number(locale, spent)), Tone::Confirmed),
            None => (String::new(), Tone::Plain),
        };
        [label, pay, assigned, remaining, confirmed]
    }

    fn cell_width(&self, snapshot: &BudgetSnapshot) -> usize {
        snapshot
            .records
            .iter()
            .flat_map(|record| self.cell_lines(record))
            .map(|(text, _)| text.chars().count())
            .chain(
                snapshot
                    .week_start
                    .weekday_labels()
                    .iter()
                    .map(|label| label.len()),
            )
            .fold(MIN_CELL_WIDTH, usize::max)
    }

    fn render_summary(&self, snapshot: &BudgetSnapshot) -> String {
        let summary = &snapshot.summary;
        let money = |amount: f64| format_money(amount, &self.config.currency, &self.config.locale);
        let rows = [
            ("Budget", money(summary.budget_amount)),
            ("Daily budget", money(summary.daily_budget)),
            ("Total pay", money(summary.total_pay)),
            ("Total assigned", money(summary.total_assigned)),
            ("Total confirmed spending", money(summary.total_confirmed_spending)),
            ("Remaining this month", money(summary.overall_remaining)),
            (
                "Average unassigned per day",
                money(summary.average_unassigned_per_day),
            ),
        ];
        let label_width = rows.iter().map(|(label, _)| label.len() + 1).max().unwrap_or(0);
        rows.iter()
            .map(|(label, value)| format!("{:<label_width$} {value}\n", format!("{label}:")))
            .collect()
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.styled {
            return text.to_string();
        }
        match tone {
            Tone::Plain => text.to_string(),
            Tone::Muted => text.dimmed().to_string(),
            Tone::Today => text.bold().to_string(),
            Tone::Pay => text.green().to_string(),
            Tone::Assigned => text.yellow().to_string(),
            Tone::Exhausted => text.red().to_string(),
            Tone::Confirmed => text.cyan().to_string(),
        }
    }
}
