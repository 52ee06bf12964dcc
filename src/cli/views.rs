//! Text renderings of the dashboard tabs.

use chrono::NaiveDate;

use crate::cli::format::{aggregate_body, aggregate_value, display_date, money};
use crate::cli::output::{styled, MessageKind};
use crate::cli::table::{Table, TableColumn};
use crate::cli::CommandError;
use crate::config::Config;
use crate::core::services::{
    AggregateService, DealerService, FooterCell, TrancheService, TransactionService,
};
use crate::domain::{AggregateSelection, DealerSummary, NumericColumns, Transaction};
use crate::query::active_filters::{dashboard_filters, tranche_filters};
use crate::query::{ActiveFilter, ActiveFilterOptions, DashboardParams, Tab, TrancheParams};
use crate::storage::Dataset;

type ViewResult = Result<String, CommandError>;

/// Everything a view needs besides its query parameters.
pub struct ViewContext<'a> {
    pub dataset: &'a Dataset,
    pub today: NaiveDate,
    pub config: &'a Config,
}

impl ViewContext<'_> {
    fn filter_options(&self) -> ActiveFilterOptions {
        ActiveFilterOptions {
            legacy_full_year_default: self.config.legacy_full_year_default,
        }
    }

    fn money(&self, value: f64) -> String {
        money(value, &self.config.currency)
    }
}

fn chips_line(chips: &[ActiveFilter]) -> Option<String> {
    if chips.is_empty() {
        return None;
    }
    let parts: Vec<String> = chips
        .iter()
        .map(|chip| format!("{}: {}", chip.label, chip.value))
        .collect();
    Some(format!("Filters: {}", parts.join(" | ")))
}

/// Places footer cells under the table columns they belong to. `positions`
/// maps row column ids to table column indexes.
fn footer_row(
    cells: &[FooterCell],
    positions: &[(&str, usize, bool)],
    width: usize,
    currency: &str,
) -> Option<Vec<String>> {
    if cells.is_empty() {
        return None;
    }
    let mut row = vec![String::new(); width];
    for cell in cells {
        if let Some((_, idx, is_money)) = positions.iter().find(|(id, _, _)| *id == cell.column_id)
        {
            row[*idx] = aggregate_value(cell.kind, cell.value, *is_money, currency);
        }
    }
    Some(row)
}

fn selection_for(params: &DashboardParams) -> AggregateSelection {
    params.aggregate_selection().selection
}

pub fn dashboard(ctx: &ViewContext<'_>, params: &DashboardParams) -> ViewResult {
    match params.tab {
        Tab::Transactions => transactions(ctx, params),
        Tab::Dealers => dealers(ctx, params),
    }
}

pub fn transactions(ctx: &ViewContext<'_>, params: &DashboardParams) -> ViewResult {
    let filter = params.transaction_filter()?;
    let rows = TransactionService::filter(&ctx.dataset.transactions, &filter);

    let mut table = Table::new(vec![
        TableColumn::left("Date"),
        TableColumn::left("Dealer").max_width(24),
        TableColumn::left("Grower").max_width(24),
        TableColumn::left("Type"),
        TableColumn::right("Amount Drawn"),
        TableColumn::right("Interest Accrued"),
        TableColumn::right("CFI Margin"),
    ]);
    for txn in &rows {
        table.push_row(vec![
            display_date(txn.posted_at),
            txn.dealer_name.clone(),
            txn.grower_name.clone(),
            txn.transaction_type.label().to_string(),
            ctx.money(txn.amount_drawn),
            ctx.money(txn.interest_accrued),
            ctx.money(txn.cfi_margin),
        ]);
    }
    let footer = AggregateService::footer(rows.iter().copied(), &selection_for(params));
    let positions = [
        (Transaction::AMOUNT_DRAWN, 4, true),
        (Transaction::INTEREST_ACCRUED, 5, true),
        (Transaction::CFI_MARGIN, 6, true),
    ];
    if let Some(row) = footer_row(&footer, &positions, 7, &ctx.config.currency) {
        table.push_footer(row);
    }

    let mut lines = vec![
        styled(MessageKind::Section, "Transactions"),
        format!(
            "Showing {} of {} transactions",
            rows.len(),
            ctx.dataset.transactions.len()
        ),
    ];
    lines.extend(chips_line(&dashboard_filters(
        params,
        &filter.date_range,
        ctx.filter_options(),
    )));
    lines.push(table.render());
    Ok(lines.join("\n"))
}

pub fn dealers(ctx: &ViewContext<'_>, params: &DashboardParams) -> ViewResult {
    let date_range = params.date_range()?;
    let summaries = DealerService::summarize_view(
        &ctx.dataset.transactions,
        &date_range,
        &params.dealer_filter,
    );

    let mut table = Table::new(vec![
        TableColumn::left("Dealer").max_width(24),
        TableColumn::right("Transactions"),
        TableColumn::right("Total Drawn"),
        TableColumn::right("Total Interest"),
        TableColumn::right("Total Margin"),
        TableColumn::left("First"),
        TableColumn::left("Last"),
    ]);
    for summary in &summaries {
        table.push_row(vec![
            summary.dealer_name.clone(),
            summary.transaction_count.to_string(),
            ctx.money(summary.total_amount_drawn),
            ctx.money(summary.total_interest_accrued),
            ctx.money(summary.total_cfi_margin),
            display_date(summary.first_transaction_date),
            display_date(summary.last_transaction_date),
        ]);
    }
    let footer = AggregateService::footer(&summaries, &selection_for(params));
    let positions = [
        (DealerSummary::TRANSACTION_COUNT, 1, false),
        (DealerSummary::TOTAL_AMOUNT_DRAWN, 2, true),
        (DealerSummary::TOTAL_INTEREST_ACCRUED, 3, true),
        (DealerSummary::TOTAL_CFI_MARGIN, 4, true),
    ];
    if let Some(row) = footer_row(&footer, &positions, 7, &ctx.config.currency) {
        table.push_footer(row);
    }

    // The dealers tab ignores grower and type, so only dealer and date chips apply.
    let scoped = DashboardParams {
        dealer_filter: params.dealer_filter.clone(),
        ..DashboardParams::default()
    };
    let mut lines = vec![
        styled(MessageKind::Section, "Dealers"),
        format!("{} dealers", summaries.len()),
    ];
    lines.extend(chips_line(&dashboard_filters(
        &scoped,
        &date_range,
        ctx.filter_options(),
    )));
    lines.push(table.render());
    Ok(lines.join("\n"))
}

pub fn tranches(ctx: &ViewContext<'_>, params: &TrancheParams) -> ViewResult {
    let tranches = &ctx.dataset.tranches;
    let rows = TrancheService::filter_tranches(tranches, &params.tranche_filter(), ctx.today);

    let mut table = Table::new(vec![
        TableColumn::left("Label").max_width(28),
        TableColumn::left("Dealer").max_width(24),
        TableColumn::left("Status"),
        TableColumn::right("Terms"),
        TableColumn::left("Start"),
        TableColumn::left("End"),
        TableColumn::left("Retailer Rate"),
        TableColumn::left("Grower Rate"),
    ]);
    for tranche in &rows {
        let (start, end) = match tranche.date_span() {
            Some((start, end)) => (display_date(start), display_date(end)),
            None => ("--".to_string(), "--".to_string()),
        };
        let (retailer, grower) = match tranche.primary_rates() {
            Some((retailer, grower)) => (retailer.to_string(), grower.to_string()),
            None => ("--".to_string(), "--".to_string()),
        };
        table.push_row(vec![
            tranche.label.clone(),
            tranche.dealer.name.clone(),
            TrancheService::tranche_status(tranche, ctx.today).to_string(),
            tranche.tranche_terms.len().to_string(),
            start,
            end,
            retailer,
            grower,
        ]);
    }

    let mut lines = vec![
        styled(MessageKind::Section, "Tranches"),
        format!(
            "Showing {} of {} tranches as of {}",
            rows.len(),
            tranches.len(),
            display_date(ctx.today)
        ),
    ];
    lines.extend(chips_line(&tranche_filters(params)));
    lines.push(table.render());
    Ok(lines.join("\n"))
}

pub fn terms(ctx: &ViewContext<'_>, params: &TrancheParams) -> ViewResult {
    let tranches = &ctx.dataset.tranches;
    let rows = TrancheService::filter_terms(tranches, &params.term_filter(), ctx.today);

    let mut table = Table::new(vec![
        TableColumn::left("Term"),
        TableColumn::left("Tranche").max_width(28),
        TableColumn::left("Status"),
        TableColumn::left("Start"),
        TableColumn::left("End"),
        TableColumn::left("On Board"),
        TableColumn::left("Retailer Rate"),
        TableColumn::left("Grower Rate"),
    ]);
    for term in &rows {
        table.push_row(vec![
            term.id.clone(),
            TrancheService::tranche_label(tranches, &term.tranche_id).to_string(),
            TrancheService::term_status(term, ctx.today).to_string(),
            display_date(term.start_date),
            display_date(term.end_date),
            display_date(term.on_board_date),
            term.retailer_rate.to_string(),
            term.grower_rate.to_string(),
        ]);
    }

    let mut lines = vec![
        styled(MessageKind::Section, "Terms"),
        format!(
            "Showing {} of {} terms as of {}",
            rows.len(),
            TrancheService::all_terms(tranches).len(),
            display_date(ctx.today)
        ),
    ];
    lines.extend(chips_line(&tranche_filters(params)));
    lines.push(table.render());
    Ok(lines.join("\n"))
}

pub fn aggregates(encoded: &str) -> String {
    let decoded = AggregateService::decode(encoded);
    let mut lines = Vec::new();
    if decoded.selection.is_empty() {
        lines.push("No aggregates selected".to_string());
    } else {
        let mut table = Table::new(vec![
            TableColumn::left("Column"),
            TableColumn::left("Aggregate"),
        ]);
        for (column, kind) in decoded.selection.iter() {
            table.push_row(vec![column.to_string(), kind.label().to_string()]);
        }
        lines.push(table.render());
        lines.push(format!("Encoded: {}", decoded.selection.encode()));
    }
    for ignored in &decoded.ignored {
        lines.push(styled(
            MessageKind::Warning,
            format!("ignored `{}`: {}", ignored.token, ignored.reason),
        ));
    }
    lines.join("\n")
}

pub fn stats(ctx: &ViewContext<'_>, column: &str, params: &DashboardParams) -> ViewResult {
    if !Transaction::COLUMN_IDS.iter().any(|id| *id == column) {
        return Err(CommandError::InvalidArguments(format!(
            "unknown column `{}` (expected one of: {})",
            column,
            Transaction::COLUMN_IDS.join(", ")
        )));
    }
    let filter = params.transaction_filter()?;
    let rows = TransactionService::filter(&ctx.dataset.transactions, &filter);
    let values = Transaction::column(rows.iter().copied(), column);

    let mut table = Table::new(vec![TableColumn::left("Aggregate"), TableColumn::right("Value")]);
    for (kind, value) in AggregateService::preview(&values) {
        table.push_row(vec![
            kind.label().to_string(),
            aggregate_body(kind, value, true, &ctx.config.currency),
        ]);
    }
    Ok(format!(
        "{}\n{} over {} transactions\n{}",
        styled(MessageKind::Section, format!("Stats: {column}")),
        column,
        rows.len(),
        table.render()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::output::{set_preferences, OutputPreferences};
    use crate::storage::{DataSource, SampleDataSource};

    fn render<F>(query: &str, view: F) -> String
    where
        F: Fn(&ViewContext<'_>, &DashboardParams) -> ViewResult,
    {
        set_preferences(OutputPreferences { plain_mode: true });
        let dataset = SampleDataSource.load().unwrap();
        let config = Config::default();
        let ctx = ViewContext {
            dataset: &dataset,
            today: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            config: &config,
        };
        view(&ctx, &DashboardParams::parse(query).unwrap()).unwrap()
    }

    #[test]
    fn transactions_view_lists_matches_and_footer() {
        let out = render("dealerFilter=harvest&aggregates=amountDrawn:sum", transactions);
        assert!(out.contains("Showing 3 of 8 transactions"));
        assert!(out.contains("Filters: Dealer: harvest"));
        assert!(out.contains("Sum: $"));
        assert!(!out.contains("Green Valley Farms"));
    }

    #[test]
    fn dealers_view_groups_sample_data() {
        let out = render("tab=dealers&growerFilter=nobody", dealers);
        assert!(out.contains("3 dealers"));
        assert!(out.contains("Sunrise Agriculture"));
        assert!(!out.contains("Grower"));
    }

    #[test]
    fn stats_rejects_unknown_columns() {
        set_preferences(OutputPreferences { plain_mode: true });
        let dataset = Dataset::default();
        let config = Config::default();
        let ctx = ViewContext {
            dataset: &dataset,
            today: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            config: &config,
        };
        let err = stats(&ctx, "grower", &DashboardParams::default()).unwrap_err();
        assert!(err.to_string().contains("amountDrawn"));
    }

    #[test]
    fn aggregates_view_reports_ignored_tokens() {
        set_preferences(OutputPreferences { plain_mode: true });
        let out = aggregates("amountDrawn:sum,cfiMargin:median,oops");
        assert!(out.contains("Encoded: amountDrawn:sum"));
        assert!(out.contains("[!] ignored `cfiMargin:median`: unknown aggregate kind"));
        assert!(out.contains("[!] ignored `oops`: missing `:` separator"));
    }
}
