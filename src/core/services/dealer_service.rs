use std::collections::HashMap;

use crate::core::services::transaction_service::contains_ignore_case;
use crate::domain::date_range::DateRange;
use crate::domain::dealer::DealerSummary;
use crate::domain::transaction::Transaction;

pub struct DealerService;

impl DealerService {
    /// Rolls transactions up into one summary per dealer name, in the order
    /// dealers are first seen.
    pub fn summarize<'a, I>(transactions: I) -> Vec<DealerSummary>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut positions: HashMap<&'a str, usize> = HashMap::new();
        let mut summaries: Vec<DealerSummary> = Vec::new();

        for txn in transactions {
            match positions.get(txn.dealer_name.as_str()) {
                Some(&idx) => summaries[idx].absorb(txn),
                None => {
                    positions.insert(txn.dealer_name.as_str(), summaries.len());
                    summaries.push(DealerSummary::from_transaction(txn));
                }
            }
        }

        tracing::debug!(dealers = summaries.len(), "summarized transactions by dealer");
        summaries
    }

    /// Dealer tab view: only the date range and dealer-name filter apply.
    pub fn summarize_view(
        transactions: &[Transaction],
        date_range: &DateRange,
        dealer_filter: &str,
    ) -> Vec<DealerSummary> {
        Self::summarize(transactions.iter().filter(|txn| {
            date_range.contains(txn.posted_at)
                && contains_ignore_case(&txn.dealer_name, dealer_filter)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::TransactionType;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(id: &str, dealer: &str, amount: f64, posted_at: NaiveDate) -> Transaction {
        Transaction::new(
            id,
            dealer,
            "Grower",
            posted_at,
            TransactionType::PrincipalPayment,
            amount,
            amount / 20.0,
            amount / 40.0,
        )
    }

    #[test]
    fn groups_by_dealer_in_first_seen_order() {
        let txns = vec![
            txn("1", "A", 100.0, date(2024, 3, 1)),
            txn("2", "A", 50.0, date(2024, 1, 1)),
            txn("3", "B", 30.0, date(2024, 2, 1)),
        ];
        let summaries = DealerService::summarize(&txns);
        assert_eq!(summaries.len(), 2);

        assert_eq!(summaries[0].dealer_name, "A");
        assert_eq!(summaries[0].transaction_count, 2);
        assert_eq!(summaries[0].total_amount_drawn, 150.0);
        assert_eq!(summaries[0].total_interest_accrued, 7.5);
        assert_eq!(summaries[0].first_transaction_date, date(2024, 1, 1));
        assert_eq!(summaries[0].last_transaction_date, date(2024, 3, 1));

        assert_eq!(summaries[1].dealer_name, "B");
        assert_eq!(summaries[1].transaction_count, 1);
        assert_eq!(summaries[1].total_amount_drawn, 30.0);
    }

    #[test]
    fn empty_input_yields_no_summaries() {
        assert!(DealerService::summarize(&Vec::<Transaction>::new()).is_empty());
    }

    #[test]
    fn view_ignores_everything_but_dates_and_dealer() {
        let txns = vec![
            txn("1", "Green Valley Farms", 100.0, date(2024, 3, 1)),
            txn("2", "Harvest Co", 50.0, date(2024, 3, 2)),
            txn("3", "Green Valley Farms", 30.0, date(2023, 2, 1)),
        ];
        let range = DateRange::between(date(2024, 1, 1), date(2024, 12, 31));
        let summaries = DealerService::summarize_view(&txns, &range, "green");
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].transaction_count, 1);
        assert_eq!(summaries[0].total_amount_drawn, 100.0);
    }
}
