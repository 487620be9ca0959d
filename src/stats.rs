use crate::gaming::{GamingLedger, days_until_payment, payment_status};
use crate::models::{
    ChartPoint, CustomerView, DailySalesRecord, DebtCustomer, GamingSummary, GamingView,
    SnackSummary, SnackView, SubscriptionView,
};
use crate::snack::SnackLedger;
use chrono::{DateTime, NaiveDate, Utc};

pub const HISTORY_DAYS: usize = 7;

pub fn build_gaming_view(ledger: &GamingLedger, now: DateTime<Utc>) -> GamingView {
    let subscriptions = ledger
        .subscriptions()
        .iter()
        .map(|sub| {
            let days_until = days_until_payment(sub, now);
            SubscriptionView {
                subscription: sub.clone(),
                days_until_payment: days_until,
                status: payment_status(days_until),
            }
        })
        .collect();

    GamingView {
        packages: ledger.packages().to_vec(),
        subscriptions,
        summary: GamingSummary {
            total_revenue: ledger.total_revenue(),
            active_members: ledger.subscriptions().len(),
            total_packages_sold: ledger.total_packages_sold(),
        },
    }
}

pub fn build_snack_view(ledger: &SnackLedger) -> SnackView {
    let unit_price = ledger.unit_price();
    let customers = ledger
        .customers()
        .iter()
        .map(|customer| CustomerView {
            customer: customer.clone(),
            debt_value: customer.debt_packets.saturating_mul(unit_price),
        })
        .collect();

    SnackView {
        daily_sales: ledger.daily_sales().to_vec(),
        customers,
        price: ledger.price().clone(),
        summary: build_snack_summary(ledger),
    }
}

pub fn build_snack_summary(ledger: &SnackLedger) -> SnackSummary {
    let sales = ledger.daily_sales();
    let customers = ledger.customers();
    SnackSummary {
        total_revenue: total_revenue(sales),
        total_packets_sold: total_packets_sold(sales),
        total_raw_kg_bought: total_raw_kg_bought(sales),
        outstanding_debt_packets: outstanding_debt_packets(customers),
        outstanding_debt_value: outstanding_debt_value(customers, ledger.unit_price()),
        unit_price: ledger.unit_price(),
        last_7_days: recent_history(sales, HISTORY_DAYS),
    }
}

/// Sum of the revenue frozen on each record.
pub fn total_revenue(sales: &[DailySalesRecord]) -> u64 {
    sum_by(sales, |sale| sale.revenue)
}

pub fn total_packets_sold(sales: &[DailySalesRecord]) -> u64 {
    sum_by(sales, |sale| sale.packets_sold)
}

pub fn total_raw_kg_bought(sales: &[DailySalesRecord]) -> u64 {
    sum_by(sales, |sale| sale.raw_kg_bought)
}

pub fn outstanding_debt_packets(customers: &[DebtCustomer]) -> u64 {
    customers
        .iter()
        .filter(|customer| !customer.is_paid)
        .fold(0u64, |sum, customer| sum.saturating_add(customer.debt_packets))
}

/// Valued at today's price, unlike the frozen per-day revenue.
pub fn outstanding_debt_value(customers: &[DebtCustomer], unit_price: u64) -> u64 {
    outstanding_debt_packets(customers).saturating_mul(unit_price)
}

/// The `n` most recent days, oldest first.
pub fn recent_history(sales: &[DailySalesRecord], n: usize) -> Vec<ChartPoint> {
    let mut newest: Vec<&DailySalesRecord> = sales.iter().collect();
    newest.sort_by(|a, b| b.date.cmp(&a.date));
    newest.truncate(n);

    newest
        .into_iter()
        .rev()
        .map(|sale| ChartPoint {
            date: sale.date.clone(),
            label: chart_label(&sale.date),
            revenue: sale.revenue,
            packets: sale.packets_sold,
        })
        .collect()
}

fn chart_label(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(day) => day.format("%b %-d").to_string(),
        Err(_) => date.to_string(),
    }
}

fn sum_by(sales: &[DailySalesRecord], field: impl Fn(&DailySalesRecord) -> u64) -> u64 {
    sales
        .iter()
        .fold(0u64, |sum, sale| sum.saturating_add(field(sale)))
}
