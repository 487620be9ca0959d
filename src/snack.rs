//! Snack production and sales ledger.
//!
//! Revenue is frozen onto each [`DailySalesRecord`] when the entry is made,
//! using the unit price current at that moment. Changing the price later
//! only affects entries recorded afterwards.

use crate::models::{DailySalesRecord, DebtCustomer, NewCustomer, PriceSetting, SaleEntry};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_UNIT_PRICE: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnackLedger {
    daily_sales: Vec<DailySalesRecord>,
    customers: Vec<DebtCustomer>,
    price: PriceSetting,
}

impl SnackLedger {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::from_parts(Vec::new(), Vec::new(), initial_price(now))
    }

    /// Rebuilds a ledger from stored collections, restoring the newest-first order.
    pub fn from_parts(
        mut daily_sales: Vec<DailySalesRecord>,
        customers: Vec<DebtCustomer>,
        price: PriceSetting,
    ) -> Self {
        sort_newest_first(&mut daily_sales);
        Self {
            daily_sales,
            customers,
            price,
        }
    }

    /// Journal entries, newest date first.
    pub fn daily_sales(&self) -> &[DailySalesRecord] {
        &self.daily_sales
    }

    pub fn customers(&self) -> &[DebtCustomer] {
        &self.customers
    }

    pub fn price(&self) -> &PriceSetting {
        &self.price
    }

    pub fn unit_price(&self) -> u64 {
        self.price.unit_price
    }

    /// Adds `entry` to the record for `now`'s calendar day, creating it if needed.
    /// An all-zero entry is ignored.
    pub fn record_daily_sale(
        &mut self,
        now: DateTime<Utc>,
        entry: SaleEntry,
    ) -> Option<&DailySalesRecord> {
        if entry == SaleEntry::default() {
            debug!("ignoring empty daily sale");
            return None;
        }

        let date = date_key(now.date_naive());
        let revenue = entry.packets_sold.saturating_mul(self.price.unit_price);
        info!(
            "{date}: {} sold, {} cooked, {} kg bought, revenue {revenue}",
            entry.packets_sold, entry.packets_cooked, entry.raw_kg_bought
        );

        if let Some(index) = self.daily_sales.iter().position(|sale| sale.date == date) {
            let record = &mut self.daily_sales[index];
            record.packets_sold = record.packets_sold.saturating_add(entry.packets_sold);
            record.packets_cooked = record.packets_cooked.saturating_add(entry.packets_cooked);
            record.raw_kg_bought = record.raw_kg_bought.saturating_add(entry.raw_kg_bought);
            record.revenue = record.revenue.saturating_add(revenue);
            return self.daily_sales.get(index);
        }

        self.daily_sales.push(DailySalesRecord {
            id: Uuid::new_v4().to_string(),
            date: date.clone(),
            packets_sold: entry.packets_sold,
            packets_cooked: entry.packets_cooked,
            raw_kg_bought: entry.raw_kg_bought,
            revenue,
        });
        sort_newest_first(&mut self.daily_sales);
        self.daily_sales.iter().find(|sale| sale.date == date)
    }

    /// Records a customer owing `debt_packets`. Blank names and zero debts are ignored.
    pub fn add_customer(
        &mut self,
        now: DateTime<Utc>,
        customer: NewCustomer,
    ) -> Option<&DebtCustomer> {
        if customer.name.is_empty() || customer.debt_packets == 0 {
            debug!("ignoring customer without name or debt");
            return None;
        }

        let customer = DebtCustomer {
            id: Uuid::new_v4().to_string(),
            name: customer.name,
            phone: customer.phone,
            debt_packets: customer.debt_packets,
            is_paid: false,
            date_created: now,
        };
        info!("customer {} added", customer.id);
        self.customers.push(customer);
        self.customers.last()
    }

    /// Flips the paid flag. The debt amount is kept as history either way.
    pub fn mark_customer_paid(&mut self, customer_id: &str, paid: bool) -> Option<&DebtCustomer> {
        let Some(customer) = self.customers.iter_mut().find(|c| c.id == customer_id) else {
            debug!("ignoring payment for unknown customer {customer_id}");
            return None;
        };
        customer.is_paid = paid;
        info!(
            "customer {} marked {}",
            customer.id,
            if paid { "paid" } else { "unpaid" }
        );
        Some(&*customer)
    }

    pub fn update_price(&mut self, now: DateTime<Utc>, new_price: u64) -> &PriceSetting {
        self.price = PriceSetting {
            unit_price: new_price,
            last_updated: now,
        };
        info!("packet price updated to {new_price}");
        &self.price
    }
}

pub fn initial_price(now: DateTime<Utc>) -> PriceSetting {
    PriceSetting {
        unit_price: DEFAULT_UNIT_PRICE,
        last_updated: now,
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// `YYYY-MM-DD` keys order lexically the same as chronologically.
fn sort_newest_first(records: &mut [DailySalesRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date));
}
