//! Gaming-currency reseller ledger: a fixed package catalog with sale
//! counters, and a roster of monthly crew subscriptions.
//!
//! Package revenue is never stored. It is recomputed as
//! `cumulative_sales_count * unit_price` at read time, so a price edit
//! re-values every sale already counted.

use crate::models::{CrewSubscription, GamingPackage, NewMember, PaymentStatus};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

/// Flat amount each paid subscription contributes to [`GamingLedger::total_revenue`].
///
/// This is not the subscription's own `monthly_price`; the two can disagree
/// once a member is added at a custom price.
pub const SUBSCRIPTION_FEE: u64 = 800;
pub const DEFAULT_MONTHLY_PRICE: u64 = 800;
pub const BILLING_CYCLE_DAYS: i64 = 30;
pub const REMINDER_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamingLedger {
    packages: Vec<GamingPackage>,
    subscriptions: Vec<CrewSubscription>,
}

impl Default for GamingLedger {
    fn default() -> Self {
        Self::from_parts(default_catalog(), Vec::new())
    }
}

impl GamingLedger {
    pub fn from_parts(packages: Vec<GamingPackage>, subscriptions: Vec<CrewSubscription>) -> Self {
        Self {
            packages,
            subscriptions,
        }
    }

    pub fn packages(&self) -> &[GamingPackage] {
        &self.packages
    }

    pub fn subscriptions(&self) -> &[CrewSubscription] {
        &self.subscriptions
    }

    /// Counts one sale of `package_id`. Unknown ids change nothing.
    pub fn record_sale(&mut self, package_id: &str) -> Option<&GamingPackage> {
        let Some(package) = self.packages.iter_mut().find(|pkg| pkg.id == package_id) else {
            debug!("ignoring sale for unknown package {package_id}");
            return None;
        };
        package.cumulative_sales_count = package.cumulative_sales_count.saturating_add(1);
        info!(
            "sold {} ({} total)",
            package.display_name, package.cumulative_sales_count
        );
        Some(&*package)
    }

    pub fn edit_price(&mut self, package_id: &str, new_price: u64) -> Option<&GamingPackage> {
        let Some(package) = self.packages.iter_mut().find(|pkg| pkg.id == package_id) else {
            debug!("ignoring price edit for unknown package {package_id}");
            return None;
        };
        package.unit_price = new_price;
        info!("{} now priced at {new_price}", package.display_name);
        Some(&*package)
    }

    /// Enrolls a paid member whose first renewal falls one billing cycle from `now`.
    /// Blank names or emails are ignored.
    pub fn add_member(
        &mut self,
        now: DateTime<Utc>,
        member: NewMember,
    ) -> Option<&CrewSubscription> {
        if member.customer_name.is_empty() || member.email.is_empty() {
            debug!("ignoring crew member without name or email");
            return None;
        }

        let subscription = CrewSubscription {
            id: Uuid::new_v4().to_string(),
            customer_name: member.customer_name,
            email: member.email,
            start_date: now,
            next_payment_date: now + Duration::days(BILLING_CYCLE_DAYS),
            is_paid: true,
            monthly_price: member.monthly_price,
        };
        info!("crew subscription {} added", subscription.id);
        self.subscriptions.push(subscription);
        self.subscriptions.last()
    }

    /// Sets the paid flag. Going from unpaid to paid renews the subscription
    /// for a full cycle from `now`; marking unpaid keeps the due date.
    pub fn mark_payment(
        &mut self,
        now: DateTime<Utc>,
        subscription_id: &str,
        paid: bool,
    ) -> Option<&CrewSubscription> {
        let Some(subscription) = self
            .subscriptions
            .iter_mut()
            .find(|sub| sub.id == subscription_id)
        else {
            debug!("ignoring payment for unknown subscription {subscription_id}");
            return None;
        };

        if paid && !subscription.is_paid {
            subscription.next_payment_date = now + Duration::days(BILLING_CYCLE_DAYS);
        }
        subscription.is_paid = paid;
        info!(
            "subscription {} marked {}",
            subscription.id,
            if paid { "paid" } else { "unpaid" }
        );
        Some(&*subscription)
    }

    pub fn total_revenue(&self) -> u64 {
        let package_revenue = self.packages.iter().fold(0u64, |sum, pkg| {
            sum.saturating_add(pkg.cumulative_sales_count.saturating_mul(pkg.unit_price))
        });
        let paid_members = self.subscriptions.iter().filter(|sub| sub.is_paid).count() as u64;
        package_revenue.saturating_add(paid_members.saturating_mul(SUBSCRIPTION_FEE))
    }

    pub fn total_packages_sold(&self) -> u64 {
        self.packages
            .iter()
            .fold(0u64, |sum, pkg| sum.saturating_add(pkg.cumulative_sales_count))
    }
}

/// Whole days until the next payment is due, rounded up. Negative when overdue.
pub fn days_until_payment(subscription: &CrewSubscription, now: DateTime<Utc>) -> i64 {
    let remaining = (subscription.next_payment_date - now).num_milliseconds();
    let day = Duration::days(1).num_milliseconds();
    -(-remaining).div_euclid(day)
}

pub fn payment_status(days_until: i64) -> PaymentStatus {
    if days_until < 0 {
        PaymentStatus::Overdue
    } else if days_until <= REMINDER_WINDOW_DAYS {
        PaymentStatus::Reminder
    } else {
        PaymentStatus::Current
    }
}

pub fn default_catalog() -> Vec<GamingPackage> {
    [
        ("1", "1,000 V-Bucks", 1_000, 800),
        ("2", "2,800 V-Bucks", 2_800, 2_000),
        ("3", "5,000 V-Bucks", 5_000, 3_500),
        ("4", "13,500 V-Bucks", 13_500, 8_000),
    ]
    .into_iter()
    .map(|(id, name, quantity, price)| GamingPackage {
        id: id.to_string(),
        display_name: name.to_string(),
        unit_quantity: quantity,
        unit_price: price,
        cumulative_sales_count: 0,
    })
    .collect()
}
