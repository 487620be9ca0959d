use crate::errors::StoreError;
use crate::gaming::{GamingLedger, default_catalog};
use crate::models::{
    CrewSubscription, DailySalesRecord, DebtCustomer, GamingPackage, NewCustomer, NewMember,
    PriceSetting, SaleEntry,
};
use crate::snack::{SnackLedger, initial_price};
use crate::storage::{
    GAMING_PACKAGES, GAMING_SUBSCRIPTIONS, KeyValueStore, SNACK_CUSTOMERS, SNACK_DAILY_SALES,
    SNACK_PRICE_SETTING, load_or, save_as,
};
use chrono::{DateTime, Utc};
use tracing::{error, info};

pub type DynStore = Box<dyn KeyValueStore + Send>;

/// Owns the store and both ledgers. Every mutating call updates the ledger
/// and then writes the affected collection back before returning.
///
/// A call the ledger ignores returns `Ok(None)` and writes nothing. When the
/// write fails the ledger is restored to its state before the call.
pub struct Session {
    store: DynStore,
    gaming: GamingLedger,
    snack: SnackLedger,
}

impl Session {
    /// Loads every collection once. Anything missing or unreadable starts fresh.
    pub fn hydrate(store: DynStore, now: DateTime<Utc>) -> Self {
        let gaming = GamingLedger::from_parts(
            load_or(&store, GAMING_PACKAGES, default_catalog),
            load_or(&store, GAMING_SUBSCRIPTIONS, Vec::new),
        );
        let snack = SnackLedger::from_parts(
            load_or(&store, SNACK_DAILY_SALES, Vec::new),
            load_or(&store, SNACK_CUSTOMERS, Vec::new),
            load_or(&store, SNACK_PRICE_SETTING, || initial_price(now)),
        );
        info!(
            "loaded {} subscriptions, {} sales days, {} customers",
            gaming.subscriptions().len(),
            snack.daily_sales().len(),
            snack.customers().len()
        );

        Self {
            store,
            gaming,
            snack,
        }
    }

    pub fn gaming(&self) -> &GamingLedger {
        &self.gaming
    }

    pub fn snack(&self) -> &SnackLedger {
        &self.snack
    }

    pub fn record_sale(&mut self, package_id: &str) -> Result<Option<GamingPackage>, StoreError> {
        let before = self.gaming.clone();
        let Some(package) = self.gaming.record_sale(package_id).cloned() else {
            return Ok(None);
        };
        let saved = save_as(&mut self.store, GAMING_PACKAGES, self.gaming.packages());
        restore_on_failure(&mut self.gaming, before, saved)?;
        Ok(Some(package))
    }

    pub fn edit_price(
        &mut self,
        package_id: &str,
        new_price: u64,
    ) -> Result<Option<GamingPackage>, StoreError> {
        let before = self.gaming.clone();
        let Some(package) = self.gaming.edit_price(package_id, new_price).cloned() else {
            return Ok(None);
        };
        let saved = save_as(&mut self.store, GAMING_PACKAGES, self.gaming.packages());
        restore_on_failure(&mut self.gaming, before, saved)?;
        Ok(Some(package))
    }

    pub fn add_member(
        &mut self,
        now: DateTime<Utc>,
        member: NewMember,
    ) -> Result<Option<CrewSubscription>, StoreError> {
        let before = self.gaming.clone();
        let Some(subscription) = self.gaming.add_member(now, member).cloned() else {
            return Ok(None);
        };
        let saved = save_as(&mut self.store, GAMING_SUBSCRIPTIONS, self.gaming.subscriptions());
        restore_on_failure(&mut self.gaming, before, saved)?;
        Ok(Some(subscription))
    }

    pub fn mark_payment(
        &mut self,
        now: DateTime<Utc>,
        subscription_id: &str,
        paid: bool,
    ) -> Result<Option<CrewSubscription>, StoreError> {
        let before = self.gaming.clone();
        let Some(subscription) = self
            .gaming
            .mark_payment(now, subscription_id, paid)
            .cloned()
        else {
            return Ok(None);
        };
        let saved = save_as(&mut self.store, GAMING_SUBSCRIPTIONS, self.gaming.subscriptions());
        restore_on_failure(&mut self.gaming, before, saved)?;
        Ok(Some(subscription))
    }

    pub fn record_daily_sale(
        &mut self,
        now: DateTime<Utc>,
        entry: SaleEntry,
    ) -> Result<Option<DailySalesRecord>, StoreError> {
        let before = self.snack.clone();
        let Some(record) = self.snack.record_daily_sale(now, entry).cloned() else {
            return Ok(None);
        };
        let saved = save_as(&mut self.store, SNACK_DAILY_SALES, self.snack.daily_sales());
        restore_on_failure(&mut self.snack, before, saved)?;
        Ok(Some(record))
    }

    pub fn add_customer(
        &mut self,
        now: DateTime<Utc>,
        customer: NewCustomer,
    ) -> Result<Option<DebtCustomer>, StoreError> {
        let before = self.snack.clone();
        let Some(customer) = self.snack.add_customer(now, customer).cloned() else {
            return Ok(None);
        };
        let saved = save_as(&mut self.store, SNACK_CUSTOMERS, self.snack.customers());
        restore_on_failure(&mut self.snack, before, saved)?;
        Ok(Some(customer))
    }

    pub fn mark_customer_paid(
        &mut self,
        customer_id: &str,
        paid: bool,
    ) -> Result<Option<DebtCustomer>, StoreError> {
        let before = self.snack.clone();
        let Some(customer) = self.snack.mark_customer_paid(customer_id, paid).cloned() else {
            return Ok(None);
        };
        let saved = save_as(&mut self.store, SNACK_CUSTOMERS, self.snack.customers());
        restore_on_failure(&mut self.snack, before, saved)?;
        Ok(Some(customer))
    }

    pub fn update_price(
        &mut self,
        now: DateTime<Utc>,
        new_price: u64,
    ) -> Result<PriceSetting, StoreError> {
        let before = self.snack.clone();
        let price = self.snack.update_price(now, new_price).clone();
        let saved = save_as(&mut self.store, SNACK_PRICE_SETTING, &price);
        restore_on_failure(&mut self.snack, before, saved)?;
        Ok(price)
    }
}

fn restore_on_failure<L>(
    ledger: &mut L,
    before: L,
    saved: Result<(), StoreError>,
) -> Result<(), StoreError> {
    if let Err(err) = &saved {
        error!("save failed, change rolled back: {err}");
        *ledger = before;
    }
    saved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 14, 10, 0, 0).unwrap()
    }

    fn memory_session() -> Session {
        Session::hydrate(Box::new(MemoryStore::new()), now())
    }

    #[test]
    fn fresh_session_has_catalog_and_default_price() {
        let session = memory_session();
        assert_eq!(session.gaming().packages().len(), 4);
        assert_eq!(session.snack().unit_price(), 100);
        assert_eq!(session.snack().price().last_updated, now());
    }

    #[test]
    fn mutations_survive_rehydration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut session = Session::hydrate(Box::new(FileStore::open(&path)), now());
        session.record_sale("3").unwrap();
        session.edit_price("3", 3_600).unwrap();
        let member = session
            .add_member(
                now(),
                NewMember {
                    customer_name: "Halima".to_string(),
                    email: "h@example.com".to_string(),
                    monthly_price: 900,
                },
            )
            .unwrap()
            .unwrap();
        session.mark_payment(now(), &member.id, false).unwrap();
        session
            .record_daily_sale(
                now(),
                SaleEntry {
                    packets_sold: 5,
                    packets_cooked: 6,
                    raw_kg_bought: 2,
                },
            )
            .unwrap();
        session
            .add_customer(
                now(),
                NewCustomer {
                    name: "Juma".to_string(),
                    phone: "0711".to_string(),
                    debt_packets: 4,
                },
            )
            .unwrap();
        session.update_price(now(), 130).unwrap();

        let tomorrow = now() + Duration::days(1);
        let reloaded = Session::hydrate(Box::new(FileStore::open(&path)), tomorrow);
        assert_eq!(reloaded.gaming(), session.gaming());
        assert_eq!(reloaded.snack(), session.snack());
        assert_eq!(reloaded.snack().price().last_updated, now());
    }

    #[test]
    fn ignored_calls_return_none_and_write_nothing() {
        let mut session = memory_session();
        assert!(session.record_sale("unknown").unwrap().is_none());
        assert!(session.edit_price("unknown", 5).unwrap().is_none());
        assert!(
            session
                .record_daily_sale(now(), SaleEntry::default())
                .unwrap()
                .is_none()
        );
        assert!(
            session
                .add_customer(
                    now(),
                    NewCustomer {
                        name: String::new(),
                        phone: String::new(),
                        debt_packets: 5,
                    },
                )
                .unwrap()
                .is_none()
        );
        assert!(session.store.load(GAMING_PACKAGES).is_none());
        assert!(session.store.load(SNACK_DAILY_SALES).is_none());
        assert!(session.store.load(SNACK_CUSTOMERS).is_none());
    }

    #[test]
    fn failed_save_leaves_ledgers_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("state.json");
        let mut session = Session::hydrate(Box::new(FileStore::open(&path)), now());
        let gaming_before = session.gaming().clone();
        let snack_before = session.snack().clone();

        assert!(session.record_sale("1").is_err());
        assert!(
            session
                .record_daily_sale(
                    now(),
                    SaleEntry {
                        packets_sold: 3,
                        ..SaleEntry::default()
                    },
                )
                .is_err()
        );
        assert!(session.update_price(now(), 250).is_err());

        assert_eq!(session.gaming(), &gaming_before);
        assert_eq!(session.snack(), &snack_before);
        assert!(session.store.load(GAMING_PACKAGES).is_none());
        assert!(session.store.load(SNACK_DAILY_SALES).is_none());
    }

    #[test]
    fn corrupt_collection_degrades_to_empty() {
        let mut store = MemoryStore::new();
        store.save(SNACK_CUSTOMERS, json!("garbage")).unwrap();
        store.save(GAMING_PACKAGES, json!([{ "id": 1 }])).unwrap();

        let session = Session::hydrate(Box::new(store), now());
        assert!(session.snack().customers().is_empty());
        assert_eq!(session.gaming().packages().len(), 4);
    }
}
