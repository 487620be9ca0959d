use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamingPackage {
    pub id: String,
    pub display_name: String,
    pub unit_quantity: u64,
    pub unit_price: u64,
    pub cumulative_sales_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewSubscription {
    pub id: String,
    pub customer_name: String,
    pub email: String,
    pub start_date: DateTime<Utc>,
    pub next_payment_date: DateTime<Utc>,
    pub is_paid: bool,
    pub monthly_price: u64,
}

/// One calendar day of the snack journal. `date` is the `YYYY-MM-DD` merge key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySalesRecord {
    pub id: String,
    pub date: String,
    pub packets_sold: u64,
    pub packets_cooked: u64,
    pub raw_kg_bought: u64,
    pub revenue: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtCustomer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub debt_packets: u64,
    pub is_paid: bool,
    pub date_created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSetting {
    pub unit_price: u64,
    pub last_updated: DateTime<Utc>,
}

// Validated inputs handed to the ledgers.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleEntry {
    pub packets_sold: u64,
    pub packets_cooked: u64,
    pub raw_kg_bought: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub customer_name: String,
    pub email: String,
    pub monthly_price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub debt_packets: u64,
}

/// A numeric form field as it arrives over the wire: a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct PriceRequest {
    pub price: Option<NumberInput>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub paid: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewMemberRequest {
    pub customer_name: String,
    pub email: String,
    pub monthly_price: Option<NumberInput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DailySaleRequest {
    pub packets_sold: Option<NumberInput>,
    pub packets_cooked: Option<NumberInput>,
    pub raw_kg_bought: Option<NumberInput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewCustomerRequest {
    pub name: String,
    pub phone: String,
    pub debt_packets: Option<NumberInput>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub days: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Overdue,
    Reminder,
    Current,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse<T> {
    pub applied: bool,
    pub record: Option<T>,
}

impl<T> From<Option<T>> for MutationResponse<T> {
    fn from(record: Option<T>) -> Self {
        Self {
            applied: record.is_some(),
            record,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub subscription: CrewSubscription,
    pub days_until_payment: i64,
    pub status: PaymentStatus,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamingSummary {
    pub total_revenue: u64,
    pub active_members: usize,
    pub total_packages_sold: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamingView {
    pub packages: Vec<GamingPackage>,
    pub subscriptions: Vec<SubscriptionView>,
    pub summary: GamingSummary,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    #[serde(flatten)]
    pub customer: DebtCustomer,
    pub debt_value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: String,
    pub label: String,
    pub revenue: u64,
    pub packets: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnackSummary {
    pub total_revenue: u64,
    pub total_packets_sold: u64,
    pub total_raw_kg_bought: u64,
    pub outstanding_debt_packets: u64,
    pub outstanding_debt_value: u64,
    pub unit_price: u64,
    pub last_7_days: Vec<ChartPoint>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnackView {
    pub daily_sales: Vec<DailySalesRecord>,
    pub customers: Vec<CustomerView>,
    pub price: PriceSetting,
    pub summary: SnackSummary,
}
