//! Mapping of backend orders onto the three-column kitchen board.

use chrono::{DateTime, FixedOffset};
use common::utils::money::format_brl;
use models::order::{BackendOrder, OrderAddress, OrderStatus};

const CUSTOMER_FALLBACK: &str = "Cliente";
const PAYMENT_FALLBACK: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BoardColumn {
    Analysis,
    Production,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMeta {
    pub title: &'static str,
    pub action_label: &'static str,
}

impl BoardColumn {
    pub const ALL: [BoardColumn; 3] = [BoardColumn::Analysis, BoardColumn::Production, BoardColumn::Ready];

    /// Finished, canceled and unrecognised orders all land in `Ready`.
    pub fn from_status(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Created | OrderStatus::Confirmed => BoardColumn::Analysis,
            OrderStatus::Preparing => BoardColumn::Production,
            OrderStatus::OutForDelivery
            | OrderStatus::ReadyForPickup
            | OrderStatus::Completed
            | OrderStatus::Canceled
            | OrderStatus::Unknown => BoardColumn::Ready,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoardColumn::Analysis => "ANALYSIS",
            BoardColumn::Production => "PRODUCTION",
            BoardColumn::Ready => "READY",
        }
    }

    pub fn meta(&self) -> ColumnMeta {
        match self {
            BoardColumn::Analysis => ColumnMeta { title: "Em análise", action_label: "Aceitar pedido" },
            BoardColumn::Production => ColumnMeta { title: "Em produção", action_label: "Avançar pedido" },
            BoardColumn::Ready => ColumnMeta { title: "Prontos para entrega", action_label: "Escolher entregador" },
        }
    }
}

/// One order card, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardOrder {
    pub id: String,
    pub created_at: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub address: Option<String>,
    pub total: String,
    pub payment: String,
    pub column: BoardColumn,
}

impl DashboardOrder {
    /// `offset` is the local timezone used for the `HH:MM` creation time.
    pub fn from_backend(order: &BackendOrder, offset: &FixedOffset) -> Self {
        let customer = order.customer.as_ref();
        Self {
            id: display_id(&order.id),
            created_at: local_time(&order.created_at, offset),
            customer_name: customer
                .and_then(|c| non_empty(c.name.as_deref()))
                .unwrap_or(CUSTOMER_FALLBACK)
                .to_string(),
            customer_phone: customer.and_then(|c| non_empty(c.phone.as_deref())).map(str::to_string),
            address: order.address.as_ref().and_then(address_line),
            total: format_brl(order.total_cents),
            payment: order
                .payment_method
                .as_ref()
                .map(|p| p.as_str())
                .unwrap_or(PAYMENT_FALLBACK)
                .to_string(),
            column: BoardColumn::from_status(order.status),
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.is_empty())
}

/// Long ids are shortened to `#` plus their first six characters.
pub fn display_id(id: &str) -> String {
    if id.chars().count() > 8 {
        let head: String = id.chars().take(6).collect();
        format!("#{head}")
    } else if id.starts_with('#') {
        id.to_string()
    } else {
        format!("#{id}")
    }
}

fn local_time(raw: &str, offset: &FixedOffset) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.with_timezone(offset).format("%H:%M").to_string(),
        Err(_) => String::new(),
    }
}

pub fn address_line(address: &OrderAddress) -> Option<String> {
    let parts: Vec<&str> = [&address.street, &address.number, &address.neighborhood, &address.city]
        .into_iter()
        .filter_map(|p| non_empty(p.as_deref()))
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(format!("Delivery: {}", parts.join(", ")))
}

/// Case-insensitive search over the display id and the customer name/phone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub search: String,
    pub order_number: String,
}

impl OrderFilter {
    pub fn matches(&self, order: &DashboardOrder) -> bool {
        let number = self.order_number.trim().to_lowercase();
        let search = self.search.trim().to_lowercase();

        let matches_number = number.is_empty() || order.id.to_lowercase().contains(&number);
        let matches_search = search.is_empty()
            || order.customer_name.to_lowercase().contains(&search)
            || order
                .customer_phone
                .as_deref()
                .is_some_and(|p| p.to_lowercase().contains(&search));
        matches_number && matches_search
    }

    pub fn apply(&self, orders: &[DashboardOrder]) -> Vec<DashboardOrder> {
        orders.iter().filter(|o| self.matches(o)).cloned().collect()
    }
}

/// Orders split per column, in board order. Empty columns are kept.
pub fn group_by_column(orders: &[DashboardOrder]) -> Vec<(BoardColumn, Vec<DashboardOrder>)> {
    BoardColumn::ALL
        .into_iter()
        .map(|col| (col, orders.iter().filter(|o| o.column == col).cloned().collect()))
        .collect()
}
