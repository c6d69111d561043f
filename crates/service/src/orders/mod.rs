//! Incoming-order board: fetch, map to dashboard cards, poll.

pub mod board;
pub mod dashboard;
pub mod poller;
pub mod service;

pub use board::{FetchOutcome, OrderBoard};
pub use dashboard::{BoardColumn, ColumnMeta, DashboardOrder, OrderFilter};
pub use poller::{OrderPoller, PollTarget};
pub use service::OrderService;
