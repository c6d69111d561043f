pub mod board;
pub mod service;

pub use board::CategoryBoard;
pub use service::CategoryService;
