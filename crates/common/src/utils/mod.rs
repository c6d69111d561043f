pub mod logging;
pub mod money;
