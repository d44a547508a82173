pub mod app;
pub mod category_handlers;
pub mod config;
pub mod item_handlers;
pub mod order_handlers;
pub mod product_handlers;
pub mod user_handlers;
pub mod validate;

pub use app::AppState;
