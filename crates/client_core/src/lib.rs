pub mod cart;
pub mod checkout;
pub mod config;
pub mod menu;
pub mod order_link;

pub use cart::{table_query_param, CartStore};
pub use checkout::{
    CheckoutEvent, CheckoutFlow, CheckoutOutcome, FocusProbe, Navigator, Platform,
};
pub use config::{load_settings, Settings};
pub use menu::MenuClient;
pub use order_link::{build_order_link, TransferIntent};
