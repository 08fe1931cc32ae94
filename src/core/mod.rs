//! Converter logic, independent of any terminal or HTTP details

pub mod config;
pub mod conversion;
pub mod currency;
pub mod dates;
pub mod history;
pub mod log;
pub mod metadata;
pub mod money;
pub mod picker;
pub mod prefs;
pub mod session;
pub mod view;

// Re-export main types for cleaner imports
pub use conversion::{ConversionResult, ConversionStatus};
pub use currency::{CurrencyCode, Pair, RateProvider};
pub use history::{HistoryPeriod, HistoryToggle};
pub use picker::Side;
pub use prefs::{PreferenceStore, Theme};
pub use session::Session;
pub use view::{View, ViewState};
