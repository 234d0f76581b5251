pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{banner, info, section, success, summary_row, warn};
pub use table::{cursor_table, format_price, rice_table, stats_table};
pub use theme::{theme, Theme};
