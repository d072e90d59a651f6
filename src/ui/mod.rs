pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{error, header, info, phase, section, success, summary_row, timing, warn};
pub use progress::{LogWriter, Spinner};
pub use table::{TableBuilder, render_rows};
pub use theme::{theme, Theme};
