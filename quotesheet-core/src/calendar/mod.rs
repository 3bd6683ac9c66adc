mod holidays;
mod horizon;
mod resolver;
mod window;

pub use holidays::{HolidayCalendar, HolidaySet};
pub use horizon::ReturnHorizonPlanner;
pub use resolver::{TradingDate, TradingDayResolver};
pub use window::FetchWindow;
