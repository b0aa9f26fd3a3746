mod interval;
mod symbol;

pub use interval::{IndicatorInterval, SeriesType};
pub use symbol::Symbol;
