//! Data module - CSV loading and per-view transforms

mod loader;
mod processor;

pub use loader::{
    LoaderError, WasteLoader, WasteRecord, WasteTable, COL_DISPOSED, COL_RECYCLED,
    COL_RECYCLING_RATE, COL_WASTE_TYPE, COL_YEAR,
};
pub use processor::{
    ProcessorError, RatePoint, RateSort, TonnageSort, TypeRate, TypeTonnage, WasteProcessor,
};
