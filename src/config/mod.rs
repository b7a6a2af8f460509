//! Configuration module
//!
//! Handles the local team, region catalogue, generation tuning and the
//! challenge compatibility matrix.

pub mod settings;

pub use settings::{
    BoardSettings, DuplicationRule, GenerationSettings, KindWeight, RegionCatalog, RegionInfo,
    Settings,
};
