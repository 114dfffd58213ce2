//! egui front-end: controls, dataset preview and chart drawing.

pub mod panels;
pub mod plot;
pub mod preview;
