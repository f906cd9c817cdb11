/// Forecast extraction for the selected region.
///
/// Submodules:
/// - `resolve` — matches area entries of a fetched forecast document to the
///   selected region code and pulls out aligned weather and temperature series.

pub mod resolve;
