/// Clients for the upstream JMA `bosai` API.
///
/// Submodules:
/// - `jma` — region directory and forecast document retrieval and parsing.

pub mod jma;
