// handlers/mod.rs - HTTP handlers grouped by surface
//
// public:  service info and liveness (/, /health)
// catalog: list, detail, create and delete views under /catalog
//
// Handlers stay thin: parse the request, call into services, and shape the
// result with api::views. Errors convert into ApiError via `?`.
pub mod catalog;
pub mod public;
