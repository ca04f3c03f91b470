// === PUBLIC CONTRACT ===
// Pure domain models, safe for other crates to consume.
pub mod contract;

pub use contract::{Credentials, Item, NewItem, NewUser, User};

// === LAYERS ===
// domain: service, ports, errors. infra: SeaORM storage + bcrypt crypto.
// api: REST DTOs, handlers, routes, error mapping.
pub mod api;
pub mod domain;
pub mod infra;
