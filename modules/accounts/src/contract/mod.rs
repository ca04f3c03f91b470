pub mod model;

pub use model::{Credentials, Item, NewItem, NewUser, User};
