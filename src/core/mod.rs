pub mod context;
pub mod controller;
pub mod resource;
pub mod template;

pub use crate::domain::model::{Mollusk, MolluskId};
pub use crate::domain::ports::{ConfigProvider, Resource};
pub use crate::utils::error::Result;
