pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Command};

pub use crate::config::AppConfig;
pub use crate::core::{
    context::AppContext,
    controller::{MolluskController, ViewState},
    resource::HttpResource,
    template::UrlTemplate,
};
pub use crate::domain::model::{Mollusk, MolluskId};
pub use crate::domain::ports::Resource;
pub use crate::utils::error::{MolluskError, Result};
