//! HTTP request handlers for the portal
//!
//! Page handlers render askama templates; `api` serves the JSON surface.

pub mod api;
pub mod auth;
pub mod dashboard;
pub mod forms;
pub mod pages;
pub mod types;

pub use api::*;
pub use auth::*;
pub use dashboard::*;
pub use forms::*;
pub use pages::*;

pub use types::*;
