//! # kidsafe
//!
//! The children's-safety site: page views, the route table, the shared store
//! and the bootstrap that mounts them on [`kidsafe_router`].

pub mod app;
pub mod config;
pub mod routes;
pub mod store;
pub mod views;

pub use app::App;
pub use config::Config;
pub use store::Store;
pub use views::ViewModule;
