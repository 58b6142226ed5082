pub mod api;

pub use api::MockApi;
