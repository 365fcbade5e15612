//! Front-end data types.

mod route;

pub use route::AppRoute;
