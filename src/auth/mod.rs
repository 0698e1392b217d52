pub mod csrf;
pub mod middleware;
