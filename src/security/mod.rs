pub mod client_ip;
pub mod rate_limit;
pub mod spam;

pub use client_ip::{client_ip, is_local_ip};
pub use rate_limit::{RateLimiter, RateLimits};
pub use spam::detect_spam;
