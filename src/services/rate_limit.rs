use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{num::NonZeroU32, sync::Arc};

pub type LoginRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Limiter for credential-bearing endpoints (login and second factor).
///
/// Allows `burst` attempts, then refills one attempt per minute. A zero burst
/// is treated as one.
pub fn create_login_limiter(burst: u32) -> LoginRateLimiter {
    let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);
    let quota = Quota::per_minute(NonZeroU32::MIN).allow_burst(burst);
    Arc::new(RateLimiter::direct(quota))
}
