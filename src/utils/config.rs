use std::env;

/// Tunables for seat claiming. Defaults match the deployed policy; both can
/// be overridden from the environment at startup.
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    /// Hard cap on seats per booking, checked before any storage access.
    pub max_seats_per_booking: usize,
    /// Attempts for the optimistic claim loop before giving up with a
    /// SeatConflict.
    pub claim_max_retries: u32,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        BookingPolicy {
            max_seats_per_booking: 5,
            claim_max_retries: 3,
        }
    }
}

impl BookingPolicy {
    pub fn from_env() -> Self {
        let mut policy = BookingPolicy::default();
        if let Ok(value) = env::var("MAX_SEATS_PER_BOOKING") {
            if let Ok(cap) = value.parse() {
                policy.max_seats_per_booking = cap;
            }
        }
        if let Ok(value) = env::var("SEAT_CLAIM_MAX_RETRIES") {
            if let Ok(retries) = value.parse() {
                policy.claim_max_retries = retries;
            }
        }
        policy
    }
}

#[derive(Debug, Clone)]
pub struct PaymentPolicy {
    /// Carrier prefix mobile-money phone numbers must start with.
    pub mobile_money_prefix: String,
}

impl Default for PaymentPolicy {
    fn default() -> Self {
        PaymentPolicy {
            mobile_money_prefix: "07".to_string(),
        }
    }
}

impl PaymentPolicy {
    pub fn from_env() -> Self {
        let mut policy = PaymentPolicy::default();
        if let Ok(prefix) = env::var("MOBILE_MONEY_PREFIX") {
            if !prefix.is_empty() {
                policy.mobile_money_prefix = prefix;
            }
        }
        policy
    }
}
