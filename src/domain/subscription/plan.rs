//! Listing plans and their limits.

use serde::Serialize;

use crate::domain::foundation::{string_enum, validation, DomainError};

string_enum! {
    pub enum PlanCode {
        Free => "free",
        Basic => "basic",
        Premium => "premium",
    }
}

/// Commercial terms of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub code: PlanCode,
    pub name: &'static str,
    /// Whole rupees.
    pub price: i64,
    /// `None` means the plan never lapses.
    pub duration_days: Option<i64>,
    pub listing_limit: i64,
    pub featured_listings: i64,
}

const FREE: Plan = Plan {
    code: PlanCode::Free,
    name: "Free",
    price: 0,
    duration_days: None,
    listing_limit: 2,
    featured_listings: 0,
};

const BASIC: Plan = Plan {
    code: PlanCode::Basic,
    name: "Basic",
    price: 999,
    duration_days: Some(30),
    listing_limit: 10,
    featured_listings: 1,
};

const PREMIUM: Plan = Plan {
    code: PlanCode::Premium,
    name: "Premium",
    price: 2_499,
    duration_days: Some(90),
    listing_limit: 50,
    featured_listings: 5,
};

impl PlanCode {
    pub fn plan(&self) -> &'static Plan {
        match self {
            PlanCode::Free => &FREE,
            PlanCode::Basic => &BASIC,
            PlanCode::Premium => &PREMIUM,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.plan().price > 0
    }
}

impl Plan {
    /// All plans in ascending price order.
    pub fn catalog() -> [&'static Plan; 3] {
        [&FREE, &BASIC, &PREMIUM]
    }

    /// Price in paise for the payment gateway.
    pub fn price_paise(&self) -> Result<i64, DomainError> {
        Ok(validation::paise("price", self.price)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_sorted_by_price() {
        let prices: Vec<i64> = Plan::catalog().iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![0, 999, 2_499]);
    }

    #[test]
    fn free_plan_never_lapses_and_is_not_paid() {
        assert_eq!(PlanCode::Free.plan().duration_days, None);
        assert!(!PlanCode::Free.is_paid());
        assert!(PlanCode::Premium.is_paid());
    }

    #[test]
    fn paise_conversion() {
        assert_eq!(PlanCode::Basic.plan().price_paise().unwrap(), 99_900);
    }
}
