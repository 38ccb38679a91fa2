use rust_decimal::prelude::*;

use crate::models::user::{LoyaltyProgress, LoyaltySummary, LoyaltyTier};

pub static TIERS: [LoyaltyTier; 4] = [
    LoyaltyTier {
        name: "Bronze",
        min_points: 0,
        max_points: Some(999),
        benefits: &["5% discount on bookings", "Priority customer support"],
    },
    LoyaltyTier {
        name: "Silver",
        min_points: 1000,
        max_points: Some(4999),
        benefits: &["10% discount on bookings", "Free room upgrades", "Late checkout"],
    },
    LoyaltyTier {
        name: "Gold",
        min_points: 5000,
        max_points: Some(14999),
        benefits: &["15% discount on bookings", "Complimentary breakfast", "Airport lounge access"],
    },
    LoyaltyTier {
        name: "Platinum",
        min_points: 15000,
        max_points: None,
        benefits: &["20% discount on bookings", "Concierge service", "Personal travel advisor"],
    },
];

pub struct LoyaltyService;

impl LoyaltyService {
    pub fn tier_for(points: u64) -> &'static LoyaltyTier {
        TIERS
            .iter()
            .rev()
            .find(|tier| points >= tier.min_points)
            .unwrap_or(&TIERS[0])
    }

    pub fn next_tier(points: u64) -> Option<&'static LoyaltyTier> {
        TIERS.iter().find(|tier| tier.min_points > points)
    }

    /// One point per whole currency unit spent.
    pub fn points_for(total: Decimal) -> u64 {
        total
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
            .unwrap_or(0)
    }

    pub fn progress(points: u64) -> LoyaltyProgress {
        let tier = Self::tier_for(points);
        let next = Self::next_tier(points);

        let (progress_percent, points_to_next) = match next {
            Some(next) => {
                let span = Decimal::from(next.min_points - tier.min_points);
                let earned = Decimal::from(points - tier.min_points);
                let percent = (earned / span * Decimal::ONE_HUNDRED)
                    .min(Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                (percent, next.min_points - points)
            }
            None => (Decimal::ONE_HUNDRED, 0),
        };

        LoyaltyProgress {
            points,
            tier: tier.clone(),
            next_tier: next.cloned(),
            progress_percent,
            points_to_next,
        }
    }

    pub fn booking_summary(previous_balance: u64, earned: u64) -> LoyaltySummary {
        let new_balance = previous_balance + earned;
        let next = Self::next_tier(new_balance);

        LoyaltySummary {
            earned,
            previous_balance,
            new_balance,
            tier: Self::tier_for(new_balance).name,
            next_tier: next.map(|tier| tier.name),
            points_to_next_tier: next.map(|tier| tier.min_points - new_balance).unwrap_or(0),
        }
    }
}
