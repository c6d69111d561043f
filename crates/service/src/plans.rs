//! Public subscription plans and their price presentation.

use client::{ApiClient, RequestOptions};
use common::utils::money::format_brl;
use models::plan::SubscriptionPlan;
use tracing::{instrument, warn};

use crate::endpoints;
use crate::errors::ServiceError;

#[derive(Clone)]
pub struct PlanService {
    api: ApiClient,
}

impl PlanService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn all(&self) -> Result<Vec<SubscriptionPlan>, ServiceError> {
        Ok(self.api.get(endpoints::SUBSCRIPTION_PLANS, RequestOptions::default()).await?)
    }

    /// Any failure, a 404 included, is logged and reported as `None`.
    #[instrument(skip(self))]
    pub async fn by_slug(&self, slug: &str) -> Option<SubscriptionPlan> {
        match self
            .api
            .get::<SubscriptionPlan>(&endpoints::subscription_plan(slug), RequestOptions::default())
            .await
        {
            Ok(plan) => Some(plan),
            Err(e) => {
                warn!(slug, error = %e, "error fetching plan");
                None
            }
        }
    }

    /// All plans ordered by `sort_order`; ties keep the backend order.
    pub async fn landing_plans(&self) -> Result<Vec<SubscriptionPlan>, ServiceError> {
        let mut plans = self.all().await?;
        plans.sort_by_key(|p| p.sort_order);
        Ok(plans)
    }
}

pub fn format_price(price_cents: i64) -> String {
    format_brl(price_cents)
}

/// Annual price shown as its monthly equivalent.
pub fn format_annual_price(annual_price_cents: i64) -> String {
    format_brl((annual_price_cents as f64 / 12.0).round() as i64)
}

pub fn is_free(plan: &SubscriptionPlan) -> bool {
    plan.price_cents == 0
}

pub fn has_annual_price(plan: &SubscriptionPlan) -> bool {
    plan.annual_price_cents.is_some_and(|c| c > 0)
}

/// What twelve monthly payments cost over the annual price; 0 without one.
pub fn annual_savings(plan: &SubscriptionPlan) -> i64 {
    match plan.annual_price_cents {
        Some(annual) if annual > 0 => plan.price_cents * 12 - annual,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(price: i64, annual: Option<i64>) -> SubscriptionPlan {
        SubscriptionPlan {
            id: "p".into(),
            name: "Pro".into(),
            slug: "pro".into(),
            description: String::new(),
            price_cents: price,
            annual_price_cents: annual,
            features: vec![],
            is_active: true,
            sort_order: 0,
        }
    }

    #[test]
    fn pricing_helpers() {
        let pro = plan(9990, Some(99900));
        assert!(!is_free(&pro));
        assert!(has_annual_price(&pro));
        assert_eq!(annual_savings(&pro), 19980);
        assert_eq!(format_price(9990), "R$ 99,90");
        assert_eq!(format_annual_price(99900), "R$ 83,25");
    }

    #[test]
    fn free_plan_without_annual_price() {
        let free = plan(0, Some(0));
        assert!(is_free(&free));
        assert!(!has_annual_price(&free));
        assert_eq!(annual_savings(&free), 0);
        assert_eq!(annual_savings(&plan(100, None)), 0);
    }
}
