//! Backend paths consumed by the services.

use client::encode_path_segment;

pub const LOGIN: &str = "/auth/login";
pub const LOGOUT: &str = "/auth/logout";
pub const REFRESH: &str = "/auth/refresh";
pub const REGISTER: &str = "/auth/register";

pub const CATEGORIES: &str = "/admin/catalog/categories";
pub const ORDERS: &str = "/admin/orders";
pub const CURRENT_TENANT: &str = "/tenants/me";
pub const SUBSCRIPTION_PLANS: &str = "/subscription-plans";

pub fn category_active(id: &str) -> String {
    format!("{CATEGORIES}/{}/active", encode_path_segment(id))
}

pub fn subscription_plan(slug: &str) -> String {
    format!("{SUBSCRIPTION_PLANS}/{}", encode_path_segment(slug))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_stay_inside_their_segment() {
        assert_eq!(category_active("c1"), "/admin/catalog/categories/c1/active");
        assert_eq!(category_active("a/b c"), "/admin/catalog/categories/a%2Fb%20c/active");
        assert_eq!(subscription_plan("pro?x=1"), "/subscription-plans/pro%3Fx=1");
    }
}
