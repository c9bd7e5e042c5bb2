use serde_json::Value;

/// Provider subscription plan ids that map onto local feature tiers.
///
/// The identity provider reports a user's active subscriptions as a list of
/// plan-id strings inside the cached profile data. Which plans grant premium
/// or phone masking is deployment configuration, not code.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionPlans {
    premium: Vec<String>,
    phone: Vec<String>,
}

impl SubscriptionPlans {
    pub fn new(premium: Vec<String>, phone: Vec<String>) -> Self {
        Self { premium, phone }
    }

    /// Whether the cached provider profile data grants the premium tier
    pub fn has_premium(&self, extra_data: &Value) -> bool {
        Self::any_plan_active(&self.premium, extra_data)
    }

    /// Whether the cached provider profile data grants the phone-masking tier
    pub fn has_phone(&self, extra_data: &Value) -> bool {
        Self::any_plan_active(&self.phone, extra_data)
    }

    fn any_plan_active(plans: &[String], extra_data: &Value) -> bool {
        let Some(subscriptions) = extra_data.get("subscriptions").and_then(Value::as_array) else {
            return false;
        };
        subscriptions
            .iter()
            .filter_map(Value::as_str)
            .any(|active| plans.iter().any(|plan| plan == active))
    }
}
