use serde::{Deserialize, Serialize};

use crate::storage::UserInfo;

/// A free-form record returned by the energy and recommendation endpoints.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Account name
    pub username: String,
    /// Plain-text password
    pub password: String,
}

/// Response of `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Whether the credentials were accepted
    #[serde(default)]
    pub success: bool,
    /// Bearer token on success
    pub token: Option<String>,
    /// Profile on success
    pub user: Option<UserInfo>,
    /// Server message
    pub message: Option<String>,
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Account name
    pub username: String,
    /// Plain-text password
    pub password: String,
    /// Contact email
    pub email: String,
    /// Home region
    pub region: String,
    /// Products of interest; at least one
    pub trading_products: Vec<String>,
    /// Sent as `null` when absent.
    pub company_name: Option<String>,
}

/// Response of `POST /auth/register`
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    /// Whether the account was created
    #[serde(default)]
    pub success: bool,
    /// Server message
    pub message: Option<String>,
    /// New account id
    pub user_id: Option<serde_json::Value>,
}

/// Response of `GET /auth/regions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionsResponse {
    /// Region names
    pub regions: Vec<String>,
}

/// Response of `GET /auth/trading-products`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingProductsResponse {
    /// Trading product names
    pub products: Vec<String>,
}

/// Response of `GET /auth/system-users`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemUsersResponse {
    /// Usernames
    pub users: Vec<String>,
}

/// Response of `GET /user/profile`
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    /// Whether the profile was found
    #[serde(default)]
    pub success: bool,
    /// Profile on success
    pub user: Option<UserInfo>,
    /// Server message
    pub message: Option<String>,
}

/// Generic `{success, message}` acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    /// Whether the action succeeded
    #[serde(default)]
    pub success: bool,
    /// Server message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `POST /user/tags` and response of `GET /user/tags`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsPayload {
    /// Tag names
    pub tags: Vec<String>,
}

/// Envelope of the `/energy/*` list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    /// Page of records
    pub data: Vec<Record>,
    /// Total matching records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Records on this page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Page number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    /// Page size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl ListResponse {
    /// Server total, falling back to `count`, then to the page length.
    pub fn total_or_len(&self) -> u64 {
        self.total
            .or(self.count)
            .unwrap_or(self.data.len() as u64)
    }
}

/// Query filters accepted by the list endpoints. Unset filters are omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    /// Page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// Look-back window in days
    pub days: Option<u32>,
    /// News category
    pub category: Option<String>,
    /// Trading product
    pub product_type: Option<String>,
    /// Region
    pub region: Option<String>,
    /// Report type
    pub report_type: Option<String>,
    /// Index name
    pub index_name: Option<String>,
}

impl ListQuery {
    /// Empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page number.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the look-back window in days.
    pub fn with_days(mut self, days: u32) -> Self {
        self.days = Some(days);
        self
    }

    /// Filter by news category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Filter by trading product.
    pub fn with_product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = Some(product_type.into());
        self
    }

    /// Filter by region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Filter by report type.
    pub fn with_report_type(mut self, report_type: impl Into<String>) -> Self {
        self.report_type = Some(report_type.into());
        self
    }

    /// Filter by index name.
    pub fn with_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// Query-string pairs in a stable order. Empty strings are skipped.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let numbers = [
            ("page", self.page),
            ("limit", self.limit),
            ("days", self.days),
        ];
        let strings = [
            ("category", &self.category),
            ("product_type", &self.product_type),
            ("region", &self.region),
            ("report_type", &self.report_type),
            ("index_name", &self.index_name),
        ];

        let mut pairs: Vec<(String, String)> = numbers
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k.to_string(), v.to_string())))
            .collect();
        pairs.extend(strings.into_iter().filter_map(|(k, v)| {
            v.as_deref()
                .filter(|s| !s.is_empty())
                .map(|s| (k.to_string(), s.to_string()))
        }));
        pairs
    }
}

/// Response of `GET /recommendation/personalized`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalizedRecommendations {
    /// News matching the user's tags
    #[serde(default)]
    pub news: Vec<Record>,
    /// Reports matching the user's products
    #[serde(default)]
    pub reports: Vec<Record>,
    /// Recent prices for the user's products and region
    #[serde(default)]
    pub price_alerts: Vec<Record>,
}

/// Response of `GET /recommendation/guess-you-like`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessYouLike {
    /// Recommended records
    pub recommendations: Vec<Record>,
    /// What the recommendations were based on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub based_on: Option<String>,
}

/// Response of `GET /recommendation/hot-topics`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotTopics {
    /// Most viewed news
    #[serde(default)]
    pub hot_news: Vec<Record>,
    /// Empty for free-tier users.
    #[serde(default)]
    pub hot_deals: Vec<Record>,
    /// Generation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}
