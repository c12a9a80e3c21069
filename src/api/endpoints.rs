//! Endpoint paths and typed calls.

use super::client::{ApiClient, RequestOptions};
use super::types::{
    ActionResponse, GuessYouLike, HotTopics, ListQuery, ListResponse, LoginRequest, LoginResponse,
    PersonalizedRecommendations, ProfileResponse, Record, RegionsResponse, RegisterRequest,
    RegisterResponse, SystemUsersResponse, TagsPayload, TradingProductsResponse,
};
use crate::behavior::BehaviorEvent;
use crate::error::RequestResult;

/// Create an account
pub const REGISTER: &str = "/auth/register";
/// Sign in
pub const LOGIN: &str = "/auth/login";
/// Regions offered at registration
pub const REGIONS: &str = "/auth/regions";
/// Trading products offered at registration
pub const TRADING_PRODUCTS: &str = "/auth/trading-products";
/// Registered usernames
pub const SYSTEM_USERS: &str = "/auth/system-users";

/// Signed-in user's profile
pub const PROFILE: &str = "/user/profile";
/// Upgrade to the paid tier
pub const UPGRADE: &str = "/user/upgrade";
/// Behavior telemetry sink
pub const BEHAVIOR: &str = "/user/behavior";
/// User interest tags
pub const USER_TAGS: &str = "/user/tags";

/// News list; `/{id}` for one item
pub const NEWS: &str = "/energy/news";
/// Price history
pub const PRICES: &str = "/energy/prices";
/// Latest price per product and region
pub const LATEST_PRICES: &str = "/energy/prices/latest";
/// Recent deals
pub const DEALS: &str = "/energy/deals";
/// Research reports
pub const REPORTS: &str = "/energy/reports";
/// Energy indexes
pub const INDEXES: &str = "/energy/indexes";

/// Recommendations from tags, region and products
pub const PERSONALIZED: &str = "/recommendation/personalized";
/// Recommendations from recent browsing
pub const GUESS_YOU_LIKE: &str = "/recommendation/guess-you-like";
/// Most viewed news and largest deals
pub const HOT_TOPICS: &str = "/recommendation/hot-topics";

impl ApiClient {
    /// Sign in with username and password.
    pub async fn login(&self, request: &LoginRequest) -> RequestResult<LoginResponse> {
        self.request(LOGIN, RequestOptions::post().with_json(request)?)
            .await
    }

    /// Create an account.
    pub async fn register(&self, request: &RegisterRequest) -> RequestResult<RegisterResponse> {
        self.request(REGISTER, RequestOptions::post().with_json(request)?)
            .await
    }

    /// Regions offered at registration.
    pub async fn regions(&self) -> RequestResult<RegionsResponse> {
        self.request(REGIONS, RequestOptions::get()).await
    }

    /// Trading products offered at registration.
    pub async fn trading_products(&self) -> RequestResult<TradingProductsResponse> {
        self.request(TRADING_PRODUCTS, RequestOptions::get()).await
    }

    /// Registered usernames.
    pub async fn system_users(&self) -> RequestResult<SystemUsersResponse> {
        self.request(SYSTEM_USERS, RequestOptions::get()).await
    }

    /// Profile of the signed-in user.
    pub async fn profile(&self) -> RequestResult<ProfileResponse> {
        self.request(PROFILE, RequestOptions::get()).await
    }

    /// Upgrade the signed-in user to the paid tier.
    pub async fn upgrade(&self) -> RequestResult<ActionResponse> {
        self.request(UPGRADE, RequestOptions::post()).await
    }

    /// POST one behavior event.
    pub async fn post_behavior(&self, event: &BehaviorEvent) -> RequestResult<ActionResponse> {
        self.request(BEHAVIOR, RequestOptions::post().with_json(event)?)
            .await
    }

    /// Tags of the signed-in user.
    pub async fn user_tags(&self) -> RequestResult<TagsPayload> {
        self.request(USER_TAGS, RequestOptions::get()).await
    }

    /// Add tags to the signed-in user.
    pub async fn add_user_tags(&self, tags: Vec<String>) -> RequestResult<ActionResponse> {
        let body = TagsPayload { tags };
        self.request(USER_TAGS, RequestOptions::post().with_json(&body)?)
            .await
    }

    /// News list.
    pub async fn news(&self, query: &ListQuery) -> RequestResult<ListResponse> {
        self.list(NEWS, query).await
    }

    /// One news item by id.
    pub async fn news_item(&self, news_id: &str) -> RequestResult<Record> {
        let url = self.resolve_segment(NEWS, news_id)?;
        self.request(&url, RequestOptions::get()).await
    }

    /// Price history.
    pub async fn prices(&self, query: &ListQuery) -> RequestResult<ListResponse> {
        self.list(PRICES, query).await
    }

    /// Latest price per product and region.
    pub async fn latest_prices(&self) -> RequestResult<ListResponse> {
        self.list(LATEST_PRICES, &ListQuery::default()).await
    }

    /// Recent deals.
    pub async fn deals(&self, query: &ListQuery) -> RequestResult<ListResponse> {
        self.list(DEALS, query).await
    }

    /// Research reports.
    pub async fn reports(&self, query: &ListQuery) -> RequestResult<ListResponse> {
        self.list(REPORTS, query).await
    }

    /// Energy indexes.
    pub async fn indexes(&self, query: &ListQuery) -> RequestResult<ListResponse> {
        self.list(INDEXES, query).await
    }

    /// Personalized recommendations.
    pub async fn personalized(&self) -> RequestResult<PersonalizedRecommendations> {
        self.request(PERSONALIZED, RequestOptions::get()).await
    }

    /// "Guess you like" recommendations.
    pub async fn guess_you_like(&self) -> RequestResult<GuessYouLike> {
        self.request(GUESS_YOU_LIKE, RequestOptions::get()).await
    }

    /// Hot news and deals.
    pub async fn hot_topics(&self) -> RequestResult<HotTopics> {
        self.request(HOT_TOPICS, RequestOptions::get()).await
    }

    async fn list(&self, path: &str, query: &ListQuery) -> RequestResult<ListResponse> {
        self.request(path, RequestOptions::get().with_query(query.to_pairs()))
            .await
    }
}
