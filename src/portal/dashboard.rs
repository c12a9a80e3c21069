use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::Portal;
use crate::api::{
    GuessYouLike, HotTopics, ListQuery, ListResponse, PersonalizedRecommendations, Record,
};
use crate::behavior::BehaviorType;
use crate::error::{PortalError, PortalResult};
use crate::storage::{UserInfo, UserType};

/// Headline numbers shown on the dashboard landing section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOverview {
    /// Total news items
    pub news_total: u64,
    /// `price` of the first latest-price record, if any.
    pub latest_price: Option<Value>,
    /// Total research reports
    pub report_total: u64,
}

/// Filters for the price board. The board always covers the last `days` days.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceFilter {
    /// Look-back window in days
    pub days: u32,
    /// Trading product filter
    pub product_type: Option<String>,
    /// Region filter
    pub region: Option<String>,
}

impl Default for PriceFilter {
    fn default() -> Self {
        Self {
            days: 7,
            product_type: None,
            region: None,
        }
    }
}

impl Portal {
    /// Overview counters; records a dashboard view.
    pub async fn overview(&self) -> PortalResult<DashboardOverview> {
        self.require_login()?;

        let news = self.client.news(&ListQuery::new().with_limit(1)).await?;
        let latest = self.client.latest_prices().await?;
        let reports = self.client.reports(&ListQuery::new().with_limit(1)).await?;

        self.record(
            BehaviorType::View,
            json!({"content_type": "dashboard", "duration": 0}),
        );

        Ok(DashboardOverview {
            news_total: news.total.unwrap_or(0),
            latest_price: latest
                .data
                .first()
                .and_then(|record| record.get("price"))
                .cloned(),
            report_total: reports.total.unwrap_or(0),
        })
    }

    /// Latest news; records a news view.
    pub async fn news_feed(&self, query: &ListQuery) -> PortalResult<ListResponse> {
        self.require_login()?;
        let news = self.client.news(query).await?;
        self.record(
            BehaviorType::View,
            json!({"content_type": "news", "duration": 0}),
        );
        Ok(news)
    }

    /// One news item; the view is recorded before the fetch.
    pub async fn news_detail(&self, news_id: &str) -> PortalResult<Record> {
        self.require_login()?;
        self.record(
            BehaviorType::View,
            json!({"content_type": "news", "content_id": news_id, "duration": 30}),
        );
        Ok(self.client.news_item(news_id).await?)
    }

    /// Price history with optional product/region filters; records a price view.
    pub async fn price_board(&self, filter: &PriceFilter) -> PortalResult<ListResponse> {
        self.require_login()?;

        let mut query = ListQuery::new().with_days(filter.days);
        if let Some(product) = &filter.product_type {
            query = query.with_product_type(product.clone());
        }
        if let Some(region) = &filter.region {
            query = query.with_region(region.clone());
        }

        let prices = self.client.prices(&query).await?;
        self.record(
            BehaviorType::View,
            json!({"content_type": "price", "duration": 0}),
        );
        Ok(prices)
    }

    /// Latest price per product and region.
    pub async fn latest_prices(&self) -> PortalResult<ListResponse> {
        self.require_login()?;
        Ok(self.client.latest_prices().await?)
    }

    /// Recent deals.
    pub async fn deals(&self, query: &ListQuery) -> PortalResult<ListResponse> {
        self.require_login()?;
        Ok(self.client.deals(query).await?)
    }

    /// Research reports.
    pub async fn reports(&self, query: &ListQuery) -> PortalResult<ListResponse> {
        self.require_login()?;
        Ok(self.client.reports(query).await?)
    }

    /// Energy indexes.
    pub async fn indexes(&self, query: &ListQuery) -> PortalResult<ListResponse> {
        self.require_login()?;
        Ok(self.client.indexes(query).await?)
    }

    /// Personalized recommendations.
    pub async fn personalized(&self) -> PortalResult<PersonalizedRecommendations> {
        self.require_login()?;
        Ok(self.client.personalized().await?)
    }

    /// "Guess you like" recommendations.
    pub async fn guess_you_like(&self) -> PortalResult<GuessYouLike> {
        self.require_login()?;
        Ok(self.client.guess_you_like().await?)
    }

    /// Hot news and deals.
    pub async fn hot_topics(&self) -> PortalResult<HotTopics> {
        self.require_login()?;
        Ok(self.client.hot_topics().await?)
    }

    /// Fresh profile from the server. The stored profile is not modified.
    pub async fn profile(&self) -> PortalResult<UserInfo> {
        self.require_login()?;
        let response = self.client.profile().await?;
        match (response.success, response.user) {
            (true, Some(user)) => Ok(user),
            (_, _) => Err(PortalError::Rejected {
                message: response
                    .message
                    .unwrap_or_else(|| "Failed to load profile".to_string()),
            }),
        }
    }

    /// Tags of the signed-in user.
    pub async fn tags(&self) -> PortalResult<Vec<String>> {
        self.require_login()?;
        Ok(self.client.user_tags().await?.tags)
    }

    /// Add tags to the signed-in user.
    pub async fn add_tags(&self, tags: Vec<String>) -> PortalResult<()> {
        self.require_login()?;
        let response = self.client.add_user_tags(tags).await?;
        if !response.success {
            return Err(PortalError::Rejected {
                message: response
                    .message
                    .unwrap_or_else(|| "Failed to update tags".to_string()),
            });
        }
        Ok(())
    }

    /// Upgrade to the paid tier.
    ///
    /// On success the stored profile's `user_type` becomes `paid`; the token
    /// is left as is. Returns the updated profile, or `None` when no profile
    /// was stored.
    pub async fn upgrade(&self) -> PortalResult<Option<UserInfo>> {
        self.require_login()?;

        let response = self.client.upgrade().await?;
        if !response.success {
            return Err(PortalError::Rejected {
                message: response
                    .message
                    .unwrap_or_else(|| "Upgrade failed".to_string()),
            });
        }

        let Some(mut user) = self.session.get_user_info() else {
            warn!("Upgrade succeeded but no stored profile to update");
            return Ok(None);
        };

        user.user_type = UserType::Paid;
        self.session.set_user_info(&user).await?;

        info!(username = %user.username, "Upgraded to paid tier");
        Ok(Some(user))
    }

    /// Report that the AI assistant window was opened.
    pub fn open_ai_assistant(&self, assistant_type: &str, user_company: Option<&str>) {
        self.record(
            BehaviorType::AiAssistantOpened,
            json!({
                "assistant_type": assistant_type,
                "user_company": user_company,
                "timestamp": Utc::now().to_rfc3339(),
            }),
        );
    }
}
