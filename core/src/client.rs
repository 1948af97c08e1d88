//! Typed operations over the Sendy plain-text API.
//!
//! # Design
//! `SendyClient` holds only its validated configuration and a
//! `RequestExecutor`, and carries no mutable state between calls. Each
//! operation assembles `FormParams`, runs them through the executor against
//! a fixed `Endpoint`, and applies its own classification rule to the body.
//! Boolean operations return `Ok(false)` when the body matches neither the
//! rule nor the response guard.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::classify::{parse_count, ErrorSubstringGuard, Expect, ResponseGuard};
use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::{ApiError, ConfigError};
use crate::executor::RequestExecutor;
use crate::http::Transport;
use crate::observer::{RequestObserver, TracingObserver};
use crate::params::FormParams;
use crate::transport::UreqTransport;
use crate::types::{Campaign, SubscribeOptions, SubscriberStatus, UpdateSubscriber};

const SUBSCRIBED: Expect = Expect::Exact("1");
const UNSUBSCRIBED: Expect = Expect::Exact("1");
const DELETED: Expect = Expect::Contains("Subscriber deleted");
const UPDATED: Expect = Expect::Contains("Subscriber updated");
const CAMPAIGN_SENDING: Expect = Expect::Contains("Campaign created and now sending");
const DRAFT_CREATED: Expect = Expect::Contains("Draft campaign created");
const CAMPAIGN_SCHEDULED: Expect = Expect::Contains("Campaign scheduled");

/// Blocking client for one Sendy installation.
#[derive(Clone)]
pub struct SendyClient<T = UreqTransport> {
    config: ClientConfig,
    executor: RequestExecutor<T>,
}

impl<T> fmt::Debug for SendyClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendyClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SendyClient<UreqTransport> {
    /// Validates `config` and builds a client over a `ureq` agent.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        let transport = UreqTransport::new(config.timeout);
        Ok(Self::from_validated(config, transport))
    }
}

impl<T: Transport> SendyClient<T> {
    /// Validates `config` and builds a client that sends through `transport`.
    ///
    /// The configured timeout is not applied to a custom transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        Ok(Self::from_validated(config, transport))
    }

    fn from_validated(config: ClientConfig, transport: T) -> Self {
        debug!(url = %config.url, brand_id = ?config.brand_id, "creating sendy client");
        let executor = RequestExecutor::new(
            config.url.clone(),
            config.api_key.clone(),
            transport,
            Arc::new(TracingObserver),
            Arc::new(ErrorSubstringGuard::default()),
        );
        Self { config, executor }
    }

    pub fn with_observer(mut self, observer: impl RequestObserver + 'static) -> Self {
        self.executor.set_observer(Arc::new(observer));
        self
    }

    pub fn with_response_guard(mut self, guard: impl ResponseGuard + 'static) -> Self {
        self.executor.set_guard(Arc::new(guard));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        self.executor.transport()
    }

    pub fn subscribe(&self, list_id: &str, email: &str, options: &SubscribeOptions) -> Result<bool, ApiError> {
        let mut params = subscriber(list_id, email);
        params
            .push_opt("name", options.name.as_deref())
            .push("boolean", bool_str(options.gdpr_consent))
            .extend_custom_fields(&options.custom_fields, self.config.custom_field_layout);

        let body = self.executor.execute(Endpoint::Subscribe, params)?;
        Ok(SUBSCRIBED.matches(&body))
    }

    pub fn unsubscribe(&self, list_id: &str, email: &str) -> Result<bool, ApiError> {
        let body = self
            .executor
            .execute(Endpoint::Unsubscribe, subscriber(list_id, email))?;
        Ok(UNSUBSCRIBED.matches(&body))
    }

    /// Returns the service's wording as-is, e.g. `Subscribed` or `Bounced`.
    pub fn subscription_status(&self, list_id: &str, email: &str) -> Result<String, ApiError> {
        self.executor
            .execute(Endpoint::SubscriptionStatus, subscriber(list_id, email))
    }

    pub fn active_subscriber_count(&self, list_id: &str) -> Result<u64, ApiError> {
        let mut params = FormParams::new();
        params.push("list", list_id);

        let body = self.executor.execute(Endpoint::ActiveSubscriberCount, params)?;
        parse_count(&body)
    }

    pub fn subscriber_count_by_status(&self, list_id: &str, status: SubscriberStatus) -> Result<u64, ApiError> {
        let mut params = FormParams::new();
        params.push("list", list_id).push("status", status.as_str());

        let body = self.executor.execute(Endpoint::Count, params)?;
        parse_count(&body)
    }

    /// Total active subscribers across the brand's lists.
    pub fn total_active_subscribers(&self, brand_id: Option<&str>) -> Result<u64, ApiError> {
        let mut params = FormParams::new();
        params.push_opt("brand_id", self.resolve_brand(brand_id));

        let body = self.executor.execute(Endpoint::TotalActive, params)?;
        parse_count(&body)
    }

    pub fn delete_subscriber(&self, list_id: &str, email: &str) -> Result<bool, ApiError> {
        let params = subscriber(list_id, email);
        let body = self.executor.execute(Endpoint::Delete, params)?;
        Ok(DELETED.matches(&body))
    }

    pub fn update_subscriber(&self, list_id: &str, email: &str, update: &UpdateSubscriber) -> Result<bool, ApiError> {
        let mut params = subscriber(list_id, email);
        params
            .push_opt("name", update.name.as_deref())
            .extend_custom_fields(&update.custom_fields, self.config.custom_field_layout);

        let body = self.executor.execute(Endpoint::Edit, params)?;
        Ok(UPDATED.matches(&body))
    }

    /// Creates a campaign and starts sending it right away.
    pub fn create_campaign(&self, campaign: &Campaign) -> Result<bool, ApiError> {
        let body = self
            .executor
            .execute(Endpoint::CreateCampaign, self.campaign_params(campaign))?;
        Ok(CAMPAIGN_SENDING.matches(&body))
    }

    pub fn create_draft_campaign(&self, campaign: &Campaign) -> Result<bool, ApiError> {
        let body = self
            .executor
            .execute(Endpoint::CreateDraftCampaign, self.campaign_params(campaign))?;
        Ok(DRAFT_CREATED.matches(&body))
    }

    /// Schedules a campaign. `send_at` is passed through untouched and should
    /// read `YYYY-MM-DD HH:MM:SS`.
    pub fn schedule_campaign(&self, campaign: &Campaign, send_at: &str) -> Result<bool, ApiError> {
        let mut params = self.campaign_params(campaign);
        params.push("send_campaign", send_at);

        let body = self.executor.execute(Endpoint::ScheduleCampaign, params)?;
        Ok(CAMPAIGN_SCHEDULED.matches(&body))
    }

    fn campaign_params(&self, campaign: &Campaign) -> FormParams {
        let mut params = FormParams::new();
        params
            .push("from_name", campaign.from_name.as_str())
            .push("from_email", campaign.from_email.as_str())
            .push("reply_to", campaign.reply_to.as_str())
            .push("title", campaign.title.as_str())
            .push("subject", campaign.subject.as_str())
            .push("plain_text", campaign.plain_text.as_str())
            .push("html_text", campaign.html_text.as_str())
            .push("list_ids", campaign.list_ids.joined())
            .push_opt("brand_id", self.resolve_brand(campaign.brand_id.as_deref()))
            .push_opt("query_string", campaign.query_string.as_deref());
        params
    }

    fn resolve_brand<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit.or(self.config.brand_id.as_deref())
    }
}

fn subscriber(list_id: &str, email: &str) -> FormParams {
    let mut params = FormParams::new();
    params.push("list", list_id).push("email", email);
    params
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
