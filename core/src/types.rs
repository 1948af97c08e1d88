//! Request inputs for subscriber and campaign operations.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::params::{CustomFields, ListIds};

/// Optional inputs of `SendyClient::subscribe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeOptions {
    pub name: Option<String>,
    pub custom_fields: CustomFields,
    /// Sent as `boolean=true|false`. Defaults to `true`.
    pub gdpr_consent: bool,
}

impl Default for SubscribeOptions {
    fn default() -> Self {
        Self {
            name: None,
            custom_fields: CustomFields::new(),
            gdpr_consent: true,
        }
    }
}

impl SubscribeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn custom_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.insert(field.into(), value.into());
        self
    }

    pub fn gdpr_consent(mut self, consent: bool) -> Self {
        self.gdpr_consent = consent;
        self
    }
}

/// Optional inputs of `SendyClient::update_subscriber`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSubscriber {
    pub name: Option<String>,
    pub custom_fields: CustomFields,
}

impl UpdateSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn custom_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.insert(field.into(), value.into());
        self
    }
}

/// Everything needed to create, draft or schedule a campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Campaign {
    pub from_name: String,
    pub from_email: String,
    pub reply_to: String,
    pub title: String,
    pub subject: String,
    pub plain_text: String,
    pub html_text: String,
    pub list_ids: ListIds,
    /// Falls back to the configured brand when `None`.
    pub brand_id: Option<String>,
    pub query_string: Option<String>,
}

impl Campaign {
    pub fn brand_id(mut self, brand_id: impl Into<String>) -> Self {
        self.brand_id = Some(brand_id.into());
        self
    }

    pub fn query_string(mut self, query_string: impl Into<String>) -> Self {
        self.query_string = Some(query_string.into());
        self
    }
}

/// Subscriber states accepted by the count endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriberStatus {
    Active,
    Unconfirmed,
    Unsubscribed,
    Bounced,
    Complained,
}

impl SubscriberStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            SubscriberStatus::Active => "active",
            SubscriberStatus::Unconfirmed => "unconfirmed",
            SubscriberStatus::Unsubscribed => "unsubscribed",
            SubscriberStatus::Bounced => "bounced",
            SubscriberStatus::Complained => "complained",
        }
    }
}

impl fmt::Display for SubscriberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown subscriber status {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for SubscriberStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" | "subscribed" => Ok(SubscriberStatus::Active),
            "unconfirmed" => Ok(SubscriberStatus::Unconfirmed),
            "unsubscribed" => Ok(SubscriberStatus::Unsubscribed),
            "bounced" => Ok(SubscriberStatus::Bounced),
            "complained" => Ok(SubscriberStatus::Complained),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_options_default_to_consent() {
        let options = SubscribeOptions::new();
        assert!(options.gdpr_consent);
        assert!(options.name.is_none());
        assert!(options.custom_fields.is_empty());
    }

    #[test]
    fn status_parses_service_wording() {
        assert_eq!("Subscribed".parse(), Ok(SubscriberStatus::Active));
        assert_eq!("Bounced".parse(), Ok(SubscriberStatus::Bounced));
        assert_eq!(
            "Soft bounced".parse::<SubscriberStatus>(),
            Err(UnknownStatus("Soft bounced".to_string()))
        );
        assert_eq!(SubscriberStatus::Complained.to_string(), "complained");
    }
}
