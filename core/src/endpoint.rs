//! Logical endpoints and their wire paths.
//!
//! Paths are relative to the configured base URL, which always ends with a
//! single `/`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Subscribe,
    Unsubscribe,
    SubscriptionStatus,
    ActiveSubscriberCount,
    Delete,
    Edit,
    TotalActive,
    Count,
    CreateCampaign,
    CreateDraftCampaign,
    ScheduleCampaign,
}

impl Endpoint {
    pub const ALL: [Endpoint; 11] = [
        Endpoint::Subscribe,
        Endpoint::Unsubscribe,
        Endpoint::SubscriptionStatus,
        Endpoint::ActiveSubscriberCount,
        Endpoint::Delete,
        Endpoint::Edit,
        Endpoint::TotalActive,
        Endpoint::Count,
        Endpoint::CreateCampaign,
        Endpoint::CreateDraftCampaign,
        Endpoint::ScheduleCampaign,
    ];

    /// Internal operation name, used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Endpoint::Subscribe => "subscribe",
            Endpoint::Unsubscribe => "unsubscribe",
            Endpoint::SubscriptionStatus => "subscription-status",
            Endpoint::ActiveSubscriberCount => "active-subscriber-count",
            Endpoint::Delete => "delete",
            Endpoint::Edit => "edit",
            Endpoint::TotalActive => "total-active",
            Endpoint::Count => "count",
            Endpoint::CreateCampaign => "campaigns/create",
            Endpoint::CreateDraftCampaign => "campaigns/create-draft",
            Endpoint::ScheduleCampaign => "campaigns/schedule",
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Endpoint::Subscribe => "subscribers/subscribe",
            Endpoint::Unsubscribe => "subscribers/unsubscribe",
            Endpoint::SubscriptionStatus => "api/subscribers/subscription-status",
            Endpoint::ActiveSubscriberCount => "api/subscribers/active-subscriber-count",
            Endpoint::Delete => "api/subscribers/delete",
            Endpoint::Edit => "api/subscribers/edit",
            Endpoint::TotalActive => "api/subscribers/total-active",
            Endpoint::Count => "subscribers/count",
            Endpoint::CreateCampaign => "api/campaigns/create",
            Endpoint::CreateDraftCampaign => "api/campaigns/create-draft",
            Endpoint::ScheduleCampaign => "api/campaigns/schedule",
        }
    }

    /// Looks up an endpoint by its internal name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
