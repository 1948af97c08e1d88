//! In-memory stand-in for a Sendy installation.
//!
//! Serves the same form-encoded endpoints as the real service and answers
//! with its plain-text messages. Every request must carry the configured
//! `api_key`.

use std::{collections::HashMap, sync::Arc};

use axum::{extract::State, routing::post, Form, Router};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

type Fields = HashMap<String, String>;
type Reply = Result<String, &'static str>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Subscribed,
    Unsubscribed,
    Unconfirmed,
    Bounced,
    Complained,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Status::Subscribed => "Subscribed",
            Status::Unsubscribed => "Unsubscribed",
            Status::Unconfirmed => "Unconfirmed",
            Status::Bounced => "Bounced",
            Status::Complained => "Complained",
        }
    }

    fn count_key(self) -> &'static str {
        match self {
            Status::Subscribed => "active",
            Status::Unsubscribed => "unsubscribed",
            Status::Unconfirmed => "unconfirmed",
            Status::Bounced => "bounced",
            Status::Complained => "complained",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Subscriber {
    pub name: Option<String>,
    pub status: Status,
    pub gdpr: bool,
    pub custom_fields: Fields,
}

#[derive(Debug, Default)]
pub struct MailingList {
    pub brand_id: String,
    pub subscribers: HashMap<String, Subscriber>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CampaignState {
    Sending,
    Draft,
    Scheduled(String),
}

#[derive(Clone, Debug)]
pub struct Campaign {
    pub title: String,
    pub brand_id: Option<String>,
    pub list_ids: Vec<String>,
    pub query_string: Option<String>,
    pub state: CampaignState,
}

#[derive(Debug, Default)]
pub struct Store {
    pub lists: HashMap<String, MailingList>,
    pub campaigns: Vec<Campaign>,
}

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    store: Arc<RwLock<Store>>,
}

impl Store {
    /// Adds an empty list owned by `brand_id`.
    pub fn with_list(mut self, list_id: &str, brand_id: &str) -> Self {
        self.lists.insert(
            list_id.to_string(),
            MailingList {
                brand_id: brand_id.to_string(),
                subscribers: HashMap::new(),
            },
        );
        self
    }
}

impl AppState {
    pub fn new(api_key: &str, store: Store) -> Self {
        Self {
            api_key: Arc::from(api_key),
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub fn store(&self) -> Arc<RwLock<Store>> {
        Arc::clone(&self.store)
    }

    /// Overrides a subscriber's status from outside the runtime, e.g. to
    /// simulate a bounce. Returns `false` if the subscriber is unknown.
    pub fn set_status_blocking(&self, list_id: &str, email: &str, status: Status) -> bool {
        let mut store = self.store.blocking_write();
        match store
            .lists
            .get_mut(list_id)
            .and_then(|list| list.subscribers.get_mut(email))
        {
            Some(subscriber) => {
                subscriber.status = status;
                true
            }
            None => false,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/subscribers/subscribe", post(subscribe))
        .route("/subscribers/unsubscribe", post(unsubscribe))
        .route("/subscribers/count", post(count_by_status))
        .route("/api/subscribers/subscription-status", post(subscription_status))
        .route("/api/subscribers/active-subscriber-count", post(active_count))
        .route("/api/subscribers/delete", post(delete_subscriber))
        .route("/api/subscribers/edit", post(edit_subscriber))
        .route("/api/subscribers/total-active", post(total_active))
        .route("/api/campaigns/create", post(create_campaign))
        .route("/api/campaigns/create-draft", post(create_draft))
        .route("/api/campaigns/schedule", post(schedule_campaign))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

const RESERVED: [&str; 5] = ["api_key", "list", "email", "name", "boolean"];

fn authorize(state: &AppState, form: &Fields) -> Result<(), &'static str> {
    match form.get("api_key").map(String::as_str) {
        None | Some("") => Err("Error: API key not passed"),
        Some(key) if key != &*state.api_key => Err("Error: Invalid API key"),
        Some(_) => Ok(()),
    }
}

fn field<'a>(form: &'a Fields, name: &str, missing: &'static str) -> Result<&'a str, &'static str> {
    match form.get(name).map(|v| v.trim()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(missing),
    }
}

fn custom_fields(form: &Fields) -> Fields {
    form.iter()
        .filter(|(k, _)| !RESERVED.contains(&k.as_str()))
        .map(|(k, v)| {
            let key = k
                .strip_prefix("custom_fields[")
                .and_then(|rest| rest.strip_suffix(']'))
                .unwrap_or(k.as_str());
            (key.to_string(), v.clone())
        })
        .collect()
}

async fn subscribe(State(state): State<AppState>, Form(form): Form<Fields>) -> Reply {
    authorize(&state, &form)?;
    let list_id = field(&form, "list", "Some fields are missing.")?;
    let email = field(&form, "email", "Some fields are missing.")?;
    if !email.contains('@') {
        return Err("Invalid email address.");
    }

    let mut store = state.store.write().await;
    let list = store.lists.get_mut(list_id).ok_or("Invalid list ID.")?;
    if matches!(list.subscribers.get(email), Some(s) if s.status == Status::Subscribed) {
        return Err("Already subscribed.");
    }

    list.subscribers.insert(
        email.to_string(),
        Subscriber {
            name: form.get("name").cloned(),
            status: Status::Subscribed,
            gdpr: form.get("boolean").map(String::as_str) == Some("true"),
            custom_fields: custom_fields(&form),
        },
    );
    debug!(list_id, email, "subscribed");

    // `boolean` carries the consent flag and also asks for a plain-text reply.
    if form.contains_key("boolean") {
        Ok("1".to_string())
    } else {
        Ok("<p>You're subscribed!</p>".to_string())
    }
}

async fn unsubscribe(State(state): State<AppState>, Form(form): Form<Fields>) -> Reply {
    authorize(&state, &form)?;
    let list_id = field(&form, "list", "Some fields are missing.")?;
    let email = field(&form, "email", "Some fields are missing.")?;

    let mut store = state.store.write().await;
    let subscriber = store
        .lists
        .get_mut(list_id)
        .and_then(|list| list.subscribers.get_mut(email))
        .ok_or("Email does not exist.")?;
    subscriber.status = Status::Unsubscribed;
    Ok("1".to_string())
}

async fn subscription_status(State(state): State<AppState>, Form(form): Form<Fields>) -> Reply {
    authorize(&state, &form)?;
    let list_id = field(&form, "list", "List ID not passed")?;
    let email = field(&form, "email", "Email not passed")?;

    let store = state.store.read().await;
    let list = store.lists.get(list_id).ok_or("List does not exist")?;
    let subscriber = list
        .subscribers
        .get(email)
        .ok_or("Email does not exist in list")?;
    Ok(subscriber.status.label().to_string())
}

async fn active_count(State(state): State<AppState>, Form(form): Form<Fields>) -> Reply {
    authorize(&state, &form)?;
    let list_id = field(&form, "list", "List ID not passed")?;

    let store = state.store.read().await;
    let list = store.lists.get(list_id).ok_or("List does not exist")?;
    Ok(count(list, Status::Subscribed).to_string())
}

async fn count_by_status(State(state): State<AppState>, Form(form): Form<Fields>) -> Reply {
    authorize(&state, &form)?;
    let list_id = field(&form, "list", "List ID not passed")?;
    let wanted = field(&form, "status", "Status not passed")?;
    let status = [
        Status::Subscribed,
        Status::Unsubscribed,
        Status::Unconfirmed,
        Status::Bounced,
        Status::Complained,
    ]
    .into_iter()
    .find(|s| s.count_key() == wanted)
    .ok_or("Invalid status")?;

    let store = state.store.read().await;
    let list = store.lists.get(list_id).ok_or("List does not exist")?;
    Ok(count(list, status).to_string())
}

async fn total_active(State(state): State<AppState>, Form(form): Form<Fields>) -> Reply {
    authorize(&state, &form)?;
    let brand_id = field(&form, "brand_id", "Brand ID not passed")?;

    let store = state.store.read().await;
    let total: usize = store
        .lists
        .values()
        .filter(|list| list.brand_id == brand_id)
        .map(|list| count(list, Status::Subscribed))
        .sum();
    Ok(total.to_string())
}

async fn delete_subscriber(State(state): State<AppState>, Form(form): Form<Fields>) -> Reply {
    authorize(&state, &form)?;
    let list_id = field(&form, "list", "List ID not passed")?;
    let email = field(&form, "email", "Email not passed")?;

    let mut store = state.store.write().await;
    store
        .lists
        .get_mut(list_id)
        .and_then(|list| list.subscribers.remove(email))
        .ok_or("Subscriber does not exist")?;
    Ok("Subscriber deleted".to_string())
}

async fn edit_subscriber(State(state): State<AppState>, Form(form): Form<Fields>) -> Reply {
    authorize(&state, &form)?;
    let list_id = field(&form, "list", "List ID not passed")?;
    let email = field(&form, "email", "Email not passed")?;

    let mut store = state.store.write().await;
    let subscriber = store
        .lists
        .get_mut(list_id)
        .and_then(|list| list.subscribers.get_mut(email))
        .ok_or("Subscriber does not exist")?;
    if let Some(name) = form.get("name") {
        subscriber.name = Some(name.clone());
    }
    subscriber.custom_fields.extend(custom_fields(&form));
    Ok("Subscriber updated".to_string())
}

fn count(list: &MailingList, status: Status) -> usize {
    list.subscribers
        .values()
        .filter(|s| s.status == status)
        .count()
}

async fn store_campaign(state: &AppState, form: &Fields, campaign_state: CampaignState) -> Result<(), &'static str> {
    authorize(state, form)?;
    field(form, "from_name", "From name not passed")?;
    field(form, "from_email", "From email not passed")?;
    field(form, "reply_to", "Reply to email not passed")?;
    let title = field(form, "title", "Title not passed")?;
    field(form, "subject", "Subject not passed")?;
    field(form, "html_text", "HTML not passed")?;
    let list_ids: Vec<String> = field(form, "list_ids", "List or segment ID(s) not passed")?
        .split(',')
        .map(str::to_string)
        .collect();

    let mut store = state.store.write().await;
    if list_ids.iter().any(|id| !store.lists.contains_key(id)) {
        return Err("One or more list IDs are invalid");
    }
    store.campaigns.push(Campaign {
        title: title.to_string(),
        brand_id: form.get("brand_id").cloned(),
        list_ids,
        query_string: form.get("query_string").cloned(),
        state: campaign_state,
    });
    Ok(())
}

async fn create_campaign(State(state): State<AppState>, Form(form): Form<Fields>) -> Reply {
    store_campaign(&state, &form, CampaignState::Sending).await?;
    Ok("Campaign created and now sending".to_string())
}

async fn create_draft(State(state): State<AppState>, Form(form): Form<Fields>) -> Reply {
    field(&form, "brand_id", "Brand ID not passed")?;
    store_campaign(&state, &form, CampaignState::Draft).await?;
    Ok("Draft campaign created".to_string())
}

async fn schedule_campaign(State(state): State<AppState>, Form(form): Form<Fields>) -> Reply {
    let send_at = field(&form, "send_campaign", "Schedule date time not passed")?.to_string();
    store_campaign(&state, &form, CampaignState::Scheduled(send_at)).await?;
    Ok("Campaign scheduled".to_string())
}
