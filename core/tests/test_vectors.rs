//! Verify request building and response classification against the JSON
//! vectors stored in `test-vectors/`.
//!
//! Each case names an operation, its inputs, the exact form body expected on
//! the wire, a simulated response body, and either the expected result or the
//! expected error kind.

use std::sync::Arc;

use sendy_core::testing::MockTransport;
use sendy_core::{
    ApiError, Campaign, ClientConfig, CustomFields, ListIds, SendyClient, SubscribeOptions, SubscriberStatus,
    UpdateSubscriber,
};
use serde_json::{json, Value};

const BASE_URL: &str = "http://test-sendy-url.com/";

fn client() -> (SendyClient<Arc<MockTransport>>, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    let config = ClientConfig::new(BASE_URL, "test-api-key").with_brand_id("test-brand-id");
    let client = SendyClient::with_transport(config, Arc::clone(&transport)).unwrap();
    (client, transport)
}

fn str_field<'a>(input: &'a Value, key: &str) -> &'a str {
    input[key].as_str().unwrap_or_else(|| panic!("missing {key}"))
}

fn custom_fields(input: &Value) -> CustomFields {
    input["custom_fields"]
        .as_object()
        .map(|fields| {
            fields
                .iter()
                .map(|(k, v)| (k.clone(), v.as_str().unwrap().to_string()))
                .collect()
        })
        .unwrap_or_default()
}

fn campaign(input: &Value) -> Campaign {
    let list_ids: Vec<String> = input["list_ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    Campaign {
        from_name: "John Doe".to_string(),
        from_email: "john@example.com".to_string(),
        reply_to: "reply@example.com".to_string(),
        title: "Test Campaign".to_string(),
        subject: "Test Subject".to_string(),
        plain_text: "Plain text content".to_string(),
        html_text: "<p>HTML content</p>".to_string(),
        list_ids: ListIds::from(list_ids),
        brand_id: input["brand_id"].as_str().map(String::from),
        query_string: input["query_string"].as_str().map(String::from),
    }
}

/// Runs the named operation and converts its result into JSON for comparison.
fn run(client: &SendyClient<Arc<MockTransport>>, operation: &str, input: &Value) -> Result<Value, ApiError> {
    match operation {
        "subscribe" => {
            let mut options = SubscribeOptions::new().gdpr_consent(input["gdpr_consent"].as_bool().unwrap());
            options.name = input["name"].as_str().map(String::from);
            options.custom_fields = custom_fields(input);
            client
                .subscribe(str_field(input, "list"), str_field(input, "email"), &options)
                .map(Value::from)
        }
        "unsubscribe" => client
            .unsubscribe(str_field(input, "list"), str_field(input, "email"))
            .map(Value::from),
        "subscription_status" => client
            .subscription_status(str_field(input, "list"), str_field(input, "email"))
            .map(Value::from),
        "active_subscriber_count" => client
            .active_subscriber_count(str_field(input, "list"))
            .map(Value::from),
        "subscriber_count_by_status" => {
            let status: SubscriberStatus = str_field(input, "status").parse().unwrap();
            client
                .subscriber_count_by_status(str_field(input, "list"), status)
                .map(Value::from)
        }
        "total_active_subscribers" => client
            .total_active_subscribers(input["brand_id"].as_str())
            .map(Value::from),
        "delete_subscriber" => client
            .delete_subscriber(str_field(input, "list"), str_field(input, "email"))
            .map(Value::from),
        "update_subscriber" => {
            let update = UpdateSubscriber {
                name: input["name"].as_str().map(String::from),
                custom_fields: custom_fields(input),
            };
            client
                .update_subscriber(str_field(input, "list"), str_field(input, "email"), &update)
                .map(Value::from)
        }
        "create_campaign" => client.create_campaign(&campaign(input)).map(Value::from),
        "create_draft_campaign" => client.create_draft_campaign(&campaign(input)).map(Value::from),
        "schedule_campaign" => client
            .schedule_campaign(&campaign(input), str_field(input, "send_at"))
            .map(Value::from),
        other => panic!("unknown operation: {other}"),
    }
}

fn check_vectors(raw: &str) {
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let (client, transport) = client();
        transport.respond(case["simulated_body"].as_str().unwrap());

        let result = run(&client, case["operation"].as_str().unwrap(), &case["input"]);

        // Verify build
        let expected_req = &case["expected_request"];
        let request = transport.last_request().unwrap();
        assert_eq!(
            request.url,
            format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()),
            "{name}: url"
        );
        assert_eq!(request.body, expected_req["body"].as_str().unwrap(), "{name}: body");
        assert_eq!(
            request.headers,
            vec![(
                "content-type".to_string(),
                "application/x-www-form-urlencoded".to_string()
            )],
            "{name}: headers"
        );

        // Verify classification
        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "Remote" => {
                    assert!(matches!(err, ApiError::Remote(_)), "{name}: expected Remote");
                    assert_eq!(json!(err.to_string()), case["simulated_body"], "{name}: message");
                }
                "Parse" => assert!(err.is_parse(), "{name}: expected Parse"),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
        } else {
            let value = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e}"));
            assert_eq!(value, case["expected_result"], "{name}: result");
        }
    }
}

#[test]
fn subscriber_test_vectors() {
    check_vectors(include_str!("../../test-vectors/subscribers.json"));
}

#[test]
fn campaign_test_vectors() {
    check_vectors(include_str!("../../test-vectors/campaigns.json"));
}
