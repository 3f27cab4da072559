//! The exchange body relays the widget metadata without reshaping it.

use serde_json::{json, Value};

use linkglue::{ExchangeRequest, LinkMetadata, PublicToken};

#[test]
fn widget_metadata_is_relayed_verbatim() {
    let institution = json!({"name": "First Platypus Bank", "institution_id": "ins_109508"});
    let accounts = json!([
        {"id": "acc1", "name": "Plaid Checking", "mask": "0000",
         "type": "depository", "subtype": "checking", "class_type": "personal"},
        {"id": "acc2", "name": "Plaid Saving", "mask": "1111",
         "type": "depository", "subtype": "savings"}
    ]);
    let metadata: LinkMetadata = serde_json::from_value(json!({
        "institution": institution,
        "accounts": accounts,
        "link_session_id": "sess-9",
        "public_token": "ignored-here"
    }))
    .unwrap();

    let req = ExchangeRequest::new(PublicToken::new("public-sandbox-1"), metadata);
    let body: Value = serde_json::from_str(&req.to_json().unwrap()).unwrap();

    assert_eq!(body["public_token"], "public-sandbox-1");
    assert_eq!(body["institution"], institution);
    assert_eq!(body["accounts"], accounts);
    assert_eq!(body["link_session_id"], "sess-9");
    assert_eq!(body.as_object().unwrap().len(), 4);
}

#[test]
fn absent_keys_are_omitted_and_null_is_kept() {
    let metadata: LinkMetadata =
        serde_json::from_value(json!({"accounts": ["a1"], "institution": null})).unwrap();
    let req = ExchangeRequest::new(PublicToken::new("pt-1"), metadata);

    assert_eq!(
        req.to_json().unwrap(),
        r#"{"public_token":"pt-1","accounts":["a1"],"institution":null}"#
    );
}

#[test]
fn nested_nulls_and_key_order_survive_the_relay() {
    let metadata: LinkMetadata = serde_json::from_str(
        r#"{"institution":null,"accounts":[{"mask":"0000","id":"acc1","verification_status":null}],"link_session_id":"s1"}"#,
    )
    .unwrap();
    let req = ExchangeRequest::new(PublicToken::new("pt"), metadata);

    assert_eq!(
        req.to_json().unwrap(),
        r#"{"public_token":"pt","accounts":[{"mask":"0000","id":"acc1","verification_status":null}],"institution":null,"link_session_id":"s1"}"#
    );
}

#[test]
fn typed_views_read_the_relayed_values() {
    let metadata: LinkMetadata = serde_json::from_value(json!({
        "institution": {"name": "First Platypus Bank", "institution_id": "ins_109508"},
        "accounts": ["a1", {"id": "acc2", "verification_status": null}, 7],
        "link_session_id": null
    }))
    .unwrap();

    assert_eq!(metadata.institution_id().as_deref(), Some("ins_109508"));
    assert_eq!(metadata.account_ids(), vec!["a1", "acc2"]);
    assert_eq!(metadata.link_session_id(), None);
    assert_eq!(metadata.link_session_id, Some(Value::Null));
}
