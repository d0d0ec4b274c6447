//! RestClient against a mock sObject Collections endpoint.

use bulk_saver::{BatchKind, BulkSaver, BulkSaverConfig, Error, RemoteClient, RestClient, RestConfig, SObject};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

const COLLECTIONS: &str = "/services/data/v59.0/composite/sobjects";

async fn fixture() -> (ServerGuard, RestClient) {
    let server = Server::new_async().await;
    let client = RestClient::new(RestConfig::new(server.url()).with_access_token("test-token"))
        .expect("client");
    (server, client)
}

#[tokio::test]
async fn test_create_posts_records_with_type_attributes() {
    let (mut server, client) = fixture().await;
    let mock = server
        .mock("POST", COLLECTIONS)
        .match_header("authorization", "Bearer test-token")
        .match_header("x-request-id", Matcher::Any)
        .match_body(Matcher::Json(json!({
            "allOrNone": false,
            "records": [
                {"attributes": {"type": "Account"}, "Name": "Acme"},
                {"attributes": {"type": "Account"}, "Name": ""}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"id": "001000000000001", "success": true, "errors": []},
                {"id": null, "success": false, "errors": [{
                    "statusCode": "REQUIRED_FIELD_MISSING",
                    "message": "Required fields are missing: [Name]",
                    "fields": ["Name"]
                }]}
            ])
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let records = [
        SObject::new().with_field("Name", "Acme"),
        SObject::new().with_field("Name", ""),
    ];
    let outcomes = client.create(&records, "Account").await.unwrap();
    mock.assert_async().await;

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].success);
    assert_eq!(outcomes[0].id.as_deref(), Some("001000000000001"));
    assert!(!outcomes[1].success);
    assert_eq!(outcomes[1].errors[0].status_code, "REQUIRED_FIELD_MISSING");
    assert_eq!(outcomes[1].errors[0].fields, vec!["Name".to_string()]);
}

#[tokio::test]
async fn test_update_patches_collection() {
    let (mut server, client) = fixture().await;
    let mock = server
        .mock("PATCH", COLLECTIONS)
        .match_body(Matcher::PartialJson(json!({
            "records": [{"attributes": {"type": "Contact"}, "Id": "003000000000001"}]
        })))
        .with_status(200)
        .with_body(r#"[{"id":"003000000000001","success":true,"errors":[]}]"#)
        .create_async()
        .await;

    let outcomes = client
        .update(&[SObject::with_id("003000000000001").with_field("Phone", "555")], "Contact")
        .await
        .unwrap();
    mock.assert_async().await;
    assert!(outcomes[0].success);
}

#[tokio::test]
async fn test_upsert_targets_type_and_match_field() {
    let (mut server, client) = fixture().await;
    let mock = server
        .mock("PATCH", format!("{COLLECTIONS}/Account/External_Id__c").as_str())
        .match_body(Matcher::PartialJson(json!({
            "records": [{"attributes": {"type": "Account"}, "External_Id__c": "X-1"}]
        })))
        .with_status(200)
        .with_body(r#"[{"id":"001000000000009","success":true,"errors":[],"created":true}]"#)
        .create_async()
        .await;

    let outcomes = client
        .upsert(
            "External_Id__c",
            &[SObject::new().with_field("External_Id__c", "X-1")],
            "Account",
        )
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(outcomes[0].created, Some(true));
}

#[tokio::test]
async fn test_delete_sends_ids_as_query() {
    let (mut server, client) = fixture().await;
    let mock = server
        .mock("DELETE", Matcher::Regex(format!("^{}", regex_escape(COLLECTIONS))))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("ids".into(), "001A,001B".into()),
            Matcher::UrlEncoded("allOrNone".into(), "false".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"[{"id":"001A","success":true,"errors":[]},{"id":"001B","success":true,"errors":[]}]"#,
        )
        .create_async()
        .await;

    let outcomes =
        RemoteClient::<SObject>::delete(&client, &["001A".to_string(), "001B".to_string()])
            .await
            .unwrap();
    mock.assert_async().await;
    assert_eq!(outcomes.len(), 2);
}

#[tokio::test]
async fn test_rejected_call_maps_to_remote_error() {
    let (mut server, client) = fixture().await;
    let _mock = server
        .mock("POST", COLLECTIONS)
        .with_status(401)
        .with_body(r#"[{"message":"Session expired or invalid","errorCode":"INVALID_SESSION_ID"}]"#)
        .create_async()
        .await;

    let err = client
        .create(&[SObject::new().with_field("Name", "Acme")], "Account")
        .await
        .unwrap_err();
    match err {
        Error::Remote {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 401);
            assert_eq!(code, "INVALID_SESSION_ID");
            assert_eq!(message, "Session expired or invalid");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_bulk_saver_over_rest_keeps_queue_on_rejection() {
    let (mut server, client) = fixture().await;
    let deletes = server
        .mock("DELETE", Matcher::Regex(format!("^{}", regex_escape(COLLECTIONS))))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"[{"id":"001A","success":true,"errors":[]}]"#)
        .expect(1)
        .create_async()
        .await;
    let creates = server
        .mock("POST", COLLECTIONS)
        .with_status(500)
        .with_body(r#"[{"message":"An unexpected error occurred","errorCode":"UNKNOWN_EXCEPTION"}]"#)
        .expect(1)
        .create_async()
        .await;

    let config = BulkSaverConfig::new().with_save_limit(10);
    let mut saver = BulkSaver::with_config(client, config).unwrap();
    saver.delete(&SObject::with_id("001A")).await.unwrap();
    saver
        .save(SObject::new().with_field("Name", "Acme"), "Account", None)
        .await
        .unwrap();

    let err = saver.flush().await.unwrap_err();
    deletes.assert_async().await;
    creates.assert_async().await;

    let flush = err.as_flush().unwrap();
    assert_eq!(flush.kind, BatchKind::Create);
    assert_eq!(flush.results.deleted.len(), 1);
    assert!(matches!(err.root(), Error::Remote { status: 500, .. }));
    assert_eq!(saver.pending(BatchKind::Create, "Account").unwrap().len(), 1);
}

fn regex_escape(path: &str) -> String {
    path.replace('.', r"\.")
}
