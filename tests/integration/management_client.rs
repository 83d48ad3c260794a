use gateway_assess::models::ApiType;
use gateway_assess::platform::{CreateAction, ManagementClient, PlatformResponse, TargetPlatform};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, token: Option<&str>) -> ManagementClient {
    ManagementClient::new(format!("{}/v1", server.uri()), "acme", token.map(str::to_string)).unwrap()
}

#[tokio::test]
async fn test_create_uploads_bundle_as_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/organizations/acme/sharedflows"))
        .and(query_param("name", "auth"))
        .and(query_param("action", "validate"))
        .and(header("authorization", "Bearer t0ken"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("bundle-bytes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "auth", "revision": "1"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server, Some("t0ken"))
        .create(ApiType::Sharedflows, "auth", b"bundle-bytes".to_vec(), CreateAction::Validate)
        .await
        .unwrap();

    assert_eq!(response, PlatformResponse::Accepted(json!({"name": "auth", "revision": "1"})));
}

#[tokio::test]
async fn test_create_rejection_carries_error_details() {
    let server = MockServer::start().await;
    let error = json!({
        "code": 400,
        "message": "bundle contains errors",
        "details": [{"violations": [{"description": "Unsupported policy type"}]}]
    });
    Mock::given(method("POST"))
        .and(path("/v1/organizations/acme/apis"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": error.clone()})))
        .mount(&server)
        .await;

    let response = client(&server, None)
        .create(ApiType::Apis, "orders", Vec::new(), CreateAction::Validate)
        .await
        .unwrap();

    assert_eq!(response, PlatformResponse::Rejected { status: 400, error });
    assert_eq!(response.error_details().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_server_errors_are_transient() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .create(ApiType::Apis, "orders", Vec::new(), CreateAction::Validate)
        .await
        .unwrap_err();

    assert!(err.is_transient());
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_get_env_object_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/organizations/acme/environments/prod/sharedflows/auth/deployments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deployments": [{"revision": "2"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server, None)
        .get_env_object("prod", "sharedflows", "auth/deployments")
        .await
        .unwrap();

    assert_eq!(response, PlatformResponse::Accepted(json!({"deployments": [{"revision": "2"}]})));
}

#[tokio::test]
async fn test_not_found_is_a_rejection_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such sharedflow"))
        .mount(&server)
        .await;

    let response = client(&server, None)
        .get_env_object("prod", "sharedflows", "gone/deployments")
        .await
        .unwrap();

    assert_eq!(
        response,
        PlatformResponse::Rejected {
            status: 404,
            error: json!({"message": "no such sharedflow"}),
        }
    );
}

#[tokio::test]
async fn test_unreachable_server_is_transient() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = ManagementClient::new(format!("http://127.0.0.1:{port}/v1"), "acme", None).unwrap();
    let err = client.get_env_object("prod", "sharedflows", "auth/deployments").await.unwrap_err();
    assert!(err.is_transient());
}
