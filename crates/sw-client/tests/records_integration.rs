use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sw_client::{ClientConfig, ClientError, HttpRecordRepository, RecordClient};
use sw_core::{
    Condition, Humidity, Id, Password, Record, RecordDate, RecordRepository, RepositoryError,
    Temperature, Username, ValidationKind, Wind,
};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::with_api_url(format!("{}/api/v1", server.uri()))
}

fn credentials() -> (Username, Password) {
    (
        Username::new("weatherman").unwrap(),
        Password::new("correct-horse").unwrap(),
    )
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login/"))
        .and(body_json(json!({
            "username": "weatherman",
            "email": "",
            "password": "correct-horse"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "key": "abc123" })))
        .mount(server)
        .await;
}

async fn logged_in_client(server: &MockServer) -> RecordClient {
    mount_login(server).await;
    let mut client = RecordClient::new(&config_for(server)).unwrap();
    let (username, password) = credentials();
    client.login(&username, &password).await.unwrap();
    client
}

#[tokio::test]
async fn login_stores_the_token_for_later_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/records/"))
        .and(header("Authorization", "Token abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    assert!(client.is_authenticated());
    assert!(client.list_records().await.unwrap().is_empty());
}

#[tokio::test]
async fn rejected_login_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "non_field_errors": ["Unable to log in with provided credentials."]
        })))
        .mount(&server)
        .await;

    let mut client = RecordClient::new(&config_for(&server)).unwrap();
    let (username, password) = credentials();
    let err = client.login(&username, &password).await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn listed_records_are_validated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/records/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 44,
                "condition": "1",
                "humidity": 60,
                "temperature": 40,
                "wind": 20,
                "date": "2022-10-20T11:54:00+02:00"
            },
            {
                "id": 45,
                "condition": "3",
                "humidity": 85,
                "temperature": -4,
                "wind": 70,
                "date": "2022-10-21T06:00:00Z"
            }
        ])))
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let records = client.list_records().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id(), Some(Id::new(44).unwrap()));
    assert_eq!(records[1].condition().value(), "RAINY");
    assert_eq!(records[1].record_date().value(), "21/10/2022 at 06:00");
}

#[tokio::test]
async fn invalid_listed_record_is_an_invalid_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/records/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 44,
                "condition": "1",
                "humidity": 60,
                "temperature": 90,
                "wind": 20,
                "date": "2022-10-20T11:54:00"
            }
        ])))
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    match client.list_records().await.unwrap_err() {
        ClientError::InvalidPayload(err) => {
            assert_eq!(err.validation_kind(), Some(ValidationKind::OutOfRange));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn create_posts_the_service_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/records/"))
        .and(header("Authorization", "Token abc123"))
        .and(body_json(json!({
            "condition": "2",
            "humidity": 60,
            "temperature": 12,
            "wind": 13,
            "date": "2022-10-20T11:54"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 46 })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let record = Record::new(
        Temperature::new(12).unwrap(),
        Humidity::new(60).unwrap(),
        Wind::new(13).unwrap(),
        Condition::create("2").unwrap(),
        RecordDate::create("20/10/2022 11:54").unwrap(),
    );
    client.create_record(&record).await.unwrap();
}

#[tokio::test]
async fn delete_targets_the_record_id() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/records/44/"))
        .and(header("Authorization", "Token abc123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    client.delete_record(Id::new(44).unwrap()).await.unwrap();
}

#[tokio::test]
async fn server_errors_carry_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/records/7/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    match client.delete_record(Id::new(7).unwrap()).await.unwrap_err() {
        ClientError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn logout_clears_the_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout/"))
        .and(header("Authorization", "Token abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = logged_in_client(&server).await;
    client.logout().await.unwrap();
    assert!(!client.is_authenticated());
    assert!(matches!(
        client.list_records().await,
        Err(ClientError::NotAuthenticated)
    ));
}

#[test]
fn blocking_repository_drives_the_client() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/v1/records/"))
            .and(header("Authorization", "Token abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": 3,
                    "condition": "4",
                    "humidity": 10,
                    "temperature": 31,
                    "wind": 5,
                    "date": "2023-07-01T15:00:00"
                }
            ])))
            .mount(&server)
            .await;
        server
    });

    let mut repository = HttpRecordRepository::new(&config_for(&server)).unwrap();
    assert!(matches!(
        repository.list(),
        Err(RepositoryError::NotAuthenticated)
    ));

    let (username, password) = credentials();
    repository.login(&username, &password).unwrap();
    let records = repository.list().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].condition().value(), "FLURRY");
}
