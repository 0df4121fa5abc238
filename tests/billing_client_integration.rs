//! Integration tests for the HTTP billing client over a scripted transport,
//! and for the billing operations end to end against the in-memory service.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use http::{Method, StatusCode};
use serde_json::json;

use study_on::adapters::billing::{InMemoryBillingService, ADMIN_EMAIL, ADMIN_PASSWORD, USER_EMAIL, USER_PASSWORD};
use study_on::adapters::{HttpBillingClient, ScriptedTransport};
use study_on::application::{PayCourseCommand, PayCourseHandler};
use study_on::domain::billing::{
    AccessToken, BillingCourse, BillingError, CourseDraft, CourseType, Credentials,
    PaymentOutcome, RefreshToken, TransactionFilter, TransactionType,
};
use study_on::ports::BillingService;

fn token_for(username: &str, exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({ "username": username, "roles": ["ROLE_USER"], "exp": exp }).to_string(),
    );
    format!("{header}.{payload}.signature")
}

fn scripted() -> (ScriptedTransport, HttpBillingClient) {
    let transport = ScriptedTransport::new();
    let client = HttpBillingClient::new(Arc::new(transport.clone()));
    (transport, client)
}

fn bearer() -> AccessToken {
    AccessToken::new(token_for(USER_EMAIL, 4_102_444_800))
}

// ════════════════════════════════════════════════════════════════════════════
// Requests on the wire
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn authenticate_posts_credentials_and_decodes_pair() {
    let (transport, client) = scripted();
    let token = token_for(USER_EMAIL, 4_102_444_800);
    transport.push_json(
        StatusCode::OK,
        json!({ "token": token, "refresh_token": "r-1" }),
    );

    let pair = client
        .authenticate(&Credentials::new(USER_EMAIL, USER_PASSWORD))
        .await
        .unwrap();

    assert_eq!(pair.access_token.claims().unwrap().username, USER_EMAIL);
    assert_eq!(pair.refresh_token, RefreshToken::new("r-1"));

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].path(), "/auth");
    assert_eq!(requests[0].bearer, None);
    assert_eq!(
        requests[0].body,
        Some(json!({ "username": USER_EMAIL, "password": USER_PASSWORD }))
    );
}

#[tokio::test]
async fn refresh_sends_refresh_token_body() {
    let (transport, client) = scripted();
    transport.push_json(
        StatusCode::OK,
        json!({ "token": token_for(USER_EMAIL, 4_102_444_800), "refresh_token": "r-2" }),
    );

    let pair = client.refresh(&RefreshToken::new("r-1")).await.unwrap();

    assert_eq!(pair.refresh_token, RefreshToken::new("r-2"));
    let request = &transport.requests()[0];
    assert_eq!(request.path(), "/token/refresh");
    assert_eq!(request.body, Some(json!({ "refresh_token": "r-1" })));
}

#[tokio::test]
async fn transactions_request_carries_filter_and_bearer() {
    let (transport, client) = scripted();
    transport.push_json(StatusCode::OK, json!([]));

    let transactions = client
        .list_transactions(&bearer(), &TransactionFilter::active_payments(Some("python-programming")))
        .await
        .unwrap();

    assert!(transactions.is_empty());
    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path(), "/transactions");
    assert_eq!(request.bearer, Some(bearer()));
    assert_eq!(
        request.query,
        vec![
            ("filter[type]".to_string(), "payment".to_string()),
            ("filter[course_code]".to_string(), "python-programming".to_string()),
            ("filter[skip_expired]".to_string(), "1".to_string()),
        ]
    );
}

#[tokio::test]
async fn three_transactions_decode_in_order() {
    let (transport, client) = scripted();
    transport.push_json(
        StatusCode::OK,
        json!([
            { "id": 1, "created_at": "2024-03-01T10:00:00+00:00", "type": "deposit", "amount": 1000 },
            { "id": 2, "created_at": "2024-03-01T11:00:00+00:00", "type": "payment",
              "course_code": "python-programming", "amount": 10,
              "expires_at": "2024-03-08T11:00:00+00:00" },
            { "id": 3, "created_at": "2024-03-01T12:00:00+00:00", "type": "payment",
              "course_code": "building-information-modeling", "amount": 20 }
        ]),
    );

    let transactions = client
        .list_transactions(&bearer(), &TransactionFilter::all())
        .await
        .unwrap();

    assert_eq!(transactions.len(), 3);
    assert!(transport.requests()[0].query.is_empty());
    assert_eq!(transactions[0].transaction_type, TransactionType::Deposit);
    assert!(transactions[1].expires_at.is_some());
    assert_eq!(transactions[2].expires_at, None);
    assert_eq!(transactions[2].amount, 20.0);
}

// ════════════════════════════════════════════════════════════════════════════
// Status mapping
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn endpoint_statuses_map_to_typed_errors() {
    let (transport, client) = scripted();
    transport.push(StatusCode::UNAUTHORIZED, r#"{"code":401}"#);
    transport.push(StatusCode::CONFLICT, r#"{"code":409}"#);
    transport.push(StatusCode::UNAUTHORIZED, r#"{"code":401}"#);
    transport.push(StatusCode::NOT_FOUND, r#"{"code":404}"#);

    let credentials = Credentials::new(USER_EMAIL, "wrong");
    assert_eq!(
        client.authenticate(&credentials).await,
        Err(BillingError::InvalidCredentials)
    );
    assert_eq!(
        client.register(&credentials).await,
        Err(BillingError::UserAlreadyExists)
    );
    assert_eq!(
        client.current_identity(&bearer()).await,
        Err(BillingError::InvalidToken)
    );
    assert_eq!(
        client.get_course("missing").await,
        Err(BillingError::NotFound)
    );
}

#[tokio::test]
async fn save_course_statuses_map_to_typed_errors() {
    let cases = [
        (StatusCode::UNAUTHORIZED, BillingError::InvalidToken),
        (StatusCode::FORBIDDEN, BillingError::Forbidden),
        (StatusCode::NOT_FOUND, BillingError::NotFound),
        (StatusCode::CONFLICT, BillingError::AlreadyExists),
    ];
    let draft = CourseDraft::new("rust-basics", "Rust basics", CourseType::Buy, 30.0);

    for (status, expected) in cases {
        let (transport, client) = scripted();
        transport.push(status, r#"{"code":0}"#);

        let result = client.save_course(&bearer(), &draft, Some("rust-basics")).await;

        assert_eq!(result, Err(expected), "status {status}");
    }
}

#[tokio::test]
async fn save_course_posts_draft_to_create_or_update_path() {
    let (transport, client) = scripted();
    transport.push_json(StatusCode::CREATED, json!({ "success": true }));
    transport.push_json(StatusCode::OK, json!({ "success": true }));
    let draft = CourseDraft::new("rust-basics", "Rust basics", CourseType::Rent, 12.5);

    assert!(client.save_course(&bearer(), &draft, None).await.unwrap());
    assert!(client
        .save_course(&bearer(), &draft, Some("old-code"))
        .await
        .unwrap());

    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].path(), "/courses");
    assert_eq!(requests[1].path(), "/courses/old-code");
    let expected_body = json!({
        "code": "rust-basics",
        "name": "Rust basics",
        "type": "rent",
        "price": 12.5,
    });
    for request in &requests {
        assert_eq!(request.body, Some(expected_body.clone()));
        assert_eq!(request.bearer, Some(bearer()));
    }
}

#[tokio::test]
async fn rejected_token_on_transactions_is_invalid_token() {
    let (transport, client) = scripted();
    transport.push(StatusCode::UNAUTHORIZED, r#"{"code":401}"#);

    assert_eq!(
        client
            .list_transactions(&bearer(), &TransactionFilter::all())
            .await,
        Err(BillingError::InvalidToken)
    );
}

#[tokio::test]
async fn course_code_stays_one_path_segment() {
    let (transport, client) = scripted();
    transport.push(StatusCode::NOT_FOUND, "");
    transport.push(StatusCode::NOT_FOUND, "");

    assert_eq!(client.get_course("a/b").await, Err(BillingError::NotFound));
    assert_eq!(
        client.pay_course(&bearer(), "a/b").await,
        Err(BillingError::NotFound)
    );

    let requests = transport.requests();
    assert_eq!(requests[0].segments, vec!["courses", "a/b"]);
    assert_eq!(requests[1].segments, vec!["courses", "a/b", "pay"]);
}

#[tokio::test]
async fn unmapped_status_is_service_unavailable() {
    let (transport, client) = scripted();
    transport.push(StatusCode::INTERNAL_SERVER_ERROR, "oops");
    transport.push(StatusCode::UNAUTHORIZED, "");

    assert!(matches!(
        client.list_courses().await,
        Err(BillingError::ServiceUnavailable(_))
    ));
    // refresh has no status table of its own
    assert!(matches!(
        client.refresh(&RefreshToken::new("stale")).await,
        Err(BillingError::ServiceUnavailable(_))
    ));
}

#[tokio::test]
async fn undecodable_body_is_malformed_response() {
    let (transport, client) = scripted();
    transport.push(StatusCode::OK, "<html>");

    assert!(matches!(
        client.list_courses().await,
        Err(BillingError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn identity_failing_validation_is_not_trusted() {
    let (transport, client) = scripted();
    transport.push_json(
        StatusCode::OK,
        json!({ "username": "not-an-email", "roles": [], "balance": 5 }),
    );

    assert!(matches!(
        client.current_identity(&bearer()).await,
        Err(BillingError::ServiceUnavailable(_))
    ));
}

#[tokio::test]
async fn pay_statuses_become_payment_outcomes() {
    let cases = [
        (StatusCode::OK, r#"{"success":true,"course_type":"buy"}"#, PaymentOutcome::Succeeded),
        (StatusCode::NOT_ACCEPTABLE, r#"{"code":406}"#, PaymentOutcome::InsufficientFunds),
        (StatusCode::CONFLICT, r#"{"code":409}"#, PaymentOutcome::AlreadyPaid),
        (StatusCode::NOT_FOUND, r#"{"code":404}"#, PaymentOutcome::Failed),
        (StatusCode::INTERNAL_SERVER_ERROR, "", PaymentOutcome::Failed),
    ];

    for (status, body, expected) in cases {
        let (transport, client) = scripted();
        transport.push(status, body);
        let handler = PayCourseHandler::new(Arc::new(client));

        let result = handler
            .handle(PayCourseCommand {
                access_token: bearer(),
                course_code: "building-information-modeling".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.outcome, expected, "status {status}");
        assert_eq!(transport.request_count(), 1);
        assert_eq!(transport.requests()[0].path(), "/courses/building-information-modeling/pay");
    }
}

#[tokio::test]
async fn pay_with_rejected_token_requires_reauthentication() {
    let (transport, client) = scripted();
    transport.push(StatusCode::UNAUTHORIZED, "");
    let handler = PayCourseHandler::new(Arc::new(client));

    let result = handler
        .handle(PayCourseCommand {
            access_token: bearer(),
            course_code: "python-programming".to_string(),
        })
        .await;

    assert_eq!(result.unwrap_err(), BillingError::InvalidToken);
}

#[tokio::test]
async fn transport_failure_surfaces_unchanged() {
    let (transport, client) = scripted();
    transport.push_error(BillingError::unavailable("connection refused"));

    assert_eq!(
        client.list_courses().await,
        Err(BillingError::unavailable("connection refused"))
    );
}

// ════════════════════════════════════════════════════════════════════════════
// Paid check
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn free_course_is_paid_without_asking_billing() {
    let (transport, client) = scripted();

    let paid = client
        .is_course_paid(&bearer(), &BillingCourse::free("interactive-sql-trainer"))
        .await
        .unwrap();

    assert!(paid);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn paid_course_needs_an_active_payment() {
    let (transport, client) = scripted();
    transport.push_json(StatusCode::OK, json!([]));
    transport.push_json(
        StatusCode::OK,
        json!([{ "id": 7, "created_at": "2024-03-01T12:00:00+00:00", "type": "payment",
                 "course_code": "python-programming", "amount": 10,
                 "expires_at": "2024-03-08T12:00:00+00:00" }]),
    );
    let course = BillingCourse::new("python-programming", CourseType::Rent, Some(10.0));

    assert!(!client.is_course_paid(&bearer(), &course).await.unwrap());
    assert!(client.is_course_paid(&bearer(), &course).await.unwrap());

    let request = &transport.requests()[0];
    assert!(request
        .query
        .contains(&("filter[course_code]".to_string(), "python-programming".to_string())));
}

// ════════════════════════════════════════════════════════════════════════════
// Billing operations against the in-memory service
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn saved_course_can_be_read_back_and_updated() {
    let billing = InMemoryBillingService::seeded();
    let admin = billing
        .authenticate(&Credentials::new(ADMIN_EMAIL, ADMIN_PASSWORD))
        .await
        .unwrap();
    let draft = CourseDraft::new("rust-basics", "Rust basics", CourseType::Buy, 30.0);

    assert!(billing.save_course(&admin.access_token, &draft, None).await.unwrap());
    assert_eq!(
        billing.get_course("rust-basics").await.unwrap(),
        BillingCourse::new("rust-basics", CourseType::Buy, Some(30.0))
    );

    let update = CourseDraft::new("rust-basics", "Rust basics", CourseType::Rent, 5.0);
    for _ in 0..2 {
        assert!(billing
            .save_course(&admin.access_token, &update, Some("rust-basics"))
            .await
            .unwrap());
    }
    assert_eq!(
        billing.get_course("rust-basics").await.unwrap(),
        BillingCourse::new("rust-basics", CourseType::Rent, Some(5.0))
    );
    assert_eq!(billing.list_courses().await.unwrap().len(), 4);

    assert_eq!(
        billing.save_course(&admin.access_token, &draft, None).await,
        Err(BillingError::AlreadyExists)
    );
}

#[tokio::test]
async fn regular_user_cannot_save_courses() {
    let billing = InMemoryBillingService::seeded();
    let user = billing
        .authenticate(&Credentials::new(USER_EMAIL, USER_PASSWORD))
        .await
        .unwrap();
    let draft = CourseDraft::new("rust-basics", "Rust basics", CourseType::Free, 0.0);

    assert_eq!(
        billing.save_course(&user.access_token, &draft, None).await,
        Err(BillingError::Forbidden)
    );
}

#[tokio::test]
async fn buying_then_renting_leaves_three_transactions() {
    let billing = InMemoryBillingService::seeded();
    let user = billing
        .authenticate(&Credentials::new(USER_EMAIL, USER_PASSWORD))
        .await
        .unwrap();

    billing
        .pay_course(&user.access_token, "building-information-modeling")
        .await
        .unwrap();
    let rent = billing
        .pay_course(&user.access_token, "python-programming")
        .await
        .unwrap();

    assert!(rent.success);
    assert!(rent.expires_at.is_some());
    let history = billing
        .list_transactions(&user.access_token, &TransactionFilter::all())
        .await
        .unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(billing.balance_of(USER_EMAIL), Some(970.0));

    assert_eq!(
        billing
            .pay_course(&user.access_token, "building-information-modeling")
            .await,
        Err(BillingError::AlreadyPaid)
    );
}
