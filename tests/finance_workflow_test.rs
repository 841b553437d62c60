//! Finance and approval workflow integration tests
//!
//! Database-bound: run with `cargo test -- --ignored` against the Postgres
//! pointed at by `TEST_DATABASE_URL`. The functions gateway is mocked with
//! wiremock, so receipt generation runs end to end.

mod helpers;

use chrono::{Duration, Utc};
use serial_test::serial;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ekklesia::config::{FeaturesConfig, FunctionsConfig};
use ekklesia::models::{CreateFeeRequest, FeeStatus, PersonRole, SubmitWorkflowRequest};
use ekklesia::services::{FinanceService, FunctionsClient, WorkflowService};
use ekklesia::DatabaseService;
use ekklesia::EkklesiaError;

use helpers::database_helper::TestDatabase;
use helpers::test_data;

async fn finance_service(database: &DatabaseService, gateway: &MockServer) -> FinanceService {
    let functions = FunctionsClient::new(FunctionsConfig {
        base_url: gateway.uri(),
        timeout_seconds: 5,
        read_retries: 2,
    })
    .unwrap();

    FinanceService::new(
        database.finance.clone(),
        database.people.clone(),
        functions,
        FeaturesConfig {
            absence_sweep: true,
            overdue_fee_sweep: true,
            thermal_printing: false,
        },
    )
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL pointing at a provisioned Postgres"]
async fn settling_a_fee_stamps_payment_and_receipt() {
    let test_db = TestDatabase::new().await.unwrap();
    let database = DatabaseService::new(test_db.pool.clone());

    let gateway = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate-receipt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": { "document": "..." }
        })))
        .mount(&gateway)
        .await;

    let service = finance_service(&database, &gateway).await;
    let member = test_data::create_test_person(&database, PersonRole::Member)
        .await
        .unwrap();

    let fee = service
        .create_fee(CreateFeeRequest {
            person_id: member.id,
            description: "Mensalidade de março".to_string(),
            amount_cents: 2500,
            due_date: (Utc::now() + Duration::days(10)).date_naive(),
        })
        .await
        .unwrap();

    let paid = service.mark_paid(fee.id).await.unwrap();
    assert_eq!(paid.status, "paid");
    assert!(paid.paid_at.is_some());
    assert!(paid
        .receipt_number
        .as_deref()
        .is_some_and(|number| number.starts_with("RCB-")));

    // Settling twice is refused.
    assert!(matches!(
        service.mark_paid(fee.id).await,
        Err(EkklesiaError::BusinessRule(_))
    ));
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL pointing at a provisioned Postgres"]
async fn overdue_sweep_flips_only_past_due_pending_fees() {
    let test_db = TestDatabase::new().await.unwrap();
    let database = DatabaseService::new(test_db.pool.clone());

    let gateway = MockServer::start().await;
    let service = finance_service(&database, &gateway).await;
    let member = test_data::create_test_person(&database, PersonRole::Member)
        .await
        .unwrap();

    let today = Utc::now().date_naive();
    let stale = service
        .create_fee(CreateFeeRequest {
            person_id: member.id,
            description: "Mensalidade de janeiro".to_string(),
            amount_cents: 2500,
            due_date: today - Duration::days(15),
        })
        .await
        .unwrap();
    let current = service
        .create_fee(CreateFeeRequest {
            person_id: member.id,
            description: "Mensalidade de abril".to_string(),
            amount_cents: 2500,
            due_date: today + Duration::days(15),
        })
        .await
        .unwrap();

    let flipped = service.run_overdue_sweep(today).await.unwrap();
    assert_eq!(flipped, 1);

    assert_eq!(service.get_fee(stale.id).await.unwrap().status, "overdue");
    assert_eq!(service.get_fee(current.id).await.unwrap().status, "pending");

    // Outstanding balance covers pending and overdue fees alike.
    assert_eq!(service.outstanding(member.id).await.unwrap(), 5000);

    let waived = service.waive(stale.id).await.unwrap();
    assert_eq!(waived.status, FeeStatus::Waived.as_str());
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL pointing at a provisioned Postgres"]
async fn workflows_resolve_once_with_reviewer_stamp() {
    let test_db = TestDatabase::new().await.unwrap();
    let database = DatabaseService::new(test_db.pool.clone());
    let service = WorkflowService::new(database.workflows.clone());

    let requester = test_data::create_test_person(&database, PersonRole::Student)
        .await
        .unwrap();
    let reviewer = test_data::create_test_person(&database, PersonRole::Pastor)
        .await
        .unwrap();

    let workflow = service
        .submit(SubmitWorkflowRequest {
            requester_id: requester.id,
            kind: "transfer".to_string(),
            payload: serde_json::json!({ "target_congregation": 2 }),
        })
        .await
        .unwrap();

    assert_eq!(service.list_pending().await.unwrap().len(), 1);

    let approved = service.approve(workflow.id, reviewer.id).await.unwrap();
    assert_eq!(approved.status, "approved");
    assert_eq!(approved.reviewed_by, Some(reviewer.id));
    assert!(approved.reviewed_at.is_some());

    // A resolved workflow cannot be resolved again.
    assert!(matches!(
        service.reject(workflow.id, reviewer.id).await,
        Err(EkklesiaError::BusinessRule(_))
    ));
    assert!(service.list_pending().await.unwrap().is_empty());
}
