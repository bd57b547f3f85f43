//! Tests for the submission lifecycle service.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    ChargeOutcome, Checkout, GatewayVerification, MockAppRepository, MockDeveloperRepository,
    MockPaymentGateway, MockPaymentRepository, PaymentGatewayError,
};
use crate::test_support::{
    fixture_clock, fixture_timestamp, sample_app, sample_developer, sample_submission,
};
use rstest::rstest;

type Service =
    SubmissionLifecycleService<MockDeveloperRepository, MockAppRepository, MockPaymentRepository>;

struct Mocks {
    developers: MockDeveloperRepository,
    apps: MockAppRepository,
    payments: MockPaymentRepository,
    gateway: MockPaymentGateway,
}

impl Mocks {
    fn new() -> Self {
        Self {
            developers: MockDeveloperRepository::new(),
            apps: MockAppRepository::new(),
            payments: MockPaymentRepository::new(),
            gateway: MockPaymentGateway::new(),
        }
    }

    fn into_service(self, policy: PaymentRetryPolicy) -> Service {
        SubmissionLifecycleService::new(
            Arc::new(self.developers),
            Arc::new(self.apps),
            Arc::new(self.payments),
            Arc::new(self.gateway),
            fixture_clock(),
        )
        .with_settings(PaymentFlowSettings {
            retry_policy: policy,
            callback_url: "https://store.example/payment/callback".to_owned(),
        })
    }
}

fn pending_payment(app: &App) -> Payment {
    let reference = PaymentReference::generate(&app.id);
    Payment::initialised(
        app.id,
        app.developer_id,
        reference.clone(),
        reference,
        fixture_timestamp(),
    )
}

fn with_status(mut payment: Payment, status: PaymentStatus) -> Payment {
    payment.status = status;
    payment
}

fn verdict(outcome: ChargeOutcome, amount_minor: u64, currency: &str) -> GatewayVerification {
    GatewayVerification {
        outcome,
        provider_status: match outcome {
            ChargeOutcome::Succeeded => "success",
            ChargeOutcome::Declined => "failed",
            ChargeOutcome::Open => "abandoned",
        }
        .to_owned(),
        amount_minor,
        currency: currency.to_owned(),
        paid_at: None,
    }
}

#[tokio::test]
async fn create_app_starts_pending_and_snapshots_developer_name() {
    let developer = sample_developer();
    let developer_id = developer.id;
    let mut mocks = Mocks::new();
    mocks
        .developers
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(developer)));
    mocks.apps.expect_insert().times(1).return_once(|_| Ok(()));

    let app = mocks
        .into_service(PaymentRetryPolicy::Allow)
        .create_app(&developer_id, sample_submission("Foo"))
        .await
        .expect("created");

    assert_eq!(app.status, AppStatus::Pending);
    assert_eq!(app.payment_status, PaymentStatus::Pending);
    assert_eq!(app.downloads, 0);
    assert_eq!(app.rating.value(), 0.0);
    assert_eq!(app.developer_name, "Dana Dev");
    assert_eq!(app.created_at, fixture_timestamp());
}

#[tokio::test]
async fn create_app_requires_existing_developer() {
    let mut mocks = Mocks::new();
    mocks
        .developers
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(None));
    mocks.apps.expect_insert().never();

    let err = mocks
        .into_service(PaymentRetryPolicy::Allow)
        .create_app(&DeveloperId::random(), sample_submission("Foo"))
        .await
        .expect_err("unknown developer");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn update_app_refuses_non_owner() {
    let app = sample_app(&sample_developer());
    let app_id = app.id;
    let mut mocks = Mocks::new();
    mocks
        .apps
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(app)));
    mocks.apps.expect_update_metadata().never();

    let update = AppUpdate {
        name: Some(crate::domain::AppName::new("Bar").expect("name")),
        ..AppUpdate::default()
    };
    let err = mocks
        .into_service(PaymentRetryPolicy::Allow)
        .update_app(&DeveloperId::random(), &app_id, update)
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn update_app_persists_owner_edits() {
    let developer = sample_developer();
    let app = sample_app(&developer);
    let app_id = app.id;
    let mut mocks = Mocks::new();
    mocks
        .apps
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(app)));
    mocks
        .apps
        .expect_update_metadata()
        .times(1)
        .withf(|app| app.name.as_ref() == "Bar")
        .returning(|app| Ok(Some(app.clone())));

    let update = AppUpdate {
        name: Some(crate::domain::AppName::new("Bar").expect("name")),
        ..AppUpdate::default()
    };
    let updated = mocks
        .into_service(PaymentRetryPolicy::Allow)
        .update_app(&developer.id, &app_id, update)
        .await
        .expect("updated");
    assert_eq!(updated.name.as_ref(), "Bar");
    assert_eq!(updated.status, AppStatus::Pending);
}

#[tokio::test]
async fn initialize_payment_records_attempt_after_checkout() {
    let developer = sample_developer();
    let app = sample_app(&developer);
    let (app_id, developer_id) = (app.id, developer.id);
    let mut mocks = Mocks::new();
    mocks
        .apps
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(app)));
    mocks
        .developers
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(developer)));
    mocks
        .gateway
        .expect_initialize()
        .times(1)
        .withf(|request| {
            request.amount == 1000
                && request.email.as_ref() == "d@x.com"
                && request.callback_url == "https://store.example/payment/callback"
        })
        .returning(|_| {
            Ok(Checkout {
                authorization_url: "https://checkout.paystack.com/abc".to_owned(),
                provider_reference: PaymentReference::parse("ps_ref_1").expect("reference"),
            })
        });
    mocks
        .payments
        .expect_record_attempt()
        .times(1)
        .withf(|payment, reset| {
            payment.provider_reference.as_ref() == "ps_ref_1"
                && payment.status == PaymentStatus::Pending
                && payment.amount == 1000
                && payment.currency == "KES"
                && !reset
        })
        .return_once(|_, _| Ok(()));

    let init = mocks
        .into_service(PaymentRetryPolicy::Allow)
        .initialize_payment(&developer_id, &app_id)
        .await
        .expect("initialised");
    assert_eq!(init.authorization_url, "https://checkout.paystack.com/abc");
    assert_eq!(init.reference.as_ref(), "ps_ref_1");
}

#[tokio::test]
async fn initialize_payment_writes_nothing_when_gateway_fails() {
    let developer = sample_developer();
    let app = sample_app(&developer);
    let (app_id, developer_id) = (app.id, developer.id);
    let mut mocks = Mocks::new();
    mocks
        .apps
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(app)));
    mocks
        .developers
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(developer)));
    mocks
        .gateway
        .expect_initialize()
        .returning(|_| Err(PaymentGatewayError::timeout("30s elapsed")));
    mocks.payments.expect_record_attempt().never();

    let err = mocks
        .into_service(PaymentRetryPolicy::Allow)
        .initialize_payment(&developer_id, &app_id)
        .await
        .expect_err("gateway down");
    assert_eq!(err.code(), ErrorCode::UpstreamUnavailable);
}

#[rstest]
#[case(PaymentRetryPolicy::Allow, PaymentStatus::Completed)]
#[case(PaymentRetryPolicy::Deny, PaymentStatus::Failed)]
#[tokio::test]
async fn initialize_payment_respects_retry_policy(
    #[case] policy: PaymentRetryPolicy,
    #[case] current: PaymentStatus,
) {
    let developer = sample_developer();
    let mut app = sample_app(&developer);
    app.payment_status = current;
    let app_id = app.id;
    let mut mocks = Mocks::new();
    mocks
        .apps
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(app)));
    mocks.gateway.expect_initialize().never();

    let err = mocks
        .into_service(policy)
        .initialize_payment(&developer.id, &app_id)
        .await
        .expect_err("refused");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn initialize_payment_resets_failed_app_when_configured() {
    let developer = sample_developer();
    let mut app = sample_app(&developer);
    app.payment_status = PaymentStatus::Failed;
    let (app_id, developer_id) = (app.id, developer.id);
    let mut mocks = Mocks::new();
    mocks
        .apps
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(app)));
    mocks
        .developers
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(developer)));
    mocks.gateway.expect_initialize().returning(|request| {
        Ok(Checkout {
            authorization_url: "https://checkout.example/x".to_owned(),
            provider_reference: request.reference.clone(),
        })
    });
    mocks
        .payments
        .expect_record_attempt()
        .times(1)
        .withf(|_, reset| *reset)
        .return_once(|_, _| Ok(()));

    mocks
        .into_service(PaymentRetryPolicy::AllowAndReset)
        .initialize_payment(&developer_id, &app_id)
        .await
        .expect("initialised");
}

#[tokio::test]
async fn verify_payment_returns_completed_payments_untouched() {
    let payment = with_status(
        pending_payment(&sample_app(&sample_developer())),
        PaymentStatus::Completed,
    );
    let reference = payment.provider_reference.clone();
    let mut mocks = Mocks::new();
    mocks
        .payments
        .expect_find_by_provider_reference()
        .times(1)
        .return_once(move |_| Ok(Some(payment)));
    mocks.gateway.expect_verify().never();
    mocks.payments.expect_settle().never();

    let verification = mocks
        .into_service(PaymentRetryPolicy::Allow)
        .verify_payment(&reference)
        .await
        .expect("verified");
    assert_eq!(verification.status, PaymentStatus::Completed);
}

#[rstest]
#[case::paid(ChargeOutcome::Succeeded, 100_000, "KES", PaymentStatus::Completed)]
#[case::currency_case(ChargeOutcome::Succeeded, 100_000, "kes", PaymentStatus::Completed)]
#[case::declined(ChargeOutcome::Declined, 100_000, "KES", PaymentStatus::Failed)]
#[case::underpaid(ChargeOutcome::Succeeded, 50_000, "KES", PaymentStatus::Failed)]
#[case::wrong_currency(ChargeOutcome::Succeeded, 100_000, "NGN", PaymentStatus::Failed)]
#[tokio::test]
async fn verify_payment_settles_provider_verdict(
    #[case] outcome: ChargeOutcome,
    #[case] amount_minor: u64,
    #[case] currency: &'static str,
    #[case] expected: PaymentStatus,
) {
    let payment = pending_payment(&sample_app(&sample_developer()));
    let reference = payment.provider_reference.clone();
    let stored = payment.clone();
    let mut mocks = Mocks::new();
    mocks
        .payments
        .expect_find_by_provider_reference()
        .return_once(move |_| Ok(Some(stored)));
    mocks
        .gateway
        .expect_verify()
        .times(1)
        .returning(move |_| Ok(verdict(outcome, amount_minor, currency)));
    mocks
        .payments
        .expect_settle()
        .times(1)
        .withf(move |settlement| {
            settlement.outcome == expected
                && settlement.paid_at.is_some() == (expected == PaymentStatus::Completed)
        })
        .returning(move |settlement| {
            let mut settled = payment.clone();
            settled.status = settlement.outcome;
            settled.paid_at = settlement.paid_at;
            Ok(settled)
        });

    let verification = mocks
        .into_service(PaymentRetryPolicy::Allow)
        .verify_payment(&reference)
        .await
        .expect("verified");
    assert_eq!(verification.status, expected);
    assert_eq!(verification.payment.status, expected);
}

#[rstest]
#[case(PaymentStatus::Pending)]
#[case(PaymentStatus::Failed)]
#[tokio::test]
async fn verify_payment_leaves_open_checkouts_alone(#[case] status: PaymentStatus) {
    let payment = with_status(pending_payment(&sample_app(&sample_developer())), status);
    let reference = payment.provider_reference.clone();
    let mut mocks = Mocks::new();
    mocks
        .payments
        .expect_find_by_provider_reference()
        .return_once(move |_| Ok(Some(payment)));
    mocks
        .gateway
        .expect_verify()
        .times(1)
        .returning(|_| Ok(verdict(ChargeOutcome::Open, 0, "KES")));
    mocks.payments.expect_settle().never();

    let verification = mocks
        .into_service(PaymentRetryPolicy::Allow)
        .verify_payment(&reference)
        .await
        .expect("verified");
    assert_eq!(verification.status, status);
}

#[tokio::test]
async fn verify_payment_rechecks_failed_payments_with_the_provider() {
    let payment = with_status(
        pending_payment(&sample_app(&sample_developer())),
        PaymentStatus::Failed,
    );
    let reference = payment.provider_reference.clone();
    let stored = payment.clone();
    let mut mocks = Mocks::new();
    mocks
        .payments
        .expect_find_by_provider_reference()
        .return_once(move |_| Ok(Some(stored)));
    mocks
        .gateway
        .expect_verify()
        .times(1)
        .returning(|_| Ok(verdict(ChargeOutcome::Succeeded, 100_000, "KES")));
    mocks
        .payments
        .expect_settle()
        .times(1)
        .withf(|settlement| settlement.outcome == PaymentStatus::Completed)
        .returning(move |settlement| {
            let mut settled = payment.clone();
            settled.status = settlement.outcome;
            settled.paid_at = settlement.paid_at;
            Ok(settled)
        });

    let verification = mocks
        .into_service(PaymentRetryPolicy::Allow)
        .verify_payment(&reference)
        .await
        .expect("verified");
    assert_eq!(verification.status, PaymentStatus::Completed);
}

#[tokio::test]
async fn verify_payment_does_not_rewrite_a_confirmed_failure() {
    let payment = with_status(
        pending_payment(&sample_app(&sample_developer())),
        PaymentStatus::Failed,
    );
    let reference = payment.provider_reference.clone();
    let mut mocks = Mocks::new();
    mocks
        .payments
        .expect_find_by_provider_reference()
        .return_once(move |_| Ok(Some(payment)));
    mocks
        .gateway
        .expect_verify()
        .times(1)
        .returning(|_| Ok(verdict(ChargeOutcome::Declined, 0, "KES")));
    mocks.payments.expect_settle().never();

    let verification = mocks
        .into_service(PaymentRetryPolicy::Allow)
        .verify_payment(&reference)
        .await
        .expect("verified");
    assert_eq!(verification.status, PaymentStatus::Failed);
}

#[tokio::test]
async fn verify_payment_keeps_pending_when_gateway_fails() {
    let payment = pending_payment(&sample_app(&sample_developer()));
    let reference = payment.provider_reference.clone();
    let mut mocks = Mocks::new();
    mocks
        .payments
        .expect_find_by_provider_reference()
        .return_once(move |_| Ok(Some(payment)));
    mocks
        .gateway
        .expect_verify()
        .returning(|_| Err(PaymentGatewayError::transport("connection reset")));
    mocks.payments.expect_settle().never();

    let err = mocks
        .into_service(PaymentRetryPolicy::Allow)
        .verify_payment(&reference)
        .await
        .expect_err("gateway down");
    assert_eq!(err.code(), ErrorCode::UpstreamUnavailable);
}

#[tokio::test]
async fn verify_payment_reports_unknown_reference() {
    let mut mocks = Mocks::new();
    mocks
        .payments
        .expect_find_by_provider_reference()
        .return_once(|_| Ok(None));

    let err = mocks
        .into_service(PaymentRetryPolicy::Allow)
        .verify_payment(&PaymentReference::parse("nope").expect("reference"))
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn set_status_reports_missing_app() {
    let mut mocks = Mocks::new();
    mocks
        .apps
        .expect_set_status()
        .return_once(|_, _, _| Ok(None));

    let err = mocks
        .into_service(PaymentRetryPolicy::Allow)
        .set_status(&AppId::random(), AppStatus::Published)
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn increment_downloads_reports_missing_app() {
    let mut mocks = Mocks::new();
    mocks
        .apps
        .expect_increment_downloads()
        .return_once(|_| Ok(false));

    let err = mocks
        .into_service(PaymentRetryPolicy::Allow)
        .increment_downloads(&AppId::random())
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case::completed_attempt_repairs_app(
    PaymentStatus::Pending,
    vec![PaymentStatus::Failed, PaymentStatus::Completed],
    Some(PaymentStatus::Completed)
)]
#[case::latest_failure_marks_pending_app(
    PaymentStatus::Pending,
    vec![PaymentStatus::Failed],
    Some(PaymentStatus::Failed)
)]
#[case::completed_app_is_left_alone(
    PaymentStatus::Completed,
    vec![PaymentStatus::Failed],
    None
)]
#[case::pending_attempt_is_left_alone(
    PaymentStatus::Pending,
    vec![PaymentStatus::Pending, PaymentStatus::Failed],
    None
)]
#[case::no_attempts(PaymentStatus::Pending, vec![], None)]
fn reconciliation_targets(
    #[case] current: PaymentStatus,
    #[case] attempts: Vec<PaymentStatus>,
    #[case] expected: Option<PaymentStatus>,
) {
    let app = sample_app(&sample_developer());
    let attempts: Vec<Payment> = attempts
        .into_iter()
        .map(|status| with_status(pending_payment(&app), status))
        .collect();
    assert_eq!(reconciled_status(current, &attempts), expected);
}

#[tokio::test]
async fn reconcile_payment_repairs_app_from_completed_attempt() {
    let app = sample_app(&sample_developer());
    let app_id = app.id;
    let completed = with_status(pending_payment(&app), PaymentStatus::Completed);
    let mut repaired = app.clone();
    repaired.payment_status = PaymentStatus::Completed;
    let mut mocks = Mocks::new();
    mocks
        .apps
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(app)));
    mocks
        .payments
        .expect_list_for_app()
        .return_once(move |_| Ok(vec![completed]));
    mocks
        .apps
        .expect_set_payment_status()
        .times(1)
        .withf(|_, status, _| *status == PaymentStatus::Completed)
        .return_once(move |_, _, _| Ok(Some(repaired)));

    let app = mocks
        .into_service(PaymentRetryPolicy::Allow)
        .reconcile_payment(&app_id)
        .await
        .expect("reconciled");
    assert_eq!(app.payment_status, PaymentStatus::Completed);
}
