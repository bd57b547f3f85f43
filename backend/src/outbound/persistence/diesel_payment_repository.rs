//! PostgreSQL-backed `PaymentRepository` implementation using Diesel ORM.
//!
//! Recording an attempt and settling it each touch a payment row and its app
//! row; both run inside one transaction. A completed payment is never
//! settled again.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{PaymentRepository, PaymentRepositoryError};
use crate::domain::{
    AppId, DeveloperId, Payment, PaymentId, PaymentReference, PaymentSettlement, PaymentStatus,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewPaymentRow, PaymentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{apps, payments};

/// Diesel-backed implementation of the `PaymentRepository` port.
#[derive(Clone)]
pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a payment transaction.
#[derive(Debug)]
enum TransactionError {
    Diesel(diesel::result::Error),
    Missing(String),
}

impl From<diesel::result::Error> for TransactionError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_pool_error(error: PoolError) -> PaymentRepositoryError {
    map_basic_pool_error(error, |message| PaymentRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> PaymentRepositoryError {
    map_basic_diesel_error(
        error,
        PaymentRepositoryError::query,
        PaymentRepositoryError::connection,
    )
}

fn map_transaction_error(error: TransactionError, reference: &str) -> PaymentRepositoryError {
    match error {
        TransactionError::Diesel(err) if is_unique_violation(&err) => {
            PaymentRepositoryError::duplicate_reference(reference)
        }
        TransactionError::Diesel(err) => map_diesel_error(err),
        TransactionError::Missing(message) => PaymentRepositoryError::missing(message),
    }
}

fn invalid_column(column: &str) -> PaymentRepositoryError {
    PaymentRepositoryError::query(format!("invalid {column} in database"))
}

fn row_to_payment(row: PaymentRow) -> Result<Payment, PaymentRepositoryError> {
    let status = PaymentStatus::from_str(&row.status).map_err(|_| invalid_column("status"))?;
    let amount = u32::try_from(row.amount).map_err(|_| invalid_column("amount"))?;
    let reference =
        PaymentReference::parse(&row.reference).ok_or_else(|| invalid_column("reference"))?;
    let provider_reference = PaymentReference::parse(&row.paystack_reference)
        .ok_or_else(|| invalid_column("paystack_reference"))?;

    Ok(Payment {
        id: PaymentId::from_uuid(row.id),
        app_id: AppId::from_uuid(row.app_id),
        developer_id: DeveloperId::from_uuid(row.developer_id),
        amount,
        currency: row.currency,
        reference,
        provider_reference,
        status,
        paid_at: row.paid_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl PaymentRepository for DieselPaymentRepository {
    async fn record_attempt(
        &self,
        payment: &Payment,
        reset_failed_app: bool,
    ) -> Result<(), PaymentRepositoryError> {
        let amount = i32::try_from(payment.amount)
            .map_err(|_| PaymentRepositoryError::query("payment amount exceeds storage range"))?;
        let row = NewPaymentRow {
            id: *payment.id.as_uuid(),
            app_id: *payment.app_id.as_uuid(),
            developer_id: *payment.developer_id.as_uuid(),
            amount,
            currency: &payment.currency,
            reference: payment.reference.as_ref(),
            paystack_reference: payment.provider_reference.as_ref(),
            status: payment.status.as_str(),
            paid_at: payment.paid_at,
            created_at: payment.created_at,
            updated_at: payment.updated_at,
        };
        let app_id = *payment.app_id.as_uuid();
        let payment_id = *payment.id.as_uuid();
        let now = payment.created_at;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, TransactionError, _>(|conn| {
            async move {
                diesel::insert_into(payments::table)
                    .values(&row)
                    .execute(conn)
                    .await?;

                let linked = diesel::update(apps::table.filter(apps::id.eq(app_id)))
                    .set((apps::payment_id.eq(Some(payment_id)), apps::updated_at.eq(now)))
                    .execute(conn)
                    .await?;
                if linked == 0 {
                    return Err(TransactionError::Missing(format!("app {app_id}")));
                }

                if reset_failed_app {
                    diesel::update(
                        apps::table
                            .filter(apps::id.eq(app_id))
                            .filter(apps::payment_status.eq(PaymentStatus::Failed.as_str())),
                    )
                    .set(apps::payment_status.eq(PaymentStatus::Pending.as_str()))
                    .execute(conn)
                    .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_transaction_error(err, payment.provider_reference.as_ref()))
    }

    async fn find_by_provider_reference(
        &self,
        reference: &PaymentReference,
    ) -> Result<Option<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PaymentRow> = payments::table
            .filter(payments::paystack_reference.eq(reference.as_ref()))
            .select(PaymentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_payment).transpose()
    }

    async fn list_for_app(&self, app_id: &AppId) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PaymentRow> = payments::table
            .filter(payments::app_id.eq(app_id.as_uuid()))
            .order(payments::created_at.desc())
            .select(PaymentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_payment).collect()
    }

    async fn settle(
        &self,
        settlement: &PaymentSettlement,
    ) -> Result<Payment, PaymentRepositoryError> {
        let payment_id = *settlement.payment_id.as_uuid();
        let app_id = *settlement.app_id.as_uuid();
        let outcome = settlement.outcome.as_str();
        let paid_at = settlement.paid_at;
        let settled_at = settlement.settled_at;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = conn
            .transaction::<_, TransactionError, _>(|conn| {
                async move {
                    let current: PaymentRow = payments::table
                        .filter(payments::id.eq(payment_id))
                        .select(PaymentRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?
                        .ok_or_else(|| TransactionError::Missing(format!("payment {payment_id}")))?;
                    if current.status == PaymentStatus::Completed.as_str() {
                        return Ok(current);
                    }

                    let settled: PaymentRow =
                        diesel::update(payments::table.filter(payments::id.eq(payment_id)))
                            .set((
                                payments::status.eq(outcome),
                                payments::paid_at.eq(paid_at),
                                payments::updated_at.eq(settled_at),
                            ))
                            .returning(PaymentRow::as_returning())
                            .get_result(conn)
                            .await?;

                    diesel::update(
                        apps::table
                            .filter(apps::id.eq(app_id))
                            .filter(apps::payment_status.ne(PaymentStatus::Completed.as_str())),
                    )
                    .set((
                        apps::payment_status.eq(outcome),
                        apps::updated_at.eq(settled_at),
                    ))
                    .execute(conn)
                    .await?;

                    Ok(settled)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_transaction_error(err, &payment_id.to_string()))?;
        row_to_payment(row)
    }
}
