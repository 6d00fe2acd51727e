use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::agency::{self, AgencyStatus};
use crate::entities::baggage as baggage_entity;
use crate::entities::cancellation::{self, OperationType};
use crate::entities::discount_rule;
use crate::entities::passenger::{self, DocumentType};
use crate::entities::payment::{self, PaymentMethod, PaymentPurpose, PaymentStatus};
use crate::entities::penalty_rule::{self, PenaltyKind};
use crate::entities::reservation::{self, ReservationStatus};
use crate::entities::reservation_detail;
use crate::entities::trip::{self, TripStatus};
use crate::entities::{port, route, route_fare};
use crate::error::{AppError, AppResult};
use crate::services::baggage::{self, BaggagePolicy};
use crate::services::penalty::{self, PenaltyPolicy};
use crate::services::pricing::{self, FareQuote};
use crate::services::{authorization, codes, commission};
use crate::utils::jwt::Claims;

// ---------------------------------------------------------------------------
// Requests

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub trip_id: Uuid,
    pub agency_id: Option<i32>,
    pub passengers: Vec<PassengerRequest>,
    pub initial_payment: Option<InitialPaymentRequest>,
}

/// Either an existing passenger id, or enough data to look one up by
/// document and register them if unknown.
#[derive(Debug, Deserialize)]
pub struct PassengerRequest {
    pub passenger_id: Option<Uuid>,
    pub given_names: Option<String>,
    pub surnames: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub document_type: Option<DocumentType>,
    pub document_number: Option<String>,
    pub nationality: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InitialPaymentRequest {
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub transaction_ref: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterPaymentRequest {
    pub purpose: Option<PaymentPurpose>,
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub transaction_ref: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CancelReservationRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReprogramReservationRequest {
    pub new_trip_id: Uuid,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BaggageRequest {
    pub weight_kg: Decimal,
    pub volume_m3: Option<Decimal>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub trip_id: Uuid,
    pub passengers: Vec<QuotePassenger>,
}

#[derive(Debug, Deserialize)]
pub struct QuotePassenger {
    pub name: Option<String>,
    pub birth_date: NaiveDate,
}

// ---------------------------------------------------------------------------
// Views

#[derive(Debug, Serialize)]
pub struct ReservationView {
    pub code: String,
    pub trip_id: Uuid,
    pub travel_date: NaiveDate,
    pub origin: String,
    pub destination: String,
    pub agency_id: Option<i32>,
    pub status: ReservationStatus,
    pub total: Decimal,
    pub amount_paid: Decimal,
    pub balance_due: Decimal,
    pub penalty_applied: Decimal,
    pub agency_commission: Decimal,
    pub passengers: Vec<DetailView>,
    pub payments: Vec<PaymentView>,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

#[derive(Debug, Serialize)]
pub struct DetailView {
    pub passenger_id: Uuid,
    pub passenger_name: String,
    pub document_number: String,
    pub fare_tier: String,
    pub base_price: Decimal,
    pub discount_pct: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct PaymentView {
    pub purpose: PaymentPurpose,
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub transaction_ref: Option<String>,
    pub status: PaymentStatus,
    pub paid_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<payment::Model> for PaymentView {
    fn from(p: payment::Model) -> Self {
        Self {
            purpose: p.purpose,
            method: p.method,
            amount: p.amount,
            transaction_ref: p.transaction_ref,
            status: p.status,
            paid_at: p.paid_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReservationSummary {
    pub code: String,
    pub origin: String,
    pub destination: String,
    pub agency_id: Option<i32>,
    pub status: ReservationStatus,
    pub total: Decimal,
    pub amount_paid: Decimal,
    pub balance_due: Decimal,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

#[derive(Debug, Serialize)]
pub struct CancellationView {
    pub code: String,
    pub operation: OperationType,
    pub status: ReservationStatus,
    pub rule_applied: String,
    pub penalty_pct: Decimal,
    pub penalty_amount: Decimal,
    pub refund_amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct QuoteLine {
    pub name: Option<String>,
    pub age: i32,
    #[serde(flatten)]
    pub fare: FareQuote,
}

#[derive(Debug, Serialize)]
pub struct QuoteView {
    pub trip_id: Uuid,
    pub travel_date: NaiveDate,
    pub base_price: Decimal,
    pub passengers: Vec<QuoteLine>,
    pub total: Decimal,
    pub minimum_advance: Decimal,
}

// ---------------------------------------------------------------------------
// Rule lookups

async fn active_discount_rules<C: ConnectionTrait>(
    conn: &C,
) -> AppResult<Vec<discount_rule::Model>> {
    Ok(discount_rule::Entity::find()
        .filter(discount_rule::Column::Active.eq(true))
        .all(conn)
        .await?)
}

async fn active_penalty_policy<C: ConnectionTrait>(
    conn: &C,
    kind: PenaltyKind,
) -> AppResult<Option<PenaltyPolicy>> {
    let row = penalty_rule::Entity::find()
        .filter(penalty_rule::Column::Kind.eq(kind))
        .filter(penalty_rule::Column::Active.eq(true))
        .order_by_asc(penalty_rule::Column::Id)
        .one(conn)
        .await?;
    row.as_ref().map(PenaltyPolicy::try_from).transpose()
}

/// Active baggage tariff, falling back to the built-in default when no
/// rule is configured.
pub async fn active_baggage_tariff<C: ConnectionTrait>(conn: &C) -> AppResult<BaggagePolicy> {
    match active_penalty_policy(conn, PenaltyKind::Baggage).await? {
        Some(PenaltyPolicy::Baggage { policy, .. }) => Ok(policy),
        _ => {
            warn!("no active baggage rule, using the default tariff");
            Ok(BaggagePolicy::default_tariff())
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers

async fn load_by_code<C: ConnectionTrait>(conn: &C, code: &str) -> AppResult<reservation::Model> {
    reservation::Entity::find()
        .filter(reservation::Column::Code.eq(code))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", code)))
}

async fn load_trip<C: ConnectionTrait>(conn: &C, trip_id: Uuid) -> AppResult<trip::Model> {
    trip::Entity::find_by_id(trip_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Trip {} not found", trip_id)))
}

/// Port names at either end of the trip's route.
async fn trip_endpoints<C: ConnectionTrait>(
    conn: &C,
    trip: &trip::Model,
) -> AppResult<(String, String)> {
    let route = route::Entity::find_by_id(trip.route_id)
        .one(conn)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!("Route {} missing for trip {}", trip.route_id, trip.id))
        })?;
    let origin = port::Entity::find_by_id(route.origin_port_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Port {} missing", route.origin_port_id)))?;
    let destination = port::Entity::find_by_id(route.destination_port_id)
        .one(conn)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!("Port {} missing", route.destination_port_id))
        })?;
    Ok((origin.name, destination.name))
}

async fn open_fare<C: ConnectionTrait>(conn: &C, route_id: i32) -> AppResult<route_fare::Model> {
    route_fare::Entity::find()
        .filter(route_fare::Column::RouteId.eq(route_id))
        .filter(route_fare::Column::EndsAt.is_null())
        .one(conn)
        .await?
        .ok_or_else(|| AppError::Conflict(format!("Route {} has no open fare", route_id)))
}

fn ensure_bookable(trip: &trip::Model, today: NaiveDate) -> AppResult<()> {
    if trip.status != TripStatus::Scheduled {
        return Err(AppError::Conflict(format!(
            "Trip {} is not open for booking",
            trip.id
        )));
    }
    if trip.travel_date < today {
        return Err(AppError::Conflict(
            "The trip has already departed".to_string(),
        ));
    }
    Ok(())
}

/// Atomically claim `n` seats; the availability check and the decrement
/// happen in one statement, so concurrent bookings cannot oversell.
async fn take_seats<C: ConnectionTrait>(conn: &C, trip_id: Uuid, n: i32) -> AppResult<()> {
    let result = trip::Entity::update_many()
        .col_expr(
            trip::Column::SeatsAvailable,
            Expr::col(trip::Column::SeatsAvailable).sub(n),
        )
        .col_expr(
            trip::Column::SeatsOccupied,
            Expr::col(trip::Column::SeatsOccupied).add(n),
        )
        .filter(trip::Column::Id.eq(trip_id))
        .filter(trip::Column::SeatsAvailable.gte(n))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::Conflict("Not enough seats available".to_string()));
    }
    Ok(())
}

async fn release_seats<C: ConnectionTrait>(conn: &C, trip_id: Uuid, n: i32) -> AppResult<()> {
    trip::Entity::update_many()
        .col_expr(
            trip::Column::SeatsAvailable,
            Expr::col(trip::Column::SeatsAvailable).add(n),
        )
        .col_expr(
            trip::Column::SeatsOccupied,
            Expr::col(trip::Column::SeatsOccupied).sub(n),
        )
        .filter(trip::Column::Id.eq(trip_id))
        .exec(conn)
        .await?;
    Ok(())
}

async fn seat_count<C: ConnectionTrait>(conn: &C, reservation_id: Uuid) -> AppResult<i32> {
    let n = reservation_detail::Entity::find()
        .filter(reservation_detail::Column::ReservationId.eq(reservation_id))
        .count(conn)
        .await?;
    Ok(n as i32)
}

async fn resolve_passenger<C: ConnectionTrait>(
    conn: &C,
    req: &PassengerRequest,
) -> AppResult<passenger::Model> {
    if let Some(id) = req.passenger_id {
        return passenger::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Passenger {} not found", id)));
    }

    let (Some(document_type), Some(document_number)) =
        (req.document_type.clone(), req.document_number.clone())
    else {
        return Err(AppError::BadRequest(
            "Each passenger needs a passenger_id or a document".to_string(),
        ));
    };

    if let Some(existing) = passenger::Entity::find()
        .filter(passenger::Column::DocumentType.eq(document_type.clone()))
        .filter(passenger::Column::DocumentNumber.eq(document_number.clone()))
        .one(conn)
        .await?
    {
        return Ok(existing);
    }

    let (Some(given_names), Some(surnames), Some(birth_date)) =
        (req.given_names.clone(), req.surnames.clone(), req.birth_date)
    else {
        return Err(AppError::BadRequest(
            "New passengers need names and a birth date".to_string(),
        ));
    };

    let model = passenger::ActiveModel {
        id: Set(Uuid::new_v4()),
        given_names: Set(given_names),
        surnames: Set(surnames),
        birth_date: Set(birth_date),
        document_type: Set(document_type),
        document_number: Set(document_number),
        nationality: Set(req
            .nationality
            .clone()
            .unwrap_or_else(|| "PERUVIAN".to_string())),
        phone: Set(req.phone.clone()),
        email: Set(req.email.clone()),
        registered_at: Set(Utc::now().into()),
    };
    Ok(model.insert(conn).await?)
}

/// Paid amount and initial status for a new reservation. Enforces the
/// 50% minimum advance: anything below it is rejected, not downgraded
/// to a pending hold.
fn initial_status(
    total: Decimal,
    advance: Option<Decimal>,
) -> AppResult<(Decimal, ReservationStatus)> {
    let Some(amount) = advance else {
        return Ok((Decimal::ZERO, ReservationStatus::Pending));
    };

    if amount <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "The payment amount must be positive".to_string(),
        ));
    }
    if amount > total {
        return Err(AppError::BadRequest(format!(
            "The payment ({}) exceeds the reservation total ({})",
            amount, total
        )));
    }
    if !pricing::is_advance_sufficient(amount, total) {
        return Err(AppError::BadRequest(format!(
            "The minimum advance is {} (50% of {})",
            pricing::minimum_advance(total),
            total
        )));
    }

    let status = if amount >= total {
        ReservationStatus::Paid
    } else {
        ReservationStatus::Confirmed
    };
    Ok((amount, status))
}

fn status_after_payment(
    total: Decimal,
    amount_paid: Decimal,
    current: ReservationStatus,
) -> ReservationStatus {
    if amount_paid >= total {
        ReservationStatus::Paid
    } else if pricing::is_advance_sufficient(amount_paid, total) {
        ReservationStatus::Confirmed
    } else {
        current
    }
}

async fn reservation_view<C: ConnectionTrait>(
    conn: &C,
    res: reservation::Model,
) -> AppResult<ReservationView> {
    let trip = load_trip(conn, res.trip_id).await?;

    let details = reservation_detail::Entity::find()
        .filter(reservation_detail::Column::ReservationId.eq(res.id))
        .find_also_related(passenger::Entity)
        .all(conn)
        .await?;

    let payments = payment::Entity::find()
        .filter(payment::Column::ReservationId.eq(res.id))
        .order_by_asc(payment::Column::PaidAt)
        .all(conn)
        .await?;

    let passengers = details
        .into_iter()
        .map(|(d, p)| DetailView {
            passenger_id: d.passenger_id,
            passenger_name: p.as_ref().map(|p| p.full_name()).unwrap_or_default(),
            document_number: p.map(|p| p.document_number).unwrap_or_default(),
            fare_tier: d.fare_tier,
            base_price: d.base_price,
            discount_pct: d.discount_pct,
            discount_amount: d.discount_amount,
            final_price: d.final_price,
        })
        .collect();

    Ok(ReservationView {
        code: res.code,
        trip_id: res.trip_id,
        travel_date: trip.travel_date,
        origin: res.origin,
        destination: res.destination,
        agency_id: res.agency_id,
        status: res.status,
        total: res.total,
        amount_paid: res.amount_paid,
        balance_due: res.balance_due,
        penalty_applied: res.penalty_applied,
        agency_commission: res.agency_commission,
        passengers,
        payments: payments.into_iter().map(PaymentView::from).collect(),
        created_at: res.created_at,
    })
}

// ---------------------------------------------------------------------------
// Operations

pub async fn create_reservation(
    db: &DatabaseConnection,
    claims: &Claims,
    req: CreateReservationRequest,
) -> AppResult<ReservationView> {
    authorization::ensure_creation_allowed(claims, req.agency_id)?;

    if req.passengers.is_empty() {
        return Err(AppError::BadRequest(
            "A reservation needs at least one passenger".to_string(),
        ));
    }

    let today = Utc::now().date_naive();
    let txn = db.begin().await?;

    let trip = load_trip(&txn, req.trip_id).await?;
    ensure_bookable(&trip, today)?;

    let seats = req.passengers.len() as i32;
    if trip.seats_available < seats {
        return Err(AppError::Conflict("Not enough seats available".to_string()));
    }

    let (origin, destination) = trip_endpoints(&txn, &trip).await?;
    let fare = open_fare(&txn, trip.route_id).await?;

    let agency = match req.agency_id {
        Some(id) => {
            let agency = agency::Entity::find_by_id(id)
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Agency {} not found", id)))?;
            if agency.status != AgencyStatus::Active {
                return Err(AppError::Conflict(format!(
                    "Agency {} is inactive",
                    agency.name
                )));
            }
            Some(agency)
        }
        None => None,
    };

    let rules = active_discount_rules(&txn).await?;

    let mut seen = HashSet::new();
    let mut priced = Vec::with_capacity(req.passengers.len());
    let mut total = Decimal::ZERO;
    for preq in &req.passengers {
        let passenger = resolve_passenger(&txn, preq).await?;
        if !seen.insert(passenger.id) {
            return Err(AppError::Conflict(format!(
                "Passenger {} appears twice in the request",
                passenger.full_name()
            )));
        }
        let quote =
            pricing::price_for_passenger(fare.base_price, passenger.birth_date, trip.travel_date, &rules);
        total += quote.final_price;
        priced.push((passenger, quote));
    }

    let agency_commission = commission::commission_for_sale(agency.as_ref(), total);
    let (amount_paid, status) =
        initial_status(total, req.initial_payment.as_ref().map(|p| p.amount))?;

    take_seats(&txn, trip.id, seats).await?;

    let code = codes::next_reservation_code(&txn).await?;
    let now = Utc::now();
    let reservation_id = Uuid::new_v4();

    let res = reservation::ActiveModel {
        id: Set(reservation_id),
        code: Set(code.clone()),
        trip_id: Set(trip.id),
        user_id: Set(claims.sub),
        agency_id: Set(req.agency_id),
        origin: Set(origin),
        destination: Set(destination),
        total: Set(total),
        amount_paid: Set(amount_paid),
        balance_due: Set(total - amount_paid),
        penalty_applied: Set(Decimal::ZERO),
        agency_commission: Set(agency_commission),
        status: Set(status),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    for (passenger, quote) in priced {
        reservation_detail::ActiveModel {
            id: Set(Uuid::new_v4()),
            reservation_id: Set(reservation_id),
            passenger_id: Set(passenger.id),
            fare_tier: Set(quote.fare_tier),
            base_price: Set(quote.base_price),
            discount_pct: Set(quote.discount_pct),
            discount_amount: Set(quote.discount_amount),
            final_price: Set(quote.final_price),
        }
        .insert(&txn)
        .await?;
    }

    if let Some(p) = req.initial_payment {
        payment::ActiveModel {
            id: Set(Uuid::new_v4()),
            reservation_id: Set(reservation_id),
            purpose: Set(PaymentPurpose::Initial),
            method: Set(p.method),
            amount: Set(p.amount),
            transaction_ref: Set(p.transaction_ref),
            status: Set(PaymentStatus::Confirmed),
            paid_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;
    }

    let view = reservation_view(&txn, res).await?;
    txn.commit().await?;

    info!(code = %code, seats, total = %total, "reservation created");
    Ok(view)
}

pub async fn quote_price(db: &DatabaseConnection, req: QuoteRequest) -> AppResult<QuoteView> {
    if req.passengers.is_empty() {
        return Err(AppError::BadRequest(
            "A quote needs at least one passenger".to_string(),
        ));
    }

    let trip = load_trip(db, req.trip_id).await?;
    let fare = open_fare(db, trip.route_id).await?;
    let rules = active_discount_rules(db).await?;

    let mut total = Decimal::ZERO;
    let mut lines = Vec::with_capacity(req.passengers.len());
    for p in req.passengers {
        let quote =
            pricing::price_for_passenger(fare.base_price, p.birth_date, trip.travel_date, &rules);
        total += quote.final_price;
        lines.push(QuoteLine {
            name: p.name,
            age: pricing::age_in_years(p.birth_date, trip.travel_date),
            fare: quote,
        });
    }

    Ok(QuoteView {
        trip_id: trip.id,
        travel_date: trip.travel_date,
        base_price: fare.base_price,
        passengers: lines,
        total,
        minimum_advance: pricing::minimum_advance(total),
    })
}

pub async fn find_by_code(
    db: &DatabaseConnection,
    claims: &Claims,
    code: &str,
) -> AppResult<ReservationView> {
    let res = load_by_code(db, code).await?;
    authorization::ensure_reservation_access(claims, &res)?;
    reservation_view(db, res).await
}

pub async fn list(
    db: &DatabaseConnection,
    claims: &Claims,
) -> AppResult<Vec<ReservationSummary>> {
    let mut query = reservation::Entity::find();
    if let Some(agency_id) = authorization::agency_scope(claims) {
        query = query.filter(reservation::Column::AgencyId.eq(agency_id));
    }
    let rows = query
        .order_by_desc(reservation::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|r| ReservationSummary {
            code: r.code,
            origin: r.origin,
            destination: r.destination,
            agency_id: r.agency_id,
            status: r.status,
            total: r.total,
            amount_paid: r.amount_paid,
            balance_due: r.balance_due,
            created_at: r.created_at,
        })
        .collect())
}

pub async fn register_payment(
    db: &DatabaseConnection,
    claims: &Claims,
    code: &str,
    req: RegisterPaymentRequest,
) -> AppResult<ReservationView> {
    let txn = db.begin().await?;

    let res = load_by_code(&txn, code).await?;
    authorization::ensure_reservation_access(claims, &res)?;

    if res.status == ReservationStatus::Cancelled {
        return Err(AppError::Forbidden(
            "Cancelled reservations do not accept payments".to_string(),
        ));
    }
    if req.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "The payment amount must be positive".to_string(),
        ));
    }

    let purpose = req.purpose.unwrap_or(PaymentPurpose::Balance);
    // Baggage excess is charged on top of the fare total and does not
    // move the reservation balance.
    let affects_balance = purpose != PaymentPurpose::BaggageExcess;

    if affects_balance {
        if res.status == ReservationStatus::Completed {
            return Err(AppError::Forbidden(
                "This reservation is already completed".to_string(),
            ));
        }
        if res.balance_due == Decimal::ZERO {
            return Err(AppError::Conflict(
                "This reservation is already fully paid".to_string(),
            ));
        }
        if req.amount > res.balance_due {
            return Err(AppError::BadRequest(format!(
                "The amount ({}) exceeds the balance due ({})",
                req.amount, res.balance_due
            )));
        }
    }

    payment::ActiveModel {
        id: Set(Uuid::new_v4()),
        reservation_id: Set(res.id),
        purpose: Set(purpose),
        method: Set(req.method),
        amount: Set(req.amount),
        transaction_ref: Set(req.transaction_ref),
        status: Set(PaymentStatus::Confirmed),
        paid_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    let updated = if affects_balance {
        let amount_paid = res.amount_paid + req.amount;
        let status = status_after_payment(res.total, amount_paid, res.status.clone());

        let mut active: reservation::ActiveModel = res.clone().into();
        active.amount_paid = Set(amount_paid);
        active.balance_due = Set(res.total - amount_paid);
        active.status = Set(status);
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?
    } else {
        res
    };

    let view = reservation_view(&txn, updated).await?;
    txn.commit().await?;

    info!(code = %code, amount = %req.amount, "payment registered");
    Ok(view)
}

pub async fn cancel(
    db: &DatabaseConnection,
    claims: &Claims,
    code: &str,
    req: CancelReservationRequest,
) -> AppResult<CancellationView> {
    let today = Utc::now().date_naive();
    let txn = db.begin().await?;

    let res = load_by_code(&txn, code).await?;
    authorization::ensure_reservation_access(claims, &res)?;

    if res.status == ReservationStatus::Cancelled {
        return Err(AppError::Conflict(
            "This reservation is already cancelled".to_string(),
        ));
    }
    if res.status == ReservationStatus::Completed {
        return Err(AppError::Forbidden(
            "Completed reservations cannot be cancelled".to_string(),
        ));
    }

    let trip = load_trip(&txn, res.trip_id).await?;
    if trip.travel_date < today {
        return Err(AppError::Forbidden(
            "The trip has already departed".to_string(),
        ));
    }

    let policy = active_penalty_policy(&txn, PenaltyKind::Cancellation).await?;
    let outcome = penalty::compute_penalty(
        &res.code,
        res.created_at.date_naive(),
        res.amount_paid,
        trip.travel_date,
        today,
        policy.as_ref(),
    );

    cancellation::ActiveModel {
        id: Set(Uuid::new_v4()),
        reservation_id: Set(res.id),
        operation: Set(OperationType::Cancellation),
        original_trip_id: Set(trip.id),
        new_trip_id: Set(None),
        original_amount: Set(res.amount_paid),
        penalty_pct: Set(outcome.penalty_pct),
        penalty_amount: Set(outcome.penalty_amount),
        refund_amount: Set(outcome.refund_amount),
        reason: Set(req.reason),
        user_id: Set(claims.sub),
        recorded_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    let seats = seat_count(&txn, res.id).await?;
    release_seats(&txn, trip.id, seats).await?;

    let mut active: reservation::ActiveModel = res.clone().into();
    active.status = Set(ReservationStatus::Cancelled);
    active.penalty_applied = Set(res.penalty_applied + outcome.penalty_amount);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    info!(
        code = %code,
        penalty = %outcome.penalty_amount,
        refund = %outcome.refund_amount,
        "reservation cancelled"
    );

    Ok(CancellationView {
        code: updated.code,
        operation: OperationType::Cancellation,
        status: updated.status,
        rule_applied: outcome.rule_description,
        penalty_pct: outcome.penalty_pct,
        penalty_amount: outcome.penalty_amount,
        refund_amount: outcome.refund_amount,
    })
}

pub async fn reprogram(
    db: &DatabaseConnection,
    claims: &Claims,
    code: &str,
    req: ReprogramReservationRequest,
) -> AppResult<CancellationView> {
    let today = Utc::now().date_naive();
    let txn = db.begin().await?;

    let res = load_by_code(&txn, code).await?;
    authorization::ensure_reservation_access(claims, &res)?;

    if res.status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "Reservation {} can no longer be reprogrammed",
            res.code
        )));
    }

    let old_trip = load_trip(&txn, res.trip_id).await?;
    if old_trip.travel_date < today {
        return Err(AppError::Forbidden(
            "The trip has already departed".to_string(),
        ));
    }

    if req.new_trip_id == old_trip.id {
        return Err(AppError::BadRequest(
            "The reservation is already on that trip".to_string(),
        ));
    }

    let new_trip = load_trip(&txn, req.new_trip_id).await?;
    ensure_bookable(&new_trip, today)?;

    let seats = seat_count(&txn, res.id).await?;
    take_seats(&txn, new_trip.id, seats).await?;
    release_seats(&txn, old_trip.id, seats).await?;

    let policy = active_penalty_policy(&txn, PenaltyKind::Reprogramming).await?;
    let outcome = penalty::compute_penalty(
        &res.code,
        res.created_at.date_naive(),
        res.amount_paid,
        old_trip.travel_date,
        today,
        policy.as_ref(),
    );

    cancellation::ActiveModel {
        id: Set(Uuid::new_v4()),
        reservation_id: Set(res.id),
        operation: Set(OperationType::Reprogramming),
        original_trip_id: Set(old_trip.id),
        new_trip_id: Set(Some(new_trip.id)),
        original_amount: Set(res.amount_paid),
        penalty_pct: Set(outcome.penalty_pct),
        penalty_amount: Set(outcome.penalty_amount),
        refund_amount: Set(outcome.refund_amount),
        reason: Set(req.reason),
        user_id: Set(claims.sub),
        recorded_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    let (origin, destination) = trip_endpoints(&txn, &new_trip).await?;

    let mut active: reservation::ActiveModel = res.clone().into();
    active.trip_id = Set(new_trip.id);
    active.origin = Set(origin);
    active.destination = Set(destination);
    active.penalty_applied = Set(res.penalty_applied + outcome.penalty_amount);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    info!(
        code = %code,
        new_trip = %new_trip.id,
        penalty = %outcome.penalty_amount,
        "reservation reprogrammed"
    );

    Ok(CancellationView {
        code: updated.code,
        operation: OperationType::Reprogramming,
        status: updated.status,
        rule_applied: outcome.rule_description,
        penalty_pct: outcome.penalty_pct,
        penalty_amount: outcome.penalty_amount,
        refund_amount: outcome.refund_amount,
    })
}

pub async fn register_baggage(
    db: &DatabaseConnection,
    claims: &Claims,
    code: &str,
    passenger_id: Uuid,
    req: BaggageRequest,
) -> AppResult<baggage_entity::Model> {
    let txn = db.begin().await?;

    let res = load_by_code(&txn, code).await?;
    authorization::ensure_reservation_access(claims, &res)?;

    if res.status == ReservationStatus::Cancelled {
        return Err(AppError::Conflict(
            "Cancelled reservations cannot register baggage".to_string(),
        ));
    }
    if req.weight_kg <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "The baggage weight must be positive".to_string(),
        ));
    }

    let detail = reservation_detail::Entity::find()
        .filter(reservation_detail::Column::ReservationId.eq(res.id))
        .filter(reservation_detail::Column::PassengerId.eq(passenger_id))
        .one(&txn)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("The passenger is not on this reservation".to_string())
        })?;

    let already = baggage_entity::Entity::find()
        .filter(baggage_entity::Column::DetailId.eq(detail.id))
        .count(&txn)
        .await?;
    if already > 0 {
        return Err(AppError::Conflict(
            "The passenger already has baggage registered".to_string(),
        ));
    }

    let tariff = active_baggage_tariff(&txn).await?;
    let charge = baggage::excess_for_weight(req.weight_kg, &tariff);

    let row = baggage_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        reservation_id: Set(res.id),
        detail_id: Set(detail.id),
        passenger_id: Set(passenger_id),
        weight_kg: Set(req.weight_kg),
        included_allowance_kg: Set(charge.allowance_kg),
        excess_kg: Set(charge.excess_kg),
        volume_m3: Set(req.volume_m3),
        price_per_kilo: Set(charge.price_per_kilo),
        excess_cost: Set(charge.excess_cost),
        description: Set(req.description),
        registered_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        code = %code,
        passenger = %passenger_id,
        excess = %row.excess_cost,
        "baggage registered"
    );
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn no_advance_leaves_the_reservation_pending() {
        let (paid, status) = initial_status(dec!(200.00), None).unwrap();
        assert_eq!(paid, Decimal::ZERO);
        assert_eq!(status, ReservationStatus::Pending);
    }

    #[test]
    fn advance_below_half_is_rejected() {
        // Total 200.00, attempted advance 90.00
        let err = initial_status(dec!(200.00), Some(dec!(90.00))).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn half_advance_confirms_and_full_payment_settles() {
        let (paid, status) = initial_status(dec!(200.00), Some(dec!(100.00))).unwrap();
        assert_eq!(paid, dec!(100.00));
        assert_eq!(status, ReservationStatus::Confirmed);

        let (paid, status) = initial_status(dec!(200.00), Some(dec!(200.00))).unwrap();
        assert_eq!(paid, dec!(200.00));
        assert_eq!(status, ReservationStatus::Paid);
    }

    #[test]
    fn overpayment_and_non_positive_advances_are_rejected() {
        assert!(initial_status(dec!(200.00), Some(dec!(250.00))).is_err());
        assert!(initial_status(dec!(200.00), Some(Decimal::ZERO)).is_err());
    }

    #[test]
    fn payments_move_the_status_forward() {
        let total = dec!(200.00);
        assert_eq!(
            status_after_payment(total, dec!(40.00), ReservationStatus::Pending),
            ReservationStatus::Pending
        );
        assert_eq!(
            status_after_payment(total, dec!(100.00), ReservationStatus::Pending),
            ReservationStatus::Confirmed
        );
        assert_eq!(
            status_after_payment(total, dec!(200.00), ReservationStatus::Confirmed),
            ReservationStatus::Paid
        );
    }
}
