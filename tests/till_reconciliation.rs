use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc, Mutex,
};

use escala_backend::{
    common::error::AppError,
    models::{
        auth::User,
        rbac::{ListScope, PermissionSet, Role},
        shift::{Shift, ShiftStatus},
        till::{
            CreateTillVerificationPayload, NewTillVerification, TillAmounts, TillStatus,
            TillVerification, UpdateTillVerificationPayload,
        },
    },
    services::{till_service::compute_discrepancy, TillService, TillStore},
};

// Store em memória com a mesma semântica de compare-and-set do Postgres
#[derive(Default)]
struct MemoryTillStore {
    shifts: Vec<Shift>,
    users: Vec<i64>,
    rows: Mutex<Vec<TillVerification>>,
    next_id: AtomicI64,
}

impl MemoryTillStore {
    fn new(shifts: Vec<Shift>, users: Vec<i64>) -> Self {
        Self {
            shifts,
            users,
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl TillStore for MemoryTillStore {
    async fn find_shift(&self, shift_id: i64) -> Result<Option<Shift>, AppError> {
        Ok(self.shifts.iter().find(|s| s.id == shift_id).cloned())
    }

    async fn user_exists(&self, user_id: i64) -> Result<bool, AppError> {
        Ok(self.users.contains(&user_id))
    }

    async fn find_verification(&self, id: i64) -> Result<Option<TillVerification>, AppError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn list_verifications(
        &self,
        scope: &ListScope,
    ) -> Result<Vec<TillVerification>, AppError> {
        let venue_of = |shift_id: i64| {
            self.shifts
                .iter()
                .find(|s| s.id == shift_id)
                .map(|s| s.venue_id)
                .unwrap_or_default()
        };
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| scope.allows(Some(r.employee_id), venue_of(r.shift_id)))
            .cloned()
            .collect())
    }

    async fn insert_verification(
        &self,
        new: NewTillVerification,
    ) -> Result<TillVerification, AppError> {
        let row = TillVerification {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            shift_id: new.shift_id,
            employee_id: new.employee_id,
            expected_amount: new.expected_amount,
            actual_amount: new.actual_amount,
            discrepancy: new.discrepancy,
            notes: new.notes,
            verified_by: None,
            verified_at: None,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update_unverified(
        &self,
        id: i64,
        amounts: TillAmounts,
    ) -> Result<Option<TillVerification>, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|r| r.id == id && r.verified_by.is_none()) else {
            return Ok(None);
        };
        row.expected_amount = amounts.expected_amount;
        row.actual_amount = amounts.actual_amount;
        row.discrepancy = amounts.discrepancy;
        row.notes = amounts.notes;
        Ok(Some(row.clone()))
    }

    async fn mark_verified(
        &self,
        id: i64,
        verified_by: i64,
        verified_at: DateTime<Utc>,
    ) -> Result<Option<TillVerification>, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|r| r.id == id && r.verified_by.is_none()) else {
            return Ok(None);
        };
        row.verified_by = Some(verified_by);
        row.verified_at = Some(verified_at);
        Ok(Some(row.clone()))
    }
}

// Devolve sempre a leitura feita antes de qualquer escrita, simulando dois
// pedidos que leram o registro ao mesmo tempo.
struct StaleReadStore {
    inner: Arc<MemoryTillStore>,
    snapshot: TillVerification,
}

#[async_trait]
impl TillStore for StaleReadStore {
    async fn find_shift(&self, shift_id: i64) -> Result<Option<Shift>, AppError> {
        self.inner.find_shift(shift_id).await
    }

    async fn user_exists(&self, user_id: i64) -> Result<bool, AppError> {
        self.inner.user_exists(user_id).await
    }

    async fn find_verification(&self, _id: i64) -> Result<Option<TillVerification>, AppError> {
        Ok(Some(self.snapshot.clone()))
    }

    async fn list_verifications(
        &self,
        scope: &ListScope,
    ) -> Result<Vec<TillVerification>, AppError> {
        self.inner.list_verifications(scope).await
    }

    async fn insert_verification(
        &self,
        new: NewTillVerification,
    ) -> Result<TillVerification, AppError> {
        self.inner.insert_verification(new).await
    }

    async fn update_unverified(
        &self,
        id: i64,
        amounts: TillAmounts,
    ) -> Result<Option<TillVerification>, AppError> {
        self.inner.update_unverified(id, amounts).await
    }

    async fn mark_verified(
        &self,
        id: i64,
        verified_by: i64,
        verified_at: DateTime<Utc>,
    ) -> Result<Option<TillVerification>, AppError> {
        self.inner.mark_verified(id, verified_by, verified_at).await
    }
}

const VENUE_A: i64 = 4;
const VENUE_B: i64 = 7;
const SHIFT_A: i64 = 10;
const SHIFT_B: i64 = 11;

fn user(id: i64, role: Role, venues: &[i64]) -> User {
    User {
        id,
        username: format!("user{id}"),
        password_hash: String::new(),
        full_name: format!("User {id}"),
        email: format!("user{id}@example.org"),
        role,
        profile_picture: None,
        phone: None,
        assigned_venues: venues.to_vec(),
        custom_permissions: PermissionSet::new(),
        active: true,
        last_login: None,
        created_by_id: None,
        created_at: Utc::now(),
    }
}

fn shift(id: i64, venue_id: i64, employee_id: i64) -> Shift {
    let start_time = Utc::now() - Duration::hours(8);
    Shift {
        id,
        venue_id,
        employee_id: Some(employee_id),
        start_time,
        end_time: start_time + Duration::hours(8),
        title: None,
        status: ShiftStatus::Completed,
        notes: None,
        created_at: start_time,
    }
}

fn store() -> Arc<MemoryTillStore> {
    Arc::new(MemoryTillStore::new(
        vec![shift(SHIFT_A, VENUE_A, 1), shift(SHIFT_B, VENUE_B, 1)],
        vec![1, 2, 3, 4, 5],
    ))
}

fn counted(shift_id: i64, expected_amount: i64, actual_amount: i64) -> CreateTillVerificationPayload {
    CreateTillVerificationPayload {
        shift_id,
        employee_id: None,
        expected_amount,
        actual_amount,
        notes: None,
    }
}

#[test]
fn discrepancy_is_actual_minus_expected() {
    for (expected, actual) in [(0, 0), (50_000, 49_850), (10_000, 12_345), (1, 0), (0, 1)] {
        assert_eq!(compute_discrepancy(expected, actual).unwrap(), actual - expected);
    }
    assert!(matches!(compute_discrepancy(-1, 0), Err(AppError::InvalidState(_))));
    assert!(matches!(compute_discrepancy(0, -1), Err(AppError::InvalidState(_))));
}

#[tokio::test]
async fn employee_edits_own_unverified_record() {
    let service = TillService::new(store());
    let employee = user(1, Role::Employee, &[VENUE_A]);

    let created = service
        .create_verification(&employee, counted(SHIFT_A, 50_000, 49_000))
        .await
        .unwrap();
    assert_eq!(created.employee_id, employee.id);
    assert_eq!(created.discrepancy, -1_000);
    assert_eq!(created.status(), TillStatus::Unverified);

    let edited = service
        .edit_verification(
            &employee,
            created.id,
            UpdateTillVerificationPayload {
                actual_amount: Some(50_250),
                notes: Some(Some("recontado".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(edited.expected_amount, 50_000);
    assert_eq!(edited.discrepancy, 250);
    assert_eq!(edited.notes.as_deref(), Some("recontado"));
}

#[tokio::test]
async fn null_notes_clear_and_absent_notes_keep() {
    let service = TillService::new(store());
    let employee = user(1, Role::Employee, &[VENUE_A]);

    let created = service
        .create_verification(
            &employee,
            CreateTillVerificationPayload {
                notes: Some("faltou troco".into()),
                ..counted(SHIFT_A, 100, 90)
            },
        )
        .await
        .unwrap();

    let keep: UpdateTillVerificationPayload =
        serde_json::from_value(serde_json::json!({ "actualAmount": 95 })).unwrap();
    let kept = service
        .edit_verification(&employee, created.id, keep)
        .await
        .unwrap();
    assert_eq!(kept.notes.as_deref(), Some("faltou troco"));

    let clear: UpdateTillVerificationPayload =
        serde_json::from_value(serde_json::json!({ "notes": null })).unwrap();
    let cleared = service
        .edit_verification(&employee, created.id, clear)
        .await
        .unwrap();
    assert_eq!(cleared.notes, None);
    assert_eq!(cleared.actual_amount, 95);
}

#[tokio::test]
async fn permission_check_precedes_self_verification_check() {
    let service = TillService::new(store());
    let employee = user(1, Role::Employee, &[VENUE_A]);
    let supervisor = user(2, Role::Supervisor, &[VENUE_A]);

    let own = service
        .create_verification(&employee, counted(SHIFT_A, 100, 100))
        .await
        .unwrap();
    assert!(matches!(
        service.verify(&employee, own.id).await,
        Err(AppError::Forbidden(_))
    ));

    let supervisors_own = service
        .create_verification(&supervisor, counted(SHIFT_A, 100, 90))
        .await
        .unwrap();
    assert!(matches!(
        service.verify(&supervisor, supervisors_own.id).await,
        Err(AppError::InvalidState(_))
    ));
}

#[tokio::test]
async fn venue_manager_verifies_only_assigned_venues() {
    let service = TillService::new(store());
    let employee = user(1, Role::Employee, &[VENUE_A, VENUE_B]);
    let manager = user(3, Role::Manager, &[VENUE_A]);

    let at_assigned = service
        .create_verification(&employee, counted(SHIFT_A, 100, 100))
        .await
        .unwrap();
    let at_other = service
        .create_verification(&employee, counted(SHIFT_B, 100, 100))
        .await
        .unwrap();

    let verified = service.verify(&manager, at_assigned.id).await.unwrap();
    assert_eq!(verified.verified_by, Some(manager.id));
    assert!(verified.verified_at.is_some());
    assert_eq!(verified.status(), TillStatus::Verified);

    assert!(matches!(
        service.verify(&manager, at_other.id).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn negative_amount_creates_nothing() {
    let store = store();
    let service = TillService::new(store.clone());
    let admin = user(5, Role::Admin, &[]);

    let result = service
        .create_verification(
            &admin,
            CreateTillVerificationPayload {
                employee_id: Some(1),
                ..counted(SHIFT_A, -5, 100)
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::InvalidState(_))));
    assert_eq!(store.count(), 0);
}

#[tokio::test]
async fn counting_for_someone_else_requires_till_management() {
    let service = TillService::new(store());
    let coworker = user(2, Role::Employee, &[VENUE_A]);
    let supervisor = user(3, Role::Supervisor, &[VENUE_A]);

    let on_behalf = CreateTillVerificationPayload {
        employee_id: Some(1),
        ..counted(SHIFT_A, 100, 100)
    };
    assert!(matches!(
        service.create_verification(&coworker, on_behalf).await,
        Err(AppError::Forbidden(_))
    ));

    let created = service
        .create_verification(
            &supervisor,
            CreateTillVerificationPayload {
                employee_id: Some(1),
                ..counted(SHIFT_A, 100, 100)
            },
        )
        .await
        .unwrap();
    assert_eq!(created.employee_id, 1);

    let missing_user = CreateTillVerificationPayload {
        employee_id: Some(99),
        ..counted(SHIFT_A, 100, 100)
    };
    assert!(matches!(
        service.create_verification(&supervisor, missing_user).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn unknown_shift_is_not_found() {
    let service = TillService::new(store());
    let employee = user(1, Role::Employee, &[]);

    assert!(matches!(
        service.create_verification(&employee, counted(999, 1, 1)).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn verified_record_is_frozen() {
    let service = TillService::new(store());
    let employee = user(1, Role::Employee, &[VENUE_A]);
    let manager = user(3, Role::Manager, &[VENUE_A]);
    let admin = user(5, Role::Admin, &[]);

    let created = service
        .create_verification(&employee, counted(SHIFT_A, 100, 80))
        .await
        .unwrap();
    let verified = service.verify(&manager, created.id).await.unwrap();

    let edit = UpdateTillVerificationPayload {
        actual_amount: Some(100),
        ..Default::default()
    };
    assert!(matches!(
        service.edit_verification(&employee, created.id, edit.clone()).await,
        Err(AppError::InvalidState(_))
    ));
    assert!(matches!(
        service.edit_verification(&admin, created.id, edit).await,
        Err(AppError::InvalidState(_))
    ));
    assert!(matches!(
        service.verify(&admin, created.id).await,
        Err(AppError::InvalidState(_))
    ));

    let after = service.get_verification(&admin, created.id).await.unwrap();
    assert_eq!(after, verified);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_verifications_have_exactly_one_winner() {
    let service = TillService::new(store());
    let employee = user(1, Role::Employee, &[VENUE_A]);

    let created = service
        .create_verification(&employee, counted(SHIFT_A, 1_000, 1_000))
        .await
        .unwrap();

    let till_id = created.id;
    let mut handles = Vec::new();
    for verifier_id in 2..=5 {
        let service = service.clone();
        let verifier = user(verifier_id, Role::Manager, &[VENUE_A]);
        handles.push(tokio::spawn(async move {
            service.verify(&verifier, till_id).await
        }));
    }

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(record) => winners.push(record),
            Err(AppError::InvalidState(_)) => {}
            Err(other) => panic!("erro inesperado: {other:?}"),
        }
    }

    assert_eq!(winners.len(), 1);
    let stored = service.get_verification(&employee, till_id).await.unwrap();
    assert_eq!(stored.verified_by, winners[0].verified_by);
    assert_eq!(stored.verified_at, winners[0].verified_at);
}

#[tokio::test]
async fn stale_read_loses_to_conditional_update() {
    let inner = store();
    let employee = user(1, Role::Employee, &[VENUE_A]);
    let first = user(3, Role::Manager, &[VENUE_A]);
    let second = user(4, Role::Supervisor, &[VENUE_A]);

    let created = TillService::new(inner.clone())
        .create_verification(&employee, counted(SHIFT_A, 500, 450))
        .await
        .unwrap();

    let racing = TillService::new(Arc::new(StaleReadStore {
        inner: inner.clone(),
        snapshot: created.clone(),
    }));

    assert!(racing.verify(&first, created.id).await.is_ok());
    // A segunda leitura ainda vê "não conferido"; só o update condicional barra
    assert!(matches!(
        racing.verify(&second, created.id).await,
        Err(AppError::InvalidState(_))
    ));
    assert!(matches!(
        racing
            .edit_verification(
                &employee,
                created.id,
                UpdateTillVerificationPayload {
                    actual_amount: Some(500),
                    ..Default::default()
                },
            )
            .await,
        Err(AppError::InvalidState(_))
    ));

    let stored = inner.find_verification(created.id).await.unwrap().unwrap();
    assert_eq!(stored.verified_by, Some(first.id));
    assert_eq!(stored.actual_amount, 450);
}

#[tokio::test]
async fn listing_is_scoped_to_own_records_without_view_permission() {
    let service = TillService::new(store());
    let first = user(1, Role::Employee, &[VENUE_A]);
    let second = user(2, Role::Employee, &[VENUE_A]);
    let manager = user(3, Role::Manager, &[VENUE_A]);

    service.create_verification(&first, counted(SHIFT_A, 1, 1)).await.unwrap();
    service.create_verification(&second, counted(SHIFT_A, 2, 2)).await.unwrap();

    let own = service.list_verifications(&first).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].employee_id, first.id);

    assert_eq!(service.list_verifications(&manager).await.unwrap().len(), 2);
}

#[tokio::test]
async fn venue_scoped_listing_hides_other_venues() {
    let service = TillService::new(store());
    let employee = user(1, Role::Employee, &[VENUE_A, VENUE_B]);
    let manager = user(3, Role::Manager, &[VENUE_A]);
    let admin = user(5, Role::Admin, &[]);

    let at_assigned = service
        .create_verification(&employee, counted(SHIFT_A, 100, 100))
        .await
        .unwrap();
    let at_other = service
        .create_verification(&employee, counted(SHIFT_B, 100, 90))
        .await
        .unwrap();

    let visible: Vec<i64> = service
        .list_verifications(&manager)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(visible, vec![at_assigned.id]);

    // Listagem e leitura individual concordam
    assert!(matches!(
        service.get_verification(&manager, at_other.id).await,
        Err(AppError::Forbidden(_))
    ));

    assert_eq!(service.list_verifications(&admin).await.unwrap().len(), 2);
    assert_eq!(service.list_verifications(&employee).await.unwrap().len(), 2);
}
