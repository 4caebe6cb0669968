//! The session: one user, one store, one command surface.
//!
//! A [`Session`] owns the entity store (shared with scheduled dispatch
//! tasks behind a mutex), the dispatch scheduler, and handles to the two
//! external collaborators: the persistence gateway and the moderation
//! service. Commands execute to completion one at a time; every successful
//! mutation writes its touched snapshot keys through the gateway before the
//! command returns.
//!
//! The session is constructed with an explicit [`Identity`]; commands never
//! assume a fixed caller.

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::Mutex;

use greenloop_core::{
    BadgeCatalog, BadgeSlug, Building, BulkPickupRequest, BulkPickupStatus, Community,
    CommunityMember, CommunityMessage, EquipmentRequest, HistoryItem, Identity,
    NewBulkPickupRequest, NewPenalty, NewPickupRequest, NewReport, PenaltyStatus, PickupRequest,
    PickupStatus, Report, ReportStatus, UserProfile, Vehicle,
};
use greenloop_storage::{keys, PersistenceGateway};

use crate::community::{ModerationService, SendOutcome, MODERATION_UNAVAILABLE};
use crate::dispatch::{self, DispatchScheduler, DispatchTiming};
use crate::snapshot;
use crate::store::{CommandEffect, EntityStore};
use crate::EngineError;

/// Session construction knobs.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Locale forwarded to the moderation service.
    pub locale: String,
    pub timing: DispatchTiming,
    pub catalog: BadgeCatalog,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            timing: DispatchTiming::default(),
            catalog: BadgeCatalog::default(),
        }
    }
}

/// The authoritative holder of all mutable entities and the rules that
/// transform them.
pub struct Session {
    store: Arc<Mutex<EntityStore>>,
    gateway: Arc<dyn PersistenceGateway>,
    moderator: Arc<dyn ModerationService>,
    scheduler: Arc<DispatchScheduler>,
    identity: Identity,
    locale: String,
    timing: DispatchTiming,
    catalog: BadgeCatalog,
}

impl Session {
    /// Load the snapshot, seed what's absent, and grant the welcome bonus
    /// if the point balance is zero (it always is for a fresh session;
    /// points don't persist).
    pub async fn start(
        gateway: Arc<dyn PersistenceGateway>,
        moderator: Arc<dyn ModerationService>,
        identity: Identity,
        config: SessionConfig,
    ) -> Result<Self, EngineError> {
        let mut store = snapshot::load(gateway.as_ref()).await?;
        store.apply_welcome_bonus();
        tracing::debug!(
            user = %identity.user_id,
            history = store.history.len(),
            buildings = store.buildings.len(),
            "session started"
        );
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            gateway,
            moderator,
            scheduler: Arc::new(DispatchScheduler::new()),
            identity,
            locale: config.locale,
            timing: config.timing,
            catalog: config.catalog,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn catalog(&self) -> &BadgeCatalog {
        &self.catalog
    }

    // ─── History ─────────────────────────────────────────────────────

    /// Submit a citizen waste report. Bumps the badge trigger counter.
    pub async fn submit_report(&self, report: NewReport) -> Result<String, EngineError> {
        let mut store = self.store.lock().await;
        let id = store.add_report(report, OffsetDateTime::now_utc());
        store.note_report_submitted(&self.catalog);
        snapshot::write_key(self.gateway.as_ref(), keys::APP_HISTORY, &store.history).await?;
        Ok(id)
    }

    /// Record an opaque classification result in the history.
    pub async fn add_classification(
        &self,
        result: serde_json::Value,
    ) -> Result<String, EngineError> {
        let mut store = self.store.lock().await;
        let id = store.add_classification(result, OffsetDateTime::now_utc());
        snapshot::write_key(self.gateway.as_ref(), keys::APP_HISTORY, &store.history).await?;
        Ok(id)
    }

    // ─── Badges & points ─────────────────────────────────────────────

    pub async fn add_points(&self, delta: i64) {
        self.store.lock().await.add_points(delta);
    }

    /// Unlock a badge, granting its points exactly once.
    pub async fn unlock_badge(&self, slug: BadgeSlug) -> CommandEffect {
        self.store.lock().await.unlock_badge(slug, &self.catalog)
    }

    // ─── Compliance ──────────────────────────────────────────────────

    /// Set a report's lifecycle status.
    ///
    /// Manually resolving a report that has a vehicle en route cancels the
    /// pending dispatch run and idles the vehicle, so no stale transition
    /// fires later.
    pub async fn update_report_status(
        &self,
        report_id: &str,
        status: ReportStatus,
    ) -> Result<CommandEffect, EngineError> {
        let mut store = self.store.lock().await;
        let effect = store.update_report_status(report_id, status);
        if effect.is_applied() {
            if status == ReportStatus::Resolved {
                if let Some(vehicle_id) = store.vehicle_assigned_to(report_id) {
                    self.scheduler.cancel(&vehicle_id);
                    store.idle_vehicle(&vehicle_id);
                }
            }
            snapshot::write_key(self.gateway.as_ref(), keys::APP_HISTORY, &store.history).await?;
        }
        Ok(effect)
    }

    pub async fn update_report_penalty_status(
        &self,
        report_id: &str,
        status: PenaltyStatus,
    ) -> Result<CommandEffect, EngineError> {
        let mut store = self.store.lock().await;
        let effect = store.update_report_penalty_status(report_id, status);
        if effect.is_applied() {
            snapshot::write_key(self.gateway.as_ref(), keys::APP_HISTORY, &store.history).await?;
        }
        Ok(effect)
    }

    pub async fn assign_building_to_report(
        &self,
        report_id: &str,
        building_id: &str,
    ) -> Result<CommandEffect, EngineError> {
        let mut store = self.store.lock().await;
        let effect = store.assign_building_to_report(report_id, building_id);
        if effect.is_applied() {
            snapshot::write_key(self.gateway.as_ref(), keys::APP_HISTORY, &store.history).await?;
        }
        Ok(effect)
    }

    pub async fn add_warning_to_building(
        &self,
        building_id: &str,
        reason: &str,
    ) -> Result<CommandEffect, EngineError> {
        let mut store = self.store.lock().await;
        let effect = store.add_warning_to_building(building_id, reason, OffsetDateTime::now_utc());
        if effect.is_applied() {
            snapshot::write_key(self.gateway.as_ref(), keys::BUILDINGS, &store.buildings).await?;
        }
        Ok(effect)
    }

    pub async fn add_penalty_to_building(
        &self,
        building_id: &str,
        penalty: NewPenalty,
    ) -> Result<CommandEffect, EngineError> {
        let mut store = self.store.lock().await;
        let effect = store.add_penalty_to_building(building_id, penalty, OffsetDateTime::now_utc());
        if effect.is_applied() {
            snapshot::write_key(self.gateway.as_ref(), keys::BUILDINGS, &store.buildings).await?;
        }
        Ok(effect)
    }

    // ─── Dispatch ────────────────────────────────────────────────────

    /// Assign a vehicle to collect a reported pile of waste.
    ///
    /// Immediate effects apply before this returns; the arrival and
    /// completion transitions fire after the configured delays. Dispatching
    /// a report already assigned to a different vehicle cancels that
    /// vehicle's run and idles it; re-dispatching the same vehicle
    /// supersedes its previous run.
    pub async fn dispatch_vehicle_to_report(
        &self,
        vehicle_id: &str,
        report_id: &str,
    ) -> Result<(), EngineError> {
        let mut store = self.store.lock().await;
        if let Some(previous) = store.vehicle_assigned_to(report_id) {
            if previous != vehicle_id {
                self.scheduler.cancel(&previous);
                store.idle_vehicle(&previous);
            }
        }
        let start = store.begin_dispatch(vehicle_id, report_id);
        let generation = self.scheduler.begin(vehicle_id);
        if start.report_known {
            snapshot::write_key(self.gateway.as_ref(), keys::APP_HISTORY, &store.history).await?;
        }
        drop(store);

        // Timed transitions only run for a report with a recorded location;
        // otherwise the vehicle stays EnRoute until reassigned.
        if let Some(target) = start.target {
            dispatch::schedule_run(
                Arc::clone(&self.store),
                Arc::clone(&self.gateway),
                Arc::clone(&self.scheduler),
                self.timing,
                vehicle_id.to_string(),
                report_id.to_string(),
                target,
                generation,
            );
        }
        Ok(())
    }

    // ─── Communities ─────────────────────────────────────────────────

    /// Create a community named `"{name} ({area})"` with the session user
    /// as creator and first member.
    pub async fn create_community(
        &self,
        name: &str,
        description: &str,
        area: &str,
    ) -> Result<Community, EngineError> {
        let mut store = self.store.lock().await;
        let community = store.create_community(name, description, area, &self.identity.user_id);
        snapshot::write_key(self.gateway.as_ref(), keys::COMMUNITIES, &store.communities).await?;
        snapshot::write_key(
            self.gateway.as_ref(),
            keys::COMMUNITY_MEMBERS,
            &store.community_members,
        )
        .await?;
        Ok(community)
    }

    /// Join a community; a second join is a no-op.
    pub async fn join_community(&self, community_id: &str) -> Result<CommandEffect, EngineError> {
        let mut store = self.store.lock().await;
        let effect = store.join_community(community_id, &self.identity.user_id);
        if effect.is_applied() {
            snapshot::write_key(
                self.gateway.as_ref(),
                keys::COMMUNITY_MEMBERS,
                &store.community_members,
            )
            .await?;
        }
        Ok(effect)
    }

    /// Send a message to a community board, gated by moderation.
    ///
    /// A negative verdict or an unreachable moderation service yields
    /// [`SendOutcome::Rejected`] with no mutation; the unreachable case is
    /// deliberately fail-closed so moderation can't be bypassed by an
    /// outage.
    pub async fn send_message(
        &self,
        community_id: &str,
        text: &str,
    ) -> Result<SendOutcome, EngineError> {
        let verdict = match self.moderator.moderate(text, &self.locale).await {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!(error = %e, "moderation unavailable; failing closed");
                return Ok(SendOutcome::Rejected {
                    reason: MODERATION_UNAVAILABLE.to_string(),
                });
            }
        };
        if !verdict.is_appropriate {
            return Ok(SendOutcome::Rejected {
                reason: verdict
                    .reason
                    .unwrap_or_else(|| "message flagged as inappropriate".to_string()),
            });
        }

        let mut store = self.store.lock().await;
        let message = store.append_message(
            community_id,
            &self.identity.user_id,
            text,
            OffsetDateTime::now_utc(),
        );
        snapshot::write_key(
            self.gateway.as_ref(),
            keys::COMMUNITY_MESSAGES,
            &store.community_messages,
        )
        .await?;
        Ok(SendOutcome::Sent(message))
    }

    // ─── Marketplace ─────────────────────────────────────────────────

    pub async fn add_pickup_request(
        &self,
        request: NewPickupRequest,
    ) -> Result<String, EngineError> {
        let mut store = self.store.lock().await;
        let id =
            store.add_pickup_request(request, &self.identity.user_id, OffsetDateTime::now_utc());
        snapshot::write_key(
            self.gateway.as_ref(),
            keys::PICKUP_REQUESTS,
            &store.pickup_requests,
        )
        .await?;
        Ok(id)
    }

    pub async fn update_pickup_status(
        &self,
        request_id: &str,
        status: PickupStatus,
    ) -> Result<CommandEffect, EngineError> {
        let mut store = self.store.lock().await;
        let effect = store.update_pickup_status(request_id, status);
        if effect.is_applied() {
            snapshot::write_key(
                self.gateway.as_ref(),
                keys::PICKUP_REQUESTS,
                &store.pickup_requests,
            )
            .await?;
        }
        Ok(effect)
    }

    pub async fn add_bulk_pickup_request(
        &self,
        request: NewBulkPickupRequest,
    ) -> Result<String, EngineError> {
        let mut store = self.store.lock().await;
        let id = store.add_bulk_pickup_request(
            request,
            &self.identity.business_id,
            OffsetDateTime::now_utc(),
        );
        snapshot::write_key(
            self.gateway.as_ref(),
            keys::BULK_PICKUP_REQUESTS,
            &store.bulk_pickup_requests,
        )
        .await?;
        Ok(id)
    }

    pub async fn update_bulk_pickup_status(
        &self,
        request_id: &str,
        status: BulkPickupStatus,
    ) -> Result<CommandEffect, EngineError> {
        let mut store = self.store.lock().await;
        let effect = store.update_bulk_pickup_status(request_id, status);
        if effect.is_applied() {
            snapshot::write_key(
                self.gateway.as_ref(),
                keys::BULK_PICKUP_REQUESTS,
                &store.bulk_pickup_requests,
            )
            .await?;
        }
        Ok(effect)
    }

    /// File a worker equipment request. Session-scoped; not persisted.
    pub async fn add_equipment_request(&self, items: Vec<String>, authority_name: &str) -> String {
        let mut store = self.store.lock().await;
        store.add_equipment_request(
            items,
            authority_name,
            &self.identity.user_id,
            OffsetDateTime::now_utc(),
        )
    }

    // ─── Profile ─────────────────────────────────────────────────────

    pub async fn set_user_name(&self, name: &str) -> Result<(), EngineError> {
        let mut store = self.store.lock().await;
        store.profile.name = name.to_string();
        snapshot::write_plain(self.gateway.as_ref(), keys::USER_NAME, name).await
    }

    /// Assign the user's building; an empty id clears the assignment.
    pub async fn set_assigned_building(&self, building_id: &str) -> Result<(), EngineError> {
        let mut store = self.store.lock().await;
        store.profile.building_id = if building_id.is_empty() {
            None
        } else {
            Some(building_id.to_string())
        };
        snapshot::write_plain(self.gateway.as_ref(), keys::BUILDING_ID, building_id).await
    }

    // ─── Read accessors ──────────────────────────────────────────────

    pub async fn history(&self) -> Vec<HistoryItem> {
        self.store.lock().await.history.clone()
    }

    pub async fn report(&self, id: &str) -> Option<Report> {
        self.store.lock().await.report(id).cloned()
    }

    pub async fn buildings(&self) -> Vec<Building> {
        self.store.lock().await.buildings.clone()
    }

    pub async fn building(&self, id: &str) -> Option<Building> {
        self.store.lock().await.building(id).cloned()
    }

    pub async fn vehicles(&self) -> Vec<Vehicle> {
        self.store.lock().await.vehicles.clone()
    }

    pub async fn vehicle(&self, id: &str) -> Option<Vehicle> {
        self.store.lock().await.vehicle(id).cloned()
    }

    pub async fn communities(&self) -> Vec<Community> {
        self.store.lock().await.communities.clone()
    }

    pub async fn community_members(&self, community_id: &str) -> Vec<CommunityMember> {
        self.store
            .lock()
            .await
            .community_members
            .get(community_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn community_messages(&self, community_id: &str) -> Vec<CommunityMessage> {
        self.store
            .lock()
            .await
            .community_messages
            .get(community_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn pickup_requests(&self) -> Vec<PickupRequest> {
        self.store.lock().await.pickup_requests.clone()
    }

    pub async fn bulk_pickup_requests(&self) -> Vec<BulkPickupRequest> {
        self.store.lock().await.bulk_pickup_requests.clone()
    }

    pub async fn equipment_requests(&self) -> Vec<EquipmentRequest> {
        self.store.lock().await.equipment_requests.clone()
    }

    pub async fn profile(&self) -> UserProfile {
        self.store.lock().await.profile.clone()
    }
}
