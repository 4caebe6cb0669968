//! Marketplace workflows: consumer pickups, B2B bulk pickups, and worker
//! equipment requests.
//!
//! Creation commands default the id, requester identity, timestamp, and
//! initial status, then prepend. Status updates are permissive by-id
//! replacements with no transition table.

use time::OffsetDateTime;

use greenloop_core::{
    BulkPickupRequest, BulkPickupStatus, EquipmentRequest, EquipmentStatus, NewBulkPickupRequest,
    NewPickupRequest, PickupRequest, PickupStatus,
};

use crate::store::{fresh_id, CommandEffect, EntityStore};

impl EntityStore {
    /// Record a consumer pickup request; starts `Pending`.
    pub fn add_pickup_request(
        &mut self,
        request: NewPickupRequest,
        user_id: &str,
        now: OffsetDateTime,
    ) -> String {
        let id = fresh_id("pr-");
        self.pickup_requests.insert(
            0,
            PickupRequest {
                id: id.clone(),
                user_id: user_id.to_string(),
                timestamp: now,
                status: PickupStatus::Pending,
                waste_type: request.waste_type,
                quantity: request.quantity,
                address: request.address,
            },
        );
        id
    }

    /// Replace a pickup request's status. Unknown ids are logged no-ops.
    pub fn update_pickup_status(&mut self, request_id: &str, status: PickupStatus) -> CommandEffect {
        match self.pickup_requests.iter_mut().find(|r| r.id == request_id) {
            Some(request) => {
                request.status = status;
                CommandEffect::Applied
            }
            None => {
                tracing::warn!(request_id, %status, "status update for unknown pickup; ignoring");
                CommandEffect::NoOp
            }
        }
    }

    /// Record a B2B bulk pickup request; starts `Requested`.
    pub fn add_bulk_pickup_request(
        &mut self,
        request: NewBulkPickupRequest,
        business_id: &str,
        now: OffsetDateTime,
    ) -> String {
        let id = fresh_id("bpr-");
        self.bulk_pickup_requests.insert(
            0,
            BulkPickupRequest {
                id: id.clone(),
                business_id: business_id.to_string(),
                timestamp: now,
                status: BulkPickupStatus::Requested,
                material: request.material,
                estimated_weight_kg: request.estimated_weight_kg,
                address: request.address,
            },
        );
        id
    }

    /// Replace a bulk pickup request's status. Unknown ids are logged
    /// no-ops.
    pub fn update_bulk_pickup_status(
        &mut self,
        request_id: &str,
        status: BulkPickupStatus,
    ) -> CommandEffect {
        match self
            .bulk_pickup_requests
            .iter_mut()
            .find(|r| r.id == request_id)
        {
            Some(request) => {
                request.status = status;
                CommandEffect::Applied
            }
            None => {
                tracing::warn!(request_id, %status, "status update for unknown bulk pickup; ignoring");
                CommandEffect::NoOp
            }
        }
    }

    /// Record a worker equipment request addressed to `authority_name`.
    /// Session-scoped; never persisted.
    pub fn add_equipment_request(
        &mut self,
        items: Vec<String>,
        authority_name: &str,
        worker_id: &str,
        now: OffsetDateTime,
    ) -> String {
        let id = fresh_id("eq-");
        self.equipment_requests.insert(
            0,
            EquipmentRequest {
                id: id.clone(),
                worker_id: worker_id.to_string(),
                items,
                authority_name: authority_name.to_string(),
                status: EquipmentStatus::Pending,
                timestamp: now,
            },
        );
        id
    }
}
