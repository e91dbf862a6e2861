//! Track Stages Use Case
//!
//! Attaches pipeline stages to orders and records progress on them. Every
//! mutation ends with the order's derived status recomputed from all of its
//! stages.

use std::collections::HashMap;
use std::sync::Arc;

use super::{guarded, publish};
use crate::application::dto::{AddStageDto, OrderStageDto, StageUpdateDto, UpdateStageDto};
use crate::application::ports::{Clock, EventPublisherPort};
use crate::application::{Confirmed, TrackerError};
use crate::domain::order_tracking::events::StageChanged;
use crate::domain::order_tracking::{
    NewOrderStage, Order, OrderRepository, OrderStage, ProgressTracker,
    StageOrdinals, StageSequencer, StageUpdate, TrackingEvent,
};
use crate::domain::production_catalog::{
    PipelineStage, PipelineStageRepository, VendorRepository,
};
use crate::domain::shared::{OrderId, OrderStageId, PipelineStageId, VendorId};
use crate::observability::record_stage_completed;

/// Use case for order stage progress.
pub struct TrackStagesUseCase {
    orders: Arc<dyn OrderRepository>,
    stages: Arc<dyn PipelineStageRepository>,
    vendors: Arc<dyn VendorRepository>,
    publisher: Arc<dyn EventPublisherPort>,
    clock: Arc<dyn Clock>,
}

impl TrackStagesUseCase {
    /// Create a new `TrackStagesUseCase`.
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        stages: Arc<dyn PipelineStageRepository>,
        vendors: Arc<dyn VendorRepository>,
        publisher: Arc<dyn EventPublisherPort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orders,
            stages,
            vendors,
            publisher,
            clock,
        }
    }

    /// Attach a pipeline stage to an order in status `New`.
    pub async fn add_stage(
        &self,
        order_id: OrderId,
        input: AddStageDto,
    ) -> Result<Confirmed<OrderStageDto>, TrackerError> {
        self.order(order_id).await?;
        let pipeline = self.pipeline_stage(input.stage_id).await?;
        self.check_vendor(input.assigned_vendor, &pipeline).await?;
        let start_date = input
            .start_date
            .ok_or_else(|| TrackerError::invalid("start_date", "This field is required."))?;

        let id = self.orders.next_stage_id().await?;
        let row = OrderStage::new(
            id,
            NewOrderStage {
                order_id,
                stage_id: pipeline.id(),
                assigned_vendor: input.assigned_vendor,
                start_date,
                end_date: input.end_date,
                note: input.note,
            },
        )?;
        self.orders.insert_stage(&row).await.map_err(guarded)?;

        let at = self.clock.now();
        let mut order = self.orders.save_progress(order_id, &[], at).await?;

        tracing::info!(
            order_id = %order_id,
            order_stage_id = %id,
            stage = pipeline.name(),
            status = %order.status(),
            "Stage added to order"
        );
        let mut events = vec![TrackingEvent::StageAdded(StageChanged {
            order_id,
            order_stage_id: id,
            stage_id: pipeline.id(),
            occurred_at: at,
        })];
        events.extend(order.drain_events());
        publish(self.publisher.as_ref(), events).await;

        let message = format!("Stage {} added to order #{order_id}.", pipeline.name());
        Ok(Confirmed::new(
            OrderStageDto::from_stage(&row, Some(pipeline.name()), Some(pipeline.ordinal().value())),
            message,
        ))
    }

    /// Change a stage's status, vendor and note.
    ///
    /// Moving a stage into `Completed` stamps its end date and starts the
    /// next stage by ordinal.
    pub async fn update_stage(
        &self,
        order_id: OrderId,
        stage_id: OrderStageId,
        input: UpdateStageDto,
    ) -> Result<Confirmed<StageUpdateDto>, TrackerError> {
        self.order(order_id).await?;
        let mut rows = self.orders.stages_for(order_id).await?;
        let pipeline_id = rows
            .iter()
            .find(|s| s.id() == stage_id)
            .map(OrderStage::stage_id)
            .ok_or_else(|| TrackerError::not_found("OrderStage", stage_id))?;

        let catalog = self.stages.list().await?;
        let by_id: HashMap<PipelineStageId, &PipelineStage> =
            catalog.iter().map(|s| (s.id(), s)).collect();
        if let Some(pipeline) = by_id.get(&pipeline_id) {
            self.check_vendor(input.assigned_vendor, pipeline).await?;
        }

        let at = self.clock.now();
        let ordinals = StageOrdinals::from_catalog(&catalog);
        let progress = ProgressTracker::record_update(
            &mut rows,
            stage_id,
            StageUpdate {
                status: input.status,
                assigned_vendor: input.assigned_vendor,
                note: input.note,
            },
            &ordinals,
            at,
        )?;
        let touched: Vec<OrderStage> = rows
            .iter()
            .filter(|s| progress.touched.contains(&s.id()))
            .cloned()
            .collect();
        let mut order = self.orders.save_progress(order_id, &touched, at).await?;

        let completed = progress
            .events
            .iter()
            .any(|e| matches!(e, TrackingEvent::StageCompleted(_)));
        if completed {
            record_stage_completed(progress.activated.is_some());
        }
        tracing::info!(
            order_id = %order_id,
            order_stage_id = %stage_id,
            stage_status = %input.status,
            activated = ?progress.activated,
            order_status = %order.status(),
            "Stage updated"
        );

        let mut events = progress.events;
        events.extend(order.drain_events());
        publish(self.publisher.as_ref(), events).await;

        let describe = |row: &OrderStage| {
            let pipeline = by_id.get(&row.stage_id());
            OrderStageDto::from_stage(
                row,
                pipeline.map(|p| p.name()),
                pipeline.map(|p| p.ordinal().value()),
            )
        };
        let updated = rows
            .iter()
            .find(|s| s.id() == stage_id)
            .map(describe)
            .ok_or_else(|| TrackerError::not_found("OrderStage", stage_id))?;

        let next_name = progress
            .activated
            .and_then(|next| rows.iter().find(|s| s.id() == next))
            .and_then(|row| by_id.get(&row.stage_id()))
            .map(|p| p.name().to_string());
        let message = match next_name {
            Some(next) => format!("Stage completed. {next} is now in progress."),
            None => "Stage updated successfully.".to_string(),
        };

        Ok(Confirmed::new(
            StageUpdateDto {
                stage: updated,
                activated: progress.activated,
                order_status: order.status(),
            },
            message,
        ))
    }

    /// An order's stages in pipeline order.
    pub async fn list_stages(&self, order_id: OrderId) -> Result<Vec<OrderStageDto>, TrackerError> {
        self.order(order_id).await?;
        let mut rows = self.orders.stages_for(order_id).await?;
        let catalog = self.stages.list().await?;
        StageSequencer::sort(&mut rows, &StageOrdinals::from_catalog(&catalog));

        let by_id: HashMap<PipelineStageId, &PipelineStage> =
            catalog.iter().map(|s| (s.id(), s)).collect();
        Ok(rows
            .iter()
            .map(|row| {
                let pipeline = by_id.get(&row.stage_id());
                OrderStageDto::from_stage(
                    row,
                    pipeline.map(|p| p.name()),
                    pipeline.map(|p| p.ordinal().value()),
                )
            })
            .collect())
    }

    // ========================================================================
    // Private Helpers
    // ========================================================================

    async fn order(&self, id: OrderId) -> Result<Order, TrackerError> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| TrackerError::not_found("Order", id))
    }

    async fn pipeline_stage(&self, id: PipelineStageId) -> Result<PipelineStage, TrackerError> {
        self.stages
            .find_by_id(id)
            .await?
            .ok_or_else(|| TrackerError::not_found("PipelineStage", id))
    }

    async fn check_vendor(
        &self,
        vendor: Option<VendorId>,
        pipeline: &PipelineStage,
    ) -> Result<(), TrackerError> {
        let Some(vendor_id) = vendor else {
            return Ok(());
        };
        let vendor = self
            .vendors
            .find_by_id(vendor_id)
            .await?
            .ok_or_else(|| TrackerError::not_found("Vendor", vendor_id))?;
        if !vendor.can_work(pipeline.required_role()) {
            return Err(TrackerError::invalid(
                "assigned_vendor",
                format!("{} cannot work the {} stage.", vendor.name(), pipeline.name()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{FixedClock, NoOpEventPublisher};
    use crate::domain::order_tracking::{EffectiveStatus, OrderDetails, OrderStatus, StageStatus};
    use crate::domain::production_catalog::{
        PipelineStageSpec, Vendor, VendorForm, VendorProfile, VendorRole, VendorRoleRepository,
    };
    use crate::domain::shared::{CustomerId, Money, VendorRoleId};
    use crate::infrastructure::persistence::{
        InMemoryOrderRepository, InMemoryPipelineStageRepository, InMemoryVendorRepository,
        InMemoryVendorRoleRepository,
    };
    use chrono::{NaiveDate, TimeZone, Utc};

    struct Fixture {
        uc: TrackStagesUseCase,
        orders: Arc<InMemoryOrderRepository>,
        stages: Arc<InMemoryPipelineStageRepository>,
        vendors: Arc<InMemoryVendorRepository>,
    }

    fn fixture() -> Fixture {
        let orders = Arc::new(InMemoryOrderRepository::new());
        let stages = Arc::new(InMemoryPipelineStageRepository::new());
        let vendors = Arc::new(InMemoryVendorRepository::new());
        let uc = TrackStagesUseCase::new(
            orders.clone(),
            stages.clone(),
            vendors.clone(),
            Arc::new(NoOpEventPublisher),
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 4, 10, 12, 0, 0).unwrap())),
        );
        Fixture {
            uc,
            orders,
            stages,
            vendors,
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()
    }

    async fn order(f: &Fixture) -> OrderId {
        let id = f.orders.next_id().await.unwrap();
        let order = Order::place(
            id,
            OrderDetails {
                customer_id: CustomerId::new(1),
                placed_on: day(),
                completion_date: None,
                specifications: String::new(),
                amount: Money::whole(500),
                measurement_id: None,
            },
            FixedClock(Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap()).now(),
        )
        .unwrap();
        f.orders.insert(&order).await.unwrap();
        id
    }

    async fn pipeline(f: &Fixture, name: &str, ordinal: u32, role: Option<VendorRoleId>) -> PipelineStageId {
        f.stages
            .create(PipelineStageSpec::parse(name, Some(ordinal), role).unwrap())
            .await
            .unwrap()
            .id()
    }

    fn add(stage_id: PipelineStageId) -> AddStageDto {
        AddStageDto {
            stage_id,
            assigned_vendor: None,
            start_date: Some(day()),
            end_date: None,
            note: String::new(),
        }
    }

    fn set(status: StageStatus) -> UpdateStageDto {
        UpdateStageDto {
            status,
            assigned_vendor: None,
            note: String::new(),
        }
    }

    #[tokio::test]
    async fn adding_stage_recomputes_to_pending() {
        let f = fixture();
        let o = order(&f).await;
        let cutting = pipeline(&f, "Cutting", 1, None).await;

        let added = f.uc.add_stage(o, add(cutting)).await.unwrap();
        assert_eq!(added.value.status, StageStatus::New);
        assert_eq!(added.message, format!("Stage Cutting added to order #{o}."));

        let stored = f.orders.find_by_id(o).await.unwrap().unwrap();
        assert_eq!(stored.status(), EffectiveStatus::Derived(OrderStatus::Pending));
    }

    #[tokio::test]
    async fn duplicate_stage_is_a_conflict() {
        let f = fixture();
        let o = order(&f).await;
        let cutting = pipeline(&f, "Cutting", 1, None).await;
        f.uc.add_stage(o, add(cutting)).await.unwrap();
        let err = f.uc.add_stage(o, add(cutting)).await.unwrap_err();
        assert_eq!(err.kind(), "conflict");
        assert_eq!(f.uc.list_stages(o).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn start_date_is_required() {
        let f = fixture();
        let o = order(&f).await;
        let cutting = pipeline(&f, "Cutting", 1, None).await;
        let err = f
            .uc
            .add_stage(o, AddStageDto { start_date: None, ..add(cutting) })
            .await
            .unwrap_err();
        assert_eq!(err, TrackerError::invalid("start_date", "This field is required."));
    }

    #[tokio::test]
    async fn vendor_must_hold_required_role() {
        let f = fixture();
        let roles = InMemoryVendorRoleRepository::new();
        let cutter = roles.next_id().await.unwrap();
        roles.insert(&VendorRole::new(cutter, "Cutter").unwrap()).await.unwrap();
        let tailor = roles.next_id().await.unwrap();

        let vendor_id = f.vendors.next_id().await.unwrap();
        let profile = VendorProfile::parse(VendorForm {
            name: "Bela".to_string(),
            role: tailor,
            phone_numbers: vec![],
            address: String::new(),
            remark: String::new(),
        })
        .unwrap();
        f.vendors.save(&Vendor::new(vendor_id, profile)).await.unwrap();

        let o = order(&f).await;
        let cutting = pipeline(&f, "Cutting", 1, Some(cutter)).await;
        let err = f
            .uc
            .add_stage(o, AddStageDto { assigned_vendor: Some(vendor_id), ..add(cutting) })
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ref fields)
            if fields[0].field.as_deref() == Some("assigned_vendor")));
    }

    #[tokio::test]
    async fn completing_stage_starts_the_next_one() {
        let f = fixture();
        let o = order(&f).await;
        // Stages attached in reverse pipeline order.
        let packing = pipeline(&f, "Packing", 30, None).await;
        let stitching = pipeline(&f, "Stitching", 20, None).await;
        let cutting = pipeline(&f, "Cutting", 10, None).await;
        for stage in [packing, stitching, cutting] {
            f.uc.add_stage(o, add(stage)).await.unwrap();
        }

        let listed = f.uc.list_stages(o).await.unwrap();
        let names: Vec<_> = listed.iter().filter_map(|s| s.stage_name.clone()).collect();
        assert_eq!(names, vec!["Cutting", "Stitching", "Packing"]);

        let updated = f
            .uc
            .update_stage(o, listed[0].id, set(StageStatus::Completed))
            .await
            .unwrap();
        assert_eq!(updated.value.activated, Some(listed[1].id));
        assert_eq!(
            updated.value.order_status,
            EffectiveStatus::Derived(OrderStatus::InProgress)
        );
        assert_eq!(updated.value.stage.end_date, NaiveDate::from_ymd_opt(2026, 4, 10));
        assert_eq!(updated.message, "Stage completed. Stitching is now in progress.");

        let after = f.uc.list_stages(o).await.unwrap();
        assert_eq!(after[1].status, StageStatus::InProgress);
        assert_eq!(after[2].status, StageStatus::New);
    }

    #[tokio::test]
    async fn completing_every_stage_completes_order() {
        let f = fixture();
        let o = order(&f).await;
        let cutting = pipeline(&f, "Cutting", 1, None).await;
        let stitching = pipeline(&f, "Stitching", 2, None).await;
        f.uc.add_stage(o, add(cutting)).await.unwrap();
        f.uc.add_stage(o, add(stitching)).await.unwrap();

        for row in f.uc.list_stages(o).await.unwrap() {
            f.uc.update_stage(o, row.id, set(StageStatus::Completed)).await.unwrap();
        }
        let stored = f.orders.find_by_id(o).await.unwrap().unwrap();
        assert_eq!(stored.status(), EffectiveStatus::Derived(OrderStatus::Completed));
    }

    #[tokio::test]
    async fn stage_of_another_order_is_not_found() {
        let f = fixture();
        let first = order(&f).await;
        let second = order(&f).await;
        let cutting = pipeline(&f, "Cutting", 1, None).await;
        let row = f.uc.add_stage(first, add(cutting)).await.unwrap().value;
        let err = f
            .uc
            .update_stage(second, row.id, set(StageStatus::Completed))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }
}
