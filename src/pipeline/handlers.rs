//! Event handlers: the composition root.
//!
//! Four independent reactions — report created, report status changed,
//! live parking occupancy changed, durable parking written — plus the
//! scheduled decay sweep. Each handler is a stateless reaction to one
//! external event; the embedding adapter wires these methods to
//! whatever event source the platform provides and retries on error.
//! Only transient infrastructure failures return `Err`.

use std::sync::Arc;

use chrono::Utc;

use crate::aggregation::{classify, count_recent_nearby};
use crate::config::PipelineConfig;
use crate::congestion::{decay_sweep, update_bucket, SweepSummary};
use crate::dispatch::messages::{accident_alert, parking_full_alert, report_summary, status_update};
use crate::dispatch::{send_to_roles, send_to_user, PushClient};
use crate::error::PipelineError;
use crate::pipeline::context::EventContext;
use crate::storage::models::{
    CongestionLevel, ParkingLiveRecord, ParkingRecord, Report, ReportStatus, ReportType, Role,
};
use crate::storage::{DurableStore, FastStore};
use crate::validation::validate_report;

/// Audience for accident and parking-full alerts.
const ALERT_AUDIENCE: [Role; 2] = [Role::TrafficPolice, Role::Citizen];
/// Audience for new-report summaries.
const OPS_AUDIENCE: [Role; 1] = [Role::TrafficPolice];

/// The congestion/alerting pipeline. Holds the store and push handles
/// every handler composes; no global state.
pub struct Pipeline {
    durable: Arc<dyn DurableStore>,
    fast: Arc<dyn FastStore>,
    push: Arc<dyn PushClient>,
    cfg: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        durable: Arc<dyn DurableStore>,
        fast: Arc<dyn FastStore>,
        push: Arc<dyn PushClient>,
        cfg: PipelineConfig,
    ) -> Self {
        Self {
            durable,
            fast,
            push,
            cfg,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// React to a newly created report.
    ///
    /// Validates (writing Pending or Rejected exactly once), classifies
    /// congestion around the report's location, and fans out the
    /// accident alert and the operations summary.
    pub fn handle_report_created(&self, report: &Report) -> Result<(), PipelineError> {
        let event = EventContext::new("on_report_created");
        let ctx = event.log_context().with_entity(&report.id);
        log::info!("{} REPORT_RECEIVED type={:?}", ctx, report.report_type);

        let outcome = validate_report(self.durable.as_ref(), report, &ctx)?;
        // Re-validation re-asserts the original stamp.
        let validated_at = report.validated_at.unwrap_or(event.received_at);
        let status = if outcome.valid {
            ReportStatus::Pending
        } else {
            ReportStatus::Rejected
        };
        self.durable
            .write_report_validation(&report.id, status, &outcome.reasons, validated_at)?;

        if !outcome.valid {
            log::info!("{} REPORT_REJECTED reasons={:?}", ctx, outcome.reasons);
            return Ok(());
        }

        if let Some((lat, lng)) = report.coordinates() {
            let count = count_recent_nearby(
                self.durable.as_ref(),
                lat,
                lng,
                event.received_at,
                &self.cfg,
                &ctx,
            )?;
            let level = classify(count, &self.cfg);
            log::info!("{} CONGESTION_CLASSIFIED nearby={} level={}", ctx, count, level.as_str());
            update_bucket(
                self.durable.as_ref(),
                self.fast.as_ref(),
                self.push.as_ref(),
                &self.cfg,
                lat,
                lng,
                level,
                event.received_at,
                &ctx,
            )?;
        }

        if report.parsed_type() == Some(ReportType::Accident) {
            send_to_roles(
                self.durable.as_ref(),
                self.push.as_ref(),
                &ALERT_AUDIENCE,
                &accident_alert(report),
                &ctx,
            )?;
        }

        send_to_roles(
            self.durable.as_ref(),
            self.push.as_ref(),
            &OPS_AUDIENCE,
            &report_summary(report),
            &ctx,
        )?;

        Ok(())
    }

    /// React to a report update. Notifies the author only when the
    /// status field actually changed value.
    pub fn handle_report_updated(
        &self,
        before: &Report,
        after: &Report,
    ) -> Result<(), PipelineError> {
        let event = EventContext::new("on_report_status_changed");
        let ctx = event.log_context().with_entity(&after.id);

        if before.status == after.status {
            log::debug!("{} STATUS_UNCHANGED", ctx);
            return Ok(());
        }
        let status = match after.status {
            Some(s) => s,
            None => {
                log::debug!("{} STATUS_CLEARED", ctx);
                return Ok(());
            }
        };

        let author_id = match after.author_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => {
                log::info!("{} AUTHOR_MISSING", ctx);
                return Ok(());
            }
        };
        // The author may have been legitimately deleted since the
        // report was filed.
        let author = match self.durable.user(author_id)? {
            Some(u) => u,
            None => {
                log::info!("{} AUTHOR_LOOKUP_MISS user={}", ctx, author_id);
                return Ok(());
            }
        };

        log::info!(
            "{} STATUS_CHANGED from={:?} to={} user={}",
            ctx,
            before.status.map(|s| s.as_str()),
            status.as_str(),
            author.id
        );
        send_to_user(
            self.durable.as_ref(),
            self.push.as_ref(),
            &author,
            &status_update(after, status),
            &ctx,
        )?;

        Ok(())
    }

    /// React to a change in the live parking mirror. Availability
    /// hitting zero forces the facility's bucket to HIGH and alerts.
    pub fn handle_parking_live_changed(
        &self,
        record: &ParkingLiveRecord,
    ) -> Result<(), PipelineError> {
        let event = EventContext::new("on_parking_occupancy_changed");
        let ctx = event.log_context().with_entity(&record.parking_id);

        if record.available_slots != 0 {
            log::debug!("{} PARKING_AVAILABLE slots={}", ctx, record.available_slots);
            return Ok(());
        }

        let parking = match self.durable.parking(&record.parking_id)? {
            Some(p) => p,
            None => {
                log::info!("{} PARKING_LOOKUP_MISS", ctx);
                return Ok(());
            }
        };

        log::info!("{} PARKING_FULL name={}", ctx, parking.name);
        update_bucket(
            self.durable.as_ref(),
            self.fast.as_ref(),
            self.push.as_ref(),
            &self.cfg,
            parking.latitude,
            parking.longitude,
            CongestionLevel::High,
            event.received_at,
            &ctx,
        )?;
        send_to_roles(
            self.durable.as_ref(),
            self.push.as_ref(),
            &ALERT_AUDIENCE,
            &parking_full_alert(&parking.id, &parking.name),
            &ctx,
        )?;

        Ok(())
    }

    /// Mirror a durable parking write into the fast store. A deleted
    /// master record removes the mirror; otherwise the occupancy counts
    /// are upserted with a fresh timestamp.
    pub fn handle_parking_record_written(
        &self,
        parking_id: &str,
        record: Option<&ParkingRecord>,
    ) -> Result<(), PipelineError> {
        let event = EventContext::new("parking_sync");
        let ctx = event.log_context().with_entity(parking_id);

        match record {
            None => {
                self.fast.delete_parking_live(parking_id)?;
                log::info!("{} PARKING_MIRROR_DELETED", ctx);
            }
            Some(p) => {
                let mirror = ParkingLiveRecord {
                    parking_id: parking_id.to_string(),
                    // A master record without an availability count is
                    // treated as fully available.
                    available_slots: p.available_slots.unwrap_or(p.total_slots),
                    total_slots: p.total_slots,
                    last_updated: event.received_at,
                };
                self.fast.upsert_parking_live(&mirror)?;
                log::info!(
                    "{} PARKING_MIRROR_SYNCED available={} total={}",
                    ctx,
                    mirror.available_slots,
                    mirror.total_slots
                );
            }
        }

        Ok(())
    }

    /// Scheduled decay sweep over all congestion buckets.
    pub fn run_decay_sweep(&self) -> Result<SweepSummary, PipelineError> {
        let event = EventContext::new("decay_sweep");
        let ctx = event.log_context();
        let summary = decay_sweep(self.fast.as_ref(), &self.cfg, Utc::now(), &ctx)?;
        Ok(summary)
    }
}
