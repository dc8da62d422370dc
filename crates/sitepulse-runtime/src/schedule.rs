//! Batch scheduling over the configuration snapshot
//!
//! Two pure operations over a snapshot of configuration rows: the run
//! initialization pass that resets every status, and the bounded batch
//! selection that expands queued rows into per-device work items. Both
//! mutate only the snapshot; the caller persists the touched statuses
//! before any external call goes out, so a crash mid-batch leaves a
//! visible, resumable marker instead of a silent retry duplicate.

use sitepulse_core::{ConfiguredRow, ItemStatus, WorkItem};

/// Result of one batch selection pass
#[derive(Debug, Default)]
pub struct BatchSelection {
    /// Work items selected for this round, at most `max_size`
    pub items: Vec<WorkItem>,
    /// Row ids whose status changed to `InFlight` during selection
    pub marked_rows: Vec<usize>,
}

/// Reset every row for a fresh run: eligible rows go to `Queued`,
/// everything else to `Idle`; notes are cleared either way.
pub fn init_statuses(rows: &mut [ConfiguredRow]) {
    for row in rows.iter_mut() {
        row.note = None;
        row.status = if row.eligible() {
            ItemStatus::Queued
        } else {
            ItemStatus::Idle
        };
    }
}

/// Select the next batch of at most `max_size` work items.
///
/// Rows are scanned in stable configuration order. Ineligible and
/// non-`Queued` rows are skipped without consuming capacity, so re-running
/// on the same snapshot after a partial failure continues from the first
/// remaining `Queued` row. A row is marked `InFlight` the moment it is
/// selected. A row whose device variants do not all fit into the
/// remaining capacity stays `Queued` and ends the pass, keeping the
/// batch-size cap strict; a row whose variants exceed the cap outright
/// could never be selected and is marked and skipped instead.
pub fn select_batch(rows: &mut [ConfiguredRow], max_size: usize) -> BatchSelection {
    let mut selection = BatchSelection::default();

    for row in rows.iter_mut() {
        if selection.items.len() >= max_size {
            break;
        }
        if row.status != ItemStatus::Queued || !row.eligible() {
            continue;
        }

        let variants = WorkItem::expand(row);
        if variants.is_empty() {
            // Device string matched neither mobile nor desktop: a
            // caller-configuration defect, not a scheduler fault.
            tracing::debug!(row_id = row.id, devices = %row.devices, "no recognized device, skipping row");
            row.status = ItemStatus::InFlight;
            selection.marked_rows.push(row.id);
            continue;
        }
        if variants.len() > max_size {
            // The variants can never fit any batch at this cap: a
            // caller-configuration defect, same handling as above so the
            // row cannot wedge the run at Queued forever.
            tracing::warn!(
                row_id = row.id,
                devices = %row.devices,
                max_size,
                "device variants exceed the batch size, skipping row"
            );
            row.status = ItemStatus::InFlight;
            selection.marked_rows.push(row.id);
            continue;
        }
        if variants.len() > max_size - selection.items.len() {
            break;
        }

        row.status = ItemStatus::InFlight;
        selection.marked_rows.push(row.id);
        selection.items.extend(variants);
    }

    selection
}

/// Whether any row is still waiting for a batch slot
pub fn has_queued_rows(rows: &[ConfiguredRow]) -> bool {
    rows.iter().any(|row| row.status == ItemStatus::Queued)
}
