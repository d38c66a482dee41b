use transferwatch_core::record::{RowExtraction, TransferRecord};
use transferwatch_store::TransferStore;

/// Partition freshly extracted rows against the store, in extraction order.
///
/// Rows already present under the store's dedup key are discarded; the rest
/// are promoted with the unresolved sentinel and the given timestamp.
/// Nameless rows are dropped here: they cannot participate in name-keyed
/// deduplication and would be re-added every cycle.
pub fn detect_new(
    store: &TransferStore,
    rows: Vec<RowExtraction>,
    retrieved_at: &str,
) -> Vec<TransferRecord> {
    let mut new = Vec::new();

    for row in rows {
        if let Some(missing) = row.missing_fields().first() {
            log::debug!(
                "row for {:?} missing {} (and possibly more)",
                row.record.player,
                missing.as_str()
            );
        }

        let raw = row.record;
        if raw.player.is_none() {
            log::debug!("dropping nameless row");
            continue;
        }
        if store.contains_raw(&raw) {
            continue;
        }

        if let Some(record) = raw.promote(retrieved_at.to_string()) {
            new.push(record);
        }
    }

    new
}
