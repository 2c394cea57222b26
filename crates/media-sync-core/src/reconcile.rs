use media_sync_models::{Item, RemoteWrite, WriteOutcome};
use media_sync_sources::{CatalogError, CatalogWriter};
use tracing::{info, warn};

/// Writes needed to bring `destination` up to date with `source`, in issue order
///
/// 1. played on source, unplayed on destination: mark played
/// 2. positions differ and source was played more recently: copy the position
/// 3. favorite on source: set favorite (always, there is no un-favorite)
pub fn plan_writes(source: &Item, destination: &Item) -> Vec<RemoteWrite> {
    let src = &source.user_data;
    let dst = &destination.user_data;
    let mut writes = Vec::new();

    if src.played && !dst.played {
        writes.push(RemoteWrite::MarkPlayed {
            item_id: destination.id.clone(),
        });
    }

    if src.playback_position_ticks != dst.playback_position_ticks
        && src.last_played_or_epoch() > dst.last_played_or_epoch()
    {
        writes.push(RemoteWrite::SetPlaybackPosition {
            item_id: destination.id.clone(),
            ticks: src.playback_position_ticks,
        });
    }

    if src.is_favorite {
        writes.push(RemoteWrite::SetFavorite {
            item_id: destination.id.clone(),
        });
    }

    writes
}

/// Push `source`'s watch state onto `destination` through `writer`
///
/// Writes are issued one at a time in plan order. A failed write is logged and
/// reported in its outcome; the remaining writes are still attempted.
pub async fn reconcile(source: &Item, destination: &Item, writer: &dyn CatalogWriter) -> Vec<WriteOutcome> {
    let mut outcomes = Vec::new();

    for write in plan_writes(source, destination) {
        match issue(writer, &write).await {
            Ok(()) => {
                info!(
                    operation = write.operation(),
                    source_id = %source.id,
                    destination_id = %destination.id,
                    "Updated {} - {}",
                    write.operation(),
                    source.name
                );
                outcomes.push(WriteOutcome::applied(write));
            }
            Err(e) => {
                warn!(
                    operation = write.operation(),
                    source_id = %source.id,
                    destination_id = %destination.id,
                    status = "error",
                    error = %e,
                    "Failed to apply {} for {}",
                    write,
                    source.name
                );
                outcomes.push(WriteOutcome::failed(write, e.to_string()));
            }
        }
    }

    outcomes
}

async fn issue(writer: &dyn CatalogWriter, write: &RemoteWrite) -> Result<(), CatalogError> {
    match write {
        RemoteWrite::MarkPlayed { item_id } => writer.mark_played(item_id).await,
        RemoteWrite::SetPlaybackPosition { item_id, ticks } => {
            writer.set_playback_position(item_id, *ticks).await
        }
        RemoteWrite::SetFavorite { item_id } => writer.set_favorite(item_id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{episode, RecordingWriter};
    use chrono::{TimeZone, Utc};
    use media_sync_models::WriteStatus;

    fn at(hour: u32) -> Option<chrono::DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap())
    }

    #[test]
    fn test_played_propagates_only_to_unplayed() {
        let mut source = episode("a1", "Pilot");
        source.user_data.played = true;
        let destination = episode("b1", "Pilot");

        assert_eq!(
            plan_writes(&source, &destination),
            vec![RemoteWrite::MarkPlayed { item_id: "b1".to_string() }]
        );

        let mut already = destination.clone();
        already.user_data.played = true;
        assert!(plan_writes(&source, &already).is_empty());

        // Unplayed source never un-marks the destination
        assert!(plan_writes(&episode("a2", "Pilot"), &already).is_empty());
    }

    #[test]
    fn test_position_tie_break() {
        let mut source = episode("a1", "Pilot");
        source.user_data.playback_position_ticks = 9_000;
        source.user_data.last_played_date = at(12);
        let mut destination = episode("b1", "Pilot");
        destination.user_data.playback_position_ticks = 3_000;
        destination.user_data.last_played_date = at(12);

        assert!(plan_writes(&source, &destination).is_empty());

        source.user_data.last_played_date = at(13);
        assert_eq!(
            plan_writes(&source, &destination),
            vec![RemoteWrite::SetPlaybackPosition {
                item_id: "b1".to_string(),
                ticks: 9_000,
            }]
        );

        // Destination more recent
        destination.user_data.last_played_date = at(14);
        assert!(plan_writes(&source, &destination).is_empty());
    }

    #[test]
    fn test_position_missing_dates_are_epoch() {
        let mut source = episode("a1", "Pilot");
        source.user_data.playback_position_ticks = 500;
        let mut destination = episode("b1", "Pilot");

        // Both never played: equal epoch, no write
        assert!(plan_writes(&source, &destination).is_empty());

        source.user_data.last_played_date = at(1);
        assert_eq!(plan_writes(&source, &destination).len(), 1);

        // Same ticks never produce a write, whatever the dates
        destination.user_data.playback_position_ticks = 500;
        assert!(plan_writes(&source, &destination).is_empty());
    }

    #[test]
    fn test_all_checks_fire_in_order() {
        let mut source = episode("a1", "Pilot");
        source.user_data.played = true;
        source.user_data.playback_position_ticks = 0;
        source.user_data.is_favorite = true;
        source.user_data.last_played_date = at(20);
        let mut destination = episode("b1", "Pilot");
        destination.user_data.playback_position_ticks = 1_200;
        destination.user_data.last_played_date = at(8);

        assert_eq!(
            plan_writes(&source, &destination),
            vec![
                RemoteWrite::MarkPlayed { item_id: "b1".to_string() },
                RemoteWrite::SetPlaybackPosition { item_id: "b1".to_string(), ticks: 0 },
                RemoteWrite::SetFavorite { item_id: "b1".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn test_favorite_reissued_every_time() {
        let mut source = episode("a1", "Pilot");
        source.user_data.is_favorite = true;
        let mut destination = episode("b1", "Pilot");
        destination.user_data.is_favorite = true;
        let writer = RecordingWriter::new();

        reconcile(&source, &destination, &writer).await;
        reconcile(&source, &destination, &writer).await;

        assert_eq!(
            writer.recorded(),
            vec![
                RemoteWrite::SetFavorite { item_id: "b1".to_string() },
                RemoteWrite::SetFavorite { item_id: "b1".to_string() },
            ]
        );

        // Non-favorite source never touches a favorite destination
        let plain = episode("a2", "Pilot");
        assert!(reconcile(&plain, &destination, &writer).await.is_empty());
        assert_eq!(writer.recorded().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_write_does_not_stop_later_checks() {
        let mut source = episode("a1", "Pilot");
        source.user_data.played = true;
        source.user_data.is_favorite = true;
        let destination = episode("b1", "Pilot");
        let writer = RecordingWriter::failing(&["mark_played"]);

        let outcomes = reconcile(&source, &destination, &writer).await;

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0].status, WriteStatus::Failed { .. }));
        assert_eq!(outcomes[1], WriteOutcome::applied(RemoteWrite::SetFavorite { item_id: "b1".to_string() }));
        assert_eq!(writer.recorded().len(), 2);
    }
}
