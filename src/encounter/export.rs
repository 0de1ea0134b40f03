//! Step event export for offline inspection: JSON for tooling, CSV for
//! spreadsheets.

use std::io;

use crate::encounter::model::Side;
use crate::encounter::sequencer::{StepEvent, StepKind};

/// Serialize a step event stream to a JSON array string.
pub fn serialize_steps_json(events: &[StepEvent]) -> Result<String, serde_json::Error> {
    serde_json::to_string(events)
}

/// Write one CSV row per step event: slot, side, kind, amount, running total,
/// description (empty when the step carried no annotation).
pub fn write_steps_csv<W: io::Write>(writer: W, events: &[StepEvent]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "slot_id",
        "side",
        "kind",
        "amount",
        "running_total",
        "description",
    ])?;
    for event in events {
        csv_writer.write_record([
            event.slot_id.as_str(),
            match event.side {
                Side::Player => "player",
                Side::Enemy => "enemy",
            },
            match event.kind {
                StepKind::Roll => "roll",
                StepKind::Bonus => "bonus",
            },
            &event.amount.to_string(),
            &event.running_total.to_string(),
            event.description.as_deref().unwrap_or(""),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}
