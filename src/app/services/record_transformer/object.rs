//! Derived columns for object-based verification files
//!
//! Object files carry forecast lead and valid-time columns; the
//! initialization time is derived the same way as for statistics records and
//! appended as an extra column for the relational path.

use tracing::debug;

use crate::Result;
use crate::app::models::ObjectFileData;
use crate::constants::CURRENT_TS_FORMAT;

use super::current::lead_hours;
use super::dates::DateParser;

/// Append a derived `fcst_init` column from the lead and valid-time columns
///
/// Records whose lead or valid time fails to parse keep a null init time; the
/// file continues.
pub fn derive_object_init(data: &mut ObjectFileData, dates: &mut DateParser) -> Result<()> {
    let lead_index = data.columns.iter().position(|c| c == "fcst_lead");
    let valid_index = data.columns.iter().position(|c| c == "fcst_valid");

    let (Some(lead_index), Some(valid_index)) = (lead_index, valid_index) else {
        debug!("Object file lacks lead/valid columns, skipping init derivation");
        return Ok(());
    };
    if data.columns.iter().any(|c| c == "fcst_init") {
        return Ok(());
    }

    data.columns.push("fcst_init".to_string());
    for record in &mut data.records {
        let init = init_value(record.values.get(lead_index), record.values.get(valid_index), dates);
        record.values.push(init);
    }

    Ok(())
}

fn init_value(
    lead: Option<&Option<String>>,
    valid: Option<&Option<String>>,
    dates: &mut DateParser,
) -> Option<String> {
    let lead = lead?.as_deref()?.parse::<i64>().ok()?;
    let valid = dates.parse_current(valid?.as_deref()?).ok()?;
    let init = valid - chrono::Duration::hours(lead_hours(lead));
    Some(init.format(CURRENT_TS_FORMAT).to_string())
}
