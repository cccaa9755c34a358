use presence_core::error::Result;
use presence_core::models::labelled_weekdays;
use presence_core::settings::Command;
use presence_data::aggregator::PresenceAggregator;
use presence_runtime::data_manager::DataManager;
use serde_json::Value;

// ── Command dispatch ──────────────────────────────────────────────────────────

/// Run `command` against `mgr` and return its JSON document.
pub fn run(command: &Command, mgr: &DataManager) -> Result<Value> {
    let value = match *command {
        Command::Users => serde_json::to_value(mgr.users()?)?,
        Command::Raw { user_id } => serde_json::to_value(mgr.user_presence(user_id)?)?,
        Command::Weekday { user_id } => {
            let presence = mgr.user_presence(user_id)?;
            serde_json::to_value(labelled_weekdays(PresenceAggregator::group_by_weekday(
                &presence,
            )))?
        }
        Command::MeanWeekday { user_id } => {
            let presence = mgr.user_presence(user_id)?;
            serde_json::to_value(labelled_weekdays(PresenceAggregator::mean_by_weekday(
                &presence,
            )))?
        }
        Command::Months { user_id } => {
            let presence = mgr.user_presence(user_id)?;
            serde_json::to_value(PresenceAggregator::mean_by_month(&presence))?
        }
        Command::StartEnd { user_id } => {
            let presence = mgr.user_presence(user_id)?;
            serde_json::to_value(PresenceAggregator::mean_time_of_presence(&presence))?
        }
    };
    Ok(value)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
