//! Severe-condition alert text.

use crate::types::CurrentConditions;

/// Alert message for severe current conditions, `None` otherwise.
/// Delivery (and whether alerts are enabled at all) is the caller's concern.
pub fn weather_alert(current: &CurrentConditions) -> Option<String> {
    if !current.condition.is_alertable() {
        return None;
    }
    Some(format!(
        "Weather Alert: {} in {}! Stay safe.",
        current.condition.label(),
        current.place
    ))
}
