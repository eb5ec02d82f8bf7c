use crate::decode::DecodedState;
use crate::types::Event;

/// Events describing what changed between two decoded states. With no
/// previous state every populated field is reported.
pub(crate) fn diff_states(previous: Option<&DecodedState>, current: &DecodedState) -> Vec<Event> {
    let mut events = Vec::new();
    let changed = |f: &dyn Fn(&DecodedState) -> bool| previous.is_none_or(|p| f(p));

    if changed(&|p| p.current_temperature != current.current_temperature) {
        events.push(Event::TemperatureChanged {
            temp: current.current_temperature,
        });
    }
    if let Some(humidity) = current.humidity
        && changed(&|p| p.humidity != current.humidity)
    {
        events.push(Event::HumidityChanged { humidity });
    }
    if changed(&|p| p.hvac_mode != current.hvac_mode) {
        events.push(Event::HvacModeChanged {
            mode: current.hvac_mode,
        });
    }
    if changed(&|p| p.hvac_action != current.hvac_action) {
        events.push(Event::HvacActionChanged {
            action: current.hvac_action,
        });
    }
    if changed(&|p| p.target_temperature != current.target_temperature) {
        events.push(Event::TargetTemperatureChanged {
            temp: current.target_temperature,
        });
    }
    if changed(&|p| p.fan_mode != current.fan_mode || p.fan_action != current.fan_action) {
        events.push(Event::FanChanged {
            mode: current.fan_mode,
            action: current.fan_action,
        });
    }
    if let Some(preset) = current.preset_mode
        && changed(&|p| p.preset_mode != current.preset_mode)
    {
        events.push(Event::PresetChanged { preset });
    }
    if changed(&|p| p.hold_is_set != current.hold_is_set) {
        events.push(Event::HoldChanged {
            active: current.hold_is_set,
        });
    }

    events
}
