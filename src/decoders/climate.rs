use crate::error::DecodeError;
use crate::record::SignalRecord;
use crate::units::{Scale, TEMP_OFFSET_40, bit, u16_be};

/// Evaporator temperature in tenths above -40 °C.
const EVAPORATOR: Scale = Scale::new(1, 10, -40, 1);

pub fn aircon1(data: &[u8]) -> Result<SignalRecord, DecodeError> {
    Ok(SignalRecord::new()
        .with("rear_window_heater", bit(data[0], 0x80))
        .with("ac_icon", bit(data[0], 0x40))
        .with("recirculation", bit(data[0], 0x20))
        .with("requested_fan_speed", data[4] & 0x0F))
}

pub fn aircon2(data: &[u8]) -> Result<SignalRecord, DecodeError> {
    Ok(SignalRecord::new()
        .with("ac_enabled", bit(data[0], 0x80))
        .with("rear_window_heater", bit(data[0], 0x40))
        .with("ac_compressor", bit(data[0], 0x01))
        .with(
            "condenser_temp",
            TEMP_OFFSET_40.apply_or_na(data[1] as u32, 0xFF),
        )
        .with(
            "evaporator_temp",
            EVAPORATOR.apply_or_na(u16_be(data, 2) as u32, 0xFFFF),
        )
        .with("fan_speed", if data[4] == 0xFF { None } else { Some(data[4]) }))
}
