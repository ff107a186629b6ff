//! Engine, dashboard, lights, doors and trip computer.

use crate::error::DecodeError;
use crate::messages;
use crate::record::{SignalRecord, Value};
use crate::units::{
    CENTI, DECI, HALF, Scale, TEMP_HALF_OFFSET_40, TEMP_OFFSET_40, bit, label_or_hex, text,
    u16_be, u24_be,
};

type DecodeResult = Result<SignalRecord, DecodeError>;

const RPM: Scale = Scale::new(1, 8, 0, 1);

pub fn vin(data: &[u8]) -> DecodeResult {
    Ok(SignalRecord::new().with("vin", Value::Text(text(&data[..17]))))
}

fn contact_key(raw: u32) -> Option<&'static str> {
    match raw {
        0x00 => Some("OFF"),
        0x01 => Some("ACC"),
        0x02 => Some("START"),
        0x03 => Some("ON"),
        _ => None,
    }
}

pub fn engine(data: &[u8]) -> DecodeResult {
    let mut r = SignalRecord::new();
    r.push(
        "dash_light",
        Value::label(if bit(data[0], 0x80) { "FULL" } else { "DIMMED" }),
    )
    .push("dash_actual_brightness", data[0] & 0x0F)
    .push(
        "contact_key_position",
        label_or_hex((data[1] & 0x03) as u32, contact_key),
    )
    .push("engine_running", bit(data[1], 0x04))
    .push("economy_mode", bit(data[1], 0x10))
    .push("in_reverse", bit(data[1], 0x20))
    .push("trailer_present", bit(data[1], 0x40))
    .push("coolant_temp", TEMP_OFFSET_40.apply_or_na(data[2] as u32, 0xFF))
    .push("odometer", DECI.apply(u24_be(data, 3)))
    .push("exterior_temp", TEMP_HALF_OFFSET_40.apply(data[6] as u32));
    Ok(r)
}

fn gear_selection(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0 => "P",
        1 => "R",
        2 => "N",
        3 => "D",
        4 => "4",
        5 => "3",
        6 => "2",
        7 => "1",
        _ => return None,
    })
}

fn gearbox_mode(raw: u32) -> Option<&'static str> {
    match raw {
        0 => Some("NORMAL"),
        1 => Some("SPORT"),
        2 => Some("SNOW"),
        _ => None,
    }
}

pub fn lights_status(data: &[u8]) -> DecodeResult {
    let mut r = SignalRecord::new();
    r.push("instrument_cluster_enabled", bit(data[0], 0x80))
        .push("speed_regulator_wheel", bit(data[0], 0x40))
        .push("warning_led", bit(data[0], 0x20))
        .push("diesel_glow_plugs", bit(data[0], 0x04))
        .push("door_open", bit(data[1], 0x01));

    // Service interval in units of 20 km; bit 7 set means overdue.
    let service = (u16_be(data, 2) & 0x7FFF) as i32 * 20;
    let service = if bit(data[2], 0x80) { -service } else { service };
    r.push("distance_to_service", service)
        .push(
            "gear_selection",
            label_or_hex(((data[4] >> 4) & 0x07) as u32, gear_selection),
        )
        .push("gearbox_mode", label_or_hex((data[4] & 0x03) as u32, gearbox_mode))
        .push("dipped_beam", bit(data[5], 0x80))
        .push("high_beam", bit(data[5], 0x40))
        .push("fog_lights_front", bit(data[5], 0x20))
        .push("fog_lights_rear", bit(data[5], 0x10))
        .push("indicator_right", bit(data[5], 0x08))
        .push("indicator_left", bit(data[5], 0x04))
        .push("oil_temp", TEMP_OFFSET_40.apply_or_na(data[6] as u32, 0xFF))
        .push(
            "fuel_level",
            if data[7] == 0xFF { None } else { Some(data[7]) },
        )
        .push("oil_level_raw", data[8]);

    if data.len() == 14 {
        r.push(
            "lpg_fuel_level",
            if data[10] == 0xFF { None } else { Some(data[10]) },
        );
    }
    Ok(r)
}

fn word_or_na(data: &[u8], at: usize) -> Value {
    match u16_be(data, at) {
        0xFFFF => Value::NotApplicable,
        v => Value::from(v),
    }
}

pub fn car_status1(data: &[u8]) -> DecodeResult {
    // data[0] low nibble is a running sequence counter
    let mut r = SignalRecord::new();
    r.push("door_front_right", bit(data[7], 0x80))
        .push("door_front_left", bit(data[7], 0x40))
        .push("door_rear_right", bit(data[7], 0x20))
        .push("door_rear_left", bit(data[7], 0x10))
        .push("boot", bit(data[7], 0x08))
        .push("right_stalk_button", bit(data[10], 0x01))
        .push(
            "trip_1_avg_speed",
            if data[11] == 0xFF { None } else { Some(data[11]) },
        )
        .push(
            "trip_2_avg_speed",
            if data[12] == 0xFF { None } else { Some(data[12]) },
        )
        .push("trip_1_distance", word_or_na(data, 14))
        .push(
            "trip_1_avg_fuel_consumption",
            DECI.apply_or_na(u16_be(data, 16) as u32, 0xFFFF),
        )
        .push("trip_2_distance", word_or_na(data, 18))
        .push(
            "trip_2_avg_fuel_consumption",
            DECI.apply_or_na(u16_be(data, 20) as u32, 0xFFFF),
        )
        .push(
            "inst_fuel_consumption",
            DECI.apply_or_na(u16_be(data, 22) as u32, 0xFFFF),
        )
        .push("distance_to_empty", word_or_na(data, 24));
    Ok(r)
}

/// Index of the byte that selects the message on screen.
const DISPLAYED_MESSAGE_BYTE: usize = 9;

pub fn car_status2(data: &[u8]) -> DecodeResult {
    let mut alarms = Vec::new();
    for (byte_index, &byte) in data.iter().enumerate() {
        if byte_index == DISPLAYED_MESSAGE_BYTE {
            continue;
        }
        for bit_index in 0..8 {
            if byte & (1 << bit_index) == 0 {
                continue;
            }
            let index = (byte_index * 8 + bit_index) as u8;
            alarms.push(label_or_hex(index as u32, |i| messages::message(i as u8)));
        }
    }

    let displayed = match data[DISPLAYED_MESSAGE_BYTE] {
        0xFF => Value::NotApplicable,
        index => label_or_hex(index as u32, |i| messages::message(i as u8)),
    };

    Ok(SignalRecord::new()
        .with("alarm_list", Value::List(alarms))
        .with("message_displayed", displayed))
}

pub fn dashboard(data: &[u8]) -> DecodeResult {
    Ok(SignalRecord::new()
        .with("engine_rpm", RPM.apply_or_na(u16_be(data, 0) as u32, 0xFFFF))
        .with(
            "vehicle_speed",
            CENTI.apply_or_na(u16_be(data, 2) as u32, 0xFFFF),
        ))
}

pub fn dashboard_buttons(data: &[u8]) -> DecodeResult {
    Ok(SignalRecord::new()
        .with("hazard_lights", bit(data[0], 0x02))
        .with("door_lock", bit(data[0], 0x04))
        .with("dashboard_programmed_brightness", data[2] & 0x0F)
        .with("esp_deactivated", bit(data[2], 0x40))
        .with(
            "fuel_level_filtered",
            HALF.apply_or_na(data[4] as u32, 0xFF),
        )
        .with("fuel_level_raw", HALF.apply_or_na(data[5] as u32, 0xFF)))
}

pub fn time(data: &[u8]) -> DecodeResult {
    Ok(SignalRecord::new()
        .with("battery_uptime_days", u16_be(data, 0))
        .with("battery_uptime_hours", data[2])
        .with("battery_uptime_minutes", data[3]))
}

pub fn wheel_speed(data: &[u8]) -> DecodeResult {
    Ok(SignalRecord::new()
        .with(
            "rear_right_speed",
            CENTI.apply_or_na(u16_be(data, 0) as u32, 0xFFFF),
        )
        .with(
            "rear_left_speed",
            CENTI.apply_or_na(u16_be(data, 2) as u32, 0xFFFF),
        )
        .with("pulse_counter", data[4]))
}

pub fn odometer(data: &[u8]) -> DecodeResult {
    Ok(SignalRecord::new().with("odometer", DECI.apply(u24_be(data, 1))))
}

pub fn com2000(data: &[u8]) -> DecodeResult {
    Ok(SignalRecord::new()
        .with("side_lights", bit(data[1], 0x80))
        .with("dipped_beam", bit(data[1], 0x40))
        .with("high_beam", bit(data[1], 0x20))
        .with("fog_lights_front", bit(data[1], 0x10))
        .with("fog_lights_rear", bit(data[1], 0x08))
        .with("indicator_right", bit(data[1], 0x04))
        .with("indicator_left", bit(data[1], 0x02))
        .with("headlight_flash", bit(data[2], 0x08))
        .with("rear_window_wash", bit(data[3], 0x80))
        .with("rear_wiper", bit(data[3], 0x40))
        .with("front_wash", bit(data[3], 0x08))
        .with("front_wiper_auto", bit(data[3], 0x04))
        .with("trip_button", bit(data[6], 0x01)))
}
