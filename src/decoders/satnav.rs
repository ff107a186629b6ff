//! Navigation computer frames, including the list dialogue it holds with the
//! multi-function display.

use std::borrow::Cow;

use super::{SubFormat, dispatch};
use crate::error::DecodeError;
use crate::iden::SATNAV_GUIDANCE_IDEN;
use crate::reassembly::Report;
use crate::record::{Fixed, SignalRecord, Value};
use crate::units::{bit, label_or_hex, text, u16_be};

type DecodeResult = Result<SignalRecord, DecodeError>;

/// Compass directions come in 16 steps of 22.5°.
pub const DIRECTIONS: u8 = 16;

/// Direction index as an attribute update rotating a display element, in
/// tenths of a degree.
fn rotation(direction: u8) -> Value {
    if direction >= DIRECTIONS {
        return Value::NotApplicable;
    }
    Value::Attributes(vec![(
        "rotation",
        Value::Fixed(Fixed::new(direction as i64 * 225, 1)),
    )])
}

const STATUS_1_FLAGS: [(u16, &str); 8] = [
    (0x0001, "ARRIVED_AT_DESTINATION"),
    (0x0002, "DESTINATION_NOT_ACCESSIBLE"),
    (0x0010, "NEW_GUIDANCE_INSTRUCTION"),
    (0x0020, "READING_DISC"),
    (0x0040, "COMPUTING_ROUTE"),
    (0x0100, "AUDIO_MESSAGE_PENDING"),
    (0x0800, "STOPPING_GUIDANCE"),
    (0x4000, "GPS_SIGNAL_LOST"),
];

pub fn status1(data: &[u8]) -> DecodeResult {
    let word = u16_be(data, 1);
    let mut flags: Vec<Value> = STATUS_1_FLAGS
        .iter()
        .filter(|&&(mask, _)| word & mask != 0)
        .map(|&(_, name)| Value::label(name))
        .collect();
    let known = STATUS_1_FLAGS.iter().fold(0u16, |acc, &(mask, _)| acc | mask);
    let unknown = word & !known;
    if unknown != 0 {
        flags.push(Value::Label(Cow::Owned(format!("0x{unknown:04X}"))));
    }
    Ok(SignalRecord::new()
        .with("status", Value::List(flags))
        .with("disc_present", bit(data[5], 0x01)))
}

fn satnav_state(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0x0 => "INITIALIZING",
        0x1 => "IDLE",
        0x5 => "IN_GUIDANCE_MODE",
        _ => return None,
    })
}

fn disc_status(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0x0 => "NO_DISC",
        0x1 => "DISC_READING",
        0x3 => "DISC_PRESENT",
        0x7 => "DISC_UNREADABLE",
        _ => return None,
    })
}

fn language(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0x00 => "FRENCH",
        0x01 => "ENGLISH",
        0x02 => "GERMAN",
        0x03 => "SPANISH",
        0x04 => "ITALIAN",
        0x06 => "DUTCH",
        _ => return None,
    })
}

pub fn status2(data: &[u8]) -> DecodeResult {
    Ok(SignalRecord::new()
        .with("state", label_or_hex((data[1] & 0x0F) as u32, satnav_state))
        .with(
            "disc_status",
            label_or_hex(((data[2] >> 4) & 0x07) as u32, disc_status),
        )
        .with("gps_fix", bit(data[4], 0x01))
        .with("gps_fix_lost", bit(data[4], 0x02))
        .with("gps_speed", if data[7] == 0xFF { None } else { Some(data[7]) })
        .with("language", label_or_hex((data[17] & 0x0F) as u32, language)))
}

fn status3_label(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0x0001 => "COMPUTING_ROUTE",
        0x0080 => "GUIDANCE_STOPPED",
        0x0100 => "LIST_REQUEST_ACCEPTED",
        0x0300 => "LOADING_DISC",
        0x1000 => "ROUTE_RECALCULATED",
        0x4000 => "DESTINATION_REACHED",
        _ => return None,
    })
}

pub fn status3(data: &[u8]) -> DecodeResult {
    if data.len() == 17 {
        return Ok(SignalRecord::new().with("software_id", Value::Text(text(&data[1..]))));
    }
    let mut r = SignalRecord::new();
    r.push("status", label_or_hex(u16_be(data, 0) as u32, status3_label));
    if data.len() == 3 {
        r.push("parameter", data[2]);
    }
    Ok(r)
}

/// Distance with the unit in bit 15: set for kilometres, clear for metres.
fn distance(r: &mut SignalRecord, name: &'static str, unit_name: &'static str, raw: u16) {
    if raw == 0xFFFF {
        r.push(name, Value::NotApplicable);
        return;
    }
    r.push(name, raw & 0x7FFF).push(
        unit_name,
        Value::label(if raw & 0x8000 != 0 { "km" } else { "m" }),
    );
}

pub fn guidance_data(data: &[u8]) -> DecodeResult {
    let mut r = SignalRecord::new();
    r.push("current_heading", rotation(data[1]))
        .push("heading_to_destination", rotation(data[2]));
    distance(
        &mut r,
        "distance_to_destination",
        "distance_to_destination_unit",
        u16_be(data, 3),
    );
    distance(
        &mut r,
        "distance_to_destination_straight_line",
        "distance_to_destination_straight_line_unit",
        u16_be(data, 5),
    );
    distance(&mut r, "turn_at", "turn_at_unit", u16_be(data, 7));
    r.push("heading_on_roundabout", rotation(data[9]))
        .push(
            "minutes_to_travel",
            match u16_be(data, 11) {
                0xFFFF => None,
                v => Some(v),
            },
        );
    Ok(r)
}

/// Length of one junction descriptor inside a guidance instruction.
const TURN_LEN: usize = 8;

/// Junction descriptor: flags, turn direction, then the 16-bit masks of open
/// legs and no-entry legs, one bit per direction step.
fn junction(d: &[u8]) -> Value {
    Value::Attributes(vec![
        ("roundabout", Value::Bool(bit(d[0], 0x01))),
        ("fork", Value::Bool(bit(d[0], 0x02))),
        ("turn_angle", rotation(d[1] & 0x0F)),
        ("legs", Value::from(u16_be(d, 2))),
        ("no_entry", Value::from(u16_be(d, 4))),
    ])
}

fn instruction(name: &'static str) -> SignalRecord {
    SignalRecord::new().with("instruction", Value::label(name))
}

fn single_turn(data: &[u8]) -> DecodeResult {
    Ok(instruction("SINGLE_TURN").with("current_turn", junction(&data[5..5 + TURN_LEN])))
}

fn double_turn(data: &[u8]) -> DecodeResult {
    Ok(instruction("DOUBLE_TURN")
        .with("current_turn", junction(&data[7..7 + TURN_LEN]))
        .with("next_turn", junction(&data[15..15 + TURN_LEN])))
}

fn follow_road_kind(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0x01 => "FOLLOW_ROAD_NEXT_INFO",
        0x02 => "TURN_RIGHT",
        0x04 => "TURN_LEFT",
        0x08 => "RETRIEVING_NEXT_INSTRUCTION",
        0x10 => "DESTINATION_REACHED",
        _ => return None,
    })
}

fn follow_road(data: &[u8]) -> DecodeResult {
    Ok(instruction("FOLLOW_ROAD").with("detail", label_or_hex(data[2] as u32, follow_road_kind)))
}

fn not_on_map(data: &[u8]) -> DecodeResult {
    Ok(instruction("NOT_ON_MAP").with("direction", rotation(data[2])))
}

const GUIDANCE_FORMATS: &[SubFormat] = &[
    SubFormat {
        tag: 0x01,
        lengths: &[13],
        decode: single_turn,
    },
    SubFormat {
        tag: 0x02,
        lengths: &[23],
        decode: double_turn,
    },
    SubFormat {
        tag: 0x03,
        lengths: &[3],
        decode: |_| Ok(instruction("TURN_AROUND_IF_POSSIBLE")),
    },
    SubFormat {
        tag: 0x04,
        lengths: &[6],
        decode: follow_road,
    },
    SubFormat {
        tag: 0x05,
        lengths: &[4],
        decode: not_on_map,
    },
];

/// Branches on the instruction type in byte 1.
pub fn guidance(data: &[u8]) -> DecodeResult {
    dispatch(SATNAV_GUIDANCE_IDEN, data[1], data, GUIDANCE_FORMATS)
}

/// List and entry dialogues; shared by requests, responses and reports.
pub(crate) fn dialogue(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0x02 => "CURRENT_STREET",
        0x03 => "NEXT_STREET",
        0x06 => "LAST_DESTINATION",
        0x08 => "ENTER_COUNTRY",
        0x09 => "ENTER_PROVINCE",
        0x0A => "ENTER_CITY",
        0x0B => "ENTER_DISTRICT",
        0x0C => "ENTER_NETWORK",
        0x0D => "ENTER_STREET",
        0x0E => "ENTER_HOUSE_NUMBER",
        0x0F => "ENTER_HOUSE_NUMBER_LETTER",
        0x10 => "PLACE_OF_INTEREST_CATEGORY_LIST",
        0x11 => "PLACE_OF_INTEREST_LIST",
        0x12 => "PLACE_OF_INTEREST_ADDRESS",
        0x1B => "PERSONAL_ADDRESS",
        0x1C => "PROFESSIONAL_ADDRESS",
        0x1D => "PERSONAL_ADDRESS_LIST",
        0x1E => "PROFESSIONAL_ADDRESS_LIST",
        0x1F => "SOFTWARE_MODULE_LIST",
        0x20 => "DESTINATION",
        _ => return None,
    })
}

/// Characters selectable in the on-screen keyboard, in bitmask order.
const CHARSET: &[u8; 40] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 '-.";

fn available_characters(mask: &[u8]) -> String {
    CHARSET
        .iter()
        .enumerate()
        .filter(|&(i, _)| mask[i / 8] & (0x80 >> (i % 8)) != 0)
        .map(|(_, &c)| c as char)
        .collect()
}

pub fn satnav_to_mfd(data: &[u8]) -> DecodeResult {
    let list_size = match u16_be(data, 4) {
        0xFFFF => None,
        v => Some(v),
    };
    Ok(SignalRecord::new()
        .with("response_to", label_or_hex(data[1] as u32, dialogue))
        .with("list_size", list_size)
        .with(
            "available_characters",
            Value::Text(available_characters(&data[19..27])),
        ))
}

fn request_type(raw: u32) -> Option<&'static str> {
    Some(match raw {
        0x0 => "REQ_N_ITEMS",
        0x1 => "REQ_ITEMS",
        0x2 => "SELECT",
        0x3 => "SELECT_BY_LETTER",
        _ => return None,
    })
}

pub fn mfd_to_satnav(data: &[u8]) -> DecodeResult {
    let mut r = SignalRecord::new();
    r.push("request", label_or_hex(data[0] as u32, dialogue))
        .push("parameter", data[1])
        .push("type", label_or_hex(data[2] as u32, request_type));
    match data.len() {
        4 => {
            let c = data[3];
            r.push(
                "character",
                if c.is_ascii_graphic() || c == b' ' {
                    Value::Text((c as char).to_string())
                } else {
                    Value::NotApplicable
                },
            );
        }
        _ => {
            r.push("offset", u16_be(data, 5)).push("length", u16_be(data, 7));
            if data.len() == 11 {
                r.push("selection", u16_be(data, 9));
            }
        }
    }
    Ok(r)
}

/// Decode a completed multi-frame report into its records.
pub fn report(report: &Report) -> SignalRecord {
    let report_type = match report.report_type {
        Some(t) => label_or_hex(t as u32, dialogue),
        None => Value::NotApplicable,
    };
    let records = report
        .records
        .iter()
        .map(|entries| Value::List(entries.iter().cloned().map(Value::Text).collect()))
        .collect();
    SignalRecord::new()
        .with("report", report_type)
        .with("records", Value::List(records))
        .with("possible_missed_fragment", report.gap)
        .with("truncated", report.truncated)
}
