use vanbus::iden::{AIRCON2_IDEN, ENGINE_IDEN, SATNAV_REPORT_IDEN, VIN_IDEN};
use vanbus::reassembly::LAST_FRAGMENT;
use vanbus::registry::{DecodeKind, REGISTRY};
use vanbus::{DecodeOutcome, Decoded, Value, VanDecoder, VanFrame};

fn frame(iden: u16, data: &str) -> VanFrame {
    VanFrame::new(iden, &hex::decode(data).unwrap(), true).unwrap()
}

fn decode(d: &mut VanDecoder, iden: u16, data: &str) -> Decoded {
    d.decode(&frame(iden, data))
}

#[test]
fn checksum_failure_always_wins() {
    let mut d = VanDecoder::new();
    for desc in REGISTRY {
        for len in [0, 7, 28] {
            let f = VanFrame::new(desc.iden, &vec![0xA5; len], false).unwrap();
            let out = d.decode(&f);
            assert_eq!(out.outcome, DecodeOutcome::ChecksumError, "{}", desc.label);
            assert!(out.record.is_none());
        }
    }
    assert_eq!(d.stats().checksum_error, REGISTRY.len() as u64 * 3);
}

#[test]
fn rejected_lengths_never_decode() {
    let mut d = VanDecoder::new();
    for desc in REGISTRY {
        for len in (0..=28).filter(|&l| !desc.lengths.accepts(l)) {
            let f = VanFrame::new(desc.iden, &vec![0; len], true).unwrap();
            let out = d.decode(&f);
            assert_eq!(
                out.outcome,
                DecodeOutcome::UnexpectedLength,
                "{} with {len} bytes",
                desc.label
            );
            assert!(out.record.is_none());
        }
    }
}

#[test]
fn every_field_decoder_survives_accepted_lengths() {
    // All-zero and all-ones payloads of every accepted length must classify
    // without panicking.
    for desc in REGISTRY {
        if !matches!(desc.kind, DecodeKind::Fields(_)) {
            continue;
        }
        for len in (0..=28).filter(|&l| desc.lengths.accepts(l)) {
            for fill in [0x00, 0xFF] {
                let mut d = VanDecoder::new();
                let f = VanFrame::new(desc.iden, &vec![fill; len], true).unwrap();
                let out = d.decode(&f);
                assert_ne!(out.outcome, DecodeOutcome::ChecksumError);
                assert_ne!(out.outcome, DecodeOutcome::UnrecognizedIdentifier);
                assert_eq!(out.record.is_some(), out.outcome == DecodeOutcome::Ok);
            }
        }
    }
}

#[test]
fn repeat_is_duplicate() {
    let mut d = VanDecoder::new();
    let vin = hex::encode(b"VF3ABCDEF12345678");
    assert_eq!(decode(&mut d, VIN_IDEN, &vin).outcome, DecodeOutcome::Ok);
    assert_eq!(decode(&mut d, VIN_IDEN, &vin).outcome, DecodeOutcome::Duplicate);
}

#[test]
fn toggling_payloads_settle_to_duplicates() {
    for iden in [ENGINE_IDEN, AIRCON2_IDEN] {
        let mut d = VanDecoder::new();
        let (a, b) = ("8707FF001000A0", "8707FF001000A1");
        let outcomes: Vec<_> = [a, b, a, b]
            .iter()
            .map(|p| decode(&mut d, iden, p).outcome)
            .collect();
        assert_eq!(
            outcomes,
            [
                DecodeOutcome::Ok,
                DecodeOutcome::Ok,
                DecodeOutcome::Duplicate,
                DecodeOutcome::Duplicate
            ],
            "{iden:03X}"
        );
    }
}

#[test]
fn decoders_do_not_share_history() {
    let mut a = VanDecoder::new();
    let mut b = VanDecoder::new();
    let p = "8707FF001000A0";
    assert!(decode(&mut a, ENGINE_IDEN, p).is_ok());
    assert!(decode(&mut b, ENGINE_IDEN, p).is_ok());
}

#[test]
fn coolant_offset_and_sentinel() {
    let mut d = VanDecoder::new();
    let out = decode(&mut d, ENGINE_IDEN, "87077A001000A0");
    let r = out.record.unwrap();
    assert_eq!(r.get("coolant_temp").unwrap().to_string(), "82");

    let out = decode(&mut d, ENGINE_IDEN, "8707FF001000A0");
    let r = out.record.unwrap();
    assert_eq!(r.get("coolant_temp"), Some(&Value::NotApplicable));
}

#[test]
fn engine_status_bits() {
    let mut d = VanDecoder::new();
    let r = decode(&mut d, ENGINE_IDEN, "87077A0186A07E").record.unwrap();
    assert_eq!(r.get("dash_light"), Some(&Value::label("FULL")));
    assert_eq!(r.get("dash_actual_brightness"), Some(&Value::Int(7)));
    assert_eq!(r.get("contact_key_position"), Some(&Value::label("ON")));
    assert_eq!(r.get("engine_running"), Some(&Value::Bool(true)));
    // 0x0186A0 = 100000 tenths
    assert_eq!(r.get("odometer").unwrap().to_string(), "10000.0");
    // 0x7E / 2 - 40
    assert_eq!(r.get("exterior_temp").unwrap().to_string(), "23.0");

    let r = decode(&mut d, ENGINE_IDEN, "07037A0186A07E").record.unwrap();
    assert_eq!(r.get("dash_light"), Some(&Value::label("DIMMED")));
    assert_eq!(r.get("engine_running"), Some(&Value::Bool(false)));
}

#[test]
fn unknown_identifier_yields_nothing() {
    let mut d = VanDecoder::new();
    let out = decode(&mut d, 0x5A0, "0102");
    assert_eq!(out.outcome, DecodeOutcome::UnrecognizedIdentifier);
    assert_eq!(out.label, None);
    assert_eq!(out.name(), "5A0");
    assert!(out.record.is_none());
}

const ADDRESS_LIST: &[u8] =
    b"HOME\0RUE DE LA PAIX\0PARIS\0\x01WORK\0AVENUE FOCH\0\x01GARAGE\0\0LYON\0\x01";

fn report_frames(text: &[u8], chunk: usize) -> Vec<VanFrame> {
    let chunks: Vec<&[u8]> = text.chunks(chunk).collect();
    let last = chunks.len() - 1;
    chunks
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let mut seq = i as u8;
            if i == last {
                seq |= LAST_FRAGMENT;
            }
            let mut payload = vec![seq];
            if i == 0 {
                payload.push(0x1D);
            }
            payload.extend_from_slice(c);
            VanFrame::new(SATNAV_REPORT_IDEN, &payload, true).unwrap()
        })
        .collect()
}

fn assemble(frames: &[VanFrame]) -> Value {
    let mut d = VanDecoder::new();
    let mut records = None;
    for f in frames {
        let out = d.decode(f);
        assert_eq!(out.outcome, DecodeOutcome::Ok);
        if let Some(r) = out.record {
            assert!(records.is_none(), "report completed twice");
            assert_eq!(r.get("report"), Some(&Value::label("PERSONAL_ADDRESS_LIST")));
            assert_eq!(r.get("possible_missed_fragment"), Some(&Value::Bool(false)));
            records = r.get("records").cloned();
        }
    }
    records.unwrap()
}

#[test]
fn report_is_independent_of_frame_boundaries() {
    let reference = assemble(&report_frames(ADDRESS_LIST, 26));
    let text = |s: &str| Value::Text(s.to_string());
    assert_eq!(
        reference,
        Value::List(vec![
            Value::List(vec![text("HOME"), text("RUE DE LA PAIX"), text("PARIS")]),
            Value::List(vec![text("WORK"), text("AVENUE FOCH")]),
            Value::List(vec![text("GARAGE"), text(""), text("LYON")]),
        ])
    );
    for chunk in 1..26 {
        assert_eq!(
            assemble(&report_frames(ADDRESS_LIST, chunk)),
            reference,
            "chunk {chunk}"
        );
    }
}

#[cfg(feature = "serde")]
#[test]
fn display_event_json() {
    let mut d = VanDecoder::new();
    let out = decode(&mut d, ENGINE_IDEN, "87077A0186A07E");
    let json = vanbus::emit::render_event(&out.name(), out.record.as_ref().unwrap()).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["event"], "display");
    assert_eq!(v["iden"], "engine");
    assert_eq!(v["data"]["contact_key_position"], "ON");
    assert_eq!(v["data"]["engine_running"], true);
    assert_eq!(v["data"]["coolant_temp"], "82");
    assert_eq!(v["data"]["odometer"], "10000.0");
}
