//! Gain-log decoding tests.

use std::io::{Cursor, Seek, SeekFrom, Write};

use rsp_inspect::gains::{GainChangeEvent, GainLogReader};
use rsp_inspect::DecodeError;

fn log_bytes(events: &[GainChangeEvent]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for event in events {
        bytes.extend_from_slice(&event.to_bytes());
    }
    bytes
}

#[test]
fn reads_consecutive_records() {
    let events = [
        GainChangeEvent {
            sample_num: 0,
            current_gain: 42.0,
            tuner: 0,
            gain_reduction_db: 40,
            lna_gain_reduction_db: 0,
        },
        GainChangeEvent {
            sample_num: 2_000_000,
            current_gain: 39.5,
            tuner: 0,
            gain_reduction_db: 43,
            lna_gain_reduction_db: 19,
        },
        GainChangeEvent {
            sample_num: 4_294_967_296,
            current_gain: 38.25,
            tuner: 1,
            gain_reduction_db: 45,
            lna_gain_reduction_db: 24,
        },
    ];

    let mut reader = GainLogReader::new(Cursor::new(log_bytes(&events)));
    for expected in &events {
        assert_eq!(reader.next_event().unwrap().unwrap(), *expected);
    }
    assert!(reader.next_event().unwrap().is_none());
    // stays at the end on repeated calls
    assert!(reader.next_event().unwrap().is_none());
}

#[test]
fn empty_log_is_a_clean_end() {
    let mut reader = GainLogReader::new(Cursor::new(Vec::new()));
    assert!(reader.next_event().unwrap().is_none());
}

#[test]
fn trailing_partial_record_is_a_truncation() {
    let events = [
        GainChangeEvent {
            sample_num: 0,
            current_gain: 42.0,
            tuner: 0,
            gain_reduction_db: 40,
            lna_gain_reduction_db: 0,
        },
        GainChangeEvent {
            sample_num: 1_000_000,
            current_gain: 40.0,
            tuner: 0,
            gain_reduction_db: 42,
            lna_gain_reduction_db: 0,
        },
    ];
    let mut bytes = log_bytes(&events);
    bytes.push(0x7F);
    assert_eq!(bytes.len(), 33);

    let mut reader = GainLogReader::new(Cursor::new(bytes));
    assert!(reader.next_event().unwrap().is_some());
    assert!(reader.next_event().unwrap().is_some());
    match reader.next_event() {
        Err(DecodeError::TruncatedRecord { expected, got }) => {
            assert_eq!(expected, 16);
            assert_eq!(got, 1);
        }
        other => panic!("expected TruncatedRecord, got {:?}", other),
    }
}

#[test]
fn reads_from_a_real_file() {
    let event = GainChangeEvent {
        sample_num: 8_000_000,
        current_gain: 37.0,
        tuner: 0,
        gain_reduction_db: 44,
        lna_gain_reduction_db: 19,
    };

    let mut file = tempfile::tempfile().unwrap();
    file.write_all(&event.to_bytes()).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let mut reader = GainLogReader::new(file);
    assert_eq!(reader.next_event().unwrap().unwrap(), event);
    assert!(reader.next_event().unwrap().is_none());
}
