//! Raw sample stream tests.

use std::io::Cursor;

use rsp_inspect::samples::{Channels, SampleFrame, SampleReader, SampleStats};
use rsp_inspect::DecodeError;

fn le_frames(values: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for value in values {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

#[test]
fn single_channel_frames_decode() {
    let bytes = le_frames(&[100, -200, 300, -400]);
    let mut reader = SampleReader::new(Cursor::new(bytes), Channels::Single);

    assert_eq!(
        reader.next_frame().unwrap(),
        Some(SampleFrame::Single { i: 100, q: -200 })
    );
    assert_eq!(
        reader.next_frame().unwrap(),
        Some(SampleFrame::Single { i: 300, q: -400 })
    );
    assert_eq!(reader.next_frame().unwrap(), None);
}

#[test]
fn dual_channel_frames_decode() {
    let bytes = le_frames(&[1, -2, 3, -4, 5, -6, 7, -8]);
    let mut reader = SampleReader::new(Cursor::new(bytes), Channels::Dual);

    assert_eq!(
        reader.next_frame().unwrap(),
        Some(SampleFrame::Dual {
            i_a: 1,
            q_a: -2,
            i_b: 3,
            q_b: -4,
        })
    );
    assert_eq!(
        reader.next_frame().unwrap(),
        Some(SampleFrame::Dual {
            i_a: 5,
            q_a: -6,
            i_b: 7,
            q_b: -8,
        })
    );
    assert_eq!(reader.next_frame().unwrap(), None);
}

#[test]
fn trailing_partial_frame_is_a_truncation() {
    let mut bytes = le_frames(&[100, -200]);
    bytes.extend_from_slice(&[0xAB, 0xCD]);
    let mut reader = SampleReader::new(Cursor::new(bytes), Channels::Single);

    assert!(reader.next_frame().unwrap().is_some());
    match reader.next_frame() {
        Err(DecodeError::TruncatedRecord { expected, got }) => {
            assert_eq!(expected, 4);
            assert_eq!(got, 2);
        }
        other => panic!("expected TruncatedRecord, got {:?}", other),
    }
}

#[test]
fn stats_fold_a_whole_stream() {
    let bytes = le_frames(&[0, 0, 1000, -1000, -32768, 32767]);
    let mut reader = SampleReader::new(Cursor::new(bytes), Channels::Single);
    let mut stats = SampleStats::new(Channels::Single);

    while let Some(frame) = reader.next_frame().unwrap() {
        stats.update(&frame);
    }

    assert_eq!(stats.frames, 3);
    assert_eq!(stats.a.i_min, -32768);
    assert_eq!(stats.a.i_max, 1000);
    assert_eq!(stats.a.q_min, -1000);
    assert_eq!(stats.a.q_max, 32767);
    assert!(stats.b.is_none());
}

#[test]
fn empty_stream_keeps_the_initial_ranges() {
    let mut reader = SampleReader::new(Cursor::new(Vec::new()), Channels::Single);
    let mut stats = SampleStats::new(Channels::Single);

    while let Some(frame) = reader.next_frame().unwrap() {
        stats.update(&frame);
    }

    assert_eq!(stats.frames, 0);
    assert_eq!(stats.a.i_min, i16::MAX);
    assert_eq!(stats.a.i_max, i16::MIN);
}

#[test]
fn dual_stream_stats_cover_both_tuners() {
    let bytes = le_frames(&[10, -10, 500, -500, 20, -20, 600, -600]);
    let mut reader = SampleReader::new(Cursor::new(bytes), Channels::Dual);
    let mut stats = SampleStats::new(Channels::Dual);

    while let Some(frame) = reader.next_frame().unwrap() {
        stats.update(&frame);
    }

    assert_eq!(stats.frames, 2);
    assert_eq!(stats.a.i_min, 10);
    assert_eq!(stats.a.i_max, 20);
    assert_eq!(stats.a.q_min, -20);
    assert_eq!(stats.a.q_max, -10);
    let b = stats.b.unwrap();
    assert_eq!(b.i_min, 500);
    assert_eq!(b.i_max, 600);
    assert_eq!(b.q_min, -600);
    assert_eq!(b.q_max, -500);
}
