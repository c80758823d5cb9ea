// tests/property/line_codec_test.rs

//! Line framing must not depend on how the bytes were split across reads.

use bytes::BytesMut;
use proptest::prelude::*;
use tokio_util::codec::Decoder;
use tunecast::core::protocol::LineCodec;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_chunking_does_not_change_lines(
        lines in prop::collection::vec("[^\r\n]{0,40}", 1..10),
        cuts in prop::collection::vec(1usize..16, 1..64),
    ) {
        let wire: Vec<u8> = lines
            .iter()
            .flat_map(|line| format!("{line}\r\n").into_bytes())
            .collect();

        let mut codec = LineCodec::new(1024);
        let mut buf = BytesMut::new();
        let mut decoded = Vec::new();
        let mut offset = 0;
        let mut cut = cuts.iter().cycle();
        while offset < wire.len() {
            let end = (offset + cut.next().copied().unwrap_or(1)).min(wire.len());
            buf.extend_from_slice(&wire[offset..end]);
            offset = end;
            while let Some(line) = codec.decode(&mut buf).unwrap() {
                decoded.push(line);
            }
        }

        prop_assert_eq!(decoded, lines);
        prop_assert!(buf.is_empty());
    }
}
