use proptest::prelude::*;
use std::sync::Arc;
use wavestorm::aggregate::AggregateCounter;
use wavestorm::request::decode_escapes;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: N concurrent failures on a fresh wave always count to N
    #[test]
    fn concurrent_failures_are_never_lost(n in 0usize..2_000, prior in 0u64..50) {
        let counter = Arc::new(AggregateCounter::new());
        for _ in 0..prior {
            counter.record_failure();
        }
        counter.reset();
        prop_assert_eq!(counter.snapshot(), 0);

        let ticket = counter.ticket();
        tokio_test::block_on(async {
            let handles: Vec<_> = (0..n)
                .map(|_| {
                    let ticket = ticket.clone();
                    tokio::task::spawn_blocking(move || ticket.record_failure())
                })
                .collect();
            for handle in handles {
                handle.await.unwrap();
            }
        });

        prop_assert_eq!(counter.snapshot(), n as u64);
    }

    /// Property: text without backslashes is sent exactly as typed
    #[test]
    fn plain_payloads_are_untouched(text in "[^\\\\]*") {
        let decoded = decode_escapes(&text).unwrap();
        prop_assert_eq!(&decoded[..], text.as_bytes());
    }

    /// Property: every byte survives the \xNN notation
    #[test]
    fn hex_escapes_cover_all_bytes(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let escaped: String = bytes.iter().map(|b| format!("\\x{b:02x}")).collect();
        let decoded = decode_escapes(&escaped).unwrap();
        prop_assert_eq!(&decoded[..], &bytes[..]);
    }
}
