#![no_main]
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use varstream::RecordFramer;

fuzz_target!(|data: &[u8]| {
    // First byte picks the buffer capacity so refill boundaries move around.
    let Some((&cap, stream)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(cap).max(1);
    let Ok(mut framer) = RecordFramer::with_capacity(Cursor::new(stream), capacity) else {
        return;
    };
    let _ = framer.process_all(|payload, span| {
        assert_eq!(span.len(), payload.len() as u64);
        assert_eq!(&stream[span.start as usize..span.end as usize], payload);
        Ok(())
    });
});
