use std::io;
use std::sync::{Arc, Mutex};

use retrosheet::{FixedProbe, RetrosheetConfigBuilder};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn builder_emits_debug_events() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut builder = RetrosheetConfigBuilder::with_probe(&FixedProbe(false));
        builder.add_sheet("Players", ["Name", "Team"]).unwrap();
        assert!(builder.add_sheet("Broken", ["Name", ""]).is_err());
        builder.add_form("add_player", "https://forms.example/1").unwrap();
        assert!(builder.add_form("a/b", "https://x").is_err());
        builder.build();
    });

    let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    for message in [
        "registered sheet",
        "rejected sheet schema",
        "registered form",
        "rejected form endpoint",
        "built retrosheet config",
    ] {
        assert!(output.contains(message), "missing `{message}` in:\n{output}");
    }
}
