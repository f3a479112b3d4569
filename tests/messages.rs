#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;
    use todoledger::libs::messages::Message;
    use todoledger::{msg_debug, msg_error, msg_info, msg_success, msg_warning};

    /// Collects formatted events in memory.
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(level: tracing::Level, emit: impl FnOnce()) -> String {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || Captured(sink.clone()))
            .with_max_level(level)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, emit);

        let bytes = buffer.lock().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_macros_emit_at_matching_levels() {
        let output = capture(tracing::Level::DEBUG, || {
            msg_info!(Message::WalletConnecting);
            msg_success!(Message::WalletConnected("0xabc".into()));
            msg_warning!(Message::WalletBusy);
            msg_error!(Message::TodoContentEmpty);
            msg_debug!(Message::TodosRefreshed(2));
        });

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("INFO") && lines[0].contains(&Message::WalletConnecting.to_string()));
        assert!(lines[1].contains("INFO") && lines[1].contains("✅"));
        assert!(lines[2].contains("WARN") && lines[2].contains(&Message::WalletBusy.to_string()));
        assert!(lines[3].contains("ERROR") && lines[3].contains(&Message::TodoContentEmpty.to_string()));
        assert!(lines[4].contains("DEBUG") && lines[4].contains(&Message::TodosRefreshed(2).to_string()));
    }

    #[test]
    fn test_filtering_is_left_to_the_subscriber() {
        let output = capture(tracing::Level::WARN, || {
            msg_info!(Message::WalletConnecting);
            msg_debug!(Message::TodosRefreshed(2));
            msg_error!(Message::TransactionCancelled);
        });

        assert_eq!(output.lines().count(), 1);
        assert!(output.contains(&Message::TransactionCancelled.to_string()));
    }
}
