mod tests {
    use myrtio_metar_composer::channel::{Channel, TryReceiveError, TrySendError, channel};
    use myrtio_metar_composer::config::Config;
    use myrtio_metar_composer::intent::{
        EngineIntent, INTENT_QUEUE_SIZE, IntentProcessor, intent_channel, request_reload,
    };

    #[test]
    fn test_channel_is_fifo() {
        let channel: Channel<u8, 4> = Channel::new();
        assert!(channel.is_empty());
        channel.try_send(1).unwrap();
        channel.try_send(2).unwrap();
        assert_eq!(channel.len(), 2);
        assert_eq!(channel.try_receive(), Ok(1));
        assert_eq!(channel.try_receive(), Ok(2));
        assert_eq!(channel.try_receive(), Err(TryReceiveError));
    }

    #[test]
    fn test_full_channel_returns_value() {
        let (sender, receiver) = channel::<u8, 2>();
        sender.try_send(1).unwrap();
        sender.clone().try_send(2).unwrap();
        assert_eq!(sender.try_send(3), Err(TrySendError(3)));
        assert_eq!(receiver.pending(), 2);
        assert_eq!(receiver.try_receive(), Ok(1));
    }

    #[test]
    fn test_sender_moves_across_threads() {
        let (sender, receiver) = channel::<u32, 8>();
        std::thread::spawn(move || {
            for value in 0..3 {
                sender.try_send(value).unwrap();
            }
        })
        .join()
        .unwrap();
        assert_eq!(receiver.pending(), 3);
    }

    #[test]
    fn test_latest_reload_wins() {
        let (sender, receiver) = intent_channel();
        let mut first = Config::default();
        first.wind_threshold = 10.0;
        let mut second = Config::default();
        second.wind_threshold = 30.0;
        assert!(request_reload(&sender, first));
        assert!(request_reload(&sender, second));

        let mut processor = IntentProcessor::new(receiver);
        let effects = processor.process_pending();
        assert!(effects.has_effects());
        assert!(!effects.shutdown);
        assert_eq!(effects.config.map(|config| config.wind_threshold), Some(30.0));

        assert!(!processor.process_pending().has_effects());
    }

    #[test]
    fn test_shutdown_intent() {
        let (sender, receiver) = intent_channel();
        sender.try_send(EngineIntent::Shutdown).unwrap();
        let effects = IntentProcessor::new(receiver).process_pending();
        assert!(effects.shutdown);
        assert!(effects.config.is_none());
    }

    #[test]
    fn test_full_intent_queue_drops_reload() {
        let (sender, _receiver) = intent_channel();
        for _ in 0..INTENT_QUEUE_SIZE {
            assert!(request_reload(&sender, Config::default()));
        }
        assert!(!request_reload(&sender, Config::default()));
    }
}
