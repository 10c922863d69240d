//! Tests for the channel façade: construction, mode switches and frame steps

#[cfg(test)]
mod tests {
    use bytecanvas::algorithm::alpha::AlphaMode;
    use bytecanvas::algorithm::channel::{Channel, ChannelConfig, stream_code};
    use bytecanvas::algorithm::packing::PackingMode;
    use bytecanvas::algorithm::window::ClockMode;
    use bytecanvas::io::error::ChannelError;
    use bytecanvas::io::sink::{FrameSink, Notification, RecordingSink};
    use bytecanvas::spatial::Raster;
    use bytecanvas::spatial::curve::index_to_point;
    use bytecanvas::spatial::mapping::MappingMode;

    fn channel(
        side: usize,
        mapping: MappingMode,
        packing: PackingMode,
        alpha: AlphaMode,
    ) -> Channel<RecordingSink> {
        let config = ChannelConfig {
            side,
            clock: ClockMode::Block,
            mapping,
            packing,
            alpha,
        };
        Channel::new(RecordingSink::keeping_frames(), config).unwrap()
    }

    // Accepts notifications but refuses every frame
    struct RefusingSink {
        notified: usize,
    }

    impl FrameSink for RefusingSink {
        fn notify(&mut self, _notification: Notification) {
            self.notified += 1;
        }

        fn flush(&mut self, _raster: &Raster) -> bytecanvas::Result<()> {
            Err(ChannelError::Sink {
                reason: "transport closed".to_string(),
            })
        }
    }

    fn stream_infos(sink: &RecordingSink) -> Vec<[u8; 3]> {
        sink.notifications()
            .iter()
            .filter_map(|n| match n {
                Notification::StreamInfo { code } => Some(*code),
                _ => None,
            })
            .collect()
    }

    // Tests buffer sizes derive from side and footprint at construction
    // Verified by sizing the window without the footprint
    #[test]
    fn test_new_sizes_buffers() {
        let ch = channel(8, MappingMode::Raster, PackingMode::Tight, AlphaMode::Constant);

        assert_eq!(ch.side(), 8);
        assert_eq!(ch.footprint(), 4);
        assert_eq!(ch.window().len(), 8 * 8 * 4);
        assert_eq!(ch.alpha().len(), 64);
        assert_eq!(ch.raster().side(), 8);
        assert_eq!(ch.row_stride(), 32);
        assert_eq!(ch.remaining_capacity(), 256);
        assert_eq!(ch.frames(), 0);
        assert_eq!(ch.sink().flushes(), 0);
    }

    // Tests construction rejects unusable sides
    // Verified by accepting a zero side
    #[test]
    fn test_new_rejects_invalid_side() {
        let zero = ChannelConfig {
            side: 0,
            ..ChannelConfig::default()
        };
        assert!(Channel::new(RecordingSink::new(), zero).is_err());

        let odd_curve = ChannelConfig {
            side: 6,
            mapping: MappingMode::Curve,
            ..ChannelConfig::default()
        };
        assert!(Channel::new(RecordingSink::new(), odd_curve).is_err());
    }

    // Tests block mode builds exactly one frame per filled window
    // Verified by stepping on every ingest
    #[test]
    fn test_block_mode_single_frame() {
        let mut ch = channel(4, MappingMode::Raster, PackingMode::Intensity, AlphaMode::Constant);

        let first = ch.ingest(&[1; 10]).unwrap();
        assert_eq!(first.consumed, 10);
        assert_eq!(ch.sink().flushes(), 0);

        let second = ch.ingest(&[2; 10]).unwrap();
        assert_eq!(second.consumed, 6);
        assert!(second.frame_completed);
        assert_eq!(ch.sink().flushes(), 1);
        assert_eq!(ch.remaining_capacity(), 16);
    }

    // Tests slide mode builds a frame on every ingest
    // Verified by waiting for the window to fill
    #[test]
    fn test_slide_mode_frame_per_ingest() {
        let mut ch = channel(4, MappingMode::Raster, PackingMode::Intensity, AlphaMode::Constant);
        ch.switch_clock(ClockMode::Slide);

        ch.ingest(&[1, 2, 3]).unwrap();
        ch.ingest(&[4]).unwrap();
        ch.ingest(&[5, 6]).unwrap();

        assert_eq!(ch.sink().flushes(), 3);
        assert_eq!(ch.window().get(10..), Some(&[1, 2, 3, 4, 5, 6][..]));
    }

    // Tests raster mapping with intensity packing writes row-major grey pixels
    // Verified by transposing the raster mapping
    #[test]
    fn test_raster_intensity_frame() {
        let mut ch = channel(2, MappingMode::Raster, PackingMode::Intensity, AlphaMode::Constant);

        ch.ingest(&[10, 20, 30, 40]).unwrap();

        let frame = ch.sink().frames().first().unwrap();
        assert_eq!(frame.get_pixel(0, 0).0, [10, 10, 10, 255]);
        assert_eq!(frame.get_pixel(1, 0).0, [20, 20, 20, 255]);
        assert_eq!(frame.get_pixel(0, 1).0, [30, 30, 30, 255]);
        assert_eq!(frame.get_pixel(1, 1).0, [40, 40, 40, 255]);
    }

    // Tests histogram-intensity pixels reflect normalized byte frequency
    // Verified by packing the raw byte instead of the lookup value
    #[test]
    fn test_histogram_intensity_frame() {
        let mut ch = channel(
            2,
            MappingMode::Raster,
            PackingMode::HistogramIntensity,
            AlphaMode::Constant,
        );

        ch.ingest(&[1, 1, 1, 2]).unwrap();

        assert_eq!(ch.raster().pixel(0, 0), Some([191, 191, 191, 255]));
        assert_eq!(ch.raster().pixel(1, 1), Some([64, 64, 64, 255]));
        assert_eq!(ch.histogram().count(1), 0);
    }

    // Tests entropy alpha is computed per raster row
    // Verified by using the whole-window entropy for every sample
    #[test]
    fn test_entropy_alpha_frame() {
        let mut ch = channel(2, MappingMode::Raster, PackingMode::Intensity, AlphaMode::Entropy);

        ch.ingest(&[5, 5, 1, 2]).unwrap();

        assert_eq!(ch.alpha(), &[0, 0, 32, 32]);
        assert_eq!(ch.raster().pixel(0, 0), Some([5, 5, 5, 0]));
        assert_eq!(ch.raster().pixel(1, 1), Some([2, 2, 2, 32]));
    }

    // Tests curve mapping places offset i at the curve's i-th point
    // Verified by falling back to raster placement
    #[test]
    fn test_curve_mapping_frame() {
        let mut ch = channel(4, MappingMode::Curve, PackingMode::Intensity, AlphaMode::Constant);
        let data: Vec<u8> = (0..16).collect();

        ch.ingest(&data).unwrap();

        for (index, &value) in data.iter().enumerate() {
            let (x, y) = index_to_point(4, index);
            assert_eq!(ch.raster().pixel(x, y), Some([value, value, value, 255]));
        }
    }

    // Tests tuple mapping scales the leading bytes and clears the canvas after flushing
    // Verified by reading coordinates from the packed bytes
    #[test]
    fn test_tuple_mapping_frame() {
        let mut ch = channel(4, MappingMode::Tuple, PackingMode::Intensity, AlphaMode::Constant);
        assert_eq!(ch.footprint(), 3);

        let mut data = vec![0u8; 48];
        data[..3].copy_from_slice(&[255, 0, 77]);
        ch.ingest(&data).unwrap();

        let frame = ch.sink().frames().first().unwrap();
        assert_eq!(frame.get_pixel(3, 0).0, [77, 77, 77, 255]);
        assert_eq!(frame.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(ch.raster().pixel(3, 0), Some([0, 0, 0, 255]));
    }

    // Tests packing switches keep the raw buffer a multiple of the sample count
    // Verified by skipping the resize on footprint change
    #[test]
    fn test_packing_switch_keeps_multiple() {
        let mut ch = channel(8, MappingMode::Raster, PackingMode::Intensity, AlphaMode::Constant);

        for mode in [
            PackingMode::Tight,
            PackingMode::TightNoAlpha,
            PackingMode::HistogramIntensity,
            PackingMode::Intensity,
        ] {
            ch.switch_packing(mode).unwrap();
            assert_eq!(ch.packing(), mode);
            assert_eq!(ch.window().len() % 64, 0);
            assert_eq!(ch.window().len() / 64, ch.footprint());
            assert_eq!(ch.footprint(), mode.footprint(MappingMode::Raster));
        }
    }

    // Tests switching to tuple mapping grows the footprint and steps once
    // Verified by keeping the previous footprint
    #[test]
    fn test_mapping_switch_resizes() {
        let mut ch = channel(4, MappingMode::Raster, PackingMode::Tight, AlphaMode::Constant);

        ch.switch_mapping(MappingMode::Tuple).unwrap();

        assert_eq!(ch.mapping(), MappingMode::Tuple);
        assert_eq!(ch.footprint(), 6);
        assert_eq!(ch.window().len(), 16 * 6);
        assert_eq!(ch.sink().flushes(), 1);
        assert!(ch.coordinate_map().curve().is_none());
    }

    // Tests a curve switch on a non-power-of-two side leaves the channel unchanged
    // Verified by installing the mapping before the table is built
    #[test]
    fn test_curve_switch_rejected() {
        let mut ch = channel(6, MappingMode::Raster, PackingMode::Intensity, AlphaMode::Constant);

        let result = ch.switch_mapping(MappingMode::Curve);

        assert!(matches!(result, Err(ChannelError::InvalidParameter { .. })));
        assert_eq!(ch.mapping(), MappingMode::Raster);
        assert_eq!(ch.sink().flushes(), 0);
    }

    // Tests resize zeroes content and rejects invalid sides without change
    // Verified by keeping old window content across resize
    #[test]
    fn test_resize() {
        let mut ch = channel(4, MappingMode::Raster, PackingMode::Intensity, AlphaMode::Constant);
        ch.ingest(&[9; 5]).unwrap();

        ch.resize(8).unwrap();
        assert_eq!(ch.side(), 8);
        assert_eq!(ch.window().len(), 64);
        assert!(ch.window().iter().all(|&b| b == 0));
        assert!(ch.alpha().iter().all(|&a| a == 0xFF));
        assert_eq!(ch.remaining_capacity(), 64);
        assert_eq!(ch.histogram().total(), 0);

        assert!(ch.resize(0).is_err());
        assert!(ch.resize(100_000).is_err());
        assert_eq!(ch.side(), 8);
    }

    // Tests stream info is emitted on the first frame and after each change only
    // Verified by emitting stream info on every frame
    #[test]
    fn test_stream_info_emitted_when_dirty() {
        let mut ch = channel(2, MappingMode::Raster, PackingMode::Intensity, AlphaMode::Constant);

        ch.ingest(&[0; 4]).unwrap();
        ch.ingest(&[0; 4]).unwrap();
        assert_eq!(stream_infos(ch.sink()), vec![*b"201"]);

        ch.switch_packing(PackingMode::Tight).unwrap();
        ch.ingest(&[0; 16]).unwrap();
        assert_eq!(stream_infos(ch.sink()), vec![*b"201", *b"004"]);
    }

    // Tests stream codes are ASCII digits of packing, mapping and footprint
    // Verified by emitting raw indices
    #[test]
    fn test_stream_code_digits() {
        assert_eq!(stream_code(PackingMode::TightNoAlpha, MappingMode::Tuple, 5), *b"115");
        assert_eq!(stream_code(PackingMode::HistogramIntensity, MappingMode::Curve, 1), *b"321");
    }

    // Tests frame status carries sequence, processed counter and entropy
    // Verified by reporting raw entropy instead of the unit-scaled value
    #[test]
    fn test_frame_status_contents() {
        let mut ch = channel(2, MappingMode::Raster, PackingMode::Intensity, AlphaMode::Constant);
        ch.set_processed_offset(100);

        ch.ingest(&[1, 2, 3, 4]).unwrap();

        let status = ch.sink().notifications().first().cloned();
        let Some(Notification::FrameStatus {
            sequence,
            processed,
            entropy,
            ..
        }) = status
        else {
            panic!("first notification must be a frame status");
        };
        assert_eq!(sequence, 1);
        assert_eq!(processed, 104);
        assert!((entropy - 0.25).abs() < 1e-9);
        assert_eq!(ch.processed(), 104);
        assert_eq!(ch.processed_at_last_frame(), 104);
    }

    // Tests registered patterns drive alpha and notifications in pattern mode
    // Verified by ignoring registered patterns
    #[test]
    fn test_pattern_alpha_frame() {
        let mut ch = channel(4, MappingMode::Raster, PackingMode::Intensity, AlphaMode::Pattern);
        assert_eq!(ch.add_patterns("val=de,ad:opt=10,event"), 1);

        let mut data = vec![0u8; 16];
        data[1..3].copy_from_slice(&[0xDE, 0xAD]);
        data[9..11].copy_from_slice(&[0xDE, 0xAD]);
        ch.ingest(&data).unwrap();

        assert_eq!(ch.sink().pattern_matches(), vec![(0, 2)]);
        assert_eq!(ch.alpha().get(1..3), Some(&[0x10, 0x10][..]));
        assert_eq!(ch.alpha().get(9..11), Some(&[0x10, 0x10][..]));
        assert_eq!(ch.alpha().first(), Some(&0xFF));
    }

    // Tests malformed pattern entries are skipped without losing valid ones
    // Verified by aborting the whole specification on the first error
    #[test]
    fn test_add_patterns_skips_malformed() {
        let mut ch = channel(2, MappingMode::Raster, PackingMode::Intensity, AlphaMode::Pattern);

        let added = ch.add_patterns("val=4d,5a:val=zz:val=ff");

        assert_eq!(added, 2);
        assert_eq!(ch.patterns().len(), 2);
        assert!(ch.add_pattern(Vec::new(), 0, 9, Default::default()).is_err());
        assert_eq!(ch.patterns().len(), 2);
    }

    // Tests unknown selectors are rejected without state change
    // Verified by treating unknown selectors as a clock switch
    #[test]
    fn test_consume_command() {
        let mut ch = channel(4, MappingMode::Raster, PackingMode::Intensity, AlphaMode::Entropy);

        let result = ch.consume_command(99);
        assert!(matches!(
            result,
            Err(ChannelError::UnknownCommand { selector: 99 })
        ));
        assert_eq!(ch.clock(), ClockMode::Block);
        assert_eq!(ch.packing(), PackingMode::Intensity);

        ch.consume_command(1).unwrap();
        assert_eq!(ch.clock(), ClockMode::Slide);
        ch.consume_command(22).unwrap();
        assert_eq!(ch.packing(), PackingMode::Tight);
        ch.consume_command(30).unwrap();
        assert_eq!(ch.alpha_mode(), AlphaMode::Constant);
        ch.consume_command(12).unwrap();
        assert_eq!(ch.mapping(), MappingMode::Curve);
    }

    // Tests a forced step flushes without ingesting
    // Verified by requiring a completed window
    #[test]
    fn test_force_step_and_into_sink() {
        let mut ch = channel(2, MappingMode::Raster, PackingMode::Intensity, AlphaMode::Constant);

        ch.force_step().unwrap();
        ch.sink_mut().drain_notifications();
        ch.force_step().unwrap();

        assert_eq!(ch.frames(), 2);
        let sink = ch.into_sink();
        assert_eq!(sink.flushes(), 2);
        assert_eq!(sink.notifications().len(), 1);
    }

    // Tests a refused flush surfaces from ingest while the bytes stay consumed
    // Verified by swallowing the sink error
    #[test]
    fn test_sink_refusal_propagates() {
        let config = ChannelConfig {
            side: 2,
            alpha: AlphaMode::Constant,
            ..ChannelConfig::default()
        };
        let mut ch = Channel::new(RefusingSink { notified: 0 }, config).unwrap();

        let partial = ch.ingest(&[1, 2]).unwrap();
        assert!(!partial.frame_completed);

        let result = ch.ingest(&[3, 4, 5]);
        assert!(matches!(
            result,
            Err(ChannelError::Sink { ref reason }) if reason == "transport closed"
        ));
        assert_eq!(ch.processed(), 4);
        assert_eq!(ch.processed_at_last_frame(), 0);
        assert_eq!(ch.remaining_capacity(), 4);
        assert_eq!(ch.sink().notified, 2);

        assert!(matches!(ch.force_step(), Err(ChannelError::Sink { .. })));
    }

    // Tests construction and resize build no frame and the next frame reports stream info
    // Verified by stepping at the end of every resize
    #[test]
    fn test_resize_builds_no_frame() {
        let mut ch = channel(4, MappingMode::Raster, PackingMode::Intensity, AlphaMode::Constant);
        ch.resize(2).unwrap();
        assert_eq!(ch.frames(), 0);
        assert_eq!(ch.sink().flushes(), 0);
        assert!(ch.sink().notifications().is_empty());

        ch.ingest(&[0; 4]).unwrap();
        ch.resize(4).unwrap();
        assert_eq!(ch.sink().flushes(), 1);

        ch.ingest(&[0; 16]).unwrap();
        assert_eq!(stream_infos(ch.sink()), vec![*b"201", *b"201"]);
    }
}
