//! Property-based tests for printmeta
//!
//! These tests generate random durations, headers and archive contents and
//! verify the extractor's invariants hold across them.

mod common;

use common::{PLAIN_MODEL, build_3mf};
use printmeta::{format_duration, parse_3mf, parse_duration, parse_gcode};
use proptest::prelude::*;
use std::io::Cursor;

fn hex_color() -> impl Strategy<Value = String> {
    "[0-9A-F]{6}".prop_map(|hex| format!("#{}", hex))
}

fn material() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["PLA", "PETG", "ABS", "ASA", "TPU", "PA-CF"]).prop_map(String::from)
}

proptest! {
    #[test]
    fn prop_component_and_colon_forms_agree(h in 0u64..100, m in 0u64..60, s in 0u64..60) {
        prop_assume!(h + m + s > 0);
        let expected = h * 3600 + m * 60 + s;

        prop_assert_eq!(parse_duration(&format!("{}h {}m {}s", h, m, s)), expected);
        prop_assert_eq!(parse_duration(&format!("{}:{:02}:{:02}", h, m, s)), expected);
        prop_assert_eq!(parse_duration(&format!("{}:{:02}", h * 60 + m, s)), expected);
    }

    #[test]
    fn prop_format_then_parse(seconds in 0u64..10_000_000) {
        prop_assert_eq!(parse_duration(&format_duration(seconds)), seconds);
    }

    #[test]
    fn prop_parse_duration_never_panics(text in "\\PC*") {
        let _ = parse_duration(&text);
    }

    #[test]
    fn prop_gcode_never_fails_and_never_empty(text in "\\PC*") {
        let job = parse_gcode("random.gcode", Cursor::new(text.as_bytes())).unwrap();
        prop_assert!(!job.filaments.is_empty());
    }

    #[test]
    fn prop_header_lists_stay_aligned(
        slots in prop::collection::vec((material(), hex_color()), 1..8)
    ) {
        let materials: Vec<_> = slots.iter().map(|(m, _)| m.as_str()).collect();
        let colors: Vec<_> = slots.iter().map(|(_, c)| c.as_str()).collect();
        let header = format!(
            "; filament_type = {}\n; filament_colour = {}\nG28\n",
            materials.join(";"),
            colors.join(";")
        );

        let job = parse_gcode("aligned.gcode", Cursor::new(header)).unwrap();
        prop_assert_eq!(job.filaments.len(), slots.len());
        for (filament, (material, color)) in job.filaments.iter().zip(&slots) {
            prop_assert_eq!(filament.material.as_deref(), Some(material.as_str()));
            prop_assert_eq!(filament.color.as_deref(), Some(color.as_str()));
        }
    }

    #[test]
    fn prop_archive_parse_is_deterministic(
        slots in prop::collection::vec((material(), hex_color()), 0..6),
        prediction in 1u64..1_000_000,
    ) {
        let types: Vec<_> = slots.iter().map(|(m, _)| format!("\"{}\"", m)).collect();
        let colors: Vec<_> = slots.iter().map(|(_, c)| format!("\"{}\"", c)).collect();
        let settings = format!(
            "{{\"filament_type\": [{}], \"filament_colour\": [{}]}}",
            types.join(","),
            colors.join(",")
        );
        let manifest = format!(
            "<config><plate><metadata key=\"prediction\" value=\"{}\"/></plate></config>",
            prediction
        );
        let bytes = build_3mf(
            PLAIN_MODEL,
            &[
                ("Metadata/project_settings.config", settings.as_bytes()),
                ("Metadata/slice_info.config", manifest.as_bytes()),
            ],
        );

        let first = parse_3mf("p.3mf", Cursor::new(bytes.clone())).unwrap();
        let second = parse_3mf("p.3mf", Cursor::new(bytes)).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.filaments.len(), slots.len().max(1));
        prop_assert_eq!(first.print_time, Some(prediction));
    }

    #[test]
    fn prop_arbitrary_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = parse_3mf("fuzz.3mf", Cursor::new(data));
    }
}
