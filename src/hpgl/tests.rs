// src/hpgl/tests.rs

//! Unit tests for the command processor, driven through `process_line`
//! and observed through the emitted records and the public state.

use crate::config::Config;
use crate::emit::{Record, VectorKind};
use crate::hpgl::Plotter;

// --- Test Helpers ---

fn plotter() -> Plotter {
    Plotter::new(&Config::default())
}

/// Runs one command, echoing the current status byte back the way the
/// frontend does, and returns the records of the reply.
fn run(p: &mut Plotter, cmd: &str) -> Vec<Record> {
    let status = p.state().status.bits();
    p.process_line(status, cmd.as_bytes());
    p.take_records()
}

/// The pen-movement records of a reply, as (kind, x, y, clipped).
fn vectors(records: &[Record]) -> Vec<(VectorKind, i32, i32, bool)> {
    records
        .iter()
        .filter_map(|r| match r {
            Record::Vector {
                kind,
                x,
                y,
                clipped,
            } => Some((*kind, *x, *y, *clipped)),
            _ => None,
        })
        .collect()
}

fn emsgs(records: &[Record]) -> Vec<&'static str> {
    records
        .iter()
        .filter_map(|r| match r {
            Record::Emsg(m) => Some(*m),
            _ => None,
        })
        .collect()
}

fn outputs(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| match r {
            Record::Output(s) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod vector_tests {
    use super::*;
    use test_log::test;

    #[test]
    fn replies_end_with_status_and_eof() {
        let mut p = plotter();
        let records = run(&mut p, "PU0,0");
        assert!(records.len() >= 2);
        assert!(matches!(records[records.len() - 2], Record::Status { .. }));
        assert_eq!(records[records.len() - 1], Record::Eof);
    }

    #[test]
    fn startup_produces_no_records() {
        let mut p = plotter();
        assert!(p.take_records().is_empty());
    }

    #[test]
    fn pen_up_moves_pen_down_draws() {
        let mut p = plotter();
        let records = run(&mut p, "PU0,0");
        assert_eq!(vectors(&records), vec![(VectorKind::MoveTo, 0, 0, false)]);
        let records = run(&mut p, "PD100,50");
        assert_eq!(vectors(&records), vec![(VectorKind::DrawTo, 100, 50, false)]);
        assert!(p.state().pen_down);
    }

    #[test]
    fn coordinates_are_truncated_without_scaling() {
        let mut p = plotter();
        let records = run(&mut p, "PU10.9,20.7");
        assert_eq!(vectors(&records), vec![(VectorKind::MoveTo, 10, 20, false)]);
    }

    #[test]
    fn relative_moves_accumulate() {
        let mut p = plotter();
        run(&mut p, "PU100,100");
        let records = run(&mut p, "PR50,-30");
        assert_eq!(vectors(&records), vec![(VectorKind::MoveTo, 150, 70, false)]);
        let records = run(&mut p, "PD10,10,10,10");
        assert_eq!(
            vectors(&records),
            vec![
                (VectorKind::DrawTo, 160, 80, false),
                (VectorKind::DrawTo, 170, 90, false),
            ]
        );
    }

    #[test]
    fn bare_pen_down_leaves_a_dot() {
        let mut p = plotter();
        run(&mut p, "SP1");
        run(&mut p, "PU200,300");
        let records = run(&mut p, "PD");
        let v = vectors(&records);
        assert_eq!(v.len(), 2);
        assert_eq!(v[0], (VectorKind::MoveTo, 200, 300, false));
        assert_eq!(v[1], (VectorKind::DrawTo, 200, 300, false));
    }

    #[test]
    fn odd_parameter_count_is_an_error() {
        let mut p = plotter();
        let records = run(&mut p, "PA100");
        assert!(emsgs(&records).contains(&"missing parameter"));
        assert_eq!(p.state().error, 2);
    }

    #[test]
    fn out_of_range_coordinate_enters_lost_mode() {
        let mut p = plotter();
        let records = run(&mut p, "PA40000,0");
        assert!(vectors(&records).is_empty());
        assert_eq!(
            emsgs(&records),
            vec!["Value out of range", "coordinate out of range"]
        );
        assert!(p.state().lost);
        assert_eq!(p.state().error, 3);
    }

    #[test]
    fn absolute_coordinate_recovers_from_lost_mode() {
        let mut p = plotter();
        run(&mut p, "PA40000,0");
        assert!(p.state().lost);
        let records = run(&mut p, "PA100,100");
        assert!(!p.state().lost);
        assert_eq!(vectors(&records), vec![(VectorKind::MoveTo, 100, 100, false)]);
    }

    #[test]
    fn lost_mode_suppresses_labels_and_arcs() {
        let mut p = plotter();
        run(&mut p, "PA40000,0");
        let records = run(&mut p, "LBHELLO\x03");
        assert!(vectors(&records).is_empty());
        let records = run(&mut p, "AA1000,1000,90");
        assert!(vectors(&records).is_empty());
    }

    #[test]
    fn unknown_mnemonic_reports_error_1() {
        let mut p = plotter();
        let records = run(&mut p, "QQ");
        assert_eq!(emsgs(&records), vec!["Instruction not recognized"]);
        assert_eq!(p.state().error, 1);
    }
}

#[cfg(test)]
mod clip_tests {
    use super::*;
    use test_log::test;

    #[test]
    fn draws_are_cut_at_the_window_edge() {
        let mut p = plotter();
        run(&mut p, "PU0,0");
        run(&mut p, "IW0,0,100,100");
        let records = run(&mut p, "PD200,0");
        assert_eq!(vectors(&records), vec![(VectorKind::DrawTo, 100, 0, true)]);
        assert!(p.state().pen_pos_clipped.is_some());
    }

    #[test]
    fn actual_position_reports_the_clipped_point() {
        let mut p = plotter();
        run(&mut p, "PU0,0");
        run(&mut p, "IW0,0,100,100");
        run(&mut p, "PD200,0");
        let records = run(&mut p, "OA");
        assert_eq!(outputs(&records), vec!["100,0,1".to_string()]);
    }

    #[test]
    fn reentering_the_window_emits_a_reposition() {
        let mut p = plotter();
        run(&mut p, "IW0,0,100,100");
        run(&mut p, "PU200,50");
        let records = run(&mut p, "PD50,50");
        assert_eq!(
            vectors(&records),
            vec![
                (VectorKind::MoveTo, 100, 50, true),
                (VectorKind::DrawTo, 50, 50, false),
            ]
        );
        assert!(p.state().pen_pos_clipped.is_none());
    }

    #[test]
    fn segments_outside_the_window_vanish() {
        let mut p = plotter();
        run(&mut p, "IW0,0,100,100");
        run(&mut p, "PU200,200");
        let records = run(&mut p, "PD300,300");
        assert!(vectors(&records).is_empty());
    }

    #[test]
    fn dots_outside_the_window_are_dropped() {
        let mut p = plotter();
        run(&mut p, "IW0,0,100,100");
        run(&mut p, "LT0");
        run(&mut p, "PU0,0");
        let records = run(&mut p, "PD500,500");
        assert!(vectors(&records).is_empty());
    }

    #[test]
    fn window_resets_with_iw_without_parameters() {
        let mut p = plotter();
        run(&mut p, "IW10,20,30,40");
        let records = run(&mut p, "OW");
        assert_eq!(outputs(&records), vec!["10,20,30,40".to_string()]);
        run(&mut p, "IW");
        let records = run(&mut p, "OW");
        assert_eq!(outputs(&records), vec!["0,0,10900,7650".to_string()]);
    }

    #[test]
    fn oversize_window_parameter_snaps_to_the_page() {
        let mut p = plotter();
        let records = run(&mut p, "IW0,0,50000,50000");
        assert!(!emsgs(&records).is_empty());
        let records = run(&mut p, "OW");
        assert_eq!(outputs(&records), vec!["0,0,10900,7650".to_string()]);
    }
}

#[cfg(test)]
mod scaling_tests {
    use super::*;
    use test_log::test;

    #[test]
    fn user_units_map_onto_the_p1_p2_frame() {
        let mut p = plotter();
        run(&mut p, "SC0,100,0,100");
        assert!(p.state().scaling);
        let records = run(&mut p, "PA50,50");
        assert_eq!(
            vectors(&records),
            vec![(VectorKind::MoveTo, 5250, 3879, false)]
        );
    }

    #[test]
    fn commanded_position_is_reported_in_user_units() {
        let mut p = plotter();
        run(&mut p, "SC0,100,0,100");
        run(&mut p, "PA50,50");
        let records = run(&mut p, "OC");
        assert_eq!(outputs(&records), vec!["50.0000,50.0000,0".to_string()]);
    }

    #[test]
    fn sc_without_parameters_turns_scaling_off() {
        let mut p = plotter();
        run(&mut p, "SC0,100,0,100");
        run(&mut p, "SC");
        assert!(!p.state().scaling);
    }

    #[test]
    fn degenerate_scale_is_rejected() {
        let mut p = plotter();
        let records = run(&mut p, "SC0,0,0,100");
        assert!(!p.state().scaling);
        assert!(records.iter().all(|r| !matches!(r, Record::Vector { .. })));
    }

    #[test]
    fn ip_moves_the_scaling_points() {
        let mut p = plotter();
        let records = run(&mut p, "IP0,0,3000,4000");
        assert_eq!(
            records[0],
            Record::P1P2 {
                p1x: 0,
                p1y: 0,
                p2x: 3000,
                p2y: 4000
            }
        );
        let records = run(&mut p, "OP");
        assert_eq!(outputs(&records), vec!["0,0,3000,4000".to_string()]);
    }

    #[test]
    fn degenerate_p1_p2_gains_one_unit() {
        let mut p = plotter();
        run(&mut p, "IP500,500,500,500");
        let records = run(&mut p, "OP");
        assert_eq!(outputs(&records), vec!["500,500,501,501".to_string()]);
    }

    #[test]
    fn ip_outside_the_page_snaps_to_the_full_page() {
        let mut p = plotter();
        run(&mut p, "IP-100,0,3000,4000");
        let records = run(&mut p, "OP");
        assert_eq!(outputs(&records), vec!["0,0,10900,7650".to_string()]);
    }

    #[test]
    fn ip_with_p1_only_drags_p2_along() {
        let mut p = plotter();
        run(&mut p, "IP1250,1279");
        let records = run(&mut p, "OP");
        assert_eq!(outputs(&records), vec!["1250,1279,11250,8479".to_string()]);
    }

    #[test]
    fn op_clears_the_p1p2_status_bit() {
        let mut p = plotter();
        run(&mut p, "IP0,0,3000,4000");
        assert!(p.state().status.contains(super::super::Status::P1P2_CHANGED));
        run(&mut p, "OP");
        assert!(!p.state().status.contains(super::super::Status::P1P2_CHANGED));
    }
}

#[cfg(test)]
mod style_tests {
    use super::*;
    use test_log::test;

    #[test]
    fn fixed_dashes_have_absolute_length() {
        let mut p = plotter();
        // 3000/4000 spans give a 5000-unit diagonal, so LT2,2 is a
        // 100-unit pattern of 50-unit dashes.
        run(&mut p, "IP0,0,3000,4000");
        run(&mut p, "LT2,2");
        run(&mut p, "PU0,0");
        let records = run(&mut p, "PD200,0");
        assert_eq!(
            vectors(&records),
            vec![
                (VectorKind::DrawTo, 50, 0, false),
                (VectorKind::MoveTo, 100, 0, false),
                (VectorKind::DrawTo, 150, 0, false),
                (VectorKind::MoveTo, 200, 0, false),
                (VectorKind::MoveTo, 200, 0, false),
            ]
        );
    }

    #[test]
    fn adaptive_dashes_stretch_to_fit() {
        let mut p = plotter();
        run(&mut p, "IP0,0,3000,4000");
        run(&mut p, "LT-2");
        run(&mut p, "PU0,0");
        let records = run(&mut p, "PD200,0");
        assert_eq!(
            vectors(&records),
            vec![
                (VectorKind::DrawTo, 50, 0, false),
                (VectorKind::MoveTo, 150, 0, false),
                (VectorKind::DrawTo, 200, 0, false),
            ]
        );
    }

    #[test]
    fn line_type_zero_plots_dots_at_endpoints() {
        let mut p = plotter();
        run(&mut p, "LT0");
        run(&mut p, "PU0,0");
        let records = run(&mut p, "PD100,0");
        assert_eq!(vectors(&records), vec![(VectorKind::PlotAt, 100, 0, false)]);
    }

    #[test]
    fn line_type_without_parameters_is_solid() {
        let mut p = plotter();
        run(&mut p, "LT2");
        run(&mut p, "LT");
        run(&mut p, "PU0,0");
        let records = run(&mut p, "PD100,0");
        assert_eq!(vectors(&records), vec![(VectorKind::DrawTo, 100, 0, false)]);
    }

    #[test]
    fn user_patterns_replace_the_table_entry() {
        let mut p = plotter();
        run(&mut p, "IP0,0,3000,4000");
        run(&mut p, "UL3,30,70");
        run(&mut p, "LT3,2");
        run(&mut p, "PU0,0");
        let records = run(&mut p, "PD200,0");
        assert_eq!(
            vectors(&records),
            vec![
                (VectorKind::DrawTo, 30, 0, false),
                (VectorKind::MoveTo, 100, 0, false),
                (VectorKind::DrawTo, 130, 0, false),
                (VectorKind::MoveTo, 200, 0, false),
                (VectorKind::MoveTo, 200, 0, false),
            ]
        );
    }

    #[test]
    fn zero_pattern_length_falls_back_to_solid() {
        let mut p = plotter();
        run(&mut p, "LT2,0");
        run(&mut p, "PU0,0");
        let records = run(&mut p, "PD1000,1000");
        assert_eq!(
            vectors(&records),
            vec![(VectorKind::DrawTo, 1000, 1000, false)]
        );
        run(&mut p, "LT-2,0");
        let records = run(&mut p, "PD0,0");
        assert_eq!(vectors(&records), vec![(VectorKind::DrawTo, 0, 0, false)]);
    }

    #[test]
    fn user_pattern_index_is_validated() {
        let mut p = plotter();
        let records = run(&mut p, "UL9,50,50");
        assert!(emsgs(&records).contains(&"parameter out of range"));
        assert_eq!(p.state().error, 3);
    }

    #[test]
    fn ticks_straddle_the_current_position() {
        let mut p = plotter();
        run(&mut p, "PU1000,1000");
        let records = run(&mut p, "XT");
        // 0.5% of the default 7200-unit P1-P2 height is 36 units.
        assert_eq!(
            vectors(&records),
            vec![
                (VectorKind::MoveTo, 1000, 964, false),
                (VectorKind::DrawTo, 1000, 1036, false),
                (VectorKind::MoveTo, 1000, 1000, false),
            ]
        );
    }

    #[test]
    fn tick_length_applies_per_side() {
        let mut p = plotter();
        run(&mut p, "TL1");
        run(&mut p, "PU1000,1000");
        let records = run(&mut p, "YT");
        // One percent of the 10000-unit width, positive side only.
        assert_eq!(
            vectors(&records),
            vec![
                (VectorKind::MoveTo, 1000, 1000, false),
                (VectorKind::DrawTo, 1100, 1000, false),
                (VectorKind::MoveTo, 1000, 1000, false),
            ]
        );
    }
}

#[cfg(test)]
mod arc_tests {
    use super::*;
    use test_log::test;

    #[test]
    fn arc_sweeps_to_its_endpoint() {
        let mut p = plotter();
        run(&mut p, "PU0,0");
        run(&mut p, "PD0,0");
        let records = run(&mut p, "AA1000,0,90,90");
        assert_eq!(
            vectors(&records),
            vec![(VectorKind::DrawTo, 1000, -1000, false)]
        );
    }

    #[test]
    fn relative_arc_center_offsets_from_the_pen() {
        let mut p = plotter();
        run(&mut p, "PU500,500");
        let records = run(&mut p, "AR200,0,180,180");
        // Half turn around (700, 500) lands opposite the start.
        assert_eq!(
            vectors(&records),
            vec![(VectorKind::MoveTo, 900, 500, false)]
        );
    }

    #[test]
    fn zero_radius_arc_is_a_no_op() {
        let mut p = plotter();
        run(&mut p, "PU100,100");
        let records = run(&mut p, "AA100,100,90");
        assert!(vectors(&records).is_empty());
    }

    #[test]
    fn arc_needs_three_parameters() {
        let mut p = plotter();
        run(&mut p, "PU0,0");
        let records = run(&mut p, "AA1000,0");
        assert!(emsgs(&records).contains(&"no third parameter"));
        assert_eq!(p.state().error, 2);
    }

    #[test]
    fn circle_returns_to_its_center() {
        let mut p = plotter();
        run(&mut p, "PU1000,1000");
        let records = run(&mut p, "CI500");
        let v = vectors(&records);
        assert_eq!(v.first(), Some(&(VectorKind::MoveTo, 1500, 1000, false)));
        assert_eq!(v.last(), Some(&(VectorKind::MoveTo, 1000, 1000, false)));
        let chords = v
            .iter()
            .filter(|(k, ..)| *k == VectorKind::DrawTo)
            .count();
        // 5-degree default chord angle: 71 interior chords plus the
        // closing chord and one overlap chord.
        assert_eq!(chords, 73);
        assert_eq!(p.state().pen_pos.x, 1000.0);
        assert_eq!(p.state().pen_pos.y, 1000.0);
    }

    #[test]
    fn circle_chord_angle_is_floored_to_whole_degrees() {
        let mut p = plotter();
        run(&mut p, "PU0,0");
        let a = vectors(&run(&mut p, "CI100,45"));
        run(&mut p, "PU0,0");
        let b = vectors(&run(&mut p, "CI100,45.9"));
        assert_eq!(a.len(), b.len());
    }
}

#[cfg(test)]
mod text_tests {
    use super::*;
    use test_log::test;

    #[test]
    fn labels_advance_one_cell_per_character() {
        let mut p = plotter();
        run(&mut p, "PU0,0");
        let records = run(&mut p, "LBAB\x03");
        assert!(!vectors(&records).is_empty());
        // Default cell pitch is 1.5 x 75 = 112.5 units per character.
        assert_eq!(p.state().pen_pos.x, 225.0);
        assert_eq!(p.state().pen_pos.y, 0.0);
    }

    #[test]
    fn spaces_advance_without_drawing() {
        let mut p = plotter();
        run(&mut p, "PU0,0");
        let records = run(&mut p, "LB \x03");
        let v = vectors(&records);
        assert!(v.iter().all(|(k, ..)| *k == VectorKind::MoveTo));
        assert_eq!(p.state().pen_pos.x, 112.5);
    }

    #[test]
    fn carriage_return_rewinds_line_feed_drops() {
        let mut p = plotter();
        run(&mut p, "PU500,500");
        run(&mut p, "LBAB\r\n\x03");
        assert_eq!(p.state().pen_pos.x, 500.0);
        // Default line feed is 2 x 108 = 216 units down.
        assert_eq!(p.state().pen_pos.y, 284.0);
    }

    #[test]
    fn cp_without_parameters_is_cr_lf() {
        let mut p = plotter();
        run(&mut p, "PU0,0");
        run(&mut p, "CP");
        assert_eq!(p.state().pen_pos.x, 0.0);
        assert_eq!(p.state().pen_pos.y, -216.0);
    }

    #[test]
    fn custom_terminator_is_drawn_when_not_silent() {
        let mut p = plotter();
        run(&mut p, "PU0,0");
        run(&mut p, "DT#");
        assert_eq!(p.state().str_term, b'#');
        run(&mut p, "LBAB#CD");
        // A, B and the terminator itself advance; CD is never reached.
        assert_eq!(p.state().pen_pos.x, 337.5);
    }

    #[test]
    fn character_size_rescales_the_cell() {
        let mut p = plotter();
        run(&mut p, "PU0,0");
        run(&mut p, "SI0.5,0.5");
        run(&mut p, "LBA\x03");
        // 0.5 cm = 200 units wide, pitch 1.5x.
        assert_eq!(p.state().pen_pos.x, 300.0);
    }

    #[test]
    fn direction_rotates_the_advance() {
        let mut p = plotter();
        run(&mut p, "PU0,0");
        run(&mut p, "DI0,1");
        run(&mut p, "LBA\x03");
        assert!(p.state().pen_pos.x.abs() < 1e-9);
        assert_eq!(p.state().pen_pos.y, 112.5);
    }

    #[test]
    fn direction_rejects_a_zero_vector() {
        let mut p = plotter();
        let records = run(&mut p, "DI0,0");
        assert!(emsgs(&records).contains(&"both parameters are zero"));
        assert_eq!(p.state().error, 3);
    }

    #[test]
    fn symbol_mode_marks_every_vertex() {
        let mut p = plotter();
        run(&mut p, "SM*");
        assert_eq!(p.state().symbol_char, Some(b'*'));
        let records = run(&mut p, "PA500,500");
        let v = vectors(&records);
        assert!(v.iter().any(|(k, ..)| *k == VectorKind::DrawTo));
        assert_eq!(v.last(), Some(&(VectorKind::MoveTo, 500, 500, false)));
        run(&mut p, "SM");
        assert_eq!(p.state().symbol_char, None);
    }

    #[test]
    fn symbol_mode_cancels_on_eight_bit_codes() {
        let mut p = plotter();
        run(&mut p, "SM*");
        assert_eq!(p.state().symbol_char, Some(b'*'));
        let status = p.state().status.bits();
        p.process_line(status, b"SM\xA3");
        p.take_records();
        assert_eq!(p.state().symbol_char, None);
    }

    #[test]
    fn character_sets_are_designated_and_selected() {
        let mut p = plotter();
        run(&mut p, "CS1");
        run(&mut p, "CA2");
        run(&mut p, "SA");
        run(&mut p, "SS");
        let records = run(&mut p, "CS7");
        assert!(emsgs(&records).contains(&"Illegal character set"));
    }
}

#[cfg(test)]
mod status_tests {
    use super::*;
    use test_log::test;

    #[test]
    fn initialize_replays_p1p2_and_clears_the_screen() {
        let mut p = plotter();
        run(&mut p, "PA40000,0");
        let records = run(&mut p, "IN");
        assert_eq!(
            records[0],
            Record::P1P2 {
                p1x: 250,
                p1y: 279,
                p2x: 10250,
                p2y: 7479
            }
        );
        assert_eq!(records[1], Record::Clear);
        assert!(!p.state().lost);
        assert_eq!(p.state().error, 0);
    }

    #[test]
    fn initialize_rejects_parameters() {
        let mut p = plotter();
        let records = run(&mut p, "IN1");
        assert!(emsgs(&records).contains(&"redundant parameter"));
        assert!(!records.contains(&Record::Clear));
    }

    #[test]
    fn defaults_keeps_p1p2_but_resets_scaling() {
        let mut p = plotter();
        run(&mut p, "IP0,0,3000,4000");
        run(&mut p, "SC0,10,0,10");
        run(&mut p, "DF");
        assert!(!p.state().scaling);
        let records = run(&mut p, "OP");
        assert_eq!(outputs(&records), vec!["0,0,3000,4000".to_string()]);
    }

    #[test]
    fn output_status_reports_then_drops_the_init_bit() {
        let mut p = plotter();
        let records = run(&mut p, "OS");
        assert_eq!(outputs(&records), vec!["8".to_string()]);
        let records = run(&mut p, "OS");
        assert_eq!(outputs(&records), vec!["0".to_string()]);
    }

    #[test]
    fn output_error_reports_then_clears() {
        let mut p = plotter();
        run(&mut p, "PA40000,0");
        let records = run(&mut p, "OE");
        assert_eq!(outputs(&records), vec!["3".to_string()]);
        assert_eq!(p.state().error, 0);
        let records = run(&mut p, "OE");
        assert_eq!(outputs(&records), vec!["0".to_string()]);
    }

    #[test]
    fn identity_and_factors() {
        let mut p = plotter();
        assert_eq!(outputs(&run(&mut p, "OI")), vec!["7470".to_string()]);
        assert_eq!(outputs(&run(&mut p, "OF")), vec!["40,40".to_string()]);
        assert_eq!(
            outputs(&run(&mut p, "OO")),
            vec!["0,1,0,0,1,0,0,0".to_string()]
        );
    }

    #[test]
    fn error_mask_suppresses_reporting_but_not_lost_mode() {
        let mut p = plotter();
        run(&mut p, "IM0");
        let records = run(&mut p, "PA40000,0");
        assert!(emsgs(&records).is_empty());
        assert_eq!(p.state().error, 0);
        assert!(p.state().lost);
        // IM without a value restores the default mask.
        run(&mut p, "IM");
        let records = run(&mut p, "PA40000,0");
        assert!(!emsgs(&records).is_empty());
    }

    #[test]
    fn select_pen_reports_changes_only() {
        let mut p = plotter();
        let records = run(&mut p, "SP1");
        assert!(records.contains(&Record::SetPen(1)));
        let records = run(&mut p, "SP1");
        assert!(!records.iter().any(|r| matches!(r, Record::SetPen(_))));
        let records = run(&mut p, "SP2");
        assert!(records.contains(&Record::SetPen(2)));
        // SP without a parameter stows the pen silently.
        let records = run(&mut p, "SP");
        assert!(!records.iter().any(|r| matches!(r, Record::SetPen(_))));
        assert_eq!(p.state().pen, 0);
    }

    #[test]
    fn digitizing_round_trip() {
        let mut p = plotter();
        let records = run(&mut p, "DP");
        assert!(records.contains(&Record::DigiStart));
        run(&mut p, "ZY123,456");
        assert!(p.state().status.contains(super::super::Status::DIGI_AVAILABLE));
        let records = run(&mut p, "OD");
        assert_eq!(outputs(&records), vec!["123,456,0".to_string()]);
        assert!(!p.state().status.contains(super::super::Status::DIGI_AVAILABLE));
        let records = run(&mut p, "DC");
        assert!(records.contains(&Record::DigiClear));
    }

    #[test]
    fn status_record_carries_the_terminator() {
        let mut p = plotter();
        run(&mut p, "DT#");
        let records = run(&mut p, "PU0,0");
        let status = records
            .iter()
            .find_map(|r| match r {
                Record::Status { term, .. } => Some(*term),
                _ => None,
            })
            .unwrap();
        assert_eq!(status, b'#');
    }

    #[test]
    fn compatibility_nops_do_nothing() {
        let mut p = plotter();
        for cmd in ["AF", "AH", "AP", "EC", "UC1,2,3", "VA", "VN"] {
            let records = run(&mut p, cmd);
            assert_eq!(records.len(), 2, "{cmd} produced records");
        }
    }
}
