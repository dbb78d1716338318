//! Property tests for track numbering and move legality.

use proptest::prelude::*;
use strictly_ludo::{
    global_position, is_safe, path_index, relative_position, Color, DieValue, MatchBuilder,
    MatchConfig, Piece, PieceId, ScriptedDice, HOME_POSITION, LAST_TRACK_POSITION,
    START_POSITION, TRACK_LENGTH,
};

fn color() -> impl Strategy<Value = Color> {
    prop_oneof![Just(Color::A), Just(Color::B), Just(Color::C), Just(Color::D)]
}

proptest! {
    #[test]
    fn global_position_round_trips(color in color(), relative in 0..=LAST_TRACK_POSITION) {
        let global = global_position(color, relative).expect("on track");
        prop_assert!((global as i8) < TRACK_LENGTH);
        prop_assert_eq!(relative_position(color, global), relative);
    }

    #[test]
    fn off_track_positions_have_no_global(color in color(), relative in (HOME_POSITION - 6)..=HOME_POSITION) {
        prop_assert_eq!(global_position(color, relative), None);
        prop_assert_eq!(path_index(color, relative), None);
        prop_assert!(is_safe(color, relative));
    }

    #[test]
    fn colors_share_global_cells(a in color(), b in color(), relative in 0..=LAST_TRACK_POSITION) {
        let global = global_position(a, relative).expect("on track");
        let theirs = relative_position(b, global);
        // The cell just behind a color's start is never on that color's route.
        prop_assume!(theirs <= LAST_TRACK_POSITION);
        prop_assert_eq!(global_position(b, theirs), Some(global));
        prop_assert_eq!(is_safe(a, relative), is_safe(b, theirs));
    }

    #[test]
    fn moves_never_pass_home(relative in 0..=HOME_POSITION, face in 1u8..=6) {
        let roll = DieValue::new(face).expect("valid die");
        let piece = placed(relative);
        let expected = (relative + face as i8 <= HOME_POSITION).then_some(relative + face as i8);
        prop_assert_eq!(piece.relative(), relative);
        prop_assert_eq!(piece.target(roll), expected);
        prop_assert_eq!(piece.can_move(roll), expected.is_some());
    }

    #[test]
    fn leaving_start_needs_six(face in 1u8..=6) {
        let roll = DieValue::new(face).expect("valid die");
        let piece = placed(START_POSITION);
        prop_assert!(piece.in_start_area());
        prop_assert_eq!(piece.target(roll), roll.is_six().then_some(0));
    }
}

fn placed(relative: i8) -> Piece {
    let id = PieceId::new(Color::A, 0);
    let controller = MatchBuilder::new(MatchConfig::new(2))
        .dice(ScriptedDice::new(&[1]).expect("valid script"))
        .position(id, relative)
        .build()
        .expect("valid match");
    *controller.table().piece(id).expect("piece exists")
}
