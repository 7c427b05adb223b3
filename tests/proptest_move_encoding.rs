//! Property-based checks for the packed move representation and for
//! make/unmake reversibility under randomly chosen legal move sequences.

use proptest::prelude::*;

use chess_core::board::Board;
use chess_core::types::{Move, MoveFlag, Square};

fn arb_square() -> impl Strategy<Value = Square> {
    (0u8..64).prop_map(Square::new)
}

fn arb_flag() -> impl Strategy<Value = MoveFlag> {
    prop_oneof![
        Just(MoveFlag::Quiet),
        Just(MoveFlag::DoublePush),
        Just(MoveFlag::KingCastle),
        Just(MoveFlag::QueenCastle),
        Just(MoveFlag::Capture),
        Just(MoveFlag::EnPassant),
        Just(MoveFlag::PromoKnight),
        Just(MoveFlag::PromoBishop),
        Just(MoveFlag::PromoRook),
        Just(MoveFlag::PromoQueen),
        Just(MoveFlag::PromoKnightCapture),
        Just(MoveFlag::PromoBishopCapture),
        Just(MoveFlag::PromoRookCapture),
        Just(MoveFlag::PromoQueenCapture),
    ]
}

proptest! {
    #[test]
    fn move_packing_roundtrips_for_any_from_to_flag(
        from in arb_square(),
        to in arb_square(),
        flag in arb_flag(),
    ) {
        let m = Move::new(from, to, flag);
        prop_assert_eq!(m.from(), from);
        prop_assert_eq!(m.to(), to);
        prop_assert_eq!(m.flag(), flag);
    }

    /// Applying any sequence of legal moves from the start position and then
    /// unmaking them in reverse order must restore the original board exactly.
    #[test]
    fn make_unmake_is_reversible_along_random_legal_lines(choices in proptest::collection::vec(0usize..64, 0..6)) {
        let mut board = Board::startpos();
        let original = board.clone();
        let mut undo_stack = Vec::new();

        for choice in choices {
            let mut list = chess_core::types::MoveList::new();
            board.generate_legal(&mut list);
            if list.is_empty() {
                break;
            }
            let m = list.get(choice % list.len());
            let undo = board.make_move(m);
            undo_stack.push((m, undo));
        }

        while let Some((m, undo)) = undo_stack.pop() {
            board.unmake_move(m, undo);
        }

        prop_assert_eq!(board.hash, original.hash);
        prop_assert_eq!(board.occ_all, original.occ_all);
        prop_assert_eq!(board.pieces, original.pieces);
        prop_assert_eq!(board.side, original.side);
    }
}
