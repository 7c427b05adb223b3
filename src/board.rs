//! Board state, FEN construction, make/unmake, and move generation.

use crate::attacks;
use crate::bitboard::{self, Bitboard};
use crate::error::BoardError;
use crate::types::{
    Color, Move, MoveFlag, MoveList, Piece, Square, BLACK_KINGSIDE, BLACK_QUEENSIDE,
    WHITE_KINGSIDE, WHITE_QUEENSIDE,
};
use crate::zobrist;

#[derive(Clone, Debug)]
pub struct Board {
    pub pieces: [[Bitboard; 6]; 2],
    pub occ: [Bitboard; 2],
    pub occ_all: Bitboard,
    pub side: Color,
    pub castling: u8,
    pub ep_square: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
    pub hash: u64,
    /// Zobrist key at every earlier ply of the current game, for repetition detection.
    history: Vec<u64>,
}

/// Everything `make_move` destroys that `unmake_move` needs back.
#[derive(Clone, Copy, Debug)]
pub struct Undo {
    captured: Option<Piece>,
    ep_square: Option<Square>,
    castling: u8,
    halfmove_clock: u16,
    hash: u64,
}

#[derive(Clone, Copy, Debug)]
pub struct NullUndo {
    ep_square: Option<Square>,
    hash: u64,
}

impl Board {
    pub fn startpos() -> Board {
        Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("startpos FEN is well-formed")
    }

    pub fn from_fen(fen: &str) -> Result<Board, BoardError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(BoardError::MalformedFen(fen.to_string()));
        }

        let mut pieces = [[0u64; 6]; 2];
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(BoardError::MalformedFen(fen.to_string()));
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as u8;
                    continue;
                }
                if file > 7 {
                    return Err(BoardError::MalformedFen(fen.to_string()));
                }
                let (color, piece) = char_to_piece(c).ok_or_else(|| BoardError::BadPieceChar(c))?;
                let sq = Square::from_rank_file(rank_idx as u8, file);
                pieces[color.index()][piece.index()] |= 1u64 << sq.index();
                file += 1;
            }
        }

        let side = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(BoardError::BadSideToMove(other.to_string())),
        };

        let mut castling = 0u8;
        if parts[2] != "-" {
            for c in parts[2].chars() {
                castling |= match c {
                    'K' => WHITE_KINGSIDE,
                    'Q' => WHITE_QUEENSIDE,
                    'k' => BLACK_KINGSIDE,
                    'q' => BLACK_QUEENSIDE,
                    other => return Err(BoardError::BadCastlingChar(other)),
                };
            }
        }

        let ep_square = if parts[3] == "-" {
            None
        } else {
            Some(Square::from_algebraic(parts[3]).ok_or_else(|| BoardError::BadEpSquare(parts[3].to_string()))?)
        };

        let halfmove_clock = parts.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);
        let fullmove_number = parts.get(5).and_then(|s| s.parse().ok()).unwrap_or(1);

        let occ = [
            pieces[0].iter().fold(0, |a, &b| a | b),
            pieces[1].iter().fold(0, |a, &b| a | b),
        ];
        let occ_all = occ[0] | occ[1];

        let mut board = Board {
            pieces,
            occ,
            occ_all,
            side,
            castling,
            ep_square,
            halfmove_clock,
            fullmove_number,
            hash: 0,
            history: Vec::new(),
        };
        board.hash = board.compute_hash();
        Ok(board)
    }

    fn compute_hash(&self) -> u64 {
        let mut hash = 0u64;
        for color_idx in 0..2 {
            for piece_idx in 0..6 {
                let mut bb = self.pieces[color_idx][piece_idx];
                while bb != 0 {
                    let sq = bitboard::pop_lsb(&mut bb);
                    hash ^= zobrist::piece_key(color_idx, piece_idx, sq as usize);
                }
            }
        }
        if self.side == Color::Black {
            hash ^= zobrist::side_to_move_key();
        }
        hash ^= zobrist::castling_key(self.castling);
        if let Some(ep) = self.ep_square {
            hash ^= zobrist::en_passant_key(ep.file());
        }
        hash
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let bit = 1u64 << sq.index();
        for color_idx in 0..2 {
            for piece_idx in 0..6 {
                if self.pieces[color_idx][piece_idx] & bit != 0 {
                    let color = if color_idx == 0 { Color::White } else { Color::Black };
                    return Some((color, Piece::from_index(piece_idx)));
                }
            }
        }
        None
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        let bb = self.pieces[color.index()][Piece::King.index()];
        debug_assert_ne!(bb, 0, "board has no king for {color:?}");
        Square::new(bitboard::lsb(bb))
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_square(color), color.opposite())
    }

    pub fn in_check(&self) -> bool {
        self.is_in_check(self.side)
    }

    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let idx = sq.index();
        let attacker = by.index();

        if attacks::pawn_attacks(by.opposite(), idx) & self.pieces[attacker][Piece::Pawn.index()] != 0 {
            return true;
        }
        if attacks::knight_attacks(idx) & self.pieces[attacker][Piece::Knight.index()] != 0 {
            return true;
        }
        if attacks::king_attacks(idx) & self.pieces[attacker][Piece::King.index()] != 0 {
            return true;
        }
        let bishop_like =
            self.pieces[attacker][Piece::Bishop.index()] | self.pieces[attacker][Piece::Queen.index()];
        if attacks::bishop_attacks(idx, self.occ_all) & bishop_like != 0 {
            return true;
        }
        let rook_like =
            self.pieces[attacker][Piece::Rook.index()] | self.pieces[attacker][Piece::Queen.index()];
        if attacks::rook_attacks(idx, self.occ_all) & rook_like != 0 {
            return true;
        }
        false
    }

    /// True when neither side has enough material to deliver checkmate.
    pub fn insufficient_material(&self) -> bool {
        let non_king_non_pawn = self.occ_all
            & !(self.pieces[0][Piece::King.index()] | self.pieces[1][Piece::King.index()])
            & !(self.pieces[0][Piece::Pawn.index()] | self.pieces[1][Piece::Pawn.index()]);
        if self.pieces[0][Piece::Pawn.index()] != 0 || self.pieces[1][Piece::Pawn.index()] != 0 {
            return false;
        }
        if self.pieces[0][Piece::Rook.index()] != 0
            || self.pieces[1][Piece::Rook.index()] != 0
            || self.pieces[0][Piece::Queen.index()] != 0
            || self.pieces[1][Piece::Queen.index()] != 0
        {
            return false;
        }
        // Only knights/bishops left: a lone minor (or no minors at all) can't mate.
        bitboard::popcount(non_king_non_pawn) <= 1
    }

    /// ≥2 prior occurrences of the current hash in this game's history.
    pub fn is_repetition(&self) -> bool {
        self.history.iter().filter(|&&h| h == self.hash).count() >= 2
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    // ---- make/unmake -------------------------------------------------

    pub fn make_move(&mut self, m: Move) -> Undo {
        self.history.push(self.hash);

        let from = m.from();
        let to = m.to();
        let us = self.side;
        let them = us.opposite();
        let us_idx = us.index();
        let them_idx = them.index();
        let flag = m.flag();

        let moving_piece = self.piece_at(from).map(|(_, p)| p).unwrap_or_else(|| {
            debug_assert!(false, "make_move called with no piece on the from-square");
            Piece::Pawn
        });

        let prev_ep = self.ep_square;
        let prev_castling = self.castling;
        let prev_halfmove = self.halfmove_clock;
        let prev_hash = self.hash;

        self.hash ^= zobrist::side_to_move_key();
        if let Some(ep) = prev_ep {
            self.hash ^= zobrist::en_passant_key(ep.file());
        }

        let mut captured = None;
        if flag == MoveFlag::EnPassant {
            let cap_sq = Square::from_rank_file(from.rank(), to.file());
            self.remove_piece(them_idx, Piece::Pawn.index(), cap_sq);
            captured = Some(Piece::Pawn);
        } else if flag.is_capture() {
            let (_, cap_piece) = self.piece_at(to).unwrap_or_else(|| {
                debug_assert!(false, "capture flag with empty target");
                (them, Piece::Pawn)
            });
            self.remove_piece(them_idx, cap_piece.index(), to);
            captured = Some(cap_piece);
        }

        self.move_piece(us_idx, moving_piece.index(), from, to);

        if let Some(promo) = flag.promotion_piece() {
            self.remove_piece(us_idx, moving_piece.index(), to);
            self.add_piece(us_idx, promo.index(), to);
        }

        match flag {
            MoveFlag::KingCastle => {
                let rank = from.rank();
                self.move_piece(us_idx, Piece::Rook.index(), Square::from_rank_file(rank, 7), Square::from_rank_file(rank, 5));
            }
            MoveFlag::QueenCastle => {
                let rank = from.rank();
                self.move_piece(us_idx, Piece::Rook.index(), Square::from_rank_file(rank, 0), Square::from_rank_file(rank, 3));
            }
            _ => {}
        }

        self.ep_square = if flag == MoveFlag::DoublePush {
            let ep_rank = (from.rank() + to.rank()) / 2;
            Some(Square::from_rank_file(ep_rank, from.file()))
        } else {
            None
        };
        if let Some(ep) = self.ep_square {
            self.hash ^= zobrist::en_passant_key(ep.file());
        }

        self.castling &= !castling_loss_mask(from) & !castling_loss_mask(to);
        self.hash ^= zobrist::castling_key(prev_castling);
        self.hash ^= zobrist::castling_key(self.castling);

        self.halfmove_clock = if moving_piece == Piece::Pawn || captured.is_some() {
            0
        } else {
            prev_halfmove + 1
        };

        self.side = them;

        Undo { captured, ep_square: prev_ep, castling: prev_castling, halfmove_clock: prev_halfmove, hash: prev_hash }
    }

    pub fn unmake_move(&mut self, m: Move, undo: Undo) {
        self.history.pop();

        self.side = self.side.opposite();
        let us = self.side;
        let them = us.opposite();
        let us_idx = us.index();
        let them_idx = them.index();

        let from = m.from();
        let to = m.to();
        let flag = m.flag();

        if let Some(promo) = flag.promotion_piece() {
            self.remove_piece(us_idx, promo.index(), to);
            self.add_piece(us_idx, Piece::Pawn.index(), to);
        }

        let moved_piece = if flag.is_promotion() {
            Piece::Pawn
        } else {
            self.piece_at(to).map(|(_, p)| p).unwrap_or_else(|| {
                debug_assert!(false, "unmake: no piece on to-square");
                Piece::Pawn
            })
        };
        self.move_piece(us_idx, moved_piece.index(), to, from);

        match flag {
            MoveFlag::KingCastle => {
                let rank = from.rank();
                self.move_piece(us_idx, Piece::Rook.index(), Square::from_rank_file(rank, 5), Square::from_rank_file(rank, 7));
            }
            MoveFlag::QueenCastle => {
                let rank = from.rank();
                self.move_piece(us_idx, Piece::Rook.index(), Square::from_rank_file(rank, 3), Square::from_rank_file(rank, 0));
            }
            _ => {}
        }

        if let Some(captured) = undo.captured {
            let cap_sq = if flag == MoveFlag::EnPassant {
                Square::from_rank_file(from.rank(), to.file())
            } else {
                to
            };
            self.add_piece(them_idx, captured.index(), cap_sq);
        }

        self.ep_square = undo.ep_square;
        self.castling = undo.castling;
        self.halfmove_clock = undo.halfmove_clock;
        self.hash = undo.hash;
    }

    pub fn do_null(&mut self) -> NullUndo {
        let prev = NullUndo { ep_square: self.ep_square, hash: self.hash };
        self.hash ^= zobrist::side_to_move_key();
        if let Some(ep) = self.ep_square {
            self.hash ^= zobrist::en_passant_key(ep.file());
            self.ep_square = None;
        }
        self.side = self.side.opposite();
        self.history.push(prev.hash);
        prev
    }

    pub fn undo_null(&mut self, undo: NullUndo) {
        self.history.pop();
        self.side = self.side.opposite();
        self.ep_square = undo.ep_square;
        self.hash = undo.hash;
    }

    /// Non-pawn, non-king material remains for the side to move — the
    /// null-move zugzwang gate from spec.md S6.
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        let idx = color.index();
        (self.pieces[idx][Piece::Knight.index()]
            | self.pieces[idx][Piece::Bishop.index()]
            | self.pieces[idx][Piece::Rook.index()]
            | self.pieces[idx][Piece::Queen.index()])
            != 0
    }

    #[inline]
    fn add_piece(&mut self, color_idx: usize, piece_idx: usize, sq: Square) {
        let bit = 1u64 << sq.index();
        self.pieces[color_idx][piece_idx] |= bit;
        self.occ[color_idx] |= bit;
        self.occ_all |= bit;
        self.hash ^= zobrist::piece_key(color_idx, piece_idx, sq.index());
    }

    #[inline]
    fn remove_piece(&mut self, color_idx: usize, piece_idx: usize, sq: Square) {
        let bit = 1u64 << sq.index();
        self.pieces[color_idx][piece_idx] &= !bit;
        self.occ[color_idx] &= !bit;
        self.occ_all &= !bit;
        self.hash ^= zobrist::piece_key(color_idx, piece_idx, sq.index());
    }

    #[inline]
    fn move_piece(&mut self, color_idx: usize, piece_idx: usize, from: Square, to: Square) {
        let mask = (1u64 << from.index()) | (1u64 << to.index());
        self.pieces[color_idx][piece_idx] ^= mask;
        self.occ[color_idx] ^= mask;
        self.occ_all ^= mask;
        self.hash ^= zobrist::piece_key(color_idx, piece_idx, from.index());
        self.hash ^= zobrist::piece_key(color_idx, piece_idx, to.index());
    }

    // ---- move generation ----------------------------------------------

    pub fn generate_pseudo_legal(&self, list: &mut MoveList) {
        self.generate_pawn_moves(list, false);
        self.generate_piece_moves(list, false);
        self.generate_castling_moves(list);
    }

    /// Captures, en-passant, and queen promotions only — for quiescence.
    pub fn generate_captures(&self, list: &mut MoveList) {
        self.generate_pawn_moves(list, true);
        self.generate_piece_moves(list, true);
    }

    pub fn generate_legal(&self, list: &mut MoveList) {
        let mut pseudo = MoveList::new();
        self.generate_pseudo_legal(&mut pseudo);
        for &m in pseudo.as_slice() {
            if self.is_legal(m) {
                list.push(m);
            }
        }
    }

    pub fn is_legal(&self, m: Move) -> bool {
        if m.is_castling() {
            let them = self.side.opposite();
            let from = m.from();
            let to = m.to();
            let mid = Square::from_rank_file(from.rank(), (from.file() + to.file()) / 2);
            if self.is_square_attacked(from, them)
                || self.is_square_attacked(mid, them)
                || self.is_square_attacked(to, them)
            {
                return false;
            }
            return true;
        }
        let mut board = self.clone();
        let us = board.side;
        let undo = board.make_move(m);
        let legal = !board.is_in_check(us);
        board.unmake_move(m, undo);
        legal
    }

    fn generate_pawn_moves(&self, list: &mut MoveList, captures_only: bool) {
        let us = self.side;
        let us_idx = us.index();
        let them_idx = us.opposite().index();
        let pawns = self.pieces[us_idx][Piece::Pawn.index()];
        let (push_dir, start_rank, promo_rank): (i32, u8, u8) = match us {
            Color::White => (-1, 6, 0),
            Color::Black => (1, 1, 7),
        };

        let mut bb = pawns;
        while bb != 0 {
            let from_idx = bitboard::pop_lsb(&mut bb);
            let from = Square::new(from_idx);
            let rank = from.rank() as i32;
            let file = from.file() as i32;

            if !captures_only {
                let one_rank = rank + push_dir;
                if (0..8).contains(&one_rank) {
                    let one = Square::from_rank_file(one_rank as u8, file as u8);
                    if self.occ_all & (1u64 << one.index()) == 0 {
                        if one.rank() == promo_rank {
                            push_promotions(list, from, one, false);
                        } else {
                            list.push(Move::new(from, one, MoveFlag::Quiet));
                            if rank == start_rank as i32 {
                                let two_rank = rank + 2 * push_dir;
                                let two = Square::from_rank_file(two_rank as u8, file as u8);
                                if self.occ_all & (1u64 << two.index()) == 0 {
                                    list.push(Move::new(from, two, MoveFlag::DoublePush));
                                }
                            }
                        }
                    }
                }
            }

            for df in [-1i32, 1] {
                let cap_file = file + df;
                let cap_rank = rank + push_dir;
                if !(0..8).contains(&cap_file) || !(0..8).contains(&cap_rank) {
                    continue;
                }
                let target = Square::from_rank_file(cap_rank as u8, cap_file as u8);
                let target_bit = 1u64 << target.index();
                if self.occ[them_idx] & target_bit != 0 {
                    if target.rank() == promo_rank {
                        push_promotions(list, from, target, true);
                    } else {
                        list.push(Move::new(from, target, MoveFlag::Capture));
                    }
                } else if Some(target) == self.ep_square {
                    list.push(Move::new(from, target, MoveFlag::EnPassant));
                }
            }
        }
    }

    fn generate_piece_moves(&self, list: &mut MoveList, captures_only: bool) {
        let us = self.side;
        let us_idx = us.index();
        let them_idx = us.opposite().index();

        for &piece in &[Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King] {
            let mut bb = self.pieces[us_idx][piece.index()];
            while bb != 0 {
                let from_idx = bitboard::pop_lsb(&mut bb);
                let from = Square::new(from_idx);
                let attack_bb = match piece {
                    Piece::Knight => attacks::knight_attacks(from_idx as usize),
                    Piece::Bishop => attacks::bishop_attacks(from_idx as usize, self.occ_all),
                    Piece::Rook => attacks::rook_attacks(from_idx as usize, self.occ_all),
                    Piece::Queen => attacks::queen_attacks(from_idx as usize, self.occ_all),
                    Piece::King => attacks::king_attacks(from_idx as usize),
                    Piece::Pawn => unreachable!(),
                };
                let own_blocked = attack_bb & !self.occ[us_idx];
                let captures = own_blocked & self.occ[them_idx];
                let mut caps = captures;
                while caps != 0 {
                    let to_idx = bitboard::pop_lsb(&mut caps);
                    list.push(Move::new(from, Square::new(to_idx), MoveFlag::Capture));
                }
                if !captures_only {
                    let mut quiets = own_blocked & !self.occ[them_idx];
                    while quiets != 0 {
                        let to_idx = bitboard::pop_lsb(&mut quiets);
                        list.push(Move::new(from, Square::new(to_idx), MoveFlag::Quiet));
                    }
                }
            }
        }
    }

    fn generate_castling_moves(&self, list: &mut MoveList) {
        let us = self.side;
        let rank = match us {
            Color::White => 7u8,
            Color::Black => 0u8,
        };
        let (ks_right, qs_right) = match us {
            Color::White => (WHITE_KINGSIDE, WHITE_QUEENSIDE),
            Color::Black => (BLACK_KINGSIDE, BLACK_QUEENSIDE),
        };
        let king_sq = Square::from_rank_file(rank, 4);
        if self.piece_at(king_sq) != Some((us, Piece::King)) {
            return;
        }

        if self.castling & ks_right != 0 {
            let f = Square::from_rank_file(rank, 5);
            let g = Square::from_rank_file(rank, 6);
            let h = Square::from_rank_file(rank, 7);
            if self.piece_at(h) == Some((us, Piece::Rook))
                && self.occ_all & (1u64 << f.index()) == 0
                && self.occ_all & (1u64 << g.index()) == 0
            {
                list.push(Move::new(king_sq, g, MoveFlag::KingCastle));
            }
        }
        if self.castling & qs_right != 0 {
            let d = Square::from_rank_file(rank, 3);
            let c = Square::from_rank_file(rank, 2);
            let b = Square::from_rank_file(rank, 1);
            let a = Square::from_rank_file(rank, 0);
            if self.piece_at(a) == Some((us, Piece::Rook))
                && self.occ_all & (1u64 << d.index()) == 0
                && self.occ_all & (1u64 << c.index()) == 0
                && self.occ_all & (1u64 << b.index()) == 0
            {
                list.push(Move::new(king_sq, c, MoveFlag::QueenCastle));
            }
        }
    }

    #[cfg(test)]
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let mut list = MoveList::new();
        self.generate_legal(&mut list);
        if depth == 1 {
            return list.len() as u64;
        }
        let mut nodes = 0u64;
        for &m in list.as_slice() {
            let undo = self.make_move(m);
            nodes += self.perft(depth - 1);
            self.unmake_move(m, undo);
        }
        nodes
    }
}

fn push_promotions(list: &mut MoveList, from: Square, to: Square, capture: bool) {
    let flags = if capture {
        [
            MoveFlag::PromoQueenCapture,
            MoveFlag::PromoRookCapture,
            MoveFlag::PromoBishopCapture,
            MoveFlag::PromoKnightCapture,
        ]
    } else {
        [MoveFlag::PromoQueen, MoveFlag::PromoRook, MoveFlag::PromoBishop, MoveFlag::PromoKnight]
    };
    for flag in flags {
        list.push(Move::new(from, to, flag));
    }
}

fn castling_loss_mask(sq: Square) -> u8 {
    match sq.0 {
        0 => BLACK_QUEENSIDE,  // a8
        4 => BLACK_KINGSIDE | BLACK_QUEENSIDE, // e8
        7 => BLACK_KINGSIDE,   // h8
        56 => WHITE_QUEENSIDE, // a1
        60 => WHITE_KINGSIDE | WHITE_QUEENSIDE, // e1
        63 => WHITE_KINGSIDE,  // h1
        _ => 0,
    }
}

fn char_to_piece(c: char) -> Option<(Color, Piece)> {
    let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
    let piece = match c.to_ascii_lowercase() {
        'p' => Piece::Pawn,
        'n' => Piece::Knight,
        'b' => Piece::Bishop,
        'r' => Piece::Rook,
        'q' => Piece::Queen,
        'k' => Piece::King,
        _ => return None,
    };
    Some((color, piece))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_has_twenty_moves() {
        let board = Board::startpos();
        let mut list = MoveList::new();
        board.generate_legal(&mut list);
        assert_eq!(list.len(), 20);
    }

    #[test]
    fn make_unmake_restores_hash_and_occupancy() {
        let mut board = Board::startpos();
        let mut list = MoveList::new();
        board.generate_legal(&mut list);
        for &m in list.as_slice() {
            let before = board.clone();
            let undo = board.make_move(m);
            board.unmake_move(m, undo);
            assert_eq!(board.hash, before.hash);
            assert_eq!(board.occ_all, before.occ_all);
            assert_eq!(board.pieces, before.pieces);
        }
    }

    #[test]
    fn perft_startpos_depth_3() {
        let mut board = Board::startpos();
        assert_eq!(board.perft(1), 20);
        assert_eq!(board.perft(2), 400);
        assert_eq!(board.perft(3), 8_902);
    }

    #[test]
    fn perft_startpos_depth_4() {
        let mut board = Board::startpos();
        assert_eq!(board.perft(4), 197_281);
    }

    #[test]
    fn perft_kiwipete_depth_3() {
        let mut board =
            Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
                .unwrap();
        assert_eq!(board.perft(1), 48);
        assert_eq!(board.perft(2), 2_039);
        assert_eq!(board.perft(3), 97_862);
    }

    #[test]
    fn en_passant_capture_is_generated() {
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let mut list = MoveList::new();
        board.generate_legal(&mut list);
        assert!(list
            .as_slice()
            .iter()
            .any(|m| m.flag() == MoveFlag::EnPassant));
    }

    #[test]
    fn castling_through_check_is_illegal() {
        // White king e1, rook h1, black rook on f8 attacks f1 (the castling-through square).
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let mut list = MoveList::new();
        board.generate_legal(&mut list);
        assert!(list.as_slice().iter().any(|m| m.flag() == MoveFlag::KingCastle));

        let board_blocked = Board::from_fen("4kr2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let mut list2 = MoveList::new();
        board_blocked.generate_legal(&mut list2);
        assert!(!list2.as_slice().iter().any(|m| m.flag() == MoveFlag::KingCastle));
    }

    #[test]
    fn insufficient_material_lone_kings() {
        let board = Board::from_fen("4k3/8/4K3/8/8/8/8/8 w - - 0 1").unwrap();
        assert!(board.insufficient_material());
    }

    #[test]
    fn mate_in_one_position_is_checkmate_after_best_move() {
        let mut board = Board::from_fen("4k3/8/4K3/8/8/8/8/R7 w - - 0 1").unwrap();
        let a1a8 = Move::new(Square::from_algebraic("a1").unwrap(), Square::from_algebraic("a8").unwrap(), MoveFlag::Quiet);
        let undo = board.make_move(a1a8);
        let mut replies = MoveList::new();
        board.generate_legal(&mut replies);
        assert!(replies.is_empty());
        assert!(board.is_in_check(board.side));
        board.unmake_move(a1a8, undo);
    }
}
