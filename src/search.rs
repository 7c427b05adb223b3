//! Iterative deepening, negamax with alpha-beta pruning, and quiescence.
//!
//! The pruning/reduction formulas (null-move `R`, LMR, LMP, SEE pruning,
//! futility, singular extensions) are carried over from the reference
//! engine's `search.c` almost verbatim — they are tuned as a package and
//! don't make sense picked apart.

use std::sync::LazyLock;
use std::time::Instant;

use crate::board::Board;
use crate::config::SearchConfig;
use crate::control::{Stopper, POLL_INTERVAL};
use crate::eval;
use crate::info::SearchInfo;
use crate::ordering::{self, MovePicker, OrderingContext};
use crate::see;
use crate::tt::{BoundType, TranspositionTable};
use crate::types::{Move, MoveList, MATE_SCORE, MATE_THRESHOLD};

const MAX_SEARCH_PLY: usize = 100;
const MAX_MOVE_INDEX: usize = 64;

const FUTILITY_MARGIN: i32 = 85;
const SEE_PRUNE_CAPTURE_CUTOFF: i32 = -70;
const SEE_PRUNE_CUTOFF: i32 = -20;
const DELTA_CUTOFF: i32 = 200;

static LMR_TABLE: LazyLock<[[i32; MAX_MOVE_INDEX]; MAX_SEARCH_PLY]> = LazyLock::new(|| {
    let mut table = [[0i32; MAX_MOVE_INDEX]; MAX_SEARCH_PLY];
    for depth in 1..MAX_SEARCH_PLY {
        for moves in 1..MAX_MOVE_INDEX {
            let d = depth as f32;
            let m = moves as f32;
            table[depth][moves] = (0.6 + d.ln() * (1.2 * m).ln() / 2.5) as i32;
        }
    }
    table
});

static LMP_TABLE: LazyLock<[[i32; MAX_SEARCH_PLY]; 2]> = LazyLock::new(|| {
    let mut table = [[0i32; MAX_SEARCH_PLY]; 2];
    for depth in 0..MAX_SEARCH_PLY {
        let d = depth as i32;
        table[0][depth] = (3 + d * d) / 2;
        table[1][depth] = 3 + d * d;
    }
    table
});

static SEE_PRUNE_TABLE: LazyLock<[[i32; MAX_SEARCH_PLY]; 2]> = LazyLock::new(|| {
    let mut table = [[0i32; MAX_SEARCH_PLY]; 2];
    for depth in 0..MAX_SEARCH_PLY {
        let d = depth as i32;
        table[0][depth] = SEE_PRUNE_CUTOFF * d * d;
        table[1][depth] = SEE_PRUNE_CAPTURE_CUTOFF * d;
    }
    table
});

static FUTILITY_TABLE: LazyLock<[i32; MAX_SEARCH_PLY]> = LazyLock::new(|| {
    let mut table = [0i32; MAX_SEARCH_PLY];
    for (depth, slot) in table.iter_mut().enumerate() {
        *slot = FUTILITY_MARGIN * depth as i32;
    }
    table
});

/// Mutable search-wide state threaded through the recursive tree: move
/// ordering heuristics, the cancellation oracle, and per-ply scratch space
/// that would otherwise need re-allocating at every node.
///
/// `pv_table`/`pv_len` implement a triangular PV table: node at `ply` writes
/// its best line into `pv_table[ply]` by copying `pv_table[ply + 1]` in
/// behind its own move. The table is allocated once here and reused for
/// every node, so collecting a PV costs no heap allocation during search.
pub struct SearchState {
    pub ordering: OrderingContext,
    pub stopper: Stopper,
    evals: Vec<i32>,
    move_stack: Vec<Move>,
    skip_stack: Vec<Move>,
    pv_table: Vec<[Move; MAX_SEARCH_PLY + 1]>,
    pv_len: Vec<usize>,
    pub seldepth: u32,
    stopped: bool,
}

impl SearchState {
    pub fn new(stopper: Stopper) -> SearchState {
        SearchState {
            ordering: OrderingContext::new(MAX_SEARCH_PLY),
            stopper,
            evals: vec![0; MAX_SEARCH_PLY + 1],
            move_stack: vec![Move::NULL; MAX_SEARCH_PLY + 1],
            skip_stack: vec![Move::NULL; MAX_SEARCH_PLY + 1],
            pv_table: vec![[Move::NULL; MAX_SEARCH_PLY + 1]; MAX_SEARCH_PLY + 1],
            pv_len: vec![0; MAX_SEARCH_PLY + 1],
            seldepth: 0,
            stopped: false,
        }
    }

    fn poll(&mut self, nodes: u64) -> bool {
        if self.stopped {
            return true;
        }
        if nodes % POLL_INTERVAL == 0 && self.stopper.should_stop() {
            self.stopped = true;
        }
        self.stopped
    }

    /// Copies `ply + 1`'s line behind `m` into `ply`'s row of the PV table.
    fn update_pv(&mut self, ply: usize, m: Move) {
        self.pv_table[ply][0] = m;
        let child_len = self.pv_len[ply + 1];
        let (head, tail) = self.pv_table.split_at_mut(ply + 1);
        head[ply][1..=child_len].copy_from_slice(&tail[0][..child_len]);
        self.pv_len[ply] = child_len + 1;
    }

    fn pv_at(&self, ply: usize) -> &[Move] {
        &self.pv_table[ply][..self.pv_len[ply]]
    }
}

fn static_eval(board: &Board) -> i32 {
    let score = eval::evaluate(board);
    if board.side == crate::types::Color::White {
        score
    } else {
        -score
    }
}

/// Negamax with alpha-beta pruning over a `[alpha, beta)` window. The
/// principal variation is written into `state.pv_table[ply]`, not returned,
/// so the recursion never allocates — see `SearchState::update_pv`.
#[allow(clippy::too_many_arguments)]
pub fn negamax(
    board: &mut Board,
    tt: &mut TranspositionTable,
    state: &mut SearchState,
    config: &SearchConfig,
    ply: u32,
    mut depth: i32,
    mut alpha: i32,
    mut beta: i32,
) -> i32 {
    state.pv_len[ply as usize] = 0;

    if depth <= 0 {
        return quiesce(board, tt, state, ply, alpha, beta);
    }

    let is_pv = beta - alpha != 1;
    let is_root = ply == 0;
    let skip_move = state.skip_stack[ply as usize];

    let nodes = state.stopper.node_visited();
    state.seldepth = state.seldepth.max(ply);
    if state.poll(nodes) {
        return 0;
    }

    if !is_root {
        if board.is_repetition() || board.is_fifty_move_draw() || board.insufficient_material() {
            return 0;
        }
        if ply as usize > MAX_SEARCH_PLY - 1 {
            return static_eval(board);
        }
        alpha = alpha.max(-MATE_SCORE + ply as i32);
        beta = beta.min(MATE_SCORE - ply as i32 - 1);
        if alpha >= beta {
            return alpha;
        }
    }

    let in_check = board.in_check();

    let mut hash_move = Move::NULL;
    let tt_entry = if skip_move.is_null() { tt.probe(board.hash, ply) } else { None };
    if let Some(ref entry) = tt_entry {
        if entry.depth() >= depth as u32 {
            let score = entry.score();
            match entry.bound_type() {
                BoundType::Exact => return score,
                BoundType::LowerBound if score >= beta => return score,
                BoundType::UpperBound if score <= alpha => return score,
                _ => {}
            }
        }
        if let Some(m) = entry.best_move() {
            hash_move = m;
        }
    }

    // The TT's stored score is a search result (possibly mate-adjusted,
    // possibly from a different window) rather than a static evaluation,
    // so pruning decisions below always fall back to a fresh static eval.
    let mut eval_score = static_eval(board);
    if let Some(ref entry) = tt_entry {
        let tt_score = entry.score();
        let tighter = match entry.bound_type() {
            BoundType::Exact => true,
            BoundType::LowerBound => tt_score > eval_score,
            BoundType::UpperBound => tt_score < eval_score,
        };
        if tighter {
            eval_score = tt_score;
        }
    }
    state.evals[ply as usize] = eval_score;
    let improving =
        ply >= 2 && !in_check && state.evals[ply as usize] > state.evals[ply as usize - 2];

    state.skip_stack[ply as usize + 1] = Move::NULL;
    state.ordering.clear_child_killers(ply as usize + 1);

    if !is_pv && !in_check {
        // Reverse futility / static null-move pruning.
        if config.futility
            && depth <= 6
            && eval_score - FUTILITY_TABLE[depth as usize] >= beta
            && eval_score.abs() < MATE_THRESHOLD
        {
            return eval_score;
        }

        // Null-move pruning: skip our move entirely and see if the
        // opponent still can't escape beta, provided we aren't in
        // zugzwang danger (no non-pawn material left).
        let parent_move = state.move_stack[ply.saturating_sub(1) as usize];
        if config.null_move
            && depth >= 3
            && !parent_move.is_null()
            && skip_move.is_null()
            && eval_score >= beta
            && board.has_non_pawn_material(board.side)
        {
            let r = (3 + depth / 6 + ((eval_score - beta) / 200).min(3)).min(depth);
            state.move_stack[ply as usize] = Move::NULL;
            let undo = board.do_null();
            let score = -negamax(board, tt, state, config, ply + 1, depth - 1 - r, -beta, -beta + 1);
            board.undo_null(undo);
            if state.stopped {
                return 0;
            }
            if score >= beta {
                return beta;
            }
        }
    }

    let mut list = MoveList::new();
    board.generate_legal(&mut list);

    if list.is_empty() {
        return if in_check { -MATE_SCORE + ply as i32 } else { 0 };
    }

    let mut picker = MovePicker::new(
        &state.ordering,
        board,
        &mut list,
        ply as usize,
        hash_move,
        state.move_stack[ply.saturating_sub(1) as usize],
    );

    let original_alpha = alpha;
    let mut best_score = -MATE_SCORE - 1;
    let mut best_move = Move::NULL;
    let mut num_moves = 0;

    while let Some((m, move_score)) = picker.next() {
        if m == skip_move {
            continue;
        }

        let tactical = m.is_capture() || m.promotion_piece().is_some();

        if !is_pv && best_score > -MATE_SCORE / 2 {
            if depth <= 8 && !tactical && num_moves >= LMP_TABLE[improving as usize][depth.max(0) as usize] {
                continue;
            }
            if config.see_pruning
                && see::see_capture(board, m) < SEE_PRUNE_TABLE[tactical as usize][depth.max(0) as usize]
            {
                continue;
            }
        }

        let mut singular_extension = 0;
        if config.singular_extensions
            && depth >= 8
            && skip_move.is_null()
            && !is_root
            && m == hash_move
            && tt_entry.as_ref().map(|e| e.depth() as i32 >= depth - 3).unwrap_or(false)
            && tt_entry.as_ref().map(|e| e.score().abs() < MATE_THRESHOLD).unwrap_or(false)
            && tt_entry.as_ref().map(|e| e.bound_type() == BoundType::LowerBound).unwrap_or(false)
        {
            let tt_score = tt_entry.as_ref().unwrap().score();
            let s_beta = (tt_score - depth * 2).max(-MATE_SCORE);
            let s_depth = depth / 2 - 1;
            state.skip_stack[ply as usize] = m;
            let score = negamax(board, tt, state, config, ply, s_depth, s_beta - 1, s_beta);
            state.skip_stack[ply as usize] = Move::NULL;
            if score < s_beta {
                singular_extension = 1;
            } else if s_beta >= beta {
                return s_beta;
            }
        }

        num_moves += 1;
        state.move_stack[ply as usize] = m;
        let undo = board.make_move(m);
        let child_in_check = board.in_check();

        let mut new_depth = depth;
        if singular_extension == 1 || child_in_check {
            new_depth += 1;
        }

        let mut r = 1;
        if config.lmr && depth >= 2 && num_moves > 1 && !tactical {
            r = LMR_TABLE[(depth.max(0) as usize).min(MAX_SEARCH_PLY - 1)][(num_moves as usize).min(MAX_MOVE_INDEX - 1)];
            r += (!is_pv) as i32 + (!improving) as i32 - (move_score >= ordering::COUNTER) as i32;
            if move_score >= ordering::COUNTER {
                r -= 1;
            } else {
                r -= ((move_score - 149) / 50).clamp(0, 2);
            }
            r = r.clamp(1, new_depth - 1);
        }

        let mut score = alpha + 1;
        if r != 1 {
            score = -negamax(board, tt, state, config, ply + 1, new_depth - r, -alpha - 1, -alpha);
        }
        if (r != 1 && score > alpha) || (r == 1 && (!is_pv || num_moves > 1)) {
            score = -negamax(board, tt, state, config, ply + 1, new_depth - 1, -alpha - 1, -alpha);
        }
        if is_pv && (num_moves == 1 || (score > alpha && (is_root || score < beta))) {
            score = -negamax(board, tt, state, config, ply + 1, new_depth - 1, -beta, -alpha);
        }

        board.unmake_move(m, undo);

        if state.stopped {
            return 0;
        }

        if score > best_score {
            best_score = score;
            best_move = m;

            if score > alpha {
                alpha = score;
                state.update_pv(ply as usize, m);
            }

            if alpha >= beta {
                if !tactical {
                    state.ordering.record_killer(ply as usize, m);
                    state.ordering.record_counter(state.move_stack[ply.saturating_sub(1) as usize], m);
                    state.ordering.record_history(
                        board.piece_at(m.from()).map(|(_, p)| p).unwrap_or(crate::types::Piece::Pawn),
                        m,
                        depth,
                    );
                }
                break;
            }
        }
    }

    if !skip_move.is_null() {
        return best_score;
    }

    let bound = if best_score >= beta {
        BoundType::LowerBound
    } else if best_score <= original_alpha {
        BoundType::UpperBound
    } else {
        BoundType::Exact
    };
    let stored_move = if best_move.is_null() { None } else { Some(best_move) };
    tt.store(board.hash, depth as u32, best_score, eval_score, ply, bound, stored_move, 0);

    best_score
}

/// Quiescence search: only captures/promotions/en-passant, plus a single
/// stand-pat beta check — no second-stage mate-distance pruning.
pub fn quiesce(
    board: &mut Board,
    tt: &mut TranspositionTable,
    state: &mut SearchState,
    ply: u32,
    mut alpha: i32,
    beta: i32,
) -> i32 {
    let nodes = state.stopper.node_visited();
    state.seldepth = state.seldepth.max(ply);
    if state.poll(nodes) {
        return 0;
    }

    if board.is_repetition() || board.is_fifty_move_draw() || board.insufficient_material() {
        return 0;
    }
    if ply as usize > MAX_SEARCH_PLY - 1 {
        return static_eval(board);
    }

    let tt_entry = tt.probe(board.hash, ply);
    if let Some(ref entry) = tt_entry {
        let score = entry.score();
        match entry.bound_type() {
            BoundType::Exact => return score,
            BoundType::LowerBound if score >= beta => return score,
            BoundType::UpperBound if score <= alpha => return score,
            _ => {}
        }
    }

    // Stand-pat defaults to a fresh static eval, refined by a TT hit's
    // stored eval when the entry's bound makes that a tighter estimate —
    // mirrors the main search's TT-refined eval_score.
    let mut eval_score = static_eval(board);
    if let Some(ref entry) = tt_entry {
        let tt_eval = entry.eval();
        let tighter = match entry.bound_type() {
            BoundType::Exact => true,
            BoundType::LowerBound => tt_eval > eval_score,
            BoundType::UpperBound => tt_eval < eval_score,
        };
        if tighter {
            eval_score = tt_eval;
        }
    }
    if eval_score >= beta {
        return eval_score;
    }
    alpha = alpha.max(eval_score);

    let mut list = MoveList::new();
    board.generate_captures(&mut list);
    list.as_mut_slice().sort_by_key(|&m| -see::see_capture(board, m));

    let mut best_score = eval_score;
    for i in 0..list.len() {
        let m = list.get(i);

        if let Some(promo) = m.promotion_piece() {
            if promo != crate::types::Piece::Queen {
                continue;
            }
        } else {
            let captured = board.piece_at(m.to()).map(|(_, p)| p).unwrap_or(crate::types::Piece::Pawn);
            if eval_score + DELTA_CUTOFF + eval::MATERIAL_MG[captured.index()] < alpha {
                continue;
            }
        }

        if see::see_capture(board, m) < 0 {
            continue;
        }

        let undo = board.make_move(m);
        let score = -quiesce(board, tt, state, ply + 1, -beta, -alpha);
        board.unmake_move(m, undo);

        if state.stopped {
            return 0;
        }

        if score > best_score {
            best_score = score;
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }
    }

    best_score
}

/// Iterative deepening driver with aspiration windows. Reports one
/// `SearchInfo` per completed depth via `on_info` and returns the best
/// move found at the deepest fully-searched iteration.
pub fn search(
    board: &mut Board,
    tt: &mut TranspositionTable,
    config: &SearchConfig,
    stopper: Stopper,
    mut on_info: impl FnMut(SearchInfo),
) -> Option<Move> {
    let mut root_list = MoveList::new();
    board.generate_legal(&mut root_list);
    if root_list.is_empty() {
        return None;
    }
    if root_list.len() == 1 {
        return Some(root_list.get(0));
    }

    let start = Instant::now();
    let mut state = SearchState::new(stopper);
    let mut best_move = None;
    let mut score;
    let mut pv: Vec<Move>;

    score = negamax(board, tt, &mut state, config, 0, 1, -MATE_SCORE, MATE_SCORE);
    pv = state.pv_at(0).to_vec();
    if let Some(&m) = pv.first() {
        best_move = Some(m);
    }
    report(&pv, score, 1, &state, &start, tt, &mut on_info);

    let mut depth = 2;
    while depth <= config.max_depth as i32 && !state.stopped {
        let mut delta = if depth >= 5 { 10 } else { MATE_SCORE };
        let mut alpha = (score - delta).max(-MATE_SCORE);
        let mut beta = (score + delta).min(MATE_SCORE);

        loop {
            if state.stopper.should_stop() {
                state.stopped = true;
                break;
            }
            let iter_score = negamax(board, tt, &mut state, config, 0, depth, alpha, beta);

            if iter_score <= alpha {
                #[cfg(feature = "logging")]
                log::debug!("depth {depth} aspiration fail-low: score {iter_score} <= alpha {alpha}");
                beta = (alpha + beta) / 2;
                alpha = (alpha - delta).max(-MATE_SCORE);
            } else if iter_score >= beta {
                #[cfg(feature = "logging")]
                log::debug!("depth {depth} aspiration fail-high: score {iter_score} >= beta {beta}");
                beta = (beta + delta).min(MATE_SCORE);
            } else {
                score = iter_score;
                pv = state.pv_at(0).to_vec();
                if let Some(&m) = pv.first() {
                    best_move = Some(m);
                }
                report(&pv, score, depth, &state, &start, tt, &mut on_info);
                break;
            }
            delta += delta / 2;
        }

        depth += 1;
    }

    best_move
}

fn report(
    pv: &[Move],
    score: i32,
    depth: i32,
    state: &SearchState,
    start: &Instant,
    tt: &TranspositionTable,
    on_info: &mut impl FnMut(SearchInfo),
) {
    let elapsed_ms = start.elapsed().as_millis();
    let nodes = state.stopper.nodes();
    let nps = if elapsed_ms > 0 { Some((nodes as u128 * 1000 / elapsed_ms) as u64) } else { None };
    let pv_str = pv.iter().map(|m| m.to_uci()).collect::<Vec<_>>().join(" ");

    let mut info = SearchInfo {
        depth: Some(depth as u32),
        seldepth: Some(state.seldepth),
        nodes: Some(nodes),
        nps,
        time_ms: Some(elapsed_ms),
        pv: Some(pv_str),
        hashfull: Some(tt.hashfull_per_mille()),
        ..Default::default()
    };
    if score.abs() > MATE_THRESHOLD {
        let moves_to_mate = (MATE_SCORE - score.abs() + 1) / 2;
        info.score_mate = Some(if score > 0 { moves_to_mate } else { -moves_to_mate });
    } else {
        info.score_cp = Some(score);
    }
    on_info(info);
}
