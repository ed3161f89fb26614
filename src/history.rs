use crate::board::Board;

/// An atomic record of one cell's value transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Change {
    pub row: usize,
    pub col: usize,
    pub prev_value: u8,
    pub new_value: u8,
}

impl Change {
    /// Pushes the change's new value into the board. Application goes
    /// through [Board::set_value] so the conflict bookkeeping is re-derived
    /// rather than restored from a snapshot.
    pub fn apply(&self, board: &mut Board) {
        board.set_value(self.row, self.col, self.new_value);
    }

    /// Pushes the change's previous value into the board.
    pub fn revert(&self, board: &mut Board) {
        board.set_value(self.row, self.col, self.prev_value);
    }
}

/// One logical, undoable user action: an ordered batch of [Change]s.
#[derive(Clone, Debug, Default)]
pub struct Move {
    changes: Vec<Change>,
}

impl Move {
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// The undo/redo log: an append-only sequence of [Move]s plus a cursor.
///
/// Moves at or before the cursor are the committed past, moves after it the
/// redoable future. The future is discarded whenever a new Move is opened.
/// Index 0 always holds a sentinel empty Move that is never undone; it keeps
/// the cursor arithmetic trivial at the boundaries.
///
/// Callers open a Move with [History::new_move] before mutating the board
/// through [History::make_change]. Operations that can fail part-way
/// (guessing, generation) discard their pending Move with
/// [History::discard_last_move].
#[derive(Clone, Debug)]
pub struct History {
    moves: Vec<Move>,
    cursor: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        History {
            moves: vec![Move::default()],
            cursor: 0,
        }
    }

    /// Discards the redo tail, appends a fresh empty Move and moves the
    /// cursor to it.
    pub fn new_move(&mut self) {
        self.clear_redo_tail();
        self.moves.push(Move::default());
        self.cursor += 1;
    }

    fn clear_redo_tail(&mut self) {
        self.moves.truncate(self.cursor + 1);
    }

    /// Appends a change to the Move at the cursor.
    pub fn record_change(&mut self, change: Change) {
        debug_assert!(self.cursor > 0, "no move was opened with new_move");
        self.moves[self.cursor].changes.push(change);
    }

    /// Records a change capturing the cell's previous value, then applies it
    /// to the board. The write-through entry point used by all mutating
    /// actions.
    pub fn make_change(&mut self, board: &mut Board, row: usize, col: usize, new_value: u8) -> Change {
        let change = Change {
            row,
            col,
            prev_value: board.value(row, col),
            new_value,
        };
        self.record_change(change);
        change.apply(board);
        change
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.moves.len()
    }

    /// Number of recorded Moves, the sentinel excluded.
    pub fn move_count(&self) -> usize {
        self.moves.len() - 1
    }

    /// Reverts the current Move's changes in reverse order and steps the
    /// cursor back. Returns the reverted changes for display, or `None` if
    /// the cursor is already at the sentinel head.
    pub fn undo(&mut self, board: &mut Board) -> Option<&[Change]> {
        if self.cursor == 0 {
            return None;
        }

        let index = self.cursor;
        for i in (0..self.moves[index].changes.len()).rev() {
            self.moves[index].changes[i].revert(board);
        }
        self.cursor -= 1;
        Some(&self.moves[index].changes)
    }

    /// Advances the cursor and replays the new current Move's changes in
    /// forward order. Returns the applied changes, or `None` if the cursor
    /// is already at the tail.
    pub fn redo(&mut self, board: &mut Board) -> Option<&[Change]> {
        if !self.can_redo() {
            return None;
        }

        self.cursor += 1;
        let index = self.cursor;
        for i in 0..self.moves[index].changes.len() {
            self.moves[index].changes[i].apply(board);
        }
        Some(&self.moves[index].changes)
    }

    /// Walks backward from the cursor to the sentinel head, reverting every
    /// change along the way. Unlike undo-in-a-loop this is not observable
    /// per-move, and unlike [History::clear] it keeps the Move list intact.
    pub fn reset(&mut self, board: &mut Board) {
        while self.cursor > 0 {
            let index = self.cursor;
            for i in (0..self.moves[index].changes.len()).rev() {
                self.moves[index].changes[i].revert(board);
            }
            self.cursor -= 1;
        }
    }

    /// Drops all Moves but the sentinel. Used when the board is replaced
    /// wholesale and the old history no longer applies.
    pub fn clear(&mut self) {
        self.moves.truncate(1);
        self.cursor = 0;
    }

    /// Reverts and removes the Move at the tail of the log. This is the
    /// discard-the-pending-Move failure protocol: the caller opened a Move,
    /// the operation failed part-way, so the Move and any effects it already
    /// had are rolled back.
    pub fn discard_last_move(&mut self, board: &mut Board) {
        // Only a pending Move at the tail can be discarded, never the
        // sentinel and never a Move whose effects aren't on the board.
        if self.cursor == 0 || self.cursor + 1 != self.moves.len() {
            return;
        }

        if let Some(last) = self.moves.pop() {
            for change in last.changes.iter().rev() {
                change.revert(board);
            }
        }
        self.cursor -= 1;
    }
}
