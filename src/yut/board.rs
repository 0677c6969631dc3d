pub const BOARD_ROWS: u8 = 5;
pub const BOARD_COLS: u8 = 10;
pub const START: u8 = 0;
pub const END: u8 = BOARD_ROWS * BOARD_COLS - 1;

pub const PRIMES: [u8; 15] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecialKind {
    Benefit,
    Penalty,
}

impl SpecialKind {
    pub fn title(self) -> &'static str {
        match self {
            SpecialKind::Benefit => "혜택!",
            SpecialKind::Penalty => "벌칙!",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpecialCell {
    pub cell: u8,
    pub kind: SpecialKind,
    pub message: &'static str,
}

pub const SPECIAL_CELLS: [SpecialCell; 2] = [
    SpecialCell {
        cell: 19,
        kind: SpecialKind::Benefit,
        message: "혜택! 앞으로 3칸 이동하기",
    },
    SpecialCell {
        cell: 23,
        kind: SpecialKind::Penalty,
        message: "벌칙! 처음으로 가시오.",
    },
];

pub fn special_cell(cell: u8) -> Option<&'static SpecialCell> {
    SPECIAL_CELLS.iter().find(|s| s.cell == cell)
}

pub fn is_prime(cell: u8) -> bool {
    PRIMES.contains(&cell)
}

/// Where a piece ends up after landing on `cell`.
pub fn resolve_landing(cell: u8) -> u8 {
    match cell {
        19 => 22,
        23 => START,
        other => other,
    }
}

/// Cell number shown at a grid slot. Rows snake: even rows run left to
/// right, odd rows right to left.
pub fn cell_at(row: u8, col: u8) -> u8 {
    let base = row * BOARD_COLS;
    if row % 2 == 0 {
        base + col
    } else {
        base + (BOARD_COLS - 1 - col)
    }
}

/// Grid slot `(row, col)` of a cell.
pub fn slot_of(cell: u8) -> (u8, u8) {
    let cell = cell.min(END);
    let row = cell / BOARD_COLS;
    let offset = cell % BOARD_COLS;
    let col = if row % 2 == 0 {
        offset
    } else {
        BOARD_COLS - 1 - offset
    };
    (row, col)
}

pub fn cell_label(cell: u8) -> String {
    match cell {
        START => "Start".to_string(),
        END => "End".to_string(),
        n => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serpentine_rows() {
        assert_eq!(cell_at(0, 0), 0);
        assert_eq!(cell_at(0, 9), 9);
        assert_eq!(cell_at(1, 0), 19);
        assert_eq!(cell_at(1, 9), 10);
        assert_eq!(cell_at(2, 0), 20);
        assert_eq!(cell_at(3, 0), 39);
        assert_eq!(cell_at(4, 9), END);
    }

    #[test]
    fn test_slot_of_inverts_cell_at() {
        for row in 0..BOARD_ROWS {
            for col in 0..BOARD_COLS {
                assert_eq!(slot_of(cell_at(row, col)), (row, col));
            }
        }
    }

    #[test]
    fn test_special_cells() {
        assert_eq!(special_cell(19).map(|s| s.kind), Some(SpecialKind::Benefit));
        assert_eq!(special_cell(23).map(|s| s.kind), Some(SpecialKind::Penalty));
        assert!(special_cell(20).is_none());
        assert_eq!(resolve_landing(19), 22);
        assert_eq!(resolve_landing(23), START);
        assert_eq!(resolve_landing(24), 24);
    }

    #[test]
    fn test_primes_and_labels() {
        assert!(is_prime(2));
        assert!(is_prime(47));
        assert!(!is_prime(1));
        assert!(!is_prime(49));
        assert_eq!(cell_label(0), "Start");
        assert_eq!(cell_label(49), "End");
        assert_eq!(cell_label(12), "12");
    }
}
