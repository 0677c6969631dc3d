use crate::config::{MAX_PLAYERS, MIN_PLAYERS};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl PlayerColor {
    pub const PALETTE: [PlayerColor; 6] = [
        PlayerColor::Red,
        PlayerColor::Blue,
        PlayerColor::Green,
        PlayerColor::Yellow,
        PlayerColor::Purple,
        PlayerColor::Orange,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlayerColor::Red => "빨강",
            PlayerColor::Blue => "파랑",
            PlayerColor::Green => "초록",
            PlayerColor::Yellow => "노랑",
            PlayerColor::Purple => "보라",
            PlayerColor::Orange => "주황",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::PALETTE.iter().position(|c| *c == self).unwrap_or(0);
        Self::PALETTE[(i + 1) % Self::PALETTE.len()]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    /// 1-based seat number.
    pub id: usize,
    pub name: String,
    pub color: PlayerColor,
    pub position: u8,
}

pub fn default_name(id: usize) -> String {
    format!("플레이어 {id}")
}

/// Rows of the setup dialog, top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupRow {
    Count,
    Player(usize),
    Start,
}

/// The player setup dialog. All four seats exist so that shrinking and
/// regrowing the count keeps edited names.
#[derive(Clone, Debug)]
pub struct GameSetup {
    count: usize,
    seats: Vec<Player>,
    pub row: SetupRow,
}

impl GameSetup {
    pub fn new(count: usize) -> Self {
        let seats = (1..=MAX_PLAYERS)
            .map(|id| Player {
                id,
                name: default_name(id),
                color: PlayerColor::PALETTE[id - 1],
                position: 0,
            })
            .collect();
        Self {
            count: count.clamp(MIN_PLAYERS, MAX_PLAYERS),
            seats,
            row: SetupRow::Count,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn set_count(&mut self, count: usize) {
        self.count = count.clamp(MIN_PLAYERS, MAX_PLAYERS);
        if let SetupRow::Player(i) = self.row {
            if i >= self.count {
                self.row = SetupRow::Player(self.count - 1);
            }
        }
    }

    pub fn seats(&self) -> &[Player] {
        &self.seats[..self.count]
    }

    pub fn seat_mut(&mut self, index: usize) -> Option<&mut Player> {
        if index < self.count {
            self.seats.get_mut(index)
        } else {
            None
        }
    }

    pub fn rename(&mut self, index: usize, name: &str) {
        if let Some(seat) = self.seat_mut(index) {
            seat.name = name.to_string();
        }
    }

    pub fn cycle_color(&mut self, index: usize) {
        if let Some(seat) = self.seat_mut(index) {
            seat.color = seat.color.next();
        }
    }

    pub fn next_row(&mut self) {
        self.row = match self.row {
            SetupRow::Count => SetupRow::Player(0),
            SetupRow::Player(i) if i + 1 < self.count => SetupRow::Player(i + 1),
            SetupRow::Player(_) => SetupRow::Start,
            SetupRow::Start => SetupRow::Count,
        };
    }

    pub fn prev_row(&mut self) {
        self.row = match self.row {
            SetupRow::Count => SetupRow::Start,
            SetupRow::Player(0) => SetupRow::Count,
            SetupRow::Player(i) => SetupRow::Player(i - 1),
            SetupRow::Start => SetupRow::Player(self.count - 1),
        };
    }

    /// The players that take part. Blank names fall back to the seat default.
    pub fn players(&self) -> Vec<Player> {
        self.seats()
            .iter()
            .map(|seat| {
                let mut player = seat.clone();
                let trimmed = player.name.trim();
                player.name = if trimmed.is_empty() {
                    default_name(player.id)
                } else {
                    trimmed.to_string()
                };
                player.position = 0;
                player
            })
            .collect()
    }
}

impl Default for GameSetup {
    fn default() -> Self {
        Self::new(MIN_PLAYERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_seats() {
        let setup = GameSetup::default();
        let players = setup.players();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].name, "플레이어 1");
        assert_eq!(players[1].color, PlayerColor::Blue);
        assert!(players.iter().all(|p| p.position == 0));
    }

    #[test]
    fn test_count_is_clamped() {
        let mut setup = GameSetup::new(7);
        assert_eq!(setup.count(), 4);
        setup.set_count(1);
        assert_eq!(setup.count(), 2);
    }

    #[test]
    fn test_names_survive_shrinking_count() {
        let mut setup = GameSetup::new(4);
        setup.rename(3, "지우");
        setup.set_count(2);
        assert!(setup.seat_mut(3).is_none());
        setup.set_count(4);
        assert_eq!(setup.players()[3].name, "지우");
    }

    #[test]
    fn test_blank_name_falls_back() {
        let mut setup = GameSetup::default();
        setup.rename(0, "   ");
        assert_eq!(setup.players()[0].name, "플레이어 1");
    }

    #[test]
    fn test_color_cycles_through_palette() {
        let mut setup = GameSetup::default();
        for _ in 0..PlayerColor::PALETTE.len() {
            setup.cycle_color(0);
        }
        assert_eq!(setup.players()[0].color, PlayerColor::Red);
        setup.cycle_color(0);
        assert_eq!(setup.players()[0].color, PlayerColor::Blue);
    }

    #[test]
    fn test_row_navigation_respects_count() {
        let mut setup = GameSetup::default();
        setup.next_row();
        setup.next_row();
        assert_eq!(setup.row, SetupRow::Player(1));
        setup.next_row();
        assert_eq!(setup.row, SetupRow::Start);
        setup.prev_row();
        assert_eq!(setup.row, SetupRow::Player(1));
    }
}
