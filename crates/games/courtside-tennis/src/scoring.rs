use serde::{Deserialize, Serialize};

use courtside_core::player::Side;

/// Points within one game. 4 means advantage once deuce is reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub points: [u8; 2],
    game_winner: Option<Side>,
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points_of(&self, side: Side) -> u8 {
        self.points[side.index()]
    }

    pub fn game_winner(&self) -> Option<Side> {
        self.game_winner
    }

    /// Award a point to `side`. A no-op once the game is decided.
    pub fn point_for(&mut self, side: Side) {
        if self.game_winner.is_some() {
            return;
        }
        let me = side.index();
        let them = side.opponent().index();

        if self.points[them] == 4 && self.points[me] == 3 {
            // Advantage lost, back to deuce.
            self.points[them] = 3;
        } else if self.points[me] >= 3 && self.points[them] >= 3 {
            if self.points[me] == 3 {
                self.points[me] = 4;
            } else {
                self.game_winner = Some(side);
            }
        } else {
            self.points[me] += 1;
            if self.points[me] >= 4 && self.points[them] < 3 {
                self.game_winner = Some(side);
            }
        }
    }

    /// Tennis label for a raw point count.
    pub fn label(points: u8) -> &'static str {
        match points {
            0 => "0",
            1 => "15",
            2 => "30",
            3 => "40",
            _ => "AD",
        }
    }

    /// Scoreboard text: "15-30", "Deuce", "Advantage P1" or "Game P2".
    pub fn display(&self) -> String {
        if let Some(winner) = self.game_winner {
            return format!("Game {winner}");
        }
        let [p1, p2] = self.points;
        if p1 >= 3 && p2 >= 3 {
            return match p1.cmp(&p2) {
                std::cmp::Ordering::Equal => "Deuce".to_string(),
                std::cmp::Ordering::Greater => format!("Advantage {}", Side::P1),
                std::cmp::Ordering::Less => format!("Advantage {}", Side::P2),
            };
        }
        format!("{}-{}", Self::label(p1), Self::label(p2))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Games won across a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub games: [u32; 2],
    pub games_to_win: u32,
    match_winner: Option<Side>,
}

impl MatchScore {
    pub fn new(games_to_win: u32) -> Self {
        Self {
            games: [0; 2],
            games_to_win: games_to_win.max(1),
            match_winner: None,
        }
    }

    /// Credit a game to `winner`. Returns the match winner if this game
    /// decided the match.
    pub fn record_game(&mut self, winner: Side) -> Option<Side> {
        if self.match_winner.is_some() {
            return None;
        }
        self.games[winner.index()] += 1;
        if self.games[winner.index()] >= self.games_to_win {
            self.match_winner = Some(winner);
        }
        self.match_winner
    }

    pub fn games_of(&self, side: Side) -> u32 {
        self.games[side.index()]
    }

    pub fn match_winner(&self) -> Option<Side> {
        self.match_winner
    }
}
